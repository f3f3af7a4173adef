use std::collections::BTreeMap;
use std::fmt;

use clap::ValueEnum;
use reqwest::Url;
use serde::Deserialize;

use super::error::FetchError;

/// Properties of one configuration type at one tag.
pub type ConfigProperties = BTreeMap<String, String>;

/// Configuration type name -> active tag, as reported by `desired_configs`.
pub type ConfigTypeDescriptor = BTreeMap<String, String>;

/// Configuration type name -> its properties. Keyed by a `BTreeMap` so types
/// are fetched and emitted in lexicographic order.
pub type FactStore = BTreeMap<String, ConfigProperties>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl Protocol {
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// A password that never shows up in `Debug` output or logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(********)")
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Secret)
    }
}

/// Everything needed to reach one Ambari server and cluster.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
    /// Path prepended to every API call when Ambari sits behind a proxy.
    /// Leading slash, no trailing slash. May be empty.
    pub context_path: String,
    pub username: String,
    pub password: Secret,
    pub cluster_name: String,
    pub timeout_sec: u64,
}

impl ConnectionParams {
    /// Names of mandatory fields that are unset or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.port == 0 {
            missing.push("port");
        }
        if self.username.is_empty() {
            missing.push("username");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        if self.cluster_name.is_empty() {
            missing.push("cluster_name");
        }
        missing
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FetchError::InvalidParameters(format!(
                "missing required arguments: {}",
                missing.join(", ")
            )))
        }
    }

    /// `{protocol}://{host}:{port}{context_path}`
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}{}",
            self.protocol, self.host, self.port, self.context_path
        )
    }

    /// Full URL for an API path such as `/api/v1/clusters/c1`.
    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        let raw = format!("{}{}", self.base_url(), path);
        Url::parse(&raw).map_err(|e| FetchError::Unknown(format!("invalid Ambari URL {raw}: {e}")))
    }
}

#[cfg(test)]
pub(crate) fn test_params() -> ConnectionParams {
    ConnectionParams {
        protocol: Protocol::Http,
        host: "ambari.local".to_string(),
        port: 8080,
        context_path: String::new(),
        username: "admin".to_string(),
        password: Secret::new("admin"),
        cluster_name: "hdp1".to_string(),
        timeout_sec: 10,
    }
}
