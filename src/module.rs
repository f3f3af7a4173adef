use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::ambari::{self, error::FetchError};
use crate::ambari::types::{ConnectionParams, Protocol, Secret};
use crate::report::ModuleResult;

/// Ansible passes integers either as JSON numbers or as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FlexInt {
    Int(u64),
    Str(String),
}

impl FlexInt {
    fn parse(&self, name: &str) -> Result<u64, FetchError> {
        match self {
            FlexInt::Int(n) => Ok(*n),
            FlexInt::Str(s) => s.trim().parse().map_err(|_| {
                FetchError::InvalidParameters(format!(
                    "argument '{name}' is of type str and we were unable to convert to int: {s}"
                ))
            }),
        }
    }
}

/// Arguments of the `ambari_component_facts` module. Keys Ansible adds on
/// its own (`_ansible_*`) are ignored.
#[derive(Debug, Deserialize)]
pub struct ModuleArgs {
    #[serde(default)]
    protocol: Protocol,
    #[serde(default = "default_host")]
    host: String,
    #[serde(default)]
    port: Option<FlexInt>,
    #[serde(default)]
    context_path: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<Secret>,
    #[serde(default)]
    cluster_name: Option<String>,
    #[serde(default)]
    timeout_sec: Option<FlexInt>,
}

fn default_host() -> String {
    "localhost".to_string()
}

const DEFAULT_TIMEOUT_SEC: u64 = 10;

impl ModuleArgs {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Module arguments are not valid JSON")
    }

    pub fn into_params(self) -> Result<ConnectionParams, FetchError> {
        let port = match &self.port {
            Some(p) => u16::try_from(p.parse("port")?).map_err(|_| {
                FetchError::InvalidParameters("argument 'port' is out of range".to_string())
            })?,
            None => 0,
        };
        let timeout_sec = match &self.timeout_sec {
            Some(t) => t.parse("timeout_sec")?,
            None => DEFAULT_TIMEOUT_SEC,
        };

        let params = ConnectionParams {
            protocol: self.protocol,
            host: self.host,
            port,
            context_path: self.context_path,
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            cluster_name: self.cluster_name.unwrap_or_default(),
            timeout_sec,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Run the module against the argument file Ansible wrote for it.
pub async fn run(args_file: &Path) -> ModuleResult {
    let args = match load_args(args_file) {
        Ok(args) => args,
        Err(e) => return ModuleResult::from_anyhow(&e),
    };
    let params = match args.into_params() {
        Ok(params) => params,
        Err(e) => return ModuleResult::from_fetch_error(&e),
    };
    gather(&params).await
}

pub async fn gather(params: &ConnectionParams) -> ModuleResult {
    debug!(?params, "gathering ambari component facts");
    ambari::fetch_all_configuration(params).await.into()
}

fn load_args(args_file: &Path) -> Result<ModuleArgs> {
    let json = std::fs::read_to_string(args_file)
        .with_context(|| format!("Failed to read module arguments from {}", args_file.display()))?;
    ModuleArgs::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_applied() {
        let args = ModuleArgs::from_json(
            r#"{"port": 8080, "username": "admin", "password": "admin", "cluster_name": "hdp1",
                "_ansible_check_mode": false, "_ansible_verbosity": 1}"#,
        )
        .unwrap();
        let params = args.into_params().unwrap();
        assert_eq!(params.protocol, Protocol::Http);
        assert_eq!(params.host, "localhost");
        assert_eq!(params.port, 8080);
        assert_eq!(params.context_path, "");
        assert_eq!(params.timeout_sec, 10);
        assert_eq!(params.password.expose(), "admin");
    }

    #[test]
    fn test_string_integers_accepted() {
        let args = ModuleArgs::from_json(
            r#"{"protocol": "https", "host": "ambari01", "port": "8443", "context_path": "/ambari",
                "username": "admin", "password": "s3cret", "cluster_name": "hdp1", "timeout_sec": "30"}"#,
        )
        .unwrap();
        let params = args.into_params().unwrap();
        assert_eq!(params.protocol, Protocol::Https);
        assert_eq!(params.port, 8443);
        assert_eq!(params.timeout_sec, 30);
        assert_eq!(params.base_url(), "https://ambari01:8443/ambari");
    }

    #[test]
    fn test_missing_required_arguments() {
        let args = ModuleArgs::from_json(r#"{"username": "admin"}"#).unwrap();
        let err = args.into_params().unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required arguments: port, password, cluster_name"
        );
    }

    #[test]
    fn test_bad_port() {
        let args = ModuleArgs::from_json(
            r#"{"port": "http", "username": "a", "password": "b", "cluster_name": "c"}"#,
        )
        .unwrap();
        assert!(matches!(
            args.into_params(),
            Err(FetchError::InvalidParameters(_))
        ));

        let args = ModuleArgs::from_json(
            r#"{"port": 70000, "username": "a", "password": "b", "cluster_name": "c"}"#,
        )
        .unwrap();
        assert!(args.into_params().is_err());
    }

    #[tokio::test]
    async fn test_run_reports_missing_arguments_without_network() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"port": 8080, "username": "admin"}}"#).unwrap();

        let result = run(file.path()).await;
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["failed"], serde_json::json!(true));
        assert_eq!(
            value["msg"],
            serde_json::json!("missing required arguments: password, cluster_name")
        );
    }

    #[tokio::test]
    async fn test_run_unreadable_args_file() {
        let result = run(Path::new("/nonexistent/args.json")).await;
        assert!(result.is_failed());
    }
}
