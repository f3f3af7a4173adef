use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::ambari::types::Protocol;

/// Connection defaults for the `facts` command. Passwords are never read
/// from this file.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub protocol: Protocol,
    pub host: String,
    pub port: Option<u16>,
    pub context_path: String,
    pub username: Option<String>,
    pub cluster_name: Option<String>,
    pub timeout_sec: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol: Protocol::Http,
            host: "localhost".to_string(),
            port: None,
            context_path: String::new(),
            username: None,
            cluster_name: None,
            timeout_sec: 10,
        }
    }
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# ambari-facts configuration
# CLI arguments override these values

# Ambari web server protocol (http / https)
protocol: http

# Ambari web server host
host: localhost

# Prefix for every API call when Ambari sits behind a proxy,
# leading slash and no trailing slash
context_path: ""

# Per-request timeout in seconds
timeout_sec: 10

# Ambari web server port (uncomment to set)
# port: 8080

# Ambari user (uncomment to set)
# username: admin

# Cluster name in Ambari (uncomment to set)
# cluster_name: my_cluster
"#;

impl Config {
    fn config_path() -> Option<PathBuf> {
        dirs_or_home().map(|p| p.join("config.yml"))
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from `path`, writing a commented default file if none exists.
    /// Unreadable or invalid files fall back to defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            Self::create_default(path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!("failed to parse config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                warn!("failed to read config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    fn create_default(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("could not create config dir {}: {e}", parent.display());
                return;
            }
        }
        if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
            warn!("could not write default config to {}: {e}", path.display());
        }
    }
}

fn dirs_or_home() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("ambari-facts"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");

        let config = Config::load_from(&path);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.timeout_sec, 10);
        assert!(path.exists());

        // the written default must parse back to the same defaults
        let reloaded = Config::load_from(&path);
        assert_eq!(reloaded.protocol, Protocol::Http);
        assert_eq!(reloaded.port, None);
        assert_eq!(reloaded.context_path, "");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "protocol: https\nport: 8443\ncluster_name: hdp1\n").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.protocol, Protocol::Https);
        assert_eq!(config.port, Some(8443));
        assert_eq!(config.cluster_name.as_deref(), Some("hdp1"));
        assert_eq!(config.host, "localhost");
        assert_eq!(config.timeout_sec, 10);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "port: [not, a, port]\n").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.port, None);
    }
}
