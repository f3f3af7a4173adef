pub mod hosts;
pub mod java_home;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// A named transformation over the contents of a local file.
#[derive(Clone, Copy)]
pub struct Filter {
    pub name: &'static str,
    pub description: &'static str,
    apply: fn(&str) -> Result<Value>,
}

impl Filter {
    pub fn apply(&self, contents: &str) -> Result<Value> {
        (self.apply)(contents)
    }

    /// Read `path` and apply the filter to its contents.
    pub fn run(&self, path: &Path) -> Result<Value> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.apply(&contents)
            .with_context(|| format!("Filter {} failed on {}", self.name, path.display()))
    }
}

/// Every filter this crate provides. The embedding host registers what it
/// needs from this list.
pub fn registry() -> Vec<Filter> {
    vec![
        Filter {
            name: "get_all_hosts",
            description: "host names from an unbound resolver config",
            apply: |contents| Ok(Value::from(hosts::extract_hosts(contents))),
        },
        Filter {
            name: "get_ambari_java_home",
            description: "java.home from ambari.properties",
            apply: |contents| {
                java_home::extract_java_home(contents)
                    .map(Value::String)
                    .context("No java.home entry found")
            },
        },
    ]
}

pub fn find(name: &str) -> Option<Filter> {
    registry().into_iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_registry_names() {
        let names: Vec<&str> = registry().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["get_all_hosts", "get_ambari_java_home"]);
        assert!(find("get_all_hosts").is_some());
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_run_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "local-data-ptr: \"10.0.0.11 master01\"").unwrap();
        writeln!(file, "local-data-ptr: \"10.0.0.12 master02\"").unwrap();

        let value = find("get_all_hosts").unwrap().run(file.path()).unwrap();
        assert_eq!(value, serde_json::json!(["master01", "master02"]));
    }

    #[test]
    fn test_java_home_missing_is_error() {
        let filter = find("get_ambari_java_home").unwrap();
        assert!(filter.apply("server.os_type=redhat7\n").is_err());
        assert_eq!(
            filter.apply("java.home=/usr/jdk64\n").unwrap(),
            Value::String("/usr/jdk64".to_string())
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        let filter = find("get_all_hosts").unwrap();
        let err = filter.run(Path::new("/nonexistent/unbound.conf")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/unbound.conf"));
    }
}
