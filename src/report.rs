use std::error::Error;

use serde::Serialize;

use crate::ambari::error::FetchError;
use crate::ambari::types::FactStore;

const SUCCESS_MSG: &str = "Gathered facts for ambari services.";

/// Facts are nested under one key so configuration type names such as
/// `zoo.cfg` never have to be valid variable names.
#[derive(Debug, Serialize)]
pub struct AnsibleFacts {
    pub ambari_component_facts: FactStore,
}

/// JSON document an Ansible module prints on stdout.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ModuleResult {
    Success {
        changed: bool,
        results: FactStore,
        ansible_facts: AnsibleFacts,
        msg: String,
    },
    Failure {
        failed: bool,
        msg: String,
        stacktrace: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        config_type: Option<String>,
    },
}

impl ModuleResult {
    pub fn success(facts: FactStore) -> Self {
        ModuleResult::Success {
            changed: false,
            results: facts.clone(),
            ansible_facts: AnsibleFacts {
                ambari_component_facts: facts,
            },
            msg: SUCCESS_MSG.to_string(),
        }
    }

    pub fn from_fetch_error(err: &FetchError) -> Self {
        ModuleResult::Failure {
            failed: true,
            msg: err.to_string(),
            stacktrace: error_chain(err),
            status_code: err.status_code(),
            config_type: err.config_type().map(str::to_string),
        }
    }

    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        ModuleResult::Failure {
            failed: true,
            msg: err.to_string(),
            stacktrace: err
                .chain()
                .map(|cause| cause.to_string())
                .collect::<Vec<_>>()
                .join("\ncaused by: "),
            status_code: None,
            config_type: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ModuleResult::Failure { .. })
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl From<Result<FactStore, FetchError>> for ModuleResult {
    fn from(result: Result<FactStore, FetchError>) -> Self {
        match result {
            Ok(facts) => ModuleResult::success(facts),
            Err(e) => ModuleResult::from_fetch_error(&e),
        }
    }
}

/// `{:?}` of the error followed by each source, one per line.
fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut lines = vec![format!("{err:?}")];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {cause}"));
        source = cause.source();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_payload_shape() {
        let mut facts = FactStore::new();
        facts.insert(
            "zoo.cfg".to_string(),
            [("syncLimit".to_string(), "5".to_string())].into(),
        );

        let value = serde_json::to_value(ModuleResult::success(facts)).unwrap();
        assert_eq!(
            value,
            json!({
                "changed": false,
                "results": {"zoo.cfg": {"syncLimit": "5"}},
                "ansible_facts": {"ambari_component_facts": {"zoo.cfg": {"syncLimit": "5"}}},
                "msg": "Gathered facts for ambari services."
            })
        );
    }

    #[test]
    fn test_failure_payload_carries_status_and_body() {
        let err = FetchError::UnexpectedStatus {
            config_type: None,
            code: 403,
            body: "Forbidden".to_string(),
        };
        let result = ModuleResult::from(Err::<FactStore, _>(err));
        assert!(result.is_failed());

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["failed"], json!(true));
        let msg = value["msg"].as_str().unwrap();
        assert!(msg.contains("403"));
        assert!(msg.contains("Forbidden"));
        assert!(value["stacktrace"].as_str().unwrap().contains("UnexpectedStatus"));
        assert_eq!(value["status_code"], json!(403));
        assert!(value.get("config_type").is_none());
    }

    #[test]
    fn test_anyhow_failure_lists_causes() {
        let err = anyhow::anyhow!("file missing").context("Failed to read module arguments");
        let result = ModuleResult::from_anyhow(&err);
        match result {
            ModuleResult::Failure { msg, stacktrace, .. } => {
                assert_eq!(msg, "Failed to read module arguments");
                assert_eq!(
                    stacktrace,
                    "Failed to read module arguments\ncaused by: file missing"
                );
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
