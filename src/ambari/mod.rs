pub mod client;
pub mod error;
pub mod types;

use serde_json::Value;
use tracing::{debug, info};

use client::{AmbariClient, RawResponse, Transport};
use error::FetchError;
use types::{ConfigProperties, ConfigTypeDescriptor, ConnectionParams, FactStore};

/// Gather the resolved properties of every configuration type active on the
/// cluster. One call discovers the type -> tag mapping, then one call per
/// type fetches its properties, strictly in sequence.
pub async fn fetch_all_configuration(params: &ConnectionParams) -> Result<FactStore, FetchError> {
    params.validate()?;
    let client = AmbariClient::new(params)?;
    fetch_with(&client, params).await
}

/// Same as [`fetch_all_configuration`] over an arbitrary transport.
pub async fn fetch_with<T: Transport>(
    transport: &T,
    params: &ConnectionParams,
) -> Result<FactStore, FetchError> {
    let config_types = get_config_types(transport, params).await?;

    let mut facts = FactStore::new();
    for (config_type, tag) in &config_types {
        let properties = get_cluster_config(transport, params, config_type, tag).await?;
        facts.insert(config_type.clone(), properties);
    }

    info!(
        cluster = %params.cluster_name,
        config_types = facts.len(),
        "gathered ambari component facts"
    );
    Ok(facts)
}

async fn get_config_types<T: Transport>(
    transport: &T,
    params: &ConnectionParams,
) -> Result<ConfigTypeDescriptor, FetchError> {
    let url = params.endpoint(&format!(
        "/api/v1/clusters/{}?fields=Clusters/desired_configs",
        params.cluster_name
    ))?;
    let response = transport.get(url).await?;
    expect_ok(&response, None)?;

    let json = parse_json(&response, None)?;
    let desired = json
        .pointer("/Clusters/desired_configs")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed(&response, "Clusters.desired_configs", None))?;

    let mut config_types = ConfigTypeDescriptor::new();
    for (config_type, entry) in desired {
        let tag = entry
            .get("tag")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(&response, "the desired tag", Some(config_type.as_str())))?;
        debug!(config_type = %config_type, tag, "desired config");
        config_types.insert(config_type.clone(), tag.to_string());
    }

    Ok(config_types)
}

async fn get_cluster_config<T: Transport>(
    transport: &T,
    params: &ConnectionParams,
    config_type: &str,
    tag: &str,
) -> Result<ConfigProperties, FetchError> {
    let mut url = params.endpoint(&format!(
        "/api/v1/clusters/{}/configurations",
        params.cluster_name
    ))?;
    url.query_pairs_mut()
        .append_pair("type", config_type)
        .append_pair("tag", tag);

    let response = transport.get(url).await?;
    expect_ok(&response, Some(config_type))?;

    let json = parse_json(&response, Some(config_type))?;
    let properties = json
        .pointer("/items/0/properties")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            malformed(
                &response,
                "the right properties key (possibly having a wrong tag)",
                Some(config_type),
            )
        })?;

    Ok(properties
        .iter()
        .map(|(key, value)| (key.clone(), property_value(value)))
        .collect())
}

fn expect_ok(response: &RawResponse, config_type: Option<&str>) -> Result<(), FetchError> {
    if response.status == 200 {
        Ok(())
    } else {
        Err(FetchError::UnexpectedStatus {
            config_type: config_type.map(str::to_string),
            code: response.status,
            body: response.body.clone(),
        })
    }
}

fn parse_json(response: &RawResponse, config_type: Option<&str>) -> Result<Value, FetchError> {
    serde_json::from_str(&response.body).map_err(|e| {
        let scope = config_type
            .map(|t| format!(" for config type '{t}'"))
            .unwrap_or_default();
        FetchError::Unknown(format!("invalid JSON in response{scope}: {e}"))
    })
}

fn malformed(response: &RawResponse, context: &str, config_type: Option<&str>) -> FetchError {
    FetchError::MalformedResponse {
        context: context.to_string(),
        config_type: config_type.map(str::to_string),
        code: response.status,
        body: response.body.clone(),
    }
}

/// Ambari reports properties as strings; anything else keeps its JSON text.
fn property_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
