use thiserror::Error;

/// Failures while gathering cluster configuration. Any of these aborts the
/// whole fetch; no partial fact set is ever returned alongside one.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The Ambari server could not be reached within the timeout.
    #[error("Could not connect to Ambari client at {url}: {source}")]
    ConnectionFailure {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Ambari answered with something other than 200.
    #[error(
        "Could not get cluster configuration{}: request code {code}, request message {body}",
        for_type(.config_type)
    )]
    UnexpectedStatus {
        config_type: Option<String>,
        code: u16,
        body: String,
    },

    /// The JSON parsed but the expected keys were absent or null.
    #[error(
        "Could not find {context}{}, request code {code}, response content is: {body}",
        for_type(.config_type)
    )]
    MalformedResponse {
        context: String,
        config_type: Option<String>,
        code: u16,
        body: String,
    },

    #[error("{0}")]
    InvalidParameters(String),

    #[error("Ambari client exception occurred: {0}")]
    Unknown(String),
}

impl FetchError {
    /// HTTP status attached to the failure, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::UnexpectedStatus { code, .. }
            | FetchError::MalformedResponse { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Configuration type being fetched when the failure happened.
    pub fn config_type(&self) -> Option<&str> {
        match self {
            FetchError::UnexpectedStatus { config_type, .. }
            | FetchError::MalformedResponse { config_type, .. } => config_type.as_deref(),
            _ => None,
        }
    }
}

fn for_type(config_type: &Option<String>) -> String {
    match config_type {
        Some(t) => format!(" for config type '{t}'"),
        None => String::new(),
    }
}
