//! Errors decoding messages that arrive from a webview.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("'{command}' is missing {field}")]
    MissingField {
        command: &'static str,
        field: &'static str,
    },

    #[error("'{command}' has invalid {field}: {reason}")]
    InvalidField {
        command: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("'{command}' carries an undecodable experiment: {source}")]
    BadWrapper {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
