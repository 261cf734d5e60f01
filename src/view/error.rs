//! View-level errors.

use thiserror::Error;

use crate::protocol::ProtocolError;
use crate::signals::SignalError;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("experiment encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("view '{0}' is busy handling another event")]
    Busy(&'static str),
}

pub type ViewResult<T> = Result<T, ViewError>;

impl From<ViewError> for SignalError {
    fn from(e: ViewError) -> Self {
        SignalError::Handler(e.to_string())
    }
}
