//! Errors a signal handler can report back to the bus.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("view '{0}' is no longer alive")]
    ViewGone(String),

    #[error("handler failed: {0}")]
    Handler(String),
}

pub type SignalResult<T> = Result<T, SignalError>;
