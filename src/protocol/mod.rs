//! Protocol: the `{command, data}` messages exchanged with webviews.
//!
//! Webviews speak in camelCase command strings. Experiments cross the
//! boundary as `data.wrapper`, a JSON string rather than a nested object,
//! because the webview side decodes it with its own big-integer-aware parser.

pub mod error;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use error::{ProtocolError, ProtocolResult};

/// Commands a webview sends to the host.
pub mod inbound {
    pub const CONNECTION_STATUS: &str = "connectionStatus";
    pub const WEBVIEW_READY: &str = "webviewReady";
    pub const RE_OPEN_TRACE: &str = "reopenTrace";
    pub const CLOSE_TRACE: &str = "closeTrace";
    pub const DELETE_TRACE: &str = "deleteTrace";
    pub const OPENED_TRACES_UPDATED: &str = "openedTracesUpdated";
    pub const OPEN_TRACE: &str = "openTrace";
    pub const EXPERIMENT_SELECTED: &str = "experimentSelected";
}

/// Commands the host sends to a webview.
pub mod outbound {
    pub const SET_TSP_CLIENT: &str = "setTspClient";
    pub const TRACE_SERVER_URL_CHANGED: &str = "traceServerUrlChanged";
    pub const EXPERIMENT_OPENED: &str = "experimentOpened";
    pub const EXPERIMENT_SELECTED: &str = "experimentSelected";
    pub const EXPERIMENT_CLOSED: &str = "experimentClosed";
    pub const TRACE_VIEWER_TAB_ACTIVATED: &str = "traceViewerTabActivated";
    pub const CONNECTION_STATUS: &str = "connectionStatus";
    pub const VIEWS_UPDATED: &str = "viewsUpdated";
}

/// A raw message from a webview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl InboundMessage {
    pub fn new(command: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            command: command.into(),
            data,
        }
    }

    /// Look up a top-level field of `data`, treating JSON null as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data
            .as_ref()
            .and_then(|d| d.get(name))
            .filter(|v| !v.is_null())
    }
}

/// A notification for a webview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub command: String,
    pub data: Value,
}

impl OutboundMessage {
    pub fn new(command: impl Into<String>, data: Value) -> Self {
        Self {
            command: command.into(),
            data,
        }
    }
}
