//! Experiment: the trace server's unit of analysis, as seen by the host.
//!
//! The host never interprets an experiment beyond its name. Everything else
//! the server sends (UUID, time range, traces, indexing status) rides along
//! untouched in `metadata` so it survives the trip back to a webview.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An experiment referenced by name. "Nothing selected" is `Option::None`,
/// never an experiment with an empty name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub name: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Experiment {
    /// An experiment with no metadata.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Map::new(),
        }
    }

    /// Attach one metadata field.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Two experiments are the same experiment if their names match.
    pub fn same_identity(&self, other: &Experiment) -> bool {
        self.name == other.name
    }

    /// Encode as the string webviews exchange in `data.wrapper`.
    pub fn to_wrapper(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode a `data.wrapper` string.
    pub fn from_wrapper(wrapper: &str) -> serde_json::Result<Self> {
        serde_json::from_str(wrapper)
    }
}
