//! Trace server configuration: where webviews and the host reach the server.
//!
//! User-level config: `~/.trace-explorer/config.yaml`
//! Project-level config: `.trace-explorer/config.yaml` (overrides user fields it sets)
//!
//! Resolution: project config → user config → `TRACE_SERVER_URL` env override → defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_PATH: &str = "tsp/api";
pub const URL_ENV_VAR: &str = "TRACE_SERVER_URL";

/// Endpoint of the remote trace server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceServerConfig {
    /// Base URL the host (backend) uses.
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_api_path")]
    pub api_path: String,
    /// Base URL webviews (frontend) use, when it differs from `url`
    /// (remote or port-forwarded setups).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_url: Option<String>,
}

/// Partial config as found on disk. Absent fields leave the lower layer alone.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigLayer {
    url: Option<String>,
    api_path: Option<String>,
    frontend_url: Option<String>,
}

fn default_url() -> String {
    DEFAULT_SERVER_URL.into()
}

fn default_api_path() -> String {
    DEFAULT_API_PATH.into()
}

impl Default for TraceServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_path: default_api_path(),
            frontend_url: None,
        }
    }
}

/// Path to `~/.trace-explorer/`.
fn dirs_path() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|p| PathBuf::from(p).join(".trace-explorer"))
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME")
            .ok()
            .map(|p| PathBuf::from(p).join(".trace-explorer"))
    }
}

impl TraceServerConfig {
    /// Load user + project config, then apply the env override.
    pub fn load() -> Self {
        let mut config = Self::default();
        if let Some(dir) = dirs_path() {
            config.merge(read_layer(&dir.join("config.yaml")));
        }
        config.merge(read_layer(Path::new(".trace-explorer/config.yaml")));
        config.apply_env();
        config
    }

    /// Load a single explicit file on top of the defaults, then the env override.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let mut config = Self::from_yaml(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let layer: ConfigLayer =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {e}"))?;
        let mut config = Self::default();
        config.merge(layer);
        Ok(config)
    }

    /// Backend URL with the API path appended, the value webviews are told
    /// to build their trace server client from.
    pub fn tsp_client_url(&self) -> String {
        join_url(&self.url, &self.api_path)
    }

    /// URL the webviews connect to.
    pub fn frontend_url(&self) -> &str {
        self.frontend_url.as_deref().unwrap_or(&self.url)
    }

    /// Origins a webview may connect to, for its content security policy.
    pub fn connect_sources(&self) -> Vec<&str> {
        let mut sources = vec![self.url.as_str()];
        if self.frontend_url() != self.url {
            sources.push(self.frontend_url());
        }
        sources
    }

    /// Whether switching to `other` changes anything a webview depends on.
    pub fn endpoint_changed(&self, other: &TraceServerConfig) -> bool {
        self.tsp_client_url() != other.tsp_client_url()
            || self.frontend_url() != other.frontend_url()
    }

    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(url) = layer.url {
            self.url = url;
        }
        if let Some(api_path) = layer.api_path {
            self.api_path = api_path;
        }
        if layer.frontend_url.is_some() {
            self.frontend_url = layer.frontend_url;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(URL_ENV_VAR) {
            if !url.trim().is_empty() {
                self.url = url;
            }
        }
    }
}

fn read_layer(path: &Path) -> ConfigLayer {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            ConfigLayer::default()
        }),
        Err(_) => ConfigLayer::default(),
    }
}

/// Join with exactly one `/` between the parts.
fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}
