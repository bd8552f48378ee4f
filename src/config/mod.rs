//! Client configuration
//!
//! Configuration is deliberately small: the remote API base URL and the
//! path of the persisted session file. Both have defaults suitable for the
//! hosted deployment; a YAML file or environment variables override them.

use crate::core::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hosted deployment of the remote API
pub const DEFAULT_BASE_URL: &str = "https://mediplus.runasp.net";

/// Session file written next to the process working directory
pub const DEFAULT_SESSION_FILE: &str = ".mediplus-session.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL all entity routes are joined onto
    pub base_url: String,

    /// Path of the JSON file the current session is persisted to
    pub session_file: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_file: DEFAULT_SESSION_FILE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|err| {
            ApiError::Config(format!("could not read {}: {}", path.display(), err))
        })?;
        Self::from_yaml_str(&body)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(body: &str) -> ApiResult<Self> {
        let config: Self = serde_yaml::from_str(body)?;
        Ok(config)
    }

    /// Build configuration from defaults, then apply `MEDIPLUS_BASE_URL`
    /// and `MEDIPLUS_SESSION_FILE` from the environment when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("MEDIPLUS_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(session_file) = std::env::var("MEDIPLUS_SESSION_FILE") {
            config.session_file = session_file;
        }
        config
    }
}
