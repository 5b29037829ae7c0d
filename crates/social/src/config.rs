//! Adapter configuration.

use promise::ExecutionMode;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Settings for a [`crate::PromiseAdapter`].
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    /// Where payload decoding runs. Defaults to the blocking pool so decoding
    /// never occupies an async worker.
    pub decode_mode: ExecutionMode,
}

impl AdapterConfig {
    /// Parses a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|err| ConfigError::Invalid {
            message: err.to_string(),
        })
    }
}
