//! Serialisable fixture format.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use social::{Endpoint, TransportError};

/// A set of recorded outcomes, one per endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayFixture {
    #[serde(default)]
    pub recordings: Vec<Recording>,
}

impl ReplayFixture {
    /// Parses a fixture document.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The outcome served for one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recording {
    pub endpoint: Endpoint,
    /// Latency to simulate before completing, in milliseconds.
    #[serde(default)]
    pub delay_ms: u64,
    pub outcome: RecordedOutcome,
}

/// How the performer completes a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordedOutcome {
    /// Deliver `body` serialised as compact JSON.
    Json {
        #[serde(default = "default_status")]
        status: u16,
        body: Value,
    },

    /// Deliver `text` byte-for-byte, whether or not it is valid JSON.
    Raw {
        #[serde(default = "default_status")]
        status: u16,
        text: String,
    },

    /// Report `error`, optionally with a partial payload alongside it.
    Failure {
        error: TransportError,
        #[serde(default)]
        text: Option<String>,
    },

    /// Invoke the handler with neither payload nor error.
    Empty,

    /// Drop the handler without invoking it.
    Dropped,
}

fn default_status() -> u16 {
    200
}
