//! Errors raised while building a [`crate::ReplayPerformer`].
//!
//! Failures while *serving* a request never appear here: they are delivered to
//! the completion handler as [`social::TransportError`]s.

use std::path::PathBuf;

use promise::NoRuntime;
use thiserror::Error;

/// A replay performer could not be constructed.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The fixture file could not be read.
    #[error("Failed to read fixture file '{}': {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The fixture document is not valid JSON or does not match the fixture
    /// format.
    #[error("Invalid replay fixture: {0}")]
    Fixture(#[from] serde_json::Error),

    /// The performer was built outside a tokio runtime, so it has nowhere to
    /// spawn completions.
    #[error(transparent)]
    NoRuntime(#[from] NoRuntime),
}
