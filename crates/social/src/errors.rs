//! Error taxonomy for social requests.
//!
//! Two families reach callers, and they stay distinguishable:
//!
//! - [`TransportError`]: reported by the [`crate::RequestPerformer`] through
//!   its completion handler. The adapter passes it through verbatim.
//! - [`DecodeError`]: raised by the adapter when a payload is not valid JSON
//!   or not of the expected top-level shape.
//!
//! [`RequestError`] is the union returned by the decoding operations.
//! Nothing here is retried locally; every failure surfaces as a rejected
//! promise.

use promise::{NoRuntime, Unsettled};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::JsonShape;

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// A failure reported by the request performer, or a broken completion.
///
/// Serialisable so recorded failures can be stored in replay fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportError {
    /// The device or host has no usable network connection.
    #[error("Network unavailable: {message}")]
    NetworkUnavailable {
        /// Description supplied by the performer.
        message: String,
    },

    /// The service answered, but with a failure status.
    #[error("Service rejected the request with status {status}: {message}")]
    Service {
        /// HTTP status code returned by the service.
        status: u16,
        /// Description supplied by the performer.
        message: String,
    },

    /// Any other failure the performer chose to report.
    #[error("Request failed: {message}")]
    Other {
        /// Description supplied by the performer.
        message: String,
    },

    /// The performer discarded the completion handler without invoking it.
    #[error("Completion handler was dropped without being invoked")]
    HandlerDropped,

    /// The performer invoked the completion handler with neither a payload
    /// nor an error.
    #[error("Request completed with neither a payload nor an error")]
    EmptyCompletion,
}

impl From<Unsettled> for TransportError {
    fn from(value: Unsettled) -> Self {
        match value {
            // Raw requests have no continuation, so `Aborted` never reaches
            // them; it is folded in with a lost handler.
            Unsettled::Abandoned | Unsettled::Aborted => Self::HandlerDropped,
            Unsettled::Empty => Self::EmptyCompletion,
        }
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// The payload could not be decoded into the requested JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    /// The bytes are not valid JSON, or do not match the requested type.
    #[error("Malformed JSON payload at line {line}, column {column}: {message}")]
    Malformed {
        /// 1-based line of the failure (0 when unknown).
        line: usize,
        /// 1-based column of the failure (0 when unknown).
        column: usize,
        /// Parser description of the failure.
        message: String,
    },

    /// The bytes are valid JSON of a different top-level shape.
    #[error("Expected a JSON {expected} but the payload is a JSON {found}")]
    UnexpectedShape {
        /// The shape the caller asked for.
        expected: JsonShape,
        /// The shape actually present.
        found: JsonShape,
    },

    /// The decode step never produced a result, for example because a
    /// `Deserialize` implementation panicked.
    #[error("Decoding was aborted before it produced a result")]
    Aborted,
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Combined request errors
// ---------------------------------------------------------------------------

/// Failure of a decoding request: either the transport or the decode step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Propagated unchanged from the underlying raw request.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The raw request succeeded but its payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl RequestError {
    /// Returns `true` if the failure came from the performer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the failure came from decoding the payload.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

impl From<Unsettled> for RequestError {
    fn from(value: Unsettled) -> Self {
        match value {
            Unsettled::Aborted => Self::Decode(DecodeError::Aborted),
            other => Self::Transport(other.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// The adapter could not be configured.
///
/// Produced at construction time; an adapter never exists with an invalid
/// configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("Configuration error: {message}")]
    Invalid {
        /// Description of the configuration problem.
        message: String,
    },

    /// The adapter was built outside a tokio runtime.
    #[error(transparent)]
    NoRuntime(#[from] NoRuntime),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsettled_promises_map_to_transport_errors() {
        assert_eq!(
            TransportError::from(Unsettled::Abandoned),
            TransportError::HandlerDropped
        );
        assert_eq!(
            RequestError::from(Unsettled::Empty),
            RequestError::Transport(TransportError::EmptyCompletion)
        );
    }

    #[test]
    fn aborted_continuations_are_decode_failures() {
        let err = RequestError::from(Unsettled::Aborted);
        assert_eq!(err, RequestError::Decode(DecodeError::Aborted));
        assert!(err.is_decode());
        assert_eq!(
            RequestError::from(Unsettled::Abandoned),
            RequestError::Transport(TransportError::HandlerDropped)
        );
    }

    #[test]
    fn transport_errors_round_trip_through_fixture_json() {
        let json = r#"{"kind":"service","status":429,"message":"rate limited"}"#;
        let err: TransportError = serde_json::from_str(json).unwrap();
        assert_eq!(
            err,
            TransportError::Service {
                status: 429,
                message: "rate limited".into()
            }
        );
    }

    #[test]
    fn request_error_keeps_the_transport_message() {
        let err = RequestError::from(TransportError::NetworkUnavailable {
            message: "offline".into(),
        });
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Network unavailable: offline");
    }

    #[test]
    fn serde_json_errors_carry_their_position() {
        let err: DecodeError = serde_json::from_str::<serde_json::Value>("{\n  \"a\": }")
            .unwrap_err()
            .into();
        match err {
            DecodeError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
