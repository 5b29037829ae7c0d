//! Promise-returning access to callback-based social API requests.
//!
//! A social platform client library executes prepared requests and reports the
//! outcome through a single completion callback. This crate wraps that callback
//! in a [`promise::Promise`] and offers variants that decode the response body
//! as a JSON object or a JSON array.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use social::*;
//! # async fn example(performer: Arc<dyn RequestPerformer>) -> Result<(), Box<dyn std::error::Error>> {
//! let adapter = PromiseAdapter::new(performer, &AdapterConfig::default())?;
//! let request = SocialRequest::new(
//!     ServiceType::new("twitter").ok_or("service")?,
//!     RequestMethod::Get,
//!     Endpoint::new("https://api.twitter.com/1.1/users/show.json").ok_or("endpoint")?,
//! )
//! .with_parameter("screen_name", "jack");
//!
//! let user = adapter.fetch_mapping(&request).await?;
//! println!("{}", user["name"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions + adapter.** Transport, authentication, signing,
//! timeouts and retries belong to the [`RequestPerformer`] implementation; this
//! crate never performs I/O itself.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RequestId`, `ServiceType`, `Endpoint`) |
//! | [`types`] | Request and response values (`SocialRequest`, `RawPayload`, `ResponseMetadata`, etc.) |
//! | [`errors`] | `TransportError`, `DecodeError`, `RequestError`, `ConfigError` |
//! | [`ports`] | The `RequestPerformer` trait and its `CompletionHandler` |
//! | [`decode`] | JSON decoding of raw payloads |
//! | [`config`] | `AdapterConfig` |
//! | [`adapter`] | `PromiseAdapter` |

pub mod adapter;
pub mod config;
pub mod decode;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use adapter::PromiseAdapter;
pub use config::AdapterConfig;
pub use decode::{decode_mapping, decode_sequence, decode_typed, JsonMapping, JsonSequence, JsonShape};
pub use errors::{ConfigError, DecodeError, RequestError, TransportError};
pub use identifiers::{Endpoint, RequestId, ServiceType};
pub use ports::{CompletionHandler, RequestPerformer};
pub use types::{RawPayload, RawResponse, RequestMethod, ResponseMetadata, SocialRequest, Timestamp};

pub use promise::{ExecutionMode, Executor, Promise};
