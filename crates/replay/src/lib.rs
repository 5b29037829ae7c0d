//! Fixture-backed social request performer.
//!
//! [`ReplayPerformer`] implements [`social::RequestPerformer`] by serving
//! recorded outcomes keyed by endpoint. Completions are delivered from a
//! spawned tokio task, never on the caller's stack, matching how a real client
//! library reports back from its own background context.
//!
//! Fixtures are JSON documents:
//!
//! ```json
//! {
//!   "recordings": [
//!     {
//!       "endpoint": "https://api.twitter.com/1.1/users/show.json",
//!       "delay_ms": 10,
//!       "outcome": { "kind": "json", "status": 200, "body": { "id": "42" } }
//!     },
//!     {
//!       "endpoint": "https://api.twitter.com/1.1/statuses/home_timeline.json",
//!       "outcome": {
//!         "kind": "failure",
//!         "error": { "kind": "network_unavailable", "message": "offline" }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Used for offline runs and tests. The [`social`] crate
//! sees only [`social::RequestPerformer`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`fixture`] | `ReplayFixture`, `Recording`, `RecordedOutcome` |
//! | [`performer`] | `ReplayPerformer` |
//! | [`errors`] | `ReplayError` |

pub mod errors;
pub mod fixture;
pub mod performer;

pub use errors::ReplayError;
pub use fixture::{RecordedOutcome, Recording, ReplayFixture};
pub use performer::ReplayPerformer;
