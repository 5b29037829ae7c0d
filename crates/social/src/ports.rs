//! Port trait for the external request-execution primitive.
//!
//! The social platform client library owns transport, authentication, signing
//! and timeouts. This crate only needs it to run a prepared request once and
//! report the outcome through a single callback.

use crate::{RawPayload, ResponseMetadata, SocialRequest, TransportError};

/// The callback a [`RequestPerformer`] invokes when a request finishes.
///
/// Receives `(payload, metadata, error)`. Being `FnOnce`, it can run at most
/// once; dropping it without calling it counts as a failed completion.
pub type CompletionHandler =
    Box<dyn FnOnce(Option<RawPayload>, Option<ResponseMetadata>, Option<TransportError>) + Send>;

/// Executes prepared social requests asynchronously.
///
/// Implementations must return from [`perform`](Self::perform) without
/// waiting for the request, and invoke `on_complete` later from whatever
/// context finishes the work. Stored behind `Arc<dyn RequestPerformer>` by the
/// adapter.
pub trait RequestPerformer: Send + Sync {
    /// Starts one execution of `request` and reports its outcome to `on_complete`.
    fn perform(&self, request: &SocialRequest, on_complete: CompletionHandler);
}
