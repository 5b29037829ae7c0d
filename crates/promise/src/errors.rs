//! Error types produced by the promise primitive itself.
//!
//! Promise error types are chosen by the caller; they only need to absorb the
//! ways a promise can end without an explicit settlement, via
//! `From<Unsettled>`.

use thiserror::Error;

/// Why a promise was rejected without its producer choosing an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Unsettled {
    /// The [`crate::Sealant`] was dropped before it settled the promise.
    ///
    /// Happens when a completion handler is discarded without being invoked.
    #[error("sealant dropped before the promise was settled")]
    Abandoned,

    /// [`crate::Sealant::resolve`] received neither a value nor an error.
    #[error("completion carried neither a value nor an error")]
    Empty,

    /// A continuation started but never produced an outcome: its body
    /// panicked, or the runtime shut down while it was running.
    ///
    /// Only promises returned by the chaining methods reject this way.
    #[error("continuation was aborted before it produced an outcome")]
    Aborted,
}

/// No tokio runtime was available where one was required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no tokio runtime is available on the current thread")]
pub struct NoRuntime;
