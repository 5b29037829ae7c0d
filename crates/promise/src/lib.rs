//! Single-assignment promise primitive.
//!
//! A [`Promise`] starts pending and settles exactly once, either fulfilled with
//! a value or rejected with an error. The producer side is a [`Sealant`]; every
//! settling method consumes it, so a second settlement cannot be expressed.
//! Dropping a sealant without settling rejects the promise instead of leaving
//! it pending.
//!
//! Continuations attached with [`Promise::then_on`], [`Promise::recover_on`]
//! and [`Promise::finally_on`] are scheduled eagerly on a designated
//! [`Executor`]: the chained promise settles as soon as the parent does,
//! whether or not anyone is awaiting it yet. [`Promise::when`] and
//! [`Promise::join`] aggregate several promises.
//!
//! ## Architectural Layer
//!
//! **Primitive.** No domain knowledge lives here. The `social` crate builds its
//! callback-to-promise adapter on top of these types.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`promise`] | [`Promise`], [`Sealant`] |
//! | [`executor`] | [`Executor`], [`ExecutionMode`] |
//! | [`errors`] | [`Unsettled`], [`NoRuntime`] |

pub mod errors;
pub mod executor;
pub mod promise;

pub use errors::{NoRuntime, Unsettled};
pub use executor::{ExecutionMode, Executor};
pub use promise::{Promise, Sealant};
