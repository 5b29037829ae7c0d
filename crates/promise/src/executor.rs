//! Designated execution context for promise continuations.

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use crate::NoRuntime;

/// Where a continuation body runs once its parent promise fulfills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// On tokio's blocking thread pool. Suited to CPU-bound work such as
    /// payload decoding, which must not occupy an async worker.
    #[default]
    Blocking,
    /// Inline on the runtime worker task that observed the parent settle.
    Task,
}

/// A tokio runtime handle paired with an [`ExecutionMode`].
///
/// Cloning is cheap; clones schedule onto the same runtime.
#[derive(Debug, Clone)]
pub struct Executor {
    handle: Handle,
    mode: ExecutionMode,
}

impl Executor {
    /// Creates an executor that schedules onto `handle`.
    pub fn new(handle: Handle, mode: ExecutionMode) -> Self {
        Self { handle, mode }
    }

    /// Creates an executor bound to the runtime the caller is running in.
    ///
    /// Returns [`NoRuntime`] when called outside a tokio runtime.
    pub fn current(mode: ExecutionMode) -> Result<Self, NoRuntime> {
        Handle::try_current()
            .map(|handle| Self::new(handle, mode))
            .map_err(|_| NoRuntime)
    }

    /// Returns the runtime handle continuations are spawned on.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Returns the configured [`ExecutionMode`].
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Runs `f` according to the configured mode.
    ///
    /// Returns `None` if the body panicked or the blocking pool refused the job.
    pub(crate) async fn run<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        match self.mode {
            ExecutionMode::Task => Some(f()),
            ExecutionMode::Blocking => match self.handle.spawn_blocking(f).await {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(error = %err, "Promise continuation did not complete");
                    None
                }
            },
        }
    }
}
