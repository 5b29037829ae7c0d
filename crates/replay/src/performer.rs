//! [`ReplayPerformer`]: completes requests from recorded outcomes.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use promise::NoRuntime;
use social::{
    CompletionHandler, Endpoint, RawPayload, RequestPerformer, ResponseMetadata, SocialRequest,
    TransportError,
};
use tokio::runtime::Handle;
use tracing::debug;

use crate::{RecordedOutcome, Recording, ReplayError, ReplayFixture};

/// A [`RequestPerformer`] that replays recorded outcomes.
///
/// Requests to endpoints with no recording complete with a 404
/// [`TransportError::Service`]. A recording may be served any number of times.
#[derive(Debug)]
pub struct ReplayPerformer {
    handle: Handle,
    recordings: HashMap<Endpoint, Recording>,
    performed: AtomicUsize,
}

impl ReplayPerformer {
    /// Creates an empty performer that completes requests on `handle`.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            recordings: HashMap::new(),
            performed: AtomicUsize::new(0),
        }
    }

    /// Creates an empty performer bound to the current tokio runtime.
    pub fn current() -> Result<Self, ReplayError> {
        let handle = Handle::try_current().map_err(|_| NoRuntime)?;
        Ok(Self::new(handle))
    }

    /// Creates a performer bound to the current runtime and loads `fixture`.
    pub fn from_fixture(fixture: ReplayFixture) -> Result<Self, ReplayError> {
        let mut performer = Self::current()?;
        for recording in fixture.recordings {
            performer.insert(recording);
        }
        Ok(performer)
    }

    /// Parses a JSON fixture document and loads it.
    pub fn from_fixture_json(json: &str) -> Result<Self, ReplayError> {
        Self::from_fixture(ReplayFixture::from_json_str(json)?)
    }

    /// Reads a JSON fixture file and loads it.
    pub fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_fixture_json(&json)
    }

    /// Serves `outcome` for `endpoint`, replacing any earlier recording.
    #[must_use]
    pub fn record(mut self, endpoint: Endpoint, outcome: RecordedOutcome) -> Self {
        self.insert(Recording {
            endpoint,
            delay_ms: 0,
            outcome,
        });
        self
    }

    /// Adds a recording, replacing any earlier one for the same endpoint.
    pub fn insert(&mut self, recording: Recording) {
        self.recordings.insert(recording.endpoint.clone(), recording);
    }

    /// Returns how many times [`RequestPerformer::perform`] has been called.
    pub fn perform_count(&self) -> usize {
        self.performed.load(Ordering::SeqCst)
    }
}

impl RequestPerformer for ReplayPerformer {
    fn perform(&self, request: &SocialRequest, on_complete: CompletionHandler) {
        self.performed.fetch_add(1, Ordering::SeqCst);
        let recording = self.recordings.get(request.endpoint()).cloned();
        let request_id = request.id();
        let endpoint = request.endpoint().clone();

        self.handle.spawn(async move {
            let Some(recording) = recording else {
                debug!(request_id = %request_id, endpoint = %endpoint, "No recording for endpoint");
                on_complete(
                    None,
                    Some(ResponseMetadata::new(404)),
                    Some(TransportError::Service {
                        status: 404,
                        message: format!("no recording for {endpoint}"),
                    }),
                );
                return;
            };

            if recording.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(recording.delay_ms)).await;
            }
            debug!(request_id = %request_id, endpoint = %endpoint, "Replaying recorded outcome");
            complete(recording.outcome, on_complete);
        });
    }
}

fn complete(outcome: RecordedOutcome, on_complete: CompletionHandler) {
    match outcome {
        RecordedOutcome::Json { status, body } => on_complete(
            Some(RawPayload::from(body.to_string())),
            Some(ResponseMetadata::new(status).with_header("content-type", "application/json")),
            None,
        ),
        RecordedOutcome::Raw { status, text } => on_complete(
            Some(RawPayload::from(text)),
            Some(ResponseMetadata::new(status)),
            None,
        ),
        RecordedOutcome::Failure { error, text } => {
            let status = match &error {
                TransportError::Service { status, .. } => Some(ResponseMetadata::new(*status)),
                _ => None,
            };
            on_complete(text.map(RawPayload::from), status, Some(error));
        }
        RecordedOutcome::Empty => on_complete(None, None, None),
        RecordedOutcome::Dropped => drop(on_complete),
    }
}
