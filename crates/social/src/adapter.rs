//! Callback-to-promise adapter over a [`RequestPerformer`].
//!
//! Every operation triggers exactly one [`RequestPerformer::perform`] call and
//! returns without waiting. The completion handler settles a [`Promise`]; the
//! decoding operations chain a decode step onto that promise, run on the
//! adapter's designated [`Executor`].
//!
//! | Operation | Fulfils with | Rejects with |
//! |-----------|--------------|--------------|
//! | [`PromiseAdapter::fetch_raw`] | [`RawPayload`] | [`TransportError`] |
//! | [`PromiseAdapter::fetch_response`] | [`RawResponse`] | [`TransportError`] |
//! | [`PromiseAdapter::fetch_mapping`] | [`JsonMapping`] | [`RequestError`] |
//! | [`PromiseAdapter::fetch_sequence`] | [`JsonSequence`] | [`RequestError`] |
//! | [`PromiseAdapter::fetch_json`] | any `DeserializeOwned` | [`RequestError`] |

use std::sync::Arc;

use promise::{Executor, Promise};
use serde::de::DeserializeOwned;
use tracing::field::display;
use tracing::{debug, warn};

use crate::decode::{decode_mapping, decode_sequence, decode_typed};
use crate::{
    AdapterConfig, ConfigError, DecodeError, JsonMapping, JsonSequence, RawPayload, RawResponse,
    RequestError, RequestId, RequestPerformer, ResponseMetadata, SocialRequest, TransportError,
};

/// Wraps a [`RequestPerformer`] so each request yields a [`Promise`].
///
/// Cheap to clone; clones share the performer and executor. Requests are
/// independent: no state is shared between invocations, nothing is retried and
/// nothing is cached.
#[derive(Clone)]
pub struct PromiseAdapter {
    performer: Arc<dyn RequestPerformer>,
    executor: Executor,
}

impl PromiseAdapter {
    /// Creates an adapter whose decode step runs on the current tokio runtime,
    /// in the mode chosen by `config`.
    ///
    /// Returns [`ConfigError::NoRuntime`] when called outside a runtime.
    pub fn new(
        performer: Arc<dyn RequestPerformer>,
        config: &AdapterConfig,
    ) -> Result<Self, ConfigError> {
        let executor = Executor::current(config.decode_mode)?;
        Ok(Self::with_executor(performer, executor))
    }

    /// Creates an adapter that decodes on an explicit executor.
    pub fn with_executor(performer: Arc<dyn RequestPerformer>, executor: Executor) -> Self {
        Self {
            performer,
            executor,
        }
    }

    /// Returns the executor the decode step runs on.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Executes `request` once and resolves with its raw payload.
    ///
    /// Fulfils with exactly the bytes the performer delivered when it reports
    /// no error. Rejects with exactly the performer's error otherwise, even if
    /// a payload accompanied it.
    pub fn fetch_raw(&self, request: &SocialRequest) -> Promise<RawPayload, TransportError> {
        self.trigger(request, |payload, _| payload)
    }

    /// Like [`fetch_raw`](Self::fetch_raw), but keeps the response metadata
    /// (status code, headers) reported by the performer.
    pub fn fetch_response(&self, request: &SocialRequest) -> Promise<RawResponse, TransportError> {
        self.trigger(request, RawResponse::new)
    }

    /// Executes `request` once and decodes the payload as a JSON object.
    pub fn fetch_mapping(&self, request: &SocialRequest) -> Promise<JsonMapping, RequestError> {
        let request_id = request.id();
        self.fetch_raw(request)
            .then_on(&self.executor, move |payload| {
                decoded(request_id, decode_mapping(payload.as_bytes()))
            })
    }

    /// Executes `request` once and decodes the payload as a JSON array.
    pub fn fetch_sequence(&self, request: &SocialRequest) -> Promise<JsonSequence, RequestError> {
        let request_id = request.id();
        self.fetch_raw(request)
            .then_on(&self.executor, move |payload| {
                decoded(request_id, decode_sequence(payload.as_bytes()))
            })
    }

    /// Executes `request` once and deserialises the payload into `T`.
    pub fn fetch_json<T>(&self, request: &SocialRequest) -> Promise<T, RequestError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let request_id = request.id();
        self.fetch_raw(request)
            .then_on(&self.executor, move |payload| {
                decoded(request_id, decode_typed::<T>(payload.as_bytes()))
            })
    }

    fn trigger<T, F>(&self, request: &SocialRequest, build: F) -> Promise<T, TransportError>
    where
        T: Send + 'static,
        F: FnOnce(RawPayload, Option<ResponseMetadata>) -> T + Send + 'static,
    {
        let request_id = request.id();

        debug!(
            request_id = %request_id,
            service = %request.service(),
            method = %request.method(),
            endpoint = %request.endpoint(),
            parameter_count = request.parameters().len(),
            "Triggering social request"
        );

        Promise::with_sealant(|sealant| {
            self.performer.perform(
                request,
                Box::new(
                    move |payload: Option<RawPayload>,
                          metadata: Option<ResponseMetadata>,
                          error: Option<TransportError>| {
                        match (&payload, &error) {
                            (_, Some(err)) => {
                                warn!(request_id = %request_id, error = %err, "Social request failed");
                            }
                            (Some(bytes), None) => {
                                debug!(
                                    request_id = %request_id,
                                    bytes = bytes.len(),
                                    status = metadata.as_ref().map(|m| m.status),
                                    received_at = metadata.as_ref().map(|m| display(m.received_at)),
                                    "Social request completed"
                                );
                            }
                            (None, None) => {
                                warn!(request_id = %request_id, "Social request completed with nothing");
                            }
                        }
                        sealant.resolve(payload.map(|p| build(p, metadata)), error);
                    },
                ),
            );
        })
    }
}

impl std::fmt::Debug for PromiseAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromiseAdapter")
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

fn decoded<T>(request_id: RequestId, result: Result<T, DecodeError>) -> Result<T, RequestError> {
    result
        .inspect_err(|err| {
            warn!(request_id = %request_id, error = %err, "Social response could not be decoded");
        })
        .map_err(RequestError::from)
}
