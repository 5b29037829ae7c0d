//! Request and response value types.
//!
//! A [`SocialRequest`] is built by the caller and handed to a
//! [`crate::RequestPerformer`]; the adapter never mutates it. The performer
//! answers with a [`RawPayload`] and, optionally, [`ResponseMetadata`].

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{Endpoint, RequestId, ServiceType};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// HTTP method of a social API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Post,
    Delete,
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------

/// A fully prepared social API call.
///
/// Credentials and signing are the performer's concern; this type carries only
/// what identifies the call. Each request gets a fresh [`RequestId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialRequest {
    id: RequestId,
    service: ServiceType,
    method: RequestMethod,
    endpoint: Endpoint,
    parameters: BTreeMap<String, String>,
}

impl SocialRequest {
    /// Creates a request with no parameters.
    pub fn new(service: ServiceType, method: RequestMethod, endpoint: Endpoint) -> Self {
        Self {
            id: RequestId::new_random(),
            service,
            method,
            endpoint,
            parameters: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a request parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn service(&self) -> &ServiceType {
        &self.service
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the request parameters in key order.
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// The immutable response body returned by a successful request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawPayload(Vec<u8>);

impl RawPayload {
    /// Wraps response bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the payload and returns the owned bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for RawPayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for RawPayload {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<String> for RawPayload {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}

impl From<&str> for RawPayload {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for RawPayload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ---------------------------------------------------------------------------

/// Metadata the performer may report alongside a payload.
///
/// Header names are stored lowercased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// HTTP status code reported by the service.
    pub status: u16,
    /// Response headers, keyed by lowercased name.
    pub headers: BTreeMap<String, String>,
    /// When the performer received the response.
    pub received_at: Timestamp,
}

impl ResponseMetadata {
    /// Creates metadata for `status`, stamped with the current time.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            received_at: Timestamp::now(),
        }
    }

    /// Adds a header. The name is lowercased.
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Looks up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ---------------------------------------------------------------------------

/// A payload together with whatever metadata the performer reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub payload: RawPayload,
    pub metadata: Option<ResponseMetadata>,
}

impl RawResponse {
    pub fn new(payload: RawPayload, metadata: Option<ResponseMetadata>) -> Self {
        Self { payload, metadata }
    }

    /// Returns the reported status code, if any metadata was supplied.
    pub fn status(&self) -> Option<u16> {
        self.metadata.as_ref().map(|m| m.status)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// The UTC instant a response was received, logged with every completion.
///
/// Displays as RFC 3339 with millisecond precision, e.g.
/// `2024-05-01T12:00:00.250Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}
