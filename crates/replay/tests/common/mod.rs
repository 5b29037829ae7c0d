//! Shared helpers for replay integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use social::{AdapterConfig, Endpoint, PromiseAdapter, RequestMethod, ServiceType, SocialRequest};
use tracing_subscriber::EnvFilter;

use replay::ReplayPerformer;

/// Installs a test-writer subscriber once per binary. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn request(endpoint: &str) -> SocialRequest {
    SocialRequest::new(
        ServiceType::new("twitter").expect("service type"),
        RequestMethod::Get,
        Endpoint::new(endpoint).expect("endpoint"),
    )
}

pub fn adapter(performer: Arc<ReplayPerformer>) -> PromiseAdapter {
    PromiseAdapter::new(performer, &AdapterConfig::default()).expect("adapter")
}
