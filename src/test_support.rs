//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::backend::{BackendError, MediaBackend};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;

/// A no-op backend for tests that don't need real API calls.
pub struct NoopBackend;

#[async_trait]
impl MediaBackend for NoopBackend {
    fn name(&self) -> &str {
        "noop"
    }

    async fn get_json(&self, _path: &str) -> Result<Value, BackendError> {
        Ok(Value::Null)
    }

    async fn post_json(&self, _path: &str) -> Result<Value, BackendError> {
        Ok(Value::Null)
    }
}

/// Backend that counts GETs and records how many ran at once.
pub struct CountingBackend {
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl CountingBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaBackend for CountingBackend {
    fn name(&self) -> &str {
        "counting"
    }

    async fn get_json(&self, _path: &str) -> Result<Value, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(json!({"current_track": {"title": "Song A", "status": "playing"}}))
    }

    async fn post_json(&self, _path: &str) -> Result<Value, BackendError> {
        Ok(Value::Null)
    }
}

/// Creates a test App with a NoopBackend and default settings.
pub fn test_app() -> App {
    App::new(Arc::new(NoopBackend))
}

/// Creates a test App whose library cache expires after `ttl`.
pub fn test_app_with_ttl(ttl: Duration) -> App {
    let config = ResolvedConfig {
        cache_ttl: ttl,
        ..Default::default()
    };
    App::from_config(Arc::new(NoopBackend), &config)
}
