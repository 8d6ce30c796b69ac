//! Request logging for try-on calls
//!
//! Gives each request a short correlation ID and logs its progress through
//! the backend with elapsed time.

use std::time::Instant;
use tracing::{error, info, warn, Span};
use uuid::Uuid;

use crate::error::TryOnError;

/// Context for tracking a request through the system
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Backend handling this request
    pub backend: &'static str,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(backend: &'static str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            backend,
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Elapsed time in seconds, for metrics
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Log the provider call being issued
    pub fn log_request_start(&self) {
        info!(
            trace_id = %self.trace_id,
            backend = %self.backend,
            "Try-on request started"
        );
    }

    /// Log successful completion
    pub fn log_request_complete(&self) {
        info!(
            trace_id = %self.trace_id,
            backend = %self.backend,
            elapsed_ms = %self.elapsed_ms(),
            "Try-on request completed successfully"
        );
    }

    /// Diagnostic record for a failed request.
    ///
    /// Client errors (bad method, bad input) are not logged, except a body
    /// cut off at the size limit, which is worth a warning.
    pub fn log_error(&self, err: &TryOnError) {
        if let TryOnError::PayloadTooLarge(reason) = err {
            warn!(
                trace_id = %self.trace_id,
                backend = %self.backend,
                reason = %reason,
                "Try-on request body rejected"
            );
            return;
        }
        if !err.is_server_fault() {
            return;
        }
        error!(
            trace_id = %self.trace_id,
            backend = %self.backend,
            kind = err.kind(),
            status = %err.status(),
            elapsed_ms = %self.elapsed_ms(),
            error = %err,
            "Try-on request failed"
        );
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "tryon_request",
            trace_id = %self.trace_id,
            backend = %self.backend,
        )
    }
}
