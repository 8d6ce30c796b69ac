//! Error types for the try-on relay
//!
//! Every failure a request can hit is a [`TryOnError`]. Nothing past the
//! request handler sees a provider-specific error: each variant knows the
//! status code and `{ "error": ... }` body it turns into.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Body for a provider that failed or refused to generate an image
pub const MODEL_FAILED_MESSAGE: &str = "The AI model failed to process the request.";
/// Body for unexpected failures (network, malformed responses)
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";
/// Body for any method other than POST
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";
/// Body when the provider credential is missing
pub const MISSING_API_KEY_MESSAGE: &str = "API key not configured on the server.";
/// Body when a required provider endpoint is missing
pub const MISSING_ENDPOINT_MESSAGE: &str = "Provider endpoint not configured on the server.";
/// Body when the inbound request exceeds the configured size limit
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body is too large.";

/// Request-level errors
#[derive(Debug, Error)]
pub enum TryOnError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The body was cut off at the configured limit. Holds the reason.
    #[error("Request body rejected: {0}")]
    PayloadTooLarge(String),

    /// Server-side configuration is missing. `message` is user-facing,
    /// `key` names the setting for the log.
    #[error("Configuration error: {key} is not set")]
    Configuration { key: String, message: &'static str },

    #[error("Provider transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider rejected the call or the model could not run. The detail
    /// is logged only.
    #[error("Model failed: {0}")]
    ModelFailed(String),

    /// The provider rejected the call and its body is safe to hand back.
    #[error("Provider returned {status}")]
    ProviderForwarded { status: StatusCode, body: Value },

    #[error("Unexpected provider response: {0}")]
    ResponseShape(String),
}

impl TryOnError {
    pub fn missing_credential(key: impl Into<String>) -> Self {
        TryOnError::Configuration {
            key: key.into(),
            message: MISSING_API_KEY_MESSAGE,
        }
    }

    pub fn missing_endpoint(key: impl Into<String>) -> Self {
        TryOnError::Configuration {
            key: key.into(),
            message: MISSING_ENDPOINT_MESSAGE,
        }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            TryOnError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            TryOnError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TryOnError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            TryOnError::ProviderForwarded { status, .. } => *status,
            TryOnError::Configuration { .. }
            | TryOnError::Transport(_)
            | TryOnError::ModelFailed(_)
            | TryOnError::ResponseShape(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body this error maps to
    pub fn body(&self) -> Value {
        let message = match self {
            TryOnError::ProviderForwarded { body, .. } => return body.clone(),
            TryOnError::MethodNotAllowed => METHOD_NOT_ALLOWED_MESSAGE.to_string(),
            TryOnError::InvalidInput(msg) => msg.clone(),
            TryOnError::PayloadTooLarge(_) => PAYLOAD_TOO_LARGE_MESSAGE.to_string(),
            TryOnError::Configuration { message, .. } => message.to_string(),
            TryOnError::ModelFailed(_) => MODEL_FAILED_MESSAGE.to_string(),
            TryOnError::Transport(_) | TryOnError::ResponseShape(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        json!({ "error": message })
    }

    /// Whether this error is a server-side failure worth a diagnostic record
    pub fn is_server_fault(&self) -> bool {
        !matches!(
            self,
            TryOnError::MethodNotAllowed
                | TryOnError::InvalidInput(_)
                | TryOnError::PayloadTooLarge(_)
        )
    }

    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            TryOnError::MethodNotAllowed => "method_not_allowed",
            TryOnError::InvalidInput(_) => "invalid_input",
            TryOnError::PayloadTooLarge(_) => "payload_too_large",
            TryOnError::Configuration { .. } => "configuration",
            TryOnError::Transport(_) => "transport",
            TryOnError::ModelFailed(_) => "model_failed",
            TryOnError::ProviderForwarded { .. } => "provider_rejected",
            TryOnError::ResponseShape(_) => "response_shape",
        }
    }
}

impl IntoResponse for TryOnError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// Result type alias for convenience
pub type TryOnResult<T> = Result<T, TryOnError>;
