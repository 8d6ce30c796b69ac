//! Virtual try-on endpoint
//!
//! `/api/generate-tryon` accepts every method so that the 405 is produced
//! here, by the same normalization path as every other outcome.

use std::sync::Arc;

use axum::{
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::Instrument;

use crate::{
    error::{TryOnError, TryOnResult},
    proxy::{logging::RequestContext, Generated},
    routes::metrics::record_request,
    AppState,
};

/// Axum handler for `/api/generate-tryon`
pub async fn generate_tryon(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let (status, body) = handle(&state, &method, body.map_err(body_error)).await;
    (status, Json(body)).into_response()
}

/// A body that could not be buffered, usually because it hit the size limit
fn body_error(rejection: BytesRejection) -> TryOnError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TryOnError::PayloadTooLarge(rejection.body_text())
    } else {
        TryOnError::InvalidInput("Request body could not be read.".to_string())
    }
}

/// Turn one inbound request into a status code and JSON body.
///
/// Never fails: every error, including a body that could not be read, is
/// normalized into its response here.
pub async fn handle(
    state: &AppState,
    method: &Method,
    body: Result<Bytes, TryOnError>,
) -> (StatusCode, Value) {
    let backend = state.backend.name();
    let ctx = RequestContext::new(backend);

    let outcome = process(state, method, body, &ctx)
        .instrument(ctx.create_span())
        .await;
    let duration = ctx.elapsed_secs();

    match outcome {
        Ok(generated) => {
            ctx.log_request_complete();
            record_request(backend, "success", duration);

            match generated {
                Generated::Image(image) => (StatusCode::OK, json!({ "generatedImage": image })),
                Generated::Passthrough(body) => (StatusCode::OK, body),
            }
        }
        Err(err) => {
            ctx.log_error(&err);
            record_request(backend, err.kind(), duration);
            (err.status(), err.body())
        }
    }
}

async fn process(
    state: &AppState,
    method: &Method,
    body: Result<Bytes, TryOnError>,
    ctx: &RequestContext,
) -> TryOnResult<Generated> {
    if *method != Method::POST {
        return Err(TryOnError::MethodNotAllowed);
    }
    let body = body?;

    let backend = state.backend.as_ref();

    // Configuration comes before input checks: a misconfigured server
    // answers 500 whatever JSON it is sent.
    let config = backend.resolve(&state.resolver)?;

    let body: Value = serde_json::from_slice(&body)
        .map_err(|_| TryOnError::InvalidInput("Request body must be valid JSON.".to_string()))?;
    backend.validate(&body)?;

    ctx.log_request_start();
    backend.generate(&config, body).await
}
