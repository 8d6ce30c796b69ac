//! Gemini direct passthrough
//!
//! Forwards the caller's body verbatim to Gemini's `generateContent` and hands
//! the provider's JSON back unchanged, errors included.

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::{
    config::Config,
    credentials::{CredentialResolver, ProviderConfig},
    error::{TryOnError, TryOnResult},
    proxy::provider::{Generated, TryOnBackend},
};

/// Default Gemini API host
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini passthrough backend
pub struct GeminiBackend {
    client: reqwest::Client,
    model: String,
    forward_errors: bool,
}

impl GeminiBackend {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            model: config.gemini_model.clone(),
            forward_errors: config.gemini_forward_errors,
        }
    }

    fn url(&self, base: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", base, self.model)
    }
}

#[async_trait]
impl TryOnBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn resolve(&self, resolver: &CredentialResolver) -> TryOnResult<ProviderConfig> {
        Ok(ProviderConfig {
            credential: resolver.credential(&["GEMINI_API_KEY", "VITE_GEMINI_API_KEY"])?,
            endpoint: resolver.optional("GEMINI_API_URL"),
        })
    }

    fn validate(&self, body: &Value) -> TryOnResult<()> {
        if body.is_object() {
            Ok(())
        } else {
            Err(TryOnError::InvalidInput(
                "Request body must be a JSON object.".to_string(),
            ))
        }
    }

    #[instrument(skip(self, config, body), fields(model = %self.model))]
    async fn generate(&self, config: &ProviderConfig, body: Value) -> TryOnResult<Generated> {
        let base = config.endpoint.as_deref().unwrap_or(DEFAULT_GEMINI_API_URL);
        let url = self.url(base);

        debug!(url = %url, "Forwarding request to Gemini");

        // The key travels in the query string, so strip URLs from errors
        let response = self
            .client
            .post(&url)
            .query(&[("key", config.credential.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!(url = %url, error = %e, "Failed to reach Gemini");
                TryOnError::Transport(e)
            })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        debug!(status = %status, "Received response from Gemini");

        let text = response
            .text()
            .await
            .map_err(|e| TryOnError::Transport(e.without_url()))?;
        let data: Value = serde_json::from_str(&text).map_err(|e| {
            TryOnError::ResponseShape(format!("Gemini returned non-JSON body ({}): {}", status, e))
        })?;

        if !status.is_success() {
            if self.forward_errors {
                return Err(TryOnError::ProviderForwarded { status, body: data });
            }
            return Err(TryOnError::ModelFailed(format!(
                "Gemini error {}: {}",
                status, data
            )));
        }

        Ok(Generated::Passthrough(data))
    }
}
