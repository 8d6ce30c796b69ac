//! Positional REST backend
//!
//! Sends the two images as data URIs in a fixed-order `data` array together
//! with the try-on mode and the auto-mask/auto-crop flags.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::{
    credentials::{CredentialResolver, ProviderConfig},
    error::{TryOnError, TryOnResult},
    models::{first_image, to_data_uri, TryOnRequest},
    proxy::provider::{Generated, TryOnBackend},
};

/// Mode string the provider expects in position three
pub const TRYON_MODE: &str = "tryon";
/// Let the provider mask the garment region itself
pub const AUTO_MASK: bool = true;
/// Let the provider crop the person image itself
pub const AUTO_CROP: bool = true;

/// Request payload: `[person, clothing, mode, auto_mask, auto_crop]`
#[derive(Debug, Serialize)]
struct PositionalPayload {
    data: (String, String, &'static str, bool, bool),
}

impl PositionalPayload {
    fn new(request: &TryOnRequest) -> Self {
        Self {
            data: (
                to_data_uri(&request.person_image),
                to_data_uri(&request.clothing_image),
                TRYON_MODE,
                AUTO_MASK,
                AUTO_CROP,
            ),
        }
    }
}

/// Provider success body
#[derive(Debug, Deserialize)]
struct PositionalResponse {
    data: Vec<Value>,
}

/// Positional REST backend
pub struct PositionalBackend {
    client: reqwest::Client,
}

impl PositionalBackend {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TryOnBackend for PositionalBackend {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn resolve(&self, resolver: &CredentialResolver) -> TryOnResult<ProviderConfig> {
        Ok(ProviderConfig {
            credential: resolver.credential(&["TRYON_API_TOKEN"])?,
            endpoint: Some(resolver.endpoint("TRYON_API_URL")?),
        })
    }

    fn validate(&self, body: &Value) -> TryOnResult<()> {
        TryOnRequest::from_body(body).map(|_| ())
    }

    #[instrument(skip(self, config, body))]
    async fn generate(&self, config: &ProviderConfig, body: Value) -> TryOnResult<Generated> {
        let request = TryOnRequest::from_body(&body)?;
        let url = config
            .endpoint
            .as_deref()
            .ok_or_else(|| TryOnError::missing_endpoint("TRYON_API_URL"))?;

        debug!(url = %url, "Sending positional try-on request");

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.credential)
            .json(&PositionalPayload::new(&request))
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Failed to reach try-on provider");
                e
            })?;

        let status = response.status();
        debug!(status = %status, "Received response from try-on provider");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<Value>(&text)
                .map(|v| v.to_string())
                .unwrap_or(text);
            error!(status = %status, body = %detail, "Try-on provider rejected request");
            return Err(TryOnError::ModelFailed(format!(
                "provider error {}: {}",
                status, detail
            )));
        }

        let text = response.text().await?;
        let result: PositionalResponse = serde_json::from_str(&text).map_err(|e| {
            TryOnError::ResponseShape(format!("Failed to parse provider response: {}", e))
        })?;

        first_image(&result.data).map(Generated::Image)
    }
}
