//! Hosted space backend
//!
//! Talks to a Gradio-style space in two steps:
//! 1. Open a session: fetch the space's `/info` to learn the ordered
//!    parameter list of each named endpoint.
//! 2. Predict: resolve a named-parameter call into that order and `POST` it
//!    to `/run/<endpoint>`.
//!
//! Both steps form one failure unit. Whatever goes wrong, the caller sees a
//! single model failure.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    credentials::{CredentialResolver, ProviderConfig},
    error::{TryOnError, TryOnResult},
    models::{first_image, to_data_uri, TryOnRequest},
    proxy::provider::{Generated, TryOnBackend},
};

/// Space used when `TRYON_SPACE_URL` is not set
pub const DEFAULT_SPACE_URL: &str = "https://yisol-idm-vton.hf.space";
/// Named endpoint that performs the try-on
pub const TRYON_ENDPOINT: &str = "/tryon";
/// Garment description sent with every call
pub const GARMENT_DESCRIPTION: &str = "A piece of clothing";

/// One declared endpoint parameter
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterInfo {
    pub parameter_name: String,
    #[serde(default)]
    pub parameter_has_default: bool,
    #[serde(default)]
    pub parameter_default: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointInfo {
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
}

/// Body of the space's `/info`
#[derive(Debug, Clone, Deserialize)]
pub struct SpaceInfo {
    #[serde(default)]
    pub named_endpoints: HashMap<String, EndpointInfo>,
}

/// A prediction described by parameter name
#[derive(Debug, Clone)]
pub struct NamedCall {
    pub endpoint: &'static str,
    pub params: Vec<(&'static str, Value)>,
}

impl NamedCall {
    fn tryon(request: &TryOnRequest) -> Self {
        Self {
            endpoint: TRYON_ENDPOINT,
            params: vec![
                ("person_image", Value::String(to_data_uri(&request.person_image))),
                ("garment_image", Value::String(to_data_uri(&request.clothing_image))),
                ("garment_description", Value::String(GARMENT_DESCRIPTION.to_string())),
            ],
        }
    }

    /// Lay out the named values in the order the endpoint declares.
    ///
    /// Parameters not supplied fall back to their declared default. A
    /// supplied name the endpoint does not declare is rejected.
    pub fn positional(&self, endpoint: &EndpointInfo) -> TryOnResult<Vec<Value>> {
        if let Some((name, _)) = self
            .params
            .iter()
            .find(|(name, _)| !endpoint.parameters.iter().any(|p| p.parameter_name == *name))
        {
            return Err(TryOnError::ResponseShape(format!(
                "endpoint {} has no parameter '{}'",
                self.endpoint, name
            )));
        }

        endpoint
            .parameters
            .iter()
            .map(|param| {
                match self
                    .params
                    .iter()
                    .find(|(name, _)| *name == param.parameter_name)
                {
                    Some((_, value)) => Ok(value.clone()),
                    None if param.parameter_has_default => Ok(param.parameter_default.clone()),
                    None => Err(TryOnError::ResponseShape(format!(
                        "endpoint {} requires parameter '{}'",
                        self.endpoint, param.parameter_name
                    ))),
                }
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct RunPayload<'a> {
    data: Vec<Value>,
    session_hash: &'a str,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    data: Vec<Value>,
}

/// An open session against a space
pub struct SpaceSession<'a> {
    client: &'a reqwest::Client,
    base_url: &'a str,
    token: &'a str,
    session_hash: String,
    info: SpaceInfo,
}

impl<'a> SpaceSession<'a> {
    /// Open a session by fetching the space's API description
    #[instrument(skip(client, token))]
    pub async fn connect(
        client: &'a reqwest::Client,
        base_url: &'a str,
        token: &'a str,
    ) -> TryOnResult<SpaceSession<'a>> {
        let url = format!("{}/info", base_url);

        let response = client.get(&url).bearer_auth(token).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TryOnError::ModelFailed(format!(
                "space session rejected {}: {}",
                status, text
            )));
        }

        let info: SpaceInfo = response.json().await.map_err(|e| {
            TryOnError::ResponseShape(format!("Failed to parse space info: {}", e))
        })?;

        let session_hash = Uuid::new_v4().simple().to_string();
        debug!(session_hash = %session_hash, endpoints = info.named_endpoints.len(), "Space session opened");

        Ok(Self {
            client,
            base_url,
            token,
            session_hash,
            info,
        })
    }

    /// Run a named prediction and return the output `data` sequence
    #[instrument(skip(self, call), fields(endpoint = call.endpoint, session_hash = %self.session_hash))]
    pub async fn predict(&self, call: &NamedCall) -> TryOnResult<Vec<Value>> {
        let endpoint = self.info.named_endpoints.get(call.endpoint).ok_or_else(|| {
            TryOnError::ResponseShape(format!("space has no endpoint {}", call.endpoint))
        })?;

        let payload = RunPayload {
            data: call.positional(endpoint)?,
            session_hash: &self.session_hash,
        };
        let url = format!("{}/run{}", self.base_url, call.endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TryOnError::ModelFailed(format!(
                "space prediction rejected {}: {}",
                status, text
            )));
        }

        let result: RunResponse = response.json().await.map_err(|e| {
            TryOnError::ResponseShape(format!("Failed to parse prediction result: {}", e))
        })?;

        Ok(result.data)
    }
}

/// Hosted space backend
pub struct SpaceBackend {
    client: reqwest::Client,
}

impl SpaceBackend {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn run(&self, config: &ProviderConfig, request: &TryOnRequest) -> TryOnResult<String> {
        let base_url = config.endpoint.as_deref().unwrap_or(DEFAULT_SPACE_URL);

        let session = SpaceSession::connect(&self.client, base_url, &config.credential).await?;
        let data = session.predict(&NamedCall::tryon(request)).await?;

        first_image(&data)
    }
}

#[async_trait]
impl TryOnBackend for SpaceBackend {
    fn name(&self) -> &'static str {
        "space"
    }

    fn resolve(&self, resolver: &CredentialResolver) -> TryOnResult<ProviderConfig> {
        Ok(ProviderConfig {
            credential: resolver.credential(&["HF_TOKEN"])?,
            endpoint: resolver.optional("TRYON_SPACE_URL"),
        })
    }

    fn validate(&self, body: &Value) -> TryOnResult<()> {
        TryOnRequest::from_body(body).map(|_| ())
    }

    #[instrument(skip(self, config, body))]
    async fn generate(&self, config: &ProviderConfig, body: Value) -> TryOnResult<Generated> {
        let request = TryOnRequest::from_body(&body)?;

        match self.run(config, &request).await {
            Ok(image) => {
                debug!("Space prediction succeeded");
                Ok(Generated::Image(image))
            }
            Err(TryOnError::ModelFailed(detail)) => Err(TryOnError::ModelFailed(detail)),
            Err(other) => Err(TryOnError::ModelFailed(other.to_string())),
        }
    }
}
