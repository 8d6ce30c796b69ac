//! Try-on backend abstraction layer
//!
//! Defines the trait every image-generation provider adapter implements so
//! the request handler can drive any of them the same way.

use async_trait::async_trait;
use serde_json::Value;

use crate::{credentials::CredentialResolver, credentials::ProviderConfig, error::TryOnResult};

/// What a backend produced for a request
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    /// Raw base64 image, returned as `{ "generatedImage": ... }`
    Image(String),
    /// Provider body returned to the caller unchanged
    Passthrough(Value),
}

/// Trait defining the interface for try-on backends
///
/// Exactly one implementation is active per deployment. Implementations own
/// authentication, payload shaping, the outbound call and normalization of
/// the provider's result or error.
///
/// # Security
///
/// Implementations MUST:
/// - Take credentials only from the [`ProviderConfig`] they are handed
/// - Never return provider error bodies unless they are known to be safe
#[async_trait]
pub trait TryOnBackend: Send + Sync {
    /// Get the backend name for logging and metrics
    fn name(&self) -> &'static str;

    /// Resolve the credentials and endpoint this backend needs
    fn resolve(&self, resolver: &CredentialResolver) -> TryOnResult<ProviderConfig>;

    /// Check the request body is something this backend can send
    fn validate(&self, body: &Value) -> TryOnResult<()>;

    /// Generate the try-on image
    ///
    /// `body` has already passed [`TryOnBackend::validate`].
    async fn generate(&self, config: &ProviderConfig, body: Value) -> TryOnResult<Generated>;
}
