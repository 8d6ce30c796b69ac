//! Credential resolution
//!
//! Provider secrets and endpoints are read from the injected [`Settings`]
//! snapshot every time a request needs them. Missing values fail fast and
//! are never replaced by a default.

use std::sync::Arc;

use crate::{
    config::Settings,
    error::{TryOnError, TryOnResult},
};

/// Credentials and endpoint for one provider call
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Opaque secret used to authenticate with the provider
    pub credential: String,
    /// Provider endpoint. `None` means the adapter's fixed default.
    pub endpoint: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("credential", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Reads provider configuration out of process-wide settings
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    settings: Arc<Settings>,
}

impl CredentialResolver {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Credential under the first of `keys` that is set.
    ///
    /// Later keys are legacy aliases of the first.
    pub fn credential(&self, keys: &[&str]) -> TryOnResult<String> {
        keys.iter()
            .find_map(|key| self.settings.get(key))
            .map(str::to_string)
            .ok_or_else(|| TryOnError::missing_credential(keys.join(" or ")))
    }

    /// Full endpoint URL that must be configured. Used exactly as set.
    pub fn endpoint(&self, key: &str) -> TryOnResult<String> {
        self.settings
            .get(key)
            .map(str::to_string)
            .ok_or_else(|| TryOnError::missing_endpoint(key))
    }

    /// Optional base URL override, without its trailing `/`
    pub fn optional(&self, key: &str) -> Option<String> {
        self.settings
            .get(key)
            .map(|value| value.trim_end_matches('/').to_string())
    }
}
