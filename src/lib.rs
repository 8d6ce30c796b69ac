//! Try-on relay - credential-hiding proxy for virtual try-on image generation
//!
//! Accepts one canonical request (a person image and a clothing image),
//! forwards it to the image-generation provider this deployment is configured
//! for, and normalizes whatever comes back into one canonical response.

pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod proxy;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::{BackendKind, Config, Settings};
pub use crate::credentials::{CredentialResolver, ProviderConfig};
pub use crate::error::{TryOnError, TryOnResult};
pub use crate::proxy::{Generated, TryOnBackend};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Reads provider credentials from the startup settings snapshot
    pub resolver: CredentialResolver,
    /// The one backend this deployment runs
    pub backend: Arc<dyn TryOnBackend>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config, settings: Arc<Settings>) -> Result<Self> {
        // No request timeout: calls run as long as the hosting transport allows
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .build()?;

        let backend = proxy::build_backend(http_client, &config);

        Ok(Self::with_backend(config, settings, backend))
    }

    /// Create application state around an already-built backend
    pub fn with_backend(
        config: Config,
        settings: Arc<Settings>,
        backend: Arc<dyn TryOnBackend>,
    ) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            resolver: CredentialResolver::new(settings),
            backend,
        }
    }
}
