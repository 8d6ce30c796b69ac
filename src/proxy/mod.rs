//! Proxy module
//!
//! Provider adapters for image generation and the factory that picks the one
//! this deployment runs.

pub mod gemini;
pub mod logging;
pub mod positional;
pub mod provider;
pub mod space;

use std::sync::Arc;

pub use gemini::GeminiBackend;
pub use positional::PositionalBackend;
pub use provider::{Generated, TryOnBackend};
pub use space::SpaceBackend;

use crate::config::{BackendKind, Config};

/// Build the backend selected by deployment configuration
pub fn build_backend(client: reqwest::Client, config: &Config) -> Arc<dyn TryOnBackend> {
    match config.backend {
        BackendKind::Gemini => Arc::new(GeminiBackend::new(client, config)),
        BackendKind::Positional => Arc::new(PositionalBackend::new(client)),
        BackendKind::Space => Arc::new(SpaceBackend::new(client)),
    }
}
