//! Configuration management for the try-on relay
//!
//! Two layers live here:
//! - [`Settings`], an immutable snapshot of the process environment taken once
//!   at startup. It is the only place provider secrets are read from.
//! - [`Config`], the server settings parsed out of that snapshot.

use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Read-only snapshot of process-wide configuration
#[derive(Clone, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    /// Snapshot the current process environment
    pub fn from_env() -> Self {
        Self::from_os_pairs(env::vars_os())
    }

    /// Build settings from raw OS pairs. Keys or values that are not valid
    /// UTF-8 are skipped.
    pub fn from_os_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self {
            values: pairs
                .into_iter()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Build settings from explicit key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a value. Empty or whitespace-only values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }
}

// Values may be secrets: only the keys are shown
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Settings").field("keys", &keys).finish()
    }
}

/// Which provider adapter this deployment runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Body forwarded verbatim to Gemini's generateContent
    Gemini,
    /// Positional REST endpoint with bearer auth
    Positional,
    /// Gradio-style space driven through named parameters
    Space,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Gemini => "gemini",
            BackendKind::Positional => "positional",
            BackendKind::Space => "space",
        }
    }
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(BackendKind::Gemini),
            "positional" => Ok(BackendKind::Positional),
            "space" => Ok(BackendKind::Space),
            other => bail!(
                "Unknown TRYON_BACKEND '{}' (expected gemini, positional or space)",
                other
            ),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Provider adapter selected for this deployment
    pub backend: BackendKind,

    /// Maximum accepted request body (two base64 images)
    pub max_body_bytes: usize,

    pub log_format: LogFormat,

    /// Gemini model used by the passthrough backend
    pub gemini_model: String,
    /// Hand Gemini's own error bodies back to callers
    pub gemini_forward_errors: bool,
}

impl Config {
    /// Load configuration from a settings snapshot
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            host: settings.get_or("TRYON_HOST", "0.0.0.0").to_string(),
            port: settings
                .get_or("TRYON_PORT", "8080")
                .parse()
                .context("Invalid TRYON_PORT")?,

            backend: settings
                .get_or("TRYON_BACKEND", "gemini")
                .parse()
                .context("Invalid TRYON_BACKEND")?,

            max_body_bytes: settings
                .get_or("TRYON_MAX_BODY_BYTES", "26214400")
                .parse()
                .context("Invalid TRYON_MAX_BODY_BYTES")?,

            log_format: match settings.get_or("TRYON_LOG_FORMAT", "pretty") {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },

            gemini_model: settings
                .get_or("GEMINI_MODEL", "gemini-2.5-flash-image-preview")
                .to_string(),
            gemini_forward_errors: !matches!(
                settings
                    .get_or("GEMINI_FORWARD_ERRORS", "true")
                    .to_ascii_lowercase()
                    .as_str(),
                "false" | "0"
            ),
        })
    }
}
