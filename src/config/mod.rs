//! Session configuration.
//!
//! The single piece of state shared across a client session is the backend
//! base URL. It is created unset at session start, mutated only through
//! [`SessionConfig::set_base_url`], and discarded with the session. Nothing
//! is persisted.
//!
//! Configuration sources, in priority order: explicit setter (CLI flag or
//! user input) > `INFINITALK_BACKEND_URL` environment variable (including
//! values loaded from a `.env` file by the binary).
//!
//! The URL is normalized by trimming whitespace and trailing slashes, and is
//! otherwise taken as-is: a malformed URL surfaces on the first network
//! attempt against it, not here.

use crate::errors::{ClientError, ClientResult};

/// Environment variable holding the backend base URL.
pub const BACKEND_URL_ENV: &str = "INFINITALK_BACKEND_URL";

/// Session-scoped client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    backend_base_url: Option<String>,
}

impl SessionConfig {
    /// Create a configuration with no backend URL set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from the environment.
    ///
    /// Reads [`BACKEND_URL_ENV`]; an absent or empty variable leaves the
    /// URL unset, which is a valid (if not yet usable) configuration.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            config.set_base_url(&url);
        }
        config
    }

    /// Store a backend base URL, normalizing it first.
    ///
    /// Normalization trims surrounding whitespace and then every trailing
    /// `/`, so `https://abc-123.ngrok-free.app/` is stored as
    /// `https://abc-123.ngrok-free.app`. An input that is empty after
    /// normalization leaves the URL unset.
    pub fn set_base_url(&mut self, raw: &str) {
        let normalized = raw.trim().trim_end_matches('/');
        if normalized.is_empty() {
            self.backend_base_url = None;
        } else {
            self.backend_base_url = Some(normalized.to_string());
        }
    }

    /// The active base URL, or a configuration error if none is set.
    ///
    /// Both clients call this before doing any I/O, so a missing URL fails
    /// closed with zero network calls.
    pub fn base_url(&self) -> ClientResult<&str> {
        self.backend_base_url.as_deref().ok_or_else(|| {
            ClientError::Configuration(
                "backend URL is not configured; set it or export INFINITALK_BACKEND_URL"
                    .to_string(),
            )
        })
    }

    /// Whether a base URL has been configured.
    pub fn is_configured(&self) -> bool {
        self.backend_base_url.is_some()
    }
}
