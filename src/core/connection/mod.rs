//! Connection manager.
//!
//! Owns the lightweight readiness probe against the configured backend. The
//! probe deliberately distinguishes three situations because each points the
//! user at a different fix:
//!
//! - [`HealthStatus::Online`] - the backend answered 200, generation should
//!   work.
//! - [`HealthStatus::ServerError`] - something answered, but unhealthily;
//!   investigate the backend.
//! - [`HealthStatus::Unreachable`] - nothing answered at all; check that the
//!   backend process and the tunnel in front of it are running.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::errors::{ClientError, ClientResult};

/// Health probe timeout. A healthy backend answers instantly; anything
/// slower than this is treated as unreachable.
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("infinitalk/", env!("CARGO_PKG_VERSION"));

/// Outcome of a readiness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// The backend answered HTTP 200.
    Online,
    /// The backend answered with any other status.
    ServerError(StatusCode),
    /// The request never completed (timeout, DNS failure, refused
    /// connection). Carries the underlying failure description.
    Unreachable(String),
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::ServerError(status) => write!(f, "server error ({status})"),
            Self::Unreachable(reason) => write!(f, "unreachable: {reason}"),
        }
    }
}

/// Probes the configured backend's `GET /health` endpoint.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    http_client: Client,
}

impl ConnectionManager {
    /// Create a manager with the short health-probe timeout applied.
    pub fn new() -> ClientResult<Self> {
        Self::with_timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
    }

    /// Create a manager with a caller-chosen probe timeout.
    pub fn with_timeout(timeout: Duration) -> ClientResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ClientError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { http_client })
    }

    /// Probe `{base_url}/health`.
    ///
    /// Fails closed: with no base URL configured this returns a
    /// configuration error without touching the network. A transport
    /// failure is a probe *result* ([`HealthStatus::Unreachable`]), not an
    /// error - the caller asked whether the backend is reachable and got an
    /// answer.
    pub async fn check_health(&self, config: &SessionConfig) -> ClientResult<HealthStatus> {
        let base_url = config.base_url()?;
        let endpoint = format!("{base_url}/health");
        debug!(endpoint = %endpoint, "Probing backend health");

        match self.http_client.get(&endpoint).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                debug!("Backend online");
                Ok(HealthStatus::Online)
            }
            Ok(response) => {
                warn!(status = %response.status(), "Backend answered unhealthy");
                Ok(HealthStatus::ServerError(response.status()))
            }
            Err(e) => {
                warn!(error = %e, "Backend unreachable");
                Ok(HealthStatus::Unreachable(e.to_string()))
            }
        }
    }
}
