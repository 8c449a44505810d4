//! Per-submission state machine and the session driver.
//!
//! The user-facing flow is strictly linear: a submission starts `Idle`,
//! moves to `Submitting` when the request goes out, and ends in exactly one
//! terminal state. Error states are terminal for that submission only; the
//! next submission starts a fresh instance from `Idle`. There is no
//! cancellation - an in-flight request resolves only by responding or by
//! hitting its timeout (which lands in `ConnectionErrorState`).

use bytes::Bytes;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::core::connection::{ConnectionManager, HealthStatus};
use crate::core::generation::{GenerationClient, GenerationRequest};
use crate::errors::{ClientError, ClientResult};

// =============================================================================
// Submission State
// =============================================================================

/// States a single submission can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// No request has been issued yet.
    Idle,
    /// The request is in flight; the caller is blocked on it.
    Submitting,
    /// Terminal: the backend returned video bytes.
    Success,
    /// Terminal: the backend answered with a non-success status.
    ServerErrorState,
    /// Terminal: the transport failed before any response.
    ConnectionErrorState,
    /// Terminal: something failed outside the categories above.
    UnknownErrorState,
}

impl SubmissionState {
    /// Whether this state ends the submission.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Submitting)
    }

    /// Terminal state for a finished generation call.
    pub fn from_outcome(outcome: &ClientResult<Bytes>) -> Self {
        match outcome {
            Ok(_) => Self::Success,
            Err(ClientError::Server { .. }) => Self::ServerErrorState,
            Err(ClientError::Connection(_)) => Self::ConnectionErrorState,
            // A missing base URL is caught before Submitting, so by the time
            // an outcome exists a Configuration error is out-of-band.
            Err(ClientError::Configuration(_)) | Err(ClientError::Unknown(_)) => {
                Self::UnknownErrorState
            }
        }
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Success => "success",
            Self::ServerErrorState => "server-error",
            Self::ConnectionErrorState => "connection-error",
            Self::UnknownErrorState => "unknown-error",
        };
        write!(f, "{name}")
    }
}

/// Result of driving one submission to a terminal state.
#[derive(Debug, Clone)]
pub struct SubmissionReport {
    /// The terminal state reached.
    pub state: SubmissionState,
    /// Video bytes, present iff `state` is [`SubmissionState::Success`].
    pub video: Option<Bytes>,
    /// Human-readable failure description, present on error states.
    pub message: Option<String>,
}

// =============================================================================
// Session
// =============================================================================

/// One UI session: the configured backend URL plus the two clients.
///
/// Submission is synchronous from the caller's point of view - only one
/// request is ever in flight, and the session blocks until it resolves.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    connection: ConnectionManager,
    generation: GenerationClient,
}

impl Session {
    /// Create a session with no backend URL configured.
    pub fn new() -> ClientResult<Self> {
        Self::with_config(SessionConfig::new())
    }

    /// Create a session from an existing configuration.
    pub fn with_config(config: SessionConfig) -> ClientResult<Self> {
        Ok(Self {
            config,
            connection: ConnectionManager::new()?,
            generation: GenerationClient::new()?,
        })
    }

    /// Replace the backend base URL (normalized, last write wins).
    pub fn set_base_url(&mut self, raw: &str) {
        self.config.set_base_url(raw);
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Probe the configured backend's health endpoint.
    pub async fn check_health(&self) -> ClientResult<HealthStatus> {
        self.connection.check_health(&self.config).await
    }

    /// Drive one submission from `Idle` to a terminal state.
    ///
    /// A missing base URL fails before the `Submitting` transition and is
    /// reported as a configuration error, matching the fail-closed contract
    /// of the underlying client.
    pub async fn submit(&self, request: &GenerationRequest) -> ClientResult<SubmissionReport> {
        // Fail closed before entering Submitting.
        self.config.base_url()?;

        let mut state = SubmissionState::Idle;
        debug!(state = %state, "Submission created");

        state = SubmissionState::Submitting;
        debug!(state = %state, "Submission dispatched");

        let outcome = self.generation.generate(&self.config, request).await;
        state = SubmissionState::from_outcome(&outcome);
        info!(state = %state, "Submission resolved");

        let report = match outcome {
            Ok(video) => SubmissionReport {
                state,
                video: Some(video),
                message: None,
            },
            Err(e) => SubmissionReport {
                state,
                video: None,
                message: Some(e.to_string()),
            },
        };
        Ok(report)
    }
}
