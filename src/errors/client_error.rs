//! Client error taxonomy.
//!
//! Every failure the client can hit is folded into one of four categories so
//! callers (and the submission state machine) always reach a terminal,
//! user-presentable state:
//!
//! - [`ClientError::Configuration`] - a required input is missing before any
//!   network I/O is attempted. Recoverable by correcting the input.
//! - [`ClientError::Connection`] - the transport failed before a response was
//!   obtained (timeout, refused, DNS). Recoverable by checking the backend
//!   server or the tunnel in front of it.
//! - [`ClientError::Server`] - the backend responded with a non-success
//!   status. The response body is passed through verbatim.
//! - [`ClientError::Unknown`] - anything else. Catch-all so no failure mode
//!   hangs the caller.

use thiserror::Error;

/// Errors produced by the connection manager and the generation client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// A required input (typically the backend base URL) is missing.
    /// Raised before any network call is made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not be completed at the transport level.
    /// A request that times out lands here as well.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The backend received the request and answered with a non-success
    /// status. `message` is the response body, verbatim.
    #[error("backend returned {status}: {message}")]
    Server { status: u16, message: String },

    /// Any failure outside the categories above.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl ClientError {
    /// Map a `reqwest` send error into the taxonomy.
    ///
    /// Errors raised before a response arrives (connect failures, timeouts,
    /// malformed requests) are connection-class; anything else falls through
    /// to [`ClientError::Unknown`].
    pub fn from_send_error(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            ClientError::Connection(err.to_string())
        } else {
            ClientError::Unknown(err.to_string())
        }
    }

    /// Short category label, used for log fields and CLI output.
    pub fn category(&self) -> &'static str {
        match self {
            ClientError::Configuration(_) => "configuration",
            ClientError::Connection(_) => "connection",
            ClientError::Server { .. } => "server",
            ClientError::Unknown(_) => "unknown",
        }
    }
}

/// Result type alias used throughout the client.
pub type ClientResult<T> = Result<T, ClientError>;
