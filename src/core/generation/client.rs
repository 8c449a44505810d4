//! Generation request client.
//!
//! Issues the single multipart POST that turns a [`GenerationRequest`] into
//! video. The backend does TTS plus lip-sync inference in-line, so this is a
//! slow call by design: the timeout is a long bound on one attempt, not a
//! retry budget. A failed submission is only retried by an explicit new
//! submission from the caller.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::request::GenerationRequest;
use crate::config::SessionConfig;
use crate::errors::{ClientError, ClientResult};

/// Total request timeout. Generation is slow; one attempt gets five minutes.
const GENERATE_TIMEOUT_SECS: u64 = 300;

/// Connect timeout, separate from the total bound so a dead tunnel fails
/// fast instead of consuming the generation budget.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("infinitalk/", env!("CARGO_PKG_VERSION"));

/// Client for the backend's `POST /generate` endpoint.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    /// HTTP client for API requests (reused for connection pooling).
    http_client: Client,
}

impl GenerationClient {
    /// Create a client with the standard generation timeout applied.
    pub fn new() -> ClientResult<Self> {
        Self::with_timeout(Duration::from_secs(GENERATE_TIMEOUT_SECS))
    }

    /// Create a client with a caller-chosen total timeout.
    ///
    /// The timeout is the only thing that resolves a hung request, so tests
    /// (and callers fronting faster backends) can tighten the bound here.
    pub fn with_timeout(timeout: Duration) -> ClientResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS).min(timeout))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ClientError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { http_client })
    }

    /// Submit one generation request and return the rendered video bytes.
    ///
    /// Exactly one attempt is made. Outcomes:
    /// - HTTP 200: the body is returned as opaque MP4 bytes, unvalidated.
    /// - any other status: [`ClientError::Server`] carrying the status and
    ///   the body text verbatim.
    /// - transport failure before a response: [`ClientError::Connection`].
    /// - anything else: [`ClientError::Unknown`].
    ///
    /// Fails closed with [`ClientError::Configuration`] and no network I/O
    /// when no base URL is configured.
    pub async fn generate(
        &self,
        config: &SessionConfig,
        request: &GenerationRequest,
    ) -> ClientResult<Bytes> {
        let base_url = config.base_url()?;
        let endpoint = format!("{base_url}/generate");

        info!(
            endpoint = %endpoint,
            image_bytes = request.image_bytes().len(),
            script_chars = request.script_text().len(),
            voice = %request.voice(),
            "Submitting generation request"
        );

        let file_part = Part::bytes(request.image_bytes().to_vec())
            .file_name(request.image_filename())
            .mime_str(request.image_format().mime_type())
            .map_err(|e| ClientError::Configuration(format!("Invalid MIME type: {e}")))?;

        let form = Form::new()
            .part("image", file_part)
            .text("text", request.script_text().to_string())
            .text("voice", request.voice().as_str().to_string());

        let response = self
            .http_client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::from_send_error)?;

        let status = response.status();
        debug!(status = %status, "Generation response received");

        // The contract is exact: only 200 carries video. Any other status,
        // 2xx included, is the backend describing a problem.
        if status != StatusCode::OK {
            // Surface the backend's own description of what went wrong.
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, message = %message, "Generation rejected by backend");
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let video = response
            .bytes()
            .await
            .map_err(|e| ClientError::Unknown(format!("Failed to read video payload: {e}")))?;

        info!(video_bytes = video.len(), "Generation complete");
        Ok(video)
    }
}
