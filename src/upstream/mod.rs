//! Clients for the third-party APIs the relay forwards to.
//!
//! # Data Flow
//! ```text
//! handler
//!     → credential check (no network call when missing)
//!     → reqwest POST (connect + total timeout, no retries)
//!     → non-success status: relayed to the caller with upstream details
//!     → success: extracted text (gemini.rs) or buffered audio (tts.rs)
//! ```

pub mod gemini;
pub mod tts;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::Value;

use crate::config::RelayConfig;

pub use gemini::GeminiClient;
pub use tts::SpeechClient;

/// Errors from calling an upstream API.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// A required credential or identifier is absent.
    #[error("{0}")]
    NotConfigured(&'static str),

    /// The upstream answered with a non-success status.
    #[error("upstream returned {status}")]
    Rejected {
        status: StatusCode,
        message: &'static str,
        details: Value,
    },

    /// The upstream answered 2xx but without the expected fields.
    #[error("unexpected response structure")]
    UnexpectedShape { message: &'static str, details: Value },

    /// The buffered response grew past the configured limit.
    #[error("upstream response exceeded {limit} bytes")]
    TooLarge { limit: usize },

    #[error("upstream request timed out")]
    Timeout,

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(e.without_url())
        }
    }
}

impl UpstreamError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::NotConfigured(_) => "not_configured",
            UpstreamError::Rejected { .. } => "rejected",
            UpstreamError::UnexpectedShape { .. } => "unexpected_shape",
            UpstreamError::TooLarge { .. } => "too_large",
            UpstreamError::Timeout => "timeout",
            UpstreamError::InvalidUrl(_) => "invalid_url",
            UpstreamError::Transport(_) => "transport",
        }
    }
}

/// Build the shared outbound HTTP client.
pub fn build_client(config: &RelayConfig) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeouts.upstream_secs))
        .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
        .user_agent(concat!("aurora-relay/", env!("CARGO_PKG_VERSION")));

    if !config.upstream.system_proxy {
        builder = builder.no_proxy();
    }

    builder.build()
}

/// Interpret a response body as JSON, falling back to a plain string.
pub(crate) fn body_to_value(body: String) -> Value {
    match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => Value::String(body),
    }
}

/// `Some` only for present, non-blank values.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
