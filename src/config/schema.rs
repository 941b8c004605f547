//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay and
//! the static asset server. All types derive Serde traits for deserialization
//! from config files; every section falls back to defaults so an empty file
//! (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration shared by both binaries.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Relay listener (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// External prediction script settings.
    pub prediction: PredictionConfig,

    /// Generative-text service settings.
    pub gemini: GeminiConfig,

    /// Text-to-speech service settings.
    pub tts: TtsConfig,

    /// Shared outbound HTTP client settings.
    pub upstream: UpstreamConfig,

    /// Game download directory.
    pub downloads: DownloadsConfig,

    /// Optional static files served by the relay itself.
    pub relay: RelayStaticConfig,

    /// Standalone static asset server.
    pub assets: AssetsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Timeout configuration for inbound and outbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request deadline enforced on every inbound request.
    pub request_secs: u64,

    /// Total deadline for a single outbound API call.
    pub upstream_secs: u64,

    /// Connection establishment timeout for outbound calls.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 60,
            upstream_secs: 30,
            connect_secs: 5,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// External prediction script configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Program and leading arguments; latitude and longitude are appended.
    pub command: Vec<String>,

    /// Deadline for one prediction, including the wait for a free slot.
    pub timeout_secs: u64,

    /// Maximum number of prediction processes running at once.
    pub max_concurrent: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            command: vec![
                "python3".to_string(),
                "scripts/aurora_prediction.py".to_string(),
            ],
            timeout_secs: 30,
            max_concurrent: 8,
        }
    }
}

/// Generative-text API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key. Usually supplied through `GEMINI_API_KEY`.
    pub api_key: Option<String>,

    /// API root, without trailing slash.
    pub base_url: String,

    /// Model name used in the `generateContent` path.
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
        }
    }
}

/// Text-to-speech API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TtsConfig {
    /// API key. Usually supplied through `ELEVEN_API_KEY`.
    pub api_key: Option<String>,

    /// Voice identifier. Usually supplied through `ELEVEN_VOICE_ID`.
    pub voice_id: Option<String>,

    /// API root, without trailing slash.
    pub base_url: String,

    /// Upper bound on a buffered audio response.
    pub max_audio_bytes: usize,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            voice_id: None,
            base_url: "https://api.elevenlabs.io".to_string(),
            max_audio_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { system_proxy: true }
    }
}

/// Game download configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownloadsConfig {
    /// Directory `/game/{file}` serves from.
    pub game_dir: PathBuf,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            game_dir: PathBuf::from("game"),
        }
    }
}

/// Static files served by the relay for paths no API route claims.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayStaticConfig {
    pub static_dir: Option<PathBuf>,
}

/// Standalone static asset server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Bind address of the static server.
    pub bind_address: String,

    /// Directory tree to serve.
    pub root: PathBuf,

    /// Entry document (relative to `root`) for unmatched paths.
    pub entry: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            root: PathBuf::from("frontend"),
            entry: PathBuf::from("index.html"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
