//! Speech-synthesis relay.

use std::time::Instant;

use axum::body::Bytes;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::TtsConfig;
use crate::observability::metrics;
use crate::upstream::{non_blank, UpstreamError};

const NOT_CONFIGURED: &str = "ElevenLabs API not configured";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

const PHOENIX_VOICE: VoiceSettings = VoiceSettings {
    stability: 0.6,
    similarity_boost: 0.7,
};

/// Client for the text-to-speech endpoint.
#[derive(Debug, Clone)]
pub struct SpeechClient {
    http: reqwest::Client,
    api_key: Option<String>,
    voice_id: Option<String>,
    base_url: String,
    max_audio_bytes: usize,
}

impl SpeechClient {
    pub fn new(http: reqwest::Client, config: &TtsConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            voice_id: config.voice_id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_audio_bytes: config.max_audio_bytes,
        }
    }

    pub fn is_configured(&self) -> bool {
        non_blank(&self.api_key).is_some() && non_blank(&self.voice_id).is_some()
    }

    /// Synthesize `text` and return the complete audio body (MPEG).
    pub async fn synthesize(&self, text: &str) -> Result<Bytes, UpstreamError> {
        let started = Instant::now();
        let result = self.call(text).await;
        metrics::record_upstream("tts", &result, started);
        result
    }

    /// `{base}/v1/text-to-speech/{voice}` with the voice id as one encoded segment.
    fn speech_url(&self, voice_id: &str) -> Result<Url, UpstreamError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(["v1", "text-to-speech", voice_id]);
        Ok(url)
    }

    async fn call(&self, text: &str) -> Result<Bytes, UpstreamError> {
        let (Some(api_key), Some(voice_id)) = (non_blank(&self.api_key), non_blank(&self.voice_id)) else {
            return Err(UpstreamError::NotConfigured(NOT_CONFIGURED));
        };

        let url = self.speech_url(voice_id)?;
        tracing::debug!(text_len = text.len(), "Calling speech API");

        let mut response = self
            .http
            .post(url)
            .header("xi-api-key", api_key)
            .json(&SpeechRequest {
                text,
                voice_settings: PHOENIX_VOICE,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, details = %details, "Speech API error");
            return Err(UpstreamError::Rejected {
                status,
                message: "Failed to generate audio",
                details: Value::String(details),
            });
        }

        let limit = self.max_audio_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(UpstreamError::TooLarge { limit });
        }

        let mut audio = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
        while let Some(chunk) = response.chunk().await? {
            if audio.len() + chunk.len() > limit {
                tracing::warn!(limit, "Speech audio exceeded size limit");
                return Err(UpstreamError::TooLarge { limit });
            }
            audio.extend_from_slice(&chunk);
        }

        tracing::debug!(bytes = audio.len(), "Speech audio generated");
        Ok(Bytes::from(audio))
    }
}
