//! Generative-text relay for the Phoenix chat persona.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GeminiConfig;
use crate::observability::metrics;
use crate::upstream::{body_to_value, non_blank, UpstreamError};

/// Persona and style preamble placed before every user prompt.
pub const PERSONA_PREAMBLE: &str = "You are Aether the Phoenix, a thousand-year-old mystical bird who has flown through solar storms and auroras. Speak in a warm, wise, storybook tone appropriate for children. Keep replies short (1-3 paragraphs). You also have a story library with tales such as 'The Carrington Event (1859)', 'Auroras in the Night Sky', 'When Satellites Shook', 'The Phoenix Flies Through Solar Storms', and 'The Tale of Lost GPS Signals'. If a child asks for one of these stories or wants to hear a tale, encourage them to click on the story cards below the chat window to hear them in your voice.";

const NOT_CONFIGURED: &str = "Gemini API key not configured";

/// Credential header; keeps the key out of URLs that end up in error text.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Text of `candidates[0].content.parts[0]`, if the body has that shape.
fn first_candidate_text(body: &Value) -> Option<String> {
    let response = GenerateContentResponse::deserialize(body).ok()?;
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
}

/// Builds the full prompt sent upstream.
pub fn compose_prompt(prompt: &str) -> String {
    format!("{}\n\nUser: {}", PERSONA_PREAMBLE, prompt)
}

/// Client for the generative-language `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, config: &GeminiConfig) -> Self {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        Self {
            http,
            api_key: config.api_key.clone(),
            endpoint,
        }
    }

    pub fn is_configured(&self) -> bool {
        non_blank(&self.api_key).is_some()
    }

    /// Generate a persona reply for `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        let started = Instant::now();
        let result = self.call(prompt).await;
        metrics::record_upstream("gemini", &result, started);
        result
    }

    async fn call(&self, prompt: &str) -> Result<String, UpstreamError> {
        let api_key = non_blank(&self.api_key).ok_or(UpstreamError::NotConfigured(NOT_CONFIGURED))?;

        let full_prompt = compose_prompt(prompt);
        let request = GenerateContentRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: &full_prompt }],
            }],
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            prompt_len = prompt.len(),
            "Calling generative-text API"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let data = body_to_value(response.text().await?);

        if !status.is_success() {
            tracing::error!(status = %status, details = %data, "Generative-text API error");
            return Err(UpstreamError::Rejected {
                status,
                message: "Failed to generate response",
                details: data,
            });
        }

        match first_candidate_text(&data) {
            Some(text) => {
                tracing::debug!(reply_len = text.len(), "Generated reply");
                Ok(text)
            }
            None => {
                tracing::error!(details = %data, "Unexpected generative-text response structure");
                Err(UpstreamError::UnexpectedShape {
                    message: "Unexpected response structure from Gemini",
                    details: data,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_first_candidate() {
        let body = json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Greetings, little one."}, {"text": "ignored"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        });
        assert_eq!(first_candidate_text(&body).as_deref(), Some("Greetings, little one."));
    }

    #[test]
    fn test_rejects_missing_path() {
        for body in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
            json!({"candidates": [{"content": {"parts": []}}]}),
            json!({"candidates": [{"content": {"parts": [{"inlineData": {}}]}}]}),
            json!("plain text"),
        ] {
            assert_eq!(first_candidate_text(&body), None, "body: {body}");
        }
    }

    #[test]
    fn test_compose_prompt() {
        let prompt = compose_prompt("Tell me about auroras");
        assert!(prompt.starts_with("You are Aether the Phoenix"));
        assert!(prompt.ends_with("\n\nUser: Tell me about auroras"));
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let config = GeminiConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".into(),
            ..GeminiConfig::default()
        };
        let client = GeminiClient::new(reqwest::Client::new(), &config);
        assert!(!client.is_configured());

        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, UpstreamError::NotConfigured(NOT_CONFIGURED)));
    }

    #[tokio::test]
    async fn test_transport_errors_do_not_expose_key() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = GeminiConfig {
            api_key: Some("SECRETKEY123".into()),
            base_url: format!("http://127.0.0.1:{port}"),
            ..GeminiConfig::default()
        };
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = GeminiClient::new(http, &config);
        assert!(!client.endpoint.contains("SECRETKEY123"));

        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(_)), "got {err:?}");
        assert!(!err.to_string().contains("SECRETKEY123"));
        assert!(!format!("{err:?}").contains("SECRETKEY123"));
    }
}
