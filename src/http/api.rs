//! `/api` handlers.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::request::ApiJson;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::predict::{assess, Coordinates, CoordinatesRequest, SolarConditions, StormAssessment};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub text: Option<String>,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}

/// POST /api/predict/aurora
/// Run the prediction script and pass its JSON through untouched.
pub async fn predict_aurora(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CoordinatesRequest>,
) -> Result<Json<Value>, ApiError> {
    let coords = Coordinates::validate(req.latitude, req.longitude).inspect_err(|e| {
        tracing::warn!(
            latitude = ?req.latitude,
            longitude = ?req.longitude,
            error = %e,
            "Rejected prediction request"
        );
    })?;

    tracing::info!(
        latitude = coords.latitude,
        longitude = coords.longitude,
        "Aurora prediction request"
    );

    let result = state.predictor.predict(coords).await?;
    tracing::debug!(result = %result, "Aurora prediction result");
    Ok(Json(result))
}

/// POST /api/predict/storm
/// Score solar conditions with the storm heuristic.
pub async fn predict_storm(ApiJson(conditions): ApiJson<SolarConditions>) -> Json<StormAssessment> {
    let assessment = assess(&conditions);
    tracing::debug!(
        probability = assessment.probability,
        category = ?assessment.category,
        "Storm assessment"
    );
    Json(assessment)
}

/// POST /api/gemini
/// Ask the Phoenix persona a question.
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let prompt = req
        .prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("Prompt is required"))?;

    tracing::info!(prompt_len = prompt.len(), "Chat request");

    let text = state.gemini.generate(&prompt).await?;
    Ok(Json(ChatResponse { text }))
}

/// POST /api/tts
/// Synthesize speech and return the MPEG audio.
pub async fn speech(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SpeechRequest>,
) -> Result<Response, ApiError> {
    let text = req
        .text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Text is required"))?;

    tracing::info!(text_len = text.len(), "Speech request");

    let audio = state.speech.synthesize(&text).await?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}
