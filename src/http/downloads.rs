//! Game file downloads.
//!
//! `GET /game/{file}` serves a single file from the configured directory as
//! an attachment. Names that could leave that directory are treated as
//! missing files.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, HeaderValue},
    response::Response,
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::http::response::ApiError;
use crate::http::server::AppState;

/// True for a bare file name: no separators, no parent references.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '"'])
        && !name.contains("..")
        && !name.chars().any(char::is_control)
}

/// GET /game/{file}
pub async fn game_file(
    State(state): State<AppState>,
    Path(file): Path<String>,
    req: Request,
) -> Result<Response, ApiError> {
    if !is_plain_file_name(&file) {
        tracing::warn!(file = %file, "Rejected game file name");
        return Err(ApiError::not_found("File not found"));
    }

    let path = state.game_dir.join(&file);
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        _ => {
            tracing::warn!(path = %path.display(), "Game file not found");
            return Err(ApiError::not_found("File not found"));
        }
    }

    let response = match ServeFile::new(&path).oneshot(req).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    let mut response = response.map(Body::new);

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, disposition);

    tracing::info!(path = %path.display(), "Serving game file");
    Ok(response)
}
