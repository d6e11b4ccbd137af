use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};

use reel_core::{RenderError, RenderRequest};

use crate::error::ApiError;
use crate::stream::video_body;
use crate::AppState;

const VIDEO_CONTENT_TYPE: &str = "video/mp4";
const DOWNLOAD_NAME: &str = "animation.mp4";

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": &*state.service_name,
    }))
}

/// Render the posted script and stream the video back.
///
/// The workspace travels with the response body and is removed once the
/// body has been sent or dropped.
pub async fn render(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = body.map_err(|e| RenderError::InvalidRequest(e.body_text()))?;
    let script = RenderRequest::from_body(&body)?.into_script()?;
    let video = state.renderer.render(&script).await?;

    let file = tokio::fs::File::open(video.path()).await?;
    let len = file.metadata().await?.len();

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, VIDEO_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_NAME),
            ),
            (header::CONTENT_LENGTH, len.to_string()),
        ],
        video_body(file, video),
    )
        .into_response())
}
