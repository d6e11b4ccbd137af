use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use reel_core::RenderError;

/// HTTP face of [`RenderError`].
///
/// Client mistakes map to 400; everything that went wrong after the request
/// was accepted maps to 500. The body is always `{error, code, details?}`.
#[derive(Debug)]
pub struct ApiError(pub RenderError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError(err)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError(RenderError::Io(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.0.code();
        if code == "unexpected" {
            tracing::error!("Unexpected error: {}", self.0);
        }

        let mut body = serde_json::json!({
            "error": self.0.to_string(),
            "code": code,
        });
        if let Some(details) = self.0.details() {
            body["details"] = serde_json::Value::String(details.to_string());
        }
        (status, Json(body)).into_response()
    }
}

/// Turns a handler panic into the same JSON shape as any other unexpected
/// error.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "internal error".to_string()
    };
    tracing::error!("Handler panicked: {}", message);
    ApiError(RenderError::Other(message)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_script_is_bad_request() {
        let response = ApiError(RenderError::MissingScript).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "No script provided");
        assert_eq!(body["code"], "missing_script");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_render_failure_carries_details() {
        let response =
            ApiError(RenderError::render_failed(Some(1), "SyntaxError: bad")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Manim rendering failed");
        assert_eq!(body["code"], "render_failed");
        assert_eq!(body["details"], "SyntaxError: bad");
    }

    #[tokio::test]
    async fn test_io_error_converts_to_unexpected() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let response = ApiError::from(io).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["code"], "unexpected");
        assert!(body["error"].as_str().unwrap().contains("disk full"));
    }

    #[tokio::test]
    async fn test_panic_payload_is_reported() {
        let response = panic_response(Box::new("scene exploded"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "scene exploded");
        assert_eq!(body["code"], "unexpected");
    }
}
