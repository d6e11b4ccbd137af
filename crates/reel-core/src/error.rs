/// Error taxonomy for a single render request.
use std::path::PathBuf;

/// A specialized Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Every way a render request can fail.
///
/// Client-side problems (`MissingScript`, `InvalidRequest`, `NoSceneFound`)
/// are detected before any workspace or subprocess exists. Everything else
/// happens after the renderer has been involved.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("No script provided")]
    MissingScript,

    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error("No Scene class found in script")]
    NoSceneFound,

    #[error("Manim rendering failed")]
    RenderFailed { status: Option<i32>, stderr: String },

    #[error("Rendering timeout (max {timeout_secs} seconds)")]
    RenderTimeout { timeout_secs: u64 },

    #[error("Video file not generated")]
    OutputMissing { media_dir: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl RenderError {
    /// Create a render failure from the renderer's exit status and stderr.
    pub fn render_failed(status: Option<i32>, stderr: impl Into<String>) -> Self {
        RenderError::RenderFailed {
            status,
            stderr: stderr.into(),
        }
    }

    /// True for errors caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RenderError::MissingScript | RenderError::InvalidRequest(_) | RenderError::NoSceneFound
        )
    }

    /// Stable machine-readable tag, one per failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::MissingScript => "missing_script",
            RenderError::InvalidRequest(_) => "invalid_request",
            RenderError::NoSceneFound => "no_scene_found",
            RenderError::RenderFailed { .. } => "render_failed",
            RenderError::RenderTimeout { .. } => "render_timeout",
            RenderError::OutputMissing { .. } => "output_missing",
            RenderError::Io(_) | RenderError::Other(_) => "unexpected",
        }
    }

    /// Diagnostic text captured from the renderer, if any.
    pub fn details(&self) -> Option<&str> {
        match self {
            RenderError::RenderFailed { stderr, .. } => Some(stderr.as_str()),
            _ => None,
        }
    }
}
