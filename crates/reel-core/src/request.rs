use serde::Deserialize;

use crate::error::{RenderError, RenderResult};

/// Body of `POST /render`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub script: Option<String>,
}

impl RenderRequest {
    /// Decode a raw request body.
    ///
    /// An empty body is treated the same as a body without a script.
    pub fn from_body(body: &[u8]) -> RenderResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| RenderError::InvalidRequest(e.to_string()))
    }

    /// The script text, or `MissingScript` if it is absent or empty.
    pub fn into_script(self) -> RenderResult<String> {
        match self.script {
            Some(script) if !script.is_empty() => Ok(script),
            _ => Err(RenderError::MissingScript),
        }
    }
}
