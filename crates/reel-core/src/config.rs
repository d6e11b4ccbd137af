use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Problems loading or overriding the service configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Reported by the health endpoint.
    pub service_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            service_name: "manim-renderer".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Renderer executable, resolved through PATH unless absolute.
    pub command: String,
    pub quality: String, // "l" | "m" | "h" | "p" | "k"
    pub format: String,
    pub timeout_secs: u64,
    /// Parent of per-request workspaces. Defaults to the system temp dir.
    pub work_root: Option<PathBuf>,
    pub workspace_prefix: String,
    /// Cap on simultaneous renderer processes. Unset means unlimited.
    pub max_concurrent: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            command: "manim".to_string(),
            quality: "m".to_string(),
            format: "mp4".to_string(),
            timeout_secs: 120,
            work_root: None,
            workspace_prefix: "manim_".to_string(),
            max_concurrent: None,
        }
    }
}

impl RenderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn work_root(&self) -> PathBuf {
        self.work_root.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Extension the renderer gives its output, e.g. `.mp4`.
    pub fn video_extension(&self) -> String {
        format!(".{}", self.format)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ReelConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl ReelConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from the process environment (`PORT`).
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("PORT") {
            self.server.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { key: "PORT", value })?;
        }
        Ok(())
    }
}
