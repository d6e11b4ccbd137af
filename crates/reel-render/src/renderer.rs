use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::process::Command;
use tokio::sync::Semaphore;

use reel_core::{extract_scene_name, RenderConfig, RenderError, RenderResult};

use crate::output::find_video_file;
use crate::process::{ProcessOutcome, RenderProcess};
use crate::workspace::Workspace;

/// A finished render: the video file plus the workspace that holds it.
///
/// Dropping this removes the workspace, and the video with it.
#[derive(Debug)]
pub struct RenderedVideo {
    workspace: Workspace,
    path: PathBuf,
}

impl RenderedVideo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }
}

/// Drives the external renderer for one script at a time.
///
/// Cloning is cheap; clones share the optional concurrency limit.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: Arc<RenderConfig>,
    permits: Option<Arc<Semaphore>>,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        let permits = config
            .max_concurrent
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));
        Self {
            config: Arc::new(config),
            permits,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renderer command line for `scene` in `workspace`.
    pub fn command_args(&self, workspace: &Workspace, scene: &str) -> Vec<String> {
        vec![
            format!("-q{}", self.config.quality),
            format!("--format={}", self.config.format),
            "--media_dir".to_string(),
            workspace.media_dir().to_string_lossy().into_owned(),
            workspace.script_path().to_string_lossy().into_owned(),
            scene.to_string(),
        ]
    }

    /// Render `script` and return the located video.
    ///
    /// The scene class is resolved before anything touches the disk, so a
    /// script without one never creates a workspace or spawns the renderer.
    pub async fn render(&self, script: &str) -> RenderResult<RenderedVideo> {
        let scene = extract_scene_name(script).ok_or(RenderError::NoSceneFound)?;

        let workspace =
            Workspace::create(&self.config.work_root(), &self.config.workspace_prefix).await?;
        tracing::info!(workspace = %workspace.path().display(), "Rendering script");

        workspace.write_script(script).await?;
        tracing::info!(scene, "Found scene class");

        self.run_renderer(&workspace, scene).await?;

        let media_dir = workspace.media_dir();
        let extension = self.config.video_extension();
        let found = {
            let media_dir = media_dir.clone();
            tokio::task::spawn_blocking(move || find_video_file(&media_dir, &extension))
                .await
                .map_err(|e| RenderError::Other(format!("output search task failed: {}", e)))??
        };

        let Some(path) = found else {
            tracing::error!(media_dir = %media_dir.display(), "No video file found");
            return Err(RenderError::OutputMissing { media_dir });
        };

        tracing::info!(video = %path.display(), "Video generated");
        Ok(RenderedVideo { workspace, path })
    }

    async fn run_renderer(&self, workspace: &Workspace, scene: &str) -> RenderResult<()> {
        let _permit = match &self.permits {
            Some(permits) => Some(
                permits
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|e| RenderError::Other(e.to_string()))?,
            ),
            None => None,
        };

        let args = self.command_args(workspace, scene);
        tracing::info!("Running command: {} {}", self.config.command, args.join(" "));

        let mut command = Command::new(&self.config.command);
        command.args(&args).current_dir(workspace.path());

        let process = RenderProcess::spawn(command)?;
        match process.wait_with_timeout(self.config.timeout()).await? {
            ProcessOutcome::TimedOut => {
                tracing::error!(
                    scene,
                    timeout_secs = self.config.timeout_secs,
                    "Renderer timed out; process group killed"
                );
                Err(RenderError::RenderTimeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
            ProcessOutcome::Exited(output) if !output.status.success() => {
                let stderr = output.stderr_lossy();
                tracing::error!(status = ?output.status.code(), "Manim error: {}", stderr);
                Err(RenderError::render_failed(output.status.code(), stderr))
            }
            ProcessOutcome::Exited(_) => Ok(()),
        }
    }
}
