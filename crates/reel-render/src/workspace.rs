use std::io;
use std::path::{Path, PathBuf};

use tokio::runtime::RuntimeFlavor;

const SCRIPT_FILE: &str = "scene.py";
const MEDIA_DIR: &str = "media";

/// A per-request scratch directory holding the script and the renderer's
/// output tree.
///
/// The directory is removed recursively when the guard is dropped, whatever
/// path the request took to get there. Removal failures are logged and
/// otherwise ignored.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create `<parent>/<prefix><uuid>` along with its media directory.
    ///
    /// `create_dir` fails on an existing path, so two requests can never end
    /// up sharing a directory.
    pub async fn create(parent: &Path, prefix: &str) -> io::Result<Self> {
        tokio::fs::create_dir_all(parent).await?;
        let root = parent.join(format!("{}{}", prefix, uuid::Uuid::new_v4().simple()));
        tokio::fs::create_dir(&root).await?;

        // From here on the guard owns the directory, so a failure below
        // still cleans up.
        let workspace = Self { root };
        tokio::fs::create_dir(workspace.media_dir()).await?;
        Ok(workspace)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn script_path(&self) -> PathBuf {
        self.root.join(SCRIPT_FILE)
    }

    pub fn media_dir(&self) -> PathBuf {
        self.root.join(MEDIA_DIR)
    }

    /// Write the script verbatim to the workspace's script file.
    pub async fn write_script(&self, script: &str) -> io::Result<PathBuf> {
        let path = self.script_path();
        tokio::fs::write(&path, script).await?;
        Ok(path)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        // Media trees can be large. On a multi-threaded runtime, hand this
        // worker's other tasks off while we block; removal still finishes
        // before drop returns.
        let on_worker = tokio::runtime::Handle::try_current()
            .is_ok_and(|h| h.runtime_flavor() == RuntimeFlavor::MultiThread);
        let removed = if on_worker {
            tokio::task::block_in_place(|| std::fs::remove_dir_all(&self.root))
        } else {
            std::fs::remove_dir_all(&self.root)
        };

        match removed {
            Ok(()) => tracing::info!(workspace = %self.root.display(), "Cleaned up workspace"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                workspace = %self.root.display(),
                "Error cleaning up workspace: {}",
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_parent() -> PathBuf {
        std::env::temp_dir().join(format!("reel-ws-test-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_workspace_layout_and_cleanup() {
        let parent = scratch_parent();
        let ws = Workspace::create(&parent, "manim_").await.unwrap();
        let root = ws.path().to_path_buf();

        assert!(root.is_dir());
        assert!(ws.media_dir().is_dir());
        assert!(root
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("manim_"));

        let script = ws.write_script("class A(Scene):\n    pass\n").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&script).unwrap(),
            "class A(Scene):\n    pass\n"
        );

        drop(ws);
        assert!(!root.exists());
        std::fs::remove_dir_all(&parent).unwrap();
    }

    #[tokio::test]
    async fn test_workspaces_are_unique() {
        let parent = scratch_parent();
        let a = Workspace::create(&parent, "manim_").await.unwrap();
        let b = Workspace::create(&parent, "manim_").await.unwrap();
        assert_ne!(a.path(), b.path());
        assert_ne!(a.script_path(), b.script_path());

        drop(a);
        assert!(b.path().is_dir());
        drop(b);
        std::fs::remove_dir_all(&parent).unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_large_tree_removed_on_multi_thread_runtime() {
        let parent = scratch_parent();
        let ws = Workspace::create(&parent, "manim_").await.unwrap();
        let partials = ws.media_dir().join("videos").join("scene").join("partial_movie_files");
        std::fs::create_dir_all(&partials).unwrap();
        for i in 0..500 {
            std::fs::write(partials.join(format!("chunk_{i:04}.mp4")), b"partial").unwrap();
        }
        let root = ws.path().to_path_buf();

        // Dropped on a worker thread, as when a response body finishes.
        tokio::spawn(async move { drop(ws) }).await.unwrap();
        assert!(!root.exists());
        std::fs::remove_dir_all(&parent).unwrap();
    }

    #[tokio::test]
    async fn test_drop_after_external_removal_is_quiet() {
        let parent = scratch_parent();
        let ws = Workspace::create(&parent, "x_").await.unwrap();
        std::fs::remove_dir_all(ws.path()).unwrap();
        drop(ws);
        std::fs::remove_dir_all(&parent).unwrap();
    }
}
