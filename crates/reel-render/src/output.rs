use std::io;
use std::path::{Path, PathBuf};

/// Walk `dir` recursively and return the first file whose name ends with
/// `extension` (e.g. `.mp4`).
///
/// Traversal order is whatever the filesystem yields. A missing `dir` is
/// treated as containing nothing.
pub fn find_video_file(dir: &Path, extension: &str) -> io::Result<Option<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_dir() {
            subdirs.push(path);
            continue;
        }

        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(extension));
        if matches {
            return Ok(Some(path));
        }
    }

    for subdir in subdirs {
        if let Some(found) = find_video_file(&subdir, extension)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("reel-out-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_finds_nested_video() {
        let dir = scratch_dir();
        let nested = dir.join("videos").join("scene").join("720p30");
        std::fs::create_dir_all(nested.join("partial_movie_files")).unwrap();
        std::fs::write(dir.join("videos").join("scene.log"), b"log").unwrap();
        std::fs::write(nested.join("Intro.mp4"), b"video").unwrap();

        let found = find_video_file(&dir, ".mp4").unwrap();
        assert_eq!(found, Some(nested.join("Intro.mp4")));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_no_video() {
        let dir = scratch_dir();
        std::fs::create_dir_all(dir.join("images")).unwrap();
        std::fs::write(dir.join("images").join("Intro.png"), b"png").unwrap();
        std::fs::write(dir.join("mp4"), b"not a match").unwrap();

        assert_eq!(find_video_file(&dir, ".mp4").unwrap(), None);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_dir() {
        let dir = std::env::temp_dir().join(format!("reel-missing-{}", uuid::Uuid::new_v4()));
        assert_eq!(find_video_file(&dir, ".mp4").unwrap(), None);
    }
}
