use axum::body::{Body, Bytes};
use futures::stream;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use reel_render::RenderedVideo;

const CHUNK_SIZE: usize = 64 * 1024;

/// Stream `file` as a response body, keeping `video` (and its workspace)
/// alive until the last byte has been read.
///
/// The workspace is released as soon as EOF is reached, before the body
/// reports completion. If the client goes away first, dropping the stream
/// releases it instead.
pub fn video_body(file: File, video: RenderedVideo) -> Body {
    let chunks = stream::unfold(Some((file, video)), |state| async move {
        let (mut file, video) = state?;
        let mut buf = vec![0u8; CHUNK_SIZE];
        match file.read(&mut buf).await {
            Ok(0) => {
                drop(file);
                drop(video);
                None
            }
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(Bytes::from(buf)), Some((file, video))))
            }
            Err(e) => {
                tracing::warn!(video = %video.path().display(), "Error streaming video: {}", e);
                Some((Err(e), None))
            }
        }
    });
    Body::from_stream(chunks)
}
