//! # reel-render
//!
//! The render pipeline: allocate a workspace, hand the script to the external
//! renderer, and locate the video it leaves behind.
//! The renderer is opaque; all we know is its command line and that it
//! writes a video somewhere under the media directory we give it.

pub mod output;
pub mod process;
pub mod renderer;
pub mod workspace;

pub use output::find_video_file;
pub use process::{ProcessOutcome, ProcessOutput, RenderProcess};
pub use renderer::{RenderedVideo, Renderer};
pub use workspace::Workspace;
