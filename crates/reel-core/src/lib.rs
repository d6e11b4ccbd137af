//! # reel-core
//!
//! Core types for the Reel render service.
//! This crate holds everything that does not touch the filesystem or spawn
//! processes: the error taxonomy, service configuration, request decoding,
//! and the scene-class heuristic used to pick what the renderer should draw.

pub mod config;
pub mod error;
pub mod request;
pub mod scene;

pub use config::{ConfigError, ReelConfig, RenderConfig, ServerConfig};
pub use error::{RenderError, RenderResult};
pub use request::RenderRequest;
pub use scene::extract_scene_name;
