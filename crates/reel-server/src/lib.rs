//! # reel-server
//!
//! HTTP front end for the render pipeline. Two routes:
//!
//! - `GET /health` reports that the service is up.
//! - `POST /render` takes `{ "script": "..." }` and answers with the rendered
//!   video, or a JSON error describing which stage failed.

pub mod error;
pub mod routes;
pub mod stream;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use reel_core::ReelConfig;
use reel_render::Renderer;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub renderer: Renderer,
    pub service_name: Arc<str>,
}

impl AppState {
    pub fn new(config: &ReelConfig) -> Self {
        Self {
            renderer: Renderer::new(config.render.clone()),
            service_name: Arc::from(config.server.service_name.as_str()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/render", post(routes::render))
        .with_state(state)
        // Scripts carry no size cap.
        .layer(DefaultBodyLimit::disable())
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
}
