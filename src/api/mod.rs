//! Read-only HTTP surface: the listing page, a health probe, and static
//! serving of the downloaded images.

pub mod error;
pub mod models;
pub mod services;
pub mod state;

use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let image_dir = state.config.collector.image_dir.clone();

    Router::new()
        .route("/", get(services::list_images))
        .route("/health", get(services::health))
        .nest_service("/images", ServeDir::new(image_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
