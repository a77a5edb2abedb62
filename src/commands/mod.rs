pub mod news_cmd;
pub mod render;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;

/// Browser UI + JSON routes
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(news_cmd::index))
        .route("/analyze", get(news_cmd::analyze))
        .route("/api/news", get(news_cmd::news_report))
        .route("/health", get(news_cmd::health))
        .with_state(state)
}
