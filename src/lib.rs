pub mod models;
pub mod services;
pub mod commands;
pub mod utils;

use anyhow::{Context, Result};
use std::sync::Arc;

use models::settings::AppSettings;
use services::pipeline::NewsPipeline;
use services::sentiment_service;

pub struct AppState {
    pub settings: AppSettings,
    pub pipeline: NewsPipeline,
}

impl AppState {
    pub fn new(settings: AppSettings, pipeline: NewsPipeline) -> Self {
        Self { settings, pipeline }
    }
}

/// Loads the lexicon, wires the pipeline and serves the UI until the process stops.
pub async fn run(settings: AppSettings) -> Result<()> {
    sentiment_service::ensure_lexicon();

    let pipeline = NewsPipeline::from_settings(&settings)?;
    let bind_addr = settings.bind_addr.clone();
    let state = Arc::new(AppState::new(settings, pipeline));
    let app = commands::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    log::info!("stock news sentiment UI on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
