use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::commands::render::{render_fragment, HtmlPresenter, PageHead, PageTail};
use crate::services::pipeline::PipelineState;
use crate::services::presenter::{AnalysisReport, CollectingPresenter};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    #[serde(default)]
    pub symbol: String,
}

/// GET / - input form
pub async fn index() -> Html<String> {
    let mut page = render_fragment(&PageHead { symbol: "" });
    page.push_str(&render_fragment(&PageTail));
    Html(page)
}

/// GET /analyze?symbol= - runs the pipeline and streams each article as it is enriched
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SymbolQuery>,
) -> Response {
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let mut presenter = HtmlPresenter::new(tx);
    presenter.open(query.symbol.trim());

    tokio::spawn(async move {
        let outcome = state.pipeline.run(&query.symbol, &mut presenter).await;
        log::info!("analysis of {:?} finished: {:?}", query.symbol, outcome);
        presenter.finish();
    });

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (Ok::<_, Infallible>(chunk), rx))
    });

    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response()
}

#[derive(Debug, Serialize)]
pub struct NewsReportResponse {
    pub symbol: String,
    pub outcome: PipelineState,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

/// GET /api/news?symbol= - same run, collected into one JSON document
pub async fn news_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SymbolQuery>,
) -> (StatusCode, Json<NewsReportResponse>) {
    let mut presenter = CollectingPresenter::new();
    let outcome = state.pipeline.run(&query.symbol, &mut presenter).await;

    let status = match outcome {
        PipelineState::Idle => StatusCode::BAD_REQUEST,
        PipelineState::Failed => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };

    (
        status,
        Json(NewsReportResponse {
            symbol: query.symbol.trim().to_string(),
            outcome,
            report: presenter.into_report(),
        }),
    )
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
