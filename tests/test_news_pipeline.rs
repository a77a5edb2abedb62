//! End-to-end pipeline runs against a mocked news API.
//!
//! Translation and sentiment are stubbed so no external service is contacted:
//!   cargo test --test test_news_pipeline

use anyhow::Result;
use app_lib::commands;
use app_lib::models::sentiment::{MarketTag, Sentiment};
use app_lib::models::settings::AppSettings;
use app_lib::services::news_service::NewsClient;
use app_lib::services::pipeline::{NewsPipeline, PipelineState};
use app_lib::services::presenter::CollectingPresenter;
use app_lib::services::sentiment_service::{SentimentClassifier, SentimentScorer};
use app_lib::services::translation_service::{TranslationBackend, Translator};
use app_lib::utils::retry::RetryPolicy;
use app_lib::AppState;
use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Already-English input comes back unchanged.
#[derive(Default)]
struct IdentityTranslator {
    calls: AtomicUsize,
}

#[async_trait]
impl TranslationBackend for IdentityTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(text.to_string())
    }
}

#[derive(Default)]
struct FixedScorer {
    calls: AtomicUsize,
}

impl SentimentScorer for FixedScorer {
    fn compound(&self, _text: &str) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        0.3
    }
}

struct Harness {
    translator: Arc<IdentityTranslator>,
    scorer: Arc<FixedScorer>,
    pipeline: NewsPipeline,
}

fn harness(server: &MockServer) -> Harness {
    let settings = AppSettings {
        news_api_url: server.url("/v2/everything"),
        news_api_key: "test-key".to_string(),
        ..AppSettings::default()
    };
    let translator = Arc::new(IdentityTranslator::default());
    let scorer = Arc::new(FixedScorer::default());
    let pipeline = NewsPipeline::new(
        Arc::new(NewsClient::new(&settings).unwrap()),
        Translator::new(translator.clone(), RetryPolicy::default()),
        SentimentClassifier::new(scorer.clone()),
    );
    Harness {
        translator,
        scorer,
        pipeline,
    }
}

fn two_articles() -> serde_json::Value {
    json!({
        "status": "ok",
        "totalResults": 2,
        "articles": [
            {
                "source": {"id": null, "name": "Moneycontrol"},
                "author": "Staff",
                "title": "TATAMOTORS shares jump after strong JLR sales",
                "description": "Investors cheered the quarterly numbers.",
                "url": "https://www.moneycontrol.com/news/tatamotors",
                "content": "Shares of the automaker rose 4% on Monday…",
                "publishedAt": "2024-03-04T09:30:00Z"
            },
            {
                "source": {"id": null, "name": "CNBC"},
                "title": "Oil prices steady as traders weigh supply",
                "description": "Brent crude was little changed.",
                "url": "https://www.cnbc.com/oil",
                "content": "Oil prices held steady…",
                "publishedAt": "2024-03-04T11:00:00Z"
            }
        ]
    })
}

#[tokio::test]
async fn test_only_relevant_article_is_enriched_and_rendered() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/everything")
                .query_param("q", "TATAMOTORS AND (stocks OR market OR finance OR trading)")
                .query_param("sortBy", "publishedAt")
                .query_param("apiKey", "test-key");
            then.status(200).json_body(two_articles());
        })
        .await;

    let h = harness(&server);
    let mut presenter = CollectingPresenter::new();
    let state = h.pipeline.run("TATAMOTORS", &mut presenter).await;

    mock.assert_async().await;
    assert_eq!(state, PipelineState::Rendered { count: 1 });

    let report = presenter.into_report();
    assert_eq!(report.articles.len(), 1);
    let rendered = &report.articles[0];
    assert_eq!(rendered.heading, "TATAMOTORS News-1");
    assert_eq!(
        rendered.article.translated_title,
        "TATAMOTORS shares jump after strong JLR sales"
    );
    assert_eq!(
        rendered.article.translated_description,
        "Investors cheered the quarterly numbers."
    );
    assert_eq!(rendered.article.raw.source_name, "Moneycontrol");
    assert_eq!(rendered.article.raw.published_at, "2024-03-04T09:30:00Z");
    assert_eq!(rendered.article.sentiment, Sentiment::Positive);
    assert_eq!(rendered.article.tag, MarketTag::Bullish);

    // three fields translated, one description scored
    assert_eq!(h.translator.calls.load(Ordering::SeqCst), 3);
    assert_eq!(h.scorer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_server_error_fails_without_enrichment() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/everything");
            then.status(500);
        })
        .await;

    let h = harness(&server);
    let mut presenter = CollectingPresenter::new();
    let state = h.pipeline.run("TATAMOTORS", &mut presenter).await;

    assert_eq!(state, PipelineState::Failed);
    assert_eq!(h.translator.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.scorer.calls.load(Ordering::SeqCst), 0);
    let report = presenter.into_report();
    assert!(report.articles.is_empty());
    assert!(report
        .notices
        .iter()
        .any(|n| n.message == "Failed to fetch news. Status code: 500"));
}

#[tokio::test]
async fn test_no_matching_articles_reports_no_results() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/everything");
            then.status(200).json_body(two_articles());
        })
        .await;

    let h = harness(&server);
    let mut presenter = CollectingPresenter::new();
    let state = h.pipeline.run("WIPRO", &mut presenter).await;

    assert_eq!(state, PipelineState::NoResults);
    let report = presenter.into_report();
    assert!(report.no_results);
    assert!(report
        .notices
        .iter()
        .any(|n| n.message == "No news found for WIPRO in the past week."));
    assert_eq!(h.translator.calls.load(Ordering::SeqCst), 0);
}

async fn serve(pipeline: NewsPipeline) -> String {
    let state = Arc::new(AppState::new(AppSettings::default(), pipeline));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, commands::router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_browser_page_streams_rendered_article() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/everything");
            then.status(200).json_body(two_articles());
        })
        .await;

    let base = serve(harness(&server).pipeline).await;

    let index = reqwest::get(format!("{}/", base)).await.unwrap().text().await.unwrap();
    assert!(index.contains("Fetch News and Analyze Sentiment"));

    let resp = reqwest::get(format!("{}/analyze?symbol=TATAMOTORS", base)).await.unwrap();
    assert!(resp.status().is_success());
    let page = resp.text().await.unwrap();
    assert!(page.contains("Fetching news for TATAMOTORS from selected websites..."));
    assert!(page.contains("Latest News for TATAMOTORS from Different Sources"));
    assert!(page.contains("TATAMOTORS News-1"));
    assert!(!page.contains("TATAMOTORS News-2"));
    assert!(page.contains("Bullish"));
    assert!(page.trim_end().ends_with("</html>"));
}

#[tokio::test]
async fn test_json_endpoint_status_codes() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/everything");
            then.status(200).json_body(two_articles());
        })
        .await;

    let base = serve(harness(&server).pipeline).await;

    let ok = reqwest::get(format!("{}/api/news?symbol=TATAMOTORS", base)).await.unwrap();
    assert_eq!(ok.status().as_u16(), 200);
    let body: serde_json::Value = ok.json().await.unwrap();
    assert_eq!(body["outcome"]["state"], "rendered");
    assert_eq!(body["outcome"]["count"], 1);
    assert_eq!(body["articles"][0]["sentiment"], "Positive");
    assert_eq!(body["articles"][0]["tag"], "Bullish");

    let blank = reqwest::get(format!("{}/api/news?symbol=%20%20", base)).await.unwrap();
    assert_eq!(blank.status().as_u16(), 400);
    let body: serde_json::Value = blank.json().await.unwrap();
    assert_eq!(body["outcome"]["state"], "idle");
    assert_eq!(body["notices"][0]["level"], "warning");

    let health: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
}
