use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

use crate::models::news::{EnrichedArticle, RawArticle};
use crate::models::settings::AppSettings;
use crate::services::news_service::{FetchError, NewsClient, NewsSource};
use crate::services::presenter::{NoticeLevel, Presenter};
use crate::services::relevance_filter::RelevanceFilter;
use crate::services::sentiment_service::{SentimentClassifier, VaderScorer};
use crate::services::translation_service::{GoogleTranslateBackend, Translation, Translator};

/// Where a run stands. `run` returns one of the terminal states
/// (`Idle` for rejected input, `Failed`, `NoResults`, `Rendered`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Fetching,
    Filtering,
    Enriching { index: usize, total: usize },
    Rendered { count: usize },
    NoResults,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please enter a valid stock name.")]
    EmptySymbol,
}

/// fetch -> relevance filter -> translate -> classify -> present, one article at a time.
/// Holds no per-run state, so one instance serves any number of runs.
pub struct NewsPipeline {
    news: Arc<dyn NewsSource>,
    translator: Translator,
    classifier: SentimentClassifier,
}

impl NewsPipeline {
    pub fn new(news: Arc<dyn NewsSource>, translator: Translator, classifier: SentimentClassifier) -> Self {
        Self {
            news,
            translator,
            classifier,
        }
    }

    /// Production wiring: news API client, Google translate, VADER.
    pub fn from_settings(settings: &AppSettings) -> Result<Self> {
        let news = Arc::new(NewsClient::new(settings)?);
        let backend = Arc::new(GoogleTranslateBackend::new(settings)?);
        let translator = Translator::new(backend, settings.translate_retry_policy());
        let classifier = SentimentClassifier::new(Arc::new(VaderScorer::new()));
        Ok(Self::new(news, translator, classifier))
    }

    pub fn validate(symbol: &str) -> std::result::Result<&str, InputError> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            Err(InputError::EmptySymbol)
        } else {
            Ok(trimmed)
        }
    }

    pub async fn run(&self, symbol: &str, presenter: &mut dyn Presenter) -> PipelineState {
        let symbol = match Self::validate(symbol) {
            Ok(s) => s,
            Err(e) => {
                presenter.notice(NoticeLevel::Warning, &e.to_string());
                return self.enter(PipelineState::Idle);
            }
        };

        self.enter(PipelineState::Fetching);
        presenter.notice(
            NoticeLevel::Info,
            &format!("Fetching news for {} from selected websites...", symbol),
        );
        let articles = match self.news.fetch(symbol).await {
            Ok(articles) => articles,
            Err(e) => {
                log::error!("news fetch for {} failed: {}", symbol, e);
                presenter.notice(NoticeLevel::Error, &fetch_failure_message(&e));
                return self.enter(PipelineState::Failed);
            }
        };

        self.enter(PipelineState::Filtering);
        let fetched = articles.len();
        let relevant = RelevanceFilter::filter(articles, symbol);
        log::info!("{} of {} articles mention {}", relevant.len(), fetched, symbol);

        if relevant.is_empty() {
            presenter.no_results(symbol, self.news.window_days());
            return self.enter(PipelineState::NoResults);
        }

        presenter.section(&format!("Latest News for {} from Different Sources", symbol));
        let total = relevant.len();
        for (i, raw) in relevant.into_iter().enumerate() {
            self.enter(PipelineState::Enriching { index: i + 1, total });
            let enriched = self.enrich(raw, presenter).await;
            presenter.article(i + 1, symbol, enriched);
        }

        self.enter(PipelineState::Rendered { count: total })
    }

    /// Translates title, description and content in that order, then classifies
    /// the translated description. Translation fallbacks become warnings.
    pub async fn enrich(&self, raw: RawArticle, presenter: &mut dyn Presenter) -> EnrichedArticle {
        let title = self.translator.translate(raw.title_text()).await;
        warn_on_fallback(&title, presenter);
        let description = self.translator.translate(raw.description_text()).await;
        warn_on_fallback(&description, presenter);
        let content = self.translator.translate(raw.content_text()).await;
        warn_on_fallback(&content, presenter);

        let sentiment = self.classifier.classify(&description.text);
        EnrichedArticle {
            raw,
            translated_title: title.text,
            translated_description: description.text,
            translated_content: content.text,
            sentiment,
            tag: sentiment.tag(),
        }
    }

    fn enter(&self, state: PipelineState) -> PipelineState {
        log::debug!("pipeline -> {:?}", state);
        state
    }
}

fn warn_on_fallback(translation: &Translation, presenter: &mut dyn Presenter) {
    if translation.is_fallback() {
        presenter.notice(
            NoticeLevel::Warning,
            &format!("Failed to translate: {}", translation.text),
        );
    }
}

pub fn fetch_failure_message(err: &FetchError) -> String {
    match err {
        FetchError::Status { status_code, message: Some(msg) } => {
            format!("Failed to fetch news. Status code: {} ({})", status_code, msg)
        }
        FetchError::Status { status_code, message: None } => {
            format!("Failed to fetch news. Status code: {}", status_code)
        }
        FetchError::Transport(msg) => format!("Error fetching news: {}", msg),
        FetchError::Decode(msg) => format!("Error fetching news: {}", msg),
    }
}
