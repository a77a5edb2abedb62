use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use reqwest::StatusCode;
use serde_json::Value;

use crate::models::news::{NewsQuery, RawArticle};
use crate::models::settings::AppSettings;
use crate::utils::http::build_news_client;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Non-200 answer. `message` is the API's own explanation when it sent one.
    #[error("news API returned status {status_code}")]
    Status {
        status_code: u16,
        message: Option<String>,
    },
    #[error("news API request failed: {0}")]
    Transport(String),
    #[error("news API response could not be read: {0}")]
    Decode(String),
}

/// Where the pipeline gets its articles from.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Articles for `symbol` over the configured trailing window, newest first.
    async fn fetch(&self, symbol: &str) -> std::result::Result<Vec<RawArticle>, FetchError>;

    fn window_days(&self) -> u32;
}

pub struct NewsClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    domains: Vec<String>,
    window_days: u32,
}

impl NewsClient {
    pub fn new(settings: &AppSettings) -> Result<Self> {
        Ok(Self {
            http: build_news_client(settings.news_timeout_secs)?,
            api_url: settings.news_api_url.clone(),
            api_key: settings.news_api_key.clone(),
            domains: settings.domains.clone(),
            window_days: settings.window_days,
        })
    }

    pub fn query_for(&self, symbol: &str, today: NaiveDate) -> NewsQuery {
        NewsQuery::trailing(symbol, &self.domains, self.window_days, today)
    }

    pub async fn fetch_query(
        &self,
        query: &NewsQuery,
    ) -> std::result::Result<Vec<RawArticle>, FetchError> {
        let from = query.from.format("%Y-%m-%d").to_string();
        let to = query.to.format("%Y-%m-%d").to_string();

        let resp = self
            .http
            .get(&self.api_url)
            .query(&[
                ("q", query.search_expression().as_str()),
                ("domains", query.domains_param().as_str()),
                ("apiKey", self.api_key.as_str()),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("sortBy", "publishedAt"),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if status != StatusCode::OK {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|json| json["message"].as_str().map(|m| m.to_string()));
            return Err(FetchError::Status {
                status_code: status.as_u16(),
                message,
            });
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        let mut articles = parse_articles(&json)?;
        sort_newest_first(&mut articles);

        log::info!(
            "fetched {} articles for {} ({} to {}, {} domains)",
            articles.len(),
            query.symbol,
            from,
            to,
            query.domains.len()
        );
        Ok(articles)
    }
}

#[async_trait]
impl NewsSource for NewsClient {
    async fn fetch(&self, symbol: &str) -> std::result::Result<Vec<RawArticle>, FetchError> {
        let query = self.query_for(symbol, Local::now().date_naive());
        self.fetch_query(&query).await
    }

    fn window_days(&self) -> u32 {
        self.window_days
    }
}

fn parse_articles(json: &Value) -> std::result::Result<Vec<RawArticle>, FetchError> {
    let list = json["articles"]
        .as_array()
        .ok_or_else(|| FetchError::Decode("missing `articles` array".to_string()))?;

    let articles = list
        .iter()
        .map(|item| RawArticle {
            title: text_field(&item["title"]),
            description: text_field(&item["description"]),
            content: text_field(&item["content"]),
            published_at: item["publishedAt"].as_str().unwrap_or("").to_string(),
            source_name: item["source"]["name"].as_str().unwrap_or("").to_string(),
            url: text_field(&item["url"]),
        })
        .collect();
    Ok(articles)
}

fn text_field(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.to_string())
}

/// Stable; articles without a readable timestamp go last.
fn sort_newest_first(articles: &mut [RawArticle]) {
    articles.sort_by(|a, b| b.published_time().cmp(&a.published_time()));
}
