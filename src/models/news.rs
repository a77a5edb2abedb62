use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::sentiment::{MarketTag, Sentiment};

/// One news search: symbol, trailing window and source domain allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub symbol: String,
    pub window_days: u32,
    pub domains: Vec<String>,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl NewsQuery {
    /// Trailing window ending at `today`, inclusive on both ends.
    pub fn trailing(symbol: &str, domains: &[String], window_days: u32, today: NaiveDate) -> Self {
        let from = today - chrono::Duration::days(i64::from(window_days));
        Self {
            symbol: symbol.to_string(),
            window_days,
            domains: domains.to_vec(),
            from,
            to: today,
        }
    }

    /// Search expression biased toward financial coverage of the symbol.
    pub fn search_expression(&self) -> String {
        format!("{} AND (stocks OR market OR finance OR trading)", self.symbol)
    }

    pub fn domains_param(&self) -> String {
        self.domains.join(",")
    }
}

/// Article as delivered by the news API. Built field by field from the
/// response JSON (`publishedAt`, `source.name`), never deserialized directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    /// ISO-8601 as delivered by the API
    pub published_at: String,
    pub source_name: String,
    pub url: Option<String>,
}

impl RawArticle {
    pub fn published_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn content_text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Article with translated fields and a sentiment label, rendered once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedArticle {
    pub raw: RawArticle,
    pub translated_title: String,
    pub translated_description: String,
    pub translated_content: String,
    pub sentiment: Sentiment,
    pub tag: MarketTag,
}
