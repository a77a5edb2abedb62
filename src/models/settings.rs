use anyhow::{anyhow, Context, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::retry::{Backoff, RetryPolicy};

pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2/everything";
pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

pub const DEFAULT_DOMAINS: &[&str] = &[
    "moneycontrol.com",
    "etmarket.com",
    "economictimes.indiatimes.com",
    "timesofindia.indiatimes.com",
    "capitalmarket.com",
    "livemint.com",
    "finance.yahoo.com",
    "bloomberg.com",
    "cnbc.com",
    "investopedia.com",
    "business-standard.com",
];

#[derive(Clone)]
pub struct AppSettings {
    pub news_api_url: String,
    pub news_api_key: String,
    pub domains: Vec<String>,
    pub window_days: u32,
    pub news_timeout_secs: u64,
    pub translate_url: String,
    pub translate_timeout_secs: u64,
    pub translate_max_attempts: u32,
    pub translate_retry_delay_ms: u64,
    pub bind_addr: String,
}

fn default_news_api_url() -> String { DEFAULT_NEWS_API_URL.to_string() }
fn default_domains() -> Vec<String> { DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect() }
fn default_window_days() -> u32 { 7 }
fn default_news_timeout() -> u64 { 15 }
fn default_translate_url() -> String { DEFAULT_TRANSLATE_URL.to_string() }
fn default_translate_timeout() -> u64 { 10 }
fn default_translate_attempts() -> u32 { 3 }
fn default_translate_delay() -> u64 { 1000 }
fn default_bind_addr() -> String { "127.0.0.1:8501".to_string() }

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            news_api_url: default_news_api_url(),
            news_api_key: String::new(),
            domains: default_domains(),
            window_days: default_window_days(),
            news_timeout_secs: default_news_timeout(),
            translate_url: default_translate_url(),
            translate_timeout_secs: default_translate_timeout(),
            translate_max_attempts: default_translate_attempts(),
            translate_retry_delay_ms: default_translate_delay(),
            bind_addr: default_bind_addr(),
        }
    }
}

// The API key must never reach the logs.
impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("news_api_url", &self.news_api_url)
            .field("news_api_key", &"<redacted>")
            .field("domains", &self.domains)
            .field("window_days", &self.window_days)
            .field("news_timeout_secs", &self.news_timeout_secs)
            .field("translate_url", &self.translate_url)
            .field("translate_timeout_secs", &self.translate_timeout_secs)
            .field("translate_max_attempts", &self.translate_max_attempts)
            .field("translate_retry_delay_ms", &self.translate_retry_delay_ms)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl AppSettings {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Self::default();

        settings.news_api_key = get("NEWS_API_KEY")
            .ok_or_else(|| anyhow!("NEWS_API_KEY is not set"))?;

        if let Some(url) = get("NEWS_API_URL") {
            settings.news_api_url = url;
        }
        if let Some(domains) = get("NEWS_DOMAINS") {
            settings.domains = domains
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect();
        }
        if let Some(v) = get("NEWS_WINDOW_DAYS") {
            settings.window_days = parse_var("NEWS_WINDOW_DAYS", &v)?;
        }
        if let Some(v) = get("NEWS_TIMEOUT_SECS") {
            settings.news_timeout_secs = parse_var("NEWS_TIMEOUT_SECS", &v)?;
        }
        if let Some(url) = get("TRANSLATE_URL") {
            settings.translate_url = url;
        }
        if let Some(v) = get("TRANSLATE_TIMEOUT_SECS") {
            settings.translate_timeout_secs = parse_var("TRANSLATE_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("TRANSLATE_MAX_ATTEMPTS") {
            settings.translate_max_attempts = parse_var("TRANSLATE_MAX_ATTEMPTS", &v)?;
        }
        if let Some(v) = get("TRANSLATE_RETRY_DELAY_MS") {
            settings.translate_retry_delay_ms = parse_var("TRANSLATE_RETRY_DELAY_MS", &v)?;
        }
        if let Some(addr) = get("BIND_ADDR") {
            settings.bind_addr = addr;
        }

        if settings.translate_max_attempts == 0 {
            return Err(anyhow!("TRANSLATE_MAX_ATTEMPTS must be at least 1"));
        }
        Ok(settings)
    }

    pub fn translate_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.translate_max_attempts,
            backoff: Backoff::Fixed(Duration::from_millis(self.translate_retry_delay_ms)),
        }
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse::<T>()
        .with_context(|| format!("invalid value for {}: {:?}", key, value))
}
