use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::models::settings::AppSettings;
use crate::utils::http::build_translate_client;
use crate::utils::retry::{retry_when, RetryPolicy, Sleeper, TokioSleeper};

/// Longest text the free endpoint accepts in one request.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Rejected before sending; another attempt cannot succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("text too long to translate ({len} chars, max {max})", max = MAX_TEXT_CHARS)]
pub struct TextTooLong {
    pub len: usize,
}

/// Auto-detect source language, translate to English.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

pub struct GoogleTranslateBackend {
    http: reqwest::Client,
    url: String,
}

impl GoogleTranslateBackend {
    pub fn new(settings: &AppSettings) -> Result<Self> {
        Ok(Self {
            http: build_translate_client(settings.translate_timeout_secs)?,
            url: settings.translate_url.clone(),
        })
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslateBackend {
    async fn translate(&self, text: &str) -> Result<String> {
        let len = text.chars().count();
        if len > MAX_TEXT_CHARS {
            return Err(TextTooLong { len }.into());
        }

        let url = format!(
            "{}?client=gtx&sl=auto&tl=en&dt=t&q={}",
            self.url,
            urlencoding::encode(text)
        );
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(anyhow!("translate API error ({}): {}", status, snippet));
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| anyhow!("translate response parse error: {}", e))?;
        parse_translation(&json)
    }
}

/// `[[["Hello ","Hallo ",...],["world","Welt",...]], null, "de", ...]`
fn parse_translation(json: &Value) -> Result<String> {
    let segments = json[0]
        .as_array()
        .ok_or_else(|| anyhow!("unexpected translate response shape"))?;

    let translated: String = segments
        .iter()
        .filter_map(|seg| seg[0].as_str())
        .collect();
    Ok(translated)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("translation failed after {attempts} attempts: {last_error}")]
pub struct TranslationError {
    pub attempts: u32,
    pub last_error: String,
}

/// Translated text, or the original text plus the reason it stayed untranslated.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    pub error: Option<TranslationError>,
}

impl Translation {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

pub struct Translator {
    backend: Arc<dyn TranslationBackend>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl Translator {
    pub fn new(backend: Arc<dyn TranslationBackend>, policy: RetryPolicy) -> Self {
        Self {
            backend,
            policy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Never fails: after the retry budget is spent the original text comes back.
    /// Blank input is returned as-is without touching the backend.
    pub async fn translate(&self, text: &str) -> Translation {
        if text.trim().is_empty() {
            return Translation {
                text: text.to_string(),
                error: None,
            };
        }

        let backend = self.backend.as_ref();
        let outcome = retry_when(
            &self.policy,
            self.sleeper.as_ref(),
            || backend.translate(text),
            |e: &anyhow::Error| !e.is::<TextTooLong>(),
        )
        .await;
        match outcome {
            Ok(translated) => Translation {
                text: translated,
                error: None,
            },
            Err(exhausted) => {
                log::error!(
                    "giving up on translation after {} attempts: {}",
                    exhausted.attempts,
                    exhausted.last_error
                );
                Translation {
                    text: text.to_string(),
                    error: Some(TranslationError {
                        attempts: exhausted.attempts,
                        last_error: exhausted.last_error.to_string(),
                    }),
                }
            }
        }
    }
}
