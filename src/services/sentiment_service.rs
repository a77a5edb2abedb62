use std::sync::{Arc, OnceLock};
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::models::sentiment::Sentiment;

/// Compound score strictly above this is Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound score strictly below this is Negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Text in, compound polarity score in [-1.0, 1.0] out.
pub trait SentimentScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

static LEXICON: OnceLock<SentimentIntensityAnalyzer<'static>> = OnceLock::new();

/// Loads the VADER lexicon once per process. Safe to call repeatedly.
pub fn ensure_lexicon() -> &'static SentimentIntensityAnalyzer<'static> {
    LEXICON.get_or_init(|| {
        log::info!("loading VADER sentiment lexicon");
        SentimentIntensityAnalyzer::new()
    })
}

/// Lexicon-based scorer backed by VADER.
pub struct VaderScorer {
    analyzer: &'static SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: ensure_lexicon(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for VaderScorer {
    fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let scores = self.analyzer.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(0.0)
    }
}

pub struct SentimentClassifier {
    scorer: Arc<dyn SentimentScorer>,
}

impl SentimentClassifier {
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }

    pub fn label_for_score(score: f64) -> Sentiment {
        if score > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        Self::label_for_score(self.scorer.compound(text))
    }
}
