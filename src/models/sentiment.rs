use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment label derived from a compound polarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Qualitative market read of a sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketTag {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    pub fn tag(&self) -> MarketTag {
        MarketTag::from(*self)
    }
}

impl MarketTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketTag::Bullish => "Bullish",
            MarketTag::Bearish => "Bearish",
            MarketTag::Neutral => "Neutral",
        }
    }
}

impl From<Sentiment> for MarketTag {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Positive => MarketTag::Bullish,
            Sentiment::Negative => MarketTag::Bearish,
            Sentiment::Neutral => MarketTag::Neutral,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MarketTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
