use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    VeryBearish,
    Bearish,
    Neutral,
    Bullish,
    VeryBullish,
}

impl SentimentLabel {
    /// Fixed thresholds; each bin is inclusive of its upper bound.
    pub fn from_score(score: f64) -> Self {
        if score <= -0.6 {
            SentimentLabel::VeryBearish
        } else if score <= -0.2 {
            SentimentLabel::Bearish
        } else if score <= 0.2 {
            SentimentLabel::Neutral
        } else if score <= 0.6 {
            SentimentLabel::Bullish
        } else {
            SentimentLabel::VeryBullish
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, SentimentLabel::Bullish | SentimentLabel::VeryBullish)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, SentimentLabel::Bearish | SentimentLabel::VeryBearish)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::VeryBearish => write!(f, "very_bearish"),
            SentimentLabel::Bearish => write!(f, "bearish"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Bullish => write!(f, "bullish"),
            SentimentLabel::VeryBullish => write!(f, "very_bullish"),
        }
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "very_bearish" | "very_negative" | "strongly_negative" | "strongly_bearish" => {
                Ok(SentimentLabel::VeryBearish)
            }
            "bearish" | "negative" => Ok(SentimentLabel::Bearish),
            "neutral" | "mixed" => Ok(SentimentLabel::Neutral),
            "bullish" | "positive" => Ok(SentimentLabel::Bullish),
            "very_bullish" | "very_positive" | "strongly_positive" | "strongly_bullish" => {
                Ok(SentimentLabel::VeryBullish)
            }
            _ => Err(format!("Unknown sentiment label: {s}")),
        }
    }
}
