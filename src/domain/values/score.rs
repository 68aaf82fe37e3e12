use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment polarity in `-1.0..=1.0`; negative is bearish.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub const NEUTRAL: Score = Score(0.0);

    /// Clamp into range; NaN becomes neutral.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Score::NEUTRAL;
        }
        Score(value.clamp(-1.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.3}", self.0)
    }
}
