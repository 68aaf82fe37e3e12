use serde::{Deserialize, Serialize};
use std::fmt;

/// Certainty of a sentiment reading, always within `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Clamp into range; NaN becomes 0.0.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Confidence(0.0);
        }
        Confidence(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Assumed when an analyzer does not report its certainty.
impl Default for Confidence {
    fn default() -> Self {
        Confidence(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_bounds_and_nan() {
        assert_eq!(Confidence::clamped(3.0).value(), 1.0);
        assert_eq!(Confidence::clamped(-3.0).value(), 0.0);
        assert_eq!(Confidence::clamped(f64::NAN).value(), 0.0);
        assert_eq!(Confidence::clamped(0.7).value(), 0.7);
    }
}
