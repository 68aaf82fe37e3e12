use serde::{Deserialize, Serialize};

/// One three-class classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl ClassProbabilities {
    pub fn new(positive: f64, negative: f64, neutral: f64) -> Self {
        Self { positive, negative, neutral }
    }

    /// Build from `(label, probability)` pairs as classifier heads report them.
    /// Labels are matched case-insensitively; `LABEL_0..2` follow FinBERT's
    /// positive/negative/neutral ordering.
    pub fn from_labelled<'a, I>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut probs = ClassProbabilities::default();
        let mut seen = 0;
        for (label, p) in pairs {
            match label.to_lowercase().as_str() {
                "positive" | "label_0" => probs.positive = p,
                "negative" | "label_1" => probs.negative = p,
                "neutral" | "label_2" => probs.neutral = p,
                other => return Err(format!("Unexpected classifier label: {other}")),
            }
            seen += 1;
        }
        if seen == 0 {
            return Err("Classifier returned no labels".into());
        }
        Ok(probs)
    }

    pub fn score(&self) -> f64 {
        self.positive - self.negative
    }

    pub fn confidence(&self) -> f64 {
        self.positive.max(self.negative).max(self.neutral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_and_confidence() {
        let p = ClassProbabilities::new(0.7, 0.1, 0.2);
        assert!((p.score() - 0.6).abs() < 1e-9);
        assert!((p.confidence() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn neutral_dominant_confidence() {
        let p = ClassProbabilities::new(0.2, 0.15, 0.65);
        assert!((p.confidence() - 0.65).abs() < 1e-9);
    }

    #[test]
    fn from_labelled_maps_names() {
        let p = ClassProbabilities::from_labelled([
            ("Negative", 0.8),
            ("neutral", 0.15),
            ("POSITIVE", 0.05),
        ])
        .unwrap();
        assert_eq!(p, ClassProbabilities::new(0.05, 0.8, 0.15));
    }

    #[test]
    fn from_labelled_rejects_unknown_and_empty() {
        assert!(ClassProbabilities::from_labelled([("joy", 1.0)]).is_err());
        assert!(ClassProbabilities::from_labelled(Vec::<(&str, f64)>::new()).is_err());
    }
}
