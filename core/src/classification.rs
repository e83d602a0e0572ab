use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::risk::{self, RiskProfile};

/// Top prediction handed over by the image classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClassificationResult {
    pub label: String,
    /// Probability of the top label, in [0, 1].
    pub confidence: f64,
}

impl ClassificationResult {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// Placeholder the classifier reports when inference failed.
    pub fn unavailable() -> Self {
        Self::new("Error", 0.0)
    }

    pub fn risk_profile(&self) -> RiskProfile {
        risk::classify(&self.label, self.confidence)
    }
}
