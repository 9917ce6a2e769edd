use serde::{Deserialize, Serialize};

pub const CRITICAL_THRESHOLD: f64 = 0.70;
pub const HIGH_THRESHOLD: f64 = 0.45;

/// Discrete urgency bucket derived from a priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyTier {
    Critical,
    High,
    Normal,
}

impl UrgencyTier {
    pub fn from_score(score: f64) -> Self {
        if score >= CRITICAL_THRESHOLD {
            Self::Critical
        } else if score >= HIGH_THRESHOLD {
            Self::High
        } else {
            Self::Normal
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Normal => "NORMAL",
        }
    }
}
