use serde::{Deserialize, Serialize};

/// Tuning knobs for the priority score, threaded explicitly into every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub value_weight: f64,
    pub sla_weight: f64,
    pub urgency_weight: f64,
    pub value_baseline: f64,
    pub contacted_weight: f64,
    pub inspection_weight: f64,
    pub estimate_weight: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            value_weight: 0.5,
            sla_weight: 0.35,
            urgency_weight: 0.15,
            value_baseline: 5000.0,
            contacted_weight: 0.6,
            inspection_weight: 0.5,
            estimate_weight: 0.5,
        }
    }
}

impl PriorityWeights {
    /// Normalization denominator; a zero (or nonsensical) sum becomes 1.
    pub fn total_weight(&self) -> f64 {
        let total = self.value_weight + self.sla_weight + self.urgency_weight;
        if total.is_finite() && total > 0.0 {
            total
        } else {
            1.0
        }
    }

    pub(crate) fn effective_baseline(&self) -> f64 {
        if self.value_baseline.is_finite() {
            self.value_baseline.max(1.0)
        } else {
            1.0
        }
    }
}
