mod rules;
mod tier;
mod weights;

pub use rules::URGENCY_WINDOW_HOURS;
pub use tier::{UrgencyTier, CRITICAL_THRESHOLD, HIGH_THRESHOLD};
pub use weights::PriorityWeights;

use super::domain::{LeadId, LeadRecord, LeadStage};
use super::sla::SlaClock;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Normalized inputs behind a score, kept so rankings can be audited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub value_score: f64,
    pub sla_score: f64,
    pub urgency_component: f64,
}

/// Per-lead outcome of one scoring pass; recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityResult {
    pub lead_id: LeadId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<String>,
    pub stage: LeadStage,
    pub stage_label: &'static str,
    pub estimated_value: f64,
    pub score: f64,
    pub hours_left: f64,
    pub deadline: DateTime<Utc>,
    pub overdue: bool,
    pub tier: UrgencyTier,
    pub tier_label: &'static str,
    pub breakdown: ScoreBreakdown,
}

/// Scores one lead: `(score in [0, 1], hours_left >= 0)`. Never fails.
pub fn score_lead(lead: &LeadRecord, weights: &PriorityWeights, now: DateTime<Utc>) -> (f64, f64) {
    let sla = SlaClock::for_lead(lead, now);
    let breakdown = rules::breakdown(lead, weights, sla.hours_left);
    (rules::combine(&breakdown, weights), sla.hours_left)
}

/// Stateless scorer that applies one weights configuration to leads.
#[derive(Debug, Clone, Default)]
pub struct PriorityEngine {
    weights: PriorityWeights,
}

impl PriorityEngine {
    pub fn new(weights: PriorityWeights) -> Self {
        Self { weights }
    }

    /// Bare score and hours left, without the classification.
    pub fn score(&self, lead: &LeadRecord, now: DateTime<Utc>) -> (f64, f64) {
        score_lead(lead, &self.weights, now)
    }

    pub fn evaluate(&self, lead: &LeadRecord, now: DateTime<Utc>) -> PriorityResult {
        let sla = SlaClock::for_lead(lead, now);
        let breakdown = rules::breakdown(lead, &self.weights, sla.hours_left);
        let score = rules::combine(&breakdown, &self.weights);
        let tier = UrgencyTier::from_score(score);

        PriorityResult {
            lead_id: lead.id.clone(),
            contact_name: lead.contact_name.clone(),
            damage_type: lead.damage_type.clone(),
            stage: lead.stage,
            stage_label: lead.stage.label(),
            estimated_value: lead.estimated_value(),
            score,
            hours_left: sla.hours_left,
            deadline: sla.deadline,
            overdue: sla.overdue,
            tier,
            tier_label: tier.label(),
            breakdown,
        }
    }
}
