use super::super::domain::LeadRecord;
use super::weights::PriorityWeights;
use super::ScoreBreakdown;

/// Horizon over which SLA pressure ramps from 0 to 1.
pub const URGENCY_WINDOW_HOURS: f64 = 72.0;

pub(crate) fn value_score(value: f64, weights: &PriorityWeights) -> f64 {
    (value / weights.effective_baseline()).min(1.0)
}

pub(crate) fn sla_score(hours_left: f64) -> f64 {
    let clamped = hours_left.min(URGENCY_WINDOW_HOURS);
    ((URGENCY_WINDOW_HOURS - clamped) / URGENCY_WINDOW_HOURS).max(0.0)
}

/// Unmet milestones add their weight; met ones add nothing.
pub(crate) fn urgency_component(lead: &LeadRecord, weights: &PriorityWeights) -> f64 {
    [
        (lead.contacted, weights.contacted_weight),
        (lead.inspection_scheduled, weights.inspection_weight),
        (lead.estimate_submitted, weights.estimate_weight),
    ]
    .into_iter()
    .filter(|(met, _)| !met)
    .map(|(_, weight)| weight)
    .sum()
}

pub(crate) fn breakdown(
    lead: &LeadRecord,
    weights: &PriorityWeights,
    hours_left: f64,
) -> ScoreBreakdown {
    ScoreBreakdown {
        value_score: value_score(lead.estimated_value(), weights),
        sla_score: sla_score(hours_left),
        urgency_component: urgency_component(lead, weights),
    }
}

pub(crate) fn combine(breakdown: &ScoreBreakdown, weights: &PriorityWeights) -> f64 {
    let weighted = breakdown.value_score * weights.value_weight
        + breakdown.sla_score * weights.sla_weight
        + breakdown.urgency_component * weights.urgency_weight;
    let score = weighted / weights.total_weight();

    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
