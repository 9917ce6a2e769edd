use super::domain::LeadRecord;
use super::scoring::{PriorityEngine, PriorityResult, PriorityWeights};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Number of leads the pipeline board surfaces by default.
pub const DEFAULT_TOP_N: usize = 8;

/// Scores every lead and returns the `top_n` highest, ties kept in snapshot order.
pub fn rank(
    leads: &[LeadRecord],
    weights: &PriorityWeights,
    now: DateTime<Utc>,
    top_n: usize,
) -> Vec<PriorityResult> {
    let engine = PriorityEngine::new(weights.clone());
    rank_with(&engine, leads, now, top_n)
}

pub fn rank_with(
    engine: &PriorityEngine,
    leads: &[LeadRecord],
    now: DateTime<Utc>,
    top_n: usize,
) -> Vec<PriorityResult> {
    let mut results: Vec<PriorityResult> = leads
        .iter()
        .map(|lead| engine.evaluate(lead, now))
        .collect();

    // `sort_by` is stable, which is what keeps equal scores in snapshot order.
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(top_n);

    debug!(
        snapshot = leads.len(),
        returned = results.len(),
        top_n,
        "ranked lead snapshot"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::domain::LeadId;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap()
    }

    fn lead(id: &str, value: f64) -> LeadRecord {
        let mut lead = LeadRecord::new(id, now() - Duration::hours(2));
        lead.estimated_value = Some(value);
        lead
    }

    fn ids(results: &[PriorityResult]) -> Vec<LeadId> {
        results.iter().map(|result| result.lead_id.clone()).collect()
    }

    #[test]
    fn orders_by_score_descending() {
        let leads = vec![lead("a", 500.0), lead("b", 4500.0), lead("c", 2000.0)];
        let ranked = rank(&leads, &PriorityWeights::default(), now(), DEFAULT_TOP_N);
        assert_eq!(ids(&ranked), vec![LeadId::from("b"), LeadId::from("c"), LeadId::from("a")]);
    }

    #[test]
    fn ties_keep_snapshot_order() {
        let leads = vec![lead("x", 1000.0), lead("y", 1000.0), lead("z", 1000.0)];
        let ranked = rank(&leads, &PriorityWeights::default(), now(), DEFAULT_TOP_N);
        assert_eq!(ids(&ranked), vec![LeadId::from("x"), LeadId::from("y"), LeadId::from("z")]);
    }

    #[test]
    fn truncates_to_top_n() {
        let leads: Vec<LeadRecord> = (0..12)
            .map(|index| lead(&index.to_string(), f64::from(index) * 100.0))
            .collect();
        let ranked = rank(&leads, &PriorityWeights::default(), now(), DEFAULT_TOP_N);
        assert_eq!(ranked.len(), DEFAULT_TOP_N);
        assert_eq!(ranked[0].lead_id, LeadId::from("11"));

        let short = rank(&leads[..3], &PriorityWeights::default(), now(), DEFAULT_TOP_N);
        assert_eq!(short.len(), 3);
    }

    #[test]
    fn empty_snapshot_ranks_to_empty() {
        assert!(rank(&[], &PriorityWeights::default(), now(), DEFAULT_TOP_N).is_empty());
    }
}
