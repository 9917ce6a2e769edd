mod router;
mod service;

pub use router::dashboard_router;
pub use service::{DashboardService, DashboardServiceError};

use super::domain::LeadRecord;
use super::kpi::{self, KpiSnapshot};
use super::ranking;
use super::scoring::{PriorityEngine, PriorityResult, PriorityWeights};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// Ranked priorities and KPIs computed from one snapshot at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineDashboard {
    pub generated_at: DateTime<Utc>,
    pub top_n: usize,
    pub priorities: Vec<PriorityResult>,
    pub kpis: KpiSnapshot,
}

impl PipelineDashboard {
    pub fn build(
        leads: &[LeadRecord],
        weights: &PriorityWeights,
        now: DateTime<Utc>,
        top_n: usize,
    ) -> Self {
        let engine = PriorityEngine::new(weights.clone());
        let priorities = ranking::rank_with(&engine, leads, now, top_n);
        let kpis = kpi::aggregate(leads, now);

        debug!(
            leads = leads.len(),
            priorities = priorities.len(),
            "built pipeline dashboard"
        );

        Self {
            generated_at: now,
            top_n,
            priorities,
            kpis,
        }
    }
}
