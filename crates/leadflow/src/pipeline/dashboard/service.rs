use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::super::kpi::{self, CreatedWindow, KpiSnapshot};
use super::super::ranking;
use super::super::scoring::{PriorityEngine, PriorityResult};
use super::super::store::{LeadStore, StoreError};
use super::PipelineDashboard;
use crate::config::ScoringConfig;

/// Service pairing a lead store with one scoring configuration.
///
/// Each call takes exactly one snapshot from the store, so the priorities and
/// KPIs it returns always describe the same set of leads.
pub struct DashboardService<S> {
    store: Arc<S>,
    scoring: ScoringConfig,
    engine: PriorityEngine,
}

impl<S> DashboardService<S>
where
    S: LeadStore + 'static,
{
    pub fn new(store: Arc<S>, scoring: ScoringConfig) -> Self {
        let engine = PriorityEngine::new(scoring.weights.clone());
        Self {
            store,
            scoring,
            engine,
        }
    }

    pub fn dashboard(
        &self,
        now: DateTime<Utc>,
        top_n: Option<usize>,
    ) -> Result<PipelineDashboard, DashboardServiceError> {
        let leads = self.store.snapshot()?;
        let top_n = top_n.unwrap_or(self.scoring.top_n);
        Ok(PipelineDashboard::build(
            &leads,
            &self.scoring.weights,
            now,
            top_n,
        ))
    }

    pub fn priorities(
        &self,
        now: DateTime<Utc>,
        top_n: Option<usize>,
    ) -> Result<Vec<PriorityResult>, DashboardServiceError> {
        let leads = self.store.snapshot()?;
        let top_n = top_n.unwrap_or(self.scoring.top_n);
        Ok(ranking::rank_with(&self.engine, &leads, now, top_n))
    }

    /// KPIs over the leads created inside `window`; an open window covers the whole snapshot.
    pub fn kpis(
        &self,
        now: DateTime<Utc>,
        window: CreatedWindow,
    ) -> Result<KpiSnapshot, DashboardServiceError> {
        let leads = window.apply(self.store.snapshot()?);
        Ok(kpi::aggregate(&leads, now))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
