pub mod dashboard;
pub mod domain;
pub mod import;
pub mod kpi;
pub mod ranking;
pub mod scoring;
pub mod sla;
pub mod store;
pub mod timestamps;

pub use dashboard::{dashboard_router, DashboardService, DashboardServiceError, PipelineDashboard};
pub use domain::{LeadId, LeadRecord, LeadStage, DEFAULT_SLA_HOURS};
pub use import::{LeadCsvImporter, LeadImportError};
pub use kpi::{aggregate, CreatedWindow, KpiEntry, KpiSnapshot, KpiUnit, StageCountEntry};
pub use ranking::{rank, rank_with, DEFAULT_TOP_N};
pub use scoring::{
    score_lead, PriorityEngine, PriorityResult, PriorityWeights, ScoreBreakdown, UrgencyTier,
    URGENCY_WINDOW_HOURS,
};
pub use sla::{SlaClock, SlaStatus};
pub use store::{LeadStore, StoreError};
