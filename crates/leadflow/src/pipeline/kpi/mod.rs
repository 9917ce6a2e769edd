//! Pipeline-wide conversion and velocity metrics over a lead snapshot.
//!
//! Every rate guards its denominator and reports 0 instead of failing, so an
//! empty or sparse snapshot still produces a complete dashboard.

pub mod views;
pub mod window;

pub use views::{KpiEntry, KpiUnit, StageCountEntry};
pub use window::CreatedWindow;

use super::domain::{LeadRecord, LeadStage};
use super::sla::SlaClock;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// Return multiple applied to the win share of all leads.
pub const ROI_MULTIPLIER: f64 = 1.4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub total_leads: usize,
    pub qualified_leads: usize,
    pub contacted_leads: usize,
    pub inspection_scheduled_leads: usize,
    pub estimate_submitted_leads: usize,
    pub awarded_leads: usize,
    pub lost_leads: usize,
    pub sla_breaches: usize,
    pub qualification_rate: f64,
    pub inspection_conversion: f64,
    pub estimate_win_rate: f64,
    pub sla_success_rate: f64,
    pub sla_breach_rate: f64,
    pub conversion_velocity_hours: f64,
    pub pipeline_value: f64,
    pub value_per_won_job: f64,
    pub estimated_roi: f64,
    pub stage_counts: Vec<StageCountEntry>,
}

impl KpiSnapshot {
    pub fn entries(&self) -> Vec<KpiEntry> {
        vec![
            entry(
                "sla_success_rate",
                "Lead Response Compliance %",
                self.sla_success_rate,
                KpiUnit::Percent,
            ),
            entry(
                "qualification_rate",
                "Lead Qualification Rate %",
                self.qualification_rate,
                KpiUnit::Percent,
            ),
            entry(
                "inspection_conversion",
                "Inspection Scheduling Conversion %",
                self.inspection_conversion,
                KpiUnit::Percent,
            ),
            entry(
                "estimate_win_rate",
                "Estimate-to-Job Win Rate %",
                self.estimate_win_rate,
                KpiUnit::Percent,
            ),
            entry("sla_breach_rate", "SLA Breach Rate %", self.sla_breach_rate, KpiUnit::Percent),
            entry(
                "conversion_velocity_hours",
                "Conversion Velocity (hrs)",
                self.conversion_velocity_hours,
                KpiUnit::Hours,
            ),
            entry("pipeline_value", "Pipeline Job Value", self.pipeline_value, KpiUnit::Currency),
            entry(
                "value_per_won_job",
                "CPA per Won Job",
                self.value_per_won_job,
                KpiUnit::Currency,
            ),
            entry("estimated_roi", "Estimated ROI", self.estimated_roi, KpiUnit::Ratio),
            entry("leads_won", "Leads Won", self.awarded_leads as f64, KpiUnit::Count),
            entry("leads_lost", "Leads Lost", self.lost_leads as f64, KpiUnit::Count),
        ]
    }
}

fn entry(key: &'static str, label: &'static str, value: f64, unit: KpiUnit) -> KpiEntry {
    KpiEntry {
        key,
        label,
        value,
        unit,
    }
}

fn percent(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

pub fn aggregate(leads: &[LeadRecord], now: DateTime<Utc>) -> KpiSnapshot {
    let total = leads.len();
    let count = |predicate: fn(&LeadRecord) -> bool| {
        leads.iter().filter(|lead| predicate(lead)).count()
    };

    let qualified = count(|lead| lead.qualified);
    let contacted = count(|lead| lead.contacted);
    let inspection_scheduled = count(|lead| lead.inspection_scheduled);
    let estimate_submitted = count(|lead| lead.estimate_submitted);
    let awarded = count(LeadRecord::is_awarded);
    let lost = count(LeadRecord::is_lost);

    // The ranker already warns about leads without an entry time.
    let sla_breaches = leads
        .iter()
        .filter(|lead| {
            !lead.contacted
                && SlaClock::remaining(lead.sla_entry(), lead.sla_window_hours(), now).overdue
        })
        .count();

    let award_durations: Vec<f64> = leads
        .iter()
        .filter(|lead| lead.is_awarded())
        .filter_map(|lead| match (lead.awarded_at, lead.created_at) {
            (Some(awarded_at), Some(created_at)) => {
                Some((awarded_at - created_at).num_milliseconds() as f64 / 3_600_000.0)
            }
            _ => None,
        })
        .collect();
    let conversion_velocity_hours = if award_durations.is_empty() {
        0.0
    } else {
        award_durations.iter().sum::<f64>() / award_durations.len() as f64
    };

    let pipeline_value: f64 = leads.iter().map(LeadRecord::estimated_value).sum();

    let stage_counts = LeadStage::ordered()
        .into_iter()
        .map(|stage| StageCountEntry {
            stage,
            stage_label: stage.label(),
            count: leads.iter().filter(|lead| lead.stage == stage).count(),
        })
        .collect();

    debug!(total, qualified, awarded, sla_breaches, "aggregated pipeline KPIs");

    KpiSnapshot {
        total_leads: total,
        qualified_leads: qualified,
        contacted_leads: contacted,
        inspection_scheduled_leads: inspection_scheduled,
        estimate_submitted_leads: estimate_submitted,
        awarded_leads: awarded,
        lost_leads: lost,
        sla_breaches,
        qualification_rate: percent(qualified, total),
        inspection_conversion: percent(inspection_scheduled, qualified),
        estimate_win_rate: percent(awarded, estimate_submitted),
        sla_success_rate: percent(contacted, total),
        sla_breach_rate: percent(sla_breaches, total),
        conversion_velocity_hours,
        pipeline_value,
        value_per_won_job: pipeline_value / awarded.max(1) as f64,
        estimated_roi: awarded as f64 / total.max(1) as f64 * ROI_MULTIPLIER,
        stage_counts,
    }
}
