use crate::infra::parse_instant;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::Args;
use leadflow::config::ScoringConfig;
use leadflow::error::AppError;
use leadflow::pipeline::{
    CreatedWindow, KpiEntry, KpiSnapshot, KpiUnit, LeadCsvImporter, LeadRecord, LeadStage,
    PipelineDashboard, PriorityResult,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PrioritiesArgs {
    /// Lead CSV export to rank
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Number of leads to show (defaults to LEAD_TOP_N or 8)
    #[arg(long)]
    pub(crate) top_n: Option<usize>,
    /// Evaluate as of this instant instead of now (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub(crate) struct KpisArgs {
    /// Lead CSV export to summarize
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Only count leads created on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) created_from: Option<NaiveDate>,
    /// Only count leads created on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) created_to: Option<NaiveDate>,
    /// Evaluate as of this instant instead of now (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluate the sample snapshot as of this instant (defaults to now)
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) fn run_priorities(args: PrioritiesArgs) -> Result<(), AppError> {
    let scoring = ScoringConfig::from_env()?;
    let leads = LeadCsvImporter::from_path(&args.csv)?;
    let now = args.now.unwrap_or_else(Utc::now);
    let top_n = args.top_n.unwrap_or(scoring.top_n);

    let dashboard = PipelineDashboard::build(&leads, &scoring.weights, now, top_n);
    render_priorities(&dashboard.priorities, now);
    Ok(())
}

pub(crate) fn run_kpis(args: KpisArgs) -> Result<(), AppError> {
    let window = CreatedWindow::new(args.created_from, args.created_to);
    let leads = window.apply(LeadCsvImporter::from_path(&args.csv)?);
    let now = args.now.unwrap_or_else(Utc::now);

    let kpis = leadflow::pipeline::aggregate(&leads, now);
    render_kpis(&kpis, now);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let scoring = ScoringConfig::from_env()?;
    let now = args.now.unwrap_or_else(Utc::now);
    let leads = sample_leads(now);

    println!("Lead pipeline demo");
    println!("Sample snapshot: {} leads", leads.len());

    let dashboard = PipelineDashboard::build(&leads, &scoring.weights, now, scoring.top_n);
    render_priorities(&dashboard.priorities, now);
    render_kpis(&dashboard.kpis, now);
    Ok(())
}

fn render_priorities(priorities: &[PriorityResult], now: DateTime<Utc>) {
    println!("\nPriority leads (as of {})", now.format("%Y-%m-%d %H:%M UTC"));

    if priorities.is_empty() {
        println!("- none");
        return;
    }

    for result in priorities {
        let name = result.contact_name.as_deref().unwrap_or("(no contact)");
        let damage = result.damage_type.as_deref().unwrap_or("unspecified");
        println!(
            "- [{}] #{} {} ({}) | {} | Est: {} | {} | score {:.2}",
            result.tier_label,
            result.lead_id,
            name,
            result.stage_label,
            damage,
            format_currency(result.estimated_value),
            sla_label(result),
            result.score
        );
    }
}

fn render_kpis(kpis: &KpiSnapshot, now: DateTime<Utc>) {
    println!("\nPipeline KPIs (as of {})", now.format("%Y-%m-%d %H:%M UTC"));
    for entry in kpis.entries() {
        println!("- {}: {}", entry.label, format_kpi(&entry));
    }

    println!("\nLeads by stage");
    for stage in &kpis.stage_counts {
        println!("- {}: {}", stage.stage_label, stage.count);
    }
}

pub(crate) fn sla_label(result: &PriorityResult) -> String {
    if result.overdue {
        return "OVERDUE".to_string();
    }

    let total_minutes = (result.hours_left * 60.0).floor() as i64;
    format!("{}h {}m left", total_minutes / 60, total_minutes % 60)
}

pub(crate) fn format_kpi(entry: &KpiEntry) -> String {
    match entry.unit {
        KpiUnit::Percent => format!("{:.1}%", entry.value),
        KpiUnit::Hours => format!("{:.1}", entry.value),
        KpiUnit::Count => format!("{:.0}", entry.value),
        KpiUnit::Currency => format_currency(entry.value),
        KpiUnit::Ratio => format!("{:.3}", entry.value),
    }
}

pub(crate) fn format_currency(value: f64) -> String {
    let whole = value.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn sample_leads(now: DateTime<Utc>) -> Vec<LeadRecord> {
    let lead = |id: &str, name: &str, damage: &str, value: f64, hours_ago: i64| {
        let mut lead = LeadRecord::new(id, now - Duration::hours(hours_ago));
        lead.contact_name = Some(name.to_string());
        lead.damage_type = Some(damage.to_string());
        lead.estimated_value = Some(value);
        lead
    };

    let fresh = lead("101", "Dana Whitfield", "Water Damage", 7800.0, 2);

    let mut overdue = lead("102", "Marcus Ortega", "Roof Leak", 3200.0, 30);
    overdue.stage = LeadStage::New;

    let mut contacted = lead("103", "Priya Natarajan", "Fire Damage", 12500.0, 20);
    contacted.stage = LeadStage::Contacted;
    contacted.contacted = true;

    let mut inspection = lead("104", "Tom Becker", "Mold Remediation", 2400.0, 40);
    inspection.stage = LeadStage::InspectionScheduled;
    inspection.sla_hours = Some(72);
    inspection.contacted = true;
    inspection.inspection_scheduled = true;

    let mut estimate = lead("105", "Lena Fischer", "Storm Damage", 9100.0, 60);
    estimate.stage = LeadStage::EstimateSubmitted;
    estimate.sla_hours = Some(96);
    estimate.contacted = true;
    estimate.inspection_scheduled = true;
    estimate.estimate_submitted = true;

    let mut won = lead("106", "Sam Okafor", "Water Damage", 6400.0, 120);
    won.stage = LeadStage::Awarded;
    won.contacted = true;
    won.inspection_scheduled = true;
    won.estimate_submitted = true;
    won.awarded_at = Some(now - Duration::hours(48));

    let mut lost = lead("107", "Jo Reyes", "Roof Leak", 1800.0, 200);
    lost.stage = LeadStage::Lost;
    lost.contacted = true;
    lost.qualified = false;

    vec![fresh, overdue, contacted, inspection, estimate, won, lost]
}
