use super::super::domain::LeadStage;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiUnit {
    Percent,
    Count,
    Hours,
    Currency,
    Ratio,
}

/// One named metric, in the order the dashboard lays them out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub value: f64,
    pub unit: KpiUnit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCountEntry {
    pub stage: LeadStage,
    pub stage_label: &'static str,
    pub count: usize,
}
