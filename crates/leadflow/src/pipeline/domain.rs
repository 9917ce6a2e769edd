use super::timestamps::deserialize_lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// SLA window applied when a lead carries no (or a zero) window.
pub const DEFAULT_SLA_HOURS: u32 = 24;

/// Identifier wrapper for leads handed over by the lead store.
///
/// The store keys leads by integer, so numeric ids are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LeadId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLeadId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl<'de> Deserialize<'de> for LeadId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawLeadId::deserialize(deserializer)? {
            RawLeadId::Text(text) => Self(text),
            RawLeadId::Unsigned(number) => Self(number.to_string()),
            RawLeadId::Signed(number) => Self(number.to_string()),
        })
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LeadId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStage {
    #[default]
    New,
    Contacted,
    InspectionScheduled,
    InspectionCompleted,
    EstimateSubmitted,
    Awarded,
    Lost,
}

impl LeadStage {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::New,
            Self::Contacted,
            Self::InspectionScheduled,
            Self::InspectionCompleted,
            Self::EstimateSubmitted,
            Self::Awarded,
            Self::Lost,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::InspectionScheduled => "Inspection Scheduled",
            Self::InspectionCompleted => "Inspection Completed",
            Self::EstimateSubmitted => "Estimate Submitted",
            Self::Awarded => "Awarded",
            Self::Lost => "Lost",
        }
    }

    /// Accepts display labels, snake/kebab case, and the "won" alias.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw
            .trim()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();

        match normalized.as_str() {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "inspection scheduled" => Some(Self::InspectionScheduled),
            "inspection completed" => Some(Self::InspectionCompleted),
            "estimate submitted" => Some(Self::EstimateSubmitted),
            "awarded" | "won" => Some(Self::Awarded),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for LeadStage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown lead stage '{raw}'")))
    }
}

fn default_qualified() -> bool {
    true
}

/// Read-only lead snapshot row as supplied by the lead store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: LeadId,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub damage_type: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub estimated_value: Option<f64>,
    #[serde(default, alias = "status")]
    pub stage: LeadStage,
    #[serde(default)]
    pub sla_hours: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub sla_entered_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub awarded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub contacted: bool,
    #[serde(default)]
    pub inspection_scheduled: bool,
    #[serde(default)]
    pub estimate_submitted: bool,
    #[serde(default = "default_qualified")]
    pub qualified: bool,
}

impl LeadRecord {
    /// Fresh lead in the `New` stage with store defaults for every other field.
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: LeadId(id.into()),
            contact_name: None,
            damage_type: None,
            assigned_to: None,
            estimated_value: None,
            stage: LeadStage::New,
            sla_hours: None,
            sla_entered_at: None,
            created_at: Some(created_at),
            awarded_at: None,
            contacted: false,
            inspection_scheduled: false,
            estimate_submitted: false,
            qualified: true,
        }
    }

    /// Estimated job value, with absent, negative, or non-finite amounts read as zero.
    pub fn estimated_value(&self) -> f64 {
        match self.estimated_value {
            Some(value) if value.is_finite() && value > 0.0 => value,
            _ => 0.0,
        }
    }

    pub fn sla_window_hours(&self) -> u32 {
        match self.sla_hours {
            Some(hours) if hours > 0 => hours,
            _ => DEFAULT_SLA_HOURS,
        }
    }

    /// Moment the SLA clock started: explicit entry time, else creation time.
    pub fn sla_entry(&self) -> Option<DateTime<Utc>> {
        self.sla_entered_at.or(self.created_at)
    }

    pub fn is_awarded(&self) -> bool {
        self.stage == LeadStage::Awarded
    }

    pub fn is_lost(&self) -> bool {
        self.stage == LeadStage::Lost
    }
}
