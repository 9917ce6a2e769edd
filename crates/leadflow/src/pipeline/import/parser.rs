use super::super::domain::{LeadId, LeadRecord, LeadStage};
use super::super::timestamps::parse_timestamp;
use super::normalizer::{normalize_text, parse_amount, parse_flag, parse_hours};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use tracing::warn;

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<LeadRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<LeadRow>().enumerate() {
        let row = record?;
        records.push(row.into_record(index + 1));
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct LeadRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    contact_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    damage_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    assigned_to: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    estimated_value: Option<String>,
    #[serde(default, alias = "stage", deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sla_hours: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sla_entered_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    contacted: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    contacted_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    inspection_scheduled: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    inspection_sched_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    estimate_submitted: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    estimate_sent_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    awarded_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    qualified: Option<String>,
}

impl LeadRow {
    fn into_record(self, row_number: usize) -> LeadRecord {
        let id = self
            .id
            .as_deref()
            .map(normalize_text)
            .unwrap_or_else(|| row_number.to_string());

        let stage = match self.status.as_deref() {
            Some(raw) => LeadStage::parse(&normalize_text(raw)).unwrap_or_else(|| {
                warn!(lead_id = %id, stage = raw, "unrecognized lead stage; treating as New");
                LeadStage::New
            }),
            None => LeadStage::New,
        };

        LeadRecord {
            contact_name: self.contact_name.as_deref().map(normalize_text),
            damage_type: self.damage_type.as_deref().map(normalize_text),
            assigned_to: self.assigned_to.as_deref().map(normalize_text),
            estimated_value: self.estimated_value.as_deref().and_then(parse_amount),
            stage,
            sla_hours: self.sla_hours.as_deref().and_then(parse_hours),
            sla_entered_at: self.sla_entered_at.as_deref().and_then(parse_timestamp),
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
            awarded_at: self.awarded_at.as_deref().and_then(parse_timestamp),
            contacted: milestone(self.contacted.as_deref(), self.contacted_at.as_deref()),
            inspection_scheduled: milestone(
                self.inspection_scheduled.as_deref(),
                self.inspection_sched_at.as_deref(),
            ),
            estimate_submitted: milestone(
                self.estimate_submitted.as_deref(),
                self.estimate_sent_at.as_deref(),
            ),
            qualified: self.qualified.as_deref().and_then(parse_flag).unwrap_or(true),
            id: LeadId(id),
        }
    }
}

/// An explicit flag wins; otherwise a recorded milestone timestamp marks it met.
fn milestone(flag: Option<&str>, stamped_at: Option<&str>) -> bool {
    match flag.and_then(parse_flag) {
        Some(value) => value,
        None => stamped_at.and_then(parse_timestamp).is_some(),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;

    #[test]
    fn milestone_prefers_explicit_flag() {
        assert!(milestone(Some("yes"), None));
        assert!(!milestone(Some("no"), Some("2025-03-01T10:00:00")));
        assert!(milestone(None, Some("2025-03-01T10:00:00")));
        assert!(!milestone(None, Some("soon")));
        assert!(!milestone(None, None));
    }

    #[test]
    fn row_without_id_uses_row_number() {
        let records = parse_records(Cursor::new(
            "contact_name,status\nAda,Contacted\nGrace,Lost\n",
        ))
        .expect("parse");
        assert_eq!(records[0].id, LeadId::from("1"));
        assert_eq!(records[1].id, LeadId::from("2"));
        assert_eq!(records[1].stage, LeadStage::Lost);
    }

    #[test]
    fn row_fields_map_onto_lead_record() {
        let records = parse_records(Cursor::new(
            "id,estimated_value,status,sla_hours,created_at,contacted_at,qualified\n\
             7,\"$4,200\",inspection_scheduled,48,2025-03-01T09:00:00,2025-03-01T10:00:00,no\n",
        ))
        .expect("parse");
        let lead = &records[0];
        assert_eq!(lead.estimated_value, Some(4200.0));
        assert_eq!(lead.stage, LeadStage::InspectionScheduled);
        assert_eq!(lead.sla_hours, Some(48));
        assert_eq!(
            lead.created_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap())
        );
        assert!(lead.contacted);
        assert!(!lead.inspection_scheduled);
        assert!(!lead.qualified);
    }
}
