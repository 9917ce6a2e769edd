use super::domain::LeadRecord;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::warn;

/// Deadline position of a single lead at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlaStatus {
    pub deadline: DateTime<Utc>,
    pub hours_left: f64,
    pub overdue: bool,
}

pub struct SlaClock;

impl SlaClock {
    /// Missing entry times start the window at `now`, leaving the full window open.
    pub fn remaining(
        entry_time: Option<DateTime<Utc>>,
        window_hours: u32,
        now: DateTime<Utc>,
    ) -> SlaStatus {
        let entry = entry_time.unwrap_or(now);
        let deadline = entry
            .checked_add_signed(Duration::hours(i64::from(window_hours)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let millis_left = (deadline - now).num_milliseconds();
        let hours_left = (millis_left as f64 / 3_600_000.0).max(0.0);

        SlaStatus {
            deadline,
            hours_left,
            overdue: now >= deadline,
        }
    }

    pub fn for_lead(lead: &LeadRecord, now: DateTime<Utc>) -> SlaStatus {
        let entry = lead.sla_entry();
        if entry.is_none() {
            warn!(lead_id = %lead.id, "lead has no usable SLA entry or creation time; starting window now");
        }
        Self::remaining(entry, lead.sla_window_hours(), now)
    }
}
