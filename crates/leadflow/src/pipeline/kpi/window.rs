use super::super::domain::LeadRecord;
use chrono::NaiveDate;
use serde::Serialize;

/// Inclusive creation-date range applied to a snapshot before aggregation.
///
/// An open bound admits everything on that side. Once either bound is set,
/// leads without a creation time fall outside the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CreatedWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl CreatedWindow {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, lead: &LeadRecord) -> bool {
        if self.is_open() {
            return true;
        }

        let Some(created_at) = lead.created_at else {
            return false;
        };
        let day = created_at.date_naive();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }

    pub fn apply(&self, leads: Vec<LeadRecord>) -> Vec<LeadRecord> {
        if self.is_open() {
            return leads;
        }
        leads.into_iter().filter(|lead| self.contains(lead)).collect()
    }
}
