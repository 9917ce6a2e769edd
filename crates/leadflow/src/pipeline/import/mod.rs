mod normalizer;
mod parser;

use super::domain::LeadRecord;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum LeadImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for LeadImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadImportError::Io(err) => write!(f, "failed to read lead export: {}", err),
            LeadImportError::Csv(err) => write!(f, "invalid lead CSV data: {}", err),
        }
    }
}

impl std::error::Error for LeadImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeadImportError::Io(err) => Some(err),
            LeadImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LeadImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LeadImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a lead snapshot from a CSV export of the lead table.
///
/// Only unreadable input or malformed CSV structure fails the import; bad
/// cell values degrade to the same defaults the scoring engine applies.
pub struct LeadCsvImporter;

impl LeadCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<LeadRecord>, LeadImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<LeadRecord>, LeadImportError> {
        let records = parser::parse_records(reader)?;
        info!(leads = records.len(), "imported lead snapshot from CSV");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::domain::LeadStage;
    use std::io::Cursor;

    #[test]
    fn unknown_stage_defaults_to_new() {
        let leads =
            LeadCsvImporter::from_reader(Cursor::new("id,status\n1,Archived\n")).expect("import");
        assert_eq!(leads[0].stage, LeadStage::New);
    }

    #[test]
    fn unparsable_timestamps_become_absent() {
        let leads = LeadCsvImporter::from_reader(Cursor::new(
            "id,created_at,sla_entered_at\n1,last tuesday,\n",
        ))
        .expect("import");
        assert!(leads[0].created_at.is_none());
        assert!(leads[0].sla_entry().is_none());
    }

    #[test]
    fn ragged_rows_are_csv_errors() {
        let error = LeadCsvImporter::from_reader(Cursor::new("id,status\n1,New,extra\n"))
            .expect_err("ragged row rejected");
        assert!(matches!(error, LeadImportError::Csv(_)));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = LeadCsvImporter::from_path("./does-not-exist.csv").expect_err("io error");
        match error {
            LeadImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
