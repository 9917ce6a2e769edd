use super::domain::LeadRecord;

/// Read side of the external lead store; the pipeline only ever takes snapshots.
pub trait LeadStore: Send + Sync {
    fn snapshot(&self) -> Result<Vec<LeadRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("lead store unavailable: {0}")]
    Unavailable(String),
}
