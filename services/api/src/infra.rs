use chrono::{DateTime, Utc};
use leadflow::config::ScoringConfig;
use leadflow::pipeline::timestamps::parse_timestamp;
use leadflow::pipeline::{LeadRecord, LeadStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) scoring: ScoringConfig,
}

/// Stand-in for the external lead store; the snapshot is replaced wholesale on import.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadStore {
    leads: Arc<Mutex<Vec<LeadRecord>>>,
}

impl InMemoryLeadStore {
    pub(crate) fn with_leads(leads: Vec<LeadRecord>) -> Self {
        Self {
            leads: Arc::new(Mutex::new(leads)),
        }
    }

    pub(crate) fn replace(&self, leads: Vec<LeadRecord>) -> Result<usize, StoreError> {
        let mut guard = self
            .leads
            .lock()
            .map_err(|_| StoreError::Unavailable("lead store mutex poisoned".to_string()))?;
        *guard = leads;
        Ok(guard.len())
    }
}

impl LeadStore for InMemoryLeadStore {
    fn snapshot(&self) -> Result<Vec<LeadRecord>, StoreError> {
        let guard = self
            .leads
            .lock()
            .map_err(|_| StoreError::Unavailable("lead store mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(raw).ok_or_else(|| {
        format!("failed to parse '{raw}' as an RFC 3339 timestamp or YYYY-MM-DD date")
    })
}
