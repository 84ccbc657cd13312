use async_trait::async_trait;
use std::sync::Mutex;
use tracing::debug;

use crate::app::ports::LeadSinkPort;
use crate::domain::LeadRecord;
use crate::error::SinkError;

/// In-memory sink for development, dry runs and tests
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<LeadRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LeadRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LeadSinkPort for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn record(&self, record: &LeadRecord) -> Result<(), SinkError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| SinkError::Unavailable("memory sink lock poisoned".to_string()))?;
        records.push(record.clone());
        debug!("Stored lead {} in memory ({} total)", record.id, records.len());
        Ok(())
    }
}
