use async_trait::async_trait;

use crate::domain::LeadRecord;
use crate::error::SinkError;

/// Downstream system that durably records a lead.
///
/// Implementations must be all-or-nothing: either the whole record is
/// stored/delivered and `Ok(())` is returned, or nothing observable happens
/// and an error is returned. The same record may be offered more than once
/// (retries carry the same `dedup_key`).
#[async_trait]
pub trait LeadSinkPort: Send + Sync {
    /// Short identifier used in logs, metrics and `/health`.
    fn name(&self) -> &'static str;

    async fn record(&self, record: &LeadRecord) -> Result<(), SinkError>;
}
