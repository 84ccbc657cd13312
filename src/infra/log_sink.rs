use async_trait::async_trait;
use tracing::info;

use crate::app::ports::LeadSinkPort;
use crate::domain::LeadRecord;
use crate::error::SinkError;

/// Writes each lead as a structured log event.
///
/// Durability is whatever the log pipeline provides; use it for local runs
/// or alongside a log shipper.
pub struct LogSink;

#[async_trait]
impl LeadSinkPort for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn record(&self, record: &LeadRecord) -> Result<(), SinkError> {
        let lead = &record.lead;
        info!(
            target: "grantscout_intake::leads",
            lead_id = %record.id,
            submitted_at = %record.submitted_at.to_rfc3339(),
            dedup_key = %record.dedup_key,
            name = %lead.name(),
            organization = %lead.organization(),
            email = %lead.email(),
            funding_goals = %lead.funding_goals(),
            "New contact form submission"
        );
        Ok(())
    }
}
