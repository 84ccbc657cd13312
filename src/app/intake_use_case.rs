use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::ports::LeadSinkPort;
use crate::app::validation;
use crate::config::IntakeConfig;
use crate::domain::{Ack, LeadPayload, LeadRecord, LeadSubmission};
use crate::error::{SinkError, ValidationError};
use crate::idempotency::compute_dedup_key;
use crate::metrics;

/// Validates contact-form submissions and forwards accepted leads to a sink.
///
/// Holds no per-request state; one instance is shared across all requests.
pub struct IntakeService {
    sink: Arc<dyn LeadSinkPort>,
    config: IntakeConfig,
}

impl IntakeService {
    pub fn new(sink: Arc<dyn LeadSinkPort>, config: IntakeConfig) -> Self {
        Self { sink, config }
    }

    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// Validate an untrusted payload. No sink is touched.
    pub fn validate(&self, payload: &LeadPayload) -> Result<LeadSubmission, ValidationError> {
        validation::validate(payload, self.config.max_funding_goals_chars).map_err(|e| {
            metrics::record_validation_rejected(e.reason());
            debug!(reason = e.reason(), "Submission rejected: {}", e);
            e
        })
    }

    /// Stamp a validated lead and hand it to the sink.
    ///
    /// The timestamp and id are generated here, never taken from the caller.
    /// Transient sink failures are retried with the same record, so every
    /// attempt carries the same dedup key.
    pub async fn submit(&self, lead: LeadSubmission) -> Result<Ack, SinkError> {
        let submitted_at = Utc::now();
        let record = LeadRecord {
            id: Uuid::new_v4(),
            submitted_at,
            dedup_key: compute_dedup_key(&lead, submitted_at, self.config.dedup_window_secs),
            lead,
        };

        self.deliver(&record).await?;
        Ok(Ack::from(&record))
    }

    /// Validate then submit; validation failures never reach the sink.
    pub async fn intake(&self, payload: &LeadPayload) -> crate::error::Result<Ack> {
        let lead = self.validate(payload)?;
        Ok(self.submit(lead).await?)
    }

    async fn deliver(&self, record: &LeadRecord) -> Result<(), SinkError> {
        let sink = self.sink.name();
        let max_attempts = self.config.retry_attempts.saturating_add(1);
        let mut attempt: u32 = 1;

        loop {
            let started = Instant::now();
            let outcome = match tokio::time::timeout(self.config.timeout(), self.sink.record(record)).await {
                Ok(result) => result,
                Err(_) => Err(SinkError::Timeout {
                    after_ms: self.config.timeout_ms,
                }),
            };
            metrics::record_sink_duration(sink, started.elapsed().as_secs_f64());

            match outcome {
                Ok(()) => {
                    metrics::record_accepted(sink);
                    info!(
                        lead_id = %record.id,
                        dedup_key = %record.dedup_key,
                        sink,
                        attempt,
                        "Lead recorded"
                    );
                    return Ok(());
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    metrics::record_sink_error(sink, e.kind());
                    metrics::record_sink_retry(sink);
                    warn!(
                        lead_id = %record.id,
                        sink,
                        attempt,
                        error = %e,
                        "Sink attempt failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry_backoff_for(attempt)).await;
                    attempt += 1;
                }
                Err(e) => {
                    metrics::record_sink_error(sink, e.kind());
                    error!(
                        lead_id = %record.id,
                        dedup_key = %record.dedup_key,
                        organization = %record.lead.organization(),
                        sink,
                        attempt,
                        error = %e,
                        "Sink failed to record lead"
                    );
                    return Err(e);
                }
            }
        }
    }
}
