use async_trait::async_trait;
use tracing::debug;

use crate::app::ports::LeadSinkPort;
use crate::domain::{LeadRecord, Notification};
use crate::error::SinkError;
use crate::infra::http_sink::HttpPoster;

/// Sends a lead notification through an email-delivery HTTP API.
pub struct EmailSink {
    http: HttpPoster,
    recipient: String,
}

impl EmailSink {
    pub fn new(http: HttpPoster, recipient: impl Into<String>) -> Self {
        Self {
            http,
            recipient: recipient.into(),
        }
    }
}

#[async_trait]
impl LeadSinkPort for EmailSink {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn record(&self, record: &LeadRecord) -> Result<(), SinkError> {
        let notification = Notification::for_lead(record, &self.recipient);
        debug!("Sending lead {} to {} via {}", record.id, self.recipient, self.http.endpoint());
        self.http.post_json(&notification, &record.dedup_key).await
    }
}
