use async_trait::async_trait;
use serde::Serialize;

use crate::app::ports::LeadSinkPort;
use crate::domain::{LeadRecord, SheetRow};
use crate::error::SinkError;
use crate::infra::http_sink::HttpPoster;

/// Body posted to the webhook: the full record plus the spreadsheet row
/// rendering, so the receiver can append it without knowing our field names.
#[derive(Serialize)]
struct WebhookBody<'a> {
    record: &'a LeadRecord,
    row: SheetRow,
}

/// Forwards leads to a spreadsheet or datastore webhook.
pub struct WebhookSink {
    http: HttpPoster,
}

impl WebhookSink {
    pub fn new(http: HttpPoster) -> Self {
        Self { http }
    }
}

#[async_trait]
impl LeadSinkPort for WebhookSink {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn record(&self, record: &LeadRecord) -> Result<(), SinkError> {
        let body = WebhookBody {
            record,
            row: SheetRow::from_record(record),
        };
        self.http.post_json(&body, &record.dedup_key).await
    }
}
