//! Renderings of a [`LeadRecord`] for the external collaborators: an email
//! notification for the sales inbox and an append-row for the leads sheet.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::constants::{NOTIFICATION_SENDER, SHEET_RANGE};
use crate::domain::lead::LeadRecord;

/// Email sent to the configured recipient for every new lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub from: String,
    #[serde(rename = "to")]
    pub recipient: String,
    pub subject: String,
    pub html: String,
}

impl Notification {
    pub fn for_lead(record: &LeadRecord, recipient: &str) -> Self {
        let lead = &record.lead;
        let esc = ammonia::clean_text;

        let html = format!(
            "<h2>New Grant Report Request</h2>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Organization:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Funding Goals:</strong></p>\n\
             <p>{}</p>\n\
             <hr>\n\
             <p><em>Submitted at: {}</em></p>\n",
            esc(lead.name()),
            esc(lead.organization()),
            esc(lead.email()),
            esc(lead.funding_goals()),
            timestamp(record),
        );

        Self {
            from: NOTIFICATION_SENDER.to_string(),
            recipient: recipient.to_string(),
            subject: format!("New Lead: {}", lead.organization()),
            html,
        }
    }
}

/// One row appended to the leads spreadsheet: timestamp then the four fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    pub range: &'static str,
    pub values: Vec<Vec<String>>,
}

impl SheetRow {
    pub fn from_record(record: &LeadRecord) -> Self {
        let lead = &record.lead;
        Self {
            range: SHEET_RANGE,
            values: vec![vec![
                timestamp(record),
                lead.name().to_string(),
                lead.organization().to_string(),
                lead.email().to_string(),
                lead.funding_goals().to_string(),
            ]],
        }
    }
}

fn timestamp(record: &LeadRecord) -> String {
    record.submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
