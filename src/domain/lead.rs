use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::constants::{FIELD_EMAIL, FIELD_FUNDING_GOALS, FIELD_NAME, FIELD_ORGANIZATION};

/// Untrusted contact-form input as it arrived on the wire.
///
/// A field is `None` when it is absent or when its JSON value is not a string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadPayload {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub email: Option<String>,
    pub funding_goals: Option<String>,
}

impl LeadPayload {
    /// Pull the four form fields out of a JSON document.
    /// Returns `None` if the document is not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_owned);
        Some(Self {
            name: field(FIELD_NAME),
            organization: field(FIELD_ORGANIZATION),
            email: field(FIELD_EMAIL),
            funding_goals: field(FIELD_FUNDING_GOALS),
        })
    }
}

/// A validated, normalized lead. Only `app::validation` constructs these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    name: String,
    organization: String,
    email: String,
    funding_goals: String,
}

impl LeadSubmission {
    pub(crate) fn new(name: String, organization: String, email: String, funding_goals: String) -> Self {
        Self { name, organization, email, funding_goals }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn funding_goals(&self) -> &str {
        &self.funding_goals
    }

    /// Turn the lead back into a payload, e.g. to re-run validation on it.
    pub fn to_payload(&self) -> LeadPayload {
        LeadPayload {
            name: Some(self.name.clone()),
            organization: Some(self.organization.clone()),
            email: Some(self.email.clone()),
            funding_goals: Some(self.funding_goals.clone()),
        }
    }
}

/// A lead stamped for delivery. This is what sinks record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub id: Uuid,
    /// Generated by the service when the lead is submitted
    pub submitted_at: DateTime<Utc>,
    pub dedup_key: String,
    #[serde(flatten)]
    pub lead: LeadSubmission,
}

/// Acknowledgement returned once a sink has recorded the lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub dedup_key: String,
}

impl From<&LeadRecord> for Ack {
    fn from(record: &LeadRecord) -> Self {
        Self {
            id: record.id,
            submitted_at: record.submitted_at,
            dedup_key: record.dedup_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_from_json_reads_wire_names() {
        let payload = LeadPayload::from_json(&json!({
            "name": "Jane Doe",
            "organization": "Acme Nonprofit",
            "email": "jane@acme.org",
            "fundingGoals": "Youth education"
        }))
        .unwrap();

        assert_eq!(payload.name.as_deref(), Some("Jane Doe"));
        assert_eq!(payload.funding_goals.as_deref(), Some("Youth education"));
    }

    #[test]
    fn test_payload_treats_non_strings_as_absent() {
        let payload = LeadPayload::from_json(&json!({
            "name": 42,
            "organization": null,
            "email": ["a@b.co"],
        }))
        .unwrap();

        assert_eq!(payload, LeadPayload::default());
    }

    #[test]
    fn test_payload_requires_object() {
        assert!(LeadPayload::from_json(&json!("jane@acme.org")).is_none());
        assert!(LeadPayload::from_json(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_record_serializes_flat_with_camel_case() {
        let record = LeadRecord {
            id: Uuid::nil(),
            submitted_at: DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap().with_timezone(&Utc),
            dedup_key: "abc".into(),
            lead: LeadSubmission::new("Jane".into(), "Acme".into(), "jane@acme.org".into(), "Trees".into()),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["fundingGoals"], "Trees");
        assert_eq!(value["dedupKey"], "abc");
        assert_eq!(value["submittedAt"], "2024-05-01T12:00:00Z");
    }
}
