use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{FIELD_EMAIL, FIELD_FUNDING_GOALS, FIELD_NAME, FIELD_ORGANIZATION};
use crate::domain::{LeadPayload, LeadSubmission};
use crate::error::ValidationError;

/// Structural check only: one `@`, no whitespace, a dot somewhere after the `@`.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_structural_email(candidate: &str) -> bool {
    EMAIL_PATTERN.is_match(candidate)
}

/// Single-line fields: control characters (newlines included) become spaces.
fn sanitize_line(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Free text keeps newlines and tabs, drops every other control character.
fn sanitize_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Validate an untrusted payload into a normalized [`LeadSubmission`].
///
/// Checks run in order: presence of all four fields, email shape, then the
/// funding-goals length cap. Every missing field is reported, not just the first.
pub fn validate(payload: &LeadPayload, max_funding_goals_chars: usize) -> Result<LeadSubmission, ValidationError> {
    let name = payload.name.as_deref().map(sanitize_line).unwrap_or_default();
    let organization = payload.organization.as_deref().map(sanitize_line).unwrap_or_default();
    let email = payload.email.as_deref().map(str::trim).unwrap_or_default().to_string();
    let funding_goals = payload.funding_goals.as_deref().map(sanitize_text).unwrap_or_default();

    let missing: Vec<&'static str> = [
        (FIELD_NAME, &name),
        (FIELD_ORGANIZATION, &organization),
        (FIELD_EMAIL, &email),
        (FIELD_FUNDING_GOALS, &funding_goals),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingField(missing));
    }

    if !is_structural_email(&email) || email.chars().any(char::is_control) {
        return Err(ValidationError::InvalidEmailFormat);
    }

    if funding_goals.chars().count() > max_funding_goals_chars {
        return Err(ValidationError::FieldTooLong {
            field: FIELD_FUNDING_GOALS,
            max: max_funding_goals_chars,
        });
    }

    Ok(LeadSubmission::new(name, organization, email, funding_goals))
}
