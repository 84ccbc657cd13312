use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::domain::LeadSubmission;

/// Floor `at` to the start of its dedup window, in unix seconds.
pub fn time_bucket(at: DateTime<Utc>, window_secs: i64) -> i64 {
    let window = window_secs.max(1);
    at.timestamp().div_euclid(window) * window
}

/// Deduplication key attached to every delivery attempt of a lead.
///
/// The same normalized lead submitted twice inside one window yields the same
/// key, so a sink that honours it can drop retries and double-clicks.
pub fn compute_dedup_key(lead: &LeadSubmission, at: DateTime<Utc>, window_secs: i64) -> String {
    // Unit separators keep "ab"+"c" and "a"+"bc" apart
    let mut s = String::new();
    s.push_str(lead.name());
    s.push('\u{1f}');
    s.push_str(lead.organization());
    s.push('\u{1f}');
    s.push_str(&lead.email().to_lowercase());
    s.push('\u{1f}');
    s.push_str(lead.funding_goals());
    s.push('\u{1f}');
    s.push_str(&time_bucket(at, window_secs).to_string());

    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let out = hasher.finalize();
    hex::encode(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lead(name: &str, email: &str) -> LeadSubmission {
        LeadSubmission::new(name.into(), "Acme".into(), email.into(), "Trees".into())
    }

    #[test]
    fn test_bucket_floors_to_window() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 10, 59, 59).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(time_bucket(at, 3600), start.timestamp());
    }

    #[test]
    fn test_same_lead_same_window_same_key() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 1, 10, 55, 0).unwrap();
        let key_a = compute_dedup_key(&lead("Jane", "jane@acme.org"), a, 3600);
        let key_b = compute_dedup_key(&lead("Jane", "Jane@Acme.org"), b, 3600);
        assert_eq!(key_a, key_b);
        assert_eq!(key_a.len(), 64);
    }

    #[test]
    fn test_key_changes_across_windows_and_leads() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 10, 5, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 1, 11, 5, 0).unwrap();
        let jane = lead("Jane", "jane@acme.org");
        assert_ne!(compute_dedup_key(&jane, a, 3600), compute_dedup_key(&jane, b, 3600));
        assert_ne!(
            compute_dedup_key(&jane, a, 3600),
            compute_dedup_key(&lead("John", "jane@acme.org"), a, 3600)
        );
    }

    #[test]
    fn test_zero_window_does_not_panic() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 7).unwrap();
        assert_eq!(time_bucket(at, 0), at.timestamp());
    }
}
