/// User-facing messages returned by the contact endpoint.
/// These strings are part of the wire contract with the marketing site.
pub const MSG_SUBMISSION_ACCEPTED: &str = "Thank you! We will be in touch within 48 hours.";
pub const MSG_ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const MSG_INVALID_EMAIL: &str = "Invalid email format";
pub const MSG_BODY_TOO_LARGE: &str = "Request body too large";
pub const MSG_SUBMISSION_FAILED: &str = "Failed to process submission. Please try again.";
pub const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed";

// Wire names of the submission fields, in the order they are checked
pub const FIELD_NAME: &str = "name";
pub const FIELD_ORGANIZATION: &str = "organization";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_FUNDING_GOALS: &str = "fundingGoals";

pub const REQUIRED_FIELDS: [&str; 4] = [FIELD_NAME, FIELD_ORGANIZATION, FIELD_EMAIL, FIELD_FUNDING_GOALS];

// Intake defaults
pub const DEFAULT_RECIPIENT: &str = "info@thegrantscout.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 2;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;
pub const DEFAULT_DEDUP_WINDOW_SECS: i64 = 3_600;
pub const DEFAULT_MAX_FUNDING_GOALS_CHARS: usize = 5_000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
pub const DEFAULT_FILE_SINK_PATH: &str = "data/leads.ndjson";

// Server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Spreadsheet range the append-row integration targets
pub const SHEET_RANGE: &str = "Leads!A:E";

/// Header carrying the deduplication key on outbound sink calls
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Sender used on lead notification emails
pub const NOTIFICATION_SENDER: &str = "TheGrantScout <noreply@thegrantscout.com>";
