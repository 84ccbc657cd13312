use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::*;
use crate::error::ConfigError;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub intake: IntakeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Which downstream system receives accepted leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Log,
    File,
    Webhook,
    Email,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Log => "log",
            SinkKind::File => "file",
            SinkKind::Webhook => "webhook",
            SinkKind::Email => "email",
        }
    }

    pub fn requires_endpoint(&self) -> bool {
        matches!(self, SinkKind::Webhook | SinkKind::Email)
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SinkKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(SinkKind::Log),
            "file" => Ok(SinkKind::File),
            "webhook" => Ok(SinkKind::Webhook),
            "email" => Ok(SinkKind::Email),
            other => Err(ConfigError::InvalidValue {
                key: "sink",
                value: other.to_string(),
            }),
        }
    }
}

/// Options injected into the intake service and its sink.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub sink: SinkKind,
    /// Webhook or email-API URL, required for those sinks
    pub sink_endpoint: Option<String>,
    /// Bearer token for the sink endpoint; only read from the environment
    #[serde(skip)]
    pub sink_token: Option<String>,
    pub recipient_address: String,
    pub timeout_ms: u64,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
    pub dedup_window_secs: i64,
    pub max_funding_goals_chars: usize,
    pub max_body_bytes: usize,
    pub file_path: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::Log,
            sink_endpoint: None,
            sink_token: None,
            recipient_address: DEFAULT_RECIPIENT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            dedup_window_secs: DEFAULT_DEDUP_WINDOW_SECS,
            max_funding_goals_chars: DEFAULT_MAX_FUNDING_GOALS_CHARS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            file_path: DEFAULT_FILE_SINK_PATH.to_string(),
        }
    }
}

impl IntakeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Linear backoff before retry number `attempt`, saturating instead of overflowing.
    pub fn retry_backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff().checked_mul(attempt).unwrap_or(Duration::MAX)
    }
}

impl Config {
    /// Load configuration: TOML file (explicit path, else `config.toml` if present,
    /// else defaults), then `LEAD_INTAKE_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.check()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides. `lookup` is `std::env::var` outside of tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LEAD_INTAKE_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("LEAD_INTAKE_PORT") {
            self.server.port = parse_num("LEAD_INTAKE_PORT", &v)?;
        }
        if let Some(v) = lookup("LEAD_INTAKE_SINK") {
            self.intake.sink = v.parse()?;
        }
        if let Some(v) = lookup("LEAD_INTAKE_SINK_ENDPOINT") {
            self.intake.sink_endpoint = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Some(v) = lookup("LEAD_INTAKE_SINK_TOKEN") {
            self.intake.sink_token = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Some(v) = lookup("LEAD_INTAKE_RECIPIENT") {
            self.intake.recipient_address = v;
        }
        if let Some(v) = lookup("LEAD_INTAKE_TIMEOUT_MS") {
            self.intake.timeout_ms = parse_num("LEAD_INTAKE_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("LEAD_INTAKE_RETRY_ATTEMPTS") {
            self.intake.retry_attempts = parse_num("LEAD_INTAKE_RETRY_ATTEMPTS", &v)?;
        }
        if let Some(v) = lookup("LEAD_INTAKE_RETRY_BACKOFF_MS") {
            self.intake.retry_backoff_ms = parse_num("LEAD_INTAKE_RETRY_BACKOFF_MS", &v)?;
        }
        if let Some(v) = lookup("LEAD_INTAKE_DEDUP_WINDOW_SECS") {
            self.intake.dedup_window_secs = parse_num("LEAD_INTAKE_DEDUP_WINDOW_SECS", &v)?;
        }
        if let Some(v) = lookup("LEAD_INTAKE_MAX_FUNDING_GOALS_CHARS") {
            self.intake.max_funding_goals_chars = parse_num("LEAD_INTAKE_MAX_FUNDING_GOALS_CHARS", &v)?;
        }
        if let Some(v) = lookup("LEAD_INTAKE_MAX_BODY_BYTES") {
            self.intake.max_body_bytes = parse_num("LEAD_INTAKE_MAX_BODY_BYTES", &v)?;
        }
        if let Some(v) = lookup("LEAD_INTAKE_FILE_PATH") {
            self.intake.file_path = v;
        }
        Ok(())
    }

    /// Reject combinations the service cannot start with.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.intake.sink.requires_endpoint() && self.intake.sink_endpoint.is_none() {
            return Err(ConfigError::MissingEndpoint(self.intake.sink.as_str()));
        }
        if self.intake.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_ms",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_num<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_apply_without_a_file() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.intake.sink, SinkKind::Log);
        assert_eq!(config.intake.recipient_address, "info@thegrantscout.com");
        assert_eq!(config.intake.timeout(), Duration::from_millis(5_000));
        config.check().unwrap();
    }

    #[test]
    fn toml_overrides_selected_fields() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 9000

            [intake]
            sink = "webhook"
            sink_endpoint = "https://hooks.example.org/leads"
            timeout_ms = 1500
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.intake.sink, SinkKind::Webhook);
        assert_eq!(config.intake.sink_endpoint.as_deref(), Some("https://hooks.example.org/leads"));
        assert_eq!(config.intake.timeout_ms, 1500);
        assert_eq!(config.intake.retry_attempts, DEFAULT_RETRY_ATTEMPTS);
    }

    #[test]
    fn env_overrides_win_over_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LEAD_INTAKE_SINK", "Email"),
            ("LEAD_INTAKE_SINK_ENDPOINT", "https://api.mail.example/emails"),
            ("LEAD_INTAKE_SINK_TOKEN", "secret"),
            ("LEAD_INTAKE_RECIPIENT", "leads@example.org"),
            ("LEAD_INTAKE_TIMEOUT_MS", "250"),
        ]);
        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.intake.sink, SinkKind::Email);
        assert_eq!(config.intake.sink_token.as_deref(), Some("secret"));
        assert_eq!(config.intake.recipient_address, "leads@example.org");
        assert_eq!(config.intake.timeout_ms, 250);
        config.check().unwrap();
    }

    #[test]
    fn env_overrides_cover_limits_and_retry() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LEAD_INTAKE_RETRY_BACKOFF_MS", "40"),
            ("LEAD_INTAKE_DEDUP_WINDOW_SECS", "600"),
            ("LEAD_INTAKE_MAX_FUNDING_GOALS_CHARS", "2000"),
            ("LEAD_INTAKE_MAX_BODY_BYTES", "4096"),
        ]);
        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.intake.retry_backoff_ms, 40);
        assert_eq!(config.intake.dedup_window_secs, 600);
        assert_eq!(config.intake.max_funding_goals_chars, 2000);
        assert_eq!(config.intake.max_body_bytes, 4096);
    }

    #[test]
    fn retry_backoff_grows_linearly_and_saturates() {
        let config = IntakeConfig {
            retry_backoff_ms: 250,
            ..IntakeConfig::default()
        };
        assert_eq!(config.retry_backoff_for(1), Duration::from_millis(250));
        assert_eq!(config.retry_backoff_for(3), Duration::from_millis(750));

        let huge = IntakeConfig {
            retry_backoff_ms: u64::MAX,
            ..IntakeConfig::default()
        };
        assert_eq!(huge.retry_backoff_for(2), Duration::MAX);
    }

    #[test]
    fn bad_env_values_are_reported() {
        let mut config = Config::default();
        let err = config
            .apply_env(|k| (k == "LEAD_INTAKE_TIMEOUT_MS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "LEAD_INTAKE_TIMEOUT_MS", .. }));

        let err = "carrier-pigeon".parse::<SinkKind>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "sink", .. }));
    }

    #[test]
    fn remote_sinks_need_an_endpoint() {
        let mut config = Config::default();
        config.intake.sink = SinkKind::Webhook;
        assert!(matches!(config.check(), Err(ConfigError::MissingEndpoint("webhook"))));
    }

    #[test]
    fn unknown_sink_in_toml_fails() {
        assert!(Config::from_toml_str("[intake]\nsink = \"fax\"").is_err());
    }
}
