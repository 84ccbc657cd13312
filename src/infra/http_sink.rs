use serde::Serialize;
use std::time::Duration;

use crate::constants::IDEMPOTENCY_HEADER;
use crate::error::SinkError;

/// JSON POST client shared by the webhook and email sinks.
pub struct HttpPoster {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    timeout_ms: u64,
}

impl HttpPoster {
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("grantscout-intake/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `body` with the dedup key as idempotency header.
    pub async fn post_json<T: Serialize + ?Sized>(&self, body: &T, dedup_key: &str) -> Result<(), SinkError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(IDEMPOTENCY_HEADER, dedup_key)
            .json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = resp.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(());
        }
        let detail = resp.text().await.unwrap_or_default();
        Err(classify_status(status, &detail))
    }

    /// The client deadline is the same as the service deadline, so a client
    /// timeout is reported as one.
    fn transport_error(&self, e: reqwest::Error) -> SinkError {
        if e.is_timeout() {
            SinkError::Timeout {
                after_ms: self.timeout_ms,
            }
        } else {
            SinkError::Unavailable(e.to_string())
        }
    }
}

/// 4xx means the collaborator refused the record; anything else non-2xx is
/// treated as an outage worth retrying.
pub fn classify_status(status: u16, detail: &str) -> SinkError {
    let detail: String = detail.chars().take(200).collect();
    let message = format!("HTTP {status}: {detail}");
    match status {
        408 | 429 => SinkError::Unavailable(message),
        400..=499 => SinkError::Rejected(message),
        _ => SinkError::Unavailable(message),
    }
}
