pub mod email_sink;
pub mod file_sink;
pub mod http_sink;
pub mod log_sink;
pub mod memory_sink;
pub mod webhook_sink;

pub use email_sink::EmailSink;
pub use file_sink::FileSink;
pub use http_sink::HttpPoster;
pub use log_sink::LogSink;
pub use memory_sink::MemorySink;
pub use webhook_sink::WebhookSink;

use anyhow::Context;
use std::sync::Arc;

use crate::app::ports::LeadSinkPort;
use crate::config::{IntakeConfig, SinkKind};
use crate::error::ConfigError;

/// Build the sink selected by configuration.
pub fn build_sink(config: &IntakeConfig) -> anyhow::Result<Arc<dyn LeadSinkPort>> {
    let sink: Arc<dyn LeadSinkPort> = match config.sink {
        SinkKind::Log => Arc::new(LogSink),
        SinkKind::File => Arc::new(
            FileSink::new(&config.file_path)
                .with_context(|| format!("Failed to prepare lead file '{}'", config.file_path))?,
        ),
        SinkKind::Webhook => Arc::new(WebhookSink::new(http_poster(config)?)),
        SinkKind::Email => Arc::new(EmailSink::new(http_poster(config)?, config.recipient_address.clone())),
    };
    Ok(sink)
}

fn http_poster(config: &IntakeConfig) -> anyhow::Result<HttpPoster> {
    let endpoint = config
        .sink_endpoint
        .as_deref()
        .ok_or(ConfigError::MissingEndpoint(config.sink.as_str()))?;
    HttpPoster::new(endpoint, config.sink_token.clone(), config.timeout())
}
