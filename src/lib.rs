pub mod app;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod idempotency;
pub mod infra;
pub mod logging;
pub mod metrics;
pub mod server;

pub use app::IntakeService;
pub use error::{IntakeError, SinkError, ValidationError};
