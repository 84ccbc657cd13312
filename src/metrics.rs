//! Intake metrics, exported in Prometheus format when a metrics port is configured.

use std::net::SocketAddr;
use tracing::{info, warn};

pub const SUBMISSIONS_ACCEPTED: &str = "intake_submissions_accepted_total";
pub const VALIDATION_REJECTED: &str = "intake_validation_rejected_total";
pub const SINK_ERRORS: &str = "intake_sink_errors_total";
pub const SINK_RETRIES: &str = "intake_sink_retries_total";
pub const SINK_DURATION: &str = "intake_sink_duration_seconds";

/// Install the Prometheus exporter if `LEAD_INTAKE_METRICS_PORT` is set.
/// Without a recorder installed the `metrics` macros are no-ops.
pub fn init_metrics() {
    let Some(port) = std::env::var("LEAD_INTAKE_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
    else {
        return;
    };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => {
            register_metrics();
            info!("Prometheus exporter listening on http://{}/metrics", addr);
        }
        Err(e) => {
            warn!("Prometheus exporter install failed (possibly already installed): {}", e);
        }
    }
}

fn register_metrics() {
    use ::metrics::{describe_counter, describe_histogram};

    describe_counter!(SUBMISSIONS_ACCEPTED, "Leads recorded by the sink");
    describe_counter!(VALIDATION_REJECTED, "Submissions rejected by validation, by reason");
    describe_counter!(SINK_ERRORS, "Failed sink attempts, by error kind");
    describe_counter!(SINK_RETRIES, "Sink attempts that were retried");
    describe_histogram!(SINK_DURATION, "Time spent in a single sink call");
}

pub fn record_accepted(sink: &'static str) {
    ::metrics::counter!(SUBMISSIONS_ACCEPTED, "sink" => sink).increment(1);
}

pub fn record_validation_rejected(reason: &'static str) {
    ::metrics::counter!(VALIDATION_REJECTED, "reason" => reason).increment(1);
}

pub fn record_sink_error(sink: &'static str, kind: &'static str) {
    ::metrics::counter!(SINK_ERRORS, "sink" => sink, "kind" => kind).increment(1);
}

pub fn record_sink_retry(sink: &'static str) {
    ::metrics::counter!(SINK_RETRIES, "sink" => sink).increment(1);
}

pub fn record_sink_duration(sink: &'static str, duration_secs: f64) {
    ::metrics::histogram!(SINK_DURATION, "sink" => sink).record(duration_secs);
}
