use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::any::Any as PanicPayload;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, info_span, warn, Instrument};

use crate::app::IntakeService;
use crate::constants::{MSG_BODY_TOO_LARGE, MSG_METHOD_NOT_ALLOWED, MSG_SUBMISSION_ACCEPTED};
use crate::domain::LeadPayload;
use crate::error::IntakeError;

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        error_body(status, self.user_message())
    }
}

/// Health check endpoint
async fn health(State(service): State<Arc<IntakeService>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "grantscout-intake",
        "version": env!("CARGO_PKG_VERSION"),
        "sink": service.sink_name(),
    }))
}

/// `POST /contact`
///
/// Body is parsed by hand so every failure answers with `{ "error": ... }`.
/// JSON that is not an object carries no fields and fails the presence check.
async fn contact(
    State(service): State<Arc<IntakeService>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let span = info_span!("contact", sink = service.sink_name());
    async move {
        let body = match body {
            Ok(body) => body,
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                warn!("Contact body over the size limit: {}", rejection.body_text());
                return error_body(StatusCode::PAYLOAD_TOO_LARGE, MSG_BODY_TOO_LARGE);
            }
            Err(rejection) => {
                let e = IntakeError::Unexpected(format!("unreadable body: {}", rejection.body_text()));
                error!(error = %e, "Contact submission failed");
                return e.into_response();
            }
        };
        let payload = match serde_json::from_slice::<Value>(&body) {
            Ok(json) => LeadPayload::from_json(&json).unwrap_or_default(),
            Err(parse) => {
                let e = IntakeError::Unexpected(format!("malformed JSON body: {parse}"));
                error!(error = %e, bytes = body.len(), "Contact submission failed");
                return e.into_response();
            }
        };

        let lead = match service.validate(&payload) {
            Ok(lead) => lead,
            Err(e) => return IntakeError::from(e).into_response(),
        };

        match service.submit(lead).await {
            Ok(ack) => {
                info!(lead_id = %ack.id, "Contact submission accepted");
                (
                    StatusCode::OK,
                    Json(json!({ "success": true, "message": MSG_SUBMISSION_ACCEPTED })),
                )
                    .into_response()
            }
            Err(e) => {
                // Full detail was logged by the service; the client gets the generic message
                error!(error = %e, "Contact submission failed");
                IntakeError::from(e).into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn method_not_allowed() -> Response {
    error_body(StatusCode::METHOD_NOT_ALLOWED, MSG_METHOD_NOT_ALLOWED)
}

/// A panic in a handler or sink still answers with the generic 500.
fn handle_panic(panic: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    let e = IntakeError::Unexpected(format!("panic: {detail}"));
    error!(error = %e, "Contact submission failed");
    e.into_response()
}

/// Build the router with all routes.
pub fn create_server(service: Arc<IntakeService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);
    let body_limit = service.config().max_body_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/contact", post(contact).fallback(method_not_allowed))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(cors),
        )
        .with_state(service)
}

/// Start the HTTP server on the given address
pub async fn start_server(service: Arc<IntakeService>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_server(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Lead intake listening on http://{}", listener.local_addr()?);
    info!("Health check: http://{}/health", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Lead intake stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
