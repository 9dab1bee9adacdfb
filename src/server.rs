//! Policy server.
//!
//! Exposes the policy entry points over HTTP so a host can call them:
//! - `POST /validate` - body is a validation request, reply is the decision
//! - `POST /validate_settings` - body is a settings payload, reply is the outcome
//! - `GET /settings_schema` - JSON schema of the settings payload
//!
//! The decision always travels in the body with status 200. TLS is enabled
//! when both the certificate and key files exist.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::ServerConfig;
use crate::health::HealthState;
use crate::policy;
use crate::settings::Settings;

/// Errors that can occur when running the policy server
#[derive(Error, Debug)]
pub enum ServerError {
    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(#[source] std::io::Error),

    /// Server error
    #[error("Policy server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Create the policy router
pub fn create_router(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/validate", post(validate))
        .route("/validate_settings", post(validate_settings))
        .route("/settings_schema", get(settings_schema))
        .with_state(state)
}

async fn validate(State(state): State<Arc<HealthState>>, body: Bytes) -> Response {
    let started = Instant::now();
    let response = policy::evaluate(&body);
    let elapsed = started.elapsed().as_secs_f64();

    state.metrics.record_validation(&response, elapsed);
    debug!(
        accepted = response.accepted,
        code = ?response.code,
        elapsed_secs = elapsed,
        "Validation request answered"
    );

    json_response(&response)
}

async fn validate_settings(State(state): State<Arc<HealthState>>, body: Bytes) -> Response {
    let response = policy::evaluate_settings(&body);
    state.metrics.record_settings_validation(&response);
    json_response(&response)
}

async fn settings_schema() -> Json<serde_json::Value> {
    Json(Settings::json_schema())
}

fn json_response<T: Serialize>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode policy response");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode response").into_response()
        }
    }
}

/// Run the policy server
///
/// Binds to 0.0.0.0 on the configured port. Serves TLS when the certificate
/// and key are present, plain HTTP otherwise. Readiness is raised once the
/// listener is set up and cleared again when serving stops, including on a
/// failed bind or TLS load.
pub async fn run_policy_server(
    config: &ServerConfig,
    state: Arc<HealthState>,
) -> Result<(), ServerError> {
    let result = serve(config, state.clone()).await;
    state.set_ready(false).await;
    result
}

async fn serve(config: &ServerConfig, state: Arc<HealthState>) -> Result<(), ServerError> {
    let app = create_router(state.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    if config.tls_enabled() {
        let tls = RustlsConfig::from_pem_file(&config.cert_path, &config.key_path)
            .await
            .map_err(ServerError::TlsConfig)?;
        let handle = Handle::new();
        let server = axum_server::bind_rustls(addr, tls)
            .handle(handle.clone())
            .serve(app.into_make_service());
        let mark_ready = async {
            if handle.listening().await.is_some() {
                info!(port = config.port, "Policy server listening with TLS");
                state.set_ready(true).await;
            }
        };

        let (result, ()) = tokio::join!(server, mark_ready);
        result?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!(port = config.port, "Policy server listening without TLS");
        state.set_ready(true).await;
        axum::serve(listener, app).await?;
    }

    Ok(())
}
