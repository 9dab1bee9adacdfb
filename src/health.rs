//! Health server for Kubernetes probes and Prometheus metrics.
//!
//! Provides:
//! - `/healthz` - Liveness probe (always returns 200 if server is running)
//! - `/readyz` - Readiness probe (returns 200 when ready to serve traffic)
//! - `/metrics` - Prometheus metrics endpoint

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::registry::Registry;
use tokio::sync::RwLock;
use tracing::info;

use crate::policy::{SettingsValidationResponse, ValidationResponse};

/// How an admission request was answered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Request accepted
    Accepted,
    /// Request vetoed by the policy
    Rejected,
    /// Request rejected because it could not be decoded
    Invalid,
}

impl Outcome {
    /// Classify a validation response
    pub fn of(response: &ValidationResponse) -> Self {
        match (response.accepted, response.code) {
            (true, _) => Outcome::Accepted,
            (false, None) => Outcome::Rejected,
            (false, Some(_)) => Outcome::Invalid,
        }
    }

    /// Label value for metrics
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::Rejected => "rejected",
            Outcome::Invalid => "invalid",
        }
    }
}

/// Labels for evaluation metrics
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OutcomeLabels {
    pub outcome: String,
}

impl OutcomeLabels {
    fn new(outcome: &str) -> Self {
        Self {
            outcome: outcome.to_string(),
        }
    }
}

/// Shared metrics for the policy server
pub struct Metrics {
    /// Admission requests evaluated, by outcome
    pub validations_total: Family<OutcomeLabels, Counter>,
    /// Settings payloads checked, by outcome
    pub settings_validations_total: Family<OutcomeLabels, Counter>,
    /// Time spent deciding on one admission request
    pub validation_duration_seconds: Histogram,
    /// Prometheus registry
    registry: Registry,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance with registered metrics
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let validations_total = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "sqlpolicy_validations",
            "Total number of admission requests evaluated",
            validations_total.clone(),
        );

        let settings_validations_total = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "sqlpolicy_settings_validations",
            "Total number of settings payloads validated",
            settings_validations_total.clone(),
        );

        let validation_duration_seconds = Histogram::new(exponential_buckets(0.00001, 2.0, 15));
        registry.register(
            "sqlpolicy_validation_duration_seconds",
            "Duration of admission request evaluation in seconds",
            validation_duration_seconds.clone(),
        );

        Self {
            validations_total,
            settings_validations_total,
            validation_duration_seconds,
            registry,
        }
    }

    /// Record an evaluated admission request
    pub fn record_validation(&self, response: &ValidationResponse, duration_secs: f64) {
        let labels = OutcomeLabels::new(Outcome::of(response).as_str());
        self.validations_total.get_or_create(&labels).inc();
        self.validation_duration_seconds.observe(duration_secs);
    }

    /// Record a settings check
    pub fn record_settings_validation(&self, response: &SettingsValidationResponse) {
        let outcome = if response.valid { "valid" } else { "invalid" };
        self.settings_validations_total
            .get_or_create(&OutcomeLabels::new(outcome))
            .inc();
    }

    /// Encode metrics to Prometheus text format
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        if encode(&mut buffer, &self.registry).is_err() {
            tracing::error!("Failed to encode metrics");
            return "# Error encoding metrics".to_string();
        }
        buffer
    }
}

/// Shared state for the health and policy servers
pub struct HealthState {
    /// Whether the policy server is ready to accept requests
    ready: RwLock<bool>,
    /// Metrics registry
    pub metrics: Metrics,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    /// Create a new health state (starts as not ready)
    pub fn new() -> Self {
        Self {
            ready: RwLock::new(false),
            metrics: Metrics::new(),
        }
    }

    /// Mark the server as ready or not ready
    pub async fn set_ready(&self, ready: bool) {
        *self.ready.write().await = ready;
    }

    /// Check if the server is ready
    pub async fn is_ready(&self) -> bool {
        *self.ready.read().await
    }
}

/// Liveness probe handler
async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Readiness probe handler
///
/// Returns 503 Service Unavailable until the policy listener is bound, and again
/// once the policy server has stopped.
async fn readyz(State(state): State<Arc<HealthState>>) -> Response {
    if state.is_ready().await {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
    }
}

/// Metrics handler
async fn metrics_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let body = state.metrics.encode();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

/// Create the health server router
pub fn create_router(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Run the health server
///
/// Binds to 0.0.0.0 on `port` and serves health/metrics endpoints.
pub async fn run_health_server(port: u16, state: Arc<HealthState>) -> Result<(), std::io::Error> {
    let app = create_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "Starting health server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
