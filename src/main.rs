//! sql-size-policy - Admission policy server for Sql resources.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Reads the server configuration from the environment
//! - Starts the health server and the policy server

use std::sync::Arc;

use tokio::signal;
use tracing::{error, info};

use sql_size_policy::health::run_health_server;
use sql_size_policy::{HealthState, ServerConfig, run_policy_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sql_size_policy=info".parse()?),
        )
        .json()
        .init();

    info!("Starting sql-size-policy");

    let config = ServerConfig::from_env()?;
    info!(
        port = config.port,
        health_port = config.health_port,
        tls = config.tls_enabled(),
        "Loaded configuration"
    );

    let health_state = Arc::new(HealthState::new());

    // Probes should answer before the policy server is up
    let health_handle = {
        let health_state = health_state.clone();
        let port = config.health_port;
        tokio::spawn(async move {
            if let Err(e) = run_health_server(port, health_state).await {
                error!("Health server error: {}", e);
            }
        })
    };

    let policy_handle = {
        let health_state = health_state.clone();
        let config = config.clone();
        tokio::spawn(async move {
            if let Err(e) = run_policy_server(&config, health_state).await {
                error!("Policy server error: {}", e);
            }
        })
    };

    tokio::select! {
        result = policy_handle => {
            if let Err(e) = result {
                error!("Policy server task panicked: {}", e);
            }
        }
        result = health_handle => {
            if let Err(e) = result {
                error!("Health server task panicked: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Received shutdown signal, shutting down");
            health_state.set_ready(false).await;
        }
    }

    info!("Policy server stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal. Using expect() here is intentional.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
