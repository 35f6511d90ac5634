//! Router construction, serving, and graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ServerError;
use crate::routes::{dashboard_handler, health_handler, provider_handler};
use crate::state::AppState;

/// Headroom over the adapter deadline before a request is abandoned.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Builds the router with tracing and a request timeout.
pub fn build_router(state: Arc<AppState>) -> Router {
    let request_timeout = state.ctx.adapter_deadline() + REQUEST_TIMEOUT_SLACK;
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/infra", get(dashboard_handler))
        .route("/api/infra/{provider}", get(provider_handler))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl+C or SIGTERM.
pub async fn serve(state: Arc<AppState>, addr: &str) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    let local = listener.local_addr()?;
    info!(addr = %local, providers = ?state.aggregator.configured(), "Listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C"),
        () = terminate => info!("received SIGTERM"),
    }
}
