//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration for the health and ingestion endpoints
//! - Middleware stack (response headers, invocation context, tracing)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::logging::init_logging;
use crate::middleware::{invocation_context, response_header_layers};
use crate::routes::{events, health, not_found};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use ingest::ServiceTags;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Routing table:
/// - `GET /health` - liveness probe
/// - `POST /events` - event ingestion
/// - everything else, including other methods on those paths - 404
///
/// `get` also answers HEAD, so HEAD is routed to the 404 handler explicitly.
///
/// Middleware stack (outermost first):
/// 1. HTTP tracing
/// 2. Fixed response headers
/// 3. Invocation context (correlation id, cold start, panic boundary)
pub fn build_router(state: Arc<ServerState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    let mut router = Router::new()
        .route(
            "/health",
            get(health::health_check).head(not_found).fallback(not_found),
        )
        .route(
            "/events",
            post(events::ingest_event)
                .fallback(not_found)
                .layer(body_limit),
        )
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), invocation_context));

    for layer in response_header_layers() {
        router = router.layer(layer);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Start the EventFlow HTTP server
///
/// Initializes the server with the provided configuration and starts listening
/// for incoming HTTP requests. This function will block until the server is
/// shut down via SIGTERM or Ctrl+C.
///
/// # Example
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
///
/// # Initialization
///
/// 1. Sets up structured JSON logging with the configured log level
/// 2. Creates shared server state (cold-start flag, id generator, sink)
/// 3. Builds the Axum router with all routes and middleware
/// 4. Binds to the configured TCP address
/// 5. Starts the HTTP server with graceful shutdown support
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level);

    let addr: SocketAddr = config.socket_addr()?;
    let state = Arc::new(ServerState::new(config));

    tracing::info!(
        function = %state.tags.function_name,
        stage = %state.tags.stage,
        address = %addr,
        version = %state.config.service.version,
        "Starting EventFlow server"
    );

    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.tags.clone()))
        .await?;

    tracing::info!(
        function = %state.tags.function_name,
        stage = %state.tags.stage,
        "Server shutdown complete"
    );
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal(tags: Arc<ServiceTags>) {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(
                function = %tags.function_name,
                stage = %tags.stage,
                error = %err,
                "Failed to install Ctrl+C handler"
            );
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(
                    function = %tags.function_name,
                    stage = %tags.stage,
                    error = %err,
                    "Failed to install SIGTERM handler"
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = ctrl_c => "Ctrl+C",
        _ = terminate => "SIGTERM",
    };
    shutdown_received(&tags, received);
}

fn shutdown_received(tags: &ServiceTags, signal: &str) {
    tracing::info!(
        function = %tags.function_name,
        stage = %tags.stage,
        signal,
        "Shutdown signal received"
    );
}
