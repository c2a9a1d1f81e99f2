use anyhow::{Result, anyhow};
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::net::{TcpListener, UnixListener};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::clock::SystemClock;
use crate::logs::init_logging_and_metrics;
use crate::server::http::{AppState, cors_layer, routes};
use crate::server::limit::create_rate_limit_layer;
use crate::utils::generate_request_id;

/// Address used when neither a bind address nor a socket path is given
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Configuration for server startup
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: Option<String>,
    pub socket_path: Option<String>,
    pub rate_limit_rps: u32,
    pub rate_limit_burst: u32,
    pub log_json: bool,
}

/// Start the HTTP server based on the provided configuration
pub async fn start_server(config: ServerConfig) -> Result<()> {
    // Initialize structured logging and metrics
    init_logging_and_metrics(config.log_json);
    // Output debugging information
    info!(
        bind_address = config.bind_address.as_deref().unwrap_or("N/A"),
        socket_path = config.socket_path.as_deref().unwrap_or("N/A"),
        rate_limit_rps = config.rate_limit_rps,
        rate_limit_burst = config.rate_limit_burst,
        "Server configuration loaded"
    );
    // Build the application with tracing and rate limiting
    let app = build_app(&config)?;
    match (config.bind_address, config.socket_path) {
        // Fall back to the default address
        (None, None) => start_tcp_server(app, DEFAULT_BIND_ADDRESS).await,
        // We are listening on a TCP address
        (Some(addr), None) => start_tcp_server(app, &addr).await,
        // We are listening on a Unix socket
        (None, Some(path)) => start_unix_server(app, &path).await,
        // This should never happen due to CLI argument groups
        (Some(_), Some(_)) => Err(anyhow!(
            "Cannot specify both --bind-address and --socket-path"
        )),
    }
}

/// Wrap the application routes in request tracing, rate limiting and CORS
fn build_app(config: &ServerConfig) -> Result<Router> {
    // Create rate limiting layer with metrics
    let rate_limit_layer = create_rate_limit_layer(config.rate_limit_rps, config.rate_limit_burst)?;
    // Create tracing layer for request logging
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            let request_id = generate_request_id();
            tracing::info_span!(
                "http_request",
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
            )
        })
        .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
            debug!(
                method = %request.method(),
                uri = %request.uri(),
                "HTTP request started"
            );
        })
        .on_response(
            |response: &axum::http::Response<_>, latency: Duration, _span: &tracing::Span| {
                let status = response.status();
                if status.is_client_error() || status.is_server_error() {
                    warn!(
                        status = %status,
                        latency_ms = latency.as_millis(),
                        "HTTP request failed"
                    );
                } else {
                    info!(
                        status = %status,
                        latency_ms = latency.as_millis(),
                        "HTTP request completed"
                    );
                }
            },
        );
    // Create the router, reading the host clock
    let app = routes(AppState::new(SystemClock))
        .layer(trace_layer)
        .layer(rate_limit_layer)
        // Outermost, so rejected requests still carry CORS headers
        .layer(cors_layer());
    Ok(app)
}

/// Serve the application over TCP
async fn start_tcp_server(app: Router, bind_address: &str) -> Result<()> {
    // Create a TCP listener for the HTTP server
    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(|e| anyhow!("Failed to bind to address {bind_address}: {e}"))?;
    // Output debugging information
    info!(bind_address = %bind_address, "Starting HTTP server");
    // Peer addresses are needed by the rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    // All ok
    Ok(())
}

/// Serve the application over a Unix domain socket
async fn start_unix_server(app: Router, socket_path: &str) -> Result<()> {
    // Get the specified socket path
    let socket_path = Path::new(socket_path);
    // Remove existing socket file if it exists
    if socket_path.exists() {
        fs::remove_file(socket_path).await?;
        info!(
            "Removed existing Unix socket file: {}",
            socket_path.display()
        );
    }
    // Create a Unix domain socket listener at the specified path
    let listener = UnixListener::bind(socket_path)
        .map_err(|e| anyhow!("Failed to bind to socket {}: {e}", socket_path.display()))?;
    // Output debugging information
    info!(
        socket_path = %socket_path.display(),
        "Starting HTTP server in Unix socket mode"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    // All ok
    Ok(())
}

/// Resolve once the process receives Ctrl+C
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl+C handler");
            // Keep serving until the process is killed
            std::future::pending::<()>().await;
        }
    }
}
