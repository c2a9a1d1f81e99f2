use metrics::counter;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging and metrics collection
pub fn init_logging_and_metrics(json: bool) {
    // Set up environment filter for log levels
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("reception_status=info,tower_http=info"));
    let registry = tracing_subscriber::registry().with(filter);
    // Initialize tracing subscriber with stdout output
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stdout),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stdout),
            )
            .init();
    }
    // Output debugging information
    info!(json, "Logging and tracing initialized");
    // Initialize metrics with default values
    counter!("reception.total_requests").absolute(0);
    counter!("reception.total_errors").absolute(0);
    counter!("reception.total_rate_limit_errors").absolute(0);
    // Output debugging information
    info!("Metrics collection initialized");
}
