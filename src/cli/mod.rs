use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "reception-status")]
#[command(about = "Support desk reception status server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Start {
        /// The HTTP server bind address (host:port)
        #[arg(long, env = "RECEPTION_BIND_ADDRESS", group = "server")]
        bind_address: Option<String>,
        /// The HTTP server Unix socket path
        #[arg(long, env = "RECEPTION_SOCKET_PATH", group = "server")]
        socket_path: Option<String>,
        /// Requests per second allowed for each client
        #[arg(long, env = "RECEPTION_RATE_LIMIT_RPS", default_value_t = 100)]
        rate_limit_rps: u32,
        /// Requests a client may burst above the steady rate
        #[arg(long, env = "RECEPTION_RATE_LIMIT_BURST", default_value_t = 200)]
        rate_limit_burst: u32,
        /// Emit logs as JSON lines
        #[arg(long, env = "RECEPTION_LOG_JSON")]
        log_json: bool,
    },
}
