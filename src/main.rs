use crate::server::ServerConfig;
use anyhow::Result;
use clap::Parser;

mod cli;
mod clock;
mod logs;
mod reception;
mod server;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = cli::Cli::parse();
    // Run the specified command
    match cli.command {
        cli::Commands::Start {
            bind_address,
            socket_path,
            rate_limit_rps,
            rate_limit_burst,
            log_json,
        } => {
            // Create the server config
            let config = ServerConfig {
                bind_address,
                socket_path,
                rate_limit_rps,
                rate_limit_burst,
                log_json,
            };
            server::start_server(config).await
        }
    }
}
