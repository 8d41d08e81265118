//! Remoting - typed JSON-RPC service binding over HTTP and WebSocket.
//!
//! Main entry point for the remoting CLI and demo server.

mod cli;
mod demo;
mod logging;
mod server;

use clap::Parser;

use remoting_config::ConfigLoader;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ConfigLoader::load_or_default(&cli.config)?;
    let _guard = logging::init_tracing(&config.logging)?;

    match cli.command {
        None => server::run_server(config, None, None).await,
        Some(Commands::Serve { host, port }) => server::run_server(config, host, port).await,
        Some(Commands::Call {
            url,
            method,
            path,
            params,
        }) => server::call_route(url, method, path, params).await,
    }
}
