//! CLI definitions for the remoting binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use remoting_protocols::HttpMethod;

/// Remoting CLI.
#[derive(Parser)]
#[command(name = "remoting")]
#[command(about = "Typed JSON-RPC service binding over HTTP and WebSocket")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Serve the demo services in the foreground (default)
    Serve {
        /// Override the configured host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Call a route on a running server and print the response envelope
    Call {
        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:8080", env = "REMOTING_URL")]
        url: String,

        /// HTTP method the route is bound to
        #[arg(short = 'X', long, default_value = "POST")]
        method: HttpMethod,

        /// Route path, e.g. /rpc/add
        path: String,

        /// Positional parameters, sent as-is
        params: Vec<String>,
    },
}
