//! Command handlers.

use tracing::{info, warn};

use remoting_api::{RemoteClient, RemoteServer, ServerOptions};
use remoting_config::{Config, ConfigValidator};
use remoting_protocols::HttpMethod;

use crate::demo::demo_service;

/// Serve the demo services until Ctrl-C.
pub(crate) async fn run_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!(path = %warning.path, "{}", warning.message);
    }

    info!("Starting remoting v{}", env!("CARGO_PKG_VERSION"));

    let mut server = RemoteServer::new(ServerOptions::from_config(&config));
    server.mount(demo_service(&config.routes)?)?;
    server.run().await?;
    Ok(())
}

/// Call one route and print the response envelope as JSON.
pub(crate) async fn call_route(
    url: String,
    method: HttpMethod,
    path: String,
    params: Vec<String>,
) -> anyhow::Result<()> {
    let client = RemoteClient::new(url);
    let params = params.into_iter().map(Some).collect();
    let response = client.call_raw(method, &path, params).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
