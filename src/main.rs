//! Relay binary - main entry point.
//!
//! Parses arguments, wires the relay to the remote endpoint, starts the
//! background tool-list refresh loop, and serves MCP over stdio until the
//! client closes the pipe.

use clap::Parser;
use mcp_relay::relay::Relay;
use mcp_relay::stdio::StdioServer;
use mcp_relay::Config;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "mcp-relay", version, about = "Relay a stdio MCP client to an HTTP tool endpoint")]
struct Args {
    /// Base URL of the remote tool endpoint.
    #[arg(long, env = "RELAY_SERVER_URL", default_value = "http://localhost:60100")]
    server_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize observability (stderr only; stdout is the protocol channel)
    mcp_relay::observability::init_tracing();

    let mut config = Config::default();
    config.endpoint.base_url = args.server_url;

    tracing::info!("relay starting, endpoint {}", config.endpoint.base_url);

    let relay = Arc::new(Relay::new(&config));
    let cancel = CancellationToken::new();

    // Background refresh loop, owned here and stopped at shutdown
    let refresh_task = {
        let relay = relay.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { relay.run_refresh_loop(cancel).await })
    };

    let server = StdioServer::new(relay, cancel.clone(), config.stdio.clone());
    let served = server.serve().await;

    cancel.cancel();
    let _ = refresh_task.await;

    served?;
    Ok(())
}
