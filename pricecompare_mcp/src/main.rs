use std::sync::Arc;
use tracing::{error, info};

use pricecompare_core::{
    mcp_server::{JsonRpcHandler, McpServer},
    transport::StdioTransport,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout is the JSON-RPC channel.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting pricecompare MCP server");

    // Platform set is fixed for the process lifetime: only feature-enabled
    // platforms are registered, in ranking tie-break order.
    let registry = Arc::new(pricecompare_core::build_registry_enabled_only());
    if registry.is_empty() {
        error!("no platforms enabled; rebuild with --features all-platforms");
    } else {
        info!(platforms = registry.len(), "platform registry ready");
    }

    let server = McpServer::new(registry);
    let handler = JsonRpcHandler::new(server);
    let transport = StdioTransport::new(handler);

    info!("MCP server ready, listening on stdio");

    if let Err(e) = transport.run().await {
        error!("Transport error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
