//! API server command.

use std::path::PathBuf;

use anyhow::Result;
use deskwrap_server::{ApiServer, ServerConfig};

use crate::config::Config;

/// Run the API server, serving the built site for every other path.
pub async fn run(config: &Config, port: Option<u16>, dir: Option<PathBuf>, open: bool) -> Result<()> {
    let server = ServerConfig {
        host: config.server.host.clone(),
        port: port.unwrap_or(config.server.port),
        site_dir: Some(dir.unwrap_or_else(|| config.site.output.clone())),
        open,
        pipeline: config.pipeline_config(),
        gateway: config.gateway_config(),
        tokens: config.auth.tokens.clone(),
    };

    tracing::info!(
        "Simulated builds take {:?}",
        server.pipeline.total_delay()
    );

    ApiServer::new(server).start().await?;

    Ok(())
}
