//! Stream generated code from a running server.

use std::io::Write;

use anyhow::{Context, Result};
use deskwrap_gateway::GenerationType;

use crate::client::ApiClient;
use crate::config::Config;

/// Run the generate command, printing code to stdout as it arrives.
pub async fn run(config: &Config, kind: &str, prompt: &str, server: Option<String>) -> Result<()> {
    let kind: GenerationType = kind.parse()?;
    if prompt.trim().is_empty() {
        anyhow::bail!("Prompt must not be empty");
    }

    let server = server.unwrap_or_else(|| config.server_url());
    let client = ApiClient::new(&server);

    tracing::debug!("Requesting {} snippet from {}", kind, server);

    let mut stdout = std::io::stdout().lock();
    let text = client
        .generate_code(kind, prompt, |delta| {
            // Best effort; a closed pipe just truncates the output
            let _ = stdout.write_all(delta.as_bytes());
            let _ = stdout.flush();
        })
        .await
        .with_context(|| format!("Code generation failed on {}", server))?;

    writeln!(stdout)?;
    tracing::debug!("Received {} characters", text.len());

    Ok(())
}
