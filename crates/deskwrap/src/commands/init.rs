//! Write a starter `deskwrap.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing deskwrap...");

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'deskwrap build' then 'deskwrap serve' to start.");

    Ok(())
}

pub(crate) const DEFAULT_CONFIG: &str = r#"# deskwrap configuration

[site]
# Output directory for the built site
output = "dist"

# Site title
title = "deskwrap"

# Base URL (for deployment)
base_url = "/"

# Prefix for API calls from the browser; empty means same origin
api_base = ""

# Files copied verbatim into the output
public_dir = "public"

[server]
host = "127.0.0.1"
port = 8080

[pipeline]
# Simulated time spent queued and building
queue_delay_ms = 2000
build_delay_ms = 4000
download_base = "https://storage.lovable.dev/builds"

[gateway]
base_url = "https://ai.gateway.lovable.dev/v1"
model = "google/gemini-3-flash-preview"
# Environment variable holding the gateway API key
api_key_env = "LOVABLE_API_KEY"

[build]
# Minify CSS
minify = true

[auth.tokens]
# "token" = "user-id"
"#;
