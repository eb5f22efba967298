//! Submit a build to a running server and wait for the installer.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use deskwrap_core::{watch_build, BuildRequest, BuildStatus, DEFAULT_POLL_INTERVAL};

use crate::client::ApiClient;
use crate::config::Config;

/// Give up on a build that has not settled after this long.
const WATCH_TIMEOUT: Duration = Duration::from_secs(600);

/// Arguments of the convert command.
#[derive(Debug)]
pub struct ConvertArgs {
    pub name: String,
    pub url: String,
    pub os: String,
    pub framework: String,
    pub icon: Option<PathBuf>,
    pub server: Option<String>,
    pub token: Option<String>,
}

/// Run the convert command.
pub async fn run(config: &Config, args: ConvertArgs) -> Result<()> {
    let icon_base64 = match args.icon {
        Some(ref path) => Some(icon_base64(path)?),
        None => None,
    };

    let request = BuildRequest {
        app_name: Some(args.name),
        app_url: Some(args.url),
        target_os: Some(args.os),
        framework: Some(args.framework),
        icon_base64,
    };

    let server = args.server.unwrap_or_else(|| config.server_url());
    let client = ApiClient::new(&server).with_token(args.token);

    let id = client
        .create_build(&request)
        .await
        .with_context(|| format!("Failed to start build on {}", server))?;
    tracing::info!("Build started: {}", id);

    let watch = watch_build(&client, id, DEFAULT_POLL_INTERVAL, |build| {
        tracing::info!("Build {} is {}", build.id, build.status.as_str());
    });
    let build = tokio::time::timeout(WATCH_TIMEOUT, watch)
        .await
        .with_context(|| format!("Build {} did not finish in {:?}", id, WATCH_TIMEOUT))?;

    match (build.status, build.download_url) {
        (BuildStatus::Completed, Some(url)) => {
            println!("{}", url);
            Ok(())
        }
        _ => anyhow::bail!(
            "Build failed: {}",
            build.error_message.as_deref().unwrap_or("unknown error")
        ),
    }
}

/// Read an image and encode it as bare base64, without a data URL prefix.
fn icon_base64(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read icon {}", path.display()))?;

    Ok(STANDARD.encode(bytes))
}
