//! Static site build command.

use std::path::PathBuf;

use anyhow::Result;
use deskwrap_static::SiteBuilder;

use crate::config::Config;

/// Run the build command.
pub fn run(config: &Config, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let mut site = config.site_config();
    if let Some(output) = output {
        site.output_dir = output;
    }
    if let Some(minify) = minify {
        site.minify = minify;
    }

    let result = SiteBuilder::new(site).build()?;

    tracing::info!(
        "Built {} pages and {} assets in {}ms",
        result.pages,
        result.assets,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
