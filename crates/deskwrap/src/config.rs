//! `deskwrap.toml` loading.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use deskwrap_core::PipelineConfig;
use deskwrap_gateway::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use deskwrap_gateway::GatewayConfig;
use deskwrap_static::SiteConfig;

/// Configuration file structure (deskwrap.toml).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteSection,
    pub server: ServerSection,
    pub pipeline: PipelineSection,
    pub gateway: GatewaySection,
    pub build: BuildSection,
    pub auth: AuthSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub output: PathBuf,
    pub title: String,
    pub base_url: String,
    pub api_base: String,
    pub public_dir: Option<PathBuf>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist"),
            title: "deskwrap".to_string(),
            base_url: "/".to_string(),
            api_base: String::new(),
            public_dir: Some(PathBuf::from("public")),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    pub queue_delay_ms: u64,
    pub build_delay_ms: u64,
    pub download_base: String,
}

impl Default for PipelineSection {
    fn default() -> Self {
        let defaults = PipelineConfig::default();
        Self {
            queue_delay_ms: defaults.queue_delay.as_millis() as u64,
            build_delay_ms: defaults.build_delay.as_millis() as u64,
            download_base: defaults.download_base,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GatewaySection {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: "LOVABLE_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    pub minify: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self { minify: true }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    /// Bearer token to requester id
    pub tokens: HashMap<String, String>,
}

impl Config {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn site_config(&self) -> SiteConfig {
        SiteConfig {
            output_dir: self.site.output.clone(),
            title: self.site.title.clone(),
            base_url: self.site.base_url.clone(),
            api_base: self.site.api_base.clone(),
            public_dir: self.site.public_dir.clone(),
            minify: self.build.minify,
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            queue_delay: Duration::from_millis(self.pipeline.queue_delay_ms),
            build_delay: Duration::from_millis(self.pipeline.build_delay_ms),
            download_base: self.pipeline.download_base.clone(),
        }
    }

    /// Gateway settings with the key read from the configured variable.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.gateway.base_url.clone(),
            model: self.gateway.model.clone(),
            api_key: None,
        }
        .api_key_from_env(&self.gateway.api_key_env)
    }

    /// URL the client commands talk to when `--server` is not given.
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server.host, self.server.port)
    }
}
