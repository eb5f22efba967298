//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Datelike;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::assets::AssetPipeline;
use crate::content;
use crate::templates::{Context, TemplateEngine};

/// Configuration for building the site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Output directory
    pub output_dir: PathBuf,

    /// Site title
    pub title: String,

    /// Base URL for the site
    pub base_url: String,

    /// Prefix the browser script puts in front of API paths.
    /// Empty means same origin.
    pub api_base: String,

    /// Directory copied verbatim into the output
    pub public_dir: Option<PathBuf>,

    /// Minify CSS output
    pub minify: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            title: "deskwrap".to_string(),
            base_url: "/".to_string(),
            api_base: String::new(),
            public_dir: None,
            minify: true,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct SiteResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of asset files written or copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("Failed to read input: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A page to be built.
#[derive(Debug, Clone, Copy)]
struct Page {
    template: &'static str,
    title: &'static str,
    active: &'static str,
    /// Output path relative to the output directory
    output: &'static str,
    /// URL path relative to the base URL
    url: &'static str,
}

const PAGES: &[Page] = &[
    Page {
        template: "index.html",
        title: "Web to desktop",
        active: "home",
        output: "index.html",
        url: "",
    },
    Page {
        template: "tools.html",
        title: "AI Tools",
        active: "tools",
        output: "tools/index.html",
        url: "tools/",
    },
];

/// Static site builder.
pub struct SiteBuilder {
    config: SiteConfig,
    templates: TemplateEngine,
}

impl SiteBuilder {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Build the site.
    pub fn build(&self) -> Result<SiteResult, SiteError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| SiteError::WriteError(e.to_string()))?;

        // Render pages in parallel
        let results: Vec<Result<(), SiteError>> =
            PAGES.par_iter().map(|page| self.build_page(page)).collect();
        for result in results {
            result?;
        }

        let mut assets = self.generate_assets()?;

        if let Some(ref public_dir) = self.config.public_dir {
            if public_dir.exists() {
                assets += self.copy_public(public_dir)?;
            } else {
                tracing::warn!("Public directory not found: {}", public_dir.display());
            }
        }

        self.generate_sitemap()?;

        let duration = start.elapsed();
        tracing::debug!("Site built in {:?}", duration);

        Ok(SiteResult {
            pages: PAGES.len(),
            assets,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    fn build_page(&self, page: &Page) -> Result<(), SiteError> {
        let context = Context {
            title: page.title.to_string(),
            site_title: self.config.title.clone(),
            base_url: self.config.base_url.clone(),
            api_base: self.config.api_base.clone(),
            active: page.active.to_string(),
            year: chrono::Utc::now().year(),
            features: content::features(),
            steps: content::steps(),
            os_choices: content::os_choices(),
            framework_choices: content::framework_choices(),
            generators: content::generators(),
        };

        let html = self
            .templates
            .render_page(page.template, &context)
            .map_err(|e| SiteError::TemplateError(format!("{}: {}", page.template, e)))?;

        let output_path = self.config.output_dir.join(page.output);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| SiteError::WriteError(e.to_string()))?;
        }
        fs::write(&output_path, html).map_err(|e| SiteError::WriteError(e.to_string()))?;

        tracing::debug!("Rendered {}", output_path.display());
        Ok(())
    }

    /// Write the stylesheet and browser script. Returns the number of files written.
    fn generate_assets(&self) -> Result<usize, SiteError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| SiteError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("{}, writing unminified CSS", e);
                css
            })
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| SiteError::WriteError(e.to_string()))?;

        fs::write(assets_dir.join("main.js"), AssetPipeline::generate_js())
            .map_err(|e| SiteError::WriteError(e.to_string()))?;

        Ok(2)
    }

    /// Copy every file under `public_dir` into the output, keeping relative paths.
    fn copy_public(&self, public_dir: &Path) -> Result<usize, SiteError> {
        let mut copied = 0;

        for entry in WalkDir::new(public_dir) {
            let entry = entry.map_err(|e| SiteError::ReadError(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(public_dir)
                .map_err(|e| SiteError::ReadError(e.to_string()))?;
            let target = self.config.output_dir.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| SiteError::WriteError(e.to_string()))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| {
                SiteError::WriteError(format!("{}: {}", target.display(), e))
            })?;
            copied += 1;
        }

        tracing::info!("Copied {} files from {}", copied, public_dir.display());
        Ok(copied)
    }

    /// Generate sitemap.xml and robots.txt.
    fn generate_sitemap(&self) -> Result<(), SiteError> {
        let base = self.config.base_url.trim_end_matches('/');
        let urls: Vec<String> = PAGES
            .iter()
            .map(|page| format!("  <url>\n    <loc>{}/{}</loc>\n  </url>", base, page.url))
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| SiteError::WriteError(e.to_string()))?;

        let robots = format!("User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml", base);
        fs::write(self.config.output_dir.join("robots.txt"), robots)
            .map_err(|e| SiteError::WriteError(e.to_string()))?;

        Ok(())
    }
}
