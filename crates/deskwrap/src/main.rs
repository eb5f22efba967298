//! deskwrap CLI - turn a web app into a desktop app.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod client;
mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "deskwrap")]
#[command(about = "Wrap a web app as a desktop app")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to deskwrap.toml config file
    #[arg(short, long, default_value = "deskwrap.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default deskwrap.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the static site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Run the API server and serve the built site
    Serve {
        /// Port to listen on (defaults to config or 8080)
        #[arg(short, long)]
        port: Option<u16>,

        /// Site directory to serve (defaults to the configured output)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Open the site in a browser
        #[arg(long)]
        open: bool,
    },

    /// Submit a build and wait for its installer
    Convert {
        /// App name
        #[arg(short, long)]
        name: String,

        /// App URL or GitHub repository
        #[arg(short, long)]
        url: String,

        /// Target operating system: windows, macos or linux
        #[arg(long, default_value = "windows")]
        os: String,

        /// Desktop framework: electron or tauri
        #[arg(long, default_value = "electron")]
        framework: String,

        /// Path to an icon image
        #[arg(long)]
        icon: Option<PathBuf>,

        /// Server URL (defaults to the configured host and port)
        #[arg(long)]
        server: Option<String>,

        /// Bearer token identifying the requester
        #[arg(long)]
        token: Option<String>,
    },

    /// Stream generated UI code to stdout
    Generate {
        /// Generation type: button, image, logo or effect
        #[arg(short = 't', long = "type")]
        kind: String,

        /// What to generate
        #[arg(short, long)]
        prompt: String,

        /// Server URL (defaults to the configured host and port)
        #[arg(long)]
        server: Option<String>,
    },

    /// Write a launcher installer script locally
    Installer {
        /// App name
        #[arg(short, long)]
        name: String,

        /// App URL
        #[arg(short, long)]
        url: String,

        /// Target operating system: windows, macos or linux
        #[arg(long, default_value = "linux")]
        os: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Init writes the config, every other command reads it
    let load_config = || Config::load(&cli.config);

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Build { output, no_minify } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&load_config()?, output, minify)?;
        }
        Commands::Serve { port, dir, open } => {
            commands::serve::run(&load_config()?, port, dir, open).await?;
        }
        Commands::Convert {
            name,
            url,
            os,
            framework,
            icon,
            server,
            token,
        } => {
            let args = commands::convert::ConvertArgs {
                name,
                url,
                os,
                framework,
                icon,
                server,
                token,
            };
            commands::convert::run(&load_config()?, args).await?;
        }
        Commands::Generate {
            kind,
            prompt,
            server,
        } => {
            commands::generate::run(&load_config()?, &kind, &prompt, server).await?;
        }
        Commands::Installer {
            name,
            url,
            os,
            output,
        } => {
            commands::installer::run(&name, &url, &os, &output)?;
        }
    }

    Ok(())
}
