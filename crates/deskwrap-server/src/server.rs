//! Server setup and routing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use deskwrap_core::{BuildPipeline, BuildStore, MemoryStore, PipelineConfig};
use deskwrap_gateway::{GatewayClient, GatewayConfig};

use crate::handlers;

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Built site to serve for every non-API path
    pub site_dir: Option<PathBuf>,

    /// Open browser on start
    pub open: bool,

    /// Timings of the simulated build
    pub pipeline: PipelineConfig,

    /// Code generation gateway
    pub gateway: GatewayConfig,

    /// Bearer tokens mapped to requester ids
    pub tokens: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            site_dir: Some(PathBuf::from("dist")),
            open: false,
            pipeline: PipelineConfig::default(),
            gateway: GatewayConfig::default(),
            tokens: HashMap::new(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),
}

/// Shared handler state.
pub struct AppState {
    pub(crate) store: Arc<dyn BuildStore>,
    pub(crate) pipeline: BuildPipeline,
    pub(crate) gateway: GatewayClient,
    tokens: HashMap<String, String>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn BuildStore>,
        pipeline: PipelineConfig,
        gateway: GatewayConfig,
        tokens: HashMap<String, String>,
    ) -> Self {
        Self {
            pipeline: BuildPipeline::new(Arc::clone(&store), pipeline),
            store,
            gateway: GatewayClient::new(gateway),
            tokens,
        }
    }

    /// Resolve the caller from a bearer token; unknown tokens are anonymous.
    pub fn requester(&self, headers: &HeaderMap) -> Option<String> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        self.tokens.get(token).cloned()
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>, site_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/functions/v1/create-build", post(handlers::create_build))
        .route("/functions/v1/generate-code", post(handlers::generate_code))
        .route(
            "/functions/v1/generate-installer",
            post(handlers::generate_installer),
        )
        .route("/api/builds/{id}", get(handlers::get_build))
        .with_state(state);

    let app = match site_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(cors_layer()).layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-supabase-client-platform"),
            HeaderName::from_static("x-supabase-client-platform-version"),
            HeaderName::from_static("x-supabase-client-runtime"),
            HeaderName::from_static("x-supabase-client-runtime-version"),
        ])
        .expose_headers([header::CONTENT_DISPOSITION])
}

/// API server.
pub struct ApiServer {
    config: ServerConfig,
}

impl ApiServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let site_dir = match self.config.site_dir {
            Some(dir) if dir.exists() => Some(dir),
            Some(dir) => {
                tracing::warn!(
                    "Site directory not found: {}. Run 'deskwrap build' first; serving the API only.",
                    dir.display()
                );
                None
            }
            None => None,
        };

        if self.config.gateway.api_key.is_none() {
            tracing::warn!("No gateway API key configured; generate-code will fail");
        }

        let state = Arc::new(AppState::new(
            Arc::new(MemoryStore::new()),
            self.config.pipeline,
            self.config.gateway,
            self.config.tokens,
        ));

        let app = router(state, site_dir);

        tracing::info!("Starting server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}
