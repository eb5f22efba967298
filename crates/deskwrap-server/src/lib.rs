//! HTTP service for deskwrap.
//!
//! Exposes the create-build, generate-code and generate-installer functions,
//! a read path for build polling, and serves the built marketing site.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{router, ApiServer, AppState, ServerConfig, ServerError};
