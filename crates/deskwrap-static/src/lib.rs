//! Static site generator for deskwrap.
//!
//! Renders the marketing page with the conversion form and the AI tools page,
//! along with the stylesheet and the browser script that talks to the API.

pub mod assets;
pub mod builder;
pub mod content;
pub mod templates;

pub use builder::{SiteBuilder, SiteConfig, SiteError, SiteResult};
