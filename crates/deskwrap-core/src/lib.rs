//! Core domain for deskwrap.
//!
//! Holds the `Build` record and its status machine, request validation, the
//! build store, the simulated build pipeline, the polling watcher used by
//! clients, and the installer script generator.

pub mod build;
pub mod installer;
pub mod pipeline;
pub mod store;
pub mod validate;
pub mod watch;

pub use build::{Build, BuildStatus, Framework, NewBuild, TargetOs, UnknownVariant};
pub use installer::{generate_installer, InstallerError, InstallerScript};
pub use pipeline::{download_url, slugify, BuildPipeline, PipelineConfig};
pub use store::{BuildStore, BuildUpdate, MemoryStore, StoreError};
pub use validate::{BuildRequest, ValidationError};
pub use watch::{watch_build, BuildSource, DEFAULT_POLL_INTERVAL};
