//! Client-side polling of a build until it settles.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::build::{Build, BuildStatus};
use crate::store::{BuildStore, MemoryStore, StoreError};

/// How often clients re-fetch a build.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Anything a build row can be read from.
#[async_trait]
pub trait BuildSource: Send + Sync {
    type Error: Display + Send;

    async fn fetch(&self, id: Uuid) -> Result<Option<Build>, Self::Error>;
}

#[async_trait]
impl BuildSource for MemoryStore {
    type Error = StoreError;

    async fn fetch(&self, id: Uuid) -> Result<Option<Build>, StoreError> {
        self.get(id).await
    }
}

/// Poll `source` every `interval` until the build is completed or failed.
///
/// `on_update` sees the build each time its status changes. Fetch errors and
/// missing rows are logged and polling carries on. Never returns for a build
/// that does not settle; wrap it in a timeout if that matters.
pub async fn watch_build<S, F>(source: &S, id: Uuid, interval: Duration, mut on_update: F) -> Build
where
    S: BuildSource + ?Sized,
    F: FnMut(&Build) + Send,
{
    let mut last: Option<BuildStatus> = None;

    loop {
        tokio::time::sleep(interval).await;

        let build = match source.fetch(id).await {
            Ok(Some(build)) => build,
            Ok(None) => {
                tracing::debug!("Build {} not found yet", id);
                continue;
            }
            Err(e) => {
                tracing::error!("Error polling build {}: {}", id, e);
                continue;
            }
        };

        if last != Some(build.status) {
            last = Some(build.status);
            on_update(&build);
        }

        if build.status.is_terminal() {
            return build;
        }
    }
}
