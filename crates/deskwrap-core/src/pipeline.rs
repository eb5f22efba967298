//! Simulated build pipeline.
//!
//! Nothing is packaged here. A build waits in the queue, "builds" for a fixed
//! delay and then completes with a fabricated download URL.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::build::{Build, TargetOs};
use crate::store::{BuildStore, BuildUpdate, StoreError};

/// Timing and URL settings for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Time a build spends in `queued`
    pub queue_delay: Duration,

    /// Time a build spends in `building`
    pub build_delay: Duration,

    /// Prefix for fabricated download URLs
    pub download_base: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_delay: Duration::from_secs(2),
            build_delay: Duration::from_secs(4),
            download_base: "https://storage.lovable.dev/builds".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Upper bound on how long a build stays non-terminal, ignoring scheduling.
    pub fn total_delay(&self) -> Duration {
        self.queue_delay + self.build_delay
    }
}

/// Drives builds from `queued` to a terminal status.
#[derive(Clone)]
pub struct BuildPipeline {
    store: Arc<dyn BuildStore>,
    config: PipelineConfig,
}

impl BuildPipeline {
    pub fn new(store: Arc<dyn BuildStore>, config: PipelineConfig) -> Self {
        Self { store, config }
    }

    /// Start the background task for a freshly inserted build.
    ///
    /// The task is detached from the caller; the handle is only useful to tests.
    pub fn spawn(&self, build: &Build) -> JoinHandle<()> {
        let pipeline = self.clone();
        let build = build.clone();
        tokio::spawn(async move { pipeline.run(&build).await })
    }

    /// Run the build to completion, marking it failed if any step errors.
    pub async fn run(&self, build: &Build) {
        match self.advance(build).await {
            Ok(url) => {
                tracing::info!("Build {} completed: {}", build.id, url);
            }
            Err(e) => {
                tracing::error!("Build {} failed: {}", build.id, e);
                let update = BuildUpdate::Failed {
                    message: e.to_string(),
                };
                if let Err(e) = self.store.transition(build.id, update).await {
                    tracing::warn!("Could not mark build {} as failed: {}", build.id, e);
                }
            }
        }
    }

    async fn advance(&self, build: &Build) -> Result<String, StoreError> {
        tokio::time::sleep(self.config.queue_delay).await;
        self.store.transition(build.id, BuildUpdate::Building).await?;
        tracing::info!("Build {} status: building", build.id);

        tokio::time::sleep(self.config.build_delay).await;

        let url = download_url(
            &self.config.download_base,
            build.id,
            &build.app_name,
            build.target_os,
        );
        self.store
            .transition(
                build.id,
                BuildUpdate::Completed {
                    download_url: url.clone(),
                },
            )
            .await?;

        Ok(url)
    }
}

/// Lowercase an app name and collapse whitespace runs into `-`.
pub fn slugify(name: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));
    re.replace_all(name.trim(), "-").to_lowercase()
}

/// Fabricated location of the packaged installer.
pub fn download_url(base: &str, id: Uuid, app_name: &str, os: TargetOs) -> String {
    format!(
        "{}/{}/{}-{}.{}",
        base.trim_end_matches('/'),
        id,
        slugify(app_name),
        os.as_str(),
        os.installer_extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{BuildStatus, Framework, NewBuild};
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    fn fast_config() -> PipelineConfig {
        PipelineConfig {
            queue_delay: Duration::from_millis(10),
            build_delay: Duration::from_millis(20),
            download_base: "https://dl.example.com/builds/".to_string(),
        }
    }

    fn new_build(os: TargetOs) -> NewBuild {
        NewBuild {
            app_name: "My Cool  App".to_string(),
            app_url: "https://cool.example.com".to_string(),
            target_os: os,
            framework: Framework::Electron,
            icon_url: None,
        }
    }

    #[test]
    fn slugifies_names() {
        assert_eq!(slugify("My Cool  App"), "my-cool-app");
        assert_eq!(slugify("Tabs\tand\nlines"), "tabs-and-lines");
        assert_eq!(slugify("single"), "single");
    }

    #[test]
    fn builds_download_urls() {
        let id = Uuid::nil();
        assert_eq!(
            download_url("https://dl/builds/", id, "My App", TargetOs::Windows),
            format!("https://dl/builds/{}/my-app-windows.exe", id)
        );
        assert!(download_url("https://dl", id, "x", TargetOs::Linux).ends_with("x-linux.AppImage"));
        assert!(download_url("https://dl", id, "x", TargetOs::Macos).ends_with("x-macos.dmg"));
    }

    #[tokio::test]
    async fn build_reaches_completed_within_delays() {
        let store = Arc::new(MemoryStore::new());
        let config = fast_config();
        let pipeline = BuildPipeline::new(store.clone(), config.clone());

        let build = store.insert(new_build(TargetOs::Macos), None).await.unwrap();
        let handle = pipeline.spawn(&build);

        tokio::time::timeout(config.total_delay() + Duration::from_secs(2), handle)
            .await
            .expect("build did not finish in time")
            .unwrap();

        let done = store.get(build.id).await.unwrap().unwrap();
        assert_eq!(done.status, BuildStatus::Completed);
        assert_eq!(
            done.download_url,
            Some(format!(
                "https://dl.example.com/builds/{}/my-cool-app-macos.dmg",
                build.id
            ))
        );
    }

    #[tokio::test]
    async fn passes_through_building() {
        let store = Arc::new(MemoryStore::new());
        let config = PipelineConfig {
            queue_delay: Duration::from_millis(10),
            build_delay: Duration::from_millis(300),
            ..fast_config()
        };
        let pipeline = BuildPipeline::new(store.clone(), config);

        let build = store.insert(new_build(TargetOs::Linux), None).await.unwrap();
        let handle = pipeline.spawn(&build);

        tokio::time::sleep(Duration::from_millis(150)).await;
        let mid = store.get(build.id).await.unwrap().unwrap();
        assert_eq!(mid.status, BuildStatus::Building);

        handle.await.unwrap();
        let done = store.get(build.id).await.unwrap().unwrap();
        assert_eq!(done.status, BuildStatus::Completed);
    }

    /// Store that accepts inserts but refuses every status change after the first.
    struct FlakyStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl BuildStore for FlakyStore {
        async fn insert(
            &self,
            new: NewBuild,
            user_id: Option<String>,
        ) -> Result<Build, StoreError> {
            self.inner.insert(new, user_id).await
        }

        async fn get(&self, id: Uuid) -> Result<Option<Build>, StoreError> {
            self.inner.get(id).await
        }

        async fn transition(&self, id: Uuid, update: BuildUpdate) -> Result<Build, StoreError> {
            if matches!(update, BuildUpdate::Completed { .. }) {
                return Err(StoreError::Backend("disk full".to_string()));
            }
            self.inner.transition(id, update).await
        }
    }

    #[tokio::test]
    async fn failures_are_recorded_on_the_build() {
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
        });
        let pipeline = BuildPipeline::new(store.clone(), fast_config());

        let build = store
            .insert(new_build(TargetOs::Windows), None)
            .await
            .unwrap();
        pipeline.run(&build).await;

        let failed = store.get(build.id).await.unwrap().unwrap();
        assert_eq!(failed.status, BuildStatus::Failed);
        assert_eq!(
            failed.error_message.as_deref(),
            Some("Storage error: disk full")
        );
        assert_eq!(failed.download_url, None);
    }
}
