//! Storage for build records.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::build::{Build, BuildStatus, NewBuild};

/// A status change applied to a stored build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildUpdate {
    Building,
    Completed { download_url: String },
    Failed { message: String },
}

impl BuildUpdate {
    /// Status the build ends up in after this update.
    pub fn status(&self) -> BuildStatus {
        match self {
            Self::Building => BuildStatus::Building,
            Self::Completed { .. } => BuildStatus::Completed,
            Self::Failed { .. } => BuildStatus::Failed,
        }
    }
}

/// Errors returned by a build store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Build not found: {0}")]
    NotFound(Uuid),

    #[error("Build {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: Uuid,
        from: BuildStatus,
        to: BuildStatus,
    },

    #[error("Storage error: {0}")]
    Backend(String),
}

/// Persistence for the `builds` table.
#[async_trait]
pub trait BuildStore: Send + Sync {
    /// Insert a new queued build.
    async fn insert(&self, new: NewBuild, user_id: Option<String>) -> Result<Build, StoreError>;

    /// Fetch a build by id.
    async fn get(&self, id: Uuid) -> Result<Option<Build>, StoreError>;

    /// Apply a status change, rejecting anything that breaks the lifecycle.
    async fn transition(&self, id: Uuid, update: BuildUpdate) -> Result<Build, StoreError>;
}

/// In-process build store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    builds: RwLock<HashMap<Uuid, Build>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored builds.
    pub async fn len(&self) -> usize {
        self.builds.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.builds.read().await.is_empty()
    }
}

#[async_trait]
impl BuildStore for MemoryStore {
    async fn insert(&self, new: NewBuild, user_id: Option<String>) -> Result<Build, StoreError> {
        let build = Build::queued(new, user_id);
        self.builds.write().await.insert(build.id, build.clone());
        Ok(build)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Build>, StoreError> {
        Ok(self.builds.read().await.get(&id).cloned())
    }

    async fn transition(&self, id: Uuid, update: BuildUpdate) -> Result<Build, StoreError> {
        let mut builds = self.builds.write().await;
        let build = builds.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let next = update.status();
        if !build.status.can_transition_to(next) {
            return Err(StoreError::InvalidTransition {
                id,
                from: build.status,
                to: next,
            });
        }

        build.status = next;
        match update {
            BuildUpdate::Building => {}
            BuildUpdate::Completed { download_url } => build.download_url = Some(download_url),
            BuildUpdate::Failed { message } => build.error_message = Some(message),
        }

        Ok(build.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{Framework, TargetOs};

    fn new_build() -> NewBuild {
        NewBuild {
            app_name: "Docs".to_string(),
            app_url: "https://docs.example.com".to_string(),
            target_os: TargetOs::Macos,
            framework: Framework::Tauri,
            icon_url: None,
        }
    }

    #[tokio::test]
    async fn inserts_queued_builds() {
        let store = MemoryStore::new();

        let build = store
            .insert(new_build(), Some("user-1".to_string()))
            .await
            .unwrap();

        assert_eq!(build.status, BuildStatus::Queued);
        assert_eq!(build.user_id.as_deref(), Some("user-1"));
        assert_eq!(store.get(build.id).await.unwrap(), Some(build));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn applies_forward_transitions() {
        let store = MemoryStore::new();
        let build = store.insert(new_build(), None).await.unwrap();

        store
            .transition(build.id, BuildUpdate::Building)
            .await
            .unwrap();
        let done = store
            .transition(
                build.id,
                BuildUpdate::Completed {
                    download_url: "https://dl/x.dmg".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(done.status, BuildStatus::Completed);
        assert_eq!(done.download_url.as_deref(), Some("https://dl/x.dmg"));
        assert_eq!(done.error_message, None);
    }

    #[tokio::test]
    async fn terminal_builds_are_frozen() {
        let store = MemoryStore::new();
        let build = store.insert(new_build(), None).await.unwrap();

        store
            .transition(
                build.id,
                BuildUpdate::Failed {
                    message: "boom".to_string(),
                },
            )
            .await
            .unwrap();

        let err = store
            .transition(build.id, BuildUpdate::Building)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::InvalidTransition {
                id: build.id,
                from: BuildStatus::Failed,
                to: BuildStatus::Building,
            }
        );

        let stored = store.get(build.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BuildStatus::Failed);
        assert_eq!(stored.error_message.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn cannot_skip_building() {
        let store = MemoryStore::new();
        let build = store.insert(new_build(), None).await.unwrap();

        let result = store
            .transition(
                build.id,
                BuildUpdate::Completed {
                    download_url: "x".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn unknown_ids() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        assert_eq!(store.get(id).await.unwrap(), None);
        assert_eq!(
            store.transition(id, BuildUpdate::Building).await,
            Err(StoreError::NotFound(id))
        );
    }
}
