//! The `Build` record and its status machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Target operating system for a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Windows,
    Macos,
    Linux,
}

impl TargetOs {
    /// All supported targets, in the order the form offers them.
    pub const ALL: [TargetOs; 3] = [TargetOs::Windows, TargetOs::Macos, TargetOs::Linux];

    /// Lowercase identifier used on the wire and in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Macos => "macos",
            Self::Linux => "linux",
        }
    }

    /// Extension of the (fabricated) packaged artifact.
    pub fn installer_extension(&self) -> &'static str {
        match self {
            Self::Windows => "exe",
            Self::Macos => "dmg",
            Self::Linux => "AppImage",
        }
    }

    /// Extension of the launcher script that is actually downloaded.
    pub fn script_extension(&self) -> &'static str {
        match self {
            Self::Windows => "bat",
            Self::Macos => "command",
            Self::Linux => "sh",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Macos => "macOS",
            Self::Linux => "Linux",
        }
    }
}

/// Desktop shell the app would be wrapped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Electron,
    Tauri,
}

impl Framework {
    pub const ALL: [Framework; 2] = [Framework::Electron, Framework::Tauri];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electron => "electron",
            Self::Tauri => "tauri",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Electron => "Electron",
            Self::Tauri => "Tauri",
        }
    }
}

/// Returned when parsing an unknown OS or framework name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for TargetOs {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::Macos),
            "linux" => Ok(Self::Linux),
            _ => Err(UnknownVariant {
                kind: "target OS",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Framework {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electron" => Ok(Self::Electron),
            "tauri" => Ok(Self::Tauri),
            _ => Err(UnknownVariant {
                kind: "framework",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a build.
///
/// Moves strictly forward: `queued -> building -> completed | failed`.
/// A queued build may also fail directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Queued,
    Building,
    Completed,
    Failed,
}

impl BuildStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Building => "building",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Completed and failed builds never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether moving from `self` to `next` keeps the lifecycle monotonic.
    pub fn can_transition_to(&self, next: BuildStatus) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Building)
                | (Self::Queued, Self::Failed)
                | (Self::Building, Self::Completed)
                | (Self::Building, Self::Failed)
        )
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated build request, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBuild {
    pub app_name: String,
    pub app_url: String,
    pub target_os: TargetOs,
    pub framework: Framework,
    /// Truncated data-URL preview of the uploaded icon.
    pub icon_url: Option<String>,
}

/// One simulated desktop-packaging request, as stored in the `builds` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub app_name: String,
    pub app_url: String,
    pub target_os: TargetOs,
    pub framework: Framework,
    pub icon_url: Option<String>,
    pub status: BuildStatus,
    pub download_url: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Build {
    /// Create a fresh queued build from a validated request.
    pub fn queued(new: NewBuild, user_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            app_name: new.app_name,
            app_url: new.app_url,
            target_os: new.target_os,
            framework: new.framework,
            icon_url: new.icon_url,
            status: BuildStatus::Queued,
            download_url: None,
            error_message: None,
            created_at: Utc::now(),
        }
    }
}
