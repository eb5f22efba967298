//! Validation of incoming build requests.

use serde::{Deserialize, Serialize};

use crate::build::{Framework, NewBuild, TargetOs};

/// Characters of the uploaded icon kept in the stored preview.
const ICON_PREVIEW_LEN: usize = 100;

/// Body of a create-build call.
///
/// Every field is optional on the wire so that a missing field is reported
/// as a validation error instead of a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub app_url: Option<String>,
    #[serde(default)]
    pub target_os: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_base64: Option<String>,
}

/// Reasons a build request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Required fields are missing: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid target OS: {0}")]
    InvalidTargetOs(String),

    #[error("Invalid framework: {0}")]
    InvalidFramework(String),
}

impl BuildRequest {
    /// Build a request from already-typed values.
    pub fn new(
        app_name: impl Into<String>,
        app_url: impl Into<String>,
        target_os: TargetOs,
        framework: Framework,
    ) -> Self {
        Self {
            app_name: Some(app_name.into()),
            app_url: Some(app_url.into()),
            target_os: Some(target_os.as_str().to_string()),
            framework: Some(framework.as_str().to_string()),
            icon_base64: None,
        }
    }

    /// Check the request and turn it into an insertable build.
    ///
    /// Required fields are checked first, then the URL, then the enums.
    pub fn validate(&self) -> Result<NewBuild, ValidationError> {
        let app_name = non_blank(&self.app_name);
        let app_url = non_blank(&self.app_url);
        let target_os = non_blank(&self.target_os);
        let framework = non_blank(&self.framework);

        let mut missing = Vec::new();
        if app_name.is_none() {
            missing.push("appName");
        }
        if app_url.is_none() {
            missing.push("appUrl");
        }
        if target_os.is_none() {
            missing.push("targetOs");
        }
        if framework.is_none() {
            missing.push("framework");
        }

        let (Some(app_name), Some(app_url), Some(target_os), Some(framework)) =
            (app_name, app_url, target_os, framework)
        else {
            return Err(ValidationError::MissingFields(missing));
        };

        url::Url::parse(app_url).map_err(|_| ValidationError::InvalidUrl(app_url.to_string()))?;

        let target_os: TargetOs = target_os
            .parse()
            .map_err(|_| ValidationError::InvalidTargetOs(target_os.to_string()))?;
        let framework: Framework = framework
            .parse()
            .map_err(|_| ValidationError::InvalidFramework(framework.to_string()))?;

        let icon_url = self
            .icon_base64
            .as_deref()
            .filter(|icon| !icon.is_empty())
            .map(icon_preview);

        Ok(NewBuild {
            app_name: app_name.to_string(),
            app_url: app_url.to_string(),
            target_os,
            framework,
            icon_url,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Only a prefix of the icon is kept; the full image is never stored.
///
/// Clients may send either the bare payload or a full `data:` URL.
fn icon_preview(icon: &str) -> String {
    let base64 = match icon.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, payload)| payload),
        None => icon,
    };
    let prefix: String = base64.chars().take(ICON_PREVIEW_LEN).collect();
    format!("data:image/png;base64,{}...", prefix)
}
