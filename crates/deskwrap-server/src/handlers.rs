//! Request handlers for the HTTP functions.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use deskwrap_core::{generate_installer as render_installer, Build, BuildRequest, TargetOs};
use deskwrap_gateway::GenerationType;

use crate::error::ApiError;
use crate::server::AppState;

/// Successful create-build response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBuildResponse {
    pub success: bool,
    pub build_id: Uuid,
    pub message: String,
}

/// Body of a generate-code call.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Body of a generate-installer call.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallerRequest {
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub app_url: Option<String>,
    #[serde(default)]
    pub target_os: Option<String>,
}

/// `POST /functions/v1/create-build`
pub async fn create_build(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<BuildRequest>, JsonRejection>,
) -> Result<Json<CreateBuildResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let new = request.validate()?;
    let user_id = state.requester(&headers);

    tracing::info!(
        "Creating build for {} ({}/{}) by user {}",
        new.app_name,
        new.target_os,
        new.framework,
        user_id.as_deref().unwrap_or("anonymous")
    );

    let build = state
        .store
        .insert(new, user_id)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create build: {}", e)))?;

    tracing::info!("Build created with id: {}", build.id);
    state.pipeline.spawn(&build);

    Ok(Json(CreateBuildResponse {
        success: true,
        build_id: build.id,
        message: "Build started successfully".to_string(),
    }))
}

/// `GET /api/builds/{id}`
pub async fn get_build(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Build>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Build not found: {}", id)))
}

/// `POST /functions/v1/generate-code`
///
/// The gateway's event stream is passed through untouched.
pub async fn generate_code(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let prompt = request.prompt.as_deref().map(str::trim).unwrap_or_default();
    let kind = request.kind.as_deref().unwrap_or_default();
    if prompt.is_empty() || kind.is_empty() {
        return Err(ApiError::BadRequest("Missing prompt or type".to_string()));
    }

    let kind = kind
        .parse::<GenerationType>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!("Generating {} snippet ({} chars of prompt)", kind, prompt.len());

    let upstream = state.gateway.stream_completion(kind, prompt).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}

/// `POST /functions/v1/generate-installer`
pub async fn generate_installer(
    payload: Result<Json<InstallerRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let (Some(name), Some(url), Some(os)) = (request.app_name, request.app_url, request.target_os)
    else {
        return Err(ApiError::BadRequest(
            "Required fields are missing: appName, appUrl, targetOs".to_string(),
        ));
    };
    let os: TargetOs = os
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid target OS: {}", os)))?;

    let script = render_installer(&name, &url, os)?;
    tracing::info!("Generated installer {}", script.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, script.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", script.file_name),
            ),
        ],
        script.body,
    )
        .into_response())
}
