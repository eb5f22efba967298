//! HTTP client for a running deskwrap server.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use deskwrap_core::{Build, BuildRequest, BuildSource, ValidationError};
use deskwrap_gateway::{collect_deltas, GenerationType};

/// Errors talking to the server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBuildResponse {
    build_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the create-build, build lookup and generate-code endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with build requests.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Validate `request` and submit it. Invalid requests never reach the network.
    pub async fn create_build(&self, request: &BuildRequest) -> Result<Uuid, ClientError> {
        request.validate()?;

        let mut builder = self
            .http
            .post(self.url("/functions/v1/create-build"))
            .json(request);
        if let Some(ref token) = self.token {
            builder = builder.bearer_auth(token);
        }

        let response = check(builder.send().await?).await?;
        let body: CreateBuildResponse = response.json().await?;
        Ok(body.build_id)
    }

    /// Fetch a build row; `None` when the server does not know the id.
    pub async fn get_build(&self, id: Uuid) -> Result<Option<Build>, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/builds/{}", id)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check(response).await?;
        Ok(Some(response.json().await?))
    }

    /// Stream generated code, calling `on_delta` per chunk of text.
    pub async fn generate_code<F>(
        &self,
        kind: GenerationType,
        prompt: &str,
        on_delta: F,
    ) -> Result<String, ClientError>
    where
        F: FnMut(&str),
    {
        let response = self
            .http
            .post(self.url("/functions/v1/generate-code"))
            .json(&json!({ "prompt": prompt, "type": kind.as_str() }))
            .send()
            .await?;

        let response = check(response).await?;
        Ok(collect_deltas(response.bytes_stream(), on_delta).await?)
    }
}

#[async_trait]
impl BuildSource for ApiClient {
    type Error = ClientError;

    async fn fetch(&self, id: Uuid) -> Result<Option<Build>, ClientError> {
        self.get_build(id).await
    }
}

/// Turn a non-success response into [`ClientError::Api`] using its `{error}` body.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use deskwrap_core::{watch_build, BuildStatus, Framework, TargetOs};
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn build_json(id: Uuid, status: &str) -> serde_json::Value {
        let download_url = (status == "completed")
            .then(|| format!("https://storage.lovable.dev/builds/{}/my-app-windows.exe", id));
        json!({
            "id": id,
            "user_id": null,
            "app_name": "My App",
            "app_url": "https://myapp.com",
            "target_os": "windows",
            "framework": "electron",
            "icon_url": null,
            "status": status,
            "download_url": download_url,
            "error_message": null,
            "created_at": chrono::Utc::now(),
        })
    }

    #[tokio::test]
    async fn blank_fields_never_reach_the_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());

        let blank_name = BuildRequest::new("  ", "https://myapp.com", TargetOs::Windows, Framework::Electron);
        let err = client.create_build(&blank_name).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::MissingFields(ref fields)) if fields == &vec!["appName"]
        ));

        let blank_url = BuildRequest::new("My App", "", TargetOs::Windows, Framework::Electron);
        let err = client.create_build(&blank_url).await.unwrap_err();
        assert_eq!(err.to_string(), "Required fields are missing: appUrl");
    }

    #[tokio::test]
    async fn creates_build_with_token() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("POST"))
            .and(path("/functions/v1/create-build"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({
                "appName": "My App",
                "targetOs": "macos",
                "framework": "tauri",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "buildId": id,
                "message": "Build started successfully",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(format!("{}/", server.uri())).with_token(Some("secret".into()));
        let request = BuildRequest::new("My App", "https://myapp.com", TargetOs::Macos, Framework::Tauri);

        assert_eq!(client.create_build(&request).await.unwrap(), id);
    }

    #[tokio::test]
    async fn surfaces_server_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/create-build"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "error": "Failed to create build: Storage error: disk full" })),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let request = BuildRequest::new("My App", "https://myapp.com", TargetOs::Linux, Framework::Electron);

        let err = client.create_build(&request).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to create build: Storage error: disk full (HTTP 500)"
        );
    }

    #[tokio::test]
    async fn unknown_build_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Build not found" })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());

        assert!(client.get_build(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn watches_remote_build_to_completion() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        let build_path = format!("/api/builds/{}", id);

        Mock::given(method("GET"))
            .and(path(build_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(build_json(id, "queued")))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(build_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(build_json(id, "building")))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(build_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(build_json(id, "completed")))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let mut seen = Vec::new();

        let build = watch_build(&client, id, Duration::from_millis(5), |b| seen.push(b.status)).await;

        assert_eq!(build.status, BuildStatus::Completed);
        assert_eq!(
            seen,
            vec![BuildStatus::Queued, BuildStatus::Building, BuildStatus::Completed]
        );
        assert!(build.download_url.unwrap().ends_with("/my-app-windows.exe"));
    }

    #[tokio::test]
    async fn streams_generated_code() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"<button>\"}}]}\n",
            ": keep-alive\n",
            "data: not json\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Go</button>\"}}]}\n",
            "data: [DONE]\n",
        );
        Mock::given(method("POST"))
            .and(path("/functions/v1/generate-code"))
            .and(body_partial_json(json!({ "type": "button" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let mut chunks = Vec::new();

        let text = client
            .generate_code(GenerationType::Button, "a go button", |d| chunks.push(d.to_string()))
            .await
            .unwrap();

        assert_eq!(text, "<button>Go</button>");
        assert_eq!(chunks.len(), 2);
    }

    #[tokio::test]
    async fn rate_limit_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/generate-code"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": "Rate limit exceeded. Please try again in a few seconds."
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());

        let err = client
            .generate_code(GenerationType::Logo, "a cloud", |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 429, .. }));
    }
}
