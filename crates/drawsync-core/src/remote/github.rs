//! GitHub REST client
//!
//! Every request carries `Accept: application/vnd.github+json`, the bearer
//! token, the `X-GitHub-Api-Version` header and a user agent. Status codes
//! are mapped onto [`SyncError`] kinds here so the sync sequence only deals
//! in typed outcomes.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{
    ContainerStatus, CreateContainer, DocumentWrite, RemoteApi, RemoteFile, RemoteUser,
    WriteReceipt,
};
use crate::config::Config;
use crate::credential::Credential;
use crate::document::{RemoteLocation, VersionTag};
use crate::error::{SyncError, SyncResult};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Client for the subset of the GitHub REST API used by sync
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    base_url: Url,
    api_version: String,
}

impl GithubClient {
    /// Create a client for `base_url` (e.g. `https://api.github.com`)
    pub fn new(base_url: &str, api_version: &str, timeout: Duration) -> SyncResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("drawsync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let parsed = Url::parse(base_url).map_err(|e| {
            SyncError::TransportError(format!("invalid API URL '{}': {}", base_url, e))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(SyncError::TransportError(format!(
                "invalid API URL '{}': not a base URL",
                base_url
            )));
        }

        Ok(Self {
            http,
            base_url: parsed,
            api_version: api_version.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> SyncResult<Self> {
        Self::new(&config.api_url, &config.api_version, config.timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `/repos/{owner}/{repo}/contents/{path}`, keeping `/` inside the path
    fn contents_url(&self, location: &RemoteLocation) -> Url {
        let file_segments = location.path.split('/').filter(|s| !s.is_empty());
        self.endpoint(
            [
                "repos",
                location.owner.as_str(),
                location.repository.as_str(),
                "contents",
            ]
            .into_iter()
            .chain(file_segments),
        )
    }

    fn request(&self, method: Method, url: Url, credential: &Credential) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(AUTHORIZATION, credential.bearer())
            .header(API_VERSION_HEADER, &self.api_version)
    }
}

/// Error payload returned by GitHub
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn describe(&self) -> String {
        let details: Vec<&str> = self
            .errors
            .iter()
            .filter_map(|e| e.message.as_deref())
            .collect();
        match (self.message.is_empty(), details.is_empty()) {
            (true, true) => "no details".to_string(),
            (false, true) => self.message.clone(),
            (true, false) => details.join("; "),
            (false, false) => format!("{} ({})", self.message, details.join("; ")),
        }
    }

    fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle)
            || self.errors.iter().any(|e| {
                e.message.as_deref().is_some_and(|m| m.contains(needle))
                    || e.code.as_deref().is_some_and(|c| c.contains(needle))
            })
    }
}

fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

/// Map an exhausted rate limit to `RateLimited`
///
/// GitHub answers 403 (primary limit, `x-ratelimit-remaining: 0`) or 429
/// (secondary limit). A 403 with requests left is a permission problem.
fn rate_limit(response: &Response) -> Option<SyncError> {
    let status = response.status();
    let exhausted = match status {
        StatusCode::TOO_MANY_REQUESTS => true,
        StatusCode::FORBIDDEN => header(response, RATE_LIMIT_REMAINING_HEADER) == Some("0"),
        _ => false,
    };
    if !exhausted {
        return None;
    }

    let resets_at = header(response, RATE_LIMIT_RESET_HEADER)
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true));
    warn!(
        "Rate limit exhausted ({}), resets at {}",
        status,
        resets_at.as_deref().unwrap_or("unknown")
    );
    Some(SyncError::RateLimited {
        status: status.as_u16(),
        resets_at,
    })
}

async fn error_body(response: Response) -> ErrorBody {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str(&text).unwrap_or_else(|_| ErrorBody {
        message: text.trim().to_string(),
        errors: Vec::new(),
    })
}

/// `PUT contents` response; only the new blob and commit SHAs are used
#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: ShaRef,
    #[serde(default)]
    commit: Option<ShaRef>,
}

#[derive(Debug, Deserialize)]
struct ShaRef {
    sha: String,
}

#[async_trait]
impl RemoteApi for GithubClient {
    async fn current_user(&self, credential: &Credential) -> SyncResult<RemoteUser> {
        let url = self.endpoint(["user"]);
        debug!("Resolving user via {}", url);
        let response = self
            .request(Method::GET, url, credential)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        if let Some(err) = rate_limit(&response) {
            return Err(err);
        }

        let body = error_body(response).await;
        warn!("User lookup failed with {}: {}", status, body.describe());
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(SyncError::AuthFailure {
                status: status.as_u16(),
                message: body.describe(),
            })
        } else {
            Err(SyncError::Api {
                status: status.as_u16(),
                message: body.describe(),
            })
        }
    }

    async fn create_container(
        &self,
        credential: &Credential,
        request: &CreateContainer,
    ) -> SyncResult<ContainerStatus> {
        let response = self
            .request(Method::POST, self.endpoint(["user", "repos"]), credential)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("Repository {} created", request.name);
            return Ok(ContainerStatus::Created);
        }
        if let Some(err) = rate_limit(&response) {
            return Err(err);
        }

        let body = error_body(response).await;
        if status == StatusCode::UNPROCESSABLE_ENTITY && body.mentions("already exists") {
            debug!("Repository {} already exists", request.name);
            return Ok(ContainerStatus::AlreadyExists);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(SyncError::AuthFailure {
                status: status.as_u16(),
                message: body.describe(),
            });
        }

        Err(SyncError::ContainerCreateFailure {
            repository: request.name.clone(),
            status: status.as_u16(),
            message: body.describe(),
        })
    }

    async fn fetch_document(
        &self,
        credential: &Credential,
        location: &RemoteLocation,
    ) -> SyncResult<Option<RemoteFile>> {
        let response = self
            .request(Method::GET, self.contents_url(location), credential)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("No remote document at {}", location);
            return Ok(None);
        }
        if status.is_success() {
            let text = response.text().await?;
            let file: RemoteFile = serde_json::from_str(&text).map_err(|e| {
                SyncError::Decode(format!("unexpected contents response for {}: {}", location, e))
            })?;
            debug!("Remote document {} at version {}", location, file.sha.short());
            return Ok(Some(file));
        }
        if let Some(err) = rate_limit(&response) {
            return Err(err);
        }

        let body = error_body(response).await;
        if status == StatusCode::UNAUTHORIZED {
            return Err(SyncError::AuthFailure {
                status: status.as_u16(),
                message: body.describe(),
            });
        }
        Err(SyncError::Api {
            status: status.as_u16(),
            message: body.describe(),
        })
    }

    async fn write_document(
        &self,
        credential: &Credential,
        location: &RemoteLocation,
        write: &DocumentWrite,
    ) -> SyncResult<WriteReceipt> {
        let response = self
            .request(Method::PUT, self.contents_url(location), credential)
            .json(write)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: WriteResponse = response.json().await?;
            return Ok(WriteReceipt {
                version: VersionTag::new(body.content.sha),
                commit: body.commit.map(|c| c.sha),
            });
        }
        if let Some(err) = rate_limit(&response) {
            return Err(err);
        }

        let body = error_body(response).await;
        let stale = status == StatusCode::CONFLICT
            || (status == StatusCode::UNPROCESSABLE_ENTITY && body.mentions("sha"));
        if stale {
            warn!("Write to {} rejected as stale: {}", location, body.describe());
            return Err(SyncError::VersionConflict {
                path: location.path.clone(),
                expected: write.sha.as_ref().map(|v| v.to_string()),
                found: None,
            });
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(SyncError::AuthFailure {
                status: status.as_u16(),
                message: body.describe(),
            });
        }
        Err(SyncError::Api {
            status: status.as_u16(),
            message: body.describe(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::Committer;
    use axum::extract::{Path, State};
    use axum::http::HeaderMap;
    use axum::response::{IntoResponse, Response as AxumResponse};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    const GOOD_TOKEN: &str = "ghp_good";

    /// State of the fake GitHub server
    #[derive(Default)]
    struct Fake {
        headers: Vec<HeaderMap>,
        repo_exists: bool,
        /// (sha, base64 content)
        file: Option<(String, String)>,
        last_put: Option<Value>,
        writes: usize,
        /// Answer `/user` with 403 and this `x-ratelimit-remaining` value
        user_forbidden: Option<&'static str>,
    }

    type Shared = Arc<Mutex<Fake>>;
    type Reply = (axum::http::StatusCode, Json<Value>);

    fn reply(status: u16, body: Value) -> Reply {
        (axum::http::StatusCode::from_u16(status).unwrap(), Json(body))
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {}", GOOD_TOKEN))
    }

    async fn user(State(fake): State<Shared>, headers: HeaderMap) -> AxumResponse {
        let ok = authorized(&headers);
        let mut fake = fake.lock().unwrap();
        fake.headers.push(headers);
        if let Some(remaining) = fake.user_forbidden {
            return (
                axum::http::StatusCode::FORBIDDEN,
                [
                    ("x-ratelimit-remaining", remaining),
                    ("x-ratelimit-reset", "1790000000"),
                ],
                Json(json!({"message": "API rate limit exceeded for user ID 1."})),
            )
                .into_response();
        }
        if !ok {
            return reply(401, json!({"message": "Bad credentials"})).into_response();
        }
        reply(
            200,
            json!({"login": "octocat", "name": "The Octocat", "email": "octocat@example.com"}),
        )
        .into_response()
    }

    async fn create_repo(
        State(fake): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Reply {
        let mut fake = fake.lock().unwrap();
        fake.headers.push(headers);
        if body["name"] == "forbidden" {
            return reply(
                403,
                json!({"message": "Resource not accessible by personal access token"}),
            );
        }
        if fake.repo_exists {
            return reply(
                422,
                json!({
                    "message": "Repository creation failed.",
                    "errors": [{
                        "resource": "Repository",
                        "code": "custom",
                        "field": "name",
                        "message": "name already exists on this account"
                    }]
                }),
            );
        }
        fake.repo_exists = true;
        reply(201, json!({"name": body["name"], "private": body["private"]}))
    }

    async fn get_file(
        State(fake): State<Shared>,
        headers: HeaderMap,
        Path((_owner, _repo, path)): Path<(String, String, String)>,
    ) -> Reply {
        let mut fake = fake.lock().unwrap();
        fake.headers.push(headers);
        match &fake.file {
            None => reply(404, json!({"message": "Not Found"})),
            Some((sha, content)) => {
                // GitHub splits base64 content across lines
                let wrapped = content
                    .as_bytes()
                    .chunks(8)
                    .map(|c| std::str::from_utf8(c).unwrap())
                    .collect::<Vec<_>>()
                    .join("\n");
                reply(
                    200,
                    json!({"path": path, "sha": sha, "content": wrapped, "encoding": "base64"}),
                )
            }
        }
    }

    async fn put_file(
        State(fake): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Reply {
        let mut fake = fake.lock().unwrap();
        fake.headers.push(headers);
        fake.last_put = Some(body.clone());

        let current = fake.file.as_ref().map(|(sha, _)| sha.clone());
        let supplied = body.get("sha").and_then(|s| s.as_str()).map(str::to_string);
        match (&current, &supplied) {
            (Some(_), None) => {
                return reply(422, json!({"message": "Invalid request.\n\n\"sha\" wasn't supplied."}))
            }
            (Some(cur), Some(sup)) if cur != sup => {
                return reply(409, json!({"message": format!("data.json does not match {}", sup)}))
            }
            _ => {}
        }

        fake.writes += 1;
        let sha = format!("sha-{}", fake.writes);
        let content = body["content"].as_str().unwrap_or_default().to_string();
        fake.file = Some((sha.clone(), content));
        reply(
            if current.is_some() { 200 } else { 201 },
            json!({"content": {"sha": sha}, "commit": {"sha": format!("commit-{}", fake.writes)}}),
        )
    }

    async fn spawn_fake(fake: Shared) -> String {
        let app = Router::new()
            .route("/user", get(user))
            .route("/user/repos", post(create_repo))
            .route(
                "/repos/:owner/:repo/contents/*path",
                get(get_file).put(put_file),
            )
            .with_state(fake);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str) -> GithubClient {
        GithubClient::new(base_url, "2022-11-28", Duration::from_secs(5)).unwrap()
    }

    fn good() -> Credential {
        Credential::new(GOOD_TOKEN).unwrap()
    }

    fn location() -> RemoteLocation {
        RemoteLocation {
            owner: "octocat".to_string(),
            repository: "drawsync-data".to_string(),
            path: "data.json".to_string(),
        }
    }

    fn create_request(name: &str) -> CreateContainer {
        CreateContainer {
            name: name.to_string(),
            description: "Automatically created by drawsync".to_string(),
            private: true,
            is_template: false,
        }
    }

    #[tokio::test]
    async fn test_requests_carry_required_headers() {
        let fake = Shared::default();
        let base = spawn_fake(fake.clone()).await;

        let user = client(&base).current_user(&good()).await.unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.email.as_deref(), Some("octocat@example.com"));

        let fake = fake.lock().unwrap();
        let headers = &fake.headers[0];
        assert_eq!(headers["accept"], "application/vnd.github+json");
        assert_eq!(headers["authorization"], "Bearer ghp_good");
        assert_eq!(headers["x-github-api-version"], "2022-11-28");
        assert!(headers["user-agent"]
            .to_str()
            .unwrap()
            .starts_with("drawsync/"));
    }

    #[tokio::test]
    async fn test_bad_credentials_map_to_auth_failure() {
        let base = spawn_fake(Shared::default()).await;
        let bad = Credential::new("ghp_expired").unwrap();

        let err = client(&base).current_user(&bad).await.unwrap_err();
        match err {
            SyncError::AuthFailure { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Bad credentials");
            }
            other => panic!("expected AuthFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_existing_repository_is_success() {
        let fake = Shared::default();
        let base = spawn_fake(fake.clone()).await;
        let client = client(&base);

        let first = client
            .create_container(&good(), &create_request("drawsync-data"))
            .await
            .unwrap();
        let second = client
            .create_container(&good(), &create_request("drawsync-data"))
            .await
            .unwrap();

        assert_eq!(first, ContainerStatus::Created);
        assert_eq!(second, ContainerStatus::AlreadyExists);
    }

    #[tokio::test]
    async fn test_other_create_failures_are_reported() {
        let base = spawn_fake(Shared::default()).await;

        let err = client(&base)
            .create_container(&good(), &create_request("forbidden"))
            .await
            .unwrap_err();
        match err {
            SyncError::ContainerCreateFailure {
                repository, status, ..
            } => {
                assert_eq!(repository, "forbidden");
                assert_eq!(status, 403);
            }
            other => panic!("expected ContainerCreateFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let base = spawn_fake(Shared::default()).await;

        let file = client(&base)
            .fetch_document(&good(), &location())
            .await
            .unwrap();
        assert!(file.is_none());
    }

    #[tokio::test]
    async fn test_fetch_returns_version_and_content() {
        let fake = Shared::default();
        fake.lock().unwrap().file = Some(("abc123".to_string(), "eyJzaGFwZXMiOltdfQ==".to_string()));
        let base = spawn_fake(fake).await;

        let file = client(&base)
            .fetch_document(&good(), &location())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.sha, VersionTag::new("abc123"));
        assert_eq!(file.encoding.as_deref(), Some("base64"));

        let doc = crate::document::decode_content(&file.content).unwrap();
        assert_eq!(doc.as_str(), r#"{"shapes":[]}"#);
    }

    #[tokio::test]
    async fn test_write_sends_sha_and_committer() {
        let fake = Shared::default();
        fake.lock().unwrap().file = Some(("sha-0".to_string(), "e30=".to_string()));
        let base = spawn_fake(fake.clone()).await;

        let write = DocumentWrite {
            message: "Synced at 2026-01-01T00:00:00Z".to_string(),
            content: "eyJzaGFwZXMiOltdfQ==".to_string(),
            sha: Some(VersionTag::new("sha-0")),
            committer: Some(Committer {
                name: "The Octocat".to_string(),
                email: "octocat@example.com".to_string(),
            }),
        };
        let receipt = client(&base)
            .write_document(&good(), &location(), &write)
            .await
            .unwrap();

        assert_eq!(receipt.version, VersionTag::new("sha-1"));
        assert_eq!(receipt.commit.as_deref(), Some("commit-1"));

        let fake = fake.lock().unwrap();
        let body = fake.last_put.as_ref().unwrap();
        assert_eq!(body["sha"], "sha-0");
        assert_eq!(body["content"], "eyJzaGFwZXMiOltdfQ==");
        assert_eq!(body["committer"]["email"], "octocat@example.com");
        assert!(body["message"].as_str().unwrap().starts_with("Synced at "));
    }

    #[tokio::test]
    async fn test_stale_sha_maps_to_version_conflict() {
        let fake = Shared::default();
        fake.lock().unwrap().file = Some(("sha-9".to_string(), "e30=".to_string()));
        let base = spawn_fake(fake).await;
        let client = client(&base);

        let mut write = DocumentWrite {
            message: "m".to_string(),
            content: "e30=".to_string(),
            sha: Some(VersionTag::new("sha-old")),
            committer: None,
        };
        let err = client
            .write_document(&good(), &location(), &write)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::VersionConflict { .. }));

        // Creating over an existing file is rejected the same way
        write.sha = None;
        let err = client
            .write_document(&good(), &location(), &write)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::VersionConflict { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr))
            .current_user(&good())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::TransportError(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_exhausted_rate_limit_is_retryable() {
        let fake = Shared::default();
        fake.lock().unwrap().user_forbidden = Some("0");
        let base = spawn_fake(fake).await;

        let err = client(&base).current_user(&good()).await.unwrap_err();
        match &err {
            SyncError::RateLimited { status, resets_at } => {
                assert_eq!(*status, 403);
                assert_eq!(resets_at.as_deref(), Some("2026-09-21T14:13:20Z"));
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_forbidden_with_quota_left_is_auth_failure() {
        let fake = Shared::default();
        fake.lock().unwrap().user_forbidden = Some("4999");
        let base = spawn_fake(fake).await;

        let err = client(&base).current_user(&good()).await.unwrap_err();
        assert!(matches!(err, SyncError::AuthFailure { status: 403, .. }));
    }

    #[test]
    fn test_contents_url() {
        let client = client("https://api.github.com");
        let mut location = location();
        assert_eq!(
            client.contents_url(&location).as_str(),
            "https://api.github.com/repos/octocat/drawsync-data/contents/data.json"
        );
        location.path = "/boards/main.json".to_string();
        assert_eq!(
            client.contents_url(&location).path(),
            "/repos/octocat/drawsync-data/contents/boards/main.json"
        );
    }

    #[test]
    fn test_contents_url_encodes_reserved_characters() {
        let client = client("https://api.github.com");
        let mut location = location();
        location.path = "boards/q1#draft.json".to_string();

        let request = client
            .request(Method::PUT, client.contents_url(&location), &good())
            .build()
            .unwrap();
        assert_eq!(
            request.url().path(),
            "/repos/octocat/drawsync-data/contents/boards/q1%23draft.json"
        );
        assert_eq!(request.url().fragment(), None);

        location.path = "what?/100%.json".to_string();
        let url = client.contents_url(&location);
        assert_eq!(
            url.path(),
            "/repos/octocat/drawsync-data/contents/what%3F/100%25.json"
        );
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("https://github.example.com/api/v3/");
        assert_eq!(
            client.endpoint(["user", "repos"]).as_str(),
            "https://github.example.com/api/v3/user/repos"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err =
            GithubClient::new("not a url", "2022-11-28", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, SyncError::TransportError(_)));
    }

    #[test]
    fn test_error_body_describe() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"message":"Repository creation failed.","errors":[{"code":"custom","message":"name already exists on this account"}]}"#,
        )
        .unwrap();
        assert!(body.mentions("already exists"));
        assert_eq!(
            body.describe(),
            "Repository creation failed. (name already exists on this account)"
        );
        assert_eq!(ErrorBody::default().describe(), "no details");
    }
}
