//! HTTP transport seam.

use async_trait::async_trait;
use deploylens_core::{Credential, Error, Result};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;
use url::Url;

/// A GET request against the platform API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Path relative to the API base, without a leading slash.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub credential: Credential,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>, credential: &Credential) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            credential: credential.clone(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds `teamId` when a team scope is configured.
    pub fn with_team(self, team_id: Option<&str>) -> Self {
        match team_id {
            Some(team) => self.with_query("teamId", team),
            None => self,
        }
    }
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Issues requests to the platform API.
///
/// Implementations return `Error::Transport` only when no response was
/// received. Non-success statuses are returned as responses for the caller
/// to classify.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Transport name for logging.
    fn name(&self) -> &'static str;

    async fn get(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(api_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(api_url)
            .map_err(|e| Error::Transport(format!("invalid API URL '{}': {}", api_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("deploylens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&request.path)
            .map_err(|e| Error::Transport(format!("invalid request path: {}", e)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn get(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request)?;
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, request.credential.bearer())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> Credential {
        Credential::new("tok").unwrap()
    }

    #[test]
    fn test_url_for_joins_path_and_query() {
        let transport = HttpTransport::new("https://api.vercel.com").unwrap();
        let request = ApiRequest::new("v6/deployments", &credential()).with_query("limit", "20");
        let url = transport.url_for(&request).unwrap();
        assert_eq!(url.as_str(), "https://api.vercel.com/v6/deployments?limit=20");
    }

    #[test]
    fn test_url_for_keeps_base_path() {
        let transport = HttpTransport::new("http://localhost:8080/proxy").unwrap();
        let request = ApiRequest::new("v9/projects/prj_1/domains", &credential())
            .with_team(Some("team_1"));
        let url = transport.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/proxy/v9/projects/prj_1/domains?teamId=team_1"
        );
    }

    #[test]
    fn test_url_without_query_has_no_question_mark() {
        let transport = HttpTransport::new("https://api.vercel.com").unwrap();
        let url = transport
            .url_for(&ApiRequest::new("v6/deployments", &credential()))
            .unwrap();
        assert!(!url.as_str().contains('?'));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpTransport::new("not a url").err().unwrap();
        assert!(matches!(err, Error::Transport(_)));
    }
}
