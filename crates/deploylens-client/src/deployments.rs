//! Recent-deployments fetch.

use deploylens_core::{Credential, Deployment, Error, Result};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::transport::{ApiRequest, ApiTransport};
use crate::wire;

pub const DEPLOYMENTS_PATH: &str = "v6/deployments";

/// Fetches the most recent deployments, newest first.
pub struct DeploymentFetcher {
    transport: Arc<dyn ApiTransport>,
    limit: u32,
    team_id: Option<String>,
}

impl DeploymentFetcher {
    pub fn new(transport: Arc<dyn ApiTransport>, limit: u32) -> Self {
        Self {
            transport,
            limit,
            team_id: None,
        }
    }

    pub fn with_team(mut self, team_id: Option<String>) -> Self {
        self.team_id = team_id;
        self
    }

    /// Single attempt, no retries.
    ///
    /// Returns `Error::Auth` for 401/403 and `Error::Transport` for every
    /// other failure.
    pub async fn fetch_deployments(&self, credential: &Credential) -> Result<Vec<Deployment>> {
        let request = ApiRequest::new(DEPLOYMENTS_PATH, credential)
            .with_query("limit", self.limit.to_string())
            .with_team(self.team_id.as_deref());

        let response = self.transport.get(request).await?;

        match response.status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(status = %response.status, "deployments request rejected credential");
                return Err(Error::Auth(
                    "please check the token in your configuration".to_string(),
                ));
            }
            status if !status.is_success() => {
                return Err(Error::Transport(format!("HTTP {}", status)));
            }
            _ => {}
        }

        let deployments = wire::parse_deployments(&response.body)
            .map_err(|e| Error::Transport(format!("invalid response body: {}", e)))?;

        debug!(
            transport = self.transport.name(),
            count = deployments.len(),
            "fetched deployments"
        );
        Ok(deployments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ApiResponse;
    use std::sync::Mutex;

    struct MockTransport {
        response: Result<ApiResponse>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl MockTransport {
        fn respond(status: StatusCode, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(ApiResponse::new(status, body)),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn fail(message: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Err(Error::Transport(message.to_string())),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl ApiTransport for MockTransport {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn get(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.requests.lock().unwrap().push(request);
            match &self.response {
                Ok(response) => Ok(response.clone()),
                Err(e) => Err(Error::Transport(e.to_string())),
            }
        }
    }

    fn credential() -> Credential {
        Credential::new("tok").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_limit_and_team() {
        let transport = MockTransport::respond(StatusCode::OK, r#"{"deployments":[]}"#);
        let fetcher = DeploymentFetcher::new(transport.clone(), 20)
            .with_team(Some("team_1".to_string()));

        let deployments = fetcher.fetch_deployments(&credential()).await.unwrap();
        assert!(deployments.is_empty());

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "v6/deployments");
        assert_eq!(
            requests[0].query,
            vec![
                ("limit".to_string(), "20".to_string()),
                ("teamId".to_string(), "team_1".to_string())
            ]
        );
        assert_eq!(requests[0].credential, credential());
    }

    #[tokio::test]
    async fn test_fetch_preserves_api_order() {
        let body = r#"{"deployments":[
            {"uid":"dpl_3","name":"c"},
            {"uid":"dpl_2","name":"b"},
            {"uid":"dpl_1","name":"a"}
        ]}"#;
        let fetcher = DeploymentFetcher::new(MockTransport::respond(StatusCode::OK, body), 20);

        let ids: Vec<String> = fetcher
            .fetch_deployments(&credential())
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id.to_string())
            .collect();
        assert_eq!(ids, vec!["dpl_3", "dpl_2", "dpl_1"]);
    }

    #[tokio::test]
    async fn test_unauthorized_and_forbidden_are_auth_errors() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let fetcher = DeploymentFetcher::new(MockTransport::respond(status, "{}"), 20);
            let err = fetcher.fetch_deployments(&credential()).await.unwrap_err();
            assert!(err.is_auth(), "{} should be an auth error", status);
        }
    }

    #[tokio::test]
    async fn test_server_error_is_transport_error() {
        let fetcher = DeploymentFetcher::new(
            MockTransport::respond(StatusCode::INTERNAL_SERVER_ERROR, "oops"),
            20,
        );
        let err = fetcher.fetch_deployments(&credential()).await.unwrap_err();
        assert!(matches!(&err, Error::Transport(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_not_found_is_transport_error() {
        let fetcher =
            DeploymentFetcher::new(MockTransport::respond(StatusCode::NOT_FOUND, "{}"), 20);
        let err = fetcher.fetch_deployments(&credential()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_network_failure_is_transport_error() {
        let fetcher = DeploymentFetcher::new(MockTransport::fail("connection refused"), 20);
        let err = fetcher.fetch_deployments(&credential()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_error() {
        let fetcher =
            DeploymentFetcher::new(MockTransport::respond(StatusCode::OK, "not json"), 20);
        let err = fetcher.fetch_deployments(&credential()).await.unwrap_err();
        assert!(matches!(&err, Error::Transport(msg) if msg.contains("invalid response body")));
    }
}
