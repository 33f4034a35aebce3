//! Platform response shapes and their conversion into core types.
//!
//! Anything shape-dependent (`uid` vs `id`, `readyState` vs `state`, domains
//! as bare strings or objects) is settled here.

use deploylens_core::{CreatedAt, Deployment, DeploymentId, Domain};
use serde::Deserialize;

const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Body of `GET /v6/deployments`.
#[derive(Debug, Deserialize)]
pub struct DeploymentsResponse {
    #[serde(default)]
    pub deployments: Vec<DeploymentRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub uid: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub project_id: Option<String>,
    pub url: Option<String>,
    pub ready_state: Option<String>,
    pub state: Option<String>,
    pub created_at: Option<CreatedAt>,
}

impl From<DeploymentRecord> for Deployment {
    fn from(record: DeploymentRecord) -> Self {
        let status = non_empty(record.ready_state)
            .or_else(|| non_empty(record.state))
            .unwrap_or_else(|| UNKNOWN_STATUS.to_string());

        Deployment {
            id: DeploymentId::new(record.id.or(record.uid).unwrap_or_default()),
            project_id: record.project_id,
            name: record.name,
            url: record.url,
            status,
            created_at: record.created_at.filter(|created_at| !created_at.is_unset()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Body of `GET /v9/projects/{project}/domains`.
#[derive(Debug, Deserialize)]
pub struct DomainsResponse {
    #[serde(default)]
    pub domains: Vec<DomainRecord>,
}

/// The platform has returned domains both as bare names and as objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DomainRecord {
    Name(String),
    Object { name: Option<String> },
}

impl DomainRecord {
    fn into_domain(self) -> Option<Domain> {
        let name = match self {
            DomainRecord::Name(name) => name,
            DomainRecord::Object { name } => name?,
        };
        let name = name.trim();
        (!name.is_empty()).then(|| Domain::new(name))
    }
}

pub fn parse_deployments(body: &str) -> serde_json::Result<Vec<Deployment>> {
    let response: DeploymentsResponse = serde_json::from_str(body)?;
    Ok(response.deployments.into_iter().map(Deployment::from).collect())
}

/// Parse a domains body, dropping records without a usable name. Order is kept.
pub fn parse_domains(body: &str) -> serde_json::Result<Vec<Domain>> {
    let response: DomainsResponse = serde_json::from_str(body)?;
    Ok(response
        .domains
        .into_iter()
        .filter_map(DomainRecord::into_domain)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deployments() {
        let body = r#"{
            "deployments": [
                {
                    "uid": "dpl_1",
                    "name": "web",
                    "projectId": "prj_1",
                    "url": "web-abc.vercel.app",
                    "readyState": "READY",
                    "state": "READY",
                    "created": 1705320000000,
                    "createdAt": 1705320000000,
                    "creator": { "uid": "usr_1" }
                },
                {
                    "id": "dpl_2",
                    "name": "api",
                    "state": "BUILDING",
                    "createdAt": "2024-01-15T12:00:00Z"
                }
            ],
            "pagination": { "count": 2 }
        }"#;

        let deployments = parse_deployments(body).unwrap();
        assert_eq!(deployments.len(), 2);

        assert_eq!(deployments[0].id.as_str(), "dpl_1");
        assert_eq!(deployments[0].project_key(), Some("prj_1"));
        assert_eq!(deployments[0].status, "READY");
        assert_eq!(
            deployments[0].created_at,
            Some(CreatedAt::Epoch(1_705_320_000_000.0))
        );

        assert_eq!(deployments[1].id.as_str(), "dpl_2");
        assert_eq!(deployments[1].project_key(), Some("api"));
        assert_eq!(deployments[1].status, "BUILDING");
        assert!(deployments[1].url.is_none());
    }

    #[test]
    fn test_missing_status_is_unknown() {
        let deployments = parse_deployments(r#"{"deployments":[{"uid":"d"}]}"#).unwrap();
        assert_eq!(deployments[0].status, "UNKNOWN");
        assert!(deployments[0].created_at.is_none());
    }

    #[test]
    fn test_empty_ready_state_falls_through_to_state() {
        let deployments =
            parse_deployments(r#"{"deployments":[{"uid":"d","readyState":"","state":"READY"}]}"#)
                .unwrap();
        assert_eq!(deployments[0].status, "READY");

        let both_empty =
            parse_deployments(r#"{"deployments":[{"uid":"d","readyState":"","state":""}]}"#)
                .unwrap();
        assert_eq!(both_empty[0].status, "UNKNOWN");
    }

    #[test]
    fn test_zero_created_at_is_unset() {
        let deployments = parse_deployments(
            r#"{"deployments":[{"uid":"a","createdAt":0},{"uid":"b","createdAt":""}]}"#,
        )
        .unwrap();
        assert!(deployments[0].created_at.is_none());
        assert!(deployments[1].created_at.is_none());
    }

    #[test]
    fn test_missing_deployments_field_is_empty() {
        assert!(parse_deployments("{}").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_body_is_error() {
        assert!(parse_deployments("<html>").is_err());
    }

    #[test]
    fn test_parse_domains_mixed_shapes() {
        let body = r#"{
            "domains": [
                "web.vercel.app",
                { "name": "example.com", "verified": true },
                { "verified": false },
                "",
                { "name": "www.example.com" }
            ]
        }"#;

        let names: Vec<String> = parse_domains(body)
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["web.vercel.app", "example.com", "www.example.com"]);
    }
}
