//! Enrichment pipeline: fetch, resolve domains, join, format.

use chrono::{DateTime, Utc};
use deploylens_client::{DeploymentFetcher, DomainResolver};
use deploylens_core::{
    Credential, DEFAULT_PLATFORM_SUFFIX, Deployment, Domain, EnrichedDeployment, Result,
    relative_age, select_url, status_class,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Turns the platform's recent deployments into a display-ready list.
///
/// The resolver is shared, so its domain cache survives across `enrich`
/// calls made through the same pipeline (or any other holder of the `Arc`).
pub struct EnrichmentPipeline {
    fetcher: DeploymentFetcher,
    resolver: Arc<DomainResolver>,
    platform_suffix: String,
}

impl EnrichmentPipeline {
    pub fn new(fetcher: DeploymentFetcher, resolver: Arc<DomainResolver>) -> Self {
        Self {
            fetcher,
            resolver,
            platform_suffix: DEFAULT_PLATFORM_SUFFIX.to_string(),
        }
    }

    pub fn with_platform_suffix(mut self, platform_suffix: impl Into<String>) -> Self {
        self.platform_suffix = platform_suffix.into();
        self
    }

    /// Enrich the most recent deployments, ages measured from the current time.
    pub async fn enrich(&self, credential: &Credential) -> Result<Vec<EnrichedDeployment>> {
        self.enrich_at(credential, Utc::now()).await
    }

    /// Enrich with ages measured from `now`.
    ///
    /// Only the deployments fetch can fail. Domain lookups degrade to
    /// "no custom domain" per project.
    pub async fn enrich_at(
        &self,
        credential: &Credential,
        now: DateTime<Utc>,
    ) -> Result<Vec<EnrichedDeployment>> {
        let deployments = self.fetcher.fetch_deployments(credential).await?;
        if deployments.is_empty() {
            info!("no deployments");
            return Ok(Vec::new());
        }

        let keys = project_keys(&deployments);
        let domain_map = self
            .resolver
            .resolve_domains_batch(credential, keys.iter().copied())
            .await;

        let enriched = enrich_deployments(deployments, &domain_map, &self.platform_suffix, now);
        info!(
            deployments = enriched.len(),
            projects = domain_map.len(),
            "enriched deployments"
        );
        Ok(enriched)
    }
}

/// Distinct, non-empty project keys in first-seen order.
pub fn project_keys(deployments: &[Deployment]) -> Vec<&str> {
    let mut keys: Vec<&str> = Vec::new();
    for deployment in deployments {
        match deployment.project_key() {
            Some(key) if !keys.contains(&key) => keys.push(key),
            Some(_) => {}
            None => warn!(
                deployment = %deployment.id,
                "deployment has neither projectId nor name, skipping domain lookup"
            ),
        }
    }
    keys
}

/// Attach canonical URL, status class and relative age to each deployment.
///
/// Pure: order and length are preserved and no I/O happens.
pub fn enrich_deployments(
    deployments: Vec<Deployment>,
    domain_map: &HashMap<String, Vec<Domain>>,
    platform_suffix: &str,
    now: DateTime<Utc>,
) -> Vec<EnrichedDeployment> {
    deployments
        .into_iter()
        .map(|deployment| {
            let domains = deployment
                .project_key()
                .and_then(|key| domain_map.get(key))
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            let canonical_url = select_url(&deployment, domains, platform_suffix);
            let status_class = status_class(&deployment.status);
            let relative_age = match deployment.created_at.as_ref().filter(|c| !c.is_unset()) {
                Some(created_at) => relative_age(created_at, now),
                None => "just now".to_string(),
            };

            EnrichedDeployment {
                deployment,
                canonical_url,
                status_class,
                relative_age,
            }
        })
        .collect()
}
