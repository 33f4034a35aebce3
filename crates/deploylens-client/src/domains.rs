//! Per-project domain lookup with a session-scoped cache.
//!
//! Lookups never fail. Any error (404, other statuses, network, bad body)
//! degrades to "no custom domains": an empty list is returned and cached, so
//! a broken project cannot block the deployment list. The outcome is reported
//! through [`DomainLookup`].

use deploylens_core::{Credential, Domain};
use futures::future::join_all;
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::transport::{ApiRequest, ApiTransport};
use crate::wire;

/// Outcome of a single project's domain lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainLookup {
    /// Served from the cache, no request made.
    Cached(Vec<Domain>),
    /// Fetched from the platform and cached.
    Fetched(Vec<Domain>),
    /// The request failed; an empty list was cached in its place.
    Degraded { reason: String },
}

impl DomainLookup {
    pub fn is_degraded(&self) -> bool {
        matches!(self, DomainLookup::Degraded { .. })
    }

    pub fn into_domains(self) -> Vec<Domain> {
        match self {
            DomainLookup::Cached(domains) | DomainLookup::Fetched(domains) => domains,
            DomainLookup::Degraded { .. } => Vec::new(),
        }
    }
}

/// Resolves the domains bound to a project.
///
/// The cache lives as long as the resolver. Entries, empty ones included,
/// are never re-fetched; build a new resolver to start over.
pub struct DomainResolver {
    transport: Arc<dyn ApiTransport>,
    team_id: Option<String>,
    cache: RwLock<HashMap<String, Vec<Domain>>>,
}

impl DomainResolver {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            transport,
            team_id: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_team(mut self, team_id: Option<String>) -> Self {
        self.team_id = team_id;
        self
    }

    /// Look up `project_key`, reporting where the answer came from.
    pub async fn lookup(&self, credential: &Credential, project_key: &str) -> DomainLookup {
        let cached = self.cache.read().await.get(project_key).cloned();
        if let Some(domains) = cached {
            debug!(project = project_key, "domain cache hit");
            return DomainLookup::Cached(domains);
        }

        debug!(project = project_key, "domain cache miss");
        let (entry, lookup) = match self.fetch(credential, project_key).await {
            Ok(domains) => (domains.clone(), DomainLookup::Fetched(domains)),
            Err(reason) => (Vec::new(), DomainLookup::Degraded { reason }),
        };

        self.cache
            .write()
            .await
            .insert(project_key.to_string(), entry);
        lookup
    }

    /// Domains bound to `project_key`, in platform order. Empty on any failure.
    pub async fn resolve_domains(&self, credential: &Credential, project_key: &str) -> Vec<Domain> {
        self.lookup(credential, project_key).await.into_domains()
    }

    /// Resolve every distinct key concurrently and wait for all of them.
    pub async fn resolve_domains_batch<'a, I>(
        &self,
        credential: &Credential,
        project_keys: I,
    ) -> HashMap<String, Vec<Domain>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = project_keys
            .into_iter()
            .filter(|key| seen.insert(*key))
            .collect();

        let results = join_all(
            unique
                .iter()
                .map(|key| self.resolve_domains(credential, key)),
        )
        .await;

        unique
            .into_iter()
            .map(String::from)
            .zip(results)
            .collect()
    }

    /// Cached entry for `project_key`, if any.
    pub async fn cached(&self, project_key: &str) -> Option<Vec<Domain>> {
        self.cache.read().await.get(project_key).cloned()
    }

    pub async fn cache_len(&self) -> usize {
        self.cache.read().await.len()
    }

    async fn fetch(
        &self,
        credential: &Credential,
        project_key: &str,
    ) -> std::result::Result<Vec<Domain>, String> {
        let path = format!("v9/projects/{}/domains", urlencoding::encode(project_key));
        let request = ApiRequest::new(path, credential).with_team(self.team_id.as_deref());

        let response = match self.transport.get(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(project = project_key, error = %e, "domain lookup failed");
                return Err(e.to_string());
            }
        };

        if response.status == StatusCode::NOT_FOUND {
            debug!(project = project_key, "project not found, no custom domains");
            return Err("project not found".to_string());
        }
        if !response.status.is_success() {
            warn!(project = project_key, status = %response.status, "domain lookup failed");
            return Err(format!("HTTP {}", response.status));
        }

        wire::parse_domains(&response.body).map_err(|e| {
            warn!(project = project_key, error = %e, "invalid domains response");
            format!("invalid response body: {}", e)
        })
    }
}
