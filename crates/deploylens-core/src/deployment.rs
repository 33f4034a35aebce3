//! Deployment and domain types.
//!
//! These are the normalized shapes produced at the API boundary. Nothing in
//! this crate inspects raw platform JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DeploymentId;
use crate::display::StatusClass;

/// Epoch values above this are milliseconds, anything else is seconds.
/// 10^12 ms falls in September 2001.
pub const MILLIS_THRESHOLD: f64 = 1_000_000_000_000.0;

/// Creation instant exactly as the platform reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedAt {
    /// Epoch seconds or epoch milliseconds.
    Epoch(f64),
    /// ISO-8601 / RFC 3339 timestamp.
    Iso(String),
}

impl CreatedAt {
    /// Zero and the empty string mean the platform sent no timestamp.
    pub fn is_unset(&self) -> bool {
        match self {
            CreatedAt::Epoch(value) => *value == 0.0,
            CreatedAt::Iso(text) => text.trim().is_empty(),
        }
    }

    /// Resolve to an instant. Returns `None` for unparseable strings and
    /// out-of-range numbers.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            CreatedAt::Epoch(value) if !value.is_finite() => None,
            CreatedAt::Epoch(value) if *value > MILLIS_THRESHOLD => {
                DateTime::from_timestamp_millis(*value as i64)
            }
            CreatedAt::Epoch(value) => DateTime::from_timestamp_millis((*value * 1000.0) as i64),
            CreatedAt::Iso(text) => DateTime::parse_from_rfc3339(text.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl From<DateTime<Utc>> for CreatedAt {
    fn from(instant: DateTime<Utc>) -> Self {
        CreatedAt::Epoch(instant.timestamp_millis() as f64)
    }
}

/// A deployment as fetched from the platform. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: DeploymentId,
    /// Owning project, when the platform reports one.
    pub project_id: Option<String>,
    /// Project name as shown to the user.
    pub name: Option<String>,
    /// Platform default host, usually `<name>-<hash>.vercel.app`.
    pub url: Option<String>,
    /// Raw status string (`READY`, `BUILDING`, ...), `UNKNOWN` when absent.
    pub status: String,
    pub created_at: Option<CreatedAt>,
}

impl Deployment {
    /// Join key for domain lookups: `project_id`, falling back to `name`.
    pub fn project_key(&self) -> Option<&str> {
        non_empty(self.project_id.as_deref()).or_else(|| non_empty(self.name.as_deref()))
    }

    pub fn display_name(&self) -> &str {
        non_empty(self.name.as_deref()).unwrap_or("Unknown Project")
    }

    /// Lower-cased raw status, used as the visible label.
    pub fn status_label(&self) -> String {
        self.status.to_lowercase()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A domain bound to a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// True when the domain is not one of the platform's reserved subdomains.
    pub fn is_custom(&self, platform_suffix: &str) -> bool {
        !self.name.trim().is_empty() && !crate::url::is_platform_host(&self.name, platform_suffix)
    }
}

/// A deployment with its canonical URL and display fields resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedDeployment {
    #[serde(flatten)]
    pub deployment: Deployment,
    pub canonical_url: String,
    pub status_class: StatusClass,
    pub relative_age: String,
}
