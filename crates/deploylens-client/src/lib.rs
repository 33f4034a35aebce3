//! Deployment platform API client for deploylens.
//!
//! Provides:
//! - The `ApiTransport` seam and its reqwest-backed implementation
//! - Wire-format parsing into normalized core types
//! - `DeploymentFetcher` for the recent-deployments list
//! - `DomainResolver`, a caching per-project domain lookup

pub mod deployments;
pub mod domains;
pub mod transport;
pub mod wire;

pub use deployments::DeploymentFetcher;
pub use domains::{DomainLookup, DomainResolver};
pub use transport::{ApiRequest, ApiResponse, ApiTransport, HttpTransport};
