//! Core domain types for deploylens.
//!
//! This crate contains:
//! - Deployment, domain and enriched deployment types
//! - The error taxonomy shared by the client and pipeline crates
//! - Canonical URL selection
//! - Display formatting (status class, relative age)

pub mod deployment;
pub mod display;
pub mod error;
pub mod id;
pub mod url;

pub use deployment::{CreatedAt, Deployment, Domain, EnrichedDeployment};
pub use display::{StatusClass, relative_age, status_class};
pub use error::{Error, Result};
pub use id::{Credential, DeploymentId};
pub use url::{DEFAULT_PLATFORM_SUFFIX, select_url};
