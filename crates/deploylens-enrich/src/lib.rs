//! Deployment enrichment for deploylens.
//!
//! Fetches recent deployments, resolves each project's custom domains
//! concurrently and attaches a canonical URL, status class and relative age.

pub mod pipeline;

pub use pipeline::{EnrichmentPipeline, enrich_deployments, project_keys};
