//! CLI command implementations.

use anyhow::{Context, Result, bail};
use deploylens_client::{ApiTransport, DeploymentFetcher, DomainResolver, HttpTransport};
use deploylens_config::{ClientConfig, ConfigOverrides, VariableContext};
use deploylens_core::Credential;
use deploylens_enrich::EnrichmentPipeline;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::render;

const NOT_CONFIGURED: &str =
    "No API token found. Run `deploylens login --token <TOKEN>` or set VERCEL_TOKEN";

/// Fetch, enrich and print recent deployments.
pub async fn list(
    config_path: &Path,
    api_token: Option<String>,
    json: bool,
    limit: Option<u32>,
) -> Result<()> {
    let vars = VariableContext::from_process_env();
    let overrides = ConfigOverrides {
        token: api_token,
        limit,
    };
    let config = deploylens_config::load_config(config_path, &vars, &overrides)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;
    debug!(path = %config_path.display(), api_url = %config.api_url, "loaded config");

    let credential = credential(&config)?;

    let transport: Arc<dyn ApiTransport> =
        Arc::new(HttpTransport::new(&config.api_url).context("Invalid api-url")?);
    let pipeline = build_pipeline(&config, transport);

    let deployments = match pipeline.enrich(&credential).await {
        Ok(deployments) => deployments,
        Err(e) if e.is_auth() => {
            bail!("{}. Run `deploylens login --token <TOKEN>` to reconfigure", e)
        }
        Err(e) => return Err(e).context("Could not load deployments, try again"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&deployments)?);
    } else {
        print!("{}", render::render_table(&deployments));
    }
    Ok(())
}

/// Persist `token` to the configuration file.
pub fn login(config_path: &Path, token: &str) -> Result<()> {
    if Credential::new(token).is_none() {
        bail!("Please enter an API token");
    }
    deploylens_config::store_token(config_path, token)
        .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
    println!("Token saved to {}", config_path.display());
    Ok(())
}

pub fn validate(path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    match deploylens_config::parse_config(&content, &VariableContext::from_process_env()) {
        Ok(config) => {
            println!("Configuration is valid");
            println!("  api-url: {}", config.api_url);
            println!("  limit: {}", config.limit);
            println!(
                "  token: {}",
                if config.token.is_some() { "set" } else { "not set" }
            );
            Ok(())
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

/// The configured token, or the "not configured" error.
fn credential(config: &ClientConfig) -> Result<Credential> {
    match config.token.clone().and_then(Credential::new) {
        Some(credential) => Ok(credential),
        None => bail!(NOT_CONFIGURED),
    }
}

fn build_pipeline(config: &ClientConfig, transport: Arc<dyn ApiTransport>) -> EnrichmentPipeline {
    let fetcher =
        DeploymentFetcher::new(transport.clone(), config.limit).with_team(config.team_id.clone());
    let resolver = Arc::new(DomainResolver::new(transport).with_team(config.team_id.clone()));
    EnrichmentPipeline::new(fetcher, resolver).with_platform_suffix(config.platform_suffix.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploylens_config::parse_config_with;

    fn config(kdl: &str, api_token: Option<&str>) -> ClientConfig {
        let overrides = ConfigOverrides {
            token: api_token.map(String::from),
            limit: None,
        };
        parse_config_with(kdl, &VariableContext::new(), &overrides).unwrap()
    }

    #[test]
    fn test_no_token_is_not_configured() {
        let err = credential(&config("", None)).unwrap_err();
        assert_eq!(err.to_string(), NOT_CONFIGURED);
    }

    #[test]
    fn test_blank_token_is_not_configured() {
        let err = credential(&config(r#"token "   ""#, Some(" "))).unwrap_err();
        assert_eq!(err.to_string(), NOT_CONFIGURED);
    }

    #[test]
    fn test_flag_overrides_config_token() {
        let cred = credential(&config(r#"token "tok_file""#, Some("tok_flag"))).unwrap();
        assert_eq!(cred.bearer(), "Bearer tok_flag");

        let from_file = credential(&config(r#"token "tok_file""#, None)).unwrap();
        assert_eq!(from_file.bearer(), "Bearer tok_file");
    }

    #[test]
    fn test_flag_token_with_unset_env_reference() {
        let cred = credential(&config(r#"token "${env.VERCEL_TOKEN}""#, Some("tok_flag"))).unwrap();
        assert_eq!(cred.bearer(), "Bearer tok_flag");
    }
}
