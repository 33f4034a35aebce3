//! Client configuration parsing.
//!
//! ```kdl
//! api-url "https://api.vercel.com"
//! token "${env.VERCEL_TOKEN}"
//! limit 20
//! platform-suffix "vercel.app"
//! team-id "team_abc"
//! ```
//!
//! Every node is optional.

use deploylens_core::DEFAULT_PLATFORM_SUFFIX;
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{ConfigError, ConfigResult, VariableContext};

pub const DEFAULT_API_URL: &str = "https://api.vercel.com";
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

/// Settings for talking to the deployment platform.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the platform API.
    pub api_url: String,
    /// Bearer token, if one is configured.
    pub token: Option<String>,
    /// Number of recent deployments to request.
    pub limit: u32,
    /// Reserved suffix of the platform's default subdomains.
    pub platform_suffix: String,
    /// Team scope sent as `teamId`.
    pub team_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            limit: DEFAULT_LIMIT,
            platform_suffix: DEFAULT_PLATFORM_SUFFIX.to_string(),
            team_id: None,
        }
    }
}

/// Command-line values that take precedence over the file.
///
/// An overridden node is not interpolated, so `token "${env.VERCEL_TOKEN}"`
/// with the variable unset is fine when a token is passed explicitly.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub limit: Option<u32>,
}

impl ConfigOverrides {
    fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Parse a client configuration from KDL text.
pub fn parse_config(kdl: &str, vars: &VariableContext) -> ConfigResult<ClientConfig> {
    parse_config_with(kdl, vars, &ConfigOverrides::default())
}

/// Parse a client configuration, applying `overrides` on top of the file.
pub fn parse_config_with(
    kdl: &str,
    vars: &VariableContext,
    overrides: &ConfigOverrides,
) -> ConfigResult<ClientConfig> {
    let doc: KdlDocument = kdl.parse()?;
    let mut config = ClientConfig::default();

    for node in doc.nodes() {
        match node.name().value() {
            "api-url" | "api_url" => {
                config.api_url = required_string(node, vars)?;
            }
            "token" if overrides.token().is_some() => {}
            "token" => {
                config.token = Some(required_string(node, vars)?).filter(|t| !t.trim().is_empty());
            }
            "limit" => {
                config.limit = parse_limit(node)?;
            }
            "platform-suffix" | "platform_suffix" => {
                config.platform_suffix = required_string(node, vars)?;
            }
            "team-id" | "team_id" => {
                config.team_id = Some(required_string(node, vars)?).filter(|t| !t.is_empty());
            }
            other => debug!(node = other, "ignoring unknown config node"),
        }
    }

    if let Some(token) = overrides.token() {
        config.token = Some(token.to_string());
    }
    if let Some(limit) = overrides.limit {
        config.limit = check_limit(limit as i128)?;
    }

    if config.api_url.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "api-url".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if config.platform_suffix.trim_start_matches('.').is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "platform-suffix".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    Ok(config)
}

/// Load the configuration at `path`. A missing file yields the defaults.
pub fn load_config(
    path: &Path,
    vars: &VariableContext,
    overrides: &ConfigOverrides,
) -> ConfigResult<ClientConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config_with(&content, vars, overrides),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, using defaults");
            parse_config_with("", vars, overrides)
        }
        Err(e) => Err(e.into()),
    }
}

/// Write `token` into the configuration at `path`, keeping every other node.
pub fn store_token(path: &Path, token: &str) -> ConfigResult<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ConfigError::MissingField("token".to_string()));
    }

    let existing = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let updated = with_token(&existing, token)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, updated)?;
    Ok(())
}

fn with_token(existing: &str, token: &str) -> ConfigResult<String> {
    let mut doc: KdlDocument = existing.parse()?;
    doc.nodes_mut().retain(|node| node.name().value() != "token");

    let mut node = KdlNode::new("token");
    node.entries_mut()
        .push(KdlEntry::new(KdlValue::String(token.to_string())));
    doc.nodes_mut().push(node);

    Ok(doc.to_string())
}

/// `$DEPLOYLENS_CONFIG`, else `$HOME/.config/deploylens/deploylens.kdl`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("DEPLOYLENS_CONFIG") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("deploylens")
        .join("deploylens.kdl")
}

// Helper functions for extracting values from KDL nodes

fn get_first_arg(node: &KdlNode) -> Option<&KdlValue> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .map(|e| e.value())
}

fn required_string(node: &KdlNode, vars: &VariableContext) -> ConfigResult<String> {
    let raw = get_first_arg(node)
        .and_then(|v| v.as_string())
        .ok_or_else(|| ConfigError::MissingField(format!("{} value", node.name().value())))?;
    vars.interpolate(raw)
}

fn invalid_limit(message: String) -> ConfigError {
    ConfigError::InvalidValue {
        field: "limit".to_string(),
        message,
    }
}

fn parse_limit(node: &KdlNode) -> ConfigResult<u32> {
    let value = get_first_arg(node)
        .and_then(|v| v.as_integer())
        .ok_or_else(|| invalid_limit("expected an integer".to_string()))?;
    check_limit(value)
}

fn check_limit(value: i128) -> ConfigResult<u32> {
    if value < 1 || value > MAX_LIMIT as i128 {
        return Err(invalid_limit(format!("must be between 1 and {}", MAX_LIMIT)));
    }
    Ok(value as u32)
}
