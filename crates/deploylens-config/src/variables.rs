//! Variable interpolation for configuration values.
//!
//! Supports `${env.VAR_NAME}`, resolved from the process environment (or an
//! explicit map in tests). Unknown variables are an error rather than being
//! left in place, so a token never silently becomes the literal `${...}`.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::{ConfigError, ConfigResult};

// Regex for matching ${...} variables
static VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)?)\}").unwrap()
});

/// Values available for interpolation.
#[derive(Debug, Clone, Default)]
pub struct VariableContext {
    pub env: HashMap<String, String>,
}

impl VariableContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    pub fn from_process_env() -> Self {
        Self {
            env: std::env::vars().collect(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn resolve(&self, var_name: &str) -> Option<String> {
        let (scope, name) = var_name.split_once('.')?;
        match scope {
            "env" => self.env.get(name).cloned(),
            _ => None,
        }
    }

    /// Replace every `${...}` reference in `input`.
    pub fn interpolate(&self, input: &str) -> ConfigResult<String> {
        let mut missing = None;
        let result = VAR_REGEX.replace_all(input, |caps: &regex::Captures| {
            let var_name = &caps[1];
            self.resolve(var_name).unwrap_or_else(|| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        match missing {
            Some(name) => Err(ConfigError::UnresolvedVariable(name)),
            None => Ok(result.into_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_variables() {
        let ctx = VariableContext::new()
            .with_env("MY_VAR", "hello")
            .with_env("ANOTHER", "world");

        let result = ctx.interpolate("${env.MY_VAR} ${env.ANOTHER}!").unwrap();
        assert_eq!(result, "hello world!");
    }

    #[test]
    fn test_plain_value_unchanged() {
        let ctx = VariableContext::new();
        assert_eq!(ctx.interpolate("tok_abc").unwrap(), "tok_abc");
    }

    #[test]
    fn test_unknown_variable_is_error() {
        let ctx = VariableContext::new();
        let err = ctx.interpolate("${env.VERCEL_TOKEN}").unwrap_err();
        assert!(matches!(err, ConfigError::UnresolvedVariable(name) if name == "env.VERCEL_TOKEN"));
    }

    #[test]
    fn test_unknown_scope_is_error() {
        let ctx = VariableContext::new().with_env("X", "1");
        assert!(ctx.interpolate("${git.sha}").is_err());
    }
}
