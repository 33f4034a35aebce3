//! KDL configuration parsing for deploylens.
//!
//! This crate handles:
//! - The client configuration file (deploylens.kdl)
//! - `${env.NAME}` interpolation in configuration values
//! - Persisting the API token

pub mod client;
pub mod error;
pub mod variables;

pub use client::{
    ClientConfig, ConfigOverrides, default_config_path, load_config, parse_config,
    parse_config_with, store_token,
};
pub use error::{ConfigError, ConfigResult};
pub use variables::VariableContext;
