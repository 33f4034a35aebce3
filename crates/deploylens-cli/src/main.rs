//! deploylens CLI tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "deploylens")]
#[command(about = "Recent deployments with their canonical URLs", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, env = "DEPLOYLENS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// API token, overrides the configured one
    #[arg(long, env = "VERCEL_TOKEN", hide_env_values = true, global = true)]
    api_token: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recent deployments
    List {
        /// Print the enriched list as JSON
        #[arg(long)]
        json: bool,
        /// Number of deployments to request (1-100)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Store an API token in the configuration file
    Login {
        /// API token
        #[arg(long)]
        token: String,
    },
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file (defaults to --config)
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .unwrap_or_else(deploylens_config::default_config_path);

    match cli.command {
        Commands::List { json, limit } => {
            commands::list(&config_path, cli.api_token, json, limit).await?;
        }
        Commands::Login { token } => {
            commands::login(&config_path, &token)?;
        }
        Commands::Validate { path } => {
            commands::validate(path.as_deref().unwrap_or(config_path.as_path()))?;
        }
    }

    Ok(())
}
