//! Outpost CLI
//!
//! Manages remote agents in a local configuration file and drives
//! deployments on them.

pub mod actions;
pub mod config;
pub mod errors;
pub mod output;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use outpost_client::{ApiClientFactory, TransportOptions};

use actions::{deployment, remote};
use config::FileConfig;
use output::Output;

/// Outpost command-line client
#[derive(Debug, Parser)]
#[command(name = "outpost", about = "Manage deployments on remote Outpost agents", version)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, env = "OUTPOST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Remote to run deployment commands against
    #[arg(short, long)]
    pub remote: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage remote agents
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },

    /// Manage deployments on a remote
    #[command(alias = "deploy")]
    Deployment {
        #[command(subcommand)]
        command: DeploymentCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum RemoteCommands {
    /// Add a remote from a token file
    Add { name: String, token_file: PathBuf },

    /// Remove a remote
    Remove { name: String },

    /// List remotes
    List,

    /// Show a remote, its agent and its deployments
    Describe { name: String },

    /// Make a remote the active one
    Use { name: String },

    /// Print the token a remote was added with
    Token { name: String },
}

#[derive(Debug, Subcommand)]
pub enum DeploymentCommands {
    /// List deployments
    List,

    /// Show a deployment and its services
    Describe { id: String },

    /// Deploy a template
    Create {
        /// YAML or JSON template
        template: PathBuf,

        /// Template merged over the main one
        #[arg(long = "override")]
        override_path: Option<PathBuf>,
    },

    /// Redeploy a deployment from its stored template
    Redeploy { id: String },

    /// Delete a deployment and its services
    Delete { id: String },
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

/// Parse arguments from the process and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    run_with_args(Cli::parse()).await
}

pub async fn run_with_args(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.debug);

    let path = match cli.config {
        Some(path) => path,
        None => FileConfig::default_path()?,
    };
    let mut config = FileConfig::load(path)?;
    debug!("Using configuration {}", config.path().display());

    let factory = ApiClientFactory::new(TransportOptions {
        timeout: Duration::from_secs(cli.timeout),
        skip_verify: cli.insecure,
    });

    let output = match cli.command {
        Commands::Remote { command } => match command {
            RemoteCommands::Add { name, token_file } => {
                remote::add_remote_from_file(&mut config, &name, &token_file)?
            }
            RemoteCommands::Remove { name } => remote::remove_remote(&mut config, &name)?,
            RemoteCommands::List => remote::list_remotes(&config),
            RemoteCommands::Describe { name } => {
                remote::describe_remote(&config, &factory, &name).await?
            }
            RemoteCommands::Use { name } => remote::set_active_remote(&mut config, &name)?,
            RemoteCommands::Token { name } => remote::remote_token(&config, &name)?,
        },
        Commands::Deployment { command } => {
            let target = deployment::resolve_remote(&config, cli.remote.as_deref())?;
            run_deployment(command, &factory, &target).await?
        }
    };

    print!("{}", output);
    Ok(())
}

async fn run_deployment(
    command: DeploymentCommands,
    factory: &ApiClientFactory,
    target: &outpost_client::Remote,
) -> errors::CliResult<Output> {
    match command {
        DeploymentCommands::List => deployment::list_deployments(factory, target).await,
        DeploymentCommands::Describe { id } => {
            deployment::describe_deployment(factory, target, &id).await
        }
        DeploymentCommands::Create {
            template,
            override_path,
        } => {
            deployment::create_deployment(factory, target, &template, override_path.as_deref())
                .await
        }
        DeploymentCommands::Redeploy { id } => {
            deployment::redeploy_deployment(factory, target, &id).await
        }
        DeploymentCommands::Delete { id } => {
            deployment::delete_deployment(factory, target, &id).await
        }
    }
}
