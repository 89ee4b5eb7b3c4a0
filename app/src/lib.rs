//! Gyro command-line application library

pub mod cli;
pub mod commands;

use clap::Parser;
use evm_node_client::NodeClient;
use gyro::Gyro;
use gyro_core::AppConfig;

use cli::{Cli, Command};

/// Parse arguments, connect to the node and run one command
pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gyro=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    tracing::info!(url = %config.node.url, "Starting Gyro CLI");
    let client = NodeClient::connect(config.node.clone())?;

    match cli.command {
        Command::Status => commands::node::status(&client).await,
        command => {
            let gyro = Gyro::create(client, &config, cli.account).await?;
            commands::gyro::execute(&gyro, command, config.approve_future).await
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading config");
            AppConfig::from_file(path)?
        }
        None => AppConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}
