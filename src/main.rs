//! credswitch CLI entry point.

use anyhow::Result;
use clap::Parser;

use credswitch::cli::commands::{cache, credential, init, status};
use credswitch::cli::{handle_error, Cli, Commands};
use credswitch::infrastructure::config::ConfigLoader;
use credswitch::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli.command, json_mode).await {
        handle_error(err, json_mode);
    }
}

async fn run(command: Commands, json_mode: bool) -> Result<()> {
    // init runs before any config file exists
    if let Commands::Init(args) = command {
        let _logger = LoggerImpl::init(&LogConfig::default())?;
        return init::execute(args, json_mode).await;
    }

    let config = ConfigLoader::load()?;
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    match command {
        Commands::Init(_) => Ok(()),
        Commands::Credential(args) => credential::execute(args, &config, json_mode).await,
        Commands::Cache(args) => cache::execute(args, &config, json_mode).await,
        Commands::Status(args) => status::execute(args, &config, json_mode).await,
    }
}
