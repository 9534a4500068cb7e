//! Cache CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{ClientInvalidation, Config, EvictionReport};
use crate::infrastructure::setup::build_services;

#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Evict every cached token and tell clients to drop their state
    Clear,
}

#[derive(Debug, serde::Serialize)]
pub struct CacheClearOutput {
    pub eviction: EvictionReport,
    pub client_invalidation: ClientInvalidation,
}

impl CommandOutput for CacheClearOutput {
    fn to_human(&self) -> String {
        let server = match self.eviction {
            EvictionReport::NothingToClear => "Token cache was already empty".to_string(),
            EvictionReport::Evicted { entries } => format!("Evicted {entries} cached token(s)"),
        };
        format!("{server}\nClients must drop cached environment and shop data and reload")
    }
}

pub async fn execute(args: CacheArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = build_services(config)
        .await
        .context("Failed to open credential store. Run 'credswitch init' first.")?;

    match args.command {
        CacheCommands::Clear => {
            let outcome = services.registry.clear_caches().await?;
            let out = CacheClearOutput {
                eviction: outcome.eviction,
                client_invalidation: outcome.signal,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
