//! Implementation of the `credswitch status` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AuthStatus, Config};
use crate::infrastructure::setup::build_services;

#[derive(Args, Debug)]
pub struct StatusArgs {}

#[derive(Debug, serde::Serialize)]
#[serde(transparent)]
pub struct StatusOutput(pub AuthStatus);

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        let status = &self.0;
        if !status.configured {
            return "Not configured (environment: unknown)".to_string();
        }
        [
            format!("Environment:   {}", status.environment_label()),
            format!("Client ID:     {}", status.client_id_masked),
            format!("Client secret: {}", status.client_secret_masked),
        ]
        .join("\n")
    }
}

pub async fn execute(_args: StatusArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = build_services(config)
        .await
        .context("Failed to open credential store. Run 'credswitch init' first.")?;

    let status = services.reporter.status().await?;
    output(&StatusOutput(status), json_mode);
    Ok(())
}
