//! Credential set CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use comfy_table::Cell;
use uuid::Uuid;

use crate::cli::output::{list_table, output, render_list, truncate, CommandOutput};
use crate::domain::models::{
    mask_client_id, mask_client_secret, ClientInvalidation, Config, CredentialSet,
    Environment, EvictionReport, ListedCredential,
};
use crate::infrastructure::setup::build_services;
use crate::services::NewCredential;

#[derive(Args, Debug)]
pub struct CredentialArgs {
    #[command(subcommand)]
    pub command: CredentialCommands,
}

#[derive(Subcommand, Debug)]
pub enum CredentialCommands {
    /// Store a new credential set (does not activate it)
    Add {
        /// Display name
        name: String,
        /// OAuth client id
        #[arg(long)]
        client_id: String,
        /// OAuth client secret
        #[arg(long, env = "CREDSWITCH_CLIENT_SECRET", hide_env_values = true)]
        client_secret: String,
        /// Target environment (sandbox, live)
        #[arg(short, long)]
        environment: String,
    },
    /// List stored credential sets
    List,
    /// Show one credential set
    Show {
        /// Credential set ID
        id: Uuid,
    },
    /// Show the active credential set
    Active,
    /// Make a credential set active and invalidate dependent caches
    Switch {
        /// Credential set ID
        id: Uuid,
    },
    /// Permanently delete an inactive credential set
    Delete {
        /// Credential set ID
        id: Uuid,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct CredentialOutput {
    pub id: String,
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub environment: Environment,
    pub created_at: String,
    pub is_active: bool,
}

impl CredentialOutput {
    fn new(credential: &CredentialSet, is_active: bool) -> Self {
        Self {
            id: credential.id.to_string(),
            name: credential.name.clone(),
            client_id: mask_client_id(&credential.client_id),
            client_secret: mask_client_secret(credential.client_secret.expose()),
            environment: credential.environment,
            created_at: credential.created_at.to_rfc3339(),
            is_active,
        }
    }

    fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("ID:            {}", self.id),
            format!("Name:          {}", self.name),
            format!("Environment:   {}", self.environment),
            format!("Client ID:     {}", self.client_id),
            format!("Client secret: {}", self.client_secret),
            format!("Created:       {}", self.created_at),
            format!("Active:        {}", if self.is_active { "yes" } else { "no" }),
        ]
    }
}

impl From<&ListedCredential> for CredentialOutput {
    fn from(listed: &ListedCredential) -> Self {
        Self::new(&listed.credential, listed.is_active)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CredentialListOutput {
    pub credentials: Vec<CredentialOutput>,
    pub total: usize,
}

impl CommandOutput for CredentialListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["", "id", "name", "environment", "client id", "created"]);
        for credential in &self.credentials {
            table.add_row(vec![
                Cell::new(if credential.is_active { "*" } else { "" }),
                Cell::new(&credential.id),
                Cell::new(truncate(&credential.name, 32)),
                Cell::new(credential.environment),
                Cell::new(&credential.client_id),
                Cell::new(truncate(&credential.created_at, 19)),
            ]);
        }
        render_list("credential set", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CredentialDetailOutput {
    pub credential: CredentialOutput,
}

impl CommandOutput for CredentialDetailOutput {
    fn to_human(&self) -> String {
        self.credential.detail_lines().join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ActiveCredentialOutput {
    pub configured: bool,
    pub credential: Option<CredentialOutput>,
}

impl CommandOutput for ActiveCredentialOutput {
    fn to_human(&self) -> String {
        match self.credential {
            Some(ref credential) => credential.detail_lines().join("\n"),
            None => "No active credential set. Use 'credswitch credential switch <id>'.".to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CredentialActionOutput {
    pub success: bool,
    pub message: String,
    pub credential: Option<CredentialOutput>,
}

impl CommandOutput for CredentialActionOutput {
    fn to_human(&self) -> String {
        match self.credential {
            Some(ref credential) => format!("{}\n  ID: {}", self.message, credential.id),
            None => self.message.clone(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SwitchOutput {
    pub previous: Option<String>,
    pub active: CredentialOutput,
    pub eviction: EvictionReport,
    pub client_invalidation: ClientInvalidation,
}

impl CommandOutput for SwitchOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Switched to '{}' ({})",
            self.active.name, self.active.environment
        )];
        match self.eviction {
            EvictionReport::NothingToClear => lines.push("  No cached tokens to clear".to_string()),
            EvictionReport::Evicted { entries } => {
                lines.push(format!("  Evicted {entries} cached token(s)"));
            }
        }
        lines.push("  Clients must drop cached environment and shop data and reload".to_string());
        lines.join("\n")
    }
}

pub async fn execute(args: CredentialArgs, config: &Config, json_mode: bool) -> Result<()> {
    let services = build_services(config)
        .await
        .context("Failed to open credential store. Run 'credswitch init' first.")?;
    let registry = services.registry;

    match args.command {
        CredentialCommands::Add {
            name,
            client_id,
            client_secret,
            environment,
        } => {
            let environment = Environment::parse(&environment)?;
            let credential = registry
                .create(NewCredential {
                    name,
                    client_id,
                    client_secret,
                    environment,
                })
                .await?;

            let out = CredentialActionOutput {
                success: true,
                message: format!("Credential set '{}' stored", credential.name),
                credential: Some(CredentialOutput::new(&credential, false)),
            };
            output(&out, json_mode);
        }

        CredentialCommands::List => {
            let credentials: Vec<CredentialOutput> =
                registry.list().await?.iter().map(CredentialOutput::from).collect();
            let out = CredentialListOutput {
                total: credentials.len(),
                credentials,
            };
            output(&out, json_mode);
        }

        CredentialCommands::Show { id } => {
            let credential = registry.get(id).await?;
            let is_active = registry.active_id().await? == Some(id);
            let out = CredentialDetailOutput {
                credential: CredentialOutput::new(&credential, is_active),
            };
            output(&out, json_mode);
        }

        CredentialCommands::Active => {
            let active = registry.get_active().await?;
            let out = ActiveCredentialOutput {
                configured: active.is_configured(),
                credential: active.credential().map(|c| CredentialOutput::new(c, true)),
            };
            output(&out, json_mode);
        }

        CredentialCommands::Switch { id } => {
            let outcome = registry.switch_to(id).await?;
            let out = SwitchOutput {
                previous: outcome.previous.map(|id| id.to_string()),
                active: CredentialOutput::new(&outcome.active, true),
                eviction: outcome.eviction,
                client_invalidation: outcome.signal,
            };
            output(&out, json_mode);
        }

        CredentialCommands::Delete { id } => {
            registry.delete(id).await?;
            let out = CredentialActionOutput {
                success: true,
                message: format!("Credential set {id} deleted"),
                credential: None,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CredentialSet {
        CredentialSet::new("prod", "client-abcdef", "supersecretvalue", Environment::Live).unwrap()
    }

    #[test]
    fn test_credential_output_masks_values() {
        let credential = sample();
        let out = CredentialOutput::new(&credential, true);

        assert_eq!(out.client_id, "clie****");
        assert_eq!(out.client_secret, "****alue");

        let json = serde_json::to_string(&out).unwrap();
        assert!(!json.contains("supersecretvalue"));
        assert!(!json.contains("client-abcdef"));
    }

    #[test]
    fn test_list_output_marks_active_row() {
        let credential = sample();
        let out = CredentialListOutput {
            credentials: vec![CredentialOutput::new(&credential, true)],
            total: 1,
        };

        let human = out.to_human();
        assert!(human.starts_with("1 credential set:"));
        assert!(human.contains('*'));
        assert!(human.contains("prod"));
        assert!(!human.contains("supersecretvalue"));
    }

    #[test]
    fn test_active_output_when_not_configured() {
        let out = ActiveCredentialOutput {
            configured: false,
            credential: None,
        };

        assert!(out.to_human().contains("No active credential set"));
        assert_eq!(out.to_json()["configured"], serde_json::json!(false));
    }
}
