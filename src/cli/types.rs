//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use crate::cli::commands::cache::CacheArgs;
use crate::cli::commands::credential::CredentialArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::status::StatusArgs;

#[derive(Parser, Debug)]
#[command(name = "credswitch")]
#[command(about = "Manage API credential sets and switch the active one safely", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration and database in a project directory
    Init(InitArgs),

    /// Manage stored credential sets
    #[command(alias = "cred")]
    Credential(CredentialArgs),

    /// Clear dependent caches
    Cache(CacheArgs),

    /// Show the current authentication status
    Status(StatusArgs),
}
