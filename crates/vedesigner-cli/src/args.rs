use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use vedesigner_core::StepKeyScheme;

use crate::cli::{ImportCommands, PageCommands, PlanCommands, ProfileCommands};

/// Command-line front end of the VE-Designer plan wizard
///
/// Works against the Plan API when `--api-url` is given, otherwise against a
/// local SQLite database for offline drafting. `ved serve` exposes the same
/// wizard to AI assistants over MCP.
#[derive(Parser)]
#[command(version, about, name = "ved")]
pub struct Args {
    /// Base url of the Plan API. Without it a local database is used
    #[arg(long, global = true, env = "VED_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the Plan API
    #[arg(long, global = true, env = "VED_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds for the Plan API
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/vedesigner/vedesigner.db
    #[arg(long, global = true, env = "VED_DATABASE_FILE")]
    pub database_file: Option<PathBuf>,

    /// Username the local database acts as
    #[arg(long, global = true, env = "VED_USER")]
    pub user: Option<String>,

    /// How fine-planning steps are keyed
    #[arg(long, global = true, value_enum, default_value_t = StepKeys::Id)]
    pub step_keys: StepKeys,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Show, submit and navigate wizard pages
    #[command(alias = "pg")]
    Page {
        #[command(subcommand)]
        command: PageCommands,
    },
    /// Import records from the user's profile
    Import {
        #[command(subcommand)]
        command: ImportCommands,
    },
    /// Manage local profile data
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Start the MCP server
    Serve,
}

/// Step keying scheme as a command-line value.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum StepKeys {
    /// Server-assigned step ids
    Id,
    /// Step names, for plans written by older wizards
    DisplayName,
}

impl From<StepKeys> for StepKeyScheme {
    fn from(value: StepKeys) -> Self {
        match value {
            StepKeys::Id => StepKeyScheme::Id,
            StepKeys::DisplayName => StepKeyScheme::DisplayName,
        }
    }
}
