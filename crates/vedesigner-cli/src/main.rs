//! VE-Designer CLI
//!
//! Command-line and MCP front end of the plan wizard.

mod args;
mod cli;
mod mcp;
mod renderer;

use std::time::Duration;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, VeDesignerMcpServer};
use renderer::TerminalRenderer;
use vedesigner_core::WizardBuilder;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        api_url,
        token,
        timeout,
        database_file,
        user,
        step_keys,
        no_color,
        command,
    } = Args::parse();

    let backend = if api_url.is_some() { "api" } else { "local" };
    let wizard = WizardBuilder::new()
        .with_api_url(api_url)
        .with_token(token)
        .with_timeout(Duration::from_secs(timeout))
        .with_database_path(database_file)
        .with_user(user)
        .with_step_key_scheme(step_keys.into())
        .build()
        .await
        .context("Failed to initialize wizard")?;

    info!("ved started with {backend} backend");

    if let Some(Serve) = command {
        info!("Starting VE-Designer MCP server");
        return run_stdio_server(VeDesignerMcpServer::new(wizard))
            .await
            .context("MCP server failed");
    }

    let mut cli = Cli::new(wizard, TerminalRenderer::new(!no_color));
    match command {
        Some(Plan { command }) => cli.handle_plan_command(command).await,
        Some(Page { command }) => cli.handle_page_command(command).await,
        Some(Import { command }) => cli.handle_import_command(command).await,
        Some(Profile { command }) => cli.handle_profile_command(command).await,
        Some(Serve) | None => cli.list_plans().await,
    }
}
