//! Subcommands and their handlers.
//!
//! Argument structs carry the clap derives and convert into the core
//! parameter types, so parsing of pages and directions stays in one place:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Wizard
//! ```

use std::{
    fs,
    io::{self, Read},
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;
use vedesigner_core::{
    display::{
        CreateResult, OperationStatus, PlanList, ProgressSidebar, SubmitResult, ValidationReport,
    },
    models::{Institution, UserSnippet},
    params::{ImportInstitutions, Navigate, PlanRef, ShowPage, SubmitPage},
    Backend, Direction, ErrorOutcome, LocalStore, PageForm, PageKind, PlanId, PlanStore,
    PlannerError, Wizard,
};

use crate::renderer::TerminalRenderer;

/// Create a new plan in the local database
#[derive(Args)]
pub struct CreatePlanArgs {
    /// Name of the plan
    #[arg(default_value = "")]
    pub name: String,
}

/// Identify a plan
#[derive(Args)]
pub struct PlanIdArgs {
    #[arg(help = "ID of the plan")]
    pub plan_id: String,
}

impl From<PlanIdArgs> for PlanRef {
    fn from(val: PlanIdArgs) -> Self {
        PlanRef {
            plan_id: val.plan_id,
        }
    }
}

/// Show the progress sidebar of a plan
#[derive(Args)]
pub struct ProgressArgs {
    #[arg(help = "ID of the plan")]
    pub plan_id: String,
    /// Page to highlight, e.g. 'lectures' or 'step:<id>'
    #[arg(long)]
    pub current: Option<String>,
}

/// Give another user write access to a local plan
#[derive(Args)]
pub struct SharePlanArgs {
    #[arg(help = "ID of the plan")]
    pub plan_id: String,
    #[arg(help = "Username of the new co-author")]
    pub username: String,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a new plan (local database only)
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// List plans (local database only)
    #[command(alias = "ls")]
    List,
    /// Show the overview of a plan
    #[command(alias = "s")]
    Show(PlanIdArgs),
    /// Show the completion state of every page
    #[command(alias = "pr")]
    Progress(ProgressArgs),
    /// Add a co-author (local database only)
    Share(SharePlanArgs),
}

/// Show the current values of a page
#[derive(Args)]
pub struct ShowPageArgs {
    #[arg(help = "ID of the plan")]
    pub plan_id: String,
    #[arg(help = "Page slug (e.g. 'institutions') or 'step:<id>'")]
    pub page: String,
}

impl From<ShowPageArgs> for ShowPage {
    fn from(val: ShowPageArgs) -> Self {
        ShowPage {
            plan_id: val.plan_id,
            page: val.page,
        }
    }
}

/// Submit new values for a page
///
/// The values use the same JSON shape `page show` prints. Blank rows are
/// dropped on save.
#[derive(Args)]
pub struct SubmitPageArgs {
    #[arg(help = "ID of the plan")]
    pub plan_id: String,
    #[arg(help = "Page slug (e.g. 'institutions') or 'step:<id>'")]
    pub page: String,
    /// Page values as JSON, '@file' to read a file or '-' for stdin
    #[arg(short, long)]
    pub values: String,
    /// Where to go after saving: next, prev or stay
    #[arg(short, long, default_value = "next")]
    pub direction: String,
}

/// Show where a navigation action leads, without saving
#[derive(Args)]
pub struct NavigateArgs {
    #[arg(help = "ID of the plan")]
    pub plan_id: String,
    #[arg(help = "Page slug (e.g. 'institutions') or 'step:<id>'")]
    pub page: String,
    /// next, prev or stay
    #[arg(short, long, default_value = "next")]
    pub direction: String,
}

impl From<NavigateArgs> for Navigate {
    fn from(val: NavigateArgs) -> Self {
        Navigate {
            plan_id: val.plan_id,
            page: val.page,
            direction: Some(val.direction),
        }
    }
}

#[derive(Subcommand)]
pub enum PageCommands {
    /// Show the current values of a page
    #[command(alias = "s")]
    Show(ShowPageArgs),
    /// Validate and save a page, then print where to go next
    #[command(alias = "sub")]
    Submit(SubmitPageArgs),
    /// Show where next/prev leads from a page
    Nav(NavigateArgs),
}

/// Import institutions from the user's profile
///
/// Without `--select` the profile's institutions are listed with their
/// indexes.
#[derive(Args)]
pub struct ImportInstitutionsArgs {
    #[arg(help = "ID of the plan")]
    pub plan_id: String,
    /// Comma-separated zero-based indexes of the institutions to import
    #[arg(short, long, value_delimiter = ',')]
    pub select: Vec<usize>,
}

impl From<ImportInstitutionsArgs> for ImportInstitutions {
    fn from(val: ImportInstitutionsArgs) -> Self {
        ImportInstitutions {
            plan_id: val.plan_id,
            select: val.select,
        }
    }
}

#[derive(Subcommand)]
pub enum ImportCommands {
    /// Prepend profile institutions to the plan's institutions page
    Institutions(ImportInstitutionsArgs),
}

/// Set the institutions listed on a local profile
#[derive(Args)]
pub struct ProfileInstitutionsArgs {
    pub username: String,
    /// JSON array of institutions, '@file' or '-' for stdin
    #[arg(short, long)]
    pub values: String,
}

/// Set the display data of a local user
#[derive(Args)]
pub struct SnippetArgs {
    pub username: String,
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub institution: String,
}

impl From<SnippetArgs> for UserSnippet {
    fn from(val: SnippetArgs) -> Self {
        UserSnippet {
            username: val.username,
            first_name: val.first_name,
            last_name: val.last_name,
            institution: val.institution,
            ..Default::default()
        }
    }
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Set the institutions offered by `import institutions`
    Institutions(ProfileInstitutionsArgs),
    /// Set a user's display name and institution
    Snippet(SnippetArgs),
}

/// Reads a JSON argument given inline, as `@file`, or as `-` for stdin.
pub fn read_values(input: &str) -> Result<Value> {
    let raw = if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read values from stdin")?;
        buffer
    } else if let Some(path) = input.strip_prefix('@') {
        fs::read_to_string(path).with_context(|| format!("Failed to read values from {path}"))?
    } else {
        input.to_string()
    };
    serde_json::from_str(&raw).context("Values are not valid JSON")
}

/// Adds the hint matching the error's outcome.
fn explain(error: PlannerError) -> anyhow::Error {
    let hint = match error.outcome() {
        ErrorOutcome::Redirect => Some("Pick a plan from `ved plan list`"),
        ErrorOutcome::Reauthenticate => {
            Some("The session has expired; log in again and pass the new token via VED_TOKEN")
        }
        ErrorOutcome::BlockNavigation | ErrorOutcome::Notify => None,
    };
    match hint {
        Some(hint) => anyhow::Error::new(error).context(hint),
        None => anyhow::Error::new(error),
    }
}

/// Runs subcommands against one wizard.
pub struct Cli {
    wizard: Wizard<Backend>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(wizard: Wizard<Backend>, renderer: TerminalRenderer) -> Self {
        Self { wizard, renderer }
    }

    fn local(&self) -> Result<LocalStore> {
        self.wizard
            .store()
            .as_local()
            .cloned()
            .ok_or_else(|| anyhow!("This command needs a local database; drop --api-url"))
    }

    pub async fn handle_plan_command(&mut self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Create(args) => {
                let plan = self
                    .local()?
                    .create_plan(&args.name)
                    .await
                    .context("Failed to create plan")?;
                self.renderer.render(&CreateResult::new(plan).to_string())
            }
            PlanCommands::List => self.list_plans().await,
            PlanCommands::Show(args) => {
                let params = PlanRef::from(args);
                let id = PlanId::from_route(Some(&params.plan_id)).map_err(explain)?;
                let plan = self.wizard.store().fetch_plan(&id).await.map_err(explain)?;
                self.renderer.render(&plan.to_string())
            }
            PlanCommands::Progress(args) => {
                let current = args
                    .current
                    .as_deref()
                    .map(str::parse::<PageKind>)
                    .transpose()
                    .map_err(explain)?;
                let session = self
                    .wizard
                    .open(Some(&args.plan_id))
                    .await
                    .map_err(explain)?;
                let sidebar =
                    ProgressSidebar::new(session.plan(), session.routes(), session.state().scheme())
                        .with_current(current);
                let output = format!("{sidebar}\n{}\n", session.progress_summary());
                self.renderer.render(&output)
            }
            PlanCommands::Share(args) => {
                let id = PlanId::new(args.plan_id).map_err(explain)?;
                let added = self
                    .local()?
                    .grant_write_access(&id, &args.username)
                    .await
                    .map_err(explain)?;
                let status = if added {
                    OperationStatus::success(format!("{} can now edit plan {id}", args.username))
                } else {
                    OperationStatus::success(format!("{} already edits plan {id}", args.username))
                };
                self.renderer.render(&status.to_string())
            }
        }
    }

    pub async fn handle_page_command(&mut self, command: PageCommands) -> Result<()> {
        match command {
            PageCommands::Show(args) => {
                let params = ShowPage::from(args);
                let page = params.page_kind().map_err(explain)?;
                let session = self
                    .wizard
                    .open(Some(&params.plan_id))
                    .await
                    .map_err(explain)?;
                let view = session.page_view(&page).map_err(explain)?;
                self.renderer.render(&view.to_string())
            }
            PageCommands::Submit(args) => {
                let params = SubmitPage {
                    values: read_values(&args.values)?,
                    plan_id: args.plan_id,
                    page: args.page,
                    direction: Some(args.direction),
                };
                self.submit_page(params).await
            }
            PageCommands::Nav(args) => {
                let params = Navigate::from(args);
                let (page, direction) = params.validate().map_err(explain)?;
                let session = self
                    .wizard
                    .open(Some(&params.plan_id))
                    .await
                    .map_err(explain)?;
                let route = session.route_from(&page, direction);
                self.renderer.render(&format!("`{page}` → `{route}`\n"))
            }
        }
    }

    async fn submit_page(&mut self, params: SubmitPage) -> Result<()> {
        let (page, direction) = params.validate().map_err(explain)?;
        let form = PageForm::from_json(&page, params.values).map_err(explain)?;
        let mut session = self
            .wizard
            .open(Some(&params.plan_id))
            .await
            .map_err(explain)?;

        match session.submit(&form, direction).await {
            Ok(transition) => {
                let result = SubmitResult {
                    page: &page,
                    transition: &transition,
                };
                self.renderer.render(&result.to_string())
            }
            Err(PlannerError::Validation(errors)) => {
                self.renderer.render(&ValidationReport(&errors).to_string())?;
                bail!("Page {page} was not saved")
            }
            Err(e) => Err(explain(e)),
        }
    }

    pub async fn handle_import_command(&mut self, command: ImportCommands) -> Result<()> {
        match command {
            ImportCommands::Institutions(args) => {
                let params = ImportInstitutions::from(args);
                let mut session = self
                    .wizard
                    .open(Some(&params.plan_id))
                    .await
                    .map_err(explain)?;

                if params.select.is_empty() {
                    let dialog = session.institution_import().await.map_err(explain)?;
                    let mut output = String::from("## Profile institutions\n\n");
                    if dialog.candidates().is_empty() {
                        output.push_str("No institutions on the profile.\n");
                    }
                    for (index, institution) in dialog.candidates().iter().enumerate() {
                        output.push_str(&format!("- `{index}` {}\n", institution.name));
                    }
                    return self.renderer.render(&output);
                }

                let page = PageKind::Institutions;
                let mut form = session.page(&page).map_err(explain)?;
                let imported = session
                    .import_institutions(&mut form, &params.select)
                    .await
                    .map_err(explain)?;
                let transition = session
                    .submit(&form, Direction::Stay)
                    .await
                    .map_err(explain)?;

                let status =
                    OperationStatus::success(format!("Imported {imported} institution(s)"));
                let result = SubmitResult {
                    page: &page,
                    transition: &transition,
                };
                self.renderer.render(&format!("{status}\n{result}"))
            }
        }
    }

    pub async fn handle_profile_command(&mut self, command: ProfileCommands) -> Result<()> {
        let local = self.local()?;
        match command {
            ProfileCommands::Institutions(args) => {
                let institutions: Vec<Institution> =
                    serde_json::from_value(read_values(&args.values)?)
                        .context("Expected a JSON array of institutions")?;
                let count = institutions.len();
                local
                    .save_profile(&args.username, institutions)
                    .await
                    .context("Failed to save profile")?;
                let status = OperationStatus::success(format!(
                    "Saved {count} institution(s) for {}",
                    args.username
                ));
                self.renderer.render(&status.to_string())
            }
            ProfileCommands::Snippet(args) => {
                let snippet = UserSnippet::from(args);
                let status = OperationStatus::success(format!("Saved profile of {snippet}"));
                local
                    .save_snippet(snippet)
                    .await
                    .context("Failed to save profile snippet")?;
                self.renderer.render(&status.to_string())
            }
        }
    }

    pub async fn list_plans(&self) -> Result<()> {
        let plans = self
            .local()?
            .list_plans()
            .await
            .context("Failed to list plans")?;
        let title = if plans.is_empty() { "No plans" } else { "Plans" };
        self.renderer
            .render(&format!("# {title}\n\n{}", PlanList(plans)))
    }
}
