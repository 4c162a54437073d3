//! MCP server for the VE-Designer wizard
//!
//! Exposes plan overview, page show/submit and navigation as MCP tools so
//! an AI assistant can fill in a plan page by page through the same
//! validation and progress rules as the command line.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};
use vedesigner_core::{Backend, Wizard};

pub mod errors;
pub mod handlers;

pub use handlers::{
    CreatePlan, ImportInstitutions, McpResult, Navigate, PlanRef, ShowPage, SubmitPage,
};

/// MCP server over one wizard
#[derive(Clone)]
pub struct VeDesignerMcpServer {
    wizard: Arc<Mutex<Wizard<Backend>>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl VeDesignerMcpServer {
    pub fn new(wizard: Wizard<Backend>) -> Self {
        Self {
            wizard: Arc::new(Mutex::new(wizard)),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.wizard.clone())
    }

    #[tool(
        name = "list_plans",
        description = "List the plans in the local database, most recently modified first. Returns each plan's name and ID. Not available against the Plan API."
    )]
    async fn list_plans(&self) -> McpResult {
        self.handlers().list_plans().await
    }

    #[tool(
        name = "create_plan",
        description = "Create a new, empty plan in the local database. The name is optional and can be set later on the 'name' page. Returns the new plan ID."
    )]
    async fn create_plan(&self, params: Parameters<CreatePlan>) -> McpResult {
        self.handlers().create_plan(params).await
    }

    #[tool(
        name = "show_plan",
        description = "Show the overview of a plan: authors, institutions, lectures, target groups, languages, learning environment and every fine-planning step with its tasks."
    )]
    async fn show_plan(&self, params: Parameters<PlanRef>) -> McpResult {
        self.handlers().show_plan(params).await
    }

    #[tool(
        name = "show_progress",
        description = "Show the completion state (not started, in progress, completed) of every wizard page of a plan, including one entry per fine-planning step, plus a summary."
    )]
    async fn show_progress(&self, params: Parameters<PlanRef>) -> McpResult {
        self.handlers().show_progress(params).await
    }

    #[tool(
        name = "show_page",
        description = "Show the current values of one wizard page as JSON. Pages: name, institutions, lectures, target-groups, learning-env, formal-conditions, evaluation, step-names, or step:<step id> for fine planning. Submit changes with submit_page using the same JSON shape."
    )]
    async fn show_page(&self, params: Parameters<ShowPage>) -> McpResult {
        self.handlers().show_page(params).await
    }

    #[tool(
        name = "submit_page",
        description = "Validate and save the values of one wizard page, then report the page to continue with. 'values' uses the JSON shape show_page returns; blank rows are dropped. 'direction' is next (default), prev or stay.

        A page that fails validation is not saved; the result lists every offending field so the values can be corrected and resubmitted. Saving the step-names page may create or remove fine-planning steps."
    )]
    async fn submit_page(&self, params: Parameters<SubmitPage>) -> McpResult {
        self.handlers().submit_page(params).await
    }

    #[tool(
        name = "navigate",
        description = "Report which page next, prev or stay leads to from a given page, without saving anything. Before the first step, after the last step and from the first page the route leaves the page list (step list, finish, overview)."
    )]
    async fn navigate(&self, params: Parameters<Navigate>) -> McpResult {
        self.handlers().navigate(params).await
    }

    #[tool(
        name = "import_institutions",
        description = "Import institutions from the acting user's profile into the plan's institutions page. Without 'select' the profile's institutions are listed with their zero-based indexes; with 'select' the chosen ones are prepended to the page and saved."
    )]
    async fn import_institutions(&self, params: Parameters<ImportInstitutions>) -> McpResult {
        self.handlers().import_institutions(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for VeDesignerMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "vedesigner".to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(r#"VE-Designer guides the planning of a virtual exchange (VE) through a fixed sequence of wizard pages followed by one page per fine-planning step.

## Pages
name → institutions → lectures → target-groups → learning-env → formal-conditions → evaluation → step-names → step:<id> ...

The formal-conditions and evaluation pages have one entry per partner (the plan's author and co-authors).

## Workflow
1. Find a plan with `list_plans` or start one with `create_plan`
2. Read a page with `show_page`, edit the JSON, save it with `submit_page`
3. Follow the "Next" route in the result; `navigate` answers where next/prev lead without saving
4. Add steps on the step-names page, then plan each step on its step:<id> page
5. Check `show_progress` for pages still marked not started or in progress

## Notes
- Saving a page marks it completed, or not started when it was left blank
- Rejected pages are not saved; fix the listed fields and submit again
- `import_institutions` copies institutions from the user's profile"#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: VeDesignerMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting VE-Designer MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
