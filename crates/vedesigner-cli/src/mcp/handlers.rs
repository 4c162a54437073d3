//! MCP tool handlers implementation

use std::sync::Arc;

use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;
use vedesigner_core::{
    display::{
        CreateResult, OperationStatus, PlanList, ProgressSidebar, SubmitResult, ValidationReport,
    },
    params as core, Backend, Direction, PageForm, PageKind, PlanId, PlanStore, PlannerError,
    Wizard,
};

use super::errors::to_mcp_error;

// Core parameter types stay free of rmcp; this wrapper passes serde and the
// JSON schema straight through to the wrapped type.

/// Transparent MCP wrapper around a core parameter type.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type PlanRef = McpParams<core::PlanRef>;
pub type CreatePlan = McpParams<core::CreatePlan>;
pub type ShowPage = McpParams<core::ShowPage>;
pub type SubmitPage = McpParams<core::SubmitPage>;
pub type Navigate = McpParams<core::Navigate>;
pub type ImportInstitutions = McpParams<core::ImportInstitutions>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(output: impl ToString) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        output.to_string(),
    )]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    wizard: Arc<Mutex<Wizard<Backend>>>,
}

impl McpHandlers {
    pub fn new(wizard: Arc<Mutex<Wizard<Backend>>>) -> Self {
        Self { wizard }
    }

    pub async fn list_plans(&self) -> McpResult {
        let wizard = self.wizard.lock().await;
        let local = wizard.store().as_local().ok_or_else(|| {
            ErrorData::invalid_request("Listing plans needs a local database", None)
        })?;
        let plans = local
            .list_plans()
            .await
            .map_err(|e| to_mcp_error("Failed to list plans", &e))?;
        text(PlanList(plans))
    }

    pub async fn create_plan(&self, Parameters(params): Parameters<CreatePlan>) -> McpResult {
        debug!("create_plan: {params:?}");

        let wizard = self.wizard.lock().await;
        let local = wizard.store().as_local().ok_or_else(|| {
            ErrorData::invalid_request("Creating plans needs a local database", None)
        })?;
        let plan = local
            .create_plan(&params.as_ref().name)
            .await
            .map_err(|e| to_mcp_error("Failed to create plan", &e))?;
        text(CreateResult::new(plan))
    }

    pub async fn show_plan(&self, Parameters(params): Parameters<PlanRef>) -> McpResult {
        let id = PlanId::from_route(Some(&params.as_ref().plan_id))
            .map_err(|e| to_mcp_error("Failed to show plan", &e))?;
        let wizard = self.wizard.lock().await;
        let plan = wizard
            .store()
            .fetch_plan(&id)
            .await
            .map_err(|e| to_mcp_error("Failed to show plan", &e))?;
        text(plan)
    }

    pub async fn show_progress(&self, Parameters(params): Parameters<PlanRef>) -> McpResult {
        let mut wizard = self.wizard.lock().await;
        let session = wizard
            .open(Some(&params.as_ref().plan_id))
            .await
            .map_err(|e| to_mcp_error("Failed to open plan", &e))?;
        let sidebar =
            ProgressSidebar::new(session.plan(), session.routes(), session.state().scheme());
        text(format!("{sidebar}\n{}\n", session.progress_summary()))
    }

    pub async fn show_page(&self, Parameters(params): Parameters<ShowPage>) -> McpResult {
        let params = params.as_ref();
        let page = params
            .page_kind()
            .map_err(|e| to_mcp_error("Failed to show page", &e))?;
        let mut wizard = self.wizard.lock().await;
        let session = wizard
            .open(Some(&params.plan_id))
            .await
            .map_err(|e| to_mcp_error("Failed to open plan", &e))?;
        let view = session
            .page_view(&page)
            .map_err(|e| to_mcp_error("Failed to show page", &e))?;
        text(view)
    }

    pub async fn submit_page(&self, Parameters(params): Parameters<SubmitPage>) -> McpResult {
        debug!("submit_page: {params:?}");

        let params = params.as_ref();
        let (page, direction) = params
            .validate()
            .map_err(|e| to_mcp_error("Invalid submit parameters", &e))?;
        let form = PageForm::from_json(&page, params.values.clone())
            .map_err(|e| to_mcp_error("Invalid page values", &e))?;

        let mut wizard = self.wizard.lock().await;
        let mut session = wizard
            .open(Some(&params.plan_id))
            .await
            .map_err(|e| to_mcp_error("Failed to open plan", &e))?;

        match session.submit(&form, direction).await {
            Ok(transition) => text(SubmitResult {
                page: &page,
                transition: &transition,
            }),
            // Field errors go back to the model as a tool result it can act on.
            Err(PlannerError::Validation(errors)) => Ok(CallToolResult::error(vec![
                Content::text(ValidationReport(&errors).to_string()),
            ])),
            Err(e) => Err(to_mcp_error("Failed to save page", &e)),
        }
    }

    pub async fn navigate(&self, Parameters(params): Parameters<Navigate>) -> McpResult {
        let params = params.as_ref();
        let (page, direction) = params
            .validate()
            .map_err(|e| to_mcp_error("Invalid navigation parameters", &e))?;
        let mut wizard = self.wizard.lock().await;
        let session = wizard
            .open(Some(&params.plan_id))
            .await
            .map_err(|e| to_mcp_error("Failed to open plan", &e))?;
        let route = session.route_from(&page, direction);
        text(format!("`{page}` → `{route}`\n"))
    }

    pub async fn import_institutions(
        &self,
        Parameters(params): Parameters<ImportInstitutions>,
    ) -> McpResult {
        debug!("import_institutions: {params:?}");

        let params = params.as_ref();
        let mut wizard = self.wizard.lock().await;
        let mut session = wizard
            .open(Some(&params.plan_id))
            .await
            .map_err(|e| to_mcp_error("Failed to open plan", &e))?;

        if params.select.is_empty() {
            let dialog = session
                .institution_import()
                .await
                .map_err(|e| to_mcp_error("Failed to load profile", &e))?;
            let mut output = String::from("## Profile institutions\n\n");
            if dialog.candidates().is_empty() {
                output.push_str("No institutions on the profile.\n");
            }
            for (index, institution) in dialog.candidates().iter().enumerate() {
                output.push_str(&format!("- `{index}` {}\n", institution.name));
            }
            return text(output);
        }

        let page = PageKind::Institutions;
        let mut form = session
            .page(&page)
            .map_err(|e| to_mcp_error("Failed to load institutions", &e))?;
        let imported = session
            .import_institutions(&mut form, &params.select)
            .await
            .map_err(|e| to_mcp_error("Failed to import institutions", &e))?;
        let transition = session
            .submit(&form, Direction::Stay)
            .await
            .map_err(|e| to_mcp_error("Failed to save institutions", &e))?;

        let status = OperationStatus::success(format!("Imported {imported} institution(s)"));
        text(format!(
            "{status}\n{}",
            SubmitResult {
                page: &page,
                transition: &transition,
            }
        ))
    }
}
