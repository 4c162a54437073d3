//! The wizard engine.
//!
//! A [`Wizard`] owns a [`PlanStore`] and the cached [`WizardState`]. Opening
//! a plan yields a [`Session`], which loads page forms from the plan and
//! submits them:
//!
//! ```text
//! validate ─▶ serialize ─▶ recompute progress ─▶ one update batch ─▶ route
//!    │                                               │
//!    └─ errors: stay, nothing sent                   └─ failure: notice, route anyway
//! ```
//!
//! Every page goes through the same pipeline; there is no per-page control
//! flow besides what [`PageForm`] dispatches to.

use std::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    client::PlanStore,
    display::PageView,
    editor::ImportDialog,
    error::{PlannerError, Result},
    form::{PageForm, PageKind},
    models::{FieldUpdate, Institution, Plan, PlanField, PlanId, ProgressSummary, Step},
    navigation::{Route, WizardRoutes},
    progress,
};

pub mod builder;
pub mod state;


pub use builder::WizardBuilder;
pub use state::WizardState;

/// Navigation action that triggered a submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Next,
    Prev,
    /// Save without leaving the page
    Stay,
}

impl std::str::FromStr for Direction {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "next" => Ok(Direction::Next),
            "prev" | "back" => Ok(Direction::Prev),
            "stay" => Ok(Direction::Stay),
            _ => Err(PlannerError::invalid_input("direction")
                .with_reason(format!("expected next, prev or stay, got '{s}'"))),
        }
    }
}

/// A transient, user-visible message about a failed save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    /// HTTP status, when the backend answered
    pub status: Option<u16>,
}

impl Notice {
    pub fn from_error(error: &PlannerError) -> Self {
        let status = match error {
            PlannerError::Forbidden { .. } => Some(403),
            PlannerError::Http { status, .. } => Some(*status),
            _ => None,
        };
        Self {
            message: error.to_string(),
            status,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of the store write of a submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "notice", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved,
    Failed(Notice),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

/// Outcome of a submit: where to go next and whether the values were saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub route: Route,
    pub saved: SaveOutcome,
}

/// Wizard engine over a plan store.
pub struct Wizard<S: PlanStore> {
    store: S,
    state: WizardState,
}

impl<S: PlanStore> Wizard<S> {
    pub fn new(store: S, state: WizardState) -> Self {
        Self { store, state }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Opens the plan named by the routing context.
    ///
    /// A missing id fails with `PlannerError::MissingPlanId` before any
    /// store call; callers redirect to the plan overview. Partner snippets
    /// are fetched into the state cache; a failure there is logged and does
    /// not prevent opening, except for an expired session.
    pub async fn open(&mut self, route_plan_id: Option<&str>) -> Result<Session<'_, S>> {
        let plan_id = PlanId::from_route(route_plan_id)?;
        let plan = self.store.fetch_plan(&plan_id).await?;

        match self.state.ensure_snippets(&self.store, &plan.partners()).await {
            Ok(_) => {}
            Err(PlannerError::Unauthorized) => return Err(PlannerError::Unauthorized),
            Err(e) => warn!("could not load partner profiles for plan {plan_id}: {e}"),
        }

        let routes = WizardRoutes::from_plan(&plan, self.state.scheme());
        Ok(Session {
            wizard: self,
            plan_id,
            plan,
            routes,
        })
    }
}

/// One plan opened in the wizard.
pub struct Session<'w, S: PlanStore> {
    wizard: &'w mut Wizard<S>,
    plan_id: PlanId,
    plan: Plan,
    routes: WizardRoutes,
}

impl<S: PlanStore> Session<'_, S> {
    pub fn plan_id(&self) -> &PlanId {
        &self.plan_id
    }

    /// The session's copy of the plan, including the session's saved
    /// submits.
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn routes(&self) -> &WizardRoutes {
        &self.routes
    }

    pub fn state(&self) -> &WizardState {
        &self.wizard.state
    }

    /// Loads the form of a page.
    pub fn page(&self, kind: &PageKind) -> Result<PageForm> {
        PageForm::load(kind, &self.plan)
    }

    /// Loads a page together with what a front end needs to show it.
    pub fn page_view(&self, kind: &PageKind) -> Result<PageView> {
        let form = self.page(kind)?;
        let partners = match kind {
            PageKind::FormalConditions | PageKind::Evaluation => self.partner_labels(),
            _ => Vec::new(),
        };
        Ok(PageView {
            plan_id: self.plan_id.to_string(),
            page: form.kind(),
            values: form.to_json()?,
            partners,
        })
    }

    /// Partners of the plan with their display labels, in partner order.
    pub fn partner_labels(&self) -> Vec<(String, String)> {
        self.plan
            .partners()
            .into_iter()
            .map(|username| {
                let label = self.wizard.state.display_name(&username);
                (username, label)
            })
            .collect()
    }

    /// Completion counts over the plan's current pages.
    pub fn progress_summary(&self) -> ProgressSummary {
        let scheme = self.wizard.state.scheme();
        let keys: Vec<String> = self
            .routes
            .pages()
            .iter()
            .map(|page| page.progress_key(&self.plan, scheme))
            .collect();
        self.plan.progress.summary(keys.iter().map(String::as_str))
    }

    /// Submits a page and computes where to go.
    ///
    /// Validation errors fail with `PlannerError::Validation` and nothing is
    /// sent. The page's fields and the recomputed `progress` go out in one
    /// batch. A failed write is reported in [`Transition::saved`] and the
    /// route is still returned; only `Unauthorized` aborts.
    pub async fn submit(&mut self, form: &PageForm, direction: Direction) -> Result<Transition> {
        form.validate().map_err(PlannerError::Validation)?;

        let kind = form.kind();
        let scheme = self.wizard.state.scheme();
        let key = kind.progress_key(&self.plan, scheme);

        let mut updates = form.serialize(&self.plan)?;
        let mut next_progress = progress::recompute(&self.plan.progress, &key, form.is_empty());
        if let Some(steps) = updates.iter().find(|u| u.field == PlanField::Steps) {
            if kind == PageKind::StepNames {
                let submitted: Vec<Step> = serde_json::from_value(steps.value.clone())?;
                next_progress = progress::sync_step_keys(&next_progress, &submitted, scheme);
            }
        }
        updates.push(FieldUpdate::from_serialize(
            PlanField::Progress,
            &next_progress,
        )?);

        let saved = match self
            .wizard
            .store
            .update_fields(&self.plan_id, &updates)
            .await
        {
            Ok(()) => {
                info!("saved page {kind} of plan {}", self.plan_id);
                self.apply(&kind, &updates).await?;
                SaveOutcome::Saved
            }
            Err(PlannerError::Unauthorized) => return Err(PlannerError::Unauthorized),
            Err(e) => {
                warn!("saving page {kind} of plan {} failed: {e}", self.plan_id);
                SaveOutcome::Failed(Notice::from_error(&e))
            }
        };

        let current = match &kind {
            PageKind::Step(_) => PageKind::Step(key),
            other => other.clone(),
        };
        let route = self.resolve(&current, direction);

        Ok(Transition { route, saved })
    }

    /// Where `direction` leads from `page`, without saving anything.
    pub fn route_from(&self, page: &PageKind, direction: Direction) -> Route {
        let current = match page {
            PageKind::Step(_) => {
                PageKind::Step(page.progress_key(&self.plan, self.wizard.state.scheme()))
            }
            other => other.clone(),
        };
        self.resolve(&current, direction)
    }

    fn resolve(&self, current: &PageKind, direction: Direction) -> Route {
        match direction {
            Direction::Next => self.routes.next(current),
            Direction::Prev => self.routes.prev(current),
            Direction::Stay => self.stay_route(current),
        }
    }

    /// Brings the session's plan in line with a successful write.
    ///
    /// A new step list is fetched back so that steps created by it carry
    /// their assigned ids.
    async fn apply(&mut self, kind: &PageKind, updates: &[FieldUpdate]) -> Result<()> {
        self.plan = self.plan.with_updates(updates)?;
        if *kind == PageKind::StepNames {
            match self.wizard.store.fetch_plan(&self.plan_id).await {
                // entries for newly created steps go out with the next submit
                Ok(plan) => {
                    let synced = progress::sync_step_keys(
                        &plan.progress,
                        &plan.steps,
                        self.wizard.state.scheme(),
                    );
                    self.plan = Plan {
                        progress: synced,
                        ..plan
                    };
                }
                Err(PlannerError::Unauthorized) => return Err(PlannerError::Unauthorized),
                Err(e) => warn!("could not reload plan {}: {e}", self.plan_id),
            }
        }
        self.routes = WizardRoutes::from_plan(&self.plan, self.wizard.state.scheme());
        Ok(())
    }

    fn stay_route(&self, current: &PageKind) -> Route {
        if let PageKind::Step(key) = current {
            let navigator = self.routes.navigator();
            if let Some(index) = navigator.position(key) {
                return Route::Step(navigator.steps()[index].clone());
            }
        }
        Route::Page(current.clone())
    }

    /// Re-fetches the partner snippets of this plan.
    pub async fn refresh_snippets(&mut self) -> Result<usize> {
        let partners = self.plan.partners();
        let wizard = &mut *self.wizard;
        wizard.state.refresh_snippets(&wizard.store, &partners).await
    }

    /// The import dialog over the current user's profile institutions.
    pub async fn institution_import(&self) -> Result<ImportDialog<Institution>> {
        let candidates = self.wizard.store.profile_institutions().await?;
        Ok(ImportDialog::new(candidates))
    }

    /// Imports the selected profile institutions into an institutions form.
    ///
    /// Returns the number of imported rows.
    pub async fn import_institutions(
        &self,
        form: &mut PageForm,
        selection: &[usize],
    ) -> Result<usize> {
        let institutions = match form {
            PageForm::Institutions(institutions) => institutions,
            other => {
                return Err(PlannerError::invalid_input("page").with_reason(format!(
                    "cannot import institutions into page {}",
                    other.kind()
                )))
            }
        };
        let mut dialog = self.institution_import().await?;
        for &index in selection {
            if index >= dialog.candidates().len() {
                return Err(PlannerError::invalid_input("selection").with_reason(format!(
                    "profile has {} institution(s), got index {index}",
                    dialog.candidates().len()
                )));
            }
            if !dialog.is_selected(index) {
                dialog.toggle(index);
            }
        }
        Ok(dialog.confirm(&mut institutions.institutions))
    }
}
