//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use super::PlanTimestamp;
use crate::{
    form::PageKind,
    models::{Plan, ProgressState},
    navigation::{StepKeyScheme, WizardRoutes},
};

/// Newtype wrapper for displaying a list of plans.
///
/// Each plan is shown as a short entry, not the full overview.
///
/// ```rust
/// use vedesigner_core::{display::PlanList, models::Plan};
///
/// let mut plan = Plan::empty("p1");
/// plan.name = "Climate VE".to_string();
///
/// let output = PlanList(vec![plan]).to_string();
/// assert!(output.contains("## Climate VE (ID: p1)"));
/// assert_eq!(PlanList(vec![]).to_string(), "No plans found.\n");
/// ```
pub struct PlanList(pub Vec<Plan>);

impl fmt::Display for PlanList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }
        for plan in &self.0 {
            let name = if plan.name.trim().is_empty() {
                "(untitled plan)"
            } else {
                plan.name.as_str()
            };
            writeln!(f, "## {name} (ID: {})", plan.id)?;
            writeln!(f)?;
            if !plan.author.is_empty() {
                writeln!(f, "- **Author**: {}", plan.author)?;
            }
            writeln!(f, "- **Steps**: {}", plan.steps.len())?;
            if let Some(modified) = &plan.last_modified {
                writeln!(f, "- **Modified**: {}", PlanTimestamp(modified))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One line of the progress sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub page: PageKind,
    pub label: String,
    pub state: ProgressState,
}

/// The wizard's page list with the completion state of every page.
///
/// Pages come from the plan's current routes, so deleted steps never show
/// up even when their progress entries linger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSidebar {
    pub entries: Vec<SidebarEntry>,
    /// The page being edited, highlighted in the output
    pub current: Option<PageKind>,
}

impl ProgressSidebar {
    pub fn new(plan: &Plan, routes: &WizardRoutes, scheme: StepKeyScheme) -> Self {
        let steps = routes.navigator().steps();
        let entries = routes
            .pages()
            .into_iter()
            .map(|page| {
                let key = page.progress_key(plan, scheme);
                let label = match &page {
                    PageKind::Step(_) => steps
                        .iter()
                        .find(|step| step.id == key)
                        .map_or_else(|| key.clone(), |step| step.display_name.clone()),
                    other => other.title().to_string(),
                };
                SidebarEntry {
                    state: plan.progress.get(&key),
                    page,
                    label,
                }
            })
            .collect();
        Self {
            entries,
            current: None,
        }
    }

    /// Marks `page` as the page being edited.
    pub fn with_current(mut self, page: Option<PageKind>) -> Self {
        self.current = page;
        self
    }
}

impl fmt::Display for ProgressSidebar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Progress")?;
        writeln!(f)?;
        for entry in &self.entries {
            let indent = match entry.page {
                PageKind::Step(_) => "  ",
                _ => "",
            };
            let marker = if self.current.as_ref() == Some(&entry.page) {
                " **◀**"
            } else {
                ""
            };
            writeln!(
                f,
                "{indent}- {} `{}`: {}{marker}",
                entry.label,
                entry.page,
                entry.state.with_icon()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn plan_with_steps() -> Plan {
        serde_json::from_value(json!({
            "_id": "p1",
            "steps": [{"_id": "s1", "name": "Kickoff"}, {"_id": "s2", "name": "Wrap-up"}],
            "progress": {"name": "completed", "s1": "in_progress", "gone": "completed"}
        }))
        .unwrap()
    }

    #[test]
    fn test_sidebar_lists_static_pages_then_steps() {
        let plan = plan_with_steps();
        let routes = WizardRoutes::from_plan(&plan, StepKeyScheme::Id);
        let sidebar = ProgressSidebar::new(&plan, &routes, StepKeyScheme::Id);

        assert_eq!(sidebar.entries.len(), 10);
        assert_eq!(sidebar.entries[0].state, ProgressState::Completed);
        assert_eq!(sidebar.entries[8].label, "Kickoff");
        assert_eq!(sidebar.entries[8].state, ProgressState::InProgress);
        assert_eq!(sidebar.entries[9].state, ProgressState::NotStarted);
        assert!(sidebar.entries.iter().all(|e| e.label != "gone"));
    }

    #[test]
    fn test_sidebar_marks_current_page() {
        let plan = plan_with_steps();
        let routes = WizardRoutes::from_plan(&plan, StepKeyScheme::Id);
        let output = ProgressSidebar::new(&plan, &routes, StepKeyScheme::Id)
            .with_current(Some(PageKind::Step("s2".to_string())))
            .to_string();

        assert!(output.contains("- Project name `name`: ✓ Completed\n"));
        assert!(output.contains("  - Wrap-up `step:s2`: ○ Not Started **◀**"));
    }
}
