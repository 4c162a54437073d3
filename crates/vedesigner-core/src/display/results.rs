//! Result wrapper types for displaying wizard outcomes.

use std::fmt;

use serde_json::Value;

use crate::{
    form::{PageKind, ValidationErrors},
    models::Plan,
    navigation::Route,
    wizard::{SaveOutcome, Transition},
};

/// Wrapper type for displaying a newly created plan.
///
/// ```rust
/// use vedesigner_core::{display::CreateResult, models::Plan};
///
/// let output = CreateResult::new(Plan::empty("p1")).to_string();
/// assert!(output.starts_with("Created plan with ID: p1"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created plan with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// A page's current values, as shown before editing.
pub struct PageView {
    pub plan_id: String,
    pub page: PageKind,
    /// JSON edit representation of the page form
    pub values: Value,
    /// `(username, label)` pairs for pages with one row per partner
    pub partners: Vec<(String, String)>,
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} (`{}`)", self.page.title(), self.page)?;
        writeln!(f)?;
        writeln!(f, "- **Plan**: {}", self.plan_id)?;
        writeln!(f)?;

        if !self.partners.is_empty() {
            writeln!(f, "## Partners")?;
            writeln!(f)?;
            for (username, label) in &self.partners {
                writeln!(f, "- {label} (`{username}`)")?;
            }
            writeln!(f)?;
        }

        let values = serde_json::to_string_pretty(&self.values).map_err(|_| fmt::Error)?;
        writeln!(f, "```json")?;
        writeln!(f, "{values}")?;
        writeln!(f, "```")
    }
}

/// Wrapper type for displaying the outcome of a page submit.
pub struct SubmitResult<'a> {
    pub page: &'a PageKind,
    pub transition: &'a Transition,
}

impl fmt::Display for SubmitResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.transition.saved {
            SaveOutcome::Saved => writeln!(f, "Saved page `{}`.", self.page)?,
            SaveOutcome::Failed(notice) => {
                writeln!(f, "Could not save page `{}`: {notice}", self.page)?
            }
        }
        writeln!(f)?;
        match &self.transition.route {
            Route::Step(step) => writeln!(f, "Next: {} (`{}`)", step.display_name, step.link),
            Route::Finish => writeln!(f, "Next: finish, all steps are planned."),
            Route::Overview => writeln!(f, "Next: back to the plan overview."),
            other => writeln!(f, "Next: `{other}`"),
        }
    }
}

/// Wrapper type for displaying a rejected submit.
pub struct ValidationReport<'a>(pub &'a ValidationErrors);

impl fmt::Display for ValidationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The page was not saved. Please correct:")?;
        writeln!(f)?;
        for (path, messages) in self.0.iter() {
            for message in messages {
                writeln!(f, "- `{path}` {message}")?;
            }
        }
        Ok(())
    }
}
