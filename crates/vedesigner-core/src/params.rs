//! Parameter structures shared by the CLI and the MCP server.
//!
//! These carry plain strings and JSON so that each front end can add its own
//! derives (clap, schemars) without the core depending on them. Parsing into
//! typed values ([`PageKind`], [`Direction`]) happens here, once.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::Result, form::PageKind, wizard::Direction};

/// Parameters for operations on a whole plan.
///
/// Used for show_plan and show_progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PlanRef {
    /// ID of the plan
    pub plan_id: String,
}

/// Parameters for creating a new plan in the local store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreatePlan {
    /// Name of the plan; may be left empty and filled in on the first page
    #[serde(default)]
    pub name: String,
}

/// Parameters for loading one wizard page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ShowPage {
    /// ID of the plan
    pub plan_id: String,
    /// Page slug ('name', 'institutions', 'lectures', 'target-groups',
    /// 'learning-env', 'formal-conditions', 'evaluation', 'step-names') or
    /// 'step:<step id>'
    pub page: String,
}

impl ShowPage {
    /// Parses the page reference.
    ///
    /// # Errors
    ///
    /// * `PlannerError::InvalidInput` - When the page is unknown
    pub fn page_kind(&self) -> Result<PageKind> {
        self.page.parse()
    }
}

/// Parameters for submitting a wizard page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SubmitPage {
    /// ID of the plan
    pub plan_id: String,
    /// Page reference, as for show_page
    pub page: String,
    /// The page's values in the shape show_page returns them
    pub values: Value,
    /// Where to go after saving: 'next' (default), 'prev' or 'stay'
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

impl SubmitPage {
    /// Parses the page reference and direction.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vedesigner_core::{form::PageKind, params::SubmitPage, wizard::Direction};
    ///
    /// let params = SubmitPage {
    ///     plan_id: "p1".to_string(),
    ///     page: "step:s1".to_string(),
    ///     values: serde_json::json!({}),
    ///     direction: Some("back".to_string()),
    /// };
    /// let (page, direction) = params.validate()?;
    /// assert_eq!(page, PageKind::Step("s1".to_string()));
    /// assert_eq!(direction, Direction::Prev);
    /// # Ok::<(), vedesigner_core::PlannerError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// * `PlannerError::InvalidInput` - When the page or direction is unknown
    pub fn validate(&self) -> Result<(PageKind, Direction)> {
        parse_target(&self.page, self.direction.as_deref())
    }
}

/// Parameters for asking where a navigation action leads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Navigate {
    /// ID of the plan
    pub plan_id: String,
    /// Page reference, as for show_page
    pub page: String,
    /// 'next' (default), 'prev' or 'stay'
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

impl Navigate {
    /// Parses the page reference and direction.
    ///
    /// # Errors
    ///
    /// * `PlannerError::InvalidInput` - When the page or direction is unknown
    pub fn validate(&self) -> Result<(PageKind, Direction)> {
        parse_target(&self.page, self.direction.as_deref())
    }
}

fn parse_target(page: &str, direction: Option<&str>) -> Result<(PageKind, Direction)> {
    let page = page.parse()?;
    let direction = match direction {
        Some(direction) => direction.parse()?,
        None => Direction::default(),
    };
    Ok((page, direction))
}

/// Parameters for importing profile institutions into a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ImportInstitutions {
    /// ID of the plan
    pub plan_id: String,
    /// Zero-based indexes into the profile's institutions
    #[serde(default)]
    pub select: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::PlannerError;

    #[test]
    fn test_submit_page_defaults_to_next() {
        let params: SubmitPage = serde_json::from_value(json!({
            "plan_id": "p1",
            "page": "lectures",
            "values": {"lectures": []}
        }))
        .unwrap();
        let (page, direction) = params.validate().unwrap();
        assert_eq!(page, PageKind::Lectures);
        assert_eq!(direction, Direction::Next);
    }

    #[test]
    fn test_submit_page_rejects_unknown_page() {
        let params = SubmitPage {
            plan_id: "p1".to_string(),
            page: "summary".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(PlannerError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_show_page_parses_step_reference() {
        let params = ShowPage {
            plan_id: "p1".to_string(),
            page: "step:abc".to_string(),
        };
        assert_eq!(params.page_kind().unwrap(), PageKind::Step("abc".to_string()));
    }
}
