//! Plan document model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    nullable, Evaluation, FieldUpdate, FormalCondition, Institution, Lecture, PhysicalMobility,
    Progress, Step, TargetGroup,
};
use crate::error::{PlannerError, Result};

/// The root document a wizard session edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Plan {
    /// Backend-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Working title of the VE project
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    /// Username of the plan's creator
    #[serde(default, deserialize_with = "nullable")]
    pub author: String,

    #[serde(default, deserialize_with = "nullable")]
    pub read_access: Vec<String>,

    /// Co-authors allowed to edit the plan
    #[serde(default, deserialize_with = "nullable")]
    pub write_access: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub institutions: Vec<Institution>,

    #[serde(default, deserialize_with = "nullable")]
    pub lectures: Vec<Lecture>,

    /// Target groups
    #[serde(default, deserialize_with = "nullable")]
    pub audience: Vec<TargetGroup>,

    /// Working languages of the exchange
    #[serde(default, deserialize_with = "nullable")]
    pub languages: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub learning_env: String,

    #[serde(default, deserialize_with = "nullable")]
    pub realization: String,

    /// `None` until the question has been answered
    #[serde(default)]
    pub physical_mobility: Option<bool>,

    #[serde(default, deserialize_with = "nullable")]
    pub physical_mobilities: Vec<PhysicalMobility>,

    #[serde(default, deserialize_with = "nullable")]
    pub formal_conditions: Vec<FormalCondition>,

    #[serde(default, deserialize_with = "nullable")]
    pub evaluation: Vec<Evaluation>,

    /// Fine-planning steps in their display order
    #[serde(default, deserialize_with = "nullable")]
    pub steps: Vec<Step>,

    #[serde(default, deserialize_with = "nullable")]
    pub progress: Progress,
}

impl Plan {
    /// Creates a plan with every field empty.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// The plan's partners: the author followed by every co-author, without
    /// duplicates.
    pub fn partners(&self) -> Vec<String> {
        let mut partners: Vec<String> = Vec::new();
        for username in std::iter::once(&self.author).chain(&self.write_access) {
            if !username.trim().is_empty() && !partners.contains(username) {
                partners.push(username.clone());
            }
        }
        partners
    }

    /// Finds a step by its server id, falling back to its display name for
    /// documents written by the name-keyed wizard.
    pub fn find_step(&self, key: &str) -> Option<(usize, &Step)> {
        self.steps
            .iter()
            .enumerate()
            .find(|(_, step)| step.id.as_deref() == Some(key))
            .or_else(|| {
                self.steps
                    .iter()
                    .enumerate()
                    .find(|(_, step)| step.name == key)
            })
    }

    /// Returns a copy of the plan with the given updates applied.
    ///
    /// Used to keep a session's local copy in line with what was just sent
    /// to the backend.
    pub fn with_updates(&self, updates: &[FieldUpdate]) -> Result<Plan> {
        let mut document = serde_json::to_value(self)?;
        let Value::Object(map) = &mut document else {
            return Err(PlannerError::Configuration {
                message: "plan did not serialize to an object".to_string(),
            });
        };
        for update in updates {
            map.insert(update.field.as_str().to_string(), update.value.clone());
        }
        Ok(serde_json::from_value(document)?)
    }
}
