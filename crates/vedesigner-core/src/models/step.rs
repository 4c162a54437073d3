//! Fine-planning step and task models.

use serde::{Deserialize, Serialize};

use super::{is_blank, nullable};

/// A user-authored phase of the VE project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Step {
    /// Server-assigned identifier, absent until the step was first saved
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name, unique within a plan
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    /// Estimated workload in hours
    #[serde(default, deserialize_with = "nullable")]
    pub workload: u32,

    /// Start of the step's time window (ISO date or datetime)
    #[serde(default)]
    pub timestamp_from: Option<String>,

    /// End of the step's time window (ISO date or datetime)
    #[serde(default)]
    pub timestamp_to: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub learning_goal: String,

    #[serde(default, deserialize_with = "nullable")]
    pub learning_activity: String,

    #[serde(default, deserialize_with = "nullable")]
    pub has_tasks: bool,

    #[serde(default, deserialize_with = "nullable")]
    pub tasks: Vec<Task>,
}

impl Step {
    /// Key used for progress entries and navigation: the server id when
    /// present, otherwise the display name.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}

/// A task inside a step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Task {
    #[serde(default, deserialize_with = "nullable")]
    pub task_formulation: String,

    #[serde(default, deserialize_with = "nullable")]
    pub work_mode: String,

    #[serde(default, deserialize_with = "nullable")]
    pub notes: String,

    #[serde(default, deserialize_with = "nullable")]
    pub tools: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub materials: Vec<String>,
}

impl Task {
    pub fn is_blank(&self) -> bool {
        is_blank(&self.task_formulation)
            && is_blank(&self.work_mode)
            && is_blank(&self.notes)
            && self.tools.iter().all(|t| is_blank(t))
            && self.materials.iter().all(|m| is_blank(m))
    }
}
