//! The step list and the per-step fine-planning pages.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::FormBinding;
use crate::{
    editor::{BlankRow, RowFloor, RowList},
    error::{PlannerError, Result},
    form::{
        dates::{to_form_date, to_wire_date},
        rows::{from_rows, to_rows},
        FieldPath, NameRow, ValidationErrors,
    },
    models::{is_blank, FieldUpdate, Plan, PlanField, Step, Task},
};

/// One entry of the step list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepRow {
    /// Carried through so an edited step keeps its identity
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name an id-less step was loaded with, so a rename still finds its
    /// fine planning
    #[serde(rename = "_origin", default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub workload: Option<u32>,
    #[serde(default)]
    pub timestamp_from: String,
    #[serde(default)]
    pub timestamp_to: String,
    #[serde(default)]
    pub learning_goal: String,
}

impl BlankRow for StepRow {
    fn is_blank(&self) -> bool {
        is_blank(&self.name)
            && self.workload.is_none()
            && is_blank(&self.timestamp_from)
            && is_blank(&self.timestamp_to)
            && is_blank(&self.learning_goal)
    }
}

impl From<&Step> for StepRow {
    fn from(step: &Step) -> Self {
        Self {
            id: step.id.clone(),
            origin: step.id.is_none().then(|| step.name.clone()),
            name: step.name.clone(),
            workload: (step.workload > 0).then_some(step.workload),
            timestamp_from: to_form_date(step.timestamp_from.as_deref()),
            timestamp_to: to_form_date(step.timestamp_to.as_deref()),
            learning_goal: step.learning_goal.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepNamesForm {
    #[serde(default)]
    pub steps: RowList<StepRow>,
}

impl StepNamesForm {
    pub fn load(plan: &Plan) -> Self {
        Self {
            steps: RowList::from_values(plan.steps.iter().map(StepRow::from), RowFloor::One),
        }
    }

    /// The stored step a row edits: same id, or for an id-less row the
    /// id-less step it was loaded from. Rows without an origin fall back to
    /// their current name unless another row already carries that step.
    fn existing<'a>(
        row: &StepRow,
        plan: &'a Plan,
        claimed: &BTreeSet<&str>,
    ) -> Option<&'a Step> {
        let mut unsaved = plan.steps.iter().filter(|step| step.id.is_none());
        match (&row.id, &row.origin) {
            (Some(id), _) => plan.steps.iter().find(|step| step.id.as_ref() == Some(id)),
            (None, Some(origin)) => unsaved.find(|step| &step.name == origin),
            (None, None) => unsaved.find(|step| {
                step.name == row.name.trim() && !claimed.contains(step.name.as_str())
            }),
        }
    }
}

impl FormBinding for StepNamesForm {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        for row in self.steps.rows() {
            let path = |column: &str| FieldPath::row("steps", row.id, column);
            let step = &row.value;
            errors.short_text(path("name"), &step.name);
            errors.number(path("workload"), step.workload);
            errors.date_range(
                path("timestamp_from"),
                &step.timestamp_from,
                path("timestamp_to"),
                &step.timestamp_to,
            );
            errors.long_text(path("learning_goal"), &step.learning_goal);
            if step.is_blank() {
                continue;
            }
            errors.required(path("name"), &step.name);
            let name = step.name.trim().to_string();
            if !name.is_empty() {
                let count = seen.entry(name).or_default();
                *count += 1;
                if *count > 1 {
                    errors.add(path("name"), "must be unique");
                }
            }
        }
        errors.into_result()
    }

    fn serialize(&self, plan: &Plan) -> Result<Vec<FieldUpdate>> {
        let claimed: BTreeSet<&str> = self
            .steps
            .filled()
            .filter_map(|row| row.origin.as_deref())
            .collect();
        let steps: Vec<Step> = self
            .steps
            .filled()
            .map(|row| {
                let base = Self::existing(row, plan, &claimed).cloned().unwrap_or_default();
                Step {
                    id: row.id.clone().or(base.id),
                    name: row.name.trim().to_string(),
                    workload: row.workload.unwrap_or(0),
                    timestamp_from: to_wire_date(&row.timestamp_from),
                    timestamp_to: to_wire_date(&row.timestamp_to),
                    learning_goal: row.learning_goal.trim().to_string(),
                    ..base
                }
            })
            .collect();
        Ok(vec![FieldUpdate::from_serialize(PlanField::Steps, &steps)?])
    }

    fn is_empty(&self) -> bool {
        self.steps.all_blank()
    }

    fn normalize(&mut self) {
        self.steps.set_floor(RowFloor::One);
    }
}

/// A task in edit representation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskRow {
    #[serde(default)]
    pub task_formulation: String,
    #[serde(default)]
    pub work_mode: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tools: RowList<NameRow>,
    #[serde(default)]
    pub materials: RowList<NameRow>,
}

impl TaskRow {
    fn apply_floors(&mut self) {
        self.tools.set_floor(RowFloor::One);
        self.materials.set_floor(RowFloor::One);
    }
}

impl BlankRow for TaskRow {
    fn is_blank(&self) -> bool {
        is_blank(&self.task_formulation)
            && is_blank(&self.work_mode)
            && is_blank(&self.notes)
            && self.tools.all_blank()
            && self.materials.all_blank()
    }
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            task_formulation: task.task_formulation.clone(),
            work_mode: task.work_mode.clone(),
            notes: task.notes.clone(),
            tools: to_rows(&task.tools, RowFloor::One),
            materials: to_rows(&task.materials, RowFloor::One),
        }
    }
}

impl From<&TaskRow> for Task {
    fn from(row: &TaskRow) -> Self {
        Self {
            task_formulation: row.task_formulation.trim().to_string(),
            work_mode: row.work_mode.trim().to_string(),
            notes: row.notes.trim().to_string(),
            tools: from_rows(&row.tools),
            materials: from_rows(&row.materials),
        }
    }
}

/// Fine planning of one step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepForm {
    /// Key the page was opened with
    #[serde(skip)]
    pub key: String,
    /// Shown as the page heading; renamed on the step list only
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub learning_activity: String,
    #[serde(default)]
    pub has_tasks: bool,
    #[serde(default)]
    pub tasks: RowList<TaskRow>,
}

impl StepForm {
    pub fn load(plan: &Plan, key: &str) -> Result<Self> {
        let (_, step) = plan
            .find_step(key)
            .ok_or_else(|| PlannerError::StepNotFound {
                key: key.to_string(),
            })?;
        Ok(Self {
            key: key.to_string(),
            name: step.name.clone(),
            learning_activity: step.learning_activity.clone(),
            has_tasks: step.has_tasks,
            tasks: RowList::from_values(step.tasks.iter().map(TaskRow::from), RowFloor::One),
        })
    }
}

impl FormBinding for StepForm {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.long_text(FieldPath::field("learning_activity"), &self.learning_activity);
        for row in self.tasks.rows() {
            let path = |column: &str| FieldPath::row("tasks", row.id, column);
            let task = &row.value;
            errors.long_text(path("task_formulation"), &task.task_formulation);
            errors.short_text(path("work_mode"), &task.work_mode);
            errors.long_text(path("notes"), &task.notes);
            for (column, list) in [("tools", &task.tools), ("materials", &task.materials)] {
                for item in list.rows() {
                    errors.short_text(
                        FieldPath::nested(&path(column), item.id, "name"),
                        &item.value.name,
                    );
                }
            }
        }
        errors.into_result()
    }

    /// Replaces the edited step inside the full step list; every other step
    /// is sent back unchanged.
    fn serialize(&self, plan: &Plan) -> Result<Vec<FieldUpdate>> {
        let (index, _) = plan
            .find_step(&self.key)
            .ok_or_else(|| PlannerError::StepNotFound {
                key: self.key.clone(),
            })?;
        let mut steps = plan.steps.clone();
        let step = &mut steps[index];
        step.learning_activity = self.learning_activity.trim().to_string();
        step.has_tasks = self.has_tasks;
        step.tasks = if self.has_tasks {
            self.tasks.filled().map(Task::from).collect()
        } else {
            Vec::new()
        };
        Ok(vec![FieldUpdate::from_serialize(PlanField::Steps, &steps)?])
    }

    fn is_empty(&self) -> bool {
        is_blank(&self.learning_activity) && !self.has_tasks && self.tasks.all_blank()
    }

    fn normalize(&mut self) {
        self.tasks.set_floor(RowFloor::One);
        self.tasks.iter_mut().for_each(TaskRow::apply_floors);
    }
}
