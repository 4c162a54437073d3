//! Page kinds and the per-page form variants.

use std::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::ValidationErrors;
use crate::{
    error::{PlannerError, Result},
    models::{Evaluation, FieldUpdate, FormalCondition, Institution, Lecture, Plan},
    navigation::StepKeyScheme,
};

mod general;
mod partners;
mod records;
mod steps;

pub use general::{LearningEnvForm, MobilityRow, NameForm};
pub use partners::{EvaluationForm, FormalConditionsForm};
pub use records::{InstitutionsForm, LecturesForm, TargetGroupRow, TargetGroupsForm};
pub use steps::{StepForm, StepNamesForm, StepRow, TaskRow};

/// Behaviour shared by every page's form values.
pub trait FormBinding {
    /// Field-level validation of the current values.
    fn validate(&self) -> std::result::Result<(), ValidationErrors>;

    /// Converts the values into the page's field updates. `plan` is the
    /// document the form was loaded from; pages that edit part of a nested
    /// field need it to preserve what they do not own.
    fn serialize(&self, plan: &Plan) -> Result<Vec<FieldUpdate>>;

    /// True when every field of the page is blank.
    fn is_empty(&self) -> bool;

    /// Re-applies row floors after values arrived from outside (JSON).
    fn normalize(&mut self);
}

/// A page of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageKind {
    Name,
    Institutions,
    Lectures,
    TargetGroups,
    LearningEnv,
    FormalConditions,
    Evaluation,
    /// The step list; also the page before the first fine-planning step.
    StepNames,
    /// Fine planning of one step, keyed by step id (or, for legacy plans,
    /// display name).
    Step(String),
}

/// Pages with a fixed position, in wizard order.
pub const STATIC_PAGES: [PageKind; 8] = [
    PageKind::Name,
    PageKind::Institutions,
    PageKind::Lectures,
    PageKind::TargetGroups,
    PageKind::LearningEnv,
    PageKind::FormalConditions,
    PageKind::Evaluation,
    PageKind::StepNames,
];

impl PageKind {
    /// URL slug of the page.
    pub fn slug(&self) -> &str {
        match self {
            PageKind::Name => "name",
            PageKind::Institutions => "institutions",
            PageKind::Lectures => "lectures",
            PageKind::TargetGroups => "target-groups",
            PageKind::LearningEnv => "learning-env",
            PageKind::FormalConditions => "formal-conditions",
            PageKind::Evaluation => "evaluation",
            PageKind::StepNames => "step-names",
            PageKind::Step(_) => "step",
        }
    }

    /// Human readable page title.
    pub fn title(&self) -> &str {
        match self {
            PageKind::Name => "Project name",
            PageKind::Institutions => "Institutions",
            PageKind::Lectures => "Lectures",
            PageKind::TargetGroups => "Target groups",
            PageKind::LearningEnv => "Learning environment",
            PageKind::FormalConditions => "Formal conditions",
            PageKind::Evaluation => "Evaluation",
            PageKind::StepNames => "Steps",
            PageKind::Step(_) => "Fine planning",
        }
    }

    /// Key of the page's progress entry and navigation position in `plan`.
    ///
    /// Static pages use their slug. A step page resolves its key to the
    /// step's current key under `scheme`, so a page opened by display name
    /// records progress under the server id once the step has one.
    pub fn progress_key(&self, plan: &Plan, scheme: StepKeyScheme) -> String {
        match self {
            PageKind::Step(key) => plan
                .find_step(key)
                .map_or_else(|| key.clone(), |(_, step)| scheme.step_key(step).to_string()),
            other => other.slug().to_string(),
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKind::Step(key) => write!(f, "step:{key}"),
            other => f.write_str(other.slug()),
        }
    }
}

impl FromStr for PageKind {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(key) = s.strip_prefix("step:") {
            if key.trim().is_empty() {
                return Err(PlannerError::invalid_input("page").with_reason("empty step key"));
            }
            return Ok(PageKind::Step(key.to_string()));
        }
        STATIC_PAGES
            .iter()
            .find(|page| page.slug() == s)
            .cloned()
            .ok_or_else(|| {
                PlannerError::invalid_input("page").with_reason(format!("unknown page '{s}'"))
            })
    }
}

impl Serialize for PageKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PageKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

fn parse<T: DeserializeOwned>(kind: &PageKind, value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| PlannerError::invalid_input(kind.slug()).with_reason(e.to_string()))
}

/// Record rows share their type with the wire model, which has to accept
/// whatever extra keys the backend stores. Page input is held to the keys
/// the row actually has.
fn reject_unknown_row_keys<T: Default + Serialize>(
    kind: &PageKind,
    value: &Value,
    field: &str,
) -> Result<()> {
    let Value::Object(known) = serde_json::to_value(T::default())? else {
        return Ok(());
    };
    let Some(Value::Array(rows)) = value.get(field) else {
        return Ok(());
    };
    for (index, row) in rows.iter().enumerate() {
        let Value::Object(row) = row else {
            continue;
        };
        if let Some(key) = row.keys().find(|key| !known.contains_key(key.as_str())) {
            return Err(PlannerError::invalid_input(kind.slug())
                .with_reason(format!("unknown field `{key}` in {field}[{index}]")));
        }
    }
    Ok(())
}

/// Form values of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageForm {
    Name(NameForm),
    Institutions(InstitutionsForm),
    Lectures(LecturesForm),
    TargetGroups(TargetGroupsForm),
    LearningEnv(LearningEnvForm),
    FormalConditions(FormalConditionsForm),
    Evaluation(EvaluationForm),
    StepNames(StepNamesForm),
    Step(StepForm),
}

impl PageForm {
    /// Seeds the form of `kind` from the plan.
    pub fn load(kind: &PageKind, plan: &Plan) -> Result<PageForm> {
        Ok(match kind {
            PageKind::Name => PageForm::Name(NameForm::load(plan)),
            PageKind::Institutions => PageForm::Institutions(InstitutionsForm::load(plan)),
            PageKind::Lectures => PageForm::Lectures(LecturesForm::load(plan)),
            PageKind::TargetGroups => PageForm::TargetGroups(TargetGroupsForm::load(plan)),
            PageKind::LearningEnv => PageForm::LearningEnv(LearningEnvForm::load(plan)),
            PageKind::FormalConditions => {
                PageForm::FormalConditions(FormalConditionsForm::load(plan))
            }
            PageKind::Evaluation => PageForm::Evaluation(EvaluationForm::load(plan)),
            PageKind::StepNames => PageForm::StepNames(StepNamesForm::load(plan)),
            PageKind::Step(key) => PageForm::Step(StepForm::load(plan, key)?),
        })
    }

    /// Parses values of `kind` from their JSON edit representation.
    ///
    /// Unknown keys are rejected so that a misspelled field can never be
    /// read as a blank one and overwrite stored data.
    ///
    /// # Errors
    ///
    /// * `PlannerError::InvalidInput` - When the values do not match the page
    pub fn from_json(kind: &PageKind, value: Value) -> Result<PageForm> {
        let mut form = match kind {
            PageKind::Name => PageForm::Name(parse(kind, value)?),
            PageKind::Institutions => {
                reject_unknown_row_keys::<Institution>(kind, &value, "institutions")?;
                PageForm::Institutions(parse(kind, value)?)
            }
            PageKind::Lectures => {
                reject_unknown_row_keys::<Lecture>(kind, &value, "lectures")?;
                PageForm::Lectures(parse(kind, value)?)
            }
            PageKind::TargetGroups => PageForm::TargetGroups(parse(kind, value)?),
            PageKind::LearningEnv => PageForm::LearningEnv(parse(kind, value)?),
            PageKind::FormalConditions => {
                reject_unknown_row_keys::<FormalCondition>(kind, &value, "formal_conditions")?;
                PageForm::FormalConditions(parse(kind, value)?)
            }
            PageKind::Evaluation => {
                reject_unknown_row_keys::<Evaluation>(kind, &value, "evaluation")?;
                PageForm::Evaluation(parse(kind, value)?)
            }
            PageKind::StepNames => PageForm::StepNames(parse(kind, value)?),
            PageKind::Step(key) => {
                let mut form: StepForm = parse(kind, value)?;
                form.key = key.clone();
                PageForm::Step(form)
            }
        };
        form.binding_mut().normalize();
        Ok(form)
    }

    /// JSON edit representation of the values.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn kind(&self) -> PageKind {
        match self {
            PageForm::Name(_) => PageKind::Name,
            PageForm::Institutions(_) => PageKind::Institutions,
            PageForm::Lectures(_) => PageKind::Lectures,
            PageForm::TargetGroups(_) => PageKind::TargetGroups,
            PageForm::LearningEnv(_) => PageKind::LearningEnv,
            PageForm::FormalConditions(_) => PageKind::FormalConditions,
            PageForm::Evaluation(_) => PageKind::Evaluation,
            PageForm::StepNames(_) => PageKind::StepNames,
            PageForm::Step(form) => PageKind::Step(form.key.clone()),
        }
    }

    fn binding(&self) -> &dyn FormBinding {
        match self {
            PageForm::Name(form) => form,
            PageForm::Institutions(form) => form,
            PageForm::Lectures(form) => form,
            PageForm::TargetGroups(form) => form,
            PageForm::LearningEnv(form) => form,
            PageForm::FormalConditions(form) => form,
            PageForm::Evaluation(form) => form,
            PageForm::StepNames(form) => form,
            PageForm::Step(form) => form,
        }
    }

    fn binding_mut(&mut self) -> &mut dyn FormBinding {
        match self {
            PageForm::Name(form) => form,
            PageForm::Institutions(form) => form,
            PageForm::Lectures(form) => form,
            PageForm::TargetGroups(form) => form,
            PageForm::LearningEnv(form) => form,
            PageForm::FormalConditions(form) => form,
            PageForm::Evaluation(form) => form,
            PageForm::StepNames(form) => form,
            PageForm::Step(form) => form,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        self.binding().validate()
    }

    pub fn serialize(&self, plan: &Plan) -> Result<Vec<FieldUpdate>> {
        self.binding().serialize(plan)
    }

    pub fn is_empty(&self) -> bool {
        self.binding().is_empty()
    }
}
