//! Plan identifiers, field names and partial updates.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{PlannerError, Result};

/// Opaque, backend-assigned plan identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(String);

impl PlanId {
    /// Creates an id from any non-blank string.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(PlannerError::MissingPlanId);
        }
        Ok(Self(id.trim().to_string()))
    }

    /// Resolves the plan id handed over by the routing context.
    ///
    /// An absent or blank id is [`PlannerError::MissingPlanId`], which the
    /// wizard answers with a redirect to the plan overview instead of a
    /// fetch.
    pub fn from_route(planner_id: Option<&str>) -> Result<Self> {
        match planner_id {
            Some(id) => Self::new(id),
            None => Err(PlannerError::MissingPlanId),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The independently writable slots of a plan document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanField {
    Name,
    Institutions,
    Lectures,
    Audience,
    Languages,
    LearningEnv,
    Realization,
    PhysicalMobility,
    PhysicalMobilities,
    FormalConditions,
    Evaluation,
    Steps,
    Progress,
}

impl PlanField {
    /// Every writable field, in document order.
    pub const ALL: [PlanField; 13] = [
        PlanField::Name,
        PlanField::Institutions,
        PlanField::Lectures,
        PlanField::Audience,
        PlanField::Languages,
        PlanField::LearningEnv,
        PlanField::Realization,
        PlanField::PhysicalMobility,
        PlanField::PhysicalMobilities,
        PlanField::FormalConditions,
        PlanField::Evaluation,
        PlanField::Steps,
        PlanField::Progress,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanField::Name => "name",
            PlanField::Institutions => "institutions",
            PlanField::Lectures => "lectures",
            PlanField::Audience => "audience",
            PlanField::Languages => "languages",
            PlanField::LearningEnv => "learning_env",
            PlanField::Realization => "realization",
            PlanField::PhysicalMobility => "physical_mobility",
            PlanField::PhysicalMobilities => "physical_mobilities",
            PlanField::FormalConditions => "formal_conditions",
            PlanField::Evaluation => "evaluation",
            PlanField::Steps => "steps",
            PlanField::Progress => "progress",
        }
    }

    /// The value a freshly created plan holds in this field.
    pub fn empty_value(&self) -> Value {
        match self {
            PlanField::Name | PlanField::LearningEnv | PlanField::Realization => json!(""),
            PlanField::PhysicalMobility => Value::Null,
            PlanField::Progress => json!({}),
            PlanField::Institutions
            | PlanField::Lectures
            | PlanField::Audience
            | PlanField::Languages
            | PlanField::PhysicalMobilities
            | PlanField::FormalConditions
            | PlanField::Evaluation
            | PlanField::Steps => json!([]),
        }
    }
}

impl FromStr for PlanField {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        PlanField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                PlannerError::invalid_input("field_name")
                    .with_reason(format!("unknown field '{s}'"))
            })
    }
}

impl fmt::Display for PlanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a partial plan update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    #[serde(rename = "field_name")]
    pub field: PlanField,
    pub value: Value,
}

impl FieldUpdate {
    pub fn new(field: PlanField, value: Value) -> Self {
        Self { field, value }
    }

    /// Serializes `value` into an update for `field`.
    pub fn from_serialize<T: Serialize>(field: PlanField, value: &T) -> Result<Self> {
        Ok(Self {
            field,
            value: serde_json::to_value(value)?,
        })
    }
}
