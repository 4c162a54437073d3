//! Single-value pages: project name and learning environment.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::FormBinding;
use crate::{
    editor::{BlankRow, RowFloor, RowList},
    error::Result,
    form::{
        dates::{to_form_date, to_wire_date},
        FieldPath, ValidationErrors,
    },
    models::{is_blank, FieldUpdate, PhysicalMobility, Plan, PlanField},
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameForm {
    #[serde(default)]
    pub name: String,
}

impl NameForm {
    pub fn load(plan: &Plan) -> Self {
        Self {
            name: plan.name.clone(),
        }
    }
}

impl FormBinding for NameForm {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.short_text(FieldPath::field("name"), &self.name);
        errors.into_result()
    }

    fn serialize(&self, _plan: &Plan) -> Result<Vec<FieldUpdate>> {
        Ok(vec![FieldUpdate::new(PlanField::Name, json!(self.name.trim()))])
    }

    fn is_empty(&self) -> bool {
        is_blank(&self.name)
    }

    fn normalize(&mut self) {}
}

/// A physical meeting in edit representation (date-only strings).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MobilityRow {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub timestamp_from: String,
    #[serde(default)]
    pub timestamp_to: String,
}

impl BlankRow for MobilityRow {
    fn is_blank(&self) -> bool {
        is_blank(&self.location) && is_blank(&self.timestamp_from) && is_blank(&self.timestamp_to)
    }
}

impl From<&PhysicalMobility> for MobilityRow {
    fn from(mobility: &PhysicalMobility) -> Self {
        Self {
            location: mobility.location.clone(),
            timestamp_from: to_form_date(mobility.timestamp_from.as_deref()),
            timestamp_to: to_form_date(mobility.timestamp_to.as_deref()),
        }
    }
}

impl From<&MobilityRow> for PhysicalMobility {
    fn from(row: &MobilityRow) -> Self {
        Self {
            location: row.location.trim().to_string(),
            timestamp_from: to_wire_date(&row.timestamp_from),
            timestamp_to: to_wire_date(&row.timestamp_to),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LearningEnvForm {
    #[serde(default)]
    pub learning_env: String,
    /// Synchronous / asynchronous / mixed
    #[serde(default)]
    pub realization: String,
    #[serde(default)]
    pub physical_mobility: Option<bool>,
    #[serde(default)]
    pub physical_mobilities: RowList<MobilityRow>,
}

impl LearningEnvForm {
    pub fn load(plan: &Plan) -> Self {
        Self {
            learning_env: plan.learning_env.clone(),
            realization: plan.realization.clone(),
            physical_mobility: plan.physical_mobility,
            physical_mobilities: RowList::from_values(
                plan.physical_mobilities.iter().map(MobilityRow::from),
                RowFloor::One,
            ),
        }
    }
}

impl FormBinding for LearningEnvForm {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.long_text(FieldPath::field("learning_env"), &self.learning_env);
        errors.short_text(FieldPath::field("realization"), &self.realization);
        for row in self.physical_mobilities.rows() {
            let path = |column: &str| FieldPath::row("physical_mobilities", row.id, column);
            errors.short_text(path("location"), &row.value.location);
            errors.date_range(
                path("timestamp_from"),
                &row.value.timestamp_from,
                path("timestamp_to"),
                &row.value.timestamp_to,
            );
        }
        errors.into_result()
    }

    fn serialize(&self, _plan: &Plan) -> Result<Vec<FieldUpdate>> {
        let mobilities: Vec<PhysicalMobility> = if self.physical_mobility == Some(true) {
            self.physical_mobilities
                .filled()
                .map(PhysicalMobility::from)
                .collect()
        } else {
            Vec::new()
        };
        Ok(vec![
            FieldUpdate::new(PlanField::LearningEnv, json!(self.learning_env.trim())),
            FieldUpdate::new(PlanField::Realization, json!(self.realization.trim())),
            FieldUpdate::new(PlanField::PhysicalMobility, json!(self.physical_mobility)),
            FieldUpdate::from_serialize(PlanField::PhysicalMobilities, &mobilities)?,
        ])
    }

    fn is_empty(&self) -> bool {
        is_blank(&self.learning_env)
            && is_blank(&self.realization)
            && self.physical_mobility.is_none()
            && self.physical_mobilities.all_blank()
    }

    fn normalize(&mut self) {
        self.physical_mobilities.set_floor(RowFloor::One);
    }
}
