//! Pages with exactly one row per partner.
//!
//! Rows are keyed by username. Loading aligns the stored rows with the
//! plan's current partners: every partner gets a row (an existing one when
//! the username matches), rows of former partners are dropped. A plan
//! without any partner keeps its stored rows untouched.

use serde::{Deserialize, Serialize};

use super::FormBinding;
use crate::{
    editor::{RowFloor, RowList},
    error::Result,
    form::{FieldPath, ValidationErrors},
    models::{Evaluation, FieldUpdate, FormalCondition, Plan, PlanField},
};

fn align_with_partners<T: Clone + Default>(
    plan: &Plan,
    stored: &[T],
    username: impl Fn(&T) -> &str,
    empty: impl Fn(&str) -> T,
) -> RowList<T> {
    let partners = plan.partners();
    if partners.is_empty() {
        return RowList::from_values(stored.iter().cloned(), RowFloor::None);
    }
    let rows = partners.iter().map(|partner| {
        stored
            .iter()
            .find(|row| username(row) == partner.as_str())
            .cloned()
            .unwrap_or_else(|| empty(partner.as_str()))
    });
    RowList::from_values(rows, RowFloor::None)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormalConditionsForm {
    #[serde(default)]
    pub formal_conditions: RowList<FormalCondition>,
}

impl FormalConditionsForm {
    pub fn load(plan: &Plan) -> Self {
        Self {
            formal_conditions: align_with_partners(
                plan,
                &plan.formal_conditions,
                |row| row.username.as_str(),
                |partner| FormalCondition::for_partner(partner),
            ),
        }
    }
}

impl FormBinding for FormalConditionsForm {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for row in self.formal_conditions.rows() {
            errors.long_text(
                FieldPath::row("formal_conditions", row.id, "notes"),
                &row.value.notes,
            );
        }
        errors.into_result()
    }

    fn serialize(&self, _plan: &Plan) -> Result<Vec<FieldUpdate>> {
        Ok(vec![FieldUpdate::from_serialize(
            PlanField::FormalConditions,
            &self.formal_conditions.values(),
        )?])
    }

    fn is_empty(&self) -> bool {
        self.formal_conditions.iter().all(FormalCondition::is_unanswered)
    }

    fn normalize(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationForm {
    #[serde(default)]
    pub evaluation: RowList<Evaluation>,
}

impl EvaluationForm {
    pub fn load(plan: &Plan) -> Self {
        Self {
            evaluation: align_with_partners(
                plan,
                &plan.evaluation,
                |row| row.username.as_str(),
                |partner| Evaluation::for_partner(partner),
            ),
        }
    }
}

impl FormBinding for EvaluationForm {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for row in self.evaluation.rows() {
            let path = |column: &str| FieldPath::row("evaluation", row.id, column);
            let evaluation = &row.value;
            errors.short_text(path("task_type"), &evaluation.task_type);
            errors.short_text(path("assessment_type"), &evaluation.assessment_type);
            errors.long_text(path("evaluation_while"), &evaluation.evaluation_while);
            errors.long_text(path("evaluation_after"), &evaluation.evaluation_after);
        }
        errors.into_result()
    }

    fn serialize(&self, _plan: &Plan) -> Result<Vec<FieldUpdate>> {
        Ok(vec![FieldUpdate::from_serialize(
            PlanField::Evaluation,
            &self.evaluation.values(),
        )?])
    }

    fn is_empty(&self) -> bool {
        self.evaluation.iter().all(Evaluation::is_unanswered)
    }

    fn normalize(&mut self) {}
}
