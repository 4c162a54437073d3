//! Pages editing lists of homogeneous records.

use serde::{Deserialize, Serialize};

use super::FormBinding;
use crate::{
    editor::{BlankRow, RowFloor, RowList},
    error::Result,
    form::{
        rows::{from_rows, to_rows},
        FieldPath, NameRow, ValidationErrors,
    },
    models::{is_blank, FieldUpdate, Institution, Lecture, Plan, PlanField, TargetGroup},
};

impl BlankRow for Institution {
    fn is_blank(&self) -> bool {
        Institution::is_blank(self)
    }
}

impl BlankRow for Lecture {
    fn is_blank(&self) -> bool {
        Lecture::is_blank(self)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstitutionsForm {
    #[serde(default)]
    pub institutions: RowList<Institution>,
}

impl InstitutionsForm {
    pub fn load(plan: &Plan) -> Self {
        Self {
            institutions: RowList::from_values(plan.institutions.iter().cloned(), RowFloor::One),
        }
    }
}

impl FormBinding for InstitutionsForm {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for row in self.institutions.rows() {
            let path = |column: &str| FieldPath::row("institutions", row.id, column);
            errors.short_text(path("name"), &row.value.name);
            errors.short_text(path("school_type"), &row.value.school_type);
            errors.short_text(path("country"), &row.value.country);
            errors.short_text(path("department"), &row.value.department);
        }
        errors.into_result()
    }

    fn serialize(&self, _plan: &Plan) -> Result<Vec<FieldUpdate>> {
        let institutions: Vec<&Institution> = self.institutions.filled().collect();
        Ok(vec![FieldUpdate::from_serialize(PlanField::Institutions, &institutions)?])
    }

    fn is_empty(&self) -> bool {
        self.institutions.all_blank()
    }

    fn normalize(&mut self) {
        self.institutions.set_floor(RowFloor::One);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LecturesForm {
    #[serde(default)]
    pub lectures: RowList<Lecture>,
}

impl LecturesForm {
    pub fn load(plan: &Plan) -> Self {
        Self {
            lectures: RowList::from_values(plan.lectures.iter().cloned(), RowFloor::One),
        }
    }
}

impl FormBinding for LecturesForm {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for row in self.lectures.rows() {
            let path = |column: &str| FieldPath::row("lectures", row.id, column);
            errors.short_text(path("name"), &row.value.name);
            errors.short_text(path("lecture_type"), &row.value.lecture_type);
            errors.short_text(path("lecture_format"), &row.value.lecture_format);
            errors.number(path("participants_amount"), row.value.participants_amount);
        }
        errors.into_result()
    }

    fn serialize(&self, _plan: &Plan) -> Result<Vec<FieldUpdate>> {
        let lectures: Vec<&Lecture> = self.lectures.filled().collect();
        Ok(vec![FieldUpdate::from_serialize(PlanField::Lectures, &lectures)?])
    }

    fn is_empty(&self) -> bool {
        self.lectures.all_blank()
    }

    fn normalize(&mut self) {
        self.lectures.set_floor(RowFloor::One);
    }
}

/// A target group in edit representation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetGroupRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age_min: Option<u32>,
    #[serde(default)]
    pub age_max: Option<u32>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub academic_course: String,
    #[serde(default)]
    pub languages: RowList<NameRow>,
}

impl BlankRow for TargetGroupRow {
    fn is_blank(&self) -> bool {
        is_blank(&self.name)
            && self.age_min.is_none()
            && self.age_max.is_none()
            && is_blank(&self.experience)
            && is_blank(&self.academic_course)
            && self.languages.all_blank()
    }
}

impl From<&TargetGroup> for TargetGroupRow {
    fn from(group: &TargetGroup) -> Self {
        Self {
            name: group.name.clone(),
            age_min: group.age_min,
            age_max: group.age_max,
            experience: group.experience.clone(),
            academic_course: group.academic_course.clone(),
            languages: to_rows(&group.languages, RowFloor::None),
        }
    }
}

impl From<&TargetGroupRow> for TargetGroup {
    fn from(row: &TargetGroupRow) -> Self {
        Self {
            name: row.name.trim().to_string(),
            age_min: row.age_min,
            age_max: row.age_max,
            experience: row.experience.trim().to_string(),
            academic_course: row.academic_course.trim().to_string(),
            languages: from_rows(&row.languages),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetGroupsForm {
    #[serde(default)]
    pub audience: RowList<TargetGroupRow>,
    /// Working languages of the whole exchange
    #[serde(default)]
    pub languages: RowList<NameRow>,
}

impl TargetGroupsForm {
    pub fn load(plan: &Plan) -> Self {
        Self {
            audience: RowList::from_values(
                plan.audience.iter().map(TargetGroupRow::from),
                RowFloor::One,
            ),
            languages: to_rows(&plan.languages, RowFloor::One),
        }
    }
}

impl FormBinding for TargetGroupsForm {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for row in self.audience.rows() {
            let path = |column: &str| FieldPath::row("audience", row.id, column);
            let group = &row.value;
            errors.short_text(path("name"), &group.name);
            errors.number_range(path("age_min"), group.age_min, path("age_max"), group.age_max);
            errors.long_text(path("experience"), &group.experience);
            errors.short_text(path("academic_course"), &group.academic_course);
            for language in group.languages.rows() {
                errors.short_text(
                    FieldPath::nested(&path("languages"), language.id, "name"),
                    &language.value.name,
                );
            }
        }
        for row in self.languages.rows() {
            errors.short_text(FieldPath::row("languages", row.id, "name"), &row.value.name);
        }
        errors.into_result()
    }

    fn serialize(&self, _plan: &Plan) -> Result<Vec<FieldUpdate>> {
        let audience: Vec<TargetGroup> = self.audience.filled().map(TargetGroup::from).collect();
        Ok(vec![
            FieldUpdate::from_serialize(PlanField::Audience, &audience)?,
            FieldUpdate::from_serialize(PlanField::Languages, &from_rows(&self.languages))?,
        ])
    }

    fn is_empty(&self) -> bool {
        self.audience.all_blank() && self.languages.all_blank()
    }

    fn normalize(&mut self) {
        self.audience.set_floor(RowFloor::One);
        self.languages.set_floor(RowFloor::One);
    }
}
