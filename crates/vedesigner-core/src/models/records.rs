//! Repeatable sub-records of a plan.
//!
//! All of these follow the same pattern: an ordered sequence of
//! homogeneous rows where a row with every field blank is a placeholder
//! rather than data.

use serde::{Deserialize, Serialize};

use super::{is_blank, nullable};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Institution {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub school_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub country: String,
    #[serde(default, deserialize_with = "nullable")]
    pub department: String,
}

impl Institution {
    pub fn is_blank(&self) -> bool {
        is_blank(&self.name)
            && is_blank(&self.school_type)
            && is_blank(&self.country)
            && is_blank(&self.department)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Lecture {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub lecture_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub lecture_format: String,
    #[serde(default)]
    pub participants_amount: Option<u32>,
}

impl Lecture {
    pub fn is_blank(&self) -> bool {
        is_blank(&self.name)
            && is_blank(&self.lecture_type)
            && is_blank(&self.lecture_format)
            && self.participants_amount.is_none()
    }
}

/// A group of learners taking part in the exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TargetGroup {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub age_min: Option<u32>,
    #[serde(default)]
    pub age_max: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub experience: String,
    #[serde(default, deserialize_with = "nullable")]
    pub academic_course: String,
    #[serde(default, deserialize_with = "nullable")]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PhysicalMobility {
    #[serde(default, deserialize_with = "nullable")]
    pub location: String,
    #[serde(default)]
    pub timestamp_from: Option<String>,
    #[serde(default)]
    pub timestamp_to: Option<String>,
}

/// Organisational preconditions at one partner's institution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FormalCondition {
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    #[serde(default)]
    pub technical_equipment: Option<bool>,
    #[serde(default)]
    pub exam_regulations: Option<bool>,
    #[serde(default)]
    pub group_size: Option<bool>,
    #[serde(default)]
    pub date: Option<bool>,
    #[serde(default)]
    pub classes_in_workload: Option<bool>,
    #[serde(default)]
    pub curriculum: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: String,
}

impl FormalCondition {
    /// Creates the empty row for a partner.
    pub fn for_partner(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    /// True when nothing besides the partner label is filled in.
    pub fn is_unanswered(&self) -> bool {
        [
            self.technical_equipment,
            self.exam_regulations,
            self.group_size,
            self.date,
            self.classes_in_workload,
            self.curriculum,
        ]
        .iter()
        .all(Option::is_none)
            && is_blank(&self.notes)
    }
}

/// How one partner evaluates the learners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Evaluation {
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    #[serde(default)]
    pub is_graded: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub task_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub assessment_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub evaluation_while: String,
    #[serde(default, deserialize_with = "nullable")]
    pub evaluation_after: String,
}

impl Evaluation {
    /// Creates the empty row for a partner.
    pub fn for_partner(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    /// True when nothing besides the partner label is filled in.
    pub fn is_unanswered(&self) -> bool {
        self.is_graded.is_none()
            && is_blank(&self.task_type)
            && is_blank(&self.assessment_type)
            && is_blank(&self.evaluation_while)
            && is_blank(&self.evaluation_after)
    }
}
