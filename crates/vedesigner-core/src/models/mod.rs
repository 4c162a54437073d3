//! Data models mirroring the backend's plan document.
//!
//! The backend owns the JSON shape; these types only give it names. Every
//! slot of a [`Plan`] has a defined *empty* representation (see
//! [`PlanField::empty_value`]) and a fetched document that omits a slot, or
//! carries `null` in it, deserializes to exactly that empty value. The wizard
//! treats "empty" as "not yet filled in", which is distinct from a
//! validation error.
//!
//! Display implementations for these models live in
//! [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use vedesigner_core::models::{Plan, PlanField};
//!
//! let plan: Plan = serde_json::from_str(r#"{"_id": "p1", "institutions": null}"#)?;
//! assert!(plan.institutions.is_empty());
//! assert_eq!(PlanField::Institutions.empty_value(), serde_json::json!([]));
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Deserializer};

pub mod field;
pub mod plan;
pub mod profile;
pub mod progress;
pub mod records;
pub mod step;


pub use field::{FieldUpdate, PlanField, PlanId};
pub use plan::Plan;
pub use profile::UserSnippet;
pub use progress::{Progress, ProgressState, ProgressSummary};
pub use records::{Evaluation, FormalCondition, Institution, Lecture, PhysicalMobility, TargetGroup};
pub use step::{Step, Task};

/// Deserializes `null` as the type's default value.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// True when the string holds nothing but whitespace.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
