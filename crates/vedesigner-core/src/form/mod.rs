//! Form binding: plan document ⇄ editable page values.
//!
//! Every wizard page owns a subset of the plan's fields. Binding a page
//! means four things:
//!
//! 1. **load**: pick the page's fields out of a [`Plan`](crate::models::Plan)
//!    and convert them to their edit representation (string arrays become
//!    row lists, datetimes become date-only strings, required lists get one
//!    blank row);
//! 2. **validate**: field-level rules, collected into [`ValidationErrors`];
//! 3. **serialize**: the inverse conversion into the exact
//!    [`FieldUpdate`](crate::models::FieldUpdate) batch the store expects;
//! 4. **is_empty**: whether the page counts as "not started".
//!
//! [`PageForm`] is the tagged union over all page variants and the single
//! entry point the wizard engine uses.

pub mod dates;
pub mod pages;
pub mod rows;
pub mod validation;

#[cfg(test)]
mod tests;

pub use pages::{
    EvaluationForm, FormBinding, FormalConditionsForm, InstitutionsForm, LearningEnvForm,
    LecturesForm, MobilityRow, NameForm, PageForm, PageKind, StepForm, StepNamesForm, StepRow,
    TargetGroupRow, TargetGroupsForm, TaskRow, STATIC_PAGES,
};
pub use rows::NameRow;
pub use validation::{FieldPath, ValidationErrors};
