//! Markdown presentation of plans and wizard outcomes.
//!
//! Domain models implement [`std::fmt::Display`] directly (see
//! [`models`]); everything that needs more context than a single model,
//! such as a page with its partners or the outcome of a submit, gets a
//! wrapper type here.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Plan, Step,    │    │ PlanList,       │    │    Markdown     │
//! │  Transition ... │───▶│ PageView ...    │───▶│  (terminal/MCP) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: [`PlanList`], [`ProgressSidebar`]
//! - [`results`]: [`CreateResult`], [`PageView`], [`SubmitResult`],
//!   [`ValidationReport`]
//! - [`status`]: [`OperationStatus`]
//! - [`datetime`]: [`PlanTimestamp`]
//!
//! ```rust
//! use vedesigner_core::display::OperationStatus;
//!
//! println!("{}", OperationStatus::success("Plan saved"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{PlanList, ProgressSidebar, SidebarEntry};
pub use datetime::PlanTimestamp;
pub use results::{CreateResult, PageView, SubmitResult, ValidationReport};
pub use status::OperationStatus;
