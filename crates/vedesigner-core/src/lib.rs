//! Core library of the VE-Designer plan wizard.
//!
//! A virtual exchange plan is one JSON document edited page by page. This
//! crate holds everything between that document and a front end:
//!
//! - [`models`]: the plan document and its records
//! - [`client`]: the [`PlanStore`] contract, implemented over the Plan API
//!   ([`ApiClient`]) and over a local SQLite file ([`LocalStore`])
//! - [`form`]: per-page load / validate / serialize / emptiness rules
//! - [`editor`]: editable row lists and the import dialog
//! - [`progress`]: completion markers
//! - [`navigation`]: page order and step routing
//! - [`wizard`]: the engine tying these together
//! - [`display`]: markdown output for terminals and assistants
//!
//! # Quick Start
//!
//! ```rust
//! use vedesigner_core::{form::PageKind, wizard::Direction, PageForm, WizardBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut wizard = WizardBuilder::new()
//!     .with_database_path(Some("plans.db"))
//!     .with_user(Some("alice"))
//!     .build()
//!     .await?;
//!
//! let plan = match wizard.store().as_local() {
//!     Some(local) => local.create_plan("Climate VE").await?,
//!     None => return Ok(()),
//! };
//!
//! let mut session = wizard.open(Some(&plan.id)).await?;
//! let mut form = session.page(&PageKind::Institutions)?;
//! if let PageForm::Institutions(page) = &mut form {
//!     if let Some(row) = page.institutions.get_mut(0) {
//!         row.name = "TU Berlin".to_string();
//!     }
//! }
//! let transition = session.submit(&form, Direction::Next).await?;
//! println!("continue at {}", transition.route);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod db;
pub mod display;
pub mod editor;
pub mod error;
pub mod form;
pub mod models;
pub mod navigation;
pub mod params;
pub mod progress;
pub mod wizard;

// Re-export commonly used types
pub use client::{ApiClient, Backend, LocalStore, PlanStore};
pub use db::Database;
pub use display::{CreateResult, OperationStatus, PageView, PlanList, ProgressSidebar};
pub use error::{ErrorOutcome, PlannerError, Result};
pub use form::{PageForm, PageKind};
pub use models::{FieldUpdate, Plan, PlanField, PlanId, Progress, ProgressState};
pub use navigation::{Route, StepKeyScheme, WizardRoutes};
pub use wizard::{Direction, Session, Transition, Wizard, WizardBuilder};
