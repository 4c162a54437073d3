//! Plan document stores.
//!
//! [`PlanStore`] is the contract the wizard consumes: fetch a plan, write a
//! batch of field updates, and look up profile data for partners and the
//! import dialog. Two implementations exist:
//!
//! - [`ApiClient`] talks to the VE-Designer backend over HTTP;
//! - [`LocalStore`] keeps plans in a local SQLite file, for offline drafting
//!   and for tests.
//!
//! [`Backend`] selects one of them at runtime.

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{FieldUpdate, Institution, Plan, PlanId, UserSnippet},
};

pub mod http;
pub mod local;
pub mod wire;

pub use http::ApiClient;
pub use local::LocalStore;

/// Storage contract of the wizard.
///
/// Every call is a single attempt; implementations never retry.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Short name used in log lines.
    fn backend_tag(&self) -> &'static str;

    /// Fetches the full plan document.
    ///
    /// Returns `PlannerError::PlanNotFound` for an unknown id.
    async fn fetch_plan(&self, id: &PlanId) -> Result<Plan>;

    /// Writes a batch of fields in one call. Fields not named in the batch
    /// are left untouched.
    async fn update_fields(&self, id: &PlanId, updates: &[FieldUpdate]) -> Result<()>;

    /// Writes a single field.
    async fn update_field(&self, id: &PlanId, update: &FieldUpdate) -> Result<()> {
        self.update_fields(id, std::slice::from_ref(update)).await
    }

    /// Display data for the given usernames. Unknown users are omitted.
    async fn profile_snippets(&self, usernames: &[String]) -> Result<Vec<UserSnippet>>;

    /// Institutions on the current user's profile.
    async fn profile_institutions(&self) -> Result<Vec<Institution>>;
}

/// A store selected at runtime.
pub enum Backend {
    Api(ApiClient),
    Local(LocalStore),
}

impl Backend {
    /// The local store, if this is one.
    pub fn as_local(&self) -> Option<&LocalStore> {
        match self {
            Backend::Local(store) => Some(store),
            Backend::Api(_) => None,
        }
    }
}

#[async_trait]
impl PlanStore for Backend {
    fn backend_tag(&self) -> &'static str {
        match self {
            Backend::Api(store) => store.backend_tag(),
            Backend::Local(store) => store.backend_tag(),
        }
    }

    async fn fetch_plan(&self, id: &PlanId) -> Result<Plan> {
        match self {
            Backend::Api(store) => store.fetch_plan(id).await,
            Backend::Local(store) => store.fetch_plan(id).await,
        }
    }

    async fn update_fields(&self, id: &PlanId, updates: &[FieldUpdate]) -> Result<()> {
        match self {
            Backend::Api(store) => store.update_fields(id, updates).await,
            Backend::Local(store) => store.update_fields(id, updates).await,
        }
    }

    async fn update_field(&self, id: &PlanId, update: &FieldUpdate) -> Result<()> {
        match self {
            Backend::Api(store) => store.update_field(id, update).await,
            Backend::Local(store) => store.update_field(id, update).await,
        }
    }

    async fn profile_snippets(&self, usernames: &[String]) -> Result<Vec<UserSnippet>> {
        match self {
            Backend::Api(store) => store.profile_snippets(usernames).await,
            Backend::Local(store) => store.profile_snippets(usernames).await,
        }
    }

    async fn profile_institutions(&self) -> Result<Vec<Institution>> {
        match self {
            Backend::Api(store) => store.profile_institutions().await,
            Backend::Local(store) => store.profile_institutions().await,
        }
    }
}
