//! SQLite-backed plan store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use tokio::task;

use super::PlanStore;
use crate::{
    db::Database,
    error::{PlannerError, Result},
    models::{FieldUpdate, Institution, Plan, PlanId, UserSnippet},
};

/// Plan store on a local database file.
///
/// Every operation opens its own connection on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct LocalStore {
    db_path: PathBuf,
    user: Option<String>,
}

impl LocalStore {
    /// Wraps an initialized database file. Use
    /// [`WizardBuilder`](crate::wizard::WizardBuilder) to create one.
    pub(crate) fn new(db_path: PathBuf, user: Option<String>) -> Self {
        Self { db_path, user }
    }

    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    /// Username acting as the plan author and profile owner.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    async fn with_db<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            operation(&mut db)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Creates an empty plan authored by the store's user.
    pub async fn create_plan(&self, name: &str) -> Result<Plan> {
        let name = name.trim().to_string();
        let author = self.user.clone().unwrap_or_default();
        self.with_db(move |db| db.create_plan(&name, &author)).await
    }

    pub async fn list_plans(&self) -> Result<Vec<Plan>> {
        self.with_db(|db| db.list_plans()).await
    }

    pub async fn save_profile(&self, username: &str, institutions: Vec<Institution>) -> Result<()> {
        let username = username.to_string();
        self.with_db(move |db| db.save_profile(&username, &institutions))
            .await
    }

    pub async fn save_snippet(&self, snippet: UserSnippet) -> Result<()> {
        self.with_db(move |db| db.save_snippet(&snippet)).await
    }

    /// Makes `username` a co-author of the plan.
    pub async fn grant_write_access(&self, id: &PlanId, username: &str) -> Result<bool> {
        let id = id.as_str().to_string();
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(PlannerError::invalid_input("username").with_reason("must not be empty"));
        }
        self.with_db(move |db| db.grant_write_access(&id, &username))
            .await
    }
}

#[async_trait]
impl PlanStore for LocalStore {
    fn backend_tag(&self) -> &'static str {
        "local"
    }

    async fn fetch_plan(&self, id: &PlanId) -> Result<Plan> {
        debug!("loading plan {id} from {}", self.db_path.display());
        let plan_id = id.as_str().to_string();
        self.with_db(move |db| {
            db.get_plan(&plan_id)?
                .ok_or(PlannerError::PlanNotFound { id: plan_id })
        })
        .await
    }

    async fn update_fields(&self, id: &PlanId, updates: &[FieldUpdate]) -> Result<()> {
        debug!("writing {} field(s) of plan {id}", updates.len());
        let plan_id = id.as_str().to_string();
        let updates = updates.to_vec();
        self.with_db(move |db| db.update_fields(&plan_id, &updates))
            .await
    }

    async fn profile_snippets(&self, usernames: &[String]) -> Result<Vec<UserSnippet>> {
        let usernames = usernames.to_vec();
        self.with_db(move |db| db.get_snippets(&usernames)).await
    }

    async fn profile_institutions(&self) -> Result<Vec<Institution>> {
        let Some(user) = self.user.clone() else {
            return Err(PlannerError::Configuration {
                message: "No user configured for the local store".to_string(),
            });
        };
        self.with_db(move |db| db.get_profile_institutions(&user))
            .await
    }
}
