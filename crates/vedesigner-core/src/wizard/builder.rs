//! Builder for creating and configuring wizard instances.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use tokio::task;

use super::{Wizard, WizardState};
use crate::{
    client::{http::DEFAULT_TIMEOUT, ApiClient, Backend, LocalStore},
    db::Database,
    error::{PlannerError, Result},
    navigation::StepKeyScheme,
};

/// Builder for creating and configuring [`Wizard`] instances.
///
/// With an API url the wizard talks to the backend; without one it uses a
/// local database file.
#[derive(Debug, Clone)]
pub struct WizardBuilder {
    api_url: Option<String>,
    token: Option<String>,
    timeout: Duration,
    database_path: Option<PathBuf>,
    user: Option<String>,
    scheme: StepKeyScheme,
}

impl WizardBuilder {
    pub fn new() -> Self {
        Self {
            api_url: None,
            token: None,
            timeout: DEFAULT_TIMEOUT,
            database_path: None,
            user: None,
            scheme: StepKeyScheme::default(),
        }
    }

    /// Base url of the Plan API, e.g. `https://ve.example.org/api`.
    pub fn with_api_url(mut self, url: Option<impl Into<String>>) -> Self {
        if let Some(url) = url {
            self.api_url = Some(url.into());
        }
        self
    }

    /// Bearer token sent with every API request.
    pub fn with_token(mut self, token: Option<impl Into<String>>) -> Self {
        if let Some(token) = token {
            self.token = Some(token.into());
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/vedesigner/vedesigner.db` or
    /// `~/.local/share/vedesigner/vedesigner.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Username the local store acts as.
    pub fn with_user(mut self, user: Option<impl Into<String>>) -> Self {
        if let Some(user) = user {
            self.user = Some(user.into());
        }
        self
    }

    pub fn with_step_key_scheme(mut self, scheme: StepKeyScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Builds the configured store.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Configuration` for an invalid API url
    /// Returns `PlannerError::FileSystem` if the database path is invalid
    /// Returns `PlannerError::Database` if database initialization fails
    pub async fn build_store(&self) -> Result<Backend> {
        if let Some(url) = &self.api_url {
            let client = ApiClient::new(url, self.token.clone(), self.timeout)?;
            return Ok(Backend::Api(client));
        }

        let db_path = match &self.database_path {
            Some(path) => path.clone(),
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| PlannerError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), PlannerError>(())
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Backend::Local(LocalStore::new(db_path, self.user.clone())))
    }

    /// Builds the configured wizard.
    pub async fn build(self) -> Result<Wizard<Backend>> {
        let store = self.build_store().await?;
        Ok(Wizard::new(store, WizardState::new(self.scheme)))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("vedesigner")
            .place_data_file("vedesigner.db")
            .map_err(|e| PlannerError::XdgDirectory(e.to_string()))
    }
}

impl Default for WizardBuilder {
    fn default() -> Self {
        Self::new()
    }
}
