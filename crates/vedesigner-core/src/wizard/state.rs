//! Application state shared by all wizard sessions.

use std::collections::BTreeMap;

use log::debug;

use crate::{client::PlanStore, error::Result, models::UserSnippet, navigation::StepKeyScheme};

/// Reference data cached across sessions.
///
/// Snippets are fetched once per username and kept until
/// [`refresh_snippets`](Self::refresh_snippets) is called for them.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    scheme: StepKeyScheme,
    snippets: BTreeMap<String, UserSnippet>,
}

impl WizardState {
    pub fn new(scheme: StepKeyScheme) -> Self {
        Self {
            scheme,
            snippets: BTreeMap::new(),
        }
    }

    pub fn scheme(&self) -> StepKeyScheme {
        self.scheme
    }

    pub fn snippet(&self, username: &str) -> Option<&UserSnippet> {
        self.snippets.get(username)
    }

    /// Label of a partner: the snippet's full name, else the username.
    pub fn display_name(&self, username: &str) -> String {
        self.snippet(username)
            .map_or_else(|| username.to_string(), UserSnippet::display_name)
    }

    /// Fetches snippets for usernames not cached yet.
    pub async fn ensure_snippets<S: PlanStore + ?Sized>(
        &mut self,
        store: &S,
        usernames: &[String],
    ) -> Result<usize> {
        let missing: Vec<String> = usernames
            .iter()
            .filter(|username| !self.snippets.contains_key(username.as_str()))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(0);
        }
        self.refresh_snippets(store, &missing).await
    }

    /// Re-fetches snippets for `usernames`, replacing cached entries.
    ///
    /// Returns the number of snippets received.
    pub async fn refresh_snippets<S: PlanStore + ?Sized>(
        &mut self,
        store: &S,
        usernames: &[String],
    ) -> Result<usize> {
        debug!("fetching {} profile snippet(s)", usernames.len());
        let snippets = store.profile_snippets(usernames).await?;
        let count = snippets.len();
        for snippet in snippets {
            self.snippets.insert(snippet.username.clone(), snippet);
        }
        Ok(count)
    }
}
