//! Profile institutions and user snippets.

use rusqlite::{params, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{Institution, UserSnippet},
};

const UPSERT_PROFILE_SQL: &str = "INSERT INTO profiles (username, institutions) VALUES (?1, ?2) \
     ON CONFLICT(username) DO UPDATE SET institutions = excluded.institutions";
const SELECT_PROFILE_SQL: &str = "SELECT institutions FROM profiles WHERE username = ?1";
const UPSERT_SNIPPET_SQL: &str = "INSERT INTO user_snippets (username, snippet) VALUES (?1, ?2) \
     ON CONFLICT(username) DO UPDATE SET snippet = excluded.snippet";
const SELECT_SNIPPET_SQL: &str = "SELECT snippet FROM user_snippets WHERE username = ?1";

impl super::Database {
    /// Replaces the institutions on a user's profile.
    pub fn save_profile(&mut self, username: &str, institutions: &[Institution]) -> Result<()> {
        let institutions = serde_json::to_string(institutions)?;
        self.connection
            .execute(UPSERT_PROFILE_SQL, params![username, institutions])
            .db_context("Failed to save profile")?;
        Ok(())
    }

    /// Institutions on a user's profile; a user without profile has none.
    pub fn get_profile_institutions(&self, username: &str) -> Result<Vec<Institution>> {
        let raw: Option<String> = self
            .connection
            .query_row(SELECT_PROFILE_SQL, params![username], |row| row.get(0))
            .optional()
            .db_context("Failed to query profile")?;
        match raw {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn save_snippet(&mut self, snippet: &UserSnippet) -> Result<()> {
        let raw = serde_json::to_string(snippet)?;
        self.connection
            .execute(UPSERT_SNIPPET_SQL, params![snippet.username, raw])
            .db_context("Failed to save user snippet")?;
        Ok(())
    }

    /// Snippets for the given usernames, in request order. Unknown users are
    /// left out.
    pub fn get_snippets(&self, usernames: &[String]) -> Result<Vec<UserSnippet>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_SNIPPET_SQL)
            .db_context("Failed to prepare query")?;
        let mut snippets = Vec::with_capacity(usernames.len());
        for username in usernames {
            let raw: Option<String> = stmt
                .query_row(params![username], |row| row.get(0))
                .optional()
                .db_context("Failed to query user snippet")?;
            if let Some(raw) = raw {
                snippets.push(serde_json::from_str(&raw)?);
            }
        }
        Ok(snippets)
    }
}
