//! Profile snippets used to label partner-specific records.

use serde::{Deserialize, Serialize};

use super::nullable;

/// Public display data of a user, as returned by the snippet API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserSnippet {
    pub username: String,
    #[serde(default, deserialize_with = "nullable")]
    pub first_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub last_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub profile_pic: String,
    #[serde(default, deserialize_with = "nullable")]
    pub institution: String,
}

impl UserSnippet {
    /// "First Last", or the username when no name is known.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}
