//! Per-step completion markers stored inside the plan document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tri-state completion marker of one wizard step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl ProgressState {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressState::NotStarted => "not_started",
            ProgressState::InProgress => "in_progress",
            ProgressState::Completed => "completed",
        }
    }

    /// Get state with consistent icon formatting for display.
    ///
    /// ```rust
    /// use vedesigner_core::models::ProgressState;
    ///
    /// assert_eq!(ProgressState::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(ProgressState::InProgress.with_icon(), "➤ In Progress");
    /// assert_eq!(ProgressState::NotStarted.with_icon(), "○ Not Started");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            ProgressState::Completed => "✓ Completed",
            ProgressState::InProgress => "➤ In Progress",
            ProgressState::NotStarted => "○ Not Started",
        }
    }
}

/// Mapping from step key to completion state.
///
/// Keys of static pages are their slugs (`"institutions"`); keys of
/// fine-planning steps are the step ids. Entries for deleted steps may
/// linger and are ignored by navigation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Progress(pub BTreeMap<String, ProgressState>);

/// Completed / total counts over a set of keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSummary {
    pub completed: usize,
    pub in_progress: usize,
    pub total: usize,
}

impl Progress {
    /// State of a key; unknown keys have not been started.
    pub fn get(&self, key: &str) -> ProgressState {
        self.0.get(key).copied().unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ProgressState)> {
        self.0.iter().map(|(key, state)| (key.as_str(), *state))
    }

    /// Counts states over `keys`, so that stale entries do not skew the
    /// numbers.
    pub fn summary<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> ProgressSummary {
        let mut summary = ProgressSummary::default();
        for key in keys {
            summary.total += 1;
            match self.get(key) {
                ProgressState::Completed => summary.completed += 1,
                ProgressState::InProgress => summary.in_progress += 1,
                ProgressState::NotStarted => {}
            }
        }
        summary
    }
}

impl FromIterator<(String, ProgressState)> for Progress {
    fn from_iter<I: IntoIterator<Item = (String, ProgressState)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
