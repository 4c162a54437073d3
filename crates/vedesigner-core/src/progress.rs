//! Per-page completion tracking.
//!
//! All functions are pure: they take the current [`Progress`] and return a
//! new map. The tracker has no storage of its own; the wizard sends the
//! result as the `progress` entry of the page's update batch.
//!
//! Completion follows one policy for every page: a submit recomputes the
//! page's state from the submitted values, so an all-blank resubmission
//! moves a completed page back to `not_started`.
//!
//! ```rust
//! use vedesigner_core::{models::{Progress, ProgressState}, progress};
//!
//! let progress = progress::mark_completed(&Progress::default(), "institutions");
//! assert_eq!(progress.get("institutions"), ProgressState::Completed);
//!
//! let progress = progress::recompute(&progress, "institutions", true);
//! assert_eq!(progress.get("institutions"), ProgressState::NotStarted);
//! ```

use crate::{
    models::{Progress, ProgressState, Step},
    navigation::StepKeyScheme,
};

/// Sets `key` to `completed`; every other entry is carried over unchanged.
pub fn mark_completed(progress: &Progress, key: &str) -> Progress {
    mark(progress, key, ProgressState::Completed)
}

pub fn mark(progress: &Progress, key: &str, state: ProgressState) -> Progress {
    let mut next = progress.clone();
    next.0.insert(key.to_string(), state);
    next
}

/// State of `key` after a submit whose values were (not) empty.
pub fn recompute(progress: &Progress, key: &str, is_empty: bool) -> Progress {
    let state = if is_empty {
        ProgressState::NotStarted
    } else {
        ProgressState::Completed
    };
    mark(progress, key, state)
}

/// Adds a `not_started` entry for every step without one.
///
/// Under [`StepKeyScheme::Id`], steps still waiting for a server id are
/// skipped; they get their entry once the id is known. Entries of deleted or
/// renamed steps are left in place; they are never consulted for
/// navigation.
pub fn sync_step_keys(progress: &Progress, steps: &[Step], scheme: StepKeyScheme) -> Progress {
    let mut next = progress.clone();
    for step in steps {
        if scheme == StepKeyScheme::Id && step.id.is_none() {
            continue;
        }
        next.0
            .entry(scheme.step_key(step).to_string())
            .or_insert(ProgressState::NotStarted);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Progress {
        [
            ("name".to_string(), ProgressState::Completed),
            ("lectures".to_string(), ProgressState::InProgress),
            ("s1".to_string(), ProgressState::NotStarted),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_mark_completed_changes_only_its_key() {
        let before = sample();
        let after = mark_completed(&before, "institutions");

        assert_eq!(after.get("institutions"), ProgressState::Completed);
        assert_eq!(after.len(), before.len() + 1);
        for (key, state) in before.iter() {
            assert_eq!(after.get(key), state, "{key}");
        }
        // input is untouched
        assert!(!before.contains("institutions"));
    }

    #[test]
    fn test_recompute_is_symmetric() {
        let progress = recompute(&sample(), "lectures", false);
        assert_eq!(progress.get("lectures"), ProgressState::Completed);

        let progress = recompute(&progress, "lectures", true);
        assert_eq!(progress.get("lectures"), ProgressState::NotStarted);
        assert_eq!(progress.get("name"), ProgressState::Completed);
    }

    #[test]
    fn test_sync_step_keys_keeps_existing_and_stale_entries() {
        let steps = vec![
            Step {
                id: Some("s1".to_string()),
                name: "Kickoff".to_string(),
                ..Default::default()
            },
            Step {
                name: "Wrap-up".to_string(),
                ..Default::default()
            },
        ];
        let progress = mark_completed(&sample(), "s1");
        let progress = mark(&progress, "deleted-step", ProgressState::Completed);

        let synced = sync_step_keys(&progress, &steps, StepKeyScheme::Id);
        assert_eq!(synced.get("s1"), ProgressState::Completed);
        assert!(!synced.contains("Wrap-up"));
        assert_eq!(synced.get("deleted-step"), ProgressState::Completed);

        let synced = sync_step_keys(&progress, &steps, StepKeyScheme::DisplayName);
        assert!(synced.contains("Kickoff"));
        assert!(synced.contains("Wrap-up"));
    }
}
