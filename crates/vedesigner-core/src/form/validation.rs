//! Field-level validation rules and the error collection they fill.
//!
//! Validation is client-side and advisory: it blocks a navigation-triggered
//! submit, nothing more. Messages are keyed by [`FieldPath`], which names row
//! fields by [`RowId`] rather than by index.

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;

use super::dates::parse_form_date;
use crate::editor::RowId;

/// Maximum length of short text inputs (names, types, locations).
pub const MAX_SHORT_TEXT: usize = 200;

/// Maximum length of free-text areas.
pub const MAX_LONG_TEXT: usize = 5000;

/// Upper bound for ages, amounts and workloads.
pub const MAX_NUMBER: u32 = 999;

static ALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[\p{L}\p{M}\p{N}\s.,:;!?'"()\[\]/&+\-–_@#%*=]*$"#)
        .unwrap_or_else(|e| unreachable!("allow-list pattern is valid: {e}"))
});

/// Address of a form value: a field, optionally inside a row, optionally a
/// column of that row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    pub field: String,
    pub row: Option<RowId>,
    pub column: Option<String>,
}

impl FieldPath {
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            row: None,
            column: None,
        }
    }

    pub fn row(field: impl Into<String>, row: RowId, column: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            row: Some(row),
            column: Some(column.into()),
        }
    }

    /// Path of a column inside a nested row list, e.g. the tools of a task.
    /// `parent` already names the list column.
    pub fn nested(parent: &FieldPath, row: RowId, column: &str) -> Self {
        Self {
            field: parent.to_string(),
            row: Some(row),
            column: Some(column.to_string()),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field)?;
        if let Some(row) = self.row {
            write!(f, "[{row}]")?;
        }
        if let Some(column) = &self.column {
            write!(f, ".{column}")?;
        }
        Ok(())
    }
}

/// Collected validation messages of one form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(BTreeMap<FieldPath, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: FieldPath, message: impl Into<String>) {
        self.0.entry(path).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, path: &FieldPath) -> Option<&[String]> {
        self.0.get(path).map(Vec::as_slice)
    }

    /// All paths with messages for a given row.
    pub fn for_row(&self, row: RowId) -> impl Iterator<Item = (&FieldPath, &[String])> {
        self.0
            .iter()
            .filter(move |(path, _)| path.row == Some(row))
            .map(|(path, messages)| (path, messages.as_slice()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &[String])> {
        self.0.iter().map(|(path, messages)| (path, messages.as_slice()))
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Rejects text longer than `max` characters.
    pub fn max_length(&mut self, path: &FieldPath, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(path.clone(), format!("must be at most {max} characters"));
        }
    }

    /// Rejects characters outside the allow-list.
    pub fn allowed_chars(&mut self, path: &FieldPath, value: &str) {
        if !ALLOWED_CHARS.is_match(value) {
            self.add(path.clone(), "contains characters that are not allowed");
        }
    }

    /// Length and character checks for short text inputs.
    pub fn short_text(&mut self, path: FieldPath, value: &str) {
        self.max_length(&path, value, MAX_SHORT_TEXT);
        self.allowed_chars(&path, value);
    }

    /// Length and character checks for free-text areas.
    pub fn long_text(&mut self, path: FieldPath, value: &str) {
        self.max_length(&path, value, MAX_LONG_TEXT);
        self.allowed_chars(&path, value);
    }

    pub fn required(&mut self, path: FieldPath, value: &str) {
        if value.trim().is_empty() {
            self.add(path, "must not be empty");
        }
    }

    /// Rejects a non-blank value that is not a `YYYY-MM-DD` date.
    pub fn date(&mut self, path: FieldPath, value: &str) {
        if !value.trim().is_empty() && parse_form_date(value).is_none() {
            self.add(path, "must be a date (YYYY-MM-DD)");
        }
    }

    /// Checks both dates and that `from` is not after `to`.
    pub fn date_range(&mut self, from_path: FieldPath, from: &str, to_path: FieldPath, to: &str) {
        self.date(from_path, from);
        if let (Some(start), Some(end)) = (parse_form_date(from), parse_form_date(to)) {
            if start > end {
                self.add(to_path.clone(), "must not be before the start date");
            }
        }
        self.date(to_path, to);
    }

    pub fn number(&mut self, path: FieldPath, value: Option<u32>) {
        if value.is_some_and(|n| n > MAX_NUMBER) {
            self.add(path, format!("must be at most {MAX_NUMBER}"));
        }
    }

    /// Checks both bounds and that `min` is not greater than `max`.
    pub fn number_range(
        &mut self,
        min_path: FieldPath,
        min: Option<u32>,
        max_path: FieldPath,
        max: Option<u32>,
    ) {
        self.number(min_path, min);
        if let (Some(low), Some(high)) = (min, max) {
            if low > high {
                self.add(max_path.clone(), "must not be smaller than the minimum");
            }
        }
        self.number(max_path, max);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (path, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{path} {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{RowFloor, RowList};

    #[test]
    fn test_allow_list() {
        let mut errors = ValidationErrors::new();
        errors.short_text(FieldPath::field("name"), "Universität Leipzig (Dept. 3) - A&B");
        assert!(errors.is_empty());

        errors.short_text(FieldPath::field("name"), "<script>");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_max_length_counts_characters() {
        let mut errors = ValidationErrors::new();
        errors.max_length(&FieldPath::field("name"), &"ä".repeat(MAX_SHORT_TEXT), MAX_SHORT_TEXT);
        assert!(errors.is_empty());
        errors.max_length(
            &FieldPath::field("name"),
            &"ä".repeat(MAX_SHORT_TEXT + 1),
            MAX_SHORT_TEXT,
        );
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_date_range_ordering() {
        let mut errors = ValidationErrors::new();
        errors.date_range(
            FieldPath::field("from"),
            "2024-05-02",
            FieldPath::field("to"),
            "2024-05-01",
        );
        assert_eq!(
            errors.get(&FieldPath::field("to")),
            Some(&["must not be before the start date".to_string()][..])
        );

        let mut ok = ValidationErrors::new();
        ok.date_range(
            FieldPath::field("from"),
            "2024-05-01",
            FieldPath::field("to"),
            "2024-05-01",
        );
        ok.date_range(FieldPath::field("from"), "", FieldPath::field("to"), "");
        assert!(ok.is_empty());
    }

    #[test]
    fn test_number_range() {
        let mut errors = ValidationErrors::new();
        errors.number_range(
            FieldPath::field("age_min"),
            Some(30),
            FieldPath::field("age_max"),
            Some(20),
        );
        errors.number(FieldPath::field("amount"), Some(5000));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_errors_follow_row_identity_across_remove() {
        let mut rows = RowList::from_values(
            vec!["ok".to_string(), "<bad>".to_string(), "<worse>".to_string()],
            RowFloor::None,
        );
        let mut errors = ValidationErrors::new();
        for row in rows.rows() {
            errors.short_text(FieldPath::row("institutions", row.id, "name"), &row.value);
        }
        let worse = rows.id_at(2).unwrap();

        rows.remove(1);

        let index = rows.position(worse).unwrap();
        assert_eq!(index, 1);
        assert_eq!(rows.get(index).map(String::as_str), Some("<worse>"));
        assert_eq!(errors.for_row(worse).count(), 1);
    }

    #[test]
    fn test_nested_path_names_each_segment_once() {
        let tasks = RowList::from_values(vec!["task".to_string()], RowFloor::None);
        let tools = RowList::from_values(vec!["tool".to_string()], RowFloor::None);
        let task = tasks.id_at(0).unwrap();
        let tool = tools.id_at(0).unwrap();

        let path = FieldPath::nested(&FieldPath::row("tasks", task, "tools"), tool, "name");
        assert_eq!(path.to_string(), format!("tasks[{task}].tools[{tool}].name"));
    }

    #[test]
    fn test_display_lists_messages() {
        let mut errors = ValidationErrors::new();
        errors.required(FieldPath::field("name"), "");
        assert_eq!(errors.to_string(), "name must not be empty");
    }
}
