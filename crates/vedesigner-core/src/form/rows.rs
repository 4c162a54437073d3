//! Row wrappers for plain string lists.
//!
//! The wire format stores tools, materials and languages as string arrays.
//! A list editor needs per-row identity, so inside a form the same data is a
//! [`RowList`] of [`NameRow`]s. Conversion happens exactly at load and at
//! submit.

use serde::{Deserialize, Serialize};

use crate::editor::{BlankRow, RowFloor, RowList};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameRow {
    #[serde(default)]
    pub name: String,
}

impl NameRow {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl BlankRow for NameRow {
    fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// String array → row list.
pub fn to_rows(values: &[String], floor: RowFloor) -> RowList<NameRow> {
    RowList::from_values(values.iter().map(NameRow::new), floor)
}

/// Row list → string array, dropping blank rows.
pub fn from_rows(rows: &RowList<NameRow>) -> Vec<String> {
    rows.filled().map(|row| row.name.trim().to_string()).collect()
}
