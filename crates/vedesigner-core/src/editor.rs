//! Add / remove / reorder editing of repeatable rows.
//!
//! A [`RowList`] wraps the rows of one repeatable form field (institutions,
//! target groups, tasks, tools, ...). Each row carries a [`RowId`] that is
//! generated on the client and never reused inside its list, so validation
//! messages keyed by row id stay attached to the right row after a removal
//! shifts the indices of everything behind it.
//!
//! [`ImportDialog`] is the secondary "copy rows from my profile" flow: the
//! user toggles candidates and the confirmed selection is prepended to the
//! primary list.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// Client-generated, ephemeral identity of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rows whose every field is blank are placeholders, not data.
pub trait BlankRow {
    fn is_blank(&self) -> bool;
}

/// How many rows a field keeps at minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowFloor {
    /// The list may become empty.
    #[default]
    None,
    /// Removing the last row replaces it with a blank row.
    One,
}

/// One row and its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<T> {
    pub id: RowId,
    pub value: T,
}

/// Ordered rows of a repeatable field.
///
/// Serializes as a plain array of row values; ids exist only in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<T>", into = "Vec<T>")]
#[serde(bound(
    serialize = "T: Clone + Default + Serialize",
    deserialize = "T: Clone + Default + Deserialize<'de>"
))]
pub struct RowList<T: Clone + Default> {
    rows: Vec<Row<T>>,
    next_id: u64,
    floor: RowFloor,
}

impl<T: Clone + Default> Default for RowList<T> {
    fn default() -> Self {
        Self::new(RowFloor::None)
    }
}

impl<T: Clone + Default + PartialEq> PartialEq for RowList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl<T: Clone + Default> From<Vec<T>> for RowList<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_values(values, RowFloor::None)
    }
}

impl<T: Clone + Default> From<RowList<T>> for Vec<T> {
    fn from(list: RowList<T>) -> Self {
        list.rows.into_iter().map(|row| row.value).collect()
    }
}

impl<T: Clone + Default> RowList<T> {
    pub fn new(floor: RowFloor) -> Self {
        let mut list = Self {
            rows: Vec::new(),
            next_id: 0,
            floor,
        };
        list.enforce_floor();
        list
    }

    /// Builds a list from loaded values; a floor-of-one list that would be
    /// empty gets one blank row.
    pub fn from_values(values: impl IntoIterator<Item = T>, floor: RowFloor) -> Self {
        let mut list = Self {
            rows: Vec::new(),
            next_id: 0,
            floor,
        };
        for value in values {
            list.push_row(value);
        }
        list.enforce_floor();
        list
    }

    /// Changes the floor policy, adding a blank row if now required.
    pub fn set_floor(&mut self, floor: RowFloor) {
        self.floor = floor;
        self.enforce_floor();
    }

    pub fn floor(&self) -> RowFloor {
        self.floor
    }

    fn next_row_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push_row(&mut self, value: T) -> RowId {
        let id = self.next_row_id();
        self.rows.push(Row { id, value });
        id
    }

    fn enforce_floor(&mut self) {
        if self.floor == RowFloor::One && self.rows.is_empty() {
            self.push_row(T::default());
        }
    }

    /// Adds a row at the end.
    pub fn append(&mut self, value: T) -> RowId {
        self.push_row(value)
    }

    /// Adds a blank row at the end.
    pub fn append_blank(&mut self) -> RowId {
        self.push_row(T::default())
    }

    /// Removes the row at `index`.
    ///
    /// On a floor-of-one list the last remaining row is not removed but
    /// reset to blank. Returns the previous row, or `None` when `index` is
    /// out of range.
    pub fn remove(&mut self, index: usize) -> Option<Row<T>> {
        if index >= self.rows.len() {
            return None;
        }
        if self.floor == RowFloor::One && self.rows.len() == 1 {
            let previous = std::mem::take(&mut self.rows[0].value);
            return Some(Row {
                id: self.rows[0].id,
                value: previous,
            });
        }
        Some(self.rows.remove(index))
    }

    /// Moves the row at `from` so that it ends up at index `to`.
    pub fn move_row(&mut self, from: usize, to: usize) -> bool {
        if from >= self.rows.len() || to >= self.rows.len() {
            return false;
        }
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
        true
    }

    /// Inserts rows at the front, keeping their relative order.
    pub fn prepend(&mut self, values: impl IntoIterator<Item = T>) -> usize {
        let mut new_rows: Vec<Row<T>> = Vec::new();
        for value in values {
            let id = self.next_row_id();
            new_rows.push(Row { id, value });
        }
        let count = new_rows.len();
        new_rows.append(&mut self.rows);
        self.rows = new_rows;
        count
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.rows.get(index).map(|row| &row.value)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.rows.get_mut(index).map(|row| &mut row.value)
    }

    /// Index of the row with the given id.
    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    pub fn id_at(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).map(|row| row.id)
    }

    pub fn rows(&self) -> &[Row<T>] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().map(|row| &row.value)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.iter_mut().map(|row| &mut row.value)
    }

    /// Cloned row values in order.
    pub fn values(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Clone + Default + BlankRow> RowList<T> {
    /// Row values that carry data; placeholders are skipped.
    pub fn filled(&self) -> impl Iterator<Item = &T> {
        self.iter().filter(|value| !value.is_blank())
    }

    /// True when every row is a placeholder.
    pub fn all_blank(&self) -> bool {
        self.iter().all(BlankRow::is_blank)
    }
}

/// Multi-select import of candidate rows into a [`RowList`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDialog<T> {
    candidates: Vec<T>,
    selected: BTreeSet<usize>,
}

impl<T: Clone + Default> ImportDialog<T> {
    pub fn new(candidates: Vec<T>) -> Self {
        Self {
            candidates,
            selected: BTreeSet::new(),
        }
    }

    pub fn candidates(&self) -> &[T] {
        &self.candidates
    }

    /// Flips the selection of candidate `index`; returns whether it is now
    /// selected. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.candidates.len() {
            return false;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
            return true;
        }
        false
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    /// Prepends the selected candidates, in their original relative order,
    /// to `target`. The selection is cleared; candidates stay available for
    /// a later import. Returns the number of rows imported.
    pub fn confirm(&mut self, target: &mut RowList<T>) -> usize {
        let rows: Vec<T> = self
            .selected
            .iter()
            .map(|&index| self.candidates[index].clone())
            .collect();
        self.selected.clear();
        target.prepend(rows)
    }
}
