//! Bulk selection over the current result set.
//!
//! The store never clears itself; owners reset it when the result set it is
//! scoped to is replaced or mutated.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::types::{ResultSet, UserId};

/// Summary state of the "select all" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriState {
    Checked,
    Indeterminate,
    Unchecked,
}

impl TriState {
    pub fn marker(self) -> &'static str {
        match self {
            TriState::Checked => "[x]",
            TriState::Indeterminate => "[-]",
            TriState::Unchecked => "[ ]",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selected: BTreeSet<UserId>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select or deselect a single record. Ids outside `results` are ignored.
    pub fn toggle_one(&mut self, results: Option<&ResultSet>, id: UserId, selected: bool) {
        if !results.is_some_and(|rs| rs.contains(id)) {
            tracing::debug!(id, "toggle ignored: id not in result set");
            return;
        }
        if selected {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
    }

    /// Select every record in `results`, or clear.
    pub fn toggle_all(&mut self, results: Option<&ResultSet>, selected: bool) {
        self.selected.clear();
        if selected && let Some(rs) = results {
            self.selected.extend(rs.ids());
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> &BTreeSet<UserId> {
        &self.selected
    }

    pub fn tri_state(&self, results: Option<&ResultSet>) -> TriState {
        let Some(rs) = results else {
            return TriState::Unchecked;
        };
        if self.selected.is_empty() {
            TriState::Unchecked
        } else if self.selected.len() == rs.len() {
            TriState::Checked
        } else {
            TriState::Indeterminate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::UserRecord;

    fn five() -> ResultSet {
        ResultSet::new((1..=5).map(|i| UserRecord::new(i, format!("u{i}"))).collect())
    }

    #[test]
    fn tri_state_follows_selection() {
        let rs = five();
        let mut s = SelectionStore::new();
        assert_eq!(s.tri_state(Some(&rs)), TriState::Unchecked);

        s.toggle_all(Some(&rs), true);
        assert_eq!(s.len(), 5);
        assert_eq!(s.tri_state(Some(&rs)), TriState::Checked);

        s.toggle_one(Some(&rs), 3, false);
        assert_eq!(s.tri_state(Some(&rs)), TriState::Indeterminate);

        s.toggle_one(Some(&rs), 3, true);
        assert_eq!(s.tri_state(Some(&rs)), TriState::Checked);

        s.toggle_all(Some(&rs), false);
        assert!(s.is_empty());
        assert_eq!(s.tri_state(Some(&rs)), TriState::Unchecked);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let rs = five();
        let mut s = SelectionStore::new();
        s.toggle_one(Some(&rs), 42, true);
        assert!(s.is_empty());
        s.toggle_one(None, 1, true);
        assert!(s.is_empty());
    }

    #[test]
    fn selecting_twice_is_idempotent() {
        let rs = five();
        let mut s = SelectionStore::new();
        s.toggle_one(Some(&rs), 2, true);
        s.toggle_one(Some(&rs), 2, true);
        assert_eq!(s.len(), 1);
        assert!(s.contains(2));
    }

    #[test]
    fn absent_result_set_forces_unchecked() {
        let rs = five();
        let mut s = SelectionStore::new();
        s.toggle_one(Some(&rs), 1, true);
        assert_eq!(s.tri_state(None), TriState::Unchecked);
        s.toggle_all(None, true);
        assert!(s.is_empty());
    }

    #[test]
    fn empty_result_set_is_unchecked() {
        let rs = ResultSet::default();
        let mut s = SelectionStore::new();
        s.toggle_all(Some(&rs), true);
        assert_eq!(s.tri_state(Some(&rs)), TriState::Unchecked);
    }

    #[test]
    fn markers() {
        assert_eq!(TriState::Checked.marker(), "[x]");
        assert_eq!(TriState::Indeterminate.marker(), "[-]");
        assert_eq!(TriState::Unchecked.marker(), "[ ]");
    }
}
