//! Selection controller for table rows.
//!
//! Tracks which identifiers of the current page are checked. The controller is bound
//! to a universe of identifiers; binding a universe that differs by value clears the
//! selection, so ids from a previous page or filter are never reported as selected.

use std::collections::HashSet;
use std::hash::Hash;

/// State of a table's header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    Unchecked,
    Indeterminate,
    Checked,
}

#[derive(Debug, Clone)]
pub struct Selection<T> {
    universe: Vec<T>,
    selected: HashSet<T>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self {
            universe: Vec::new(),
            selected: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> Selection<T> {
    pub fn new(universe: impl IntoIterator<Item = T>) -> Self {
        Self {
            universe: universe.into_iter().collect(),
            selected: HashSet::new(),
        }
    }

    /// Rebinds the universe. Returns `true` if it changed and the selection was cleared.
    pub fn bind(&mut self, universe: impl IntoIterator<Item = T>) -> bool {
        let universe: Vec<T> = universe.into_iter().collect();
        if universe == self.universe {
            return false;
        }
        self.universe = universe;
        self.selected.clear();
        true
    }

    pub fn universe(&self) -> &[T] {
        &self.universe
    }

    /// Ids outside the universe are accepted as-is.
    pub fn select_one(&mut self, id: T) {
        self.selected.insert(id);
    }

    pub fn deselect_one(&mut self, id: &T) {
        self.selected.remove(id);
    }

    pub fn toggle(&mut self, id: T) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.universe.iter().cloned().collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn selected(&self) -> &HashSet<T> {
        &self.selected
    }

    pub fn is_selected(&self, id: &T) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn selected_any(&self) -> bool {
        !self.selected.is_empty()
    }

    /// True when every id in the universe is selected. Vacuously true for an empty
    /// universe; use [`Selection::header_state`] to drive a checkbox.
    pub fn selected_all(&self) -> bool {
        self.universe.iter().all(|id| self.selected.contains(id))
    }

    pub fn header_state(&self) -> HeaderState {
        if !self.universe.is_empty() && self.selected_all() {
            HeaderState::Checked
        } else if self.selected_any() {
            HeaderState::Indeterminate
        } else {
            HeaderState::Unchecked
        }
    }
}
