//! Selection sets for bulk actions.
//!
//! A [`Selection`] is a set of record keys. It outlives individual queries:
//! paging, searching or re-sorting never changes it, and nothing here clears
//! it implicitly. Whether a bulk action ends by clearing the selection is the
//! caller's decision.
//!
//! The "select all" toggle works on the *visible page* only. Selecting all
//! on page 2 neither selects nor deselects anything on page 1.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::traits::Keyed;

/// Set of selected record keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection<K: Eq + Hash> {
    keys: HashSet<K>,
}

/// How much of the visible page is selected, for a tri-state header
/// checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    /// No visible record is selected (or the page is empty).
    None,
    /// Some but not all visible records are selected.
    Partial,
    /// Every visible record is selected.
    All,
}

impl<K: Eq + Hash + Clone> Selection<K> {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Selection {
            keys: HashSet::new(),
        }
    }

    /// Creates a selection holding the given keys.
    pub fn from_keys<I: IntoIterator<Item = K>>(keys: I) -> Self {
        Selection {
            keys: keys.into_iter().collect(),
        }
    }

    /// Returns `true` if the key is selected.
    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Number of selected keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates the selected keys in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Returns `true` if every key of the page is selected. Vacuously true
    /// for an empty page.
    pub fn covers(&self, page_keys: &[K]) -> bool {
        page_keys.iter().all(|key| self.keys.contains(key))
    }

    /// Selection state of the visible page.
    pub fn page_state(&self, page_keys: &[K]) -> PageSelection {
        let selected = page_keys
            .iter()
            .filter(|key| self.keys.contains(*key))
            .count();
        if selected == 0 {
            PageSelection::None
        } else if selected == page_keys.len() {
            PageSelection::All
        } else {
            PageSelection::Partial
        }
    }

    /// Header-checkbox toggle for the visible page.
    ///
    /// If every key on the page is selected, those keys are deselected;
    /// otherwise they are all selected. Keys from other pages are left as
    /// they are.
    pub fn select_all(&self, page_keys: &[K]) -> Self {
        let mut next = self.clone();
        if self.covers(page_keys) {
            for key in page_keys {
                next.keys.remove(key);
            }
        } else {
            next.keys.extend(page_keys.iter().cloned());
        }
        next
    }

    /// Row-checkbox toggle for one key.
    pub fn toggle(&self, key: K) -> Self {
        let mut next = self.clone();
        if !next.keys.remove(&key) {
            next.keys.insert(key);
        }
        next
    }

    /// Selected records in collection order, for handing to a bulk action.
    pub fn selected_in<'a, T>(&self, records: &'a [T]) -> Vec<&'a T>
    where
        T: Keyed<Key = K>,
    {
        records
            .iter()
            .filter(|record| self.keys.contains(&record.key()))
            .collect()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for Selection<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Selection::from_keys(iter)
    }
}

/// Header-checkbox toggle; see [`Selection::select_all`].
pub fn select_all<K: Eq + Hash + Clone>(page_keys: &[K], selection: &Selection<K>) -> Selection<K> {
    selection.select_all(page_keys)
}

/// Row-checkbox toggle; see [`Selection::toggle`].
pub fn toggle_one<K: Eq + Hash + Clone>(key: K, selection: &Selection<K>) -> Selection<K> {
    selection.toggle(key)
}

/// Records whose key is not selected, in their original order.
///
/// The selection itself is left untouched.
pub fn bulk_remove<T>(records: &[T], selection: &Selection<T::Key>) -> Vec<T>
where
    T: Keyed + Clone,
{
    records
        .iter()
        .filter(|record| !selection.contains(&record.key()))
        .cloned()
        .collect()
}
