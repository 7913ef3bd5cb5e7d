//! Interactive state for one list view.
//!
//! [`ListState`] owns the current [`QueryDescriptor`] and [`Selection`] and
//! applies UI events to them: typing in the search box, changing a filter,
//! clicking a column header, paging. Any change that can shrink the result
//! (search, filters, page size) moves back to page 1.

use std::hash::Hash;

use tracing::debug;

use crate::descriptor::QueryDescriptor;
use crate::engine::ListEngine;
use crate::page::{clamp_page, ResultPage};
use crate::predicate::{Constraint, Predicate};
use crate::selection::{bulk_remove, Selection};
use crate::sort::toggle_sort;
use crate::traits::{Keyed, Record};

/// Query and selection state of a list view.
///
/// ```
/// use listkit::{ListEngine, ListState, QueryDescriptor};
/// use serde_json::json;
///
/// let users = vec![
///     json!({"id": 1, "name": "Ana"}),
///     json!({"id": 2, "name": "Budi"}),
/// ];
/// let engine = ListEngine::new(["name"]);
/// let mut state: ListState<String> = ListState::new(QueryDescriptor::new());
///
/// state.set_page(3);
/// state.set_search("bu");
/// assert_eq!(state.descriptor().page, 1);
///
/// let page = state.query(&engine, &users);
/// state.select_all_on(&page.keys());
/// assert!(state.selection().contains(&"2".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<K: Eq + Hash> {
    descriptor: QueryDescriptor,
    selection: Selection<K>,
}

impl<K: Eq + Hash + Clone> ListState<K> {
    /// Creates state starting from the given descriptor with nothing
    /// selected.
    pub fn new(descriptor: QueryDescriptor) -> Self {
        ListState {
            descriptor,
            selection: Selection::new(),
        }
    }

    /// The current descriptor.
    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    /// The current selection.
    pub fn selection(&self) -> &Selection<K> {
        &self.selection
    }

    /// Runs the current descriptor through an engine.
    pub fn query<'a, T: Record>(&self, engine: &ListEngine, records: &'a [T]) -> ResultPage<'a, T> {
        engine.query(records, &self.descriptor)
    }

    // ========================================================================
    // Query events
    // ========================================================================

    /// Replaces the search text.
    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.descriptor.search {
            self.descriptor.search = text;
            self.first_page("search changed");
        }
    }

    /// Sets the filter for a field.
    ///
    /// Replaces an existing predicate on the same field of the same kind, so
    /// a minimum and a maximum on one field coexist while a second minimum
    /// replaces the first.
    pub fn set_filter(&mut self, field: &str, constraint: Constraint) {
        let stage = constraint.stage();
        self.descriptor
            .predicates
            .retain(|p| !(p.field == field && p.constraint.stage() == stage));
        self.descriptor
            .predicates
            .push(Predicate::new(field, constraint));
        self.first_page("filter changed");
    }

    /// Removes every predicate on a field.
    pub fn clear_filter(&mut self, field: &str) {
        let before = self.descriptor.predicates.len();
        self.descriptor.predicates.retain(|p| p.field != field);
        if self.descriptor.predicates.len() != before {
            self.first_page("filter cleared");
        }
    }

    /// Removes all predicates and the search text.
    pub fn clear_filters(&mut self) {
        if self.descriptor.is_unfiltered() && self.descriptor.predicates.is_empty() {
            return;
        }
        self.descriptor.predicates.clear();
        self.descriptor.search.clear();
        self.first_page("filters cleared");
    }

    /// Column header click; see [`toggle_sort`].
    pub fn toggle_sort(&mut self, field: &str) {
        self.descriptor.sort = Some(toggle_sort(self.descriptor.sort.as_ref(), field));
    }

    /// Moves to a page. Out-of-range pages are accepted as-is; see
    /// [`ListState::clamp_page`].
    pub fn set_page(&mut self, page: usize) {
        self.descriptor.page = page;
    }

    /// Changes the page size.
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size != self.descriptor.page_size {
            self.descriptor.page_size = page_size;
            self.first_page("page size changed");
        }
    }

    /// Pulls the current page into `[1, max(total_pages, 1)]`.
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.descriptor.page = clamp_page(self.descriptor.page, total_pages);
    }

    fn first_page(&mut self, reason: &str) {
        if self.descriptor.page != 1 {
            debug!(from = self.descriptor.page, reason, "resetting to first page");
            self.descriptor.page = 1;
        }
    }

    // ========================================================================
    // Selection events
    // ========================================================================

    /// Header-checkbox toggle for the visible page.
    pub fn select_all_on(&mut self, page_keys: &[K]) {
        self.selection = self.selection.select_all(page_keys);
    }

    /// Row-checkbox toggle.
    pub fn toggle_selected(&mut self, key: K) {
        self.selection = self.selection.toggle(key);
    }

    /// Deselects everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Bulk delete: returns the records that remain and clears the
    /// selection.
    pub fn remove_selected<T>(&mut self, records: &[T]) -> Vec<T>
    where
        T: Keyed<Key = K> + Clone,
    {
        let remaining = bulk_remove(records, &self.selection);
        debug!(
            removed = records.len() - remaining.len(),
            "bulk removed selected records"
        );
        self.selection.clear();
        remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::Sort;
    use serde_json::json;

    fn state() -> ListState<String> {
        ListState::new(QueryDescriptor::new().page(4))
    }

    #[test]
    fn search_resets_page_only_when_changed() {
        let mut s = state();
        s.set_search("");
        assert_eq!(s.descriptor().page, 4);
        s.set_search("rust");
        assert_eq!(s.descriptor().page, 1);
        assert_eq!(s.descriptor().search, "rust");
    }

    #[test]
    fn set_filter_replaces_same_kind() {
        let mut s = state();
        s.set_filter("salary", Constraint::min(5));
        s.set_filter("salary", Constraint::max(9));
        s.set_filter("salary", Constraint::min(6));
        assert_eq!(s.descriptor().page, 1);
        assert_eq!(
            s.descriptor().predicates,
            vec![
                Predicate::new("salary", Constraint::max(9)),
                Predicate::new("salary", Constraint::min(6)),
            ]
        );

        s.clear_filter("salary");
        assert!(s.descriptor().predicates.is_empty());
    }

    #[test]
    fn clear_filters_drops_search_too() {
        let mut s = state();
        s.set_search("x");
        s.set_filter("type", Constraint::one_of(["remote"]));
        s.set_page(2);
        s.clear_filters();
        assert!(s.descriptor().is_unfiltered());
        assert!(s.descriptor().predicates.is_empty());
        assert_eq!(s.descriptor().page, 1);
    }

    #[test]
    fn sort_clicks_keep_page() {
        let mut s = state();
        s.toggle_sort("name");
        s.toggle_sort("name");
        assert_eq!(s.descriptor().sort, Some(Sort::desc("name")));
        assert_eq!(s.descriptor().page, 4);
    }

    #[test]
    fn page_size_and_clamp() {
        let mut s = state();
        s.set_page_size(25);
        assert_eq!(s.descriptor().page, 1);

        s.set_page(9);
        s.clamp_page(3);
        assert_eq!(s.descriptor().page, 3);
        s.clamp_page(0);
        assert_eq!(s.descriptor().page, 1);
    }

    #[test]
    fn selection_survives_queries_until_removed() {
        let records = vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})];
        let mut s = state();
        s.toggle_selected("2".to_string());
        s.set_search("anything");
        s.set_page(2);
        assert_eq!(s.selection().len(), 1);

        let remaining = s.remove_selected(&records);
        assert_eq!(remaining, vec![json!({"id": 1}), json!({"id": 3})]);
        assert!(s.selection().is_empty());
    }

    #[test]
    fn select_all_on_page() {
        let mut s = state();
        s.select_all_on(&["1".to_string(), "2".to_string()]);
        assert_eq!(s.selection().len(), 2);
        s.select_all_on(&["1".to_string(), "2".to_string()]);
        assert!(s.selection().is_empty());
        s.toggle_selected("7".to_string());
        s.clear_selection();
        assert!(s.selection().is_empty());
    }
}
