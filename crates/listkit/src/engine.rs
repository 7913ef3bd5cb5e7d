//! The list query pipeline: search, filter, sort, paginate.
//!
//! [`ListEngine`] holds the per-list configuration that does not change
//! between keystrokes (which fields the search box looks at, which fields
//! hold dates). Everything that does change lives in the
//! [`QueryDescriptor`]. Queries are pure: the same records and descriptor
//! always produce the same page.

use tracing::trace;

use crate::descriptor::QueryDescriptor;
use crate::page::{page_window, total_pages, ResultPage};
use crate::predicate::Predicate;
use crate::search::Needle;
use crate::sort::sort_items;
use crate::traits::Record;
use crate::value::Value;

/// Query engine for one kind of list.
///
/// # Example
///
/// ```
/// use listkit::{ListEngine, QueryDescriptor};
/// use serde_json::json;
///
/// let people = vec![
///     json!({"id": 1, "name": "Ana", "age": 30}),
///     json!({"id": 2, "name": "Budi", "age": 25}),
///     json!({"id": 3, "name": "Cici", "age": 25}),
/// ];
///
/// let engine = ListEngine::new(["name"]);
/// let page = engine.query(&people, &QueryDescriptor::new().sort_asc("age").page_size(2));
///
/// assert_eq!(page.total_items, 3);
/// assert_eq!(page.total_pages, 2);
/// assert_eq!(page.items[0]["name"], "Budi");
/// assert_eq!(page.items[1]["name"], "Cici");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListEngine {
    search_fields: Vec<String>,
    date_fields: Vec<String>,
}

impl ListEngine {
    /// Creates an engine searching the given fields.
    ///
    /// With no search fields, any non-empty search text matches nothing.
    pub fn new<I, S>(search_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ListEngine {
            search_fields: search_fields.into_iter().map(Into::into).collect(),
            date_fields: Vec::new(),
        }
    }

    /// Declares fields holding ISO-8601 date strings, so sorting on them
    /// compares instants instead of text.
    pub fn with_date_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Fields the search text is matched against.
    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    /// Fields sorted as dates.
    pub fn date_fields(&self) -> &[String] {
        &self.date_fields
    }

    /// Runs a query and returns the requested page.
    pub fn query<'a, T: Record>(&self, records: &'a [T], descriptor: &QueryDescriptor) -> ResultPage<'a, T> {
        self.query_by(records, descriptor, T::accessor)
    }

    /// Runs a query using an accessor function instead of a [`Record`] impl.
    pub fn query_by<'a, T, F>(&self, records: &'a [T], descriptor: &QueryDescriptor, accessor: F) -> ResultPage<'a, T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let mut items = self.select(records, descriptor, &accessor);
        let total_items = items.len();

        match page_window(descriptor.page, descriptor.page_size, total_items) {
            Some((start, end)) => {
                items.truncate(end);
                items.drain(..start);
            }
            None => items.clear(),
        }

        trace!(
            records = records.len(),
            matched = total_items,
            page = descriptor.page,
            page_size = descriptor.page_size,
            shown = items.len(),
            "list query"
        );

        ResultPage {
            items,
            page: descriptor.page,
            page_size: descriptor.page_size,
            total_items,
            total_pages: total_pages(total_items, descriptor.page_size),
        }
    }

    /// All matching records in display order, without pagination.
    pub fn filter<'a, T: Record>(&self, records: &'a [T], descriptor: &QueryDescriptor) -> Vec<&'a T> {
        self.select(records, descriptor, &T::accessor)
    }

    /// Accessor form of [`ListEngine::filter`].
    pub fn filter_by<'a, T, F>(&self, records: &'a [T], descriptor: &QueryDescriptor, accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        self.select(records, descriptor, &accessor)
    }

    /// Number of records passing search and filters.
    pub fn count<T: Record>(&self, records: &[T], descriptor: &QueryDescriptor) -> usize {
        let needle = Needle::new(&descriptor.search);
        let predicates = descriptor.active_predicates();
        records
            .iter()
            .filter(|record| self.passes(*record, needle.as_ref(), &predicates, &T::accessor))
            .count()
    }

    /// Returns `true` if a single record passes search and filters.
    pub fn matches<T: Record>(&self, record: &T, descriptor: &QueryDescriptor) -> bool {
        let needle = Needle::new(&descriptor.search);
        let predicates = descriptor.active_predicates();
        self.passes(record, needle.as_ref(), &predicates, &T::accessor)
    }

    fn select<'a, T, F>(&self, records: &'a [T], descriptor: &QueryDescriptor, accessor: &F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let needle = Needle::new(&descriptor.search);
        let predicates = descriptor.active_predicates();

        let mut matched: Vec<&'a T> = records
            .iter()
            .filter(|record| self.passes(*record, needle.as_ref(), &predicates, accessor))
            .collect();

        if let Some(sort) = &descriptor.sort {
            let as_date = self.date_fields.iter().any(|f| *f == sort.field);
            sort_items(&mut matched, sort, as_date, accessor);
        }

        matched
    }

    fn passes<T, F>(&self, record: &T, needle: Option<&Needle>, predicates: &[&Predicate], accessor: &F) -> bool
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        if let Some(needle) = needle {
            let found = self
                .search_fields
                .iter()
                .any(|field| needle.found_in(&accessor(record, field)));
            if !found {
                return false;
            }
        }

        predicates
            .iter()
            .all(|predicate| predicate.matches(&accessor(record, &predicate.field)))
    }
}

/// Runs a one-off query with the given search fields.
///
/// Shorthand for `ListEngine::new(search_fields).query(records, descriptor)`.
pub fn query<'a, T: Record>(records: &'a [T], descriptor: &QueryDescriptor, search_fields: &[&str]) -> ResultPage<'a, T> {
    ListEngine::new(search_fields.iter().copied()).query(records, descriptor)
}
