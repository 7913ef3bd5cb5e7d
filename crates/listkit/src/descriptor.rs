//! Query descriptor and its builder.
//!
//! A [`QueryDescriptor`] captures everything a list view asks for in one
//! query: search text, filters, sort and the page window. View code rebuilds
//! it on every interaction and hands it to the engine; it can also arrive as
//! JSON or YAML.

use serde::{Deserialize, Serialize};

use crate::predicate::{Constraint, Operand, Predicate};
use crate::sort::{Dir, Sort};
use crate::value::{Number, Timestamp};

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Combined search, filter, sort and page request.
///
/// # Example
///
/// ```
/// use listkit::{Dir, QueryDescriptor};
///
/// let descriptor = QueryDescriptor::new()
///     .search("engineer")
///     .equals("type", "full-time")
///     .one_of("location", ["Jakarta", "Remote"])
///     .min("salary", 8_000_000)
///     .sort_by("posted_at", Dir::Desc)
///     .page(2)
///     .page_size(20)
///     .build();
///
/// assert_eq!(descriptor.predicates.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDescriptor {
    /// Free text matched against the configured search fields.
    pub search: String,
    /// Field filters; evaluated by stage, see [`Constraint::stage`].
    pub predicates: Vec<Predicate>,
    /// Optional sort.
    pub sort: Option<Sort>,
    /// Requested page (1-based).
    pub page: usize,
    /// Records per page.
    pub page_size: usize,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        QueryDescriptor {
            search: String::new(),
            predicates: Vec::new(),
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryDescriptor {
    /// Creates a descriptor for the first page with no search, filters or
    /// sort.
    pub fn new() -> Self {
        QueryDescriptor::default()
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Sets the search text.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Adds a predicate.
    pub fn filter(mut self, field: &str, constraint: Constraint) -> Self {
        self.predicates.push(Predicate::new(field, constraint));
        self
    }

    /// Adds an equality filter.
    pub fn equals(self, field: &str, value: impl Into<Operand>) -> Self {
        self.filter(field, Constraint::equals(value))
    }

    /// Adds an equality filter that is inactive when `value` is `None`,
    /// as for an "All" dropdown choice.
    pub fn equals_opt<V: Into<Operand>>(self, field: &str, value: Option<V>) -> Self {
        self.filter(field, Constraint::Equals(value.map(Into::into)))
    }

    /// Adds a set-membership filter. An empty set is inactive.
    pub fn one_of<I, V>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        self.filter(field, Constraint::one_of(values))
    }

    /// Adds a numeric minimum (inclusive).
    pub fn min(self, field: &str, value: impl Into<Number>) -> Self {
        self.filter(field, Constraint::min(value))
    }

    /// Adds a numeric minimum that is inactive when `value` is `None`.
    pub fn min_opt<N: Into<Number>>(self, field: &str, value: Option<N>) -> Self {
        self.filter(field, Constraint::Min(value.map(Into::into)))
    }

    /// Adds a numeric maximum (inclusive).
    pub fn max(self, field: &str, value: impl Into<Number>) -> Self {
        self.filter(field, Constraint::max(value))
    }

    /// Adds a numeric maximum that is inactive when `value` is `None`.
    pub fn max_opt<N: Into<Number>>(self, field: &str, value: Option<N>) -> Self {
        self.filter(field, Constraint::Max(value.map(Into::into)))
    }

    /// Adds an inclusive date range; either bound may be absent.
    pub fn date_range(self, field: &str, from: Option<Timestamp>, to: Option<Timestamp>) -> Self {
        self.filter(field, Constraint::DateRange { from, to })
    }

    // ========================================================================
    // Sort and paging
    // ========================================================================

    /// Sets the sort.
    pub fn sort_by(mut self, field: &str, dir: Dir) -> Self {
        self.sort = Some(Sort::new(field, dir));
        self
    }

    /// Sets ascending sort on a field.
    pub fn sort_asc(self, field: &str) -> Self {
        self.sort_by(field, Dir::Asc)
    }

    /// Sets descending sort on a field.
    pub fn sort_desc(self, field: &str) -> Self {
        self.sort_by(field, Dir::Desc)
    }

    /// Removes the sort, restoring collection order.
    pub fn unsorted(mut self) -> Self {
        self.sort = None;
        self
    }

    /// Sets the requested page (1-based).
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Sets the page size.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Finalizes the descriptor.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns `true` if search text is set.
    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }

    /// Active predicates in evaluation order: equality, membership, minimum,
    /// maximum, date range. Insertion order is kept within a stage.
    pub fn active_predicates(&self) -> Vec<&Predicate> {
        let mut active: Vec<&Predicate> = self
            .predicates
            .iter()
            .filter(|p| p.is_active())
            .collect();
        active.sort_by_key(|p| p.constraint.stage());
        active
    }

    /// Returns `true` if neither search nor any active filter narrows the
    /// collection.
    pub fn is_unfiltered(&self) -> bool {
        !self.has_search() && self.predicates.iter().all(|p| !p.is_active())
    }

    /// Parses a descriptor from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let d = QueryDescriptor::new();
        assert_eq!(d.page, 1);
        assert_eq!(d.page_size, DEFAULT_PAGE_SIZE);
        assert!(d.sort.is_none());
        assert!(d.is_unfiltered());
    }

    #[test]
    fn builder_collects_predicates() {
        let d = QueryDescriptor::new()
            .search("an")
            .equals("status", "open")
            .min("age", 26)
            .build();
        assert!(d.has_search());
        assert!(!d.is_unfiltered());
        assert_eq!(d.predicates.len(), 2);
        assert_eq!(d.predicates[1], Predicate::new("age", Constraint::min(26)));
    }

    #[test]
    fn optional_filters_are_inactive_when_absent() {
        let d = QueryDescriptor::new()
            .equals_opt::<&str>("status", None)
            .min_opt::<i64>("age", None)
            .max_opt("age", Some(40))
            .date_range("posted", None, None)
            .one_of::<_, &str>("type", [])
            .build();
        let active = d.active_predicates();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].constraint, Constraint::max(40));
    }

    #[test]
    fn active_predicates_are_staged() {
        let d = QueryDescriptor::new()
            .date_range("posted", Some(Timestamp(0)), None)
            .max("age", 60)
            .min("age", 18)
            .one_of("type", ["remote"])
            .equals("status", "open")
            .equals("company.name", "Acme")
            .build();
        let order: Vec<&str> = d
            .active_predicates()
            .iter()
            .map(|p| p.field.as_str())
            .collect();
        assert_eq!(
            order,
            vec!["status", "company.name", "type", "age", "age", "posted"]
        );
    }

    #[test]
    fn sort_helpers() {
        let d = QueryDescriptor::new().sort_desc("salary");
        assert_eq!(d.sort, Some(Sort::desc("salary")));
        assert_eq!(d.unsorted().sort, None);
    }

    #[test]
    fn from_json_fills_defaults() {
        let d = QueryDescriptor::from_json(
            r#"{
                "search": "an",
                "predicates": [{"field": "age", "constraint": {"min": 26}}],
                "sort": {"field": "age", "dir": "desc"}
            }"#,
        )
        .unwrap();
        assert_eq!(d.search, "an");
        assert_eq!(d.page, 1);
        assert_eq!(d.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(d.sort, Some(Sort::desc("age")));

        assert!(QueryDescriptor::from_json("{\"page\": -1}").is_err());
    }

    #[test]
    fn yaml_round_trip() {
        let d = QueryDescriptor::new()
            .one_of("type", ["remote", "hybrid"])
            .sort_asc("title")
            .page(3);
        let yaml = serde_yaml::to_string(&d).unwrap();
        let back: QueryDescriptor = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, d);
    }
}
