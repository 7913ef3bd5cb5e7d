//! listkit - search, filter, sort, paginate and select over in-memory lists.
//!
//! listkit is the query core behind admin-style list views: a table of jobs,
//! applications or users with a search box, filter dropdowns and checkbox
//! groups, sortable column headers, a pager and row checkboxes for bulk
//! actions. It provides:
//!
//! - One pure query function producing a page of results plus totals
//! - Case-insensitive substring search across configured (dotted) fields
//! - Field filters: equality, set membership, numeric min/max, date ranges
//! - Stable, collation-aware single-column sort with header-click toggling
//! - Page-scoped "select all", row toggles and bulk removal
//! - Per-list configuration loaded from YAML or JSON
//!
//! # Quick Start
//!
//! ```rust
//! use listkit::{ListEngine, QueryDescriptor, Record, Value, Number, Keyed};
//!
//! struct User {
//!     id: u32,
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Record for User {
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "name" => Value::String(&self.name),
//!             "age" => Value::Number(Number::U64(self.age as u64)),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! impl Keyed for User {
//!     type Key = u32;
//!     fn key(&self) -> u32 {
//!         self.id
//!     }
//! }
//!
//! let users = vec![
//!     User { id: 1, name: "Ana".into(), age: 30 },
//!     User { id: 2, name: "Budi".into(), age: 25 },
//!     User { id: 3, name: "Dani".into(), age: 41 },
//! ];
//!
//! let engine = ListEngine::new(["name"]);
//! let descriptor = QueryDescriptor::new()
//!     .search("an")
//!     .min("age", 26)
//!     .sort_desc("age");
//!
//! let page = engine.query(&users, &descriptor);
//! assert_eq!(page.keys(), vec![3, 1]);
//! assert_eq!(page.total_items, 2);
//! assert_eq!(page.total_pages, 1);
//! ```
//!
//! # Query Pipeline
//!
//! ```text
//! records ─▶ search ─▶ filters ─▶ sort ─▶ page window ─▶ ResultPage
//! ```
//!
//! - **Search**: a record passes if any search field contains the text,
//!   ignoring case. Empty text passes everything.
//! - **Filters**: every active predicate must hold. A predicate with no
//!   value ("All" in a dropdown, an empty checkbox group, a date range with
//!   no bounds) is inactive and ignored.
//! - **Sort**: stable; missing values go last in both directions.
//! - **Page window**: `total_items` and `total_pages` describe the whole
//!   filtered result; `items` is the requested slice, empty when out of
//!   range.
//!
//! Queries never fail and never mutate their input. Unknown fields read as
//! missing values.
//!
//! # Field Types and Constraints
//!
//! | Constraint | Field types |
//! |------------|-------------|
//! | `Equals`, `OneOf` | String, Number, Timestamp, Enum, Bool |
//! | `Min`, `Max` | Number |
//! | `DateRange` | Timestamp, ISO-8601 text |
//!
//! # Records
//!
//! Implement [`Record`] by hand, derive it with `#[derive(Record)]`, pass an
//! accessor closure to [`ListEngine::query_by`], or query
//! `serde_json::Value` objects directly. [`Keyed`] supplies the identity
//! used by selections.
//!
//! # Selection
//!
//! [`Selection`] is a set of keys that survives paging and filtering.
//! [`select_all`] toggles only the visible page, [`toggle_one`] flips one
//! row, and [`bulk_remove`] drops the selected records. [`ListState`] ties a
//! descriptor and a selection together for event-driven views.

mod config;
mod descriptor;
mod engine;
mod error;
mod page;
mod predicate;
mod search;
mod selection;
mod sort;
mod state;
mod traits;
mod value;

// Re-export public API
pub use config::{ListCatalog, ListConfig};
pub use descriptor::{QueryDescriptor, DEFAULT_PAGE_SIZE};
pub use engine::{query, ListEngine};
pub use error::{ListError, Result};
pub use page::{clamp_page, total_pages, ResultPage};
pub use predicate::{Constraint, Operand, Predicate};
pub use selection::{bulk_remove, select_all, toggle_one, PageSelection, Selection};
pub use sort::{collate, toggle_sort, Dir, Sort};
pub use state::ListState;
pub use traits::{FieldBool, FieldEnum, FieldNumber, FieldText, FieldTimestamp, Keyed, Record};
pub use value::{Number, Timestamp, Value};

#[cfg(feature = "derive")]
pub use listkit_macros::Record;
