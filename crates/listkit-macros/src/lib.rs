//! Proc macros for listkit.
//!
//! - [`Record`] - Generate `listkit::Record` (and optionally
//!   `listkit::Keyed`) from struct field annotations
//!
//! The macro is re-exported by `listkit` behind its default `derive`
//! feature; depend on this crate directly only when that feature is off.
//! For working examples, see `listkit/tests/derive.rs`.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `listkit::Record` for a struct with named fields.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `text` | Searchable text (`String`, `&str`, `Option<String>`) |
/// | `number` | Numeric field, any primitive or `Option` of one |
/// | `date` | Timestamp, chrono date/time, epoch millis or ISO-8601 text |
/// | `Enum` | Enum compared by discriminant; requires `FieldEnum` |
/// | `bool` | Boolean field |
/// | `nested` | Struct implementing `Record`, queried as `field.sub` |
/// | `key` | The record's identifier; also generates `listkit::Keyed` |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Use a custom query name |
/// | `ty = "..."` | Kind given as a string (for `ty = "enum"`) |
///
/// Fields without an attribute are not queryable.
///
/// # Generated Code
///
/// 1. Field name constants (e.g. `Job::TITLE`, `Job::POSTED_AT`)
/// 2. `impl listkit::Record`
/// 3. `impl listkit::Keyed` with `Key` set to the `key` field's type, when
///    one field is marked `key`
///
/// # Example
///
/// ```ignore
/// use listkit::{ListEngine, QueryDescriptor, Record};
///
/// #[derive(Record)]
/// struct Company {
///     #[record(text)]
///     name: String,
/// }
///
/// #[derive(Record)]
/// struct Job {
///     #[record(number, key)]
///     id: u32,
///     #[record(text)]
///     title: String,
///     #[record(nested)]
///     company: Company,
///     #[record(date)]
///     posted_at: String,
///     #[record(skip)]
///     notes: String,
/// }
///
/// let engine = ListEngine::new([Job::TITLE, "company.name"]);
/// let descriptor = QueryDescriptor::new().search("rust").sort_desc(Job::POSTED_AT);
/// let page = engine.query(&jobs, &descriptor);
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
