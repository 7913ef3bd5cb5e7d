//! Traits connecting user records to the engine.
//!
//! [`Record`] exposes field values by selector, [`Keyed`] exposes the stable
//! identifier used by selections. The `Field*` helper traits are what the
//! `#[derive(Record)]` macro calls to turn a struct field into a [`Value`];
//! they can also be used directly in hand-written impls.

use std::hash::Hash;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::value::{Number, Timestamp, Value};

/// A queryable record.
///
/// Usually derived with `#[derive(Record)]`, but easy to write by hand.
/// Selectors for nested values use dots (`company.name`). Unknown
/// selectors must return [`Value::None`].
///
/// ```
/// use listkit::{Number, Record, Value};
///
/// struct Applicant {
///     name: String,
///     age: u8,
/// }
///
/// impl Record for Applicant {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             "age" => Value::Number(Number::U64(self.age as u64)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field, or [`Value::None`] if absent.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Accessor function form of [`Record::field_value`], for APIs that take
    /// an accessor closure.
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

impl<T: Record + ?Sized> Record for &T {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

/// An absent nested record has no fields.
impl<T: Record> Record for Option<T> {
    fn field_value(&self, field: &str) -> Value<'_> {
        match self {
            Some(record) => record.field_value(field),
            None => Value::None,
        }
    }
}

/// A record with a stable unique identifier.
pub trait Keyed {
    /// Identifier type.
    type Key: Clone + Eq + Hash;

    /// Returns this record's identifier.
    fn key(&self) -> Self::Key;
}

impl<T: Keyed + ?Sized> Keyed for &T {
    type Key = T::Key;

    fn key(&self) -> Self::Key {
        (**self).key()
    }
}

/// JSON objects are records: selectors walk object members, and numeric
/// segments index into arrays (`tags.0`). Strings, numbers and booleans map
/// to their [`Value`]; null, arrays and objects are [`Value::None`].
impl Record for serde_json::Value {
    fn field_value(&self, field: &str) -> Value<'_> {
        let mut current = self;
        for segment in field.split('.') {
            let next = match current {
                serde_json::Value::Object(map) => map.get(segment),
                serde_json::Value::Array(items) => {
                    segment.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Value::None,
            }
        }

        match current {
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Number(n) => json_number(n),
            serde_json::Value::Bool(b) => Value::Bool(*b),
            _ => Value::None,
        }
    }
}

fn json_number(n: &serde_json::Number) -> Value<'static> {
    if let Some(i) = n.as_i64() {
        Value::Number(Number::I64(i))
    } else if let Some(u) = n.as_u64() {
        Value::Number(Number::U64(u))
    } else if let Some(f) = n.as_f64() {
        Value::Number(Number::F64(f))
    } else {
        Value::None
    }
}

/// JSON records are keyed by their `id` member rendered as a string, so
/// `{"id": 4}` and `{"id": "4"}` share the key `"4"`. Records without an id
/// key to the empty string.
impl Keyed for serde_json::Value {
    type Key = String;

    fn key(&self) -> String {
        match self.get("id") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

/// Text fields.
pub trait FieldText {
    /// Returns the field as [`Value::String`].
    fn text_value(&self) -> Value<'_>;
}

impl FieldText for String {
    fn text_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl FieldText for str {
    fn text_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl FieldText for &str {
    fn text_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl<T: FieldText> FieldText for Option<T> {
    fn text_value(&self) -> Value<'_> {
        match self {
            Some(text) => text.text_value(),
            None => Value::None,
        }
    }
}

/// Numeric fields.
pub trait FieldNumber {
    /// Returns the field as [`Value::Number`].
    fn number_value(&self) -> Value<'_>;
}

macro_rules! field_number {
    ($($ty:ty),*) => {
        $(
            impl FieldNumber for $ty {
                fn number_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

field_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: FieldNumber> FieldNumber for Option<T> {
    fn number_value(&self) -> Value<'_> {
        match self {
            Some(n) => n.number_value(),
            None => Value::None,
        }
    }
}

/// Date and time fields.
///
/// Integers are milliseconds since the Unix epoch; strings are parsed as
/// ISO-8601 and yield `None` when they are not dates.
pub trait FieldTimestamp {
    /// Converts the field to a [`Timestamp`], if it holds one.
    fn timestamp(&self) -> Option<Timestamp>;

    /// Returns the field as [`Value::Timestamp`] or [`Value::None`].
    fn timestamp_value(&self) -> Value<'_> {
        match self.timestamp() {
            Some(ts) => Value::Timestamp(ts),
            None => Value::None,
        }
    }
}

impl FieldTimestamp for Timestamp {
    fn timestamp(&self) -> Option<Timestamp> {
        Some(*self)
    }
}

impl FieldTimestamp for i64 {
    fn timestamp(&self) -> Option<Timestamp> {
        Some(Timestamp::from_millis(*self))
    }
}

impl FieldTimestamp for u64 {
    fn timestamp(&self) -> Option<Timestamp> {
        i64::try_from(*self).ok().map(Timestamp::from_millis)
    }
}

impl FieldTimestamp for String {
    fn timestamp(&self) -> Option<Timestamp> {
        Timestamp::parse(self).ok()
    }
}

impl FieldTimestamp for str {
    fn timestamp(&self) -> Option<Timestamp> {
        Timestamp::parse(self).ok()
    }
}

impl FieldTimestamp for &str {
    fn timestamp(&self) -> Option<Timestamp> {
        Timestamp::parse(self).ok()
    }
}

impl<Tz: TimeZone> FieldTimestamp for DateTime<Tz> {
    fn timestamp(&self) -> Option<Timestamp> {
        Some(Timestamp::from_millis(self.timestamp_millis()))
    }
}

impl FieldTimestamp for NaiveDateTime {
    fn timestamp(&self) -> Option<Timestamp> {
        Some(Timestamp::from_millis(self.and_utc().timestamp_millis()))
    }
}

impl FieldTimestamp for NaiveDate {
    fn timestamp(&self) -> Option<Timestamp> {
        self.and_hms_opt(0, 0, 0)
            .map(|ndt| Timestamp::from_millis(ndt.and_utc().timestamp_millis()))
    }
}

impl<T: FieldTimestamp> FieldTimestamp for Option<T> {
    fn timestamp(&self) -> Option<Timestamp> {
        self.as_ref().and_then(FieldTimestamp::timestamp)
    }
}

/// Enumerated fields, compared by a stable discriminant.
///
/// Use explicit values rather than declaration order so saved filters keep
/// working when variants are added.
///
/// ```
/// use listkit::FieldEnum;
///
/// enum Status {
///     Applied,
///     Interview,
///     Offer,
/// }
///
/// impl FieldEnum for Status {
///     fn discriminant(&self) -> u32 {
///         match self {
///             Status::Applied => 0,
///             Status::Interview => 1,
///             Status::Offer => 2,
///         }
///     }
/// }
/// ```
pub trait FieldEnum {
    /// Returns the discriminant for this variant.
    fn discriminant(&self) -> u32;
}

/// Boolean fields.
pub trait FieldBool {
    /// Returns the field as [`Value::Bool`].
    fn bool_value(&self) -> Value<'_>;
}

impl FieldBool for bool {
    fn bool_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl FieldBool for Option<bool> {
    fn bool_value(&self) -> Value<'_> {
        match self {
            Some(b) => Value::Bool(*b),
            None => Value::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Applicant {
        id: u32,
        name: String,
        age: i32,
    }

    impl Record for Applicant {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => self.name.text_value(),
                "age" => self.age.number_value(),
                _ => Value::None,
            }
        }
    }

    impl Keyed for Applicant {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }
    }

    fn ana() -> Applicant {
        Applicant {
            id: 1,
            name: "Ana".to_string(),
            age: 30,
        }
    }

    #[test]
    fn manual_record_impl() {
        let a = ana();
        assert_eq!(a.field_value("name"), Value::String("Ana"));
        assert_eq!(a.field_value("age"), Value::Number(Number::I64(30)));
        assert_eq!(a.field_value("email"), Value::None);
        assert_eq!(Applicant::accessor(&a, "name"), Value::String("Ana"));
    }

    #[test]
    fn references_forward() {
        let a = ana();
        let r = &a;
        assert_eq!(r.field_value("name"), Value::String("Ana"));
        assert_eq!(r.key(), 1);

        let boxed: Box<Applicant> = Box::new(ana());
        assert_eq!(boxed.field_value("age"), Value::Number(Number::I64(30)));

        assert_eq!(Some(ana()).field_value("name"), Value::String("Ana"));
        assert_eq!(None::<Applicant>.field_value("name"), Value::None);
    }

    #[test]
    fn json_paths() {
        let job = json!({
            "id": 7,
            "title": "Backend Engineer",
            "salary": 12000000,
            "rating": 4.5,
            "remote": true,
            "company": { "name": "Nusantara Tech", "city": null },
            "tags": ["rust", "sql"]
        });

        assert_eq!(job.field_value("title"), Value::String("Backend Engineer"));
        assert_eq!(
            job.field_value("salary"),
            Value::Number(Number::I64(12_000_000))
        );
        assert_eq!(job.field_value("rating"), Value::Number(Number::F64(4.5)));
        assert_eq!(job.field_value("remote"), Value::Bool(true));
        assert_eq!(
            job.field_value("company.name"),
            Value::String("Nusantara Tech")
        );
        assert_eq!(job.field_value("company.city"), Value::None);
        assert_eq!(job.field_value("company"), Value::None);
        assert_eq!(job.field_value("tags.1"), Value::String("sql"));
        assert_eq!(job.field_value("tags.9"), Value::None);
        assert_eq!(job.field_value("title.length"), Value::None);
        assert_eq!(job.field_value(""), Value::None);
    }

    #[test]
    fn json_keys() {
        assert_eq!(json!({"id": 4}).key(), "4");
        assert_eq!(json!({"id": "job-4"}).key(), "job-4");
        assert_eq!(json!({"name": "no id"}).key(), "");
        assert_eq!(json!([1, 2]).key(), "");
    }

    #[test]
    fn field_helpers() {
        let missing: Option<String> = None;
        assert_eq!(missing.text_value(), Value::None);
        assert_eq!(Some(3u8).number_value(), Value::Number(Number::U64(3)));
        assert_eq!(Option::<f64>::None.number_value(), Value::None);

        assert_eq!(
            "1970-01-01T00:00:01Z".timestamp(),
            Some(Timestamp::from_millis(1000))
        );
        assert_eq!(String::from("not a date").timestamp_value(), Value::None);
        assert_eq!(u64::MAX.timestamp(), None);
        assert_eq!(
            NaiveDate::from_ymd_opt(1970, 1, 2).timestamp(),
            Some(Timestamp(86_400_000))
        );

        assert_eq!(true.bool_value(), Value::Bool(true));
        assert_eq!(Option::<bool>::None.bool_value(), Value::None);
    }
}
