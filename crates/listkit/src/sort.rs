//! Sort direction, sort descriptors and the column sort itself.
//!
//! Sorting is stable. Strings use a locale-style collation: compared first
//! without accents or case (via transliteration), then with accents, then
//! with lowercase before uppercase. Numbers compare numerically and
//! timestamps as instants.
//!
//! A column sorts by the kind of its first present value. Records whose
//! value is missing, NaN, or of another kind cannot be placed relative to
//! the rest; they compare equal to each other and follow every comparable
//! record, keeping their input order, in both directions.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::value::{Number, Timestamp, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Smallest first.
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    /// Largest first.
    #[serde(alias = "descending")]
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Returns the opposite direction.
    pub fn flip(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sort on one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    /// Field selector.
    pub field: String,
    /// Direction.
    #[serde(default)]
    pub dir: Dir,
}

impl Sort {
    /// Creates a sort with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        Sort {
            field: field.into(),
            dir,
        }
    }

    /// Ascending sort on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Sort::new(field, Dir::Asc)
    }

    /// Descending sort on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Sort::new(field, Dir::Desc)
    }
}

/// Computes the sort after a click on a column header.
///
/// Clicking the current sort column flips its direction; any other column
/// (or the first click) sorts that column ascending.
///
/// ```
/// use listkit::{toggle_sort, Dir, Sort};
///
/// let first = toggle_sort(None, "salary");
/// assert_eq!(first, Sort::asc("salary"));
///
/// let second = toggle_sort(Some(&first), "salary");
/// assert_eq!(second.dir, Dir::Desc);
///
/// let other = toggle_sort(Some(&second), "title");
/// assert_eq!(other, Sort::asc("title"));
/// ```
pub fn toggle_sort(current: Option<&Sort>, field: &str) -> Sort {
    match current {
        Some(sort) if sort.field == field => Sort::new(field, sort.dir.flip()),
        _ => Sort::asc(field),
    }
}

/// Per-record sort key, computed once before sorting.
#[derive(Debug)]
enum SortKey<'a> {
    Text(Collation<'a>),
    Number(Number),
    Time(Timestamp),
    Enum(u32),
    Bool(bool),
    Missing,
}

impl<'a> SortKey<'a> {
    fn from_value(value: Value<'a>, as_date: bool) -> Self {
        match value {
            Value::String(s) if as_date => match Timestamp::parse(s) {
                Ok(ts) => SortKey::Time(ts),
                Err(_) => SortKey::Missing,
            },
            Value::String(s) => SortKey::Text(Collation::new(s)),
            Value::Number(n) if n.is_nan() => SortKey::Missing,
            Value::Number(n) => SortKey::Number(n),
            Value::Timestamp(ts) => SortKey::Time(ts),
            Value::Enum(d) => SortKey::Enum(d),
            Value::Bool(b) => SortKey::Bool(b),
            Value::None => SortKey::Missing,
        }
    }

    fn kind(&self) -> Option<u8> {
        match self {
            SortKey::Text(_) => Some(0),
            SortKey::Number(_) => Some(1),
            SortKey::Time(_) => Some(2),
            SortKey::Enum(_) => Some(3),
            SortKey::Bool(_) => Some(4),
            SortKey::Missing => None,
        }
    }

    fn compare(&self, other: &Self, dir: Dir) -> Ordering {
        let ordering = match (self, other) {
            (SortKey::Missing, SortKey::Missing) => return Ordering::Equal,
            (SortKey::Missing, _) => return Ordering::Greater,
            (_, SortKey::Missing) => return Ordering::Less,
            (SortKey::Text(a), SortKey::Text(b)) => a.compare(b),
            // NaN is keyed as missing, so every pair here is ordered
            (SortKey::Number(a), SortKey::Number(b)) => a.compare(*b).unwrap_or(Ordering::Equal),
            (SortKey::Time(a), SortKey::Time(b)) => a.cmp(b),
            (SortKey::Enum(a), SortKey::Enum(b)) => a.cmp(b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            _ => {
                debug_assert!(
                    self.kind() == other.kind(),
                    "sort keys of different kinds must be rewritten to missing before sorting"
                );
                Ordering::Equal
            }
        };
        dir.apply(ordering)
    }
}

/// Collation key for one string.
#[derive(Debug)]
struct Collation<'a> {
    /// Transliterated and lower-cased: "Élodie" -> "elodie".
    base: String,
    /// Lower-cased with accents kept.
    accented: String,
    raw: &'a str,
}

impl<'a> Collation<'a> {
    fn new(raw: &'a str) -> Self {
        let accented = raw.to_lowercase();
        let base = if accented.is_ascii() {
            accented.clone()
        } else {
            deunicode::deunicode(&accented).to_lowercase()
        };
        Collation {
            base,
            accented,
            raw,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.base
            .cmp(&other.base)
            .then_with(|| self.accented.cmp(&other.accented))
            .then_with(|| {
                // Lowercase before uppercase at the first case difference
                let case_key = |c: char| (!c.is_lowercase(), c);
                self.raw
                    .chars()
                    .map(case_key)
                    .cmp(other.raw.chars().map(case_key))
            })
    }
}

/// Compares two strings with the collation used for sorting.
pub fn collate(a: &str, b: &str) -> Ordering {
    Collation::new(a).compare(&Collation::new(b))
}

/// Stable-sorts `items` in place by the sort's field.
///
/// With `as_date`, string values are parsed as ISO-8601 and compared as
/// instants; unparseable strings count as missing.
pub(crate) fn sort_items<'a, T, F>(items: &mut Vec<&'a T>, sort: &Sort, as_date: bool, accessor: &F)
where
    for<'b> F: Fn(&'b T, &str) -> Value<'b>,
{
    if items.len() < 2 {
        return;
    }

    let mut keyed: Vec<(SortKey<'a>, &'a T)> = items
        .iter()
        .map(|item| {
            let key = SortKey::from_value(accessor(*item, &sort.field), as_date);
            (key, *item)
        })
        .collect();

    if let Some(column_kind) = keyed.iter().find_map(|(key, _)| key.kind()) {
        for (key, _) in keyed.iter_mut() {
            if key.kind().is_some_and(|kind| kind != column_kind) {
                *key = SortKey::Missing;
            }
        }
    }

    keyed.sort_by(|(a, _), (b, _)| a.compare(b, sort.dir));

    items.clear();
    items.extend(keyed.into_iter().map(|(_, item)| item));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_apply_and_flip() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(Dir::Asc.flip(), Dir::Desc);
        assert_eq!(Dir::Desc.flip(), Dir::Asc);
        assert!(Dir::default().is_asc());
        assert!(Dir::Desc.is_desc());
    }

    #[test]
    fn dir_display_and_serde() {
        assert_eq!(Dir::Asc.to_string(), "asc");
        assert_eq!(Dir::Desc.to_string(), "desc");
        let d: Dir = serde_json::from_str("\"descending\"").unwrap();
        assert_eq!(d, Dir::Desc);
        let s: Sort = serde_json::from_str(r#"{"field":"age"}"#).unwrap();
        assert_eq!(s, Sort::asc("age"));
    }

    #[test]
    fn toggle_same_field_flips() {
        let asc = Sort::asc("age");
        assert_eq!(toggle_sort(Some(&asc), "age"), Sort::desc("age"));
        assert_eq!(toggle_sort(Some(&Sort::desc("age")), "age"), asc);
    }

    #[test]
    fn toggle_new_field_starts_ascending() {
        assert_eq!(toggle_sort(None, "name"), Sort::asc("name"));
        assert_eq!(toggle_sort(Some(&Sort::desc("age")), "name"), Sort::asc("name"));
    }

    #[test]
    fn collation_ignores_case_and_accents_first() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Zebra", "apple"), Ordering::Greater);
        assert_eq!(collate("élan", "emu"), Ordering::Less);
        assert_eq!(collate("Ärger", "Zorn"), Ordering::Less);
    }

    #[test]
    fn collation_tie_breaks() {
        // Accents after base letters
        assert_eq!(collate("resume", "résumé"), Ordering::Less);
        // Lowercase before uppercase
        assert_eq!(collate("ana", "Ana"), Ordering::Less);
        assert_eq!(collate("Ana", "ana"), Ordering::Greater);
        assert_eq!(collate("Ana", "Ana"), Ordering::Equal);
    }

    #[test]
    fn number_keys_total() {
        let key = |n| SortKey::from_value(Value::Number(n), false);
        let asc = |a, b| key(a).compare(&key(b), Dir::Asc);
        assert_eq!(asc(Number::I64(-1), Number::U64(1)), Ordering::Less);
        assert_eq!(asc(Number::F64(2.5), Number::I64(2)), Ordering::Greater);
        assert!(matches!(key(Number::F64(f64::NAN)), SortKey::Missing));

        let two_53 = 9_007_199_254_740_992u64;
        assert_eq!(asc(Number::U64(two_53 + 1), Number::F64(two_53 as f64)), Ordering::Greater);
        assert_eq!(asc(Number::F64(two_53 as f64), Number::U64(two_53)), Ordering::Equal);
    }

    #[test]
    fn mixed_integer_and_float_column_sorts_exactly() {
        let two_53 = 9_007_199_254_740_992u64;
        let rows: Vec<Row> = (0..60)
            .map(|i| Row {
                id: i,
                v: Value::Number(match i % 3 {
                    0 => Number::U64(two_53 + 1),
                    1 => Number::F64(two_53 as f64),
                    _ => Number::U64(two_53),
                }),
            })
            .collect();
        let mut items: Vec<&Row> = rows.iter().collect();
        sort_items(&mut items, &Sort::asc("v"), false, &row_accessor);

        let values: Vec<Number> = items.iter().filter_map(|row| row.v.as_number()).collect();
        assert!(values
            .windows(2)
            .all(|pair| pair[0].compare(pair[1]) != Some(Ordering::Greater)));
        assert_eq!(values.last(), Some(&Number::U64(two_53 + 1)));
    }

    #[derive(Debug)]
    struct Row {
        id: u32,
        v: Value<'static>,
    }

    fn row_accessor<'a>(row: &'a Row, _field: &str) -> Value<'a> {
        row.v.clone()
    }

    fn ids(items: &[&Row]) -> Vec<u32> {
        items.iter().map(|r| r.id).collect()
    }

    #[test]
    fn missing_and_mismatched_values_trail_in_both_directions() {
        let rows = vec![
            Row { id: 1, v: Value::Number(Number::I64(3)) },
            Row { id: 2, v: Value::None },
            Row { id: 3, v: Value::Number(Number::I64(1)) },
            Row { id: 4, v: Value::String("x") },
            Row { id: 5, v: Value::Number(Number::F64(f64::NAN)) },
            Row { id: 6, v: Value::Number(Number::I64(2)) },
        ];

        let mut asc: Vec<&Row> = rows.iter().collect();
        sort_items(&mut asc, &Sort::asc("v"), false, &row_accessor);
        assert_eq!(ids(&asc), vec![3, 6, 1, 2, 4, 5]);

        let mut desc: Vec<&Row> = rows.iter().collect();
        sort_items(&mut desc, &Sort::desc("v"), false, &row_accessor);
        assert_eq!(ids(&desc), vec![1, 6, 3, 2, 4, 5]);
    }

    #[test]
    fn date_columns_parse_text() {
        let rows = vec![
            Row { id: 1, v: Value::String("2024-03-01") },
            Row { id: 2, v: Value::String("2024-01-15T08:00:00+07:00") },
            Row { id: 3, v: Value::String("2024-01-15") },
            Row { id: 4, v: Value::String("soon") },
        ];
        let mut items: Vec<&Row> = rows.iter().collect();
        sort_items(&mut items, &Sort::asc("v"), true, &row_accessor);
        // 08:00+07:00 is 01:00Z, after midnight UTC
        assert_eq!(ids(&items), vec![3, 2, 1, 4]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let rows = vec![
            Row { id: 1, v: Value::Bool(true) },
            Row { id: 2, v: Value::Bool(false) },
            Row { id: 3, v: Value::Bool(true) },
            Row { id: 4, v: Value::Bool(false) },
        ];
        let mut items: Vec<&Row> = rows.iter().collect();
        sort_items(&mut items, &Sort::desc("v"), false, &row_accessor);
        assert_eq!(ids(&items), vec![1, 3, 2, 4]);
    }
}
