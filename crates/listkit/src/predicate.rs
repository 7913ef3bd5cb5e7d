//! Field predicates for list filters.
//!
//! A [`Predicate`] pairs a field selector with a [`Constraint`]. Constraints
//! mirror the filter widgets of a list page: a dropdown (equality), a group
//! of checkboxes (set membership), min/max inputs and a date range picker.
//!
//! A constraint with nothing to compare against is *inactive*: an unset
//! dropdown, no checked boxes, an empty range. Inactive constraints are
//! skipped rather than excluding every record.

use serde::{Deserialize, Serialize};

use crate::traits::FieldEnum;
use crate::value::{Number, Timestamp, Value};

/// Owned comparison operand.
///
/// Unlike [`Value`], which borrows from a record, an operand owns its data so
/// it can live in a query descriptor. In JSON, booleans, numbers and strings
/// are written plainly; timestamps and enum discriminants are tagged
/// (`{"timestamp": "2024-01-15"}`, `{"enum": 2}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// Point in time.
    Timestamp(Timestamp),
    /// Enum discriminant.
    Enum(u32),
    /// Boolean value.
    #[serde(untagged)]
    Bool(bool),
    /// Numeric value.
    #[serde(untagged)]
    Number(Number),
    /// String value.
    #[serde(untagged)]
    String(String),
}

impl Operand {
    /// Builds an enum operand from a variant.
    pub fn variant<E: FieldEnum>(variant: &E) -> Self {
        Operand::Enum(variant.discriminant())
    }

    /// Returns `true` if a field value equals this operand.
    ///
    /// Kinds must agree; numbers compare across integer and float
    /// representations.
    pub fn equals(&self, value: &Value<'_>) -> bool {
        match (self, value) {
            (Operand::String(expected), Value::String(actual)) => expected == actual,
            (Operand::Number(expected), Value::Number(actual)) => {
                actual.compare(*expected) == Some(std::cmp::Ordering::Equal)
            }
            (Operand::Timestamp(expected), Value::Timestamp(actual)) => expected == actual,
            (Operand::Timestamp(expected), Value::String(actual)) => {
                Timestamp::parse(actual).ok().as_ref() == Some(expected)
            }
            (Operand::Enum(expected), Value::Enum(actual)) => expected == actual,
            (Operand::Bool(expected), Value::Bool(actual)) => expected == actual,
            _ => false,
        }
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::String(s)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::String(s.to_string())
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Bool(b)
    }
}

impl From<Number> for Operand {
    fn from(n: Number) -> Self {
        Operand::Number(n)
    }
}

impl From<Timestamp> for Operand {
    fn from(t: Timestamp) -> Self {
        Operand::Timestamp(t)
    }
}

macro_rules! operand_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Operand {
                fn from(n: $ty) -> Self {
                    Operand::Number(Number::from(n))
                }
            }
        )*
    };
}

operand_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// A filter constraint on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Field equals the operand. Inactive when `None`.
    Equals(Option<Operand>),
    /// Field equals one of the operands. Inactive when empty.
    OneOf(Vec<Operand>),
    /// Numeric field is at least this value. Inactive when `None`.
    Min(Option<Number>),
    /// Numeric field is at most this value. Inactive when `None`.
    Max(Option<Number>),
    /// Date field lies within the inclusive range. Each bound is optional;
    /// inactive when both are `None`.
    DateRange {
        #[serde(default)]
        from: Option<Timestamp>,
        #[serde(default)]
        to: Option<Timestamp>,
    },
}

impl Constraint {
    /// Equality constraint.
    pub fn equals(value: impl Into<Operand>) -> Self {
        Constraint::Equals(Some(value.into()))
    }

    /// Set-membership constraint.
    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        Constraint::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Numeric minimum (inclusive).
    pub fn min(value: impl Into<Number>) -> Self {
        Constraint::Min(Some(value.into()))
    }

    /// Numeric maximum (inclusive).
    pub fn max(value: impl Into<Number>) -> Self {
        Constraint::Max(Some(value.into()))
    }

    /// Inclusive date range with both bounds.
    pub fn between(from: Timestamp, to: Timestamp) -> Self {
        Constraint::DateRange {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Date range open at the end.
    pub fn since(from: Timestamp) -> Self {
        Constraint::DateRange {
            from: Some(from),
            to: None,
        }
    }

    /// Date range open at the start.
    pub fn until(to: Timestamp) -> Self {
        Constraint::DateRange {
            from: None,
            to: Some(to),
        }
    }

    /// Returns `false` when there is nothing to compare against.
    pub fn is_active(&self) -> bool {
        match self {
            Constraint::Equals(value) => value.is_some(),
            Constraint::OneOf(values) => !values.is_empty(),
            Constraint::Min(bound) | Constraint::Max(bound) => bound.is_some(),
            Constraint::DateRange { from, to } => from.is_some() || to.is_some(),
        }
    }

    /// Position in the evaluation order: equality, membership, minimum,
    /// maximum, date range.
    pub fn stage(&self) -> u8 {
        match self {
            Constraint::Equals(_) => 0,
            Constraint::OneOf(_) => 1,
            Constraint::Min(_) => 2,
            Constraint::Max(_) => 3,
            Constraint::DateRange { .. } => 4,
        }
    }

    /// Evaluates the constraint against a field value.
    ///
    /// Inactive constraints match everything. Active constraints never match
    /// a missing value or a value of the wrong kind.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        match self {
            Constraint::Equals(None) | Constraint::Min(None) | Constraint::Max(None) => true,
            Constraint::DateRange { from: None, to: None } => true,
            Constraint::Equals(Some(expected)) => expected.equals(value),
            Constraint::OneOf(allowed) => {
                allowed.is_empty() || allowed.iter().any(|operand| operand.equals(value))
            }
            Constraint::Min(Some(min)) => match value {
                Value::Number(n) => matches!(
                    n.compare(*min),
                    Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
                ),
                _ => false,
            },
            Constraint::Max(Some(max)) => match value {
                Value::Number(n) => matches!(
                    n.compare(*max),
                    Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
                ),
                _ => false,
            },
            Constraint::DateRange { from, to } => match instant(value) {
                Some(ts) => from.map_or(true, |f| ts >= f) && to.map_or(true, |t| ts <= t),
                None => false,
            },
        }
    }
}

/// Date fields may arrive as parsed timestamps or as ISO-8601 text.
fn instant(value: &Value<'_>) -> Option<Timestamp> {
    match value {
        Value::Timestamp(ts) => Some(*ts),
        Value::String(s) => Timestamp::parse(s).ok(),
        _ => None,
    }
}

/// A single filter predicate: a field selector and its constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Field selector, dotted for nested values.
    pub field: String,
    /// The constraint applied to the field.
    pub constraint: Constraint,
}

impl Predicate {
    /// Creates a new predicate.
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Predicate {
            field: field.into(),
            constraint,
        }
    }

    /// Returns `false` if the constraint is inactive.
    pub fn is_active(&self) -> bool {
        self.constraint.is_active()
    }

    /// Evaluates the predicate against a field value.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        self.constraint.matches(value)
    }
}
