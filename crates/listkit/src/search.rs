//! Case-insensitive free-text search across configured fields.

use crate::value::Value;

/// A prepared search needle.
///
/// The needle is lower-cased once per query; haystacks are compared without
/// allocating when both sides are ASCII.
#[derive(Debug, Clone)]
pub(crate) struct Needle {
    lowered: String,
    ascii: bool,
}

impl Needle {
    /// Prepares a needle. Returns `None` for empty search text, which
    /// matches everything.
    pub(crate) fn new(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        let lowered = text.to_lowercase();
        let ascii = lowered.is_ascii();
        Some(Needle { lowered, ascii })
    }

    /// Returns `true` if the field value contains the needle.
    ///
    /// Text is matched as-is, numbers by their decimal rendering and
    /// timestamps by their RFC 3339 form in UTC (`2024-03-01T00:00:00.000Z`).
    /// Enums, booleans and missing fields are empty haystacks.
    pub(crate) fn found_in(&self, value: &Value<'_>) -> bool {
        match value {
            Value::String(s) => self.found_in_text(s),
            Value::Number(n) => self.found_in_text(&n.to_string()),
            Value::Timestamp(ts) => self.found_in_text(&ts.to_string()),
            Value::Enum(_) | Value::Bool(_) | Value::None => false,
        }
    }

    fn found_in_text(&self, haystack: &str) -> bool {
        if self.ascii && haystack.is_ascii() {
            contains_ascii_ignore_case(haystack.as_bytes(), self.lowered.as_bytes())
        } else {
            haystack.to_lowercase().contains(&self.lowered)
        }
    }
}

/// `needle` must already be lower-case.
fn contains_ascii_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| {
        window
            .iter()
            .zip(needle)
            .all(|(h, n)| h.to_ascii_lowercase() == *n)
    })
}
