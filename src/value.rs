//! Cell values and the type inference applied to trimmed CSV fields.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Decimal numbers without superfluous leading zeros, with a fraction, an
/// exponent, or both.
static FLOAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:0|[1-9]\d*)(?:\.\d+(?:[eE][-+]?\d+)?|[eE][-+]?\d+)$")
        .expect("Invalid float pattern")
});

/// Largest magnitude up to which every integer is exactly representable as
/// a spreadsheet number (an `f64`).
pub const MAX_EXACT_INTEGER: i64 = 1 << 53;

/// A single cell of a parsed record.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing or empty field.
    #[default]
    Empty,
    /// Text kept verbatim.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// `true` / `false`.
    Boolean(bool),
}

impl CellValue {
    /// Classify an already-trimmed field.
    ///
    /// Only unambiguous spellings are coerced: `007`, `+5`, `1,5`, `NaN` or
    /// `yes` all stay text. Integers beyond [`MAX_EXACT_INTEGER`] (long IDs,
    /// card numbers) also stay text, since a spreadsheet number would round
    /// them.
    pub fn infer(field: &str) -> Self {
        if field.is_empty() {
            return CellValue::Empty;
        }

        if field.eq_ignore_ascii_case("true") {
            return CellValue::Boolean(true);
        }
        if field.eq_ignore_ascii_case("false") {
            return CellValue::Boolean(false);
        }

        if is_canonical_int(field) {
            if let Ok(n) = field.parse::<i64>() {
                if n.unsigned_abs() <= MAX_EXACT_INTEGER.unsigned_abs() {
                    return CellValue::Integer(n);
                }
                return CellValue::Text(field.to_owned());
            }
        }

        if FLOAT_PATTERN.is_match(field) {
            if let Ok(f) = field.parse::<f64>() {
                if f.is_finite() {
                    return CellValue::Float(f);
                }
            }
        }

        CellValue::Text(field.to_owned())
    }

    /// Wrap a field without inference; only the empty string is special.
    pub fn text(field: &str) -> Self {
        if field.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(field.to_owned())
        }
    }

    /// Returns true for [`CellValue::Empty`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Returns true if this value is numeric.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }

    /// The text content, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Optional `-`, then either `0` or a digit string without leading zeros.
#[inline]
fn is_canonical_int(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    match digits.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(n) => write!(f, "{n}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Float(x)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}
