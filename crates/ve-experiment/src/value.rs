//! Parameter values and value sets

use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::ops::Range;

/// One admissible value of a sweep parameter
///
/// Rendered into paths and tool arguments via [`Display`]. No numeric
/// interpretation happens past this point; the external tool receives text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Free-form text
    Str(String),
}

impl ParamValue {
    /// Convert a JSON scalar
    ///
    /// Returns `None` for `null`, arrays and objects.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(if let Some(i) = n.as_i64() {
                Self::Int(i)
            } else if n.is_u64() {
                // Above i64::MAX; keep the exact digits.
                Self::Str(n.to_string())
            } else {
                Self::Float(n.as_f64().unwrap_or(f64::NAN))
            }),
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Rendered form used in path segments and `-c` assignments
    #[inline]
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            // Debug keeps `1.0` and switches to exponent form (`1e16`, `1e-5`),
            // so a float never renders like an integer.
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Ordered admissible values of one parameter
///
/// Order is kept for expansion. A scalar in a specification becomes a
/// one-element set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSet(Vec<ParamValue>);

impl ValueSet {
    /// Create from values
    #[inline]
    #[must_use]
    pub fn new(values: Vec<ParamValue>) -> Self {
        Self(values)
    }

    /// Create a one-element set
    #[inline]
    #[must_use]
    pub fn single(value: impl Into<ParamValue>) -> Self {
        Self(vec![value.into()])
    }

    /// Integers in `range`, ascending
    #[must_use]
    pub fn range(range: Range<i64>) -> Self {
        range.map(ParamValue::Int).collect()
    }

    /// Number of values
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no values
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate values in order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ParamValue> {
        self.0.iter()
    }

    /// Rendered values in order
    #[must_use]
    pub fn rendered(&self) -> Vec<String> {
        self.0.iter().map(ParamValue::render).collect()
    }
}

impl<T: Into<ParamValue>> FromIterator<T> for ValueSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>, const N: usize> From<[T; N]> for ValueSet {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ValueSet {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a ParamValue;
    type IntoIter = std::slice::Iter<'a, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
