//! Scalar field values and kinds
//!
//! Every column a record exposes reads out as a [`FieldValue`]. The value's
//! [`FieldKind`] decides, once and at registration time, which
//! [`MatchStrategy`] a filter on that column uses.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of a registered scalar field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text
    Text,
    /// Whole number
    Integer,
    /// Floating point number (prices, ratings)
    Float,
    /// True or false
    Boolean,
    /// Calendar date
    Date,
}

impl FieldKind {
    /// Filter strategy used for columns of this kind
    #[must_use]
    pub const fn strategy(&self) -> MatchStrategy {
        match self {
            Self::Text => MatchStrategy::Contains,
            Self::Integer | Self::Float | Self::Boolean | Self::Date => MatchStrategy::Equals,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
            Self::Date => write!(f, "date"),
        }
    }
}

/// How a filter query is tested against a column value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStrategy {
    /// Case-insensitive substring containment
    Contains,
    /// Exact match on the value's string rendering
    Equals,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains => write!(f, "contains"),
            Self::Equals => write!(f, "equals"),
        }
    }
}

/// A value read from a record field
///
/// # Example
///
/// ```rust
/// use std::cmp::Ordering;
/// use shelf_query::fields::FieldValue;
///
/// let title: FieldValue = "The Hobbit".into();
/// let edition: FieldValue = 2_i32.into();
/// let subtitle: FieldValue = Option::<String>::None.into();
///
/// assert_eq!(edition.render().as_deref(), Some("2"));
/// assert!(subtitle.is_null());
/// assert_eq!(title.total_cmp(&subtitle), Ordering::Greater);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent value (an unset optional field)
    Null,
    /// Text value
    Text(String),
    /// 64-bit integer value
    Integer(i64),
    /// 64-bit floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Date value
    Date(NaiveDate),
}

impl FieldValue {
    /// Whether this is the null value
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Canonical string rendering; `None` for null
    ///
    /// Floats use Rust's shortest round-trip formatting (`12.5`, `10`), dates
    /// use ISO-8601 (`2024-03-01`), booleans `true`/`false`.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s.clone()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
            Self::Boolean(b) => Some(b.to_string()),
            Self::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Total ordering used by sorting
    ///
    /// Null sorts before everything, floats compare with IEEE total ordering,
    /// integers and floats compare numerically, and values of unrelated kinds
    /// fall back to a fixed kind rank.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Integer(a), Self::Float(b)) => (*a as f64).total_cmp(b),
            (Self::Float(a), Self::Integer(b)) => a.total_cmp(&(*b as f64)),
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Integer(_) | Self::Float(_) => 2,
            Self::Date(_) => 3,
            Self::Text(_) => 4,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "null"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl<V: Into<FieldValue>> From<Option<V>> for FieldValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_per_kind() {
        assert_eq!(FieldKind::Text.strategy(), MatchStrategy::Contains);
        assert_eq!(FieldKind::Integer.strategy(), MatchStrategy::Equals);
        assert_eq!(FieldKind::Float.strategy(), MatchStrategy::Equals);
        assert_eq!(FieldKind::Boolean.strategy(), MatchStrategy::Equals);
        assert_eq!(FieldKind::Date.strategy(), MatchStrategy::Equals);
    }

    #[test]
    fn test_render() {
        assert_eq!(FieldValue::from("abc").render().as_deref(), Some("abc"));
        assert_eq!(FieldValue::from(42_i64).render().as_deref(), Some("42"));
        assert_eq!(FieldValue::from(12.5_f64).render().as_deref(), Some("12.5"));
        assert_eq!(FieldValue::from(10.0_f64).render().as_deref(), Some("10"));
        assert_eq!(FieldValue::from(true).render().as_deref(), Some("true"));
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(FieldValue::from(date).render().as_deref(), Some("2024-03-01"));
        assert_eq!(FieldValue::Null.render(), None);
    }

    #[test]
    fn test_option_conversion() {
        let some: FieldValue = Some("x".to_string()).into();
        assert_eq!(some, FieldValue::Text("x".to_string()));
        let none: FieldValue = Option::<i64>::None.into();
        assert!(none.is_null());
    }

    #[test]
    fn test_null_sorts_first() {
        let mut values = vec![
            FieldValue::from("b"),
            FieldValue::Null,
            FieldValue::from("a"),
        ];
        values.sort_by(FieldValue::total_cmp);
        assert_eq!(
            values,
            vec![FieldValue::Null, FieldValue::from("a"), FieldValue::from("b")]
        );
    }

    #[test]
    fn test_float_ordering_is_total() {
        let mut values = vec![
            FieldValue::from(9.99_f64),
            FieldValue::from(f64::NAN),
            FieldValue::from(-1.0_f64),
            FieldValue::from(25.0_f64),
        ];
        values.sort_by(FieldValue::total_cmp);
        assert_eq!(values[0], FieldValue::from(-1.0_f64));
        assert_eq!(values[1], FieldValue::from(9.99_f64));
        assert_eq!(values[2], FieldValue::from(25.0_f64));
    }

    #[test]
    fn test_mixed_numeric_comparison() {
        assert_eq!(
            FieldValue::from(2_i64).total_cmp(&FieldValue::from(2.5_f64)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::from(3.0_f64).total_cmp(&FieldValue::from(2_i64)),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::Null.total_cmp(&FieldValue::from(false)),
            Ordering::Less
        );
    }
}
