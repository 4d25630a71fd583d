//! Dynamically-typed cell values.

use std::fmt;

use chrono::NaiveDateTime;

/// A single value in a [`crate::Frame`] column.
///
/// Source readers produce whatever variant the format yields (CSV readers
/// produce opaque [`Cell::Str`] values, gridded readers produce
/// [`Cell::Float`] and [`Cell::Timestamp`]); converters coerce cells towards
/// the canonical types, turning unparseable values into [`Cell::Null`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value.
    Null,
    /// Numeric value.
    Float(f64),
    /// Opaque text value.
    Str(String),
    /// Naive (timezone-less) point in time.
    Timestamp(NaiveDateTime),
}

impl Cell {
    /// Whether this cell is the missing marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// The numeric value, if this cell holds one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The text value, if this cell holds one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The timestamp value, if this cell holds one.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Str(s) => write!(f, "{s}"),
            Cell::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Str(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Str(s)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(t: NaiveDateTime) -> Self {
        Cell::Timestamp(t)
    }
}
