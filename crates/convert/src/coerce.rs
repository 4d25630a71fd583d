//! Permissive type coercion.
//!
//! Coercion never fails: a cell that cannot be parsed as the target type
//! becomes [`Cell::Null`]. This trades silent data loss for robustness
//! against messy source files; converters log nothing per cell, and callers
//! wanting stricter behavior must pre-validate their sources.

use chrono::{NaiveDate, NaiveDateTime};
use tethys_frame::{Cell, Frame};

/// Timestamp layouts tried in order when coercing text cells.
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Coerce a cell to a numeric value, nulling on failure.
pub(crate) fn to_numeric(cell: &Cell) -> Cell {
    match cell {
        Cell::Float(v) => Cell::Float(*v),
        Cell::Str(s) => match s.trim().parse::<f64>() {
            Ok(v) => Cell::Float(v),
            Err(_) => Cell::Null,
        },
        Cell::Timestamp(_) | Cell::Null => Cell::Null,
    }
}

/// Coerce a cell to a timestamp, nulling on failure.
pub(crate) fn to_timestamp(cell: &Cell) -> Cell {
    match cell {
        Cell::Timestamp(t) => Cell::Timestamp(*t),
        Cell::Str(s) => match parse_timestamp(s.trim()) {
            Some(t) => Cell::Timestamp(t),
            None => Cell::Null,
        },
        Cell::Float(_) | Cell::Null => Cell::Null,
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(t);
        }
    }
    // Date-only values land on midnight.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Coerce the named column to numeric in place; no-op if absent.
pub(crate) fn coerce_numeric_column(frame: &mut Frame, name: &str) {
    if let Some(cells) = frame.column_mut(name) {
        for cell in cells {
            *cell = to_numeric(cell);
        }
    }
}

/// Coerce the named column to timestamps in place; no-op if absent.
pub(crate) fn coerce_timestamp_column(frame: &mut Frame, name: &str) {
    if let Some(cells) = frame.column_mut(name) {
        for cell in cells {
            *cell = to_timestamp(cell);
        }
    }
}
