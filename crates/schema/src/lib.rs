//! # tethys-schema
//!
//! The canonical long-form schema every Tethys dataset is normalized into:
//! eight fixed columns, one row per (timestamp, latitude, longitude, depth,
//! variable) observation. This crate owns the column names, the presence-only
//! validation rule, the typed [`Observation`] record, and the injectable
//! variable-to-unit lookup.

mod canonical;
mod observation;
mod units;

pub use canonical::{CANONICAL_COLUMNS, ID_COLUMNS, missing_columns, validate};
pub use observation::Observation;
pub use units::{UNKNOWN_UNIT, UnitMap};
