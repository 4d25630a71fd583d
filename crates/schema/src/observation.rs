//! The typed canonical record.

use chrono::NaiveDateTime;

/// One canonical observation: a single measured value at a point in time,
/// space, and depth.
///
/// The coordinate and value fields are optional because the conversion
/// pipeline's coercion is permissive: a source cell that cannot be parsed
/// becomes a missing marker rather than failing the conversion. `variable`,
/// `unit`, and `source` are always populated by the converters.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Point in time of the observation (naive; timezone-consistent per
    /// dataset).
    pub timestamp: Option<NaiveDateTime>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Depth in meters, positive down.
    pub depth: Option<f64>,
    /// Name of the measured quantity, e.g. `"temp"` or `"sal"`.
    pub variable: String,
    /// The measured value.
    pub value: Option<f64>,
    /// Unit string for `variable`; `"unknown"` when not derivable.
    pub unit: String,
    /// Provenance: the originating file path.
    pub source: String,
}
