//! Derived dataset metadata.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use tethys_schema::Observation;

use crate::filter::BoundingBox;

/// Summary metadata for one dataset, derived by scanning its rows.
///
/// Computed on demand, never stored. The range fields are `None` for an
/// empty dataset (or when every row is null in the relevant column).
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    /// Distinct `variable` values, sorted.
    pub variables: Vec<String>,
    /// Earliest and latest `timestamp`.
    pub time_range: Option<(NaiveDateTime, NaiveDateTime)>,
    /// Smallest closed rectangle containing every observation.
    pub spatial_coverage: Option<BoundingBox>,
    /// Smallest and largest `depth`.
    pub depth_range: Option<(f64, f64)>,
    /// Total row count.
    pub n_observations: usize,
    /// Distinct `source` values, sorted.
    pub sources: Vec<String>,
}

impl DatasetInfo {
    /// Derive metadata from a full scan of `observations`.
    ///
    /// Nulls are skipped when computing ranges, so a column that is entirely
    /// null yields `None` rather than a degenerate range.
    pub fn from_observations(observations: &[Observation]) -> Self {
        let mut variables: BTreeSet<&str> = BTreeSet::new();
        let mut sources: BTreeSet<&str> = BTreeSet::new();
        let mut time_range: Option<(NaiveDateTime, NaiveDateTime)> = None;
        let mut lat_range: Option<(f64, f64)> = None;
        let mut lon_range: Option<(f64, f64)> = None;
        let mut depth_range: Option<(f64, f64)> = None;

        for obs in observations {
            variables.insert(&obs.variable);
            sources.insert(&obs.source);

            if let Some(t) = obs.timestamp {
                time_range = Some(match time_range {
                    Some((min, max)) => (min.min(t), max.max(t)),
                    None => (t, t),
                });
            }
            extend_f64_range(&mut lat_range, obs.latitude);
            extend_f64_range(&mut lon_range, obs.longitude);
            extend_f64_range(&mut depth_range, obs.depth);
        }

        let spatial_coverage = match (lat_range, lon_range) {
            (Some((min_lat, max_lat)), Some((min_lon, max_lon))) => Some(BoundingBox {
                min_lat,
                max_lat,
                min_lon,
                max_lon,
            }),
            _ => None,
        };

        Self {
            variables: variables.into_iter().map(str::to_string).collect(),
            time_range,
            spatial_coverage,
            depth_range,
            n_observations: observations.len(),
            sources: sources.into_iter().map(str::to_string).collect(),
        }
    }
}

fn extend_f64_range(range: &mut Option<(f64, f64)>, value: Option<f64>) {
    if let Some(v) = value {
        *range = Some(match *range {
            Some((min, max)) => (min.min(v), max.max(v)),
            None => (v, v),
        });
    }
}
