//! Row filter predicates.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use tethys_schema::Observation;

/// A closed rectangular region in latitude/longitude space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge, inclusive.
    pub min_lat: f64,
    /// Northern edge, inclusive.
    pub max_lat: f64,
    /// Western edge, inclusive.
    pub min_lon: f64,
    /// Eastern edge, inclusive.
    pub max_lon: f64,
}

impl BoundingBox {
    /// Whether the point lies within the closed rectangle.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lon
            && longitude <= self.max_lon
    }
}

/// Composable row filters for [`crate::DataLoader::load_dataset`].
///
/// Each part is optional (absence means no restriction) and all active parts
/// must hold for a row to pass — they compose as logical AND. Range bounds
/// are inclusive at both ends. A row carrying a null in a field an active
/// range filter inspects is excluded.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    variables: Option<BTreeSet<String>>,
    time_range: Option<(NaiveDateTime, NaiveDateTime)>,
    bbox: Option<BoundingBox>,
    depth_range: Option<(f64, f64)>,
}

impl Filters {
    /// No restrictions: every row passes.
    pub fn none() -> Self {
        Self::default()
    }

    /// Keep only rows whose `variable` is in the given set.
    pub fn with_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = Some(variables.into_iter().map(Into::into).collect());
        self
    }

    /// Keep only rows with `start <= timestamp <= end`.
    pub fn with_time_range(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.time_range = Some((start, end));
        self
    }

    /// Keep only rows inside the closed bounding box.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Keep only rows with `min <= depth <= max`.
    pub fn with_depth_range(mut self, min: f64, max: f64) -> Self {
        self.depth_range = Some((min, max));
        self
    }

    /// Whether no filter part is active.
    pub fn is_unrestricted(&self) -> bool {
        self.variables.is_none()
            && self.time_range.is_none()
            && self.bbox.is_none()
            && self.depth_range.is_none()
    }

    /// Whether `obs` passes every active filter part.
    ///
    /// Parts are checked cheapest first; order does not affect the result.
    pub fn matches(&self, obs: &Observation) -> bool {
        if let Some(variables) = &self.variables {
            if !variables.contains(&obs.variable) {
                return false;
            }
        }
        if let Some((min, max)) = self.depth_range {
            match obs.depth {
                Some(d) if d >= min && d <= max => {}
                _ => return false,
            }
        }
        if let Some(bbox) = self.bbox {
            match (obs.latitude, obs.longitude) {
                (Some(lat), Some(lon)) if bbox.contains(lat, lon) => {}
                _ => return false,
            }
        }
        if let Some((start, end)) = self.time_range {
            match obs.timestamp {
                Some(t) if t >= start && t <= end => {}
                _ => return false,
            }
        }
        true
    }
}
