//! Variable-name to unit lookup.

use std::collections::BTreeMap;

/// Unit string used for variables with no known unit.
pub const UNKNOWN_UNIT: &str = "unknown";

/// A finite mapping from variable name to unit string.
///
/// The mapping is supplied by the caller rather than baked into the
/// converters, so new variables do not require code changes. [`Default`]
/// carries the two historical entries; extend it with [`UnitMap::with_unit`]
/// or build from configuration via [`UnitMap::from_entries`].
#[derive(Debug, Clone)]
pub struct UnitMap {
    map: BTreeMap<String, String>,
}

impl Default for UnitMap {
    fn default() -> Self {
        Self::empty()
            .with_unit("temp", "°C")
            .with_unit("sal", "PSU")
    }
}

impl UnitMap {
    /// A map with no entries: every lookup yields [`UNKNOWN_UNIT`].
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Add or replace an entry.
    pub fn with_unit(mut self, variable: impl Into<String>, unit: impl Into<String>) -> Self {
        self.map.insert(variable.into(), unit.into());
        self
    }

    /// Build a map from (variable, unit) pairs on top of the defaults.
    ///
    /// Later entries override earlier ones and the defaults.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        entries
            .into_iter()
            .fold(Self::default(), |map, (k, v)| map.with_unit(k, v))
    }

    /// The unit for `variable`, or [`UNKNOWN_UNIT`] if unmapped.
    pub fn lookup(&self, variable: &str) -> &str {
        self.map.get(variable).map_or(UNKNOWN_UNIT, String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
