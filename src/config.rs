use std::collections::BTreeMap;

use serde::Deserialize;
use tethys_convert::{GridSpec, TabularSpec};

/// Top-level conversion configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TethysConfig {
    /// Parquet writer settings shared by all conversions.
    #[serde(default)]
    pub writer: WriterToml,

    /// Extra variable→unit entries layered over the defaults.
    #[serde(default)]
    pub units: BTreeMap<String, String>,

    /// Tabular (CSV) conversions to run.
    #[serde(default)]
    pub tabular: Vec<TabularSpec>,

    /// Gridded (NetCDF) conversions to run.
    #[serde(default)]
    pub gridded: Vec<GridSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriterToml {
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for WriterToml {
    fn default() -> Self {
        Self {
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}
