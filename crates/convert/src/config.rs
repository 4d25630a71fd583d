//! Flat configuration specs for constructing converters.
//!
//! These mirror the converter builders field-for-field so a conversion can be
//! described entirely in a configuration file: `source_path` is required,
//! everything else is optional.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use tethys_io::{CsvOptions, GridOptions, WriterConfig};
use tethys_schema::UnitMap;

use crate::error::ConvertError;
use crate::gridded::GridConverter;
use crate::tabular::TabularConverter;

/// Flat configuration for one tabular conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TabularSpec {
    /// Path to the source file.
    pub source_path: PathBuf,
    /// Target dataset path; defaults to the source with a `parquet` extension.
    #[serde(default)]
    pub target_path: Option<PathBuf>,
    /// Source column name → canonical column name.
    #[serde(default)]
    pub mapping: BTreeMap<String, String>,
    /// Field delimiter (single ASCII character).
    #[serde(default)]
    pub delimiter: Option<char>,
    /// Whether the first record is a header row.
    #[serde(default = "default_true")]
    pub has_headers: bool,
    /// Optional comment character (single ASCII character).
    #[serde(default)]
    pub comment: Option<char>,
    /// Whether records may have varying field counts.
    #[serde(default)]
    pub flexible: bool,
    /// Whether to trim surrounding whitespace from fields.
    #[serde(default)]
    pub trim: bool,
}

impl TabularSpec {
    /// Build the configured converter.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Config`] if a delimiter or comment character
    /// is not ASCII.
    pub fn into_converter(
        self,
        units: UnitMap,
        writer: WriterConfig,
    ) -> Result<TabularConverter, ConvertError> {
        let mut options = CsvOptions::default()
            .with_headers(self.has_headers)
            .with_flexible(self.flexible)
            .with_trim(self.trim);
        if let Some(delimiter) = self.delimiter {
            options = options.with_delimiter(ascii_byte(delimiter, "delimiter")?);
        }
        if let Some(comment) = self.comment {
            options = options.with_comment(Some(ascii_byte(comment, "comment")?));
        }

        let mut converter = TabularConverter::new(self.source_path)
            .with_mapping(self.mapping)
            .with_csv_options(options)
            .with_units(units)
            .with_writer_config(writer);
        if let Some(target) = self.target_path {
            converter = converter.with_target_path(target);
        }
        Ok(converter)
    }
}

/// Flat configuration for one gridded conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSpec {
    /// Path to the source file.
    pub source_path: PathBuf,
    /// Target dataset path; defaults to the source with a `parquet` extension.
    #[serde(default)]
    pub target_path: Option<PathBuf>,
    /// Source variable name → canonical variable name.
    #[serde(default)]
    pub variable_mapping: BTreeMap<String, String>,
    /// Source dimension name → output column name; replaces the defaults
    /// when present.
    #[serde(default)]
    pub dimension_mapping: Option<BTreeMap<String, String>>,
    /// Slab size along the outermost dimension for streaming conversion.
    #[serde(default)]
    pub chunk_rows: Option<usize>,
}

impl GridSpec {
    /// Build the configured converter.
    pub fn into_converter(self, writer: WriterConfig) -> GridConverter {
        let mut options = GridOptions::default().with_chunk_rows(self.chunk_rows);
        if let Some(dims) = self.dimension_mapping {
            options = options.with_dimension_map(dims);
        }

        let mut converter = GridConverter::new(self.source_path)
            .with_variable_map(self.variable_mapping)
            .with_grid_options(options)
            .with_writer_config(writer);
        if let Some(target) = self.target_path {
            converter = converter.with_target_path(target);
        }
        converter
    }
}

fn default_true() -> bool {
    true
}

fn ascii_byte(c: char, what: &str) -> Result<u8, ConvertError> {
    u8::try_from(c).map_err(|_| ConvertError::Config {
        reason: format!("{what} must be a single ASCII character, got '{c}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::Converter;

    #[test]
    fn tabular_spec_from_toml() {
        let spec: TabularSpec = toml::from_str(
            r#"
            source_path = "data/raw/obs.csv"
            target_path = "data/processed/obs.parquet"
            delimiter = ";"

            [mapping]
            time = "timestamp"
            lat = "latitude"
            "#,
        )
        .expect("valid spec");

        assert_eq!(spec.mapping.len(), 2);
        assert!(spec.has_headers);

        let converter = spec
            .into_converter(UnitMap::default(), WriterConfig::default())
            .expect("valid converter");
        assert_eq!(
            converter.target_path(),
            std::path::Path::new("data/processed/obs.parquet")
        );
    }

    #[test]
    fn tabular_spec_default_target() {
        let spec: TabularSpec = toml::from_str(r#"source_path = "obs.csv""#).expect("valid spec");
        let converter = spec
            .into_converter(UnitMap::default(), WriterConfig::default())
            .expect("valid converter");
        assert_eq!(converter.target_path(), std::path::Path::new("obs.parquet"));
    }

    #[test]
    fn tabular_spec_rejects_wide_delimiter() {
        let spec: TabularSpec =
            toml::from_str("source_path = \"obs.csv\"\ndelimiter = \"→\"").expect("valid spec");
        let err = spec
            .into_converter(UnitMap::default(), WriterConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConvertError::Config { .. }));
    }

    #[test]
    fn tabular_spec_rejects_unknown_fields() {
        let result: Result<TabularSpec, _> =
            toml::from_str("source_path = \"obs.csv\"\nchunks = 4");
        assert!(result.is_err());
    }

    #[test]
    fn grid_spec_from_toml() {
        let spec: GridSpec = toml::from_str(
            r#"
            source_path = "grid.nc"
            chunk_rows = 100

            [variable_mapping]
            thetao = "temp"

            [dimension_mapping]
            t = "timestamp"
            latitude = "latitude"
            longitude = "longitude"
            "#,
        )
        .expect("valid spec");

        let converter = spec.into_converter(WriterConfig::default());
        assert_eq!(converter.target_path(), std::path::Path::new("grid.parquet"));
    }
}
