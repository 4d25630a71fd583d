//! Tabular (CSV) to canonical conversion.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tethys_frame::{Cell, Frame};
use tethys_io::{CsvOptions, WriterConfig, read_csv};
use tethys_schema::{CANONICAL_COLUMNS, ID_COLUMNS, UnitMap};
use tracing::debug;

use crate::coerce;
use crate::converter::{Converter, default_target_path};
use crate::error::ConvertError;
use crate::melt::melt;

/// Converter for delimited-text sources.
///
/// The transform renames columns per the caller's mapping, coerces the
/// canonical coordinate columns (permissively — unparseable cells become
/// nulls), melts the remaining measurement columns into long form, and
/// attaches provenance and units.
#[derive(Debug, Clone)]
pub struct TabularConverter {
    source_path: PathBuf,
    target_path: PathBuf,
    /// Source column name → canonical column name.
    mapping: BTreeMap<String, String>,
    options: CsvOptions,
    units: UnitMap,
    writer: WriterConfig,
}

impl TabularConverter {
    /// Create a converter for `source_path` with default options and the
    /// default target path (extension swapped for `parquet`).
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        let source_path = source_path.into();
        let target_path = default_target_path(&source_path);
        Self {
            source_path,
            target_path,
            mapping: BTreeMap::new(),
            options: CsvOptions::default(),
            units: UnitMap::default(),
            writer: WriterConfig::default(),
        }
    }

    /// Set the target dataset path.
    pub fn with_target_path(mut self, target_path: impl Into<PathBuf>) -> Self {
        self.target_path = target_path.into();
        self
    }

    /// Replace the column rename mapping wholesale.
    pub fn with_mapping(mut self, mapping: BTreeMap<String, String>) -> Self {
        self.mapping = mapping;
        self
    }

    /// Add or override a single column rename.
    pub fn with_mapped_column(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.mapping.insert(source.into(), target.into());
        self
    }

    /// Set the CSV parser options.
    pub fn with_csv_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the variable→unit lookup.
    pub fn with_units(mut self, units: UnitMap) -> Self {
        self.units = units;
        self
    }

    /// Set the Parquet writer configuration.
    pub fn with_writer_config(mut self, writer: WriterConfig) -> Self {
        self.writer = writer;
        self
    }
}

impl Converter for TabularConverter {
    fn source_path(&self) -> &Path {
        &self.source_path
    }

    fn target_path(&self) -> &Path {
        &self.target_path
    }

    fn writer_config(&self) -> &WriterConfig {
        &self.writer
    }

    fn read_data(&self) -> Result<Frame, ConvertError> {
        Ok(read_csv(&self.source_path, &self.options)?)
    }

    fn transform_data(&self, mut data: Frame) -> Result<Frame, ConvertError> {
        data.rename_columns(&self.mapping)?;

        coerce::coerce_timestamp_column(&mut data, "timestamp");
        for name in ["latitude", "longitude", "depth"] {
            coerce::coerce_numeric_column(&mut data, name);
        }

        // Id columns: whichever canonical coordinates the source provides.
        // Value columns: everything else that is not already canonical.
        let id_columns: Vec<String> = ID_COLUMNS
            .iter()
            .filter(|c| data.has_column(c))
            .map(|c| c.to_string())
            .collect();
        let value_columns: Vec<String> = data
            .column_names()
            .iter()
            .filter(|n| !CANONICAL_COLUMNS.contains(&n.as_str()))
            .cloned()
            .collect();

        debug!(
            source = %self.source_path.display(),
            ids = id_columns.len(),
            values = value_columns.len(),
            "melting tabular source"
        );

        let mut long = melt(&data, &id_columns, &value_columns)?;
        coerce::coerce_numeric_column(&mut long, "value");

        let n = long.num_rows();
        let source = Cell::Str(self.source_path.display().to_string());
        long.push_column("source", vec![source; n])?;

        let units: Vec<Cell> = long
            .column("variable")
            .map(|cells| {
                cells
                    .iter()
                    .map(|c| match c {
                        Cell::Str(name) => Cell::Str(self.units.lookup(name).to_string()),
                        _ => Cell::Str(tethys_schema::UNKNOWN_UNIT.to_string()),
                    })
                    .collect()
            })
            .unwrap_or_default();
        long.push_column("unit", units)?;

        Ok(long)
    }
}
