//! Gridded (NetCDF) to canonical conversion.

use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use tethys_frame::{Cell, Frame};
use tethys_io::{FrameWriter, GridOptions, WriterConfig, read_grid, read_grid_chunked};
use tethys_schema::{CANONICAL_COLUMNS, ID_COLUMNS, UNKNOWN_UNIT};
use tracing::{debug, info};

use crate::converter::{Converter, default_target_path};
use crate::error::ConvertError;
use crate::melt::melt;

/// Converter for gridded NetCDF sources.
///
/// The reader flattens the grid into one row per coordinate combination with
/// the dimensions renamed towards the canonical coordinates; the transform
/// then melts the data variables into long form and optionally remaps their
/// names. Units are not derivable here and are always `"unknown"`.
///
/// With [`GridOptions::with_chunk_rows`] configured, [`GridConverter::convert`]
/// streams: each slab of the outermost dimension is transformed and appended
/// to the Parquet writer instead of materializing the full flattened table.
#[derive(Debug, Clone)]
pub struct GridConverter {
    source_path: PathBuf,
    target_path: PathBuf,
    /// Source variable name → canonical variable name, applied after the melt.
    variable_map: BTreeMap<String, String>,
    options: GridOptions,
    writer: WriterConfig,
}

impl GridConverter {
    /// Create a converter for `source_path` with default options and the
    /// default target path (extension swapped for `parquet`).
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        let source_path = source_path.into();
        let target_path = default_target_path(&source_path);
        Self {
            source_path,
            target_path,
            variable_map: BTreeMap::new(),
            options: GridOptions::default(),
            writer: WriterConfig::default(),
        }
    }

    /// Set the target dataset path.
    pub fn with_target_path(mut self, target_path: impl Into<PathBuf>) -> Self {
        self.target_path = target_path.into();
        self
    }

    /// Replace the variable rename mapping wholesale.
    pub fn with_variable_map(mut self, variable_map: BTreeMap<String, String>) -> Self {
        self.variable_map = variable_map;
        self
    }

    /// Add or override a single variable rename.
    pub fn with_mapped_variable(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.variable_map.insert(source.into(), target.into());
        self
    }

    /// Set the gridded reader options (dimension mapping, chunk size).
    pub fn with_grid_options(mut self, options: GridOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the Parquet writer configuration.
    pub fn with_writer_config(mut self, writer: WriterConfig) -> Self {
        self.writer = writer;
        self
    }

    /// Transform one flattened slab into canonical long form.
    fn transform_slab(&self, data: Frame) -> Result<Frame, ConvertError> {
        // Id columns are the renamed dimension coordinates; with the default
        // dimension mapping these are exactly the canonical coordinates.
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

        let mut long = melt(&data, &id_columns, &value_columns)?;

        if !self.variable_map.is_empty() {
            if let Some(cells) = long.column_mut("variable") {
                for cell in cells {
                    if let Cell::Str(name) = cell {
                        if let Some(mapped) = self.variable_map.get(name.as_str()) {
                            *cell = Cell::Str(mapped.clone());
                        }
                    }
                }
            }
        }

        let n = long.num_rows();
        let source = Cell::Str(self.source_path.display().to_string());
        long.push_column("source", vec![source; n])?;
        long.push_column("unit", vec![Cell::Str(UNKNOWN_UNIT.to_string()); n])?;

        Ok(long)
    }

    /// Stream the grid slab by slab into the target file.
    ///
    /// The first slab's transform is schema-validated before the writer is
    /// created, so a violation still blocks persistence entirely.
    fn convert_streaming(&self) -> Result<(), ConvertError> {
        let mut writer: Option<FrameWriter> = None;
        let mut failure: Option<ConvertError> = None;
        let mut rows = 0usize;

        read_grid_chunked(&self.source_path, &self.options, &mut |frame| {
            match self.process_slab(frame, &mut writer) {
                Ok(n) => {
                    rows += n;
                    ControlFlow::Continue(())
                }
                Err(e) => {
                    failure = Some(e);
                    ControlFlow::Break(())
                }
            }
        })?;

        if let Some(e) = failure {
            return Err(e);
        }
        let Some(writer) = writer else {
            return Ok(());
        };
        writer.finish()?;

        info!(
            source = %self.source_path.display(),
            target = %self.target_path.display(),
            rows,
            "streaming conversion complete"
        );
        Ok(())
    }

    fn process_slab(
        &self,
        frame: Frame,
        writer: &mut Option<FrameWriter>,
    ) -> Result<usize, ConvertError> {
        let long = self.transform_slab(frame)?;

        if writer.is_none() {
            if !self.validate_schema(&long) {
                return Err(ConvertError::SchemaViolation {
                    missing: tethys_schema::missing_columns(&long),
                });
            }
            *writer = Some(FrameWriter::create(&self.target_path, &self.writer)?);
        }

        let rows = long.num_rows();
        if let Some(w) = writer.as_mut() {
            w.write(&long)?;
        }
        debug!(rows, "appended slab");
        Ok(rows)
    }
}

impl Converter for GridConverter {
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
        Ok(read_grid(&self.source_path, &self.options)?)
    }

    fn transform_data(&self, data: Frame) -> Result<Frame, ConvertError> {
        self.transform_slab(data)
    }

    fn convert(&self) -> Result<(), ConvertError> {
        if self.options.chunk_rows().is_some() {
            return self.convert_streaming();
        }

        let data = self.read_data()?;
        let transformed = self.transform_data(data)?;
        if !self.validate_schema(&transformed) {
            return Err(ConvertError::SchemaViolation {
                missing: tethys_schema::missing_columns(&transformed),
            });
        }
        self.save_data(&transformed)?;
        info!(
            source = %self.source_path.display(),
            target = %self.target_path.display(),
            rows = transformed.num_rows(),
            "conversion complete"
        );
        Ok(())
    }
}
