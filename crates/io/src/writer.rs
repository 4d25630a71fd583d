//! High-level Parquet writer configuration and orchestration.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use tethys_frame::Frame;
use tracing::debug;

use crate::error::IoError;
use crate::parquet_write;

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level =
                    parquet::basic::ZstdLevel::try_new(3).map_err(|e| IoError::Parquet {
                        reason: e.to_string(),
                    })?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// Configuration for writing canonical datasets to Parquet.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression algorithm to use.
    compression: Compression,
    /// Maximum number of rows per row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero.
    fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::Validation {
                details: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// An incremental writer for one canonical dataset file.
///
/// Batches are written to a sibling temp file; [`FrameWriter::finish`]
/// atomically renames it over the target, so readers never observe a
/// half-written dataset. Dropping the writer without finishing abandons the
/// temp file and leaves any previous target untouched.
pub struct FrameWriter {
    writer: ArrowWriter<File>,
    schema: arrow::datatypes::Schema,
    tmp_path: PathBuf,
    target_path: PathBuf,
    rows: usize,
}

impl FrameWriter {
    /// Create a writer targeting `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] for an invalid configuration, or
    /// [`IoError::Parquet`] if the temp file cannot be created.
    pub fn create(path: &Path, config: &WriterConfig) -> Result<Self, IoError> {
        config.validate()?;

        let compression = config.compression.to_parquet()?;
        let props = WriterProperties::builder()
            .set_compression(compression)
            .set_max_row_group_size(config.row_group_size)
            .build();

        let tmp_path = tmp_sibling(path);
        let file = File::create(&tmp_path).map_err(|e| IoError::Parquet {
            reason: e.to_string(),
        })?;

        let schema = parquet_write::build_schema();
        let writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

        Ok(Self {
            writer,
            schema,
            tmp_path,
            target_path: path.to_path_buf(),
            rows: 0,
        })
    }

    /// Append one canonical frame.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Parquet`] if the frame lacks a canonical column or
    /// the batch cannot be written.
    pub fn write(&mut self, frame: &Frame) -> Result<(), IoError> {
        let batch = parquet_write::frame_to_batch(frame, &self.schema)?;
        self.rows += batch.num_rows();
        self.writer.write(&batch)?;
        Ok(())
    }

    /// Finalize the file and atomically move it over the target path.
    pub fn finish(self) -> Result<(), IoError> {
        self.writer.close()?;
        std::fs::rename(&self.tmp_path, &self.target_path).map_err(|e| IoError::Parquet {
            reason: format!(
                "failed to move {} into place: {e}",
                self.tmp_path.display()
            ),
        })?;
        debug!(
            path = %self.target_path.display(),
            rows = self.rows,
            "wrote canonical dataset"
        );
        Ok(())
    }
}

/// Write a whole canonical frame to a Parquet file at `path`.
///
/// Convenience wrapper around [`FrameWriter`] for the non-streaming case;
/// each call fully overwrites the target.
///
/// # Errors
///
/// Returns [`IoError::Validation`] for an invalid configuration, or
/// [`IoError::Parquet`] on encoding or file I/O failure.
pub fn write_frame(path: &Path, frame: &Frame, config: &WriterConfig) -> Result<(), IoError> {
    let mut writer = FrameWriter::create(path, config)?;
    writer.write(frame)?;
    writer.finish()
}

/// The temp path a dataset is staged at before the final rename.
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
