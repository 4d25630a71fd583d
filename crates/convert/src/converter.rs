//! The common converter contract.

use std::path::{Path, PathBuf};

use tethys_frame::Frame;
use tethys_io::{WriterConfig, write_frame};
use tracing::info;

use crate::error::ConvertError;

/// The target path used when none is configured: the source path with its
/// extension replaced by the canonical store's.
pub fn default_target_path(source: &Path) -> PathBuf {
    source.with_extension("parquet")
}

/// Contract shared by all converters: read the source into a generic frame,
/// transform it into the canonical long form, validate column presence, and
/// only then persist.
///
/// [`Converter::convert`] drives the pipeline. Validation failure blocks the
/// write entirely, so a previously persisted target survives a failed rerun
/// unchanged.
pub trait Converter {
    /// The source file being converted.
    fn source_path(&self) -> &Path;

    /// The dataset file this conversion writes.
    fn target_path(&self) -> &Path;

    /// Writer settings for the persist step.
    fn writer_config(&self) -> &WriterConfig;

    /// Materialize the source file into a generic frame.
    fn read_data(&self) -> Result<Frame, ConvertError>;

    /// Transform the source frame into canonical long form.
    fn transform_data(&self, data: Frame) -> Result<Frame, ConvertError>;

    /// Whether `data` carries every canonical column (presence only).
    fn validate_schema(&self, data: &Frame) -> bool {
        tethys_schema::validate(data)
    }

    /// Persist a validated canonical frame, fully overwriting the target.
    fn save_data(&self, data: &Frame) -> Result<(), ConvertError> {
        write_frame(self.target_path(), data, self.writer_config())?;
        Ok(())
    }

    /// Run the full pipeline: read → transform → validate → persist.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::SchemaViolation`] if the transformed data
    /// lacks canonical columns (nothing is written in that case), or any
    /// read/transform/write error from the steps themselves.
    fn convert(&self) -> Result<(), ConvertError> {
        let data = self.read_data()?;
        let transformed = self.transform_data(data)?;

        if !self.validate_schema(&transformed) {
            return Err(ConvertError::SchemaViolation {
                missing: tethys_schema::missing_columns(&transformed),
            });
        }

        self.save_data(&transformed)?;
        info!(
            source = %self.source_path().display(),
            target = %self.target_path().display(),
            rows = transformed.num_rows(),
            "conversion complete"
        );
        Ok(())
    }
}
