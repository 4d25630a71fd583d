//! Error types for tethys-convert.

use tethys_frame::FrameError;
use tethys_io::IoError;

/// Error type for all fallible operations in the tethys-convert crate.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Returned when transformed data lacks required canonical columns.
    ///
    /// Raised after the transform and before any write, so a failing
    /// conversion leaves the previous target file (if any) untouched.
    #[error("transformed data is missing required columns: {}", missing.join(", "))]
    SchemaViolation {
        /// The absent canonical columns, in storage order.
        missing: Vec<String>,
    },

    /// Returned when a column named during the reshape is absent.
    #[error("column '{name}' not found during reshape")]
    MissingColumn {
        /// The absent column name.
        name: String,
    },

    /// Returned when a flat configuration value cannot be applied.
    #[error("invalid converter configuration: {reason}")]
    Config {
        /// Description of the configuration problem.
        reason: String,
    },

    /// Wraps an error from the file I/O layer.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Wraps an error from frame manipulation.
    #[error(transparent)]
    Frame(#[from] FrameError),
}
