//! Error types for tethys-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the tethys-io crate.
///
/// Covers missing files, format-specific errors from the CSV, NetCDF, and
/// Parquet libraries, time-axis decoding problems, and structural mismatches
/// encountered when reading gridded or canonical files.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the CSV parser.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Returned when a required variable is not present in a gridded file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a canonical column is absent from a stored dataset.
    #[error("column '{name}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing canonical column.
        name: String,
        /// Path to the dataset file.
        path: PathBuf,
    },

    /// Returned when a gridded variable's dimensions disagree with the grid.
    #[error("variable '{variable}' dimension mismatch: expected [{expected}], got [{got}]")]
    ShapeMismatch {
        /// Name of the offending variable.
        variable: String,
        /// Dimension list the grid was established with.
        expected: String,
        /// Dimension list the variable actually has.
        got: String,
    },

    /// Returned when a gridded variable has more dimensions than supported.
    #[error("variable '{variable}' has rank {rank}, supported range is 1..=4")]
    UnsupportedRank {
        /// Name of the offending variable.
        variable: String,
        /// Number of dimensions found.
        rank: usize,
    },

    /// Returned when a time axis cannot be decoded.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time decoding issue.
        reason: String,
    },

    /// Returned when a file's structure fails a consistency check.
    #[error("validation error: {details}")]
    Validation {
        /// Human-readable summary of the failure.
        details: String,
    },
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}
