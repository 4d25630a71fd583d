//! Error types for tethys-store.

use std::path::PathBuf;

use tethys_io::IoError;

/// Error type for all fallible operations in the tethys-store crate.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Returned when a requested dataset has no corresponding store file.
    #[error("dataset '{name}' not found at {}", path.display())]
    DatasetNotFound {
        /// The requested dataset name.
        name: String,
        /// The path that was expected to hold it.
        path: PathBuf,
    },

    /// Wraps an error from reading a dataset file.
    #[error(transparent)]
    Read(#[from] IoError),

    /// Returned when the store directory or a file's metadata cannot be
    /// inspected.
    #[error("store error at {}: {reason}", path.display())]
    Store {
        /// The path being inspected.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },
}
