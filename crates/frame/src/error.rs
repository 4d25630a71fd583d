//! Error types for tethys-frame.

/// Error type for all fallible operations on a [`crate::Frame`].
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Returned when a pushed column's length differs from the frame's.
    #[error("column '{name}' length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Name of the offending column.
        name: String,
        /// Number of rows already in the frame.
        expected: usize,
        /// Number of cells in the pushed column.
        got: usize,
    },

    /// Returned when a column name would occur twice in the frame.
    #[error("duplicate column '{name}'")]
    DuplicateColumn {
        /// The colliding column name.
        name: String,
    },
}
