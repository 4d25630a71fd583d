//! The column-oriented table.

use std::collections::BTreeMap;

use crate::cell::Cell;
use crate::error::FrameError;

/// An ordered set of equally-long named columns.
///
/// Column order is insertion order and is preserved by renames. Names are
/// unique; pushing or renaming into a collision is an error rather than a
/// silent overwrite.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Vec<Cell>>,
}

impl Frame {
    /// Create an empty frame with no columns and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named column.
    ///
    /// The first column fixes the frame's row count; every later column must
    /// match it.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::DuplicateColumn`] if `name` is already present,
    /// or [`FrameError::LengthMismatch`] if `cells` has the wrong length.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        cells: Vec<Cell>,
    ) -> Result<(), FrameError> {
        let name = name.into();
        if self.names.iter().any(|n| *n == name) {
            return Err(FrameError::DuplicateColumn { name });
        }
        if !self.columns.is_empty() && cells.len() != self.num_rows() {
            return Err(FrameError::LengthMismatch {
                name,
                expected: self.num_rows(),
                got: cells.len(),
            });
        }
        self.names.push(name);
        self.columns.push(cells);
        Ok(())
    }

    /// The cells of the named column, if present.
    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Mutable access to the named column's cells, if present.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Vec<Cell>> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(&mut self.columns[idx])
    }

    /// Whether the named column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Column names in order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Number of rows (0 for a frame with no columns).
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.names.len()
    }

    /// Whether the frame holds no rows.
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Rename columns according to `mapping` (old name → new name).
    ///
    /// Columns absent from the mapping keep their names; mapping entries for
    /// columns the frame does not have are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::DuplicateColumn`] if a rename would collide with
    /// another column's (possibly also renamed) final name, leaving the frame
    /// unchanged.
    pub fn rename_columns(&mut self, mapping: &BTreeMap<String, String>) -> Result<(), FrameError> {
        let renamed: Vec<String> = self
            .names
            .iter()
            .map(|n| mapping.get(n).unwrap_or(n).clone())
            .collect();

        for (i, name) in renamed.iter().enumerate() {
            if renamed[..i].contains(name) {
                return Err(FrameError::DuplicateColumn { name: name.clone() });
            }
        }

        self.names = renamed;
        Ok(())
    }
}
