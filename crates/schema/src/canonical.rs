//! Canonical column set and the schema validation rule.

use tethys_frame::Frame;

/// The eight canonical columns of a persisted dataset, in storage order.
pub const CANONICAL_COLUMNS: [&str; 8] = [
    "timestamp",
    "latitude",
    "longitude",
    "depth",
    "variable",
    "value",
    "unit",
    "source",
];

/// The columns that identify an observation's position in time and space.
///
/// During a wide-to-long reshape, whichever of these a source provides act as
/// id columns; everything else becomes a melted (variable, value) pair.
pub const ID_COLUMNS: [&str; 4] = ["timestamp", "latitude", "longitude", "depth"];

/// Check that `frame` carries every canonical column.
///
/// This is a presence-only check: it says nothing about cell types, value
/// ranges, nullability, or row count. Callers needing stronger guarantees
/// must add their own checks.
pub fn validate(frame: &Frame) -> bool {
    CANONICAL_COLUMNS.iter().all(|c| frame.has_column(c))
}

/// The canonical columns `frame` is missing, in storage order.
///
/// Empty exactly when [`validate`] returns true; used to build actionable
/// schema-violation messages.
pub fn missing_columns(frame: &Frame) -> Vec<String> {
    CANONICAL_COLUMNS
        .iter()
        .filter(|c| !frame.has_column(c))
        .map(|c| c.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use tethys_frame::Cell;

    use super::*;

    fn frame_with(columns: &[&str]) -> Frame {
        let mut frame = Frame::new();
        for col in columns {
            frame.push_column(*col, vec![Cell::Null]).unwrap();
        }
        frame
    }

    #[test]
    fn validate_all_present() {
        let frame = frame_with(&CANONICAL_COLUMNS);
        assert!(validate(&frame));
        assert!(missing_columns(&frame).is_empty());
    }

    #[test]
    fn validate_missing_column() {
        let frame = frame_with(&[
            "timestamp",
            "latitude",
            "longitude",
            "variable",
            "value",
            "unit",
            "source",
        ]);
        assert!(!validate(&frame));
        assert_eq!(missing_columns(&frame), vec!["depth".to_string()]);
    }

    #[test]
    fn validate_ignores_extra_columns() {
        let mut frame = frame_with(&CANONICAL_COLUMNS);
        frame.push_column("extra", vec![Cell::Null]).unwrap();
        assert!(validate(&frame));
    }

    #[test]
    fn validate_empty_frame() {
        let frame = Frame::new();
        assert!(!validate(&frame));
        assert_eq!(missing_columns(&frame).len(), 8);
    }

    #[test]
    fn missing_columns_preserves_storage_order() {
        let frame = frame_with(&["latitude", "value", "source"]);
        assert_eq!(
            missing_columns(&frame),
            vec!["timestamp", "longitude", "depth", "variable", "unit"]
        );
    }
}
