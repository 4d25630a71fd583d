//! Low-level Parquet column building for the canonical schema.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use tethys_frame::{Cell, Frame};
use tethys_schema::CANONICAL_COLUMNS;

use crate::error::IoError;

/// Builds the Arrow schema for a canonical dataset: the eight canonical
/// columns in storage order. Coordinate and value columns are nullable
/// because coercion is permissive; the descriptive columns are not.
pub(crate) fn build_schema() -> Schema {
    Schema::new(vec![
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Microsecond, None),
            true,
        ),
        Field::new("latitude", DataType::Float64, true),
        Field::new("longitude", DataType::Float64, true),
        Field::new("depth", DataType::Float64, true),
        Field::new("variable", DataType::Utf8, false),
        Field::new("value", DataType::Float64, true),
        Field::new("unit", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
    ])
}

/// Converts a canonical frame into an Arrow [`RecordBatch`].
///
/// Columns are pulled by name in storage order, so the frame's own column
/// order does not matter. Cells of the wrong type for a coordinate or value
/// column encode as null, matching the permissive coercion policy.
pub(crate) fn frame_to_batch(frame: &Frame, schema: &Schema) -> Result<RecordBatch, IoError> {
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(CANONICAL_COLUMNS.len());

    for name in CANONICAL_COLUMNS {
        let cells = frame.column(name).ok_or_else(|| IoError::Parquet {
            reason: format!("frame is missing canonical column '{name}'"),
        })?;

        let array: ArrayRef = match name {
            "timestamp" => {
                let micros: Vec<Option<i64>> = cells
                    .iter()
                    .map(|c| c.as_timestamp().map(|t| t.and_utc().timestamp_micros()))
                    .collect();
                Arc::new(TimestampMicrosecondArray::from(micros))
            }
            "latitude" | "longitude" | "depth" | "value" => {
                let values: Vec<Option<f64>> = cells.iter().map(Cell::as_f64).collect();
                Arc::new(Float64Array::from(values))
            }
            // variable, unit, source
            _ => {
                let values: Vec<String> = cells.iter().map(Cell::to_string).collect();
                Arc::new(StringArray::from(values))
            }
        };
        columns.push(array);
    }

    RecordBatch::try_new(Arc::new(schema.clone()), columns).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use arrow::array::Array;
    use chrono::NaiveDate;

    use super::*;

    fn canonical_frame() -> Frame {
        let ts = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut frame = Frame::new();
        frame
            .push_column("timestamp", vec![Cell::Timestamp(ts), Cell::Null])
            .unwrap();
        frame
            .push_column("latitude", vec![Cell::Float(45.5), Cell::Float(45.6)])
            .unwrap();
        frame
            .push_column("longitude", vec![Cell::Float(-125.5), Cell::Null])
            .unwrap();
        frame
            .push_column("depth", vec![Cell::Float(0.0), Cell::Float(10.0)])
            .unwrap();
        frame
            .push_column(
                "variable",
                vec![Cell::Str("temp".into()), Cell::Str("temp".into())],
            )
            .unwrap();
        frame
            .push_column("value", vec![Cell::Float(15.2), Cell::Null])
            .unwrap();
        frame
            .push_column("unit", vec![Cell::Str("°C".into()), Cell::Str("°C".into())])
            .unwrap();
        frame
            .push_column(
                "source",
                vec![Cell::Str("a.csv".into()), Cell::Str("a.csv".into())],
            )
            .unwrap();
        frame
    }

    #[test]
    fn schema_has_eight_canonical_fields() {
        let schema = build_schema();
        assert_eq!(schema.fields().len(), 8);
        for (field, expected) in schema.fields().iter().zip(CANONICAL_COLUMNS) {
            assert_eq!(field.name(), expected);
        }
    }

    #[test]
    fn batch_from_canonical_frame() {
        let schema = build_schema();
        let batch = frame_to_batch(&canonical_frame(), &schema).unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 8);

        // Nulls survive the encoding.
        assert!(batch.column(0).is_null(1)); // timestamp
        assert!(batch.column(2).is_null(1)); // longitude
        assert!(batch.column(5).is_null(1)); // value
    }

    #[test]
    fn batch_rejects_incomplete_frame() {
        let mut frame = canonical_frame();
        // Build a frame missing 'unit' by copying the others.
        let mut partial = Frame::new();
        for name in CANONICAL_COLUMNS.iter().filter(|n| **n != "unit") {
            partial
                .push_column(*name, frame.column_mut(name).unwrap().clone())
                .unwrap();
        }

        let schema = build_schema();
        let err = frame_to_batch(&partial, &schema).unwrap_err();
        assert!(err.to_string().contains("unit"));
    }
}
