//! Canonical dataset decoding.

use std::path::Path;

use arrow::array::{Array, Float64Array, RecordBatch, StringArray, TimestampMicrosecondArray};
use chrono::{DateTime, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tethys_schema::{CANONICAL_COLUMNS, Observation};

use crate::error::IoError;

/// Read a canonical dataset file into typed [`Observation`] records.
///
/// The file must carry all eight canonical columns (any column order is
/// accepted); nulls in the coordinate and value columns decode to `None`.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist,
/// [`IoError::MissingColumn`] if a canonical column is absent, or
/// [`IoError::Parquet`] on decoding failures.
pub fn read_observations(path: &Path) -> Result<Vec<Observation>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let mut observations = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| IoError::Parquet {
            reason: e.to_string(),
        })?;
        decode_batch(&batch, path, &mut observations)?;
    }

    Ok(observations)
}

/// Decode one record batch, appending to `out`.
fn decode_batch(
    batch: &RecordBatch,
    path: &Path,
    out: &mut Vec<Observation>,
) -> Result<(), IoError> {
    let schema = batch.schema();
    let mut indices = [0usize; 8];
    for (slot, name) in indices.iter_mut().zip(CANONICAL_COLUMNS) {
        *slot = schema
            .index_of(name)
            .map_err(|_| IoError::MissingColumn {
                name: name.to_string(),
                path: path.to_path_buf(),
            })?;
    }
    let [ts_i, lat_i, lon_i, depth_i, var_i, value_i, unit_i, source_i] = indices;

    let timestamps = downcast::<TimestampMicrosecondArray>(batch, ts_i, "timestamp")?;
    let latitudes = downcast::<Float64Array>(batch, lat_i, "latitude")?;
    let longitudes = downcast::<Float64Array>(batch, lon_i, "longitude")?;
    let depths = downcast::<Float64Array>(batch, depth_i, "depth")?;
    let variables = downcast::<StringArray>(batch, var_i, "variable")?;
    let values = downcast::<Float64Array>(batch, value_i, "value")?;
    let units = downcast::<StringArray>(batch, unit_i, "unit")?;
    let sources = downcast::<StringArray>(batch, source_i, "source")?;

    out.reserve(batch.num_rows());
    for row in 0..batch.num_rows() {
        out.push(Observation {
            timestamp: optional_timestamp(timestamps, row),
            latitude: optional_f64(latitudes, row),
            longitude: optional_f64(longitudes, row),
            depth: optional_f64(depths, row),
            variable: variables.value(row).to_string(),
            value: optional_f64(values, row),
            unit: units.value(row).to_string(),
            source: sources.value(row).to_string(),
        });
    }

    Ok(())
}

fn downcast<'a, T: 'static>(
    batch: &'a RecordBatch,
    index: usize,
    name: &str,
) -> Result<&'a T, IoError> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| IoError::Parquet {
            reason: format!(
                "column '{name}' has unexpected type {:?}",
                batch.column(index).data_type()
            ),
        })
}

fn optional_f64(array: &Float64Array, row: usize) -> Option<f64> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row))
    }
}

fn optional_timestamp(array: &TimestampMicrosecondArray, row: usize) -> Option<NaiveDateTime> {
    if array.is_null(row) {
        None
    } else {
        DateTime::from_timestamp_micros(array.value(row)).map(|dt| dt.naive_utc())
    }
}
