//! Low-level NetCDF extraction helpers.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::IoError;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// A decoded CF time encoding: `base + offset * step_seconds`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TimeEncoding {
    /// Epoch the offsets count from.
    pub base: NaiveDateTime,
    /// Seconds per offset unit.
    pub step_seconds: f64,
}

/// Read the CF `units` attribute of `var_name`, if it describes a time axis.
///
/// Recognized formats are `"<unit> since YYYY-MM-DD"` and
/// `"<unit> since YYYY-MM-DD HH:MM:SS"` with unit one of `seconds`,
/// `minutes`, `hours`, or `days`. A missing `units` attribute, a non-string
/// value, or a string without the `since` keyword yields `Ok(None)` — the
/// coordinate then stays numeric.
///
/// # Errors
///
/// Returns [`IoError::InvalidTime`] when the attribute names an unrecognized
/// unit or the base date cannot be parsed.
pub(crate) fn read_time_encoding(
    file: &netcdf::File,
    var_name: &str,
) -> Result<Option<TimeEncoding>, IoError> {
    let Some(var) = file.variable(var_name) else {
        return Ok(None);
    };

    let units_str: String = match var.attribute_value("units") {
        Some(Ok(value)) => match value.try_into() {
            Ok(s) => s,
            Err(_) => return Ok(None),
        },
        _ => return Ok(None),
    };

    // Expected format: "<unit> since YYYY-MM-DD[ HH:MM:SS]".
    let parts: Vec<&str> = units_str.splitn(3, ' ').collect();
    if parts.len() < 3 || parts[1] != "since" {
        return Ok(None);
    }

    let step_seconds = match parts[0] {
        "seconds" => 1.0,
        "minutes" => 60.0,
        "hours" => 3600.0,
        "days" => 86_400.0,
        other => {
            return Err(IoError::InvalidTime {
                reason: format!("unrecognized time unit '{other}' in '{units_str}'"),
            });
        }
    };

    let base = parse_base_datetime(parts[2]).ok_or_else(|| IoError::InvalidTime {
        reason: format!("failed to parse base date in '{units_str}'"),
    })?;

    Ok(Some(TimeEncoding { base, step_seconds }))
}

/// Parse `"YYYY-MM-DD"` or `"YYYY-MM-DD HH:MM:SS"` (extra trailing text,
/// such as a timezone suffix, is ignored).
fn parse_base_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.len() >= 19 {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&s[..19], "%Y-%m-%d %H:%M:%S") {
            return Some(dt);
        }
    }
    let date_str = if s.len() >= 10 { &s[..10] } else { s };
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Convert floating-point offsets into datetimes under `encoding`.
///
/// Offsets are scaled to whole seconds (rounded) and added to the base with
/// chrono arithmetic.
///
/// # Errors
///
/// Returns [`IoError::InvalidTime`] if an offset overflows the representable
/// datetime range.
pub(crate) fn offsets_to_datetimes(
    encoding: TimeEncoding,
    offsets: &[f64],
) -> Result<Vec<NaiveDateTime>, IoError> {
    offsets
        .iter()
        .map(|&offset| {
            let seconds = (offset * encoding.step_seconds).round() as i64;
            encoding
                .base
                .checked_add_signed(TimeDelta::seconds(seconds))
                .ok_or_else(|| IoError::InvalidTime {
                    reason: format!("offset {offset} overflows from base {}", encoding.base),
                })
        })
        .collect()
}
