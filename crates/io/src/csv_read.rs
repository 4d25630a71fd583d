//! Delimited-text reading.

use std::path::Path;

use tethys_frame::{Cell, Frame};
use tracing::debug;

use crate::error::IoError;

/// Parser options passed through verbatim to the underlying CSV reader.
///
/// The reader makes no attempt to interpret cell contents: every non-empty
/// field becomes an opaque [`Cell::Str`], and empty fields become
/// [`Cell::Null`]. Type coercion is the converters' job.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter byte.
    delimiter: u8,
    /// Whether the first record is a header row.
    has_headers: bool,
    /// Quote character byte.
    quote: u8,
    /// Optional comment character; lines starting with it are skipped.
    comment: Option<u8>,
    /// Whether records may have varying field counts.
    flexible: bool,
    /// Whether to trim surrounding whitespace from fields.
    trim: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            quote: b'"',
            comment: None,
            flexible: false,
            trim: false,
        }
    }
}

impl CsvOptions {
    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable or disable header-row handling.
    ///
    /// Without headers, columns are named `col_0`, `col_1`, … in file order.
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Set the quote character.
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Set an optional comment character.
    pub fn with_comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    /// Allow records with varying field counts.
    pub fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    /// Trim surrounding whitespace from every field.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

/// Read a delimited text file into a [`Frame`] of opaque string cells.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist, or
/// [`IoError::Csv`] if the parser rejects the file.
pub fn read_csv(path: &Path, options: &CsvOptions) -> Result<Frame, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .quote(options.quote)
        .comment(options.comment)
        .flexible(options.flexible);
    if options.trim {
        builder.trim(csv::Trim::All);
    }

    let mut reader = builder.from_path(path)?;

    let header_names: Vec<String> = if options.has_headers {
        reader.headers()?.iter().map(str::to_string).collect()
    } else {
        Vec::new()
    };

    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;

    let names: Vec<String> = if options.has_headers {
        header_names
    } else {
        let width = records.first().map_or(0, csv::StringRecord::len);
        (0..width).map(|i| format!("col_{i}")).collect()
    };

    let mut frame = Frame::new();
    for (i, name) in names.iter().enumerate() {
        let cells: Vec<Cell> = records
            .iter()
            .map(|record| match record.get(i) {
                None | Some("") => Cell::Null,
                Some(field) => Cell::Str(field.to_string()),
            })
            .collect();
        frame
            .push_column(name.clone(), cells)
            .map_err(|e| IoError::Csv {
                reason: e.to_string(),
            })?;
    }

    debug!(
        path = %path.display(),
        rows = frame.num_rows(),
        columns = frame.num_columns(),
        "read csv source"
    );

    Ok(frame)
}
