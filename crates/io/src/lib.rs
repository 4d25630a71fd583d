//! # tethys-io
//!
//! Bridges external file formats into Tethys's in-memory [`tethys_frame::Frame`]
//! structures and the canonical Parquet store. Reads delimited text and
//! gridded NetCDF sources, and encodes/decodes canonical frames against
//! compressed Parquet files.

mod csv_read;
mod error;
mod grid;
mod netcdf_read;
mod parquet_read;
mod parquet_write;
mod writer;

pub use csv_read::{CsvOptions, read_csv};
pub use error::IoError;
pub use grid::{GridOptions, default_dimension_map, read_grid, read_grid_chunked};
pub use parquet_read::read_observations;
pub use writer::{Compression, FrameWriter, WriterConfig, write_frame};
