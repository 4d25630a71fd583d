//! # tethys-store
//!
//! The dataset store: a directory of canonical Parquet datasets, one file per
//! name, and the loader that serves filtered slices of them. Every read is a
//! full-file load; derived metadata is cached per dataset keyed by file
//! modification time.

mod error;
mod filter;
mod info;
mod loader;

pub use error::StoreError;
pub use filter::{BoundingBox, Filters};
pub use info::DatasetInfo;
pub use loader::{DATASET_EXTENSION, DataLoader};
