//! # tethys-convert
//!
//! Per-format conversion pipelines that normalize source files into the
//! canonical long-form schema. Every converter follows the same contract —
//! read the source into a generic frame, transform it (rename, coerce,
//! melt wide→long, attach unit and provenance), validate column presence,
//! and only then persist — so a schema violation can never corrupt the
//! store.

mod coerce;
mod config;
mod converter;
mod error;
mod gridded;
mod melt;
mod tabular;

pub use config::{GridSpec, TabularSpec};
pub use converter::{Converter, default_target_path};
pub use error::ConvertError;
pub use gridded::GridConverter;
pub use tabular::TabularConverter;
