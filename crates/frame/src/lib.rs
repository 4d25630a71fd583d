//! # tethys-frame
//!
//! Generic in-memory tabular structure shared by the source readers and the
//! converters. A [`Frame`] is an ordered set of equally-long named columns of
//! dynamically-typed [`Cell`]s. It carries only the operations the conversion
//! pipeline needs: column access, renaming, and row/column bookkeeping.

mod cell;
mod error;
mod frame;

pub use cell::Cell;
pub use error::FrameError;
pub use frame::Frame;
