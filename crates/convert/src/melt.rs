//! Wide-to-long reshaping.

use tethys_frame::{Cell, Frame};

use crate::error::ConvertError;

/// Melt `frame` from wide to long form.
///
/// For every id-column combination (one physical row of the source) one
/// output row is emitted per value column, with `variable` set to that
/// column's name and `value` to its cell. An N-row source with M value
/// columns yields exactly N×M long rows, grouped by variable (the id
/// columns are tiled once per value column). Source columns that are
/// neither id nor value columns are dropped.
///
/// # Errors
///
/// Returns [`ConvertError::MissingColumn`] if a named column is absent, or
/// a frame error if the output columns collide.
pub(crate) fn melt(
    frame: &Frame,
    id_columns: &[String],
    value_columns: &[String],
) -> Result<Frame, ConvertError> {
    let n = frame.num_rows();
    let m = value_columns.len();
    let mut long = Frame::new();

    for id in id_columns {
        let src = frame.column(id).ok_or_else(|| ConvertError::MissingColumn {
            name: id.clone(),
        })?;
        let mut cells = Vec::with_capacity(n * m);
        for _ in 0..m {
            cells.extend_from_slice(src);
        }
        long.push_column(id.clone(), cells)?;
    }

    let mut variable = Vec::with_capacity(n * m);
    let mut value = Vec::with_capacity(n * m);
    for name in value_columns {
        let src = frame.column(name).ok_or_else(|| ConvertError::MissingColumn {
            name: name.clone(),
        })?;
        variable.extend(std::iter::repeat_n(Cell::Str(name.clone()), n));
        value.extend_from_slice(src);
    }
    long.push_column("variable", variable)?;
    long.push_column("value", value)?;

    Ok(long)
}
