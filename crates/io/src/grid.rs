//! Gridded NetCDF reading and cartesian flattening.
//!
//! A gridded source is a self-describing multi-dimensional array file: a set
//! of dimensions with optional coordinate variables, plus data variables
//! defined over those dimensions. Reading flattens the grid into one row per
//! coordinate combination, with every data variable as a column — the
//! row-per-observation shape the converters melt from.

use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::path::Path;

use chrono::NaiveDateTime;
use tethys_frame::{Cell, Frame};
use tracing::debug;

use crate::error::IoError;
use crate::netcdf_read;

/// The default dimension renaming applied by the gridded reader.
pub fn default_dimension_map() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("time".to_string(), "timestamp".to_string()),
        ("lat".to_string(), "latitude".to_string()),
        ("lon".to_string(), "longitude".to_string()),
        ("depth".to_string(), "depth".to_string()),
    ])
}

/// Configuration for reading a gridded file.
#[derive(Debug, Clone)]
pub struct GridOptions {
    /// Source dimension name → output column name.
    dim_map: BTreeMap<String, String>,
    /// Slab size along the outermost dimension for out-of-core reads.
    /// `None` reads the whole grid in one slab.
    chunk_rows: Option<usize>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            dim_map: default_dimension_map(),
            chunk_rows: None,
        }
    }
}

impl GridOptions {
    /// Replace the dimension renaming wholesale.
    pub fn with_dimension_map(mut self, dim_map: BTreeMap<String, String>) -> Self {
        self.dim_map = dim_map;
        self
    }

    /// Add or override a single dimension rename.
    pub fn with_mapped_dimension(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.dim_map.insert(source.into(), target.into());
        self
    }

    /// Set the slab size along the outermost dimension (`None` or zero reads
    /// the whole grid at once).
    pub fn with_chunk_rows(mut self, chunk_rows: Option<usize>) -> Self {
        self.chunk_rows = chunk_rows;
        self
    }

    /// The active dimension renaming.
    pub fn dimension_map(&self) -> &BTreeMap<String, String> {
        &self.dim_map
    }

    /// The configured slab size, if any.
    pub fn chunk_rows(&self) -> Option<usize> {
        self.chunk_rows
    }
}

/// Coordinate values along one grid dimension.
enum CoordAxis {
    Floats(Vec<f64>),
    Times(Vec<NaiveDateTime>),
}

impl CoordAxis {
    fn cell(&self, idx: usize) -> Cell {
        match self {
            CoordAxis::Floats(v) => Cell::Float(v[idx]),
            CoordAxis::Times(v) => Cell::Timestamp(v[idx]),
        }
    }
}

/// The inspected structure of a gridded file.
struct GridLayout {
    /// Output (renamed) dimension names, outermost first.
    dim_names: Vec<String>,
    /// Dimension lengths, parallel to `dim_names`.
    dim_lens: Vec<usize>,
    /// Coordinate values per dimension.
    coords: Vec<CoordAxis>,
    /// Data variable names, in file order.
    data_vars: Vec<String>,
}

/// Read a gridded file and flatten it into a single [`Frame`].
///
/// Dimensions are renamed per [`GridOptions::dimension_map`] (defaults:
/// `time→timestamp`, `lat→latitude`, `lon→longitude`, `depth→depth`); the
/// grid is then expanded row-major into one row per coordinate combination.
/// An N-point time axis over an X×Y grid yields N·X·Y rows.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a missing path,
/// [`IoError::ShapeMismatch`] / [`IoError::UnsupportedRank`] for structural
/// problems, and [`IoError::Validation`] when the file has no data variables.
pub fn read_grid(path: &Path, options: &GridOptions) -> Result<Frame, IoError> {
    let whole = options.clone().with_chunk_rows(None);
    let mut result: Option<Frame> = None;
    read_grid_chunked(path, &whole, &mut |frame| {
        result = Some(frame);
        ControlFlow::Continue(())
    })?;
    Ok(result.unwrap_or_default())
}

/// Read a gridded file slab by slab, delivering one flattened [`Frame`] per
/// slab of the outermost dimension.
///
/// At least one frame is always delivered (an empty one, with the full
/// column set, for a zero-length outer dimension), so downstream consumers
/// can establish the output schema. The callback may break to stop early;
/// callers wanting to surface their own error capture it outside the
/// callback. The file handle is closed when this function returns, on
/// success, break, and error alike.
///
/// Returns the total number of flattened rows delivered.
pub fn read_grid_chunked(
    path: &Path,
    options: &GridOptions,
    on_frame: &mut dyn FnMut(Frame) -> ControlFlow<()>,
) -> Result<usize, IoError> {
    let file = netcdf_read::open_file(path)?;
    let layout = inspect(&file, path, options)?;

    let d0 = layout.dim_lens[0];
    let inner: usize = layout.dim_lens[1..].iter().product();
    let chunk = match options.chunk_rows {
        Some(c) if c > 0 => c,
        _ => d0.max(1),
    };

    if d0 == 0 || inner == 0 {
        let mut frame = Frame::new();
        for name in &layout.dim_names {
            push_grid_column(&mut frame, name, Vec::new())?;
        }
        for name in &layout.data_vars {
            push_grid_column(&mut frame, name, Vec::new())?;
        }
        let _ = on_frame(frame);
        return Ok(0);
    }

    let mut total = 0usize;
    let mut start = 0usize;
    while start < d0 {
        let end = (start + chunk).min(d0);
        let frame = read_slab_frame(&file, &layout, path, start, end, inner)?;
        total += frame.num_rows();
        if on_frame(frame).is_break() {
            break;
        }
        start = end;
    }

    debug!(
        path = %path.display(),
        rows = total,
        dims = layout.dim_names.len(),
        variables = layout.data_vars.len(),
        "flattened grid source"
    );

    Ok(total)
}

/// Inspect the file: establish the grid dimensions from the data variables,
/// load coordinate axes, and decode a CF time axis where present.
fn inspect(file: &netcdf::File, path: &Path, options: &GridOptions) -> Result<GridLayout, IoError> {
    let mut data_vars: Vec<String> = Vec::new();
    let mut source_dims: Option<Vec<(String, usize)>> = None;

    for var in file.variables() {
        let name = var.name();
        let dims: Vec<(String, usize)> = var
            .dimensions()
            .iter()
            .map(|d| (d.name(), d.len()))
            .collect();

        // Coordinate variables (1-D, named after their dimension) supply
        // axis values, not observations.
        if dims.len() == 1 && dims[0].0 == name {
            continue;
        }
        // Scalar variables carry file metadata, not gridded data.
        if dims.is_empty() {
            debug!(variable = %name, "skipping scalar variable");
            continue;
        }

        match &source_dims {
            None => {
                if dims.len() > 4 {
                    return Err(IoError::UnsupportedRank {
                        variable: name,
                        rank: dims.len(),
                    });
                }
                source_dims = Some(dims);
            }
            Some(expected) => {
                if dims != *expected {
                    return Err(IoError::ShapeMismatch {
                        variable: name,
                        expected: join_names(expected),
                        got: join_names(&dims),
                    });
                }
            }
        }
        data_vars.push(name);
    }

    let source_dims = source_dims.ok_or_else(|| IoError::Validation {
        details: format!("no data variables found in {}", path.display()),
    })?;

    let mut dim_names = Vec::with_capacity(source_dims.len());
    let mut dim_lens = Vec::with_capacity(source_dims.len());
    let mut coords = Vec::with_capacity(source_dims.len());

    for (src_name, len) in &source_dims {
        let out_name = options
            .dim_map
            .get(src_name)
            .cloned()
            .unwrap_or_else(|| src_name.clone());

        let axis = match file.variable(src_name) {
            Some(var) => {
                let values = var.get_values::<f64, _>(..)?;
                if out_name == "timestamp" {
                    match netcdf_read::read_time_encoding(file, src_name)? {
                        Some(encoding) => {
                            CoordAxis::Times(netcdf_read::offsets_to_datetimes(encoding, &values)?)
                        }
                        None => CoordAxis::Floats(values),
                    }
                } else {
                    CoordAxis::Floats(values)
                }
            }
            // No coordinate variable: fall back to the index along the axis.
            None => CoordAxis::Floats((0..*len).map(|i| i as f64).collect()),
        };

        dim_names.push(out_name);
        dim_lens.push(*len);
        coords.push(axis);
    }

    Ok(GridLayout {
        dim_names,
        dim_lens,
        coords,
        data_vars,
    })
}

/// Flatten rows `start..end` of the outermost dimension into a frame.
fn read_slab_frame(
    file: &netcdf::File,
    layout: &GridLayout,
    path: &Path,
    start: usize,
    end: usize,
    inner: usize,
) -> Result<Frame, IoError> {
    let slab_rows = (end - start) * inner;
    let mut frame = Frame::new();

    // Coordinate columns: row-major expansion, so the index along dimension j
    // of global row r is (r / stride_j) % len_j.
    for (j, name) in layout.dim_names.iter().enumerate() {
        let stride: usize = layout.dim_lens[j + 1..].iter().product();
        let len_j = layout.dim_lens[j];
        let mut cells = Vec::with_capacity(slab_rows);
        for r in 0..slab_rows {
            let global = start * inner + r;
            let idx = (global / stride) % len_j;
            cells.push(layout.coords[j].cell(idx));
        }
        push_grid_column(&mut frame, name, cells)?;
    }

    // Data variable columns: NaN is the missing marker.
    for var_name in &layout.data_vars {
        let var = file
            .variable(var_name)
            .ok_or_else(|| IoError::MissingVariable {
                name: var_name.clone(),
                path: path.to_path_buf(),
            })?;
        let values = read_slab(&var, &layout.dim_lens, start, end)?;
        let cells: Vec<Cell> = values
            .into_iter()
            .map(|v| if v.is_nan() { Cell::Null } else { Cell::Float(v) })
            .collect();
        push_grid_column(&mut frame, var_name, cells)?;
    }

    Ok(frame)
}

/// Read a hyperslab of `var` spanning `start..end` along the outermost
/// dimension and everything along the rest.
fn read_slab(
    var: &netcdf::Variable<'_>,
    dim_lens: &[usize],
    start: usize,
    end: usize,
) -> Result<Vec<f64>, IoError> {
    let values = match dim_lens.len() {
        1 => var.get_values::<f64, _>(start..end)?,
        2 => var.get_values::<f64, _>((start..end, 0..dim_lens[1]))?,
        3 => var.get_values::<f64, _>((start..end, 0..dim_lens[1], 0..dim_lens[2]))?,
        4 => var.get_values::<f64, _>((
            start..end,
            0..dim_lens[1],
            0..dim_lens[2],
            0..dim_lens[3],
        ))?,
        rank => {
            // Rank was bounded during inspection.
            return Err(IoError::UnsupportedRank {
                variable: var.name(),
                rank,
            });
        }
    };
    Ok(values)
}

fn push_grid_column(frame: &mut Frame, name: &str, cells: Vec<Cell>) -> Result<(), IoError> {
    frame
        .push_column(name, cells)
        .map_err(|e| IoError::Validation {
            details: e.to_string(),
        })
}

fn join_names(dims: &[(String, usize)]) -> String {
    dims.iter()
        .map(|(n, _)| n.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
