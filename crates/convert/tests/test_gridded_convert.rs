//! Integration tests for the gridded conversion pipeline.

use std::path::{Path, PathBuf};

use tethys_convert::{Converter, GridConverter};
use tethys_io::{GridOptions, read_observations};
use tethys_schema::Observation;

/// Write a `time x depth x lat x lon` grid (single-point lat/lon axes) with
/// a `thetao` variable (values `10*t + d`) and, optionally, a second `so`
/// variable (values `30 + 10*t + d`).
fn write_grid(dir: &Path, nt: usize, nd: usize, with_salinity: bool) -> PathBuf {
    let path = dir.join("model.nc");
    let mut file = netcdf::create(&path).expect("create NetCDF file");

    file.add_dimension("time", nt).expect("add dim time");
    file.add_dimension("depth", nd).expect("add dim depth");
    file.add_dimension("lat", 1).expect("add dim lat");
    file.add_dimension("lon", 1).expect("add dim lon");

    {
        let vals: Vec<f64> = (0..nt).map(|t| t as f64).collect();
        let mut var = file
            .add_variable::<f64>("time", &["time"])
            .expect("add var time");
        var.put_values(&vals, ..).expect("put time");
        var.put_attribute("units", "days since 2023-06-01")
            .expect("time units");
    }
    {
        let vals: Vec<f64> = (0..nd).map(|d| (d * 5) as f64).collect();
        let mut var = file
            .add_variable::<f64>("depth", &["depth"])
            .expect("add var depth");
        var.put_values(&vals, ..).expect("put depth");
    }
    {
        let mut var = file
            .add_variable::<f64>("lat", &["lat"])
            .expect("add var lat");
        var.put_values(&[45.0], ..).expect("put lat");
    }
    {
        let mut var = file
            .add_variable::<f64>("lon", &["lon"])
            .expect("add var lon");
        var.put_values(&[-125.0], ..).expect("put lon");
    }

    let grid_dims = ["time", "depth", "lat", "lon"];
    {
        let vals: Vec<f64> = (0..nt * nd)
            .map(|i| (10 * (i / nd) + i % nd) as f64)
            .collect();
        let mut var = file
            .add_variable::<f64>("thetao", &grid_dims)
            .expect("add var thetao");
        var.put_values(&vals, ..).expect("put thetao");
    }
    if with_salinity {
        let vals: Vec<f64> = (0..nt * nd)
            .map(|i| (30 + 10 * (i / nd) + i % nd) as f64)
            .collect();
        let mut var = file
            .add_variable::<f64>("so", &grid_dims)
            .expect("add var so");
        var.put_values(&vals, ..).expect("put so");
    }

    path
}

fn by_variable<'a>(observations: &'a [Observation], name: &str) -> Vec<&'a Observation> {
    observations
        .iter()
        .filter(|o| o.variable == name)
        .collect()
}

#[test]
fn grid_converts_to_long_form() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_grid(dir.path(), 3, 2, true);
    let target = dir.path().join("model.parquet");

    GridConverter::new(&source)
        .with_target_path(&target)
        .convert()
        .expect("conversion succeeds");

    let observations = read_observations(&target).expect("read succeeds");

    // 3 time steps x 2 depths x 2 variables.
    assert_eq!(observations.len(), 12);
    assert_eq!(by_variable(&observations, "thetao").len(), 6);
    assert_eq!(by_variable(&observations, "so").len(), 6);

    for obs in &observations {
        // Gridded units are not derivable from the file.
        assert_eq!(obs.unit, "unknown");
        assert_eq!(obs.source, source.display().to_string());
        assert!(obs.timestamp.is_some());
        assert_eq!(obs.latitude, Some(45.0));
        assert_eq!(obs.longitude, Some(-125.0));
    }

    // First thetao row: t=0, depth=0.
    let thetao = by_variable(&observations, "thetao");
    assert_eq!(thetao[0].depth, Some(0.0));
    assert_eq!(thetao[0].value, Some(0.0));
    // Last thetao row: t=2, depth=5.
    assert_eq!(thetao[5].depth, Some(5.0));
    assert_eq!(thetao[5].value, Some(21.0));
}

#[test]
fn variable_mapping_applies_after_melt() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_grid(dir.path(), 2, 1, true);
    let target = dir.path().join("model.parquet");

    GridConverter::new(&source)
        .with_target_path(&target)
        .with_mapped_variable("thetao", "temp")
        .convert()
        .expect("conversion succeeds");

    let observations = read_observations(&target).unwrap();

    // Mapped name replaces the source name; unmapped names pass through.
    assert_eq!(by_variable(&observations, "temp").len(), 2);
    assert!(by_variable(&observations, "thetao").is_empty());
    assert_eq!(by_variable(&observations, "so").len(), 2);
}

#[test]
fn chunked_streaming_matches_whole_file_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_grid(dir.path(), 6, 3, true);

    let whole_target = dir.path().join("whole.parquet");
    GridConverter::new(&source)
        .with_target_path(&whole_target)
        .convert()
        .expect("whole-file conversion succeeds");

    let chunked_target = dir.path().join("chunked.parquet");
    GridConverter::new(&source)
        .with_target_path(&chunked_target)
        .with_grid_options(GridOptions::default().with_chunk_rows(Some(2)))
        .convert()
        .expect("streaming conversion succeeds");

    let whole = read_observations(&whole_target).unwrap();
    let chunked = read_observations(&chunked_target).unwrap();

    assert_eq!(whole.len(), 36);
    assert_eq!(chunked.len(), whole.len());

    // Streaming reorders rows (per-slab melt blocks), so compare as sets of
    // identifying tuples.
    let key = |o: &Observation| {
        (
            o.timestamp,
            o.depth.map(f64::to_bits),
            o.variable.clone(),
            o.value.map(f64::to_bits),
        )
    };
    let mut whole_keys: Vec<_> = whole.iter().map(key).collect();
    let mut chunked_keys: Vec<_> = chunked.iter().map(key).collect();
    whole_keys.sort();
    chunked_keys.sort();
    assert_eq!(whole_keys, chunked_keys);
}

#[test]
fn missing_source_file_propagates() {
    let result = GridConverter::new("/nonexistent/model.nc").convert();
    assert!(result.is_err());
}
