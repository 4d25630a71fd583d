//! Integration tests for the dataset store and filtered loader.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tethys_frame::{Cell, Frame};
use tethys_io::{WriterConfig, write_frame};
use tethys_schema::Observation;
use tethys_store::{BoundingBox, DataLoader, Filters, StoreError};

fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// One row of the fixture dataset.
struct Row {
    timestamp: NaiveDateTime,
    latitude: f64,
    longitude: f64,
    depth: f64,
    variable: &'static str,
    value: f64,
}

fn row(d: u32, lat: f64, lon: f64, depth: f64, variable: &'static str, value: f64) -> Row {
    Row {
        timestamp: day(d),
        latitude: lat,
        longitude: lon,
        depth,
        variable,
        value,
    }
}

/// Write `rows` as a canonical dataset named `name` under `dir`.
fn write_dataset(dir: &Path, name: &str, rows: &[Row]) {
    let mut frame = Frame::new();
    frame
        .push_column(
            "timestamp",
            rows.iter().map(|r| Cell::Timestamp(r.timestamp)).collect(),
        )
        .unwrap();
    frame
        .push_column(
            "latitude",
            rows.iter().map(|r| Cell::Float(r.latitude)).collect(),
        )
        .unwrap();
    frame
        .push_column(
            "longitude",
            rows.iter().map(|r| Cell::Float(r.longitude)).collect(),
        )
        .unwrap();
    frame
        .push_column("depth", rows.iter().map(|r| Cell::Float(r.depth)).collect())
        .unwrap();
    frame
        .push_column(
            "variable",
            rows.iter()
                .map(|r| Cell::Str(r.variable.to_string()))
                .collect(),
        )
        .unwrap();
    frame
        .push_column("value", rows.iter().map(|r| Cell::Float(r.value)).collect())
        .unwrap();
    frame
        .push_column(
            "unit",
            rows.iter().map(|_| Cell::Str("unknown".into())).collect(),
        )
        .unwrap();
    frame
        .push_column(
            "source",
            rows.iter().map(|_| Cell::Str("fixture.csv".into())).collect(),
        )
        .unwrap();

    let path = dir.join(format!("{name}.parquet"));
    write_frame(&path, &frame, &WriterConfig::default()).expect("write dataset");
}

/// The reference dataset: temp at depths 0, 5, 10 and sal at depth 0.
fn reference_rows() -> Vec<Row> {
    vec![
        row(1, 45.5, -125.5, 0.0, "temp", 15.2),
        row(1, 45.5, -125.5, 5.0, "temp", 14.9),
        row(2, 45.6, -125.4, 10.0, "temp", 14.1),
        row(3, 46.0, -125.0, 0.0, "sal", 33.1),
    ]
}

fn identity(obs: &Observation) -> (Option<NaiveDateTime>, Option<u64>, String, Option<u64>) {
    (
        obs.timestamp,
        obs.depth.map(f64::to_bits),
        obs.variable.clone(),
        obs.value.map(f64::to_bits),
    )
}

#[test]
fn load_without_filters_returns_everything() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "coastal", &reference_rows());

    let loader = DataLoader::new(dir.path());
    let observations = loader.load_dataset("coastal", &Filters::none()).unwrap();
    assert_eq!(observations.len(), 4);

    // Exactly the eight canonical fields survive the round trip; spot-check
    // the typed record.
    assert_eq!(observations[0].variable, "temp");
    assert_eq!(observations[0].unit, "unknown");
    assert_eq!(observations[0].source, "fixture.csv");
}

#[test]
fn depth_filter_includes_both_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "coastal", &reference_rows());

    let loader = DataLoader::new(dir.path());
    let filters = Filters::none()
        .with_variables(["temp"])
        .with_depth_range(0.0, 5.0);
    let observations = loader.load_dataset("coastal", &filters).unwrap();

    // temp rows exist at depths 0, 5, 10 — exactly 0 and 5 pass.
    let depths: Vec<f64> = observations.iter().filter_map(|o| o.depth).collect();
    assert_eq!(depths, vec![0.0, 5.0]);
}

#[test]
fn filters_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "coastal", &reference_rows());

    let loader = DataLoader::new(dir.path());
    let filters = Filters::none().with_depth_range(0.0, 5.0);

    let once = loader.load_dataset("coastal", &filters).unwrap();
    // Re-applying the same predicate to the result changes nothing.
    let twice: Vec<Observation> = once
        .iter()
        .filter(|o| filters.matches(o))
        .cloned()
        .collect();
    assert_eq!(once.len(), twice.len());
    assert_eq!(
        once.iter().map(identity).collect::<Vec<_>>(),
        twice.iter().map(identity).collect::<Vec<_>>()
    );
}

#[test]
fn filter_composition_equals_intersection() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "coastal", &reference_rows());
    let loader = DataLoader::new(dir.path());

    let by_variable = loader
        .load_dataset("coastal", &Filters::none().with_variables(["temp"]))
        .unwrap();
    let by_depth = loader
        .load_dataset("coastal", &Filters::none().with_depth_range(0.0, 5.0))
        .unwrap();
    let combined = loader
        .load_dataset(
            "coastal",
            &Filters::none()
                .with_variables(["temp"])
                .with_depth_range(0.0, 5.0),
        )
        .unwrap();

    let var_ids: BTreeSet<_> = by_variable.iter().map(identity).collect();
    let depth_ids: BTreeSet<_> = by_depth.iter().map(identity).collect();
    let combined_ids: BTreeSet<_> = combined.iter().map(identity).collect();

    let intersection: BTreeSet<_> = var_ids.intersection(&depth_ids).cloned().collect();
    assert_eq!(combined_ids, intersection);
}

#[test]
fn time_and_bbox_filters() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "coastal", &reference_rows());
    let loader = DataLoader::new(dir.path());

    // Inclusive time range picks up days 1 and 2.
    let in_time = loader
        .load_dataset(
            "coastal",
            &Filters::none().with_time_range(day(1), day(2)),
        )
        .unwrap();
    assert_eq!(in_time.len(), 3);

    // The bbox excludes the northernmost sal row.
    let in_box = loader
        .load_dataset(
            "coastal",
            &Filters::none().with_bbox(BoundingBox {
                min_lat: 45.0,
                max_lat: 45.6,
                min_lon: -126.0,
                max_lon: -125.0,
            }),
        )
        .unwrap();
    assert_eq!(in_box.len(), 3);
    assert!(in_box.iter().all(|o| o.variable == "temp"));
}

#[test]
fn info_variables_match_unfiltered_load() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "coastal", &reference_rows());
    let mut loader = DataLoader::new(dir.path());

    let info = loader.get_dataset_info("coastal").unwrap();
    let observations = loader.load_dataset("coastal", &Filters::none()).unwrap();

    let loaded_variables: BTreeSet<String> =
        observations.iter().map(|o| o.variable.clone()).collect();
    let info_variables: BTreeSet<String> = info.variables.iter().cloned().collect();
    assert_eq!(info_variables, loaded_variables);

    assert_eq!(info.n_observations, 4);
    assert_eq!(info.time_range, Some((day(1), day(3))));
    assert_eq!(info.depth_range, Some((0.0, 10.0)));
    assert_eq!(info.sources, vec!["fixture.csv"]);

    let bbox = info.spatial_coverage.unwrap();
    assert_eq!(bbox.min_lat, 45.5);
    assert_eq!(bbox.max_lat, 46.0);
    assert_eq!(bbox.min_lon, -125.5);
    assert_eq!(bbox.max_lon, -125.0);
}

#[test]
fn missing_dataset_is_not_found_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut loader = DataLoader::new(dir.path());

    match loader.get_dataset_info("missing").unwrap_err() {
        StoreError::DatasetNotFound { name, .. } => assert_eq!(name, "missing"),
        other => panic!("expected DatasetNotFound, got: {other}"),
    }

    let loader = DataLoader::new(dir.path());
    assert!(matches!(
        loader.load_dataset("missing", &Filters::none()),
        Err(StoreError::DatasetNotFound { .. })
    ));
}

#[test]
fn list_datasets_sorted_and_non_recursive() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "pacific", &reference_rows());
    write_dataset(dir.path(), "atlantic", &reference_rows());

    // Distractors: wrong extension, and a dataset in a subdirectory.
    std::fs::write(dir.path().join("notes.txt"), "not a dataset").unwrap();
    let sub = dir.path().join("nested");
    std::fs::create_dir(&sub).unwrap();
    write_dataset(&sub, "hidden", &reference_rows());

    let loader = DataLoader::new(dir.path());
    let names = loader.list_datasets().unwrap();
    assert_eq!(names, vec!["atlantic", "pacific"]);
}

#[test]
fn list_datasets_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let loader = DataLoader::new(dir.path());
    assert!(loader.list_datasets().unwrap().is_empty());
}

#[test]
fn info_cache_invalidates_on_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "coastal", &reference_rows());
    let mut loader = DataLoader::new(dir.path());

    let before = loader.get_dataset_info("coastal").unwrap();
    assert_eq!(before.n_observations, 4);

    // Cached path: same answer without a rewrite.
    assert_eq!(loader.get_dataset_info("coastal").unwrap(), before);

    // Rewrite with fewer rows; the mtime changes and the cache refreshes.
    std::thread::sleep(std::time::Duration::from_millis(20));
    write_dataset(dir.path(), "coastal", &reference_rows()[..2]);

    let after = loader.get_dataset_info("coastal").unwrap();
    assert_eq!(after.n_observations, 2);
}
