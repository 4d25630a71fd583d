use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime};
use tethys_schema::Observation;
use tethys_store::{BoundingBox, DataLoader, Filters};

use crate::cli::QueryArgs;

/// Load a dataset with the requested filters and print the rows as CSV.
pub fn run(args: QueryArgs) -> Result<()> {
    let filters = build_filters(&args)?;

    let loader = DataLoader::new(&args.data_dir);
    let observations = loader
        .load_dataset(&args.name, &filters)
        .with_context(|| format!("failed to load dataset '{}'", args.name))?;

    println!("timestamp,latitude,longitude,depth,variable,value,unit,source");
    for obs in &observations {
        println!("{}", format_row(obs));
    }
    Ok(())
}

fn build_filters(args: &QueryArgs) -> Result<Filters> {
    let mut filters = Filters::none();

    if let Some(variables) = &args.variables {
        filters = filters.with_variables(variables.split(',').map(str::trim));
    }

    match (&args.start, &args.end) {
        (Some(start), Some(end)) => {
            filters = filters.with_time_range(parse_timestamp(start)?, parse_timestamp(end)?);
        }
        (None, None) => {}
        _ => bail!("time filtering needs both --start and --end"),
    }

    if let Some(bbox) = &args.bbox {
        filters = filters.with_bbox(parse_bbox(bbox)?);
    }

    if args.min_depth.is_some() || args.max_depth.is_some() {
        filters = filters.with_depth_range(
            args.min_depth.unwrap_or(f64::NEG_INFINITY),
            args.max_depth.unwrap_or(f64::INFINITY),
        );
    }

    Ok(filters)
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(t);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .with_context(|| format!("invalid timestamp '{s}' (expected YYYY-MM-DD[ HH:MM:SS])"))
}

fn parse_bbox(s: &str) -> Result<BoundingBox> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("invalid bbox '{s}'"))?;
    if parts.len() != 4 {
        bail!("bbox needs four values: min_lat,max_lat,min_lon,max_lon");
    }
    Ok(BoundingBox {
        min_lat: parts[0],
        max_lat: parts[1],
        min_lon: parts[2],
        max_lon: parts[3],
    })
}

fn format_row(obs: &Observation) -> String {
    format!(
        "{},{},{},{},{},{},{},{}",
        obs.timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        format_f64(obs.latitude),
        format_f64(obs.longitude),
        format_f64(obs.depth),
        obs.variable,
        format_f64(obs.value),
        obs.unit,
        obs.source
    )
}

fn format_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
