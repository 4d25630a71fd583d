use anyhow::{Context, Result};
use tethys_store::DataLoader;

use crate::cli::{InfoArgs, ListArgs};

/// Print available dataset names, one per line.
pub fn run_list(args: ListArgs) -> Result<()> {
    let loader = DataLoader::new(&args.data_dir);
    let names = loader
        .list_datasets()
        .with_context(|| format!("failed to list datasets in {}", args.data_dir.display()))?;

    for name in names {
        println!("{name}");
    }
    Ok(())
}

/// Print derived metadata for one dataset.
pub fn run_info(args: InfoArgs) -> Result<()> {
    let mut loader = DataLoader::new(&args.data_dir);
    let info = loader
        .get_dataset_info(&args.name)
        .with_context(|| format!("failed to inspect dataset '{}'", args.name))?;

    println!("dataset: {}", args.name);
    println!("observations: {}", info.n_observations);
    println!("variables: {}", info.variables.join(", "));
    match info.time_range {
        Some((start, end)) => println!("time range: {start} .. {end}"),
        None => println!("time range: (none)"),
    }
    match info.depth_range {
        Some((min, max)) => println!("depth range: {min} .. {max}"),
        None => println!("depth range: (none)"),
    }
    match info.spatial_coverage {
        Some(bbox) => println!(
            "spatial coverage: lat {} .. {}, lon {} .. {}",
            bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon
        ),
        None => println!("spatial coverage: (none)"),
    }
    println!("sources: {}", info.sources.join(", "));
    Ok(())
}
