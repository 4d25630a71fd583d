use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tethys ocean observation normalizer.
#[derive(Parser)]
#[command(
    name = "tethys",
    version,
    about = "Normalize ocean observation files into a queryable long-form store"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Convert source files into canonical datasets.
    Convert(ConvertArgs),
    /// List datasets in the store directory.
    List(ListArgs),
    /// Show derived metadata for one dataset.
    Info(InfoArgs),
    /// Load a dataset with optional filters and print the rows as CSV.
    Query(QueryArgs),
}

/// Arguments for the `convert` subcommand.
#[derive(clap::Args)]
pub struct ConvertArgs {
    /// Path to TOML configuration file describing the conversions.
    #[arg(short, long, default_value = "tethys.toml")]
    pub config: PathBuf,
}

/// Arguments for the `list` subcommand.
#[derive(clap::Args)]
pub struct ListArgs {
    /// Store directory holding the datasets.
    #[arg(short, long, default_value = ".")]
    pub data_dir: PathBuf,
}

/// Arguments for the `info` subcommand.
#[derive(clap::Args)]
pub struct InfoArgs {
    /// Name of the dataset.
    pub name: String,

    /// Store directory holding the datasets.
    #[arg(short, long, default_value = ".")]
    pub data_dir: PathBuf,
}

/// Arguments for the `query` subcommand.
#[derive(clap::Args)]
pub struct QueryArgs {
    /// Name of the dataset.
    pub name: String,

    /// Store directory holding the datasets.
    #[arg(short, long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Comma-separated variable names to keep.
    #[arg(long)]
    pub variables: Option<String>,

    /// Start of the time range (inclusive), e.g. "2023-01-01 00:00:00".
    #[arg(long)]
    pub start: Option<String>,

    /// End of the time range (inclusive).
    #[arg(long)]
    pub end: Option<String>,

    /// Bounding box as "min_lat,max_lat,min_lon,max_lon".
    #[arg(long)]
    pub bbox: Option<String>,

    /// Minimum depth (inclusive).
    #[arg(long)]
    pub min_depth: Option<f64>,

    /// Maximum depth (inclusive).
    #[arg(long)]
    pub max_depth: Option<f64>,
}
