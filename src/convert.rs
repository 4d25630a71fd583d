//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};
use tethys_io::{Compression, WriterConfig};
use tethys_schema::UnitMap;

use crate::config::{TethysConfig, WriterToml};

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Builds a [`WriterConfig`] from the TOML writer configuration.
pub fn build_writer_config(writer: &WriterToml) -> Result<WriterConfig> {
    let compression = parse_compression(&writer.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(writer.row_group_size))
}

/// Builds a [`UnitMap`] from the TOML `[units]` table, layered over the
/// defaults.
pub fn build_unit_map(config: &TethysConfig) -> UnitMap {
    UnitMap::from_entries(config.units.iter().map(|(k, v)| (k.clone(), v.clone())))
}
