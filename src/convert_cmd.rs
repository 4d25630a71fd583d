use anyhow::{Context, Result, bail};
use tracing::info;

use tethys_convert::Converter;

use crate::cli::ConvertArgs;
use crate::config::TethysConfig;
use crate::convert;

/// Run every conversion described in the configuration file.
pub fn run(args: ConvertArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config: {}", args.config.display()))?;
    let config: TethysConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse config: {}", args.config.display()))?;

    if config.tabular.is_empty() && config.gridded.is_empty() {
        bail!(
            "no conversions configured: add [[tabular]] or [[gridded]] sections to {}",
            args.config.display()
        );
    }

    let writer = convert::build_writer_config(&config.writer)?;
    let units = convert::build_unit_map(&config);

    let mut completed = 0usize;

    for spec in config.tabular {
        let source = spec.source_path.clone();
        let converter = spec
            .into_converter(units.clone(), writer.clone())
            .with_context(|| format!("invalid tabular spec for {}", source.display()))?;
        converter
            .convert()
            .with_context(|| format!("failed to convert {}", source.display()))?;
        completed += 1;
    }

    for spec in config.gridded {
        let source = spec.source_path.clone();
        let converter = spec.into_converter(writer.clone());
        converter
            .convert()
            .with_context(|| format!("failed to convert {}", source.display()))?;
        completed += 1;
    }

    info!(completed, "all conversions finished");
    Ok(())
}
