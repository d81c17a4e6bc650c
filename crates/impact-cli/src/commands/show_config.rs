//! Config command for showing the resolved configuration.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::Config;

/// Prints the resolved configuration.
///
/// `config_path` is the file given with `--config`, if any. It is layered
/// over the default config file, so both are listed.
pub fn run<W: Write>(writer: &mut W, config: &Config, config_path: Option<&Path>) -> Result<()> {
    let engine = config.engine()?;

    writeln!(writer, "Impact configuration")?;
    match crate::config::default_config_file() {
        Some(path) if path.exists() => writeln!(writer, "Config file: {}", path.display())?,
        Some(path) => writeln!(writer, "Config file: {} (not found)", path.display())?,
        None => writeln!(writer, "Config file: (no config directory)")?,
    }
    if let Some(path) = config_path {
        if path.exists() {
            writeln!(writer, "Explicit config: {}", path.display())?;
        } else {
            writeln!(writer, "Explicit config: {} (not found)", path.display())?;
        }
    }
    writeln!(writer, "Locale: {}", engine.locale)?;

    let tolerance = engine.sum_tolerance();
    if tolerance > 0.0 {
        writeln!(writer, "Sum tolerance: {tolerance}")?;
    } else {
        writeln!(writer, "Sum tolerance: exact")?;
    }

    Ok(())
}
