//! Distribute command for proposing an even split of a datapoint value.
//!
//! Human-readable output is one `ID=VALUE` line per share, which can be fed
//! back to `validate` and `summary` through `--allocation`.

use std::io::Write;

use anyhow::Result;
use impact_core::{Allocation, AllocationEngine};

use crate::input::parse_location_ids;

/// Format allocations as `ID=VALUE` lines.
///
/// Values use Rust's shortest round-trip representation so re-parsing them
/// reproduces the exact same numbers.
pub fn format_allocations(allocations: &[Allocation]) -> String {
    allocations
        .iter()
        .map(|a| format!("{}={}\n", a.location_id, a.allocated_value))
        .collect()
}

/// Runs the distribute command.
pub fn run<W: Write>(
    writer: &mut W,
    engine: &AllocationEngine,
    total: f64,
    location_ids: &[String],
    json: bool,
) -> Result<()> {
    if !total.is_finite() {
        anyhow::bail!("total must be a finite number, got {total}");
    }
    let ids = parse_location_ids(location_ids)?;
    let allocations = engine.distribute_evenly(total, &ids);

    if allocations.is_empty() {
        tracing::debug!("no location IDs given, nothing to distribute");
    }

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&allocations)?)?;
    } else {
        write!(writer, "{}", format_allocations(&allocations))?;
    }

    Ok(())
}
