//! Loading allocation input from files, stdin, and command-line pairs.

use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use impact_core::{Allocation, Location, LocationId};
use regex::Regex;
use serde::Deserialize;

use crate::cli::InputArgs;

/// Pre-compiled regex for `ID=VALUE` and `ID=NAME` pairs.
static PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^=]*?)\s*=\s*(.*?)\s*$").unwrap());

/// Allocation form data as submitted by a caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AllocationInput {
    /// The datapoint value, if the document carries one.
    #[serde(default)]
    pub total_value: Option<f64>,

    #[serde(default)]
    pub allocations: Vec<Allocation>,

    #[serde(default)]
    pub locations: Vec<Location>,
}

impl AllocationInput {
    /// Builds input from `--input` (file or `-` for stdin) plus any
    /// `--allocation`/`--location` pairs, which are appended after the
    /// document's entries.
    pub fn load(args: &InputArgs) -> Result<Self> {
        let mut input = match args.input.as_deref() {
            Some(path) if path == Path::new("-") => {
                Self::from_reader(std::io::stdin().lock()).context("failed to read stdin")?
            }
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        for pair in &args.allocations {
            input.allocations.push(parse_allocation(pair)?);
        }
        for pair in &args.locations {
            input.locations.push(parse_location(pair)?);
        }

        tracing::debug!(
            allocations = input.allocations.len(),
            locations = input.locations.len(),
            total_value = ?input.total_value,
            "loaded allocation input"
        );
        Ok(input)
    }

    /// Loads input from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("failed to read {}", path.display()))
    }

    /// Parses input from a JSON reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let input: Self =
            serde_json::from_str(&content).context("failed to parse allocation input")?;
        input.ensure_finite()?;
        Ok(input)
    }

    fn ensure_finite(&self) -> Result<()> {
        if let Some(total) = self.total_value {
            ensure_finite(total, "total_value")?;
        }
        for allocation in &self.allocations {
            ensure_finite(
                allocation.allocated_value,
                &format!("allocated_value for {}", allocation.location_id),
            )?;
        }
        Ok(())
    }
}

/// Rejects NaN and infinities.
pub fn ensure_finite(value: f64, what: &str) -> Result<()> {
    if !value.is_finite() {
        anyhow::bail!("{what} must be a finite number, got {value}");
    }
    Ok(())
}

/// Splits `ID=REST` into a validated location ID and the trimmed remainder.
fn split_pair<'a>(s: &'a str, expected: &str) -> Result<(LocationId, &'a str)> {
    let Some(caps) = PAIR_RE.captures(s) else {
        anyhow::bail!("Invalid pair: {s:?}. Expected {expected}");
    };
    let (Some(id), Some(rest)) = (caps.get(1), caps.get(2)) else {
        anyhow::bail!("Invalid pair: {s:?}. Expected {expected}");
    };
    let id = LocationId::new(id.as_str()).with_context(|| format!("invalid pair {s:?}"))?;
    Ok((id, rest.as_str()))
}

/// Parse an allocation given as `ID=VALUE`, e.g. `nairobi=1200.5`.
pub fn parse_allocation(s: &str) -> Result<Allocation> {
    let (id, value) = split_pair(s, "ID=VALUE")?;
    let value: f64 = value
        .parse()
        .with_context(|| format!("invalid allocation value {value:?} for {id}"))?;
    ensure_finite(value, &format!("allocation value for {id}"))?;
    Ok(Allocation::new(id, value))
}

/// Parse a location given as `ID=NAME`, e.g. `nbo=Nairobi`.
pub fn parse_location(s: &str) -> Result<Location> {
    let (id, name) = split_pair(s, "ID=NAME")?;
    if name.is_empty() {
        anyhow::bail!("location name for {id} cannot be empty");
    }
    Ok(Location::new(id, name))
}

/// Parse bare location IDs for `distribute`.
pub fn parse_location_ids(ids: &[String]) -> Result<Vec<LocationId>> {
    ids.iter()
        .map(|id| LocationId::new(id.as_str()).with_context(|| format!("invalid location ID {id:?}")))
        .collect()
}
