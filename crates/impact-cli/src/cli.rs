//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Donor impact allocation tool.
///
/// Validates how a datapoint value is split across locations, summarizes the
/// split, and proposes even distributions.
#[derive(Debug, Parser)]
#[command(name = "impact", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that allocations sum to the datapoint value.
    ///
    /// Exits with status 1 when the allocation set is rejected.
    Validate {
        /// The datapoint value being allocated. Overrides `total_value` from --input.
        #[arg(long, allow_negative_numbers = true)]
        total: Option<f64>,

        #[command(flatten)]
        input: InputArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show each location's share of the allocated total.
    Summary {
        #[command(flatten)]
        input: InputArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Split a datapoint value evenly across locations.
    Distribute {
        /// The datapoint value to split.
        #[arg(long, allow_negative_numbers = true)]
        total: f64,

        /// Location IDs, one share each. Repeated IDs get separate shares.
        #[arg(value_name = "LOCATION_ID")]
        location_ids: Vec<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved configuration.
    Config,
}

/// Allocation input shared by `validate` and `summary`.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// JSON document with `total_value`, `allocations` and `locations`.
    /// Use `-` to read from stdin.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// An allocation as `ID=VALUE`. May be repeated.
    #[arg(short, long = "allocation", value_name = "ID=VALUE")]
    pub allocations: Vec<String>,

    /// A location name as `ID=NAME`. May be repeated.
    #[arg(short, long = "location", value_name = "ID=NAME")]
    pub locations: Vec<String>,
}
