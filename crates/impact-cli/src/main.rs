use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use impact_core::AllocationEngine;
use tracing_subscriber::EnvFilter;

use impact_cli::commands::{distribute, show_config, summary, validate};
use impact_cli::input::AllocationInput;
use impact_cli::{Cli, Commands, Config};

/// Exit status for a rejected allocation set.
const EXIT_INVALID: u8 = 1;

/// Exit status for usage, input, and configuration errors.
const EXIT_ERROR: u8 = 2;

/// Load config and build the allocation engine from it.
fn load_engine(config_path: Option<&Path>) -> Result<(AllocationEngine, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let engine_config = config.engine().context("invalid configuration")?;
    Ok((AllocationEngine::new(engine_config), config))
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Validate { total, input, json }) => {
            let (engine, _config) = load_engine(cli.config.as_deref())?;
            let input = AllocationInput::load(input)?;
            let valid = validate::run(&mut out, &engine, *total, &input, *json)?;
            if !valid {
                return Ok(ExitCode::from(EXIT_INVALID));
            }
        }
        Some(Commands::Summary { input, json }) => {
            let (engine, _config) = load_engine(cli.config.as_deref())?;
            let input = AllocationInput::load(input)?;
            summary::run(&mut out, &engine, &input, *json)?;
        }
        Some(Commands::Distribute {
            total,
            location_ids,
            json,
        }) => {
            let (engine, _config) = load_engine(cli.config.as_deref())?;
            distribute::run(&mut out, &engine, *total, location_ids, *json)?;
        }
        Some(Commands::Config) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            show_config::run(&mut out, &config, cli.config.as_deref())?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
