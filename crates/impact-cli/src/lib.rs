//! Impact allocation CLI library.
//!
//! This crate provides the CLI interface for the allocation engine.

mod cli;
pub mod commands;
mod config;
pub mod input;

pub use cli::{Cli, Commands, InputArgs};
pub use config::Config;
