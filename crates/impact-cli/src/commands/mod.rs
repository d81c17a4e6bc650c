//! CLI subcommand implementations.

pub mod distribute;
pub mod show_config;
pub mod summary;
pub mod validate;
