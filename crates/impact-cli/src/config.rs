//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use impact_core::{ConfigError, EngineConfig, Locale};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Locale used to render numbers in messages and summaries.
    pub locale: Locale,

    /// Accepted difference between allocated sum and datapoint value.
    /// Zero means exact equality.
    pub sum_tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            sum_tolerance: 0.0,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(path) = default_config_file() {
            figment = figment.merge(Toml::file(path));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (IMPACT_*)
        figment = figment.merge(Env::prefixed("IMPACT_"));

        figment.extract()
    }

    /// Builds the engine configuration, rejecting invalid tolerances.
    pub fn engine(&self) -> Result<EngineConfig, ConfigError> {
        EngineConfig::default()
            .with_locale(self.locale)
            .with_sum_tolerance(self.sum_tolerance)
    }
}

/// Returns the platform-specific config directory for impact.
///
/// On Linux: `~/.config/impact`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("impact"))
}

/// Returns the default config file path.
pub fn default_config_file() -> Option<PathBuf> {
    dirs_config_path().map(|p| p.join("config.toml"))
}
