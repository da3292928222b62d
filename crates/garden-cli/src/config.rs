//! Driver configuration.
//!
//! Wraps the simulation parameters with logging and output settings.
//! Configuration can be loaded from and saved to a TOML file.

use garden_sim::SimConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "garden.toml";

/// Default log filter directive.
const DEFAULT_LOG_DIRECTIVE: &str = "garden=info";

/// Errors reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },
    /// File is not valid TOML for this config.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },
}

/// Driver configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    /// Simulation parameters
    pub sim: SimConfig,
    /// Filter directive added to `RUST_LOG`
    pub log_directive: String,
    /// Print the final snapshot as JSON
    pub print_snapshot: bool,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            log_directive: DEFAULT_LOG_DIRECTIVE.to_string(),
            print_snapshot: true,
        }
    }
}

impl GardenConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            },
        }
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file is
    /// an error.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate();
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs_config_path() {
            config_dir.join("garden").join(CONFIG_FILE)
        } else {
            PathBuf::from(CONFIG_FILE)
        }
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.sim.validate();
        if self.log_directive.trim().is_empty() {
            self.log_directive = DEFAULT_LOG_DIRECTIVE.to_string();
        }
    }
}

/// Get platform-specific config directory.
fn dirs_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GardenConfig::default();
        assert_eq!(config.log_directive, "garden=info");
        assert!(config.print_snapshot);
        assert_eq!(config.sim.growth_delay_ms, 2_000);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("garden.toml");

        let mut config = GardenConfig::default();
        config.sim.seed = Some(12345);
        config.sim.auto_weather_interval_ms = Some(15_000);
        config.print_snapshot = false;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = GardenConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = GardenConfig::load_from("/nonexistent/path/garden.toml");
        assert_eq!(config, GardenConfig::default());
    }

    #[test]
    fn test_config_partial_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("garden.toml");
        fs::write(&config_path, "[sim]\ngrowth_delay_ms = 0\nseed = 7\n").expect("write");

        let config = GardenConfig::try_load_from(&config_path).expect("load");
        assert_eq!(config.sim.seed, Some(7));
        // Clamped by validation
        assert_eq!(config.sim.growth_delay_ms, 1);
        assert_eq!(config.sim.bee_tick_interval_ms, 500);
        assert_eq!(config.log_directive, "garden=info");
    }

    #[test]
    fn test_config_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("garden.toml");
        fs::write(&config_path, "sim = 3").expect("write");

        assert!(matches!(
            GardenConfig::try_load_from(&config_path),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(GardenConfig::load_from(&config_path), GardenConfig::default());
    }

    #[test]
    fn test_empty_log_directive_reset() {
        let mut config = GardenConfig {
            log_directive: "  ".to_string(),
            ..GardenConfig::default()
        };
        config.validate();
        assert_eq!(config.log_directive, "garden=info");
    }

    #[test]
    fn test_config_toml_serialization() {
        let config = GardenConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("log_directive"));
        assert!(toml_str.contains("[sim]"));
        assert!(toml_str.contains("growth_delay_ms"));
    }
}
