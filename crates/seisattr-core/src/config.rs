//! # Configuration
//!
//! YAML configuration for the attribute engine:
//!
//! - Operator settings (radii, boundary policy, precision, units)
//! - Driver settings (chunking, workers, memory budget, timeout)
//! - Logging
//! - Named operator profiles
//!
//! Nothing here runs implicitly. [`EngineConfig::discover`] is the only entry
//! point that looks at the environment or the filesystem, and callers opt in
//! to it.
//!
//! ## Search Path
//!
//! [`EngineConfig::discover`] loads the first file found:
//! 1. Path in the `SEISATTR_CONFIG` environment variable
//! 2. `./seisattr.yaml`
//! 3. `<user config dir>/seisattr/config.yaml`
//!
//! ## Example Configuration
//!
//! ```yaml
//! operator:
//!   kernel_radius: 2
//!   hilbert_radius: 16
//!   boundary: edge-replicate
//!   precision: single
//!
//! driver:
//!   workers: 4
//!   memory_budget_bytes: 536870912
//!
//! logging:
//!   level: debug
//!   format: json
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::driver::DriverConfig;
use crate::observe::LogConfig;
use crate::operators::OperatorConfig;
use crate::window::BoundaryPolicy;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "SEISATTR_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(String),

    #[error("failed to read config: {0}")]
    ReadError(String),

    #[error("failed to write config: {0}")]
    WriteError(String),

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Configuration version
    pub version: String,
    /// Operator settings
    pub operator: OperatorConfig,
    /// Cube driver settings
    pub driver: DriverConfig,
    /// Logging settings
    pub logging: LogConfig,
    /// Take the sample interval from cube metadata when the operator has none
    pub physical_units: bool,
    /// Named operator presets (name -> settings)
    pub profiles: HashMap<String, OperatorConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            operator: OperatorConfig::default(),
            driver: DriverConfig::default(),
            logging: LogConfig::default(),
            physical_units: true,
            profiles: HashMap::new(),
        }
    }
}

impl EngineConfig {
    /// Load from the search path, or defaults if no file exists.
    ///
    /// An explicit `SEISATTR_CONFIG` that points nowhere is an error.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(format!(
                    "{CONFIG_ENV_VAR}={}",
                    path.display()
                )));
            }
            return Self::load_from(&path);
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading engine config");
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load and validate configuration from a file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string; missing keys take defaults.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::WriteError(format!("{}: {}", path.display(), e)))
    }

    /// Replace the operator settings with a named profile.
    pub fn with_profile(&self, name: &str) -> Result<Self, ConfigError> {
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::NotFound(format!("profile '{}' not found", name)))?;

        let mut config = self.clone();
        config.operator = profile.clone();
        Ok(config)
    }

    /// Candidate files after `SEISATTR_CONFIG`, in search order.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./seisattr.yaml")];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "seisattr") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }
        paths
    }

    /// Check every section and profile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.operator
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("operator: {e}")))?;
        self.driver
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("driver: {e}")))?;
        for (name, profile) in &self.profiles {
            profile
                .validate()
                .map_err(|e| ConfigError::ValidationError(format!("profile '{name}': {e}")))?;
        }
        Ok(())
    }

    /// Example configuration with a couple of profiles.
    pub fn example_yaml() -> String {
        let mut profiles = HashMap::new();
        profiles.insert(
            "broadband".to_string(),
            OperatorConfig::default()
                .with_hilbert_radius(32)
                .with_boundary(BoundaryPolicy::Reflect),
        );
        profiles.insert(
            "high-order-derivative".to_string(),
            OperatorConfig::default()
                .with_kernel_radius(3)
                .with_boundary(BoundaryPolicy::EdgeReplicate),
        );
        let config = Self {
            profiles,
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}
