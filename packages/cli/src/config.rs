//! TOML configuration for the `eco_map` binary.
//!
//! ```toml
//! [cluster]
//! reference_latitude = 37.4
//!
//! [[cluster.passes]]
//! radius_meters = 1000.0
//! same_category_only = true
//!
//! [unlock]
//! max_distance_meters = 500.0
//! ```
//!
//! Every table and key is optional; missing values keep their defaults.

use std::path::{Path, PathBuf};

use eco_map_progression_models::UnlockConfig;
use eco_map_spatial::ClusterConfig;
use serde::Deserialize;

/// Environment variable consulted when no `--config` flag is given.
pub const CONFIG_ENV_VAR: &str = "ECO_MAP_CONFIG";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the config file.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML or has the wrong shape.
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EcoMapConfig {
    pub cluster: ClusterConfig,
    pub unlock: UnlockConfig,
}

impl EcoMapConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document does not parse.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads config from `explicit`, else from `$ECO_MAP_CONFIG`, else
    /// returns defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config path was given but cannot be
    /// read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let Some(path) = path else {
            log::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        log::info!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(EcoMapConfig::parse("").unwrap(), EcoMapConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = EcoMapConfig::parse(
            r"
            [unlock]
            max_distance_meters = 250.0
            ",
        )
        .unwrap();

        assert!((config.unlock.max_distance_meters - 250.0).abs() < f64::EPSILON);
        assert_eq!(config.unlock.default_reward, 50);
        assert_eq!(config.cluster, ClusterConfig::default());
    }

    #[test]
    fn cluster_passes_replace_defaults() {
        let config = EcoMapConfig::parse(
            r"
            [[cluster.passes]]
            radius_meters = 50.0
            same_category_only = false
            ",
        )
        .unwrap();

        assert_eq!(config.cluster.passes.len(), 1);
        assert!((config.cluster.reference_latitude - 37.4).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            EcoMapConfig::parse("[unlock\nmax = "),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_io_error() {
        let result = EcoMapConfig::load(Some(Path::new("/nonexistent/eco_map.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn io_error_message_names_the_path() {
        let err = ConfigError::Io {
            path: PathBuf::from("/etc/eco_map.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "Failed to read config /etc/eco_map.toml: gone");
    }
}
