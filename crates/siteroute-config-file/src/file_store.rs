//! File-based site configuration loader

use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use siteroute_core::{Error, Result};

use crate::config::SiteConfig;

/// Site configuration stored in a YAML or TOML file
#[derive(Debug, Clone)]
pub struct FileSiteStore {
    /// Path to the configuration file
    config_path: PathBuf,
}

impl FileSiteStore {
    /// Create a store for an existing configuration file
    ///
    /// # Arguments
    /// * `config_path` - Path to the YAML or TOML file; a leading `~` is
    ///   expanded to the home directory
    ///
    /// # Errors
    /// - `Error::Config` if `~` is used and the home directory is unknown
    /// - `Error::ConfigNotFound` if the file doesn't exist
    pub fn new(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();

        // Expand tilde if present
        let config_path = match config_path.strip_prefix("~") {
            Ok(rest) => dirs::home_dir()
                .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?
                .join(rest),
            Err(_) => config_path,
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound);
        }

        info!("Initialized FileSiteStore for {:?}", config_path);

        Ok(Self { config_path })
    }

    /// Path of the configuration file
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Read, parse and validate the configuration file
    ///
    /// # Errors
    /// - `Error::Io` if the file can't be read
    /// - `Error::Config` if the file isn't valid YAML/TOML
    /// - `Error::ConfigValidation` if the content tree is inconsistent
    pub fn load(&self) -> Result<SiteConfig> {
        let contents = std::fs::read_to_string(&self.config_path).map_err(|e| {
            error!("Failed to read config file: {}", e);
            Error::Io(e)
        })?;

        // Determine format based on file extension
        let config: SiteConfig =
            if self.config_path.extension().and_then(|s| s.to_str()) == Some("toml") {
                toml::from_str(&contents).map_err(|e| {
                    error!("Failed to parse TOML config: {}", e);
                    Error::Config(format!("Invalid TOML: {}", e))
                })?
            } else {
                // Default to YAML
                serde_yaml::from_str(&contents).map_err(|e| {
                    error!("Failed to parse YAML config: {}", e);
                    Error::Config(format!("Invalid YAML: {}", e))
                })?
            };

        config.validate()?;

        debug!(
            nodes = config.nodes.len(),
            domains = config.domains.len(),
            "Loaded site configuration"
        );
        Ok(config)
    }
}
