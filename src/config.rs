use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No display name configured for satellite label {0:?}")]
    MissingDisplayName(String),
    #[error("No orbit offset configured for satellite {0:?}")]
    MissingOrbitOffset(String),
}

/// Which element sets to search and how to present them.
#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    /// Labels matched against element set name lines.
    pub satellites: Vec<String>,
    /// Label to display name.
    pub satellite_map: HashMap<String, String>,
    /// Display name to orbit-number offset.
    pub orbitoffset_map: HashMap<String, i64>,
}

impl SatelliteConfig {
    /// Read a JSON file, or YAML for any other extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    pub fn display_name(&self, label: &str) -> Result<&str, ConfigError> {
        self.satellite_map
            .get(label)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingDisplayName(label.to_string()))
    }

    pub fn orbit_offset(&self, display_name: &str) -> Result<i64, ConfigError> {
        self.orbitoffset_map
            .get(display_name)
            .copied()
            .ok_or_else(|| ConfigError::MissingOrbitOffset(display_name.to_string()))
    }

    /// Every label must resolve to a display name that has an offset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for label in &self.satellites {
            let name = self.display_name(label)?;
            self.orbit_offset(name)?;
        }
        Ok(())
    }
}
