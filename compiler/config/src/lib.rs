#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! wrapgen Configuration
//!
//! This crate provides configuration management for wrapgen. It handles
//! loading and saving the TOML file that specifies:
//! - Where generated wrapper files are written
//! - The output file suffix and service-unit routing
//! - Whether `wrapgen.wrap` opt-outs are honored
//!
//! Configuration is project-local: it lives next to the schema graph it
//! applies to and is passed to the pipeline explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the configuration file on disk
    #[error("failed to access config file: {0}")]
    FileAccess(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Output location settings
    pub output: OutputConfig,
    /// Generation behavior settings
    pub generation: GenerationConfig,
}

/// Output location configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory generated wrapper files are written under
    pub output_dir: PathBuf,
    /// Suffix appended to every generated file name (before the extension)
    pub file_suffix: String,
}

/// Generation behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Wrap every own-source file, ignoring `wrapgen.wrap` opt-outs
    pub wrap_all: bool,
    /// Route service declarations into their own output unit
    pub separate_service_unit: bool,
    /// Suffix of the service output unit (only used when separate)
    pub service_suffix: String,
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig {
                output_dir: PathBuf::from("generated"),
                file_suffix: String::new(),
            },
            generation: GenerationConfig {
                wrap_all: false,
                separate_service_unit: true,
                service_suffix: ".svc".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_from_file() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        let toml_content = r#"
            [output]
            output_dir = "out/wrappers"
            file_suffix = "_v2"

            [generation]
            wrap_all = true
            separate_service_unit = false
            service_suffix = ".svc"
        "#;
        fs::write(&temp_file, toml_content)
            .expect("Failed to write TOML content to temporary file");

        let loaded = Config::from_file(&temp_file).expect("Failed to load config");
        assert_eq!(loaded.output.output_dir, PathBuf::from("out/wrappers"));
        assert_eq!(loaded.output.file_suffix, "_v2");
        assert!(loaded.generation.wrap_all);
        assert!(!loaded.generation.separate_service_unit);

        // File not found error
        let result = Config::from_file("nonexistent_file.toml");
        match result.expect_err("Expected error for nonexistent file") {
            ConfigError::FileAccess(_) => {}
            other => panic!("Expected FileAccess error, got {:?}", other),
        }

        // Parse error
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        fs::write(&temp_file, "invalid toml content").expect("Failed to write invalid TOML");
        match Config::from_file(&temp_file).expect_err("Expected parse error") {
            ConfigError::Parse(_) => {}
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_save_round_trip() {
        let config = Config::default();
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");

        config.save(&temp_file).expect("Failed to save config");

        let loaded = Config::from_file(&temp_file).expect("Failed to reload saved config");
        assert_eq!(loaded.output.output_dir, config.output.output_dir);
        assert_eq!(loaded.generation.service_suffix, config.generation.service_suffix);
    }

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.output.output_dir, PathBuf::from("generated"));
        assert_eq!(config.output.file_suffix, "");
        assert!(!config.generation.wrap_all);
        assert!(config.generation.separate_service_unit);
        assert_eq!(config.generation.service_suffix, ".svc");
    }
}
