//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate destination definitions
//! - Generate `LoggerBlueprint`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("fanlog.toml")).unwrap();
//! println!("Destinations: {}", blueprint.destinations.len());
//! ```

mod parser;
mod validator;

pub use contracts::LoggerBlueprint;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<LoggerBlueprint, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<LoggerBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Validate an already-built blueprint
    pub fn validate(blueprint: &LoggerBlueprint) -> Result<(), ContractError> {
        validator::validate(blueprint)
    }

    /// Serialize LoggerBlueprint to TOML string
    pub fn to_toml(blueprint: &LoggerBlueprint) -> Result<String, ContractError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize LoggerBlueprint to JSON string
    pub fn to_json(blueprint: &LoggerBlueprint) -> Result<String, ContractError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DestinationType, Level};

    const SAMPLE_TOML: &str = r#"
flush_timeout_secs = 3

[[destinations]]
name = "console"
destination_type = "console"
min_level = "info"

[destinations.params]
stream = "stderr"

[[destinations]]
name = "memory"
destination_type = "memory"
asynchronous = false

[destinations.params]
capacity = "100"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let bp = ConfigLoader::load_from_str(SAMPLE_TOML, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.flush_timeout_secs, 3);
        assert_eq!(bp.destinations.len(), 2);
        assert_eq!(bp.destinations[0].min_level, Level::Info);
        assert_eq!(bp.destinations[1].destination_type, DestinationType::Memory);
    }

    #[test]
    fn test_toml_survives_serialization() {
        let bp = ConfigLoader::load_from_str(SAMPLE_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(bp2.destinations.len(), 2);
        assert_eq!(bp2.destinations[0].param("stream"), Some("stderr"));
        assert!(!bp2.destinations[1].asynchronous);
    }

    #[test]
    fn test_json_export_loads() {
        let bp = ConfigLoader::load_from_str(SAMPLE_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(bp2.flush_timeout_secs, 3);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[[destinations]]
name = "dup"
destination_type = "console"

[[destinations]]
name = "dup"
destination_type = "memory"
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ConfigLoader::load_from_path(Path::new("fanlog.yaml")).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::load_from_path(Path::new("/nonexistent/fanlog.toml"));
        assert!(matches!(err, Err(ContractError::Io(_))));
    }
}
