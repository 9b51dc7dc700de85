//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式。

use contracts::{ContractError, LoggerBlueprint};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<LoggerBlueprint, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<LoggerBlueprint, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<LoggerBlueprint, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DestinationType, FilterAction, FilterTarget, Level, MatchKind, QueueKind};

    #[test]
    fn test_parse_toml_defaults() {
        let content = r#"
[[destinations]]
name = "console"
destination_type = "console"
"#;
        let bp = parse_toml(content).unwrap();
        assert_eq!(bp.flush_timeout_secs, 5);
        assert_eq!(bp.destinations.len(), 1);

        let dest = &bp.destinations[0];
        assert_eq!(dest.destination_type, DestinationType::Console);
        assert_eq!(dest.min_level, Level::Verbose);
        assert!(dest.asynchronous);
        assert!(dest.enabled);
        assert_eq!(dest.queue, QueueKind::Serial);
        assert_eq!(dest.workers, 2);
        assert!(dest.filters.is_empty());
    }

    #[test]
    fn test_parse_toml_full_destination() {
        let content = r#"
flush_timeout_secs = 2

[[destinations]]
name = "audit"
destination_type = "file"
min_level = "warning"
asynchronous = false
queue = "concurrent"
workers = 4

[destinations.params]
path = "/var/log/audit.log"
format = "json"

[[destinations.filters]]
target = "path"
action = "exclude"
pattern = "tests/"

[[destinations.filters]]
target = "function"
action = "include"
pattern = "audit_"
matcher = "starts_with"
"#;
        let bp = parse_toml(content).unwrap();
        assert_eq!(bp.flush_timeout_secs, 2);

        let dest = &bp.destinations[0];
        assert_eq!(dest.min_level, Level::Warning);
        assert!(!dest.asynchronous);
        assert_eq!(dest.queue, QueueKind::Concurrent);
        assert_eq!(dest.workers, 4);
        assert_eq!(dest.param("path"), Some("/var/log/audit.log"));
        assert_eq!(dest.param("format"), Some("json"));
        assert_eq!(dest.filters.len(), 2);
        assert_eq!(dest.filters[0].target, FilterTarget::Path);
        assert_eq!(dest.filters[0].matcher, MatchKind::Contains);
        assert_eq!(dest.filters[1].action, FilterAction::Include);
        assert_eq!(dest.filters[1].matcher, MatchKind::StartsWith);
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "destinations": [
                { "name": "mem", "destination_type": "memory", "min_level": "error" }
            ]
        }"#;
        let bp = parse_json(content).unwrap();
        assert_eq!(bp.destinations[0].destination_type, DestinationType::Memory);
        assert_eq!(bp.destinations[0].min_level, Level::Error);
    }

    #[test]
    fn test_parse_unknown_level_fails() {
        let content = r#"
[[destinations]]
name = "console"
destination_type = "console"
min_level = "loud"
"#;
        let err = parse_toml(content).unwrap_err();
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_json("{ not json").is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
