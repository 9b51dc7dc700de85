//! 配置校验模块
//!
//! 校验规则：
//! - destination 名称非空且唯一
//! - 字段约束 (workers 范围等，由 `Validate` derive 提供)
//! - file 类型必须提供 path
//! - stream / format 参数取值合法
//! - 过滤规则 pattern 非空

use std::collections::HashSet;

use ::validator::Validate;
use contracts::{ContractError, DestinationConfig, DestinationType, LoggerBlueprint};

const STREAMS: &[&str] = &["stdout", "stderr"];
const FORMATS: &[&str] = &["text", "json"];

/// 校验 LoggerBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &LoggerBlueprint) -> Result<(), ContractError> {
    validate_names(blueprint)?;
    for (idx, dest) in blueprint.destinations.iter().enumerate() {
        validate_fields(idx, dest)?;
        validate_params(idx, dest)?;
        validate_filters(idx, dest)?;
    }
    Ok(())
}

/// 校验 destination 名称唯一性
fn validate_names(blueprint: &LoggerBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for dest in &blueprint.destinations {
        if !seen.insert(dest.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("destinations[name={}]", dest.name),
                "duplicate destination name",
            ));
        }
    }
    Ok(())
}

/// 校验 derive 声明的字段约束
fn validate_fields(idx: usize, dest: &DestinationConfig) -> Result<(), ContractError> {
    let Err(errors) = dest.validate() else {
        return Ok(());
    };

    // 只报告第一个字段
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    let Some((field, field_errors)) = fields.into_iter().next() else {
        return Err(ContractError::config_validation(
            format!("destinations[{idx}]"),
            errors.to_string(),
        ));
    };

    let message = field_errors
        .iter()
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| format!("invalid value for '{field}'"));
    Err(ContractError::config_validation(
        format!("destinations[{idx}].{field}"),
        message,
    ))
}

/// 校验类型特定参数
fn validate_params(idx: usize, dest: &DestinationConfig) -> Result<(), ContractError> {
    if dest.destination_type == DestinationType::File
        && dest.param("path").map_or(true, |p| p.trim().is_empty())
    {
        return Err(ContractError::config_validation(
            format!("destinations[{idx}].params.path"),
            "file destination requires a non-empty path",
        ));
    }

    if let Some(stream) = dest.param("stream") {
        if !STREAMS.contains(&stream.to_lowercase().as_str()) {
            return Err(ContractError::config_validation(
                format!("destinations[{idx}].params.stream"),
                format!("unknown stream '{stream}', expected one of {STREAMS:?}"),
            ));
        }
    }

    if let Some(format) = dest.param("format") {
        if !FORMATS.contains(&format.to_lowercase().as_str()) {
            return Err(ContractError::config_validation(
                format!("destinations[{idx}].params.format"),
                format!("unknown format '{format}', expected one of {FORMATS:?}"),
            ));
        }
    }

    if let Some(capacity) = dest.param("capacity") {
        if capacity.parse::<usize>().is_err() {
            return Err(ContractError::config_validation(
                format!("destinations[{idx}].params.capacity"),
                format!("capacity must be a non-negative integer, got '{capacity}'"),
            ));
        }
    }

    Ok(())
}

/// 校验过滤规则
fn validate_filters(idx: usize, dest: &DestinationConfig) -> Result<(), ContractError> {
    for (rule_idx, rule) in dest.filters.iter().enumerate() {
        if rule.pattern.is_empty() {
            return Err(ContractError::config_validation(
                format!("destinations[{idx}].filters[{rule_idx}].pattern"),
                "filter pattern cannot be empty",
            ));
        }
    }
    Ok(())
}
