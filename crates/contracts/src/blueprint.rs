//! LoggerBlueprint - Config Loader 输出
//!
//! 描述完整的日志配置：输出目标、级别阈值、队列模式、过滤规则。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::Level;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的日志配置蓝图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// flush 默认超时 (秒)
    #[serde(default = "default_flush_timeout_secs")]
    pub flush_timeout_secs: u64,

    /// 输出目标列表
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,
}

fn default_flush_timeout_secs() -> u64 {
    5
}

impl Default for LoggerBlueprint {
    fn default() -> Self {
        Self {
            version: ConfigVersion::V1,
            flush_timeout_secs: default_flush_timeout_secs(),
            destinations: Vec::new(),
        }
    }
}

impl LoggerBlueprint {
    /// 按名称查找输出目标
    pub fn destination(&self, name: &str) -> Option<&DestinationConfig> {
        self.destinations.iter().find(|d| d.name == name)
    }

    /// 启用的输出目标
    pub fn enabled_destinations(&self) -> impl Iterator<Item = &DestinationConfig> {
        self.destinations.iter().filter(|d| d.enabled)
    }
}

/// 输出目标配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DestinationConfig {
    /// 唯一名称 (即 destination identity)
    #[validate(length(min = 1, message = "destination name cannot be empty"))]
    pub name: String,

    /// 输出目标类型
    pub destination_type: DestinationType,

    /// 最低级别
    #[serde(default)]
    pub min_level: Level,

    /// 异步投递 (false = 调用方等待 send 完成)
    #[serde(default = "default_true")]
    pub asynchronous: bool,

    /// 是否创建执行队列 (false = 保留但不投递)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 队列模式
    #[serde(default)]
    pub queue: QueueKind,

    /// 并发队列的 worker 数
    #[serde(default = "default_workers")]
    #[validate(range(min = 1, max = 64, message = "workers must be within 1..=64"))]
    pub workers: usize,

    /// 路径/函数过滤规则
    #[serde(default)]
    pub filters: Vec<FilterRule>,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}

fn default_workers() -> usize {
    2
}

impl DestinationConfig {
    /// 使用默认值创建配置
    pub fn new(name: impl Into<String>, destination_type: DestinationType) -> Self {
        Self {
            name: name.into(),
            destination_type,
            min_level: Level::default(),
            asynchronous: true,
            enabled: true,
            queue: QueueKind::default(),
            workers: default_workers(),
            filters: Vec::new(),
            params: HashMap::new(),
        }
    }

    /// 读取类型特定参数
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// 输出目标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationType {
    /// 标准输出 / 标准错误
    Console,
    /// 文件输出
    File,
    /// 内存缓存
    Memory,
}

/// 执行队列模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    /// 单 worker，按提交顺序执行
    #[default]
    Serial,
    /// worker 池，并发执行
    Concurrent,
}

/// 过滤规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    /// 匹配对象
    pub target: FilterTarget,

    /// 命中后的动作
    pub action: FilterAction,

    /// 匹配模式
    pub pattern: String,

    /// 匹配方式
    #[serde(default)]
    pub matcher: MatchKind,
}

impl FilterRule {
    /// 排除路径包含 `pattern` 的调用
    pub fn exclude_path(pattern: impl Into<String>) -> Self {
        Self {
            target: FilterTarget::Path,
            action: FilterAction::Exclude,
            pattern: pattern.into(),
            matcher: MatchKind::Contains,
        }
    }

    /// 只接受路径包含 `pattern` 的调用
    pub fn include_path(pattern: impl Into<String>) -> Self {
        Self {
            target: FilterTarget::Path,
            action: FilterAction::Include,
            pattern: pattern.into(),
            matcher: MatchKind::Contains,
        }
    }

    /// 排除函数名包含 `pattern` 的调用
    pub fn exclude_function(pattern: impl Into<String>) -> Self {
        Self {
            target: FilterTarget::Function,
            action: FilterAction::Exclude,
            pattern: pattern.into(),
            matcher: MatchKind::Contains,
        }
    }

    /// 只接受函数名包含 `pattern` 的调用
    pub fn include_function(pattern: impl Into<String>) -> Self {
        Self {
            target: FilterTarget::Function,
            action: FilterAction::Include,
            pattern: pattern.into(),
            matcher: MatchKind::Contains,
        }
    }

    /// 替换匹配方式
    pub fn with_matcher(mut self, matcher: MatchKind) -> Self {
        self.matcher = matcher;
        self
    }
}

/// 规则匹配对象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterTarget {
    Path,
    Function,
}

/// 规则动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterAction {
    Include,
    Exclude,
}

/// 字符串匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    #[default]
    Contains,
    StartsWith,
    EndsWith,
    Equals,
}

impl MatchKind {
    /// 判断 `value` 是否命中 `pattern`
    pub fn matches(self, value: &str, pattern: &str) -> bool {
        match self {
            MatchKind::Contains => value.contains(pattern),
            MatchKind::StartsWith => value.starts_with(pattern),
            MatchKind::EndsWith => value.ends_with(pattern),
            MatchKind::Equals => value == pattern,
        }
    }
}
