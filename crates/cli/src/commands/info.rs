//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{DestinationConfig, FilterRule, LoggerBlueprint, QueueKind};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    flush_timeout_secs: u64,
    destinations: Vec<DestinationInfo>,
}

#[derive(Serialize)]
struct DestinationInfo {
    name: String,
    destination_type: String,
    min_level: String,
    mode: &'static str,
    queue: String,
    enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    filters: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    params: BTreeMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let blueprint = super::load_blueprint(&args.config)?;

    if args.json {
        let info = build_config_info(&blueprint);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{json}");
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn build_config_info(blueprint: &LoggerBlueprint) -> ConfigInfo {
    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        flush_timeout_secs: blueprint.flush_timeout_secs,
        destinations: blueprint.destinations.iter().map(describe).collect(),
    }
}

fn describe(dest: &DestinationConfig) -> DestinationInfo {
    DestinationInfo {
        name: dest.name.clone(),
        destination_type: format!("{:?}", dest.destination_type).to_lowercase(),
        min_level: dest.min_level.to_string(),
        mode: if dest.asynchronous { "async" } else { "sync" },
        queue: queue_label(dest),
        enabled: dest.enabled,
        filters: dest.filters.iter().map(rule_label).collect(),
        params: dest
            .params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    }
}

fn queue_label(dest: &DestinationConfig) -> String {
    match dest.queue {
        QueueKind::Serial => "serial".to_string(),
        QueueKind::Concurrent => format!("concurrent x{}", dest.workers),
    }
}

fn rule_label(rule: &FilterRule) -> String {
    let kind = format!("{:?} {:?} {:?}", rule.action, rule.target, rule.matcher).to_lowercase();
    format!("{kind} '{}'", rule.pattern)
}

fn print_config_info(blueprint: &LoggerBlueprint) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                    fanlog Configuration                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("⚙️  General");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   └─ Flush timeout: {}s", blueprint.flush_timeout_secs);

    println!("\n📤 Destinations ({})", blueprint.destinations.len());
    for (i, dest) in blueprint.destinations.iter().enumerate() {
        let info = describe(dest);
        let is_last = i == blueprint.destinations.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        let state = if info.enabled { "" } else { " [disabled]" };
        println!(
            "   {} {} ({}){}",
            prefix, info.name, info.destination_type, state
        );
        println!(
            "   {}  ├─ Level >= {}, {}, {} queue",
            child_prefix, info.min_level, info.mode, info.queue
        );
        for rule in &info.filters {
            println!("   {}  ├─ Filter: {}", child_prefix, rule);
        }
        if info.params.is_empty() {
            println!("   {}  └─ No params", child_prefix);
        } else {
            let params: Vec<String> = info
                .params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            println!("   {}  └─ Params: {}", child_prefix, params.join(", "));
        }
    }

    println!();
}
