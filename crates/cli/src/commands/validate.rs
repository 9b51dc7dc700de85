//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{LoggerBlueprint, QueueKind};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    flush_timeout_secs: u64,
    destination_count: usize,
    enabled_count: usize,
    filter_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{json}");
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    match super::load_blueprint(&args.config) {
        Ok(blueprint) => ValidationResult {
            valid: true,
            config_path,
            error: None,
            warnings: collect_warnings(&blueprint),
            summary: Some(ConfigSummary {
                version: format!("{:?}", blueprint.version),
                flush_timeout_secs: blueprint.flush_timeout_secs,
                destination_count: blueprint.destinations.len(),
                enabled_count: blueprint.enabled_destinations().count(),
                filter_count: blueprint.destinations.iter().map(|d| d.filters.len()).sum(),
            }),
        },
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("{e:#}")),
            warnings: Vec::new(),
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &LoggerBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.destinations.is_empty() {
        warnings.push("No destinations configured - log calls will be discarded".to_string());
    }

    if blueprint.flush_timeout_secs == 0 {
        warnings.push(
            "flush_timeout_secs is 0 - flush only succeeds when destinations are idle".to_string(),
        );
    }

    for dest in &blueprint.destinations {
        if !dest.enabled {
            warnings.push(format!(
                "Destination '{}' is disabled - it will not receive records",
                dest.name
            ));
        }
        if dest.queue == QueueKind::Concurrent && dest.workers > 1 {
            warnings.push(format!(
                "Destination '{}' uses {} concurrent workers - records may be written out of order",
                dest.name, dest.workers
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Flush timeout: {}s", summary.flush_timeout_secs);
            println!(
                "  Destinations: {} ({} enabled)",
                summary.destination_count, summary.enabled_count
            );
            println!("  Filter rules: {}", summary.filter_count);
        }

        if !result.warnings.is_empty() {
            println!("\n⚠ Warnings:");
            for warning in &result.warnings {
                println!("  - {warning}");
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {error}");
        }
    }
}
