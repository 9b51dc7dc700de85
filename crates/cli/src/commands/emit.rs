//! `emit` command implementation.

use anyhow::{Context, Result};
use dispatcher::log_at;
use observability::{metrics as obs, DispatchMetricsAggregator};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::cli::EmitArgs;
use crate::error::CliError;

/// Execute the `emit` command
pub fn run_emit(args: &EmitArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");
    let blueprint = super::load_blueprint(&args.config)?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let log = dispatcher::create_dispatcher(&blueprint)
        .context("Failed to create destinations")?;
    obs::record_destination_count(log.count_destinations());

    if log.count_destinations() == 0 {
        warn!("No destinations configured, messages will be discarded");
    }

    let levels = args.levels();
    let mut aggregator = DispatchMetricsAggregator::new();
    let started = Instant::now();

    for i in 1..=args.count {
        for &level in &levels {
            log_at!(log, level, "{} [{}/{}]", args.message, i, args.count);
            obs::record_emitted(level);
            aggregator.record_emit();
        }
    }
    let emit_elapsed = started.elapsed();

    let timeout_secs = args.flush_timeout.unwrap_or(blueprint.flush_timeout_secs);
    let report = log.flush_report(Duration::from_secs(timeout_secs));
    obs::record_flush(&report);
    aggregator.update_flush(&report);

    let snapshots = log.metrics();
    for (id, snapshot) in &snapshots {
        obs::record_destination_metrics(id, snapshot);
    }
    aggregator.update_destinations(&snapshots);

    info!(
        emitted = aggregator.emitted,
        destinations = snapshots.len(),
        emit_ms = emit_elapsed.as_millis() as u64,
        flush_ms = report.elapsed.as_millis() as u64,
        complete = report.is_complete(),
        "Emit finished"
    );
    eprint!("{}", aggregator.summary());

    if !report.is_complete() {
        return Err(CliError::flush_incomplete(report.pending, timeout_secs).into());
    }
    Ok(())
}
