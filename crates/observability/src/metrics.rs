//! 分发指标收集模块
//!
//! 基于 `MetricsSnapshot` 与 `FlushReport` 导出 destination 投递指标和 flush 耗时。

use std::collections::BTreeMap;

use contracts::Level;
use dispatcher::{FlushReport, MetricsSnapshot};
use metrics::{counter, gauge, histogram};

/// 导出单个 destination 的累计投递指标
///
/// 快照为累计值，因此使用 `absolute` 而不是 `increment`。
///
/// # Example
///
/// ```ignore
/// for (id, snapshot) in dispatcher.metrics() {
///     observability::metrics::record_destination_metrics(&id, &snapshot);
/// }
/// ```
pub fn record_destination_metrics(destination: &str, snapshot: &MetricsSnapshot) {
    let label = destination.to_string();

    counter!("fanlog_records_sent_total", "destination" => label.clone())
        .absolute(snapshot.sent_count);
    counter!("fanlog_records_failed_total", "destination" => label.clone())
        .absolute(snapshot.failure_count);
    counter!("fanlog_records_filtered_total", "destination" => label.clone())
        .absolute(snapshot.filtered_count);
    counter!("fanlog_records_dropped_total", "destination" => label.clone())
        .absolute(snapshot.dropped_count);
    counter!("fanlog_flushes_total", "destination" => label).absolute(snapshot.flush_count);
}

/// 记录一次 flush 结果
pub fn record_flush(report: &FlushReport) {
    let outcome = if report.is_complete() {
        "complete"
    } else {
        "timeout"
    };
    counter!("fanlog_flush_barriers_total", "outcome" => outcome).increment(1);
    histogram!("fanlog_flush_latency_ms").record(report.elapsed.as_secs_f64() * 1000.0);
    gauge!("fanlog_flush_pending_destinations").set(report.pending.len() as f64);

    for destination in &report.pending {
        counter!("fanlog_flush_pending_total", "destination" => destination.clone()).increment(1);
    }
}

/// 记录一次日志调用
pub fn record_emitted(level: Level) {
    counter!("fanlog_messages_emitted_total", "level" => level.as_str()).increment(1);
}

/// 记录当前注册的 destination 数量
pub fn record_destination_count(count: usize) {
    gauge!("fanlog_destinations_registered").set(count as f64);
}

/// 分发指标聚合器
///
/// 在内存中聚合 flush 耗时与各 destination 的最新快照，便于输出摘要。
#[derive(Debug, Clone, Default)]
pub struct DispatchMetricsAggregator {
    /// flush 次数
    pub total_flushes: u64,

    /// 超时的 flush 次数
    pub incomplete_flushes: u64,

    /// 已发出的日志调用数
    pub emitted: u64,

    /// flush 耗时统计 (毫秒)
    pub flush_latency: RunningStats,

    /// 各 destination 的最新快照
    pub destinations: BTreeMap<String, MetricsSnapshot>,
}

impl DispatchMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次日志调用
    pub fn record_emit(&mut self) {
        self.emitted += 1;
    }

    /// 累加一次 flush 结果
    pub fn update_flush(&mut self, report: &FlushReport) {
        self.total_flushes += 1;
        if !report.is_complete() {
            self.incomplete_flushes += 1;
        }
        self.flush_latency
            .push(report.elapsed.as_secs_f64() * 1000.0);
    }

    /// 用最新快照覆盖 destination 统计
    pub fn update_destinations<'a>(
        &mut self,
        snapshots: impl IntoIterator<Item = &'a (String, MetricsSnapshot)>,
    ) {
        for (id, snapshot) in snapshots {
            self.destinations.insert(id.clone(), *snapshot);
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        let totals = self
            .destinations
            .values()
            .fold(MetricsSnapshot::default(), |mut acc, s| {
                acc.sent_count += s.sent_count;
                acc.failure_count += s.failure_count;
                acc.filtered_count += s.filtered_count;
                acc.dropped_count += s.dropped_count;
                acc.flush_count += s.flush_count;
                acc
            });

        MetricsSummary {
            emitted: self.emitted,
            total_flushes: self.total_flushes,
            incomplete_flushes: self.incomplete_flushes,
            totals,
            flush_latency_ms: StatsSummary::from(&self.flush_latency),
            destinations: self.destinations.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub emitted: u64,
    pub total_flushes: u64,
    pub incomplete_flushes: u64,
    pub totals: MetricsSnapshot,
    pub flush_latency_ms: StatsSummary,
    pub destinations: BTreeMap<String, MetricsSnapshot>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Dispatch Summary ===")?;
        writeln!(f, "Messages emitted: {}", self.emitted)?;
        writeln!(
            f,
            "Records sent: {} (failed {}, filtered {}, dropped {})",
            self.totals.sent_count,
            self.totals.failure_count,
            self.totals.filtered_count,
            self.totals.dropped_count
        )?;
        writeln!(
            f,
            "Flushes: {} ({} incomplete)",
            self.total_flushes, self.incomplete_flushes
        )?;
        writeln!(f, "Flush latency (ms): {}", self.flush_latency_ms)?;

        if !self.destinations.is_empty() {
            writeln!(f, "Per destination:")?;
            for (id, s) in &self.destinations {
                writeln!(
                    f,
                    "  {id}: sent={} failed={} filtered={} dropped={} flushed={}",
                    s.sent_count, s.failure_count, s.filtered_count, s.dropped_count, s.flush_count
                )?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            return write!(f, "N/A");
        }
        write!(
            f,
            "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
            self.min, self.max, self.mean, self.std_dev, self.count
        )
    }
}

/// 在线统计 (Welford 算法)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        match self.count {
            0 | 1 => 0.0,
            n => self.m2 / (n - 1) as f64,
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn report(pending: &[&str], elapsed_ms: u64) -> FlushReport {
        FlushReport {
            completed: vec!["console".into()],
            pending: pending.iter().map(|s| s.to_string()).collect(),
            elapsed: Duration::from_millis(elapsed_ms),
        }
    }

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_counts_flushes() {
        let mut aggregator = DispatchMetricsAggregator::new();
        aggregator.update_flush(&report(&[], 4));
        aggregator.update_flush(&report(&["file"], 1000));

        let summary = aggregator.summary();
        assert_eq!(summary.total_flushes, 2);
        assert_eq!(summary.incomplete_flushes, 1);
        assert_eq!(summary.flush_latency_ms.count, 2);
        assert!((summary.flush_latency_ms.max - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_aggregator_totals_destinations() {
        let mut aggregator = DispatchMetricsAggregator::new();
        let snapshots = vec![
            (
                "a".to_string(),
                MetricsSnapshot {
                    sent_count: 3,
                    filtered_count: 1,
                    ..MetricsSnapshot::default()
                },
            ),
            (
                "b".to_string(),
                MetricsSnapshot {
                    sent_count: 2,
                    failure_count: 1,
                    ..MetricsSnapshot::default()
                },
            ),
        ];
        aggregator.update_destinations(&snapshots);
        aggregator.record_emit();

        let summary = aggregator.summary();
        assert_eq!(summary.emitted, 1);
        assert_eq!(summary.totals.sent_count, 5);
        assert_eq!(summary.totals.failure_count, 1);
        assert_eq!(summary.totals.filtered_count, 1);

        aggregator.reset();
        assert!(aggregator.destinations.is_empty());
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = DispatchMetricsAggregator::new();
        aggregator.update_destinations(&[(
            "console".to_string(),
            MetricsSnapshot {
                sent_count: 10,
                ..MetricsSnapshot::default()
            },
        )]);
        aggregator.update_flush(&report(&[], 12));

        let output = aggregator.summary().to_string();
        assert!(output.contains("Records sent: 10"));
        assert!(output.contains("console: sent=10"));
        assert!(output.contains("Flushes: 1 (0 incomplete)"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_destination_metrics("console", &MetricsSnapshot::default());
        record_flush(&report(&["file"], 5));
        record_emitted(Level::Info);
        record_destination_count(2);
    }
}
