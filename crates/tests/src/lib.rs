//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 -> dispatcher -> destination 全链路
//! - 并发、flush 超时、重入场景

#[cfg(test)]
mod contract_tests {
    use contracts::Level;

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_level_order_is_frozen() {
        let values: Vec<u8> = Level::ALL.iter().map(|l| l.as_u8()).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 4]);
        assert!(Level::Verbose < Level::Error);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, Weak};
    use std::thread;
    use std::time::{Duration, Instant};

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ContractError, Destination, ExecutionQueue, Level, LogRecord};
    use dispatcher::{
        create_dispatcher, log_error, log_info, log_warning, CallSite, DispatchQueue, Dispatcher,
        MemoryDestination,
    };
    use observability::DispatchMetricsAggregator;
    use tempfile::tempdir;

    const SITE: CallSite<'static> = CallSite::new("src/app/server.rs", "serve(conn:)", 10);

    /// Destination whose flush outlives any reasonable timeout
    struct SlowFlush {
        queue: DispatchQueue,
        delay: Duration,
    }

    impl Destination for SlowFlush {
        fn id(&self) -> &str {
            "slow"
        }

        fn min_level(&self) -> Level {
            Level::Verbose
        }

        fn queue(&self) -> Option<&dyn ExecutionQueue> {
            Some(&self.queue)
        }

        fn send(&self, _record: &LogRecord) -> Result<(), ContractError> {
            Ok(())
        }

        fn flush(&self) -> Result<(), ContractError> {
            thread::sleep(self.delay);
            Ok(())
        }
    }

    /// Sync destination that flushes the dispatcher from inside its own send
    struct Reentrant {
        queue: DispatchQueue,
        owner: Mutex<Weak<Dispatcher>>,
        flushed: AtomicBool,
    }

    impl Destination for Reentrant {
        fn id(&self) -> &str {
            "reentrant"
        }

        fn min_level(&self) -> Level {
            Level::Error
        }

        fn queue(&self) -> Option<&dyn ExecutionQueue> {
            Some(&self.queue)
        }

        fn is_async(&self) -> bool {
            false
        }

        fn send(&self, _record: &LogRecord) -> Result<(), ContractError> {
            let owner = self.owner.lock().unwrap().upgrade();
            if let Some(owner) = owner {
                self.flushed.store(owner.flush(2), Ordering::SeqCst);
            }
            Ok(())
        }
    }

    /// Config file -> ConfigLoader -> create_dispatcher -> destinations
    #[test]
    fn test_e2e_config_to_destinations() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("logs").join("app.log");
        let config = format!(
            r#"
flush_timeout_secs = 5

[[destinations]]
name = "file"
destination_type = "file"
min_level = "info"

[destinations.params]
path = "{}"

[[destinations.filters]]
target = "path"
action = "exclude"
pattern = "vendor/"

[[destinations]]
name = "audit"
destination_type = "memory"
min_level = "warning"
asynchronous = false
"#,
            log_path.display().to_string().replace('\\', "/")
        );
        let config_path = dir.path().join("fanlog.toml");
        fs::write(&config_path, config).unwrap();

        let blueprint = ConfigLoader::load_from_path(&config_path).unwrap();
        let log = create_dispatcher(&blueprint).unwrap();
        assert_eq!(log.destination_ids(), vec!["audit", "file"]);

        log.debug(|| "dropped everywhere", SITE);
        log.info(|| "file only", SITE);
        log.error(|| "everywhere", SITE);
        log.error(|| "vendored", CallSite::new("vendor/lib.rs", "f", 1));

        assert!(log.flush(blueprint.flush_timeout_secs));

        let content = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("server.serve():10 - file only"));
        assert!(lines[1].contains("ERROR"));

        let metrics = log.metrics();
        let (id, audit) = &metrics[0];
        assert_eq!(id, "audit");
        assert_eq!(audit.sent_count, 2);
        assert_eq!(audit.filtered_count, 2);

        let (_, file) = &metrics[1];
        assert_eq!(file.sent_count, 2);
        assert_eq!(file.filtered_count, 2);
    }

    #[test]
    fn test_e2e_macros_with_memory_destination() {
        let log = Dispatcher::new();
        let memory = Arc::new(MemoryDestination::new("mem").unwrap());
        log.add_destination(memory.clone());

        log_info!(log, "request {} accepted", 17);
        log_warning!(log, "slow response: {}ms", 950);
        log_error!(log, "connection reset");
        assert!(log.flush(5));

        let records = memory.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].message, "request 17 accepted");
        assert_eq!(records[2].level, Level::Error);
        assert!(records
            .iter()
            .all(|r| r.function.ends_with("test_e2e_macros_with_memory_destination()")));
        assert!(records.iter().all(|r| r.path.ends_with("lib.rs")));
    }

    #[test]
    fn test_e2e_concurrent_callers_and_registry_changes() {
        let log = Arc::new(Dispatcher::new());
        let stable = Arc::new(MemoryDestination::new("stable").unwrap());
        log.add_destination(stable.clone());

        let built = Arc::new(AtomicUsize::new(0));
        let callers: Vec<_> = (0..8)
            .map(|t| {
                let log = Arc::clone(&log);
                let built = Arc::clone(&built);
                thread::spawn(move || {
                    for i in 0..50 {
                        log.info(
                            || {
                                built.fetch_add(1, Ordering::SeqCst);
                                format!("{t}:{i}")
                            },
                            SITE,
                        );
                    }
                })
            })
            .collect();

        // Churn the registry while callers are running
        let churn = {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for round in 0..20 {
                    let extra = Arc::new(MemoryDestination::new(format!("extra-{round}")).unwrap());
                    log.add_destination(extra.clone());
                    log.remove_destination(extra.as_ref());
                }
            })
        };

        for caller in callers {
            caller.join().unwrap();
        }
        churn.join().unwrap();

        assert!(log.flush(5));
        assert_eq!(stable.len(), 400);
        assert_eq!(built.load(Ordering::SeqCst), 400);
        assert_eq!(log.count_destinations(), 1);
    }

    #[test]
    fn test_e2e_flush_timeout_reports_pending() {
        let log = Dispatcher::new();
        let memory = Arc::new(MemoryDestination::new("fast").unwrap());
        log.add_destination(memory.clone());
        log.add_destination(Arc::new(SlowFlush {
            queue: DispatchQueue::serial("slow").unwrap(),
            delay: Duration::from_secs(4),
        }));

        log.info(|| "before flush", SITE);

        let started = Instant::now();
        let report = log.flush_report(Duration::from_secs(1));
        let elapsed = started.elapsed();

        assert!(!report.is_complete());
        assert_eq!(report.pending, vec!["slow"]);
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_secs(3));
        assert_eq!(memory.messages(), vec!["before flush"]);

        let mut aggregator = DispatchMetricsAggregator::new();
        aggregator.update_flush(&report);
        assert_eq!(aggregator.summary().incomplete_flushes, 1);
    }

    #[test]
    fn test_e2e_flush_from_inside_destination() {
        let log = Arc::new(Dispatcher::new());
        let reentrant = Arc::new(Reentrant {
            queue: DispatchQueue::serial("reentrant").unwrap(),
            owner: Mutex::new(Arc::downgrade(&log)),
            flushed: AtomicBool::new(false),
        });
        let memory = Arc::new(MemoryDestination::new("mem").unwrap());
        log.add_destination(reentrant.clone());
        log.add_destination(memory.clone());

        log.error(|| "trigger", SITE);

        assert!(reentrant.flushed.load(Ordering::SeqCst));
        assert!(log.flush(5));
        assert_eq!(memory.messages(), vec!["trigger"]);
    }

    #[test]
    fn test_e2e_config_from_json_string() {
        let json = r#"{
            "destinations": [
                { "name": "ring", "destination_type": "memory", "params": { "capacity": "2" } }
            ]
        }"#;
        let blueprint = ConfigLoader::load_from_str(json, ConfigFormat::Json).unwrap();
        let log = create_dispatcher(&blueprint).unwrap();

        for i in 0..5 {
            log.verbose(|| i, SITE);
        }
        assert!(log.flush(5));
        assert_eq!(log.metrics()[0].1.sent_count, 5);
    }

    /// Logging from async tasks must not touch the runtime's blocking rules
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_e2e_logging_from_async_tasks() {
        let log = Arc::new(Dispatcher::new());
        let memory = Arc::new(MemoryDestination::new("mem").unwrap());
        log.add_destination(memory.clone());

        let tasks: Vec<_> = (0..4)
            .map(|t| {
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    for i in 0..10 {
                        log.info(|| format!("task {t} line {i}"), SITE);
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let flushed = tokio::task::spawn_blocking({
            let log = Arc::clone(&log);
            move || log.flush(5)
        })
        .await
        .unwrap();

        assert!(flushed);
        assert_eq!(memory.len(), 40);
    }
}
