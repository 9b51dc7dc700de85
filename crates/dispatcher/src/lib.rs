//! # Dispatcher
//!
//! 日志分发模块。
//!
//! 负责：
//! - 管理动态的 destination 集合（增删、快照读取）
//! - 按级别和调用点过滤，只在有 destination 接受时才构造消息
//! - 异步 destination 入队即返回，同步 destination 等待写入完成
//! - flush 屏障：带超时等待所有 destination 确认
//!
//! ```
//! use dispatcher::{log_info, Dispatcher, MemoryDestination};
//! use std::sync::Arc;
//!
//! let log = Dispatcher::new();
//! let memory = Arc::new(MemoryDestination::new("mem").unwrap());
//! log.add_destination(memory.clone());
//!
//! log_info!(log, "started with {} workers", 4);
//! assert!(log.flush(1));
//! assert_eq!(memory.messages(), vec!["started with 4 workers"]);
//! ```

pub mod callsite;
pub mod destinations;
pub mod dispatcher;
pub mod error;
pub mod factory;
pub mod filter;
pub mod latch;
mod macros;
pub mod metrics;
pub mod queue;
pub mod registry;
pub mod thread;

pub use callsite::strip_params;
pub use contracts::{
    CallSite, Destination, DestinationConfig, ExecutionQueue, FilterRule, Job, Level,
    LogRecord, LoggerBlueprint,
};
pub use destinations::{
    ConsoleDestination, ConsoleStream, DestinationSettings, FileDestination, LineFormat,
    MemoryDestination,
};
pub use dispatcher::{Dispatcher, FlushReport};
pub use error::DispatcherError;
pub use factory::{create_destination, create_dispatcher, install_destinations};
pub use filter::LevelFilter;
pub use latch::{CountdownLatch, LatchGuard};
pub use metrics::{DestinationMetrics, MetricsSnapshot};
pub use queue::DispatchQueue;
pub use registry::{DestinationRegistry, RegisteredDestination, RegistrySnapshot};
pub use thread::{CurrentThread, ThreadDescriber};
