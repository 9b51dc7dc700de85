//! # fanlog CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - destination 信息展示
//! - 按配置构建 dispatcher、发送日志并等待 flush

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use cli::{Cli, Commands};
use commands::{run_emit, run_info, run_validate};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(observability::ObservabilityConfig::tracing_only(
        cli.log_format.into(),
        cli.default_log_level(),
    ))?;

    debug!(version = env!("CARGO_PKG_VERSION"), "fanlog CLI starting");

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
        Commands::Emit(args) => run_emit(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}
