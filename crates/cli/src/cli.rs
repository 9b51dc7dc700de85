//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::Level;
use std::path::PathBuf;

/// fanlog - leveled logging dispatcher with pluggable destinations
#[derive(Parser, Debug)]
#[command(
    name = "fanlog",
    author,
    version,
    about = "Leveled logging dispatcher with pluggable destinations",
    long_about = "Loads a destination configuration, fans log calls out to every \n\
                  destination that accepts them and waits on a flush barrier."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "FANLOG_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Diagnostic log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "FANLOG_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default diagnostic filter derived from -v / -q
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration file
    Validate(ValidateArgs),

    /// Display configured destinations
    Info(InfoArgs),

    /// Build a dispatcher from configuration, emit messages and flush
    Emit(EmitArgs),
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "fanlog.toml", env = "FANLOG_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "fanlog.toml", env = "FANLOG_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `emit` command
#[derive(Parser, Debug, Clone)]
pub struct EmitArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "fanlog.toml", env = "FANLOG_CONFIG")]
    pub config: PathBuf,

    /// Level of the emitted messages
    #[arg(long, default_value = "info", conflicts_with = "all_levels")]
    pub level: Level,

    /// Emit every message once per level, lowest first
    #[arg(long)]
    pub all_levels: bool,

    /// Number of messages to emit
    #[arg(long, default_value = "1")]
    pub count: u32,

    /// Message text
    #[arg(short, long, default_value = "hello from fanlog")]
    pub message: String,

    /// Flush timeout in seconds (defaults to the configured value)
    #[arg(long, env = "FANLOG_FLUSH_TIMEOUT")]
    pub flush_timeout: Option<u64>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "FANLOG_METRICS_PORT")]
    pub metrics_port: u16,
}

impl EmitArgs {
    /// Levels to emit for each message
    pub fn levels(&self) -> Vec<Level> {
        if self.all_levels {
            Level::ALL.to_vec()
        } else {
            vec![self.level]
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_emit_defaults() {
        let cli = Cli::try_parse_from(["fanlog", "emit", "-c", "app.toml"]).unwrap();
        let Commands::Emit(args) = cli.command else {
            panic!("expected emit");
        };
        assert_eq!(args.config, PathBuf::from("app.toml"));
        assert_eq!(args.levels(), vec![Level::Info]);
        assert_eq!(args.count, 1);
        assert_eq!(args.metrics_port, 0);
    }

    #[test]
    fn test_parse_emit_all_levels() {
        let cli = Cli::try_parse_from(["fanlog", "emit", "--all-levels", "--count", "3"]).unwrap();
        let Commands::Emit(args) = cli.command else {
            panic!("expected emit");
        };
        assert_eq!(args.levels(), Level::ALL.to_vec());
        assert_eq!(args.count, 3);
    }

    #[test]
    fn test_level_conflicts_with_all_levels() {
        let result = Cli::try_parse_from(["fanlog", "emit", "--level", "error", "--all-levels"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_maps_to_filter() {
        let cli = Cli::try_parse_from(["fanlog", "-vv", "info"]).unwrap();
        assert_eq!(cli.default_log_level(), "trace");

        let cli = Cli::try_parse_from(["fanlog", "-q", "validate"]).unwrap();
        assert_eq!(cli.default_log_level(), "error");
    }
}
