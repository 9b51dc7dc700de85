//! Logging macros
//!
//! Each macro captures the call site and wraps its `format!` arguments in a
//! closure, so the message is only built when a destination accepts it.
//!
//! ```
//! use dispatcher::{log_info, Dispatcher};
//!
//! let log = Dispatcher::new();
//! let user = "ada";
//! log_info!(log, "user {} logged in", user);
//! ```

/// Log at an explicit level
#[macro_export]
macro_rules! log_at {
    ($dispatcher:expr, $level:expr, $($arg:tt)+) => {
        $dispatcher.log($level, || ::std::format!($($arg)+), $crate::call_site!())
    };
}

/// Log something generally unimportant (lowest priority)
#[macro_export]
macro_rules! log_verbose {
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log_at!($dispatcher, $crate::Level::Verbose, $($arg)+)
    };
}

/// Log something which helps during debugging
#[macro_export]
macro_rules! log_debug {
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log_at!($dispatcher, $crate::Level::Debug, $($arg)+)
    };
}

/// Log something interesting that is not an issue
#[macro_export]
macro_rules! log_info {
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log_at!($dispatcher, $crate::Level::Info, $($arg)+)
    };
}

/// Log something which may cause trouble soon
#[macro_export]
macro_rules! log_warning {
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log_at!($dispatcher, $crate::Level::Warning, $($arg)+)
    };
}

/// Log a failure (highest priority)
#[macro_export]
macro_rules! log_error {
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log_at!($dispatcher, $crate::Level::Error, $($arg)+)
    };
}
