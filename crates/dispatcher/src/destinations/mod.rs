//! Destination implementations
//!
//! Contains ConsoleDestination, FileDestination and MemoryDestination.

mod console;
mod file;
pub mod format;
mod memory;
mod settings;

pub use self::console::{ConsoleDestination, ConsoleStream};
pub use self::file::FileDestination;
pub use self::format::LineFormat;
pub use self::memory::MemoryDestination;
pub use self::settings::DestinationSettings;
