//! # Contracts
//!
//! Frozen interface contracts shared by every fanlog crate.
//! Business crates depend only on this crate, reverse dependencies are prohibited.
//!
//! ## Level model
//! - Five severities ordered `Verbose < Debug < Info < Warning < Error`
//! - Levels compare as integers (`Level as u8`)

mod blueprint;
mod destination;
mod error;
mod level;
mod record;

pub use blueprint::*;
pub use destination::*;
pub use error::*;
pub use level::Level;
pub use record::{CallSite, LogRecord};
