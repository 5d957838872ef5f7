//! Backup scheduling core: schedule arithmetic, on-disk catalog scanning, the need/prune
//! decisions built on top of them, and the configuration surface that parameterises all of it.
//!
//! This crate does no archiving, compression, or process invocation of its own; it answers what
//! should happen, and leaves doing it to the caller.

pub mod backup_level;
pub mod backup_properties;
pub mod catalog;
pub mod decision;
pub mod error;
pub mod prune;
pub mod schedule;
pub mod settings;

pub use backup_level::{parse_level, BackupLevel};
pub use backup_properties::BackupProperties;
pub use catalog::{BackupCatalog, LevelFilter};
pub use decision::{BackupDecision, NeededBackup};
pub use error::{Error, Result};
pub use prune::prune_after;
pub use schedule::calculate_schedule;
pub use settings::{ConfigSource, Settings};
