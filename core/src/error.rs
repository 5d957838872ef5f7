//! Crate-wide error type.

use std::io;

/// Alias used throughout the crate in place of [std::result::Result].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can surface from any part of the backup scheduling core.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required option was missing (or empty while required) from a config section.
    #[error("section \"{section}\" is missing required option \"{option}\"")]
    MissingOption { section: String, option: String },

    /// A queried option isn't on the recognised-option whitelist.
    #[error("\"{0}\" is not a recognised option")]
    UnknownOption(String),

    /// An option's value couldn't be interpreted as the type it's supposed to hold.
    #[error("section \"{section}\" option \"{option}\" has an invalid value \"{value}\": {reason}")]
    InvalidValue {
        section: String,
        option: String,
        value: String,
        reason: String,
    },

    /// A [crate::BackupLevel] argument was out of range or otherwise nonsensical.
    #[error("invalid backup level: {0}")]
    LevelError(String),

    /// Reading or parsing the backup directory failed in a way that prevents a correct decision.
    #[error("failed reading backup directory: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// The underlying INI document couldn't be parsed, or the file couldn't be read at all.
    #[error("failed parsing configuration {path}: {reason}")]
    ConfigParse { path: String, reason: String },
}
