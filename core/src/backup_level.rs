//! Contains the closed [BackupLevel] enum and the generality ordering between levels.

use crate::error::Error;

/// One of the three backup levels this crate schedules and tracks.
///
/// Levels are ordered by *generality*: [BackupLevel::Full] is the most general, followed by
/// [BackupLevel::Diff], followed by [BackupLevel::Incr]. `Full > Diff > Incr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BackupLevel {
    /// Self-contained backup; everything else references one.
    Incr,
    /// Delta from the last Full backup.
    Diff,
    /// Delta from the last backup of any level.
    Full,
}

impl BackupLevel {
    /// The fixed three-letter suffix used in on-disk directory names.
    pub const fn suffix(self) -> &'static str {
        match self {
            BackupLevel::Full => "full",
            BackupLevel::Diff => "diff",
            BackupLevel::Incr => "incr",
        }
    }

    /// Parses a level from its on-disk suffix. Returns [None] for anything else.
    pub fn from_suffix(suffix: &str) -> Option<BackupLevel> {
        match suffix {
            "full" => Some(BackupLevel::Full),
            "diff" => Some(BackupLevel::Diff),
            "incr" => Some(BackupLevel::Incr),
            _ => None,
        }
    }

    /// Whether `self` is in the accepted set of `query`, i.e. `self` is at least as general as
    /// `query`. E.g. `Full.accepted_for(Diff) == true`, `Incr.accepted_for(Diff) == false`.
    pub fn accepted_for(self, query: BackupLevel) -> bool {
        self >= query
    }
}

/// Parses a backup level option value (as read from configuration), or the on-disk suffix.
///
/// Used at the one or two call sites that accept a level as a caller-supplied string rather than
/// already having a typed [BackupLevel].
pub fn parse_level(s: &str) -> Result<BackupLevel, Error> {
    BackupLevel::from_suffix(s).ok_or_else(|| Error::LevelError(s.to_string()))
}
