//! Contains [BackupProperties], the value type identifying a single backup (scheduled or real).

use chrono::NaiveDateTime;

use crate::backup_level::BackupLevel;

/// The canonical date format used in directory names and config timestamps: `YYYY-MM-DD_HHMM`.
pub const DATE_FORMAT: &str = "%Y-%m-%d_%H%M";

/// Identifies a single backup, either one that exists on disk or one the schedule expects.
///
/// `date` is [None] for the invalid/"no such backup" sentinel value returned by call sites that
/// need to stay total (see [BackupProperties::invalid]) rather than returning `Option<BackupProperties>`.
#[derive(Debug, Clone, Copy, Eq, Hash)]
pub struct BackupProperties {
    pub date: Option<NaiveDateTime>,
    pub level: BackupLevel,
}

impl BackupProperties {
    /// Creates a [BackupProperties] for a real, dated backup.
    pub fn new(date: NaiveDateTime, level: BackupLevel) -> BackupProperties {
        BackupProperties {
            date: Some(date),
            level,
        }
    }

    /// The invalid sentinel value for "no backup of this level exists/is scheduled".
    /// Its `date` is [None]; it still carries a `level` so callers can tell which query produced it.
    pub fn invalid(level: BackupLevel) -> BackupProperties {
        BackupProperties { date: None, level }
    }

    /// Whether this represents a real backup with a date.
    pub fn is_valid(&self) -> bool {
        self.date.is_some()
    }

    /// `date` formatted in [DATE_FORMAT], or the literal string `"None"` if absent.
    pub fn date_string(&self) -> String {
        match self.date {
            Some(date) => date.format(DATE_FORMAT).to_string(),
            None => "None".to_string(),
        }
    }

    /// The level's on-disk suffix.
    pub fn suffix(&self) -> &'static str {
        self.level.suffix()
    }

    /// `date_string() + "-" + suffix()`, the on-disk directory name for this backup.
    pub fn base_name(&self) -> String {
        format!("{}-{}", self.date_string(), self.suffix())
    }
}

impl PartialEq for BackupProperties {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date && self.level == other.level
    }
}

/// Ordering is lexicographic on `(date_string, level)`, with invalid (`None`) dates sorting
/// before any real date — matching [Ord] on `Option<NaiveDateTime>` directly, since `None < Some(_)`.
impl PartialOrd for BackupProperties {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BackupProperties {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.date, self.level).cmp(&(other.date, other.level))
    }
}
