//! Contains [BackupCatalog]: directory-backed enumeration of existing backups.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::backup_level::BackupLevel;
use crate::backup_properties::{BackupProperties, DATE_FORMAT};
use crate::error::Error;

/// Matches a canonical backup directory name: `YYYY-MM-DD_HHMM-<suffix>`.
///
/// Capture group 1 is the date string, group 2 the suffix. [crate::backup_properties] tests
/// round-trip through this regex, so any change to the group layout must keep exactly these two
/// captures.
pub static NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2}_[0-9]{4})-(full|diff|incr)$").unwrap()
});

/// Which levels a query accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    /// Only backups whose level is in the accepted set of the given level.
    Only(BackupLevel),
    /// Any level.
    Any,
}

impl LevelFilter {
    fn matches(self, level: BackupLevel) -> bool {
        match self {
            LevelFilter::Only(query) => level.accepted_for(query),
            LevelFilter::Any => true,
        }
    }
}

/// Directory-backed view over the backups that actually exist on disk.
///
/// Scans `backup_directory` fresh on every call; see the data model's lifecycle note for why this
/// type deliberately holds no state beyond the path it was built with.
pub struct BackupCatalog {
    backup_directory: PathBuf,
}

impl BackupCatalog {
    pub fn new(backup_directory: impl Into<PathBuf>) -> BackupCatalog {
        BackupCatalog {
            backup_directory: backup_directory.into(),
        }
    }

    /// Lists existing backups matching `filter_level`, optionally bounded to `date ≤ prior_to`.
    ///
    /// Sorted ascending by `(date_string, level)`. Directories that don't match the name regex,
    /// or that match but lack a readable catalog file, are silently skipped (I4). Only a failure
    /// to read the backup directory itself is an error.
    pub fn find_existing(
        &self,
        filter_level: LevelFilter,
        prior_to: Option<NaiveDateTime>,
    ) -> Result<Vec<BackupProperties>, Error> {
        let mut found = Vec::new();

        for entry in fs::read_dir(&self.backup_directory)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };

            let Some(caps) = NAME_REGEX.captures(name) else {
                trace!("skipping {name}: doesn't match the canonical backup directory name");
                continue;
            };
            let date_string = &caps[1];
            let suffix = &caps[2];

            let date = match NaiveDateTime::parse_from_str(date_string, DATE_FORMAT) {
                Ok(date) if date.format(DATE_FORMAT).to_string() == *date_string => date,
                // doesn't round-trip (e.g. an out-of-range day swallowed by a lenient parse)
                _ => continue,
            };
            let level = match BackupLevel::from_suffix(suffix) {
                Some(level) => level,
                None => continue,
            };

            if !self.has_readable_catalog(&path, date_string) {
                trace!("skipping {name}: no readable catalog file");
                continue;
            }

            if !filter_level.matches(level) {
                continue;
            }
            if let Some(bound) = prior_to {
                if date > bound {
                    continue;
                }
            }

            found.push(BackupProperties::new(date, level));
        }

        found.sort();
        debug!(
            "scanned {}: {} existing backups match {filter_level:?}",
            self.backup_directory.display(),
            found.len()
        );
        Ok(found)
    }

    /// The last existing backup whose level is in the accepted set of `level`, as of `now`.
    ///
    /// Returns the invalid sentinel (rather than an `Option`) when nothing matches, so call sites
    /// stay total.
    pub fn last_existing(
        &self,
        level: BackupLevel,
        now: NaiveDateTime,
    ) -> Result<BackupProperties, Error> {
        let found = self.find_existing(LevelFilter::Only(level), Some(now))?;
        Ok(found.last().copied().unwrap_or_else(|| BackupProperties::invalid(level)))
    }

    fn has_readable_catalog(&self, backup_dir: &Path, date_string: &str) -> bool {
        let catalog_path = backup_dir.join(format!("{date_string}-catalog.01.dar"));
        match fs::metadata(&catalog_path) {
            Ok(meta) => meta.is_file(),
            Err(_) => false,
        }
    }
}
