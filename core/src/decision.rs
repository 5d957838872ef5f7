//! Contains [BackupDecision]: the orchestrator combining schedule and catalog into a verdict.

use chrono::{NaiveDate, NaiveDateTime};

use crate::backup_level::BackupLevel;
use crate::backup_properties::BackupProperties;
use crate::catalog::BackupCatalog;
use crate::error::Error;
use crate::schedule::calculate_schedule;

/// What [BackupDecision::needed_backup_level] says to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeededBackup {
    /// Perform a backup at this level; it's due.
    Level(BackupLevel),
    /// Nothing is due, but the caller asked to force one anyway: perform an Incr, log it as such.
    ForcedIncr,
}

/// Combines the schedule (what should exist) with the catalog (what does exist) to answer
/// whether, and at which level, a backup is needed right now.
///
/// Holds no state of its own beyond the immutable inputs; every method is a pure function of
/// `now` plus a fresh catalog scan, per the data model's lifecycle note.
pub struct BackupDecision<'a> {
    catalog: &'a BackupCatalog,
    start_time: NaiveDateTime,
    interval_full: f64,
    interval_diff: f64,
    interval_incr: f64,
}

impl<'a> BackupDecision<'a> {
    pub fn new(
        catalog: &'a BackupCatalog,
        start_time: NaiveDateTime,
        interval_full: f64,
        interval_diff: f64,
        interval_incr: f64,
    ) -> BackupDecision<'a> {
        BackupDecision {
            catalog,
            start_time,
            interval_full,
            interval_diff,
            interval_incr,
        }
    }

    fn schedule(&self, now: NaiveDateTime) -> Vec<BackupProperties> {
        calculate_schedule(
            self.start_time,
            self.interval_full,
            self.interval_diff,
            self.interval_incr,
            now,
        )
    }

    /// The last schedule entry in the accepted set of `level` whose date is `≤ now`, walking the
    /// schedule in reverse. Invalid (date = None) if nothing qualifies.
    fn last_of_schedule(&self, level: BackupLevel, now: NaiveDateTime) -> BackupProperties {
        self.schedule(now)
            .into_iter()
            .rev()
            .find(|entry| entry.level.accepted_for(level) && entry.date.unwrap() <= now)
            .unwrap_or_else(|| BackupProperties::invalid(level))
    }

    /// The first schedule entry in the accepted set of `level` strictly after `now`.
    ///
    /// Always succeeds: step 1 of the schedule algorithm guarantees an upcoming Full.
    pub fn next_scheduled(&self, level: BackupLevel, now: NaiveDateTime) -> BackupProperties {
        self.schedule(now)
            .into_iter()
            .find(|entry| entry.level.accepted_for(level) && entry.date.unwrap() > now)
            .expect("schedule always contains an upcoming Full")
    }

    /// The existing backup (per the catalog) most recent as of `now` in the accepted set of
    /// `level`. Invalid if none exists.
    pub fn last_existing(&self, level: BackupLevel, now: NaiveDateTime) -> Result<BackupProperties, Error> {
        self.catalog.last_existing(level, now)
    }

    /// Last scheduled backup of `level`, promoted to a stricter level when a stricter scheduled
    /// backup is more recent than any existing backup of that stricter level (§4.4).
    pub fn last_scheduled(&self, level: BackupLevel, now: NaiveDateTime) -> Result<BackupProperties, Error> {
        let last_existing_of_query = self.last_existing(level, now)?;
        // stand-in so a missing existing backup always compares less than any scheduled date
        let epoch = last_existing_of_query.date.unwrap_or_else(|| {
            NaiveDate::from_ymd_opt(1970, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        });

        match level {
            BackupLevel::Full => Ok(self.last_of_schedule(BackupLevel::Full, now)),
            BackupLevel::Diff => {
                let full = self.last_of_schedule(BackupLevel::Full, now);
                if full.is_valid() && epoch < full.date.unwrap() {
                    return Ok(full);
                }
                Ok(self.last_of_schedule(BackupLevel::Diff, now))
            }
            BackupLevel::Incr => {
                let full = self.last_of_schedule(BackupLevel::Full, now);
                if full.is_valid() && epoch < full.date.unwrap() {
                    return Ok(full);
                }
                let diff = self.last_of_schedule(BackupLevel::Diff, now);
                if diff.is_valid() && epoch < diff.date.unwrap() {
                    return Ok(diff);
                }
                Ok(self.last_of_schedule(BackupLevel::Incr, now))
            }
        }
    }

    /// Signed fractional days by which `level` is overdue (positive) or not yet due (negative).
    pub fn days_overdue(&self, level: BackupLevel, now: NaiveDateTime) -> Result<f64, Error> {
        let last_sched = self.last_scheduled(level, now)?;
        let last_exist = self.last_existing(level, now)?;

        let reference = if !last_sched.is_valid() {
            self.next_scheduled(level, now).date.unwrap()
        } else if !last_exist.is_valid() {
            last_sched.date.unwrap()
        } else if last_exist.date.unwrap() < last_sched.date.unwrap() {
            last_sched.date.unwrap()
        } else {
            self.next_scheduled(level, now).date.unwrap()
        };

        let delta = now - reference;
        Ok(delta.num_milliseconds() as f64 / 86_400_000.0)
    }

    /// The level needed right now, or [NeededBackup::ForcedIncr] if `force` and nothing is due,
    /// or absent if neither applies.
    pub fn needed_backup_level(
        &self,
        now: NaiveDateTime,
        force: bool,
    ) -> Result<Option<NeededBackup>, Error> {
        for level in [BackupLevel::Full, BackupLevel::Diff, BackupLevel::Incr] {
            if self.days_overdue(level, now)? >= 0.0 {
                return Ok(Some(NeededBackup::Level(level)));
            }
        }

        if force && now >= self.start_time {
            return Ok(Some(NeededBackup::ForcedIncr));
        }

        Ok(None)
    }
}
