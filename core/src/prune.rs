//! Contains [prune_after]: determines which existing backups are now dispensable.

use crate::backup_level::BackupLevel;
use crate::backup_properties::BackupProperties;

/// Given a freshly completed backup of `new_level` (already present in `existing_backups`),
/// returns the backups that may now be deleted.
///
/// `existing_backups` need not be pre-sorted; this function sorts its own working copies.
/// Never returns a Full backup (I5, P3).
pub fn prune_after(
    new_level: BackupLevel,
    existing_backups: &[BackupProperties],
) -> Vec<BackupProperties> {
    match new_level {
        BackupLevel::Incr => Vec::new(),
        BackupLevel::Diff => prune_after_diff(existing_backups),
        BackupLevel::Full => prune_after_full(existing_backups),
    }
}

/// The next-to-last backup of `level` in `backups` by date, i.e. the "previous" one relative to
/// the backup that was just completed. `None` if fewer than two exist.
fn previous_of_level(backups: &[BackupProperties], level: BackupLevel) -> Option<BackupProperties> {
    let mut of_level: Vec<BackupProperties> = backups
        .iter()
        .copied()
        .filter(|b| b.level == level)
        .collect();
    of_level.sort();
    if of_level.len() < 2 {
        return None;
    }
    Some(of_level[of_level.len() - 2])
}

fn prune_after_diff(existing_backups: &[BackupProperties]) -> Vec<BackupProperties> {
    let Some(previous_diff) = previous_of_level(existing_backups, BackupLevel::Diff) else {
        return Vec::new();
    };

    existing_backups
        .iter()
        .copied()
        .filter(|b| b.level == BackupLevel::Incr && b.date.unwrap() < previous_diff.date.unwrap())
        .collect()
}

fn prune_after_full(existing_backups: &[BackupProperties]) -> Vec<BackupProperties> {
    let Some(previous_full) = previous_of_level(existing_backups, BackupLevel::Full) else {
        return Vec::new();
    };

    let mut to_delete: Vec<BackupProperties> = existing_backups
        .iter()
        .copied()
        .filter(|b| {
            b.level != BackupLevel::Full && b.date.unwrap() < previous_full.date.unwrap()
        })
        .collect();

    // among the Diffs that remain (not already marked for deletion), find the most recent, and
    // delete every Incr older than it too.
    let remaining_diffs: Vec<BackupProperties> = existing_backups
        .iter()
        .copied()
        .filter(|b| b.level == BackupLevel::Diff && !to_delete.contains(b))
        .collect();

    if let Some(&most_recent_diff) = remaining_diffs.iter().max() {
        for backup in existing_backups {
            if backup.level == BackupLevel::Incr
                && backup.date.unwrap() < most_recent_diff.date.unwrap()
                && !to_delete.contains(backup)
            {
                to_delete.push(*backup);
            }
        }
    }

    to_delete.sort();
    to_delete
}

#[cfg(test)]
mod prune_tests {
    use super::*;
    use crate::backup_properties::DATE_FORMAT;
    use chrono::NaiveDateTime;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn full(date: &str) -> BackupProperties {
        BackupProperties::new(dt(date), BackupLevel::Full)
    }
    fn diff(date: &str) -> BackupProperties {
        BackupProperties::new(dt(date), BackupLevel::Diff)
    }
    fn incr(date: &str) -> BackupProperties {
        BackupProperties::new(dt(date), BackupLevel::Incr)
    }

    mod incr_tests {
        use super::*;

        #[test]
        fn never_prunes_anything() {
            let existing = vec![full("2012-01-01_2000"), incr("2012-01-02_2000")];
            assert!(prune_after(BackupLevel::Incr, &existing).is_empty());
        }
    }

    mod diff_tests {
        use super::*;

        #[test]
        fn prunes_incrs_before_previous_diff() {
            let existing = vec![
                full("2012-01-01_2000"),
                incr("2012-01-02_2000"),
                incr("2012-01-03_2000"),
                diff("2012-01-04_2000"), // previous diff
                incr("2012-01-05_2000"),
                incr("2012-01-06_2000"),
                diff("2012-01-07_2000"), // new diff, already in existing_backups
            ];
            let pruned = prune_after(BackupLevel::Diff, &existing);
            assert_eq!(
                pruned,
                vec![incr("2012-01-02_2000"), incr("2012-01-03_2000")]
            );
        }

        #[test]
        fn with_single_diff_prunes_nothing() {
            let existing = vec![full("2012-01-01_2000"), diff("2012-01-04_2000")];
            assert!(prune_after(BackupLevel::Diff, &existing).is_empty());
        }
    }

    mod full_tests {
        use super::*;

        #[test]
        fn scenario_s6_prunes_diff_and_incr_before_previous_full() {
            // an older cycle (pre-previous-full) plus the just-completed one: only the older
            // cycle's Diff/Incr are strictly earlier than the previous Full and get pruned.
            let existing = vec![
                full("2011-12-01_2000"),
                diff("2011-12-20_2000"),
                incr("2011-12-25_2000"),
                full("2012-01-01_2000"), // previous full
                diff("2012-01-04_2000"),
                incr("2012-01-05_2000"),
                full("2012-01-11_2000"), // new full
            ];
            let pruned = prune_after(BackupLevel::Full, &existing);
            assert_eq!(
                pruned,
                vec![diff("2011-12-20_2000"), incr("2011-12-25_2000")]
            );
            assert!(!pruned.iter().any(|b| b.level == BackupLevel::Full));
        }

        #[test]
        fn keeps_incrs_covered_by_a_surviving_diff() {
            // previous full is 2012-01-01; a diff taken AFTER the previous full survives, and
            // incrs after that diff should survive too, while incrs before it (but after the
            // full) do not.
            let existing = vec![
                full("2012-01-01_2000"),
                incr("2012-01-02_2000"),
                diff("2012-01-03_2000"),
                incr("2012-01-04_2000"),
                full("2012-01-11_2000"), // new full
            ];
            let pruned = prune_after(BackupLevel::Full, &existing);
            // previous full == 2012-01-01_2000: nothing is strictly before it, so the first pass
            // deletes nothing; the most recent remaining diff is 2012-01-03, so incrs before it
            // (2012-01-02) are pruned, but the incr after it (2012-01-04) survives.
            assert_eq!(pruned, vec![incr("2012-01-02_2000")]);
        }

        #[test]
        fn with_single_full_prunes_nothing() {
            let existing = vec![full("2012-01-01_2000"), incr("2012-01-02_2000")];
            assert!(prune_after(BackupLevel::Full, &existing).is_empty());
        }
    }

    mod property_tests {
        use super::*;

        #[test]
        fn p3_never_deletes_a_full() {
            let existing = vec![
                full("2012-01-01_2000"),
                diff("2012-01-04_2000"),
                full("2012-01-11_2000"),
                diff("2012-01-14_2000"),
                full("2012-01-21_2000"),
            ];
            for level in [BackupLevel::Incr, BackupLevel::Diff, BackupLevel::Full] {
                let pruned = prune_after(level, &existing);
                assert!(!pruned.iter().any(|b| b.level == BackupLevel::Full));
            }
        }

        #[test]
        fn p2_reference_safety_after_full_prune() {
            // reference safety means: every surviving Diff still has a surviving Full at or
            // before its own date (the Full it was taken against), and every surviving Incr
            // still has a surviving Full-or-Diff at or before its own date.
            let existing = vec![
                full("2011-12-01_2000"),
                diff("2011-12-20_2000"),
                incr("2011-12-25_2000"),
                full("2012-01-01_2000"),
                incr("2012-01-02_2000"),
                diff("2012-01-04_2000"),
                incr("2012-01-05_2000"),
                diff("2012-01-08_2000"),
                incr("2012-01-09_2000"),
                full("2012-01-11_2000"),
            ];
            let pruned = prune_after(BackupLevel::Full, &existing);
            let surviving: Vec<BackupProperties> = existing
                .iter()
                .copied()
                .filter(|b| !pruned.contains(b))
                .collect();

            for diff_entry in surviving.iter().filter(|b| b.level == BackupLevel::Diff) {
                assert!(surviving.iter().any(|b| {
                    b.level == BackupLevel::Full && b.date.unwrap() <= diff_entry.date.unwrap()
                }));
            }

            for incr_entry in surviving.iter().filter(|b| b.level == BackupLevel::Incr) {
                assert!(surviving.iter().any(|b| {
                    (b.level == BackupLevel::Full || b.level == BackupLevel::Diff)
                        && b.date.unwrap() <= incr_entry.date.unwrap()
                }));
            }
        }
    }
}
