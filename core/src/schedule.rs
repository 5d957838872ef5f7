//! Contains [calculate_schedule], the pure function computing the backup schedule around `now`.

use chrono::{Duration, NaiveDateTime};
use log::{debug, trace};

use crate::backup_level::BackupLevel;
use crate::backup_properties::BackupProperties;

/// Converts a positive number of days (as stored in configuration) into a [Duration].
fn days_to_duration(days: f64) -> Duration {
    Duration::milliseconds((days * 86_400_000.0).round() as i64)
}

/// Computes the bounded schedule around `now`: the previous Full (if any) through the next
/// upcoming Full, with Diff and Incr entries filled in between.
///
/// Pure function of its inputs: no filesystem access, no clock calls. See the data model's
/// invariant I3 for the guarantees this function upholds.
pub fn calculate_schedule(
    start_time: NaiveDateTime,
    interval_full: f64,
    interval_diff: f64,
    interval_incr: f64,
    now: NaiveDateTime,
) -> Vec<BackupProperties> {
    let full_step = days_to_duration(interval_full);

    // Step 1: walk Full boundaries until we pass `now`.
    let mut current_full = start_time;
    let mut previous_full = None;
    while current_full <= now {
        previous_full = Some(current_full);
        current_full += full_step;
    }
    let upcoming_full = current_full;

    let previous_full = match previous_full {
        // `now < start_time`: only the upcoming Full exists.
        None => {
            debug!("now ({now}) precedes start_time ({start_time}): schedule is just the upcoming Full");
            return vec![BackupProperties::new(upcoming_full, BackupLevel::Full)];
        }
        Some(date) => date,
    };
    trace!("Full boundaries around {now}: previous={previous_full}, upcoming={upcoming_full}");

    // Step 2: result starts as [F, U].
    let mut result = vec![
        BackupProperties::new(previous_full, BackupLevel::Full),
        BackupProperties::new(upcoming_full, BackupLevel::Full),
    ];

    // Step 3: fill Diff layer between adjacent entries (currently just F and U).
    fill_layer(&mut result, interval_diff, BackupLevel::Diff);
    result.sort();

    // Step 5: fill Incr layer between all now-adjacent entries (Full or Diff).
    fill_layer(&mut result, interval_incr, BackupLevel::Incr);
    result.sort();

    debug!("schedule around {now} has {} entries", result.len());
    result
}

/// Walks every adjacent pair currently in `result` and inserts `level` entries spaced `interval`
/// days apart, strictly between the pair's dates. `result` is left unsorted; the caller sorts.
fn fill_layer(result: &mut Vec<BackupProperties>, interval: f64, level: BackupLevel) {
    let step = days_to_duration(interval);
    let boundaries: Vec<NaiveDateTime> = result.iter().map(|p| p.date.unwrap()).collect();

    let mut inserted = Vec::new();
    for pair in boundaries.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let mut t = prev + step;
        while t < next {
            inserted.push(BackupProperties::new(t, level));
            t += step;
        }
    }
    trace!("filled {} {level:?} entries between {} existing boundaries", inserted.len(), boundaries.len());
    result.extend(inserted);
}
