mod cli_args;
mod logging;

use std::process::exit;

use chrono::Local;
use lalikan_core::catalog::LevelFilter;
use lalikan_core::decision::NeededBackup;
use lalikan_core::{BackupCatalog, BackupDecision, BackupLevel, BackupProperties, ConfigSource, Error, Settings};
use log::{debug, error, info, warn};

fn main() {
    let args = cli_args::get_args();
    logging::init(args.log_config.as_deref(), args.verbose);

    let source = match ConfigSource::load(&args.config) {
        Ok(source) => source,
        Err(err) => {
            error!("failed loading configuration {}: {err}", args.config);
            exit(exitcode::CONFIG);
        }
    };

    let sections = match &args.section {
        Some(section) => vec![section.clone()],
        None => source.sections(),
    };

    if sections.is_empty() {
        warn!("no sections found in {}", args.config);
    }

    let now = args.now.unwrap_or_else(|| Local::now().naive_local());
    let mut had_error = false;

    for section in sections {
        if let Err(err) = process_section(&source, &section, now, args.force) {
            error!("section \"{section}\": {err}");
            had_error = true;
        }
    }

    if had_error {
        exit(exitcode::SOFTWARE);
    }
}

fn process_section(
    source: &ConfigSource,
    section: &str,
    now: chrono::NaiveDateTime,
    force: bool,
) -> Result<(), Error> {
    let settings = Settings::new(source, section);

    let backup_directory = settings.backup_directory()?;
    let interval_full = settings.interval_full()?;
    let interval_diff = settings.interval_diff()?;
    let interval_incr = settings.interval_incr()?;
    let start_time = settings.start_time()?;

    info!("section \"{section}\": evaluating as of {now}");

    let catalog = BackupCatalog::new(&backup_directory);
    let decision = BackupDecision::new(&catalog, start_time, interval_full, interval_diff, interval_incr);

    match decision.needed_backup_level(now, force)? {
        Some(NeededBackup::Level(level)) => {
            info!("section \"{section}\": {level:?} backup is due");
            report_prospective_prune(&catalog, section, level, now)?;
        }
        Some(NeededBackup::ForcedIncr) => {
            info!("section \"{section}\": nothing due, performing a forced incremental backup");
        }
        None => {
            debug!("section \"{section}\": no backup needed");
        }
    }

    Ok(())
}

/// Logs what a completed backup of `level` would make dispensable, without invoking the archiver
/// or deleting anything: the core never performs I/O beyond reading the backup directory.
fn report_prospective_prune(
    catalog: &BackupCatalog,
    section: &str,
    level: BackupLevel,
    now: chrono::NaiveDateTime,
) -> Result<(), Error> {
    let mut existing = catalog.find_existing(LevelFilter::Any, None)?;
    existing.push(BackupProperties::new(now, level));

    let prunable = lalikan_core::prune_after(level, &existing);
    if prunable.is_empty() {
        debug!("section \"{section}\": nothing would become dispensable");
    } else {
        for backup in &prunable {
            info!("section \"{section}\": {} would become dispensable", backup.base_name());
        }
    }

    Ok(())
}
