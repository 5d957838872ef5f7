use chrono::NaiveDateTime;
use clap::Parser;

/// Decides, per configured backup section, whether a backup is due and which old backups a
/// completed one would make dispensable. Never invokes the archiver or shell hooks itself.
#[derive(Parser)]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the INI configuration file.
    #[arg(short, long, default_value_t = String::from("./lalikan.conf"))]
    pub config: String,

    /// Only consider this section. If absent, every section is processed.
    #[arg(short, long)]
    pub section: Option<String>,

    /// Force a backup even if none is due yet.
    #[arg(short, long)]
    pub force: bool,

    /// Evaluate as of this point in time instead of the current time.
    #[arg(long, value_parser = valid_time_format)]
    pub now: Option<NaiveDateTime>,

    /// Path to the log4rs logging config. If absent, a sane stderr-only default is used.
    #[arg(long)]
    pub log_config: Option<String>,

    /// Set to get verbose (debug-level) output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Checks that the provided string is in the crate's canonical timestamp format.
fn valid_time_format(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, lalikan_core::backup_properties::DATE_FORMAT)
        .map_err(|_| String::from("expected a timestamp in \"YYYY-MM-DD_HHMM\" format"))
}

/// Parses cli-args and returns them.
pub fn get_args() -> Args {
    Args::parse()
}
