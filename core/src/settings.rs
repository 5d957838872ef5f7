//! Contains [ConfigSource] and [Settings]: typed, read-only access to the INI configuration
//! surface described in the data model (one section per backup profile).

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use ini::Ini;

use crate::backup_properties::DATE_FORMAT;
use crate::error::Error;

/// The literal section name that gets processed first, if present.
const DEFAULT_SECTION: &str = "Default";

/// The only option names [Settings::get_option] will answer for.
const RECOGNISED_OPTIONS: &[&str] = &[
    "backup-directory",
    "dar-path",
    "dar-options",
    "interval-full",
    "interval-diff",
    "interval-incr",
    "start-time",
    "command-pre-run",
    "command-post-run",
    "command-notification",
];

/// A parsed INI document: the opaque key-value provider [Settings] type-checks against.
///
/// Raw text parsing is delegated to the `ini` crate; this wrapper only ever hands out strings.
pub struct ConfigSource {
    ini: Ini,
}

impl ConfigSource {
    /// Loads and parses the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<ConfigSource, Error> {
        let path = path.as_ref();
        let ini = Ini::load_from_file(path).map_err(|e| Error::ConfigParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(ConfigSource { ini })
    }

    /// All section names, sorted case-insensitively, with a literal `Default` section (if
    /// present) moved to the front.
    pub fn sections(&self) -> Vec<String> {
        let mut sections: Vec<String> = self
            .ini
            .sections()
            .filter_map(|s| s.map(str::to_string))
            .collect();
        sections.sort_by_key(|s| s.to_lowercase());

        if let Some(pos) = sections.iter().position(|s| s == DEFAULT_SECTION) {
            let default_section = sections.remove(pos);
            sections.insert(0, default_section);
        }

        sections
    }

    /// Option names of `section`, sorted case-insensitively. Empty if the section doesn't exist.
    pub fn options(&self, section: &str) -> Vec<String> {
        let mut options: Vec<String> = match self.ini.section(Some(section)) {
            Some(props) => props.iter().map(|(k, _)| k.to_string()).collect(),
            None => Vec::new(),
        };
        options.sort_by_key(|s| s.to_lowercase());
        options
    }

    /// `(option, value)` pairs of `section`, sorted by option name case-insensitively.
    pub fn items(&self, section: &str) -> Vec<(String, String)> {
        let mut items: Vec<(String, String)> = match self.ini.section(Some(section)) {
            Some(props) => props
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            None => Vec::new(),
        };
        items.sort_by_key(|(k, _)| k.to_lowercase());
        items
    }

    /// Gets a single option's value.
    ///
    /// When `allow_empty` is `false`, both a missing key and an empty string raise
    /// [Error::MissingOption].
    pub fn get(&self, section: &str, option: &str, allow_empty: bool) -> Result<String, Error> {
        let value = self
            .ini
            .section(Some(section))
            .and_then(|props| props.get(option))
            .unwrap_or("");

        if !allow_empty && value.is_empty() {
            return Err(Error::MissingOption {
                section: section.to_string(),
                option: option.to_string(),
            });
        }

        Ok(value.to_string())
    }
}

/// Read-only, typed view over one section of a [ConfigSource].
///
/// Mirrors the option table of the data model: paths, intervals, the start timestamp, and the
/// (optional, string-valued) shell hooks.
pub struct Settings<'a> {
    source: &'a ConfigSource,
    section: String,
}

impl<'a> Settings<'a> {
    pub fn new(source: &'a ConfigSource, section: impl Into<String>) -> Settings<'a> {
        Settings {
            source,
            section: section.into(),
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    fn required(&self, option: &str) -> Result<String, Error> {
        self.source.get(&self.section, option, false)
    }

    fn optional(&self, option: &str) -> Result<String, Error> {
        self.source.get(&self.section, option, true)
    }

    fn invalid(&self, option: &str, value: &str, reason: impl Into<String>) -> Error {
        Error::InvalidValue {
            section: self.section.clone(),
            option: option.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Root directory backups for this section are stored under. Must be absolute.
    pub fn backup_directory(&self) -> Result<PathBuf, Error> {
        let value = self.required("backup-directory")?;
        let path = PathBuf::from(&value);
        if !path.is_absolute() {
            return Err(self.invalid("backup-directory", &value, "path must be absolute"));
        }
        Ok(path)
    }

    pub fn dar_path(&self) -> Result<String, Error> {
        self.required("dar-path")
    }

    pub fn dar_options(&self) -> Result<String, Error> {
        self.optional("dar-options")
    }

    fn positive_interval(&self, option: &str) -> Result<f64, Error> {
        let value = self.required(option)?;
        let parsed: f64 = value
            .parse()
            .map_err(|_| self.invalid(option, &value, "not a number"))?;
        if parsed <= 0.0 {
            return Err(self.invalid(option, &value, "must be strictly positive"));
        }
        Ok(parsed)
    }

    pub fn interval_full(&self) -> Result<f64, Error> {
        self.positive_interval("interval-full")
    }

    pub fn interval_diff(&self) -> Result<f64, Error> {
        self.positive_interval("interval-diff")
    }

    pub fn interval_incr(&self) -> Result<f64, Error> {
        self.positive_interval("interval-incr")
    }

    pub fn start_time(&self) -> Result<NaiveDateTime, Error> {
        let value = self.required("start-time")?;
        NaiveDateTime::parse_from_str(&value, DATE_FORMAT)
            .map_err(|e| self.invalid("start-time", &value, e.to_string()))
    }

    pub fn command_pre_run(&self) -> Result<String, Error> {
        self.optional("command-pre-run")
    }

    pub fn command_post_run(&self) -> Result<String, Error> {
        self.optional("command-post-run")
    }

    pub fn command_notification(&self) -> Result<String, Error> {
        self.optional("command-notification")
    }

    /// Free-form accessor guarded by the recognised-option whitelist: anything not in
    /// [RECOGNISED_OPTIONS] raises [Error::UnknownOption] instead of silently returning an
    /// empty string for a typo'd option name.
    pub fn get_option(&self, option: &str) -> Result<String, Error> {
        if !RECOGNISED_OPTIONS.contains(&option) {
            return Err(Error::UnknownOption(option.to_string()));
        }
        self.optional(option)
    }
}

#[cfg(test)]
mod settings_tests {
    use super::*;
    use std::io::Write;

    fn source_from_str(contents: &str) -> ConfigSource {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        ConfigSource::load(file.path()).unwrap()
    }

    const SAMPLE: &str = "\
[Default]
backup-directory = /var/backups/default
dar-path = /usr/bin/dar
interval-full = 10
interval-diff = 3
interval-incr = 1
start-time = 2012-01-01_2000

[zzz-section]
backup-directory = /var/backups/zzz
dar-path = /usr/bin/dar
interval-full = 7
interval-diff = 2
interval-incr = 1
start-time = 2012-01-01_2000

[Abc]
backup-directory = /var/backups/abc
dar-path = /usr/bin/dar
interval-full = 7
interval-diff = 2
interval-incr = 1
start-time = 2012-01-01_2000
";

    mod sections_tests {
        use super::*;

        #[test]
        fn sorted_with_default_first() {
            let source = source_from_str(SAMPLE);
            assert_eq!(source.sections(), vec!["Default", "Abc", "zzz-section"]);
        }

        #[test]
        fn options_and_items_are_sorted_case_insensitively() {
            let source = source_from_str(SAMPLE);
            let options = source.options("Default");
            let mut sorted = options.clone();
            sorted.sort_by_key(|s| s.to_lowercase());
            assert_eq!(options, sorted);

            let items = source.items("Default");
            assert_eq!(items.len(), options.len());
        }
    }

    mod required_option_tests {
        use super::*;

        #[test]
        fn missing_option_errors() {
            let source = source_from_str("[Default]\nbackup-directory = /tmp/x\n");
            let settings = Settings::new(&source, "Default");
            assert!(matches!(
                settings.dar_path(),
                Err(Error::MissingOption { .. })
            ));
        }

        #[test]
        fn empty_option_errors_like_missing() {
            let source = source_from_str("[Default]\ndar-path = \n");
            let settings = Settings::new(&source, "Default");
            assert!(matches!(
                settings.dar_path(),
                Err(Error::MissingOption { .. })
            ));
        }
    }

    mod typed_accessor_tests {
        use super::*;

        #[test]
        fn relative_backup_directory_is_invalid() {
            let source = source_from_str("[Default]\nbackup-directory = relative/path\n");
            let settings = Settings::new(&source, "Default");
            assert!(matches!(
                settings.backup_directory(),
                Err(Error::InvalidValue { .. })
            ));
        }

        #[test]
        fn non_positive_interval_is_invalid() {
            let source = source_from_str("[Default]\ninterval-full = 0\n");
            let settings = Settings::new(&source, "Default");
            assert!(matches!(
                settings.interval_full(),
                Err(Error::InvalidValue { .. })
            ));
        }

        #[test]
        fn valid_section_parses_everything() {
            let source = source_from_str(SAMPLE);
            let settings = Settings::new(&source, "Default");
            assert_eq!(
                settings.backup_directory().unwrap(),
                PathBuf::from("/var/backups/default")
            );
            assert_eq!(settings.interval_full().unwrap(), 10.0);
            assert_eq!(settings.interval_diff().unwrap(), 3.0);
            assert_eq!(settings.interval_incr().unwrap(), 1.0);
            assert_eq!(
                settings.start_time().unwrap(),
                NaiveDateTime::parse_from_str("2012-01-01_2000", DATE_FORMAT).unwrap()
            );
            // optional hooks default to empty, not an error
            assert_eq!(settings.command_pre_run().unwrap(), "");
        }
    }

    mod get_option_tests {
        use super::*;

        #[test]
        fn unknown_option_is_rejected() {
            let source = source_from_str(SAMPLE);
            let settings = Settings::new(&source, "Default");
            assert!(matches!(
                settings.get_option("backup_directory"), // typo: underscore instead of hyphen
                Err(Error::UnknownOption(_))
            ));
            assert!(settings.get_option("backup-directory").is_ok());
        }
    }
}
