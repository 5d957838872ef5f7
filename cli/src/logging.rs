use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

/// Initialises logging from a log4rs config file, or a sane stderr-only default when `log_config`
/// is absent. `verbose` raises the default's level from `Info` to `Debug`; it has no effect on a
/// caller-supplied config file, which is trusted to set its own levels.
pub fn init(log_config: Option<&str>, verbose: bool) {
    match log_config {
        Some(path) => {
            if let Err(err) = log4rs::init_file(path, Default::default()) {
                eprintln!("couldn't load logging config {path}: {err}, falling back to default");
                init_default(verbose);
            }
        }
        None => init_default(verbose),
    }
}

fn init_default(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} {l} {m}{n}")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .expect("default logging config is always valid");

    if let Err(err) = log4rs::init_config(config) {
        eprintln!("couldn't initialise default logging: {err}");
    }
}
