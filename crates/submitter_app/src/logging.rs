//! Logger initialization for the submitter binary.
//!
//! Each run appends to the log file so history accumulates across runs.

use std::fs::{File, OpenOptions};
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use time::macros::format_description;

/// Destination for log output.
pub enum LogDestination<'a> {
    /// Terminal only, used before the configuration is known.
    Terminal,
    /// Terminal plus the given append-only file.
    Both(&'a Path),
}

/// Initialize the global logger. Later calls are ignored.
pub fn initialize(destination: LogDestination<'_>) {
    let level = LevelFilter::Info;
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let LogDestination::Both(path) = destination {
        if let Some(file_logger) = create_file_logger(path, level, config) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

/// Lines look like `[2024-01-15 10:30:00] [INFO] message`, in local time when the
/// offset can be determined and UTC otherwise.
fn build_config() -> Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_custom(format_description!(
            "[[[year]-[month]-[day] [hour]:[minute]:[second]]"
        ))
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest");
    // Err leaves the builder on UTC.
    let _ = builder.set_time_offset_to_local();
    builder.build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not open log file at {:?}: {}", path, err);
            None
        }
    }
}
