/***************************************/
/*        3rd party libraries          */
/***************************************/
use env_logger::{Builder, Env, Target};
use log::warn;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::LoggingConfig;

/// Opens the log file for appending, creating it when missing.
pub fn open_sink(path: impl AsRef<Path>) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/**
 * Installs the process-wide logger.
 *
 * The level comes from `[logging] level` and can be overridden with
 * `RUST_LOG`. Lines go to the configured file as `LEVEL: <timestamp> - msg`,
 * or to stderr when no file is configured or it cannot be opened.
 *
 * Returns false when a logger was already installed, in which case nothing
 * changes.
 */
pub fn init(config: &LoggingConfig) -> bool {
    let mut builder = Builder::new();
    builder.parse_filters(&config.level);
    builder.parse_env(Env::default());
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{}: {} - {}",
            record.level(),
            buf.timestamp_seconds(),
            record.args()
        )
    });

    let mut unavailable = None;
    if let Some(path) = &config.file {
        match open_sink(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                builder.target(Target::Stderr);
                unavailable = Some((path.clone(), e));
            }
        }
    }

    if builder.try_init().is_err() {
        return false;
    }
    if let Some((path, e)) = unavailable {
        warn!("Cannot open log file {}: {}. Logging to stderr", path, e);
    }
    true
}
