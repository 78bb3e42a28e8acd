// SPDX-License-Identifier: MIT
//
// File logger behind the `log` facade.
//
// The terminal is in raw mode for the whole session, so nothing may be
// printed to it. Records go to `geteed.log` in the temp directory instead,
// one line each with a local timestamp. The file is truncated when the
// editor starts. `GETEED_LOG` picks the level (`error` .. `trace`,
// default `info`).

use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};

const LOG_FILE: &str = "geteed.log";
const LEVEL_VAR: &str = "GETEED_LOG";

struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(
                file,
                "[{}] {:<5} {}: {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Where the log goes.
pub fn log_path() -> PathBuf {
    env::temp_dir().join(LOG_FILE)
}

/// Level from `GETEED_LOG`. Unset or unrecognized means `info`.
pub fn level_from_env(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the file logger at `path`, truncating it.
///
/// # Errors
///
/// Fails if the file can't be created or a logger is already installed.
pub fn init_at(path: &Path, level: LevelFilter) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let logger = FileLogger {
        level,
        file: Mutex::new(file),
    };
    log::set_boxed_logger(Box::new(logger)).map_err(io::Error::other)?;
    log::set_max_level(level);
    Ok(())
}

/// Install the file logger in the temp directory.
///
/// # Errors
///
/// See [`init_at`].
pub fn init() -> io::Result<()> {
    let level = level_from_env(env::var(LEVEL_VAR).ok().as_deref());
    init_at(&log_path(), level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_defaults_to_info() {
        assert_eq!(level_from_env(None), LevelFilter::Info);
        assert_eq!(level_from_env(Some("loud")), LevelFilter::Info);
    }

    #[test]
    fn level_parses_names() {
        assert_eq!(level_from_env(Some("debug")), LevelFilter::Debug);
        assert_eq!(level_from_env(Some(" WARN ")), LevelFilter::Warn);
        assert_eq!(level_from_env(Some("off")), LevelFilter::Off);
    }

    #[test]
    fn log_file_lives_in_temp_dir() {
        assert!(log_path().starts_with(env::temp_dir()));
        assert!(log_path().ends_with(LOG_FILE));
    }
}
