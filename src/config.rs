// SPDX-License-Identifier: MIT
//
// `.geteed.cfg`: optional JSON configuration in the working directory.
//
//   {
//     "python": { "keywords": ["def", "class"], "number_regex": "\\d+" },
//     "theme": { "keyword": { "fg": "magenta", "attrs": ["bold"] } },
//     "extensions": { "alt+d": "duplicate-line" },
//     "options": { "tab_size": 2 }
//   }
//
// Every top-level key other than `theme`, `extensions`, and `options` is a
// language id whose rules are merged over the built-in ones. A missing
// file is the empty configuration. A file that can't be read or parsed is
// logged and ignored; the editor still starts.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ge_editor::{Options, RuleOverlay};
use ge_theme::ThemeOverlay;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".geteed.cfg";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: Option<ThemeOverlay>,
    /// Key chord -> command id.
    pub extensions: HashMap<String, String>,
    pub options: Option<Options>,
    #[serde(flatten)]
    pub languages: HashMap<String, RuleOverlay>,
}

impl Config {
    /// Parse `path`. `Ok(None)` if it doesn't exist.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the file exists but can't be read or parsed.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Like [`read`](Self::read), but never fails: problems are logged and
    /// the default configuration is used.
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(Some(config)) => {
                log::info!(
                    "loaded {}: {} language override(s), {} extension(s)",
                    path.display(),
                    config.languages.len(),
                    config.extensions.len()
                );
                config
            }
            Ok(None) => {
                log::debug!("no {} found", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// `.geteed.cfg` in the current directory.
    pub fn load_default() -> Self {
        Self::load(Path::new(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(text: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), text).unwrap();
        file
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert!(Config::read(&path).unwrap().is_none());
        assert!(Config::load(&path).languages.is_empty());
    }

    #[test]
    fn languages_are_the_remaining_keys() {
        let file = write(
            r#"{
                "python": { "keywords": ["def"] },
                "Lua": { "comment_delimiters": ["--"], "number_regex": "\\d+" },
                "extensions": { "alt+d": "duplicate-line" },
                "options": { "tab_size": 2 }
            }"#,
        );
        let config = Config::read(file.path()).unwrap().unwrap();
        assert_eq!(config.languages.len(), 2);
        assert_eq!(
            config.languages["python"].keywords.as_deref(),
            Some(&["def".to_owned()][..])
        );
        assert_eq!(config.languages["Lua"].number_regex.as_deref(), Some(r"\d+"));
        assert_eq!(config.extensions["alt+d"], "duplicate-line");
        assert_eq!(config.options.map(|o| o.tab_size), Some(2));
        assert!(config.theme.is_none());
    }

    #[test]
    fn theme_table_is_an_overlay() {
        let file = write(r#"{ "theme": { "keyword": "red" } }"#);
        let config = Config::read(file.path()).unwrap().unwrap();
        assert!(config.theme.is_some());
        assert!(config.languages.is_empty());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let file = write("{ not json");
        assert!(matches!(
            Config::read(file.path()),
            Err(ConfigError::Parse { .. })
        ));
        let config = Config::load(file.path());
        assert!(config.languages.is_empty());
        assert!(config.extensions.is_empty());
    }
}
