//! Error types for the editor core.
//!
//! None of these are fatal. I/O failures become a status message and leave
//! the buffer untouched; validation failures are reported back to the user
//! without mutating anything. A search that finds nothing is not an error at
//! all and is modeled with `Option`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Error loading file {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error saving file {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `line` is 1-indexed, as typed by the user.
    #[error("Invalid line number: {line}")]
    InvalidLine { line: i64 },

    #[error("Please enter a valid line number")]
    NotANumber,

    #[error("Read-only mode - cannot save")]
    ReadOnly,

    /// The file exists but never loaded into the buffer.
    #[error("Not saving: {path} failed to load")]
    NotLoaded { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            EditorError::InvalidLine { line: 42 }.to_string(),
            "Invalid line number: 42"
        );
        assert_eq!(EditorError::ReadOnly.to_string(), "Read-only mode - cannot save");
        assert_eq!(
            EditorError::NotLoaded { path: PathBuf::from("a.bin") }.to_string(),
            "Not saving: a.bin failed to load"
        );
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err = EditorError::Save {
            path: PathBuf::from("/nope/x.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/nope/x.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
