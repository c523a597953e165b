//! Error types surfaced by configuration setters and the file path resolver

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while configuring the logger or preparing a log file
#[derive(Debug, Error)]
pub enum LogError {
    /// The log directory could not be created
    #[error("failed to create log directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The syslog connection could not be opened
    #[error("failed to open syslog with tag {tag:?}: {reason}")]
    Syslog { tag: String, reason: String },

    /// A filesystem operation on a log file failed
    #[error("failed to access log file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A rotated sibling carries a suffix that is not a generation number
    #[error("unexpected rotated log file {}", .path.display())]
    BadGeneration { path: PathBuf },

    /// Moving the active file aside failed
    #[error("failed to rotate {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = LogError> = std::result::Result<T, E>;
