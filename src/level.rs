//! Severity levels
//!
//! Ordered severities used both for filtering records and for picking the
//! stdout/stderr stream and syslog priority of a record.

use std::fmt;

/// Severity of a record, `Debug` lowest and `Fatal` highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    #[default]
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl Level {
    /// All levels in ascending order
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Look up a level by its numeric rank
    ///
    /// Returns `None` for anything outside `0..=4`.
    pub fn from_index(index: i64) -> Option<Level> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Level::ALL.get(i).copied())
    }

    /// Map a case-insensitive level name to a level
    ///
    /// Unknown names fall back to `Debug`, so a typo in a configured level
    /// lets everything through instead of silencing the log.
    pub fn from_name(name: &str) -> Level {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Level::Debug,
            "info" => Level::Info,
            "warn" => Level::Warn,
            "error" => Level::Error,
            "fatal" => Level::Fatal,
            _ => Level::Debug,
        }
    }

    /// Whether records of this level are echoed to stderr rather than stdout
    pub fn is_alert(&self) -> bool {
        *self >= Level::Warn
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
