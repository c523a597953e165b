//! Output sinks
//!
//! Each sink takes an already rendered line. Errors are returned to the
//! worker, which reports them and moves on to the next sink.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{LogError, Result};
use crate::level::Level;
use crate::rotation;

/// Failure reported by a syslog writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyslogError(pub String);

impl fmt::Display for SyslogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for SyslogError {}

/// A connection to syslog with one write operation per priority
pub trait SyslogWriter: Send {
    fn emerg(&mut self, message: &str) -> Result<(), SyslogError>;
    fn err(&mut self, message: &str) -> Result<(), SyslogError>;
    fn warning(&mut self, message: &str) -> Result<(), SyslogError>;
    fn info(&mut self, message: &str) -> Result<(), SyslogError>;
    fn debug(&mut self, message: &str) -> Result<(), SyslogError>;
}

/// Send `line` to syslog at the priority matching `level`
pub fn write_syslog(
    writer: &mut dyn SyslogWriter,
    level: Level,
    line: &str,
) -> Result<(), SyslogError> {
    match level {
        Level::Fatal => writer.emerg(line),
        Level::Error => writer.err(line),
        Level::Warn => writer.warning(line),
        Level::Info => writer.info(line),
        Level::Debug => writer.debug(line),
    }
}

#[cfg(unix)]
mod unix {
    use syslog::{Facility, Formatter3164, Logger, LoggerBackend};

    use super::{SyslogError, SyslogWriter};

    /// Syslog connection over the local unix socket
    pub struct UnixSyslog {
        logger: Logger<LoggerBackend, Formatter3164>,
    }

    impl UnixSyslog {
        /// Connect to the local syslog daemon, tagging messages with `tag`
        pub fn connect(tag: &str) -> Result<Self, SyslogError> {
            let formatter = Formatter3164 {
                facility: Facility::LOG_USER,
                hostname: None,
                process: tag.to_string(),
                pid: std::process::id(),
            };

            syslog::unix(formatter)
                .map(|logger| Self { logger })
                .map_err(|e| SyslogError(e.to_string()))
        }
    }

    fn wrap<E: std::fmt::Display>(result: Result<(), E>) -> Result<(), SyslogError> {
        result.map_err(|e| SyslogError(e.to_string()))
    }

    impl SyslogWriter for UnixSyslog {
        fn emerg(&mut self, message: &str) -> Result<(), SyslogError> {
            wrap(self.logger.emerg(message))
        }

        fn err(&mut self, message: &str) -> Result<(), SyslogError> {
            wrap(self.logger.err(message))
        }

        fn warning(&mut self, message: &str) -> Result<(), SyslogError> {
            wrap(self.logger.warning(message))
        }

        fn info(&mut self, message: &str) -> Result<(), SyslogError> {
            wrap(self.logger.info(message))
        }

        fn debug(&mut self, message: &str) -> Result<(), SyslogError> {
            wrap(self.logger.debug(message))
        }
    }
}

#[cfg(unix)]
pub use unix::UnixSyslog;

/// Open the platform syslog connection for `tag`
pub fn connect_syslog(tag: &str) -> Result<Box<dyn SyslogWriter>> {
    #[cfg(unix)]
    {
        UnixSyslog::connect(tag)
            .map(|writer| Box::new(writer) as Box<dyn SyslogWriter>)
            .map_err(|e| LogError::Syslog {
                tag: tag.to_string(),
                reason: e.0,
            })
    }

    #[cfg(not(unix))]
    {
        Err(LogError::Syslog {
            tag: tag.to_string(),
            reason: "syslog is only available on unix".to_string(),
        })
    }
}

/// Echo `line` to stdout, or to stderr for warnings and above
pub fn write_console(level: Level, line: &str) -> io::Result<()> {
    if level.is_alert() {
        writeln!(io::stderr().lock(), "{}", line)
    } else {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", line)?;
        out.flush()
    }
}

/// Append `line` to the day's log file under `dir`, rotating first if needed
///
/// The file is opened, written, synced and closed for every record. Returns
/// the path written to.
pub fn write_file(
    dir: &Path,
    extension: &str,
    date: NaiveDate,
    max_size: Option<u64>,
    line: &str,
) -> Result<PathBuf> {
    let path = rotation::resolve_path(dir, extension, date, line.len() as u64, max_size)?;

    let io_err = |source: io::Error| LogError::Io {
        path: path.clone(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(io_err)?;

    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    file.write_all(buf.as_bytes()).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;

    Ok(path)
}
