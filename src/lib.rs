//! Tidelog - leveled logging with an asynchronous delivery pipeline
//!
//! Records are filtered and formatted on the calling thread, queued, and
//! written by one background worker to any combination of stdout/stderr, a
//! daily log file with size-based rotation, and syslog. Old files can be
//! deleted by a retention sweeper, and [`flush`] waits until everything
//! queued so far has been written.
//!
//! ```no_run
//! tidelog::set_level(tidelog::Level::Info);
//! tidelog::set_path("/tmp/app-logs").unwrap();
//! tidelog::set_size_limit(Some(10 * tidelog::MEGABYTE));
//!
//! tidelog::info("service started");
//! tidelog::log_warn!("{} requests pending", 42);
//! tidelog::flush();
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod level;
pub mod logger;
pub mod pipeline;
pub mod queue;
pub mod retention;
pub mod rotation;
pub mod sink;

mod macros;

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

pub use config::{LogConfig, GIGABYTE, KILOBYTE, MEGABYTE};
pub use diagnostics::{Diagnostics, StderrDiagnostics, TracingDiagnostics};
pub use error::LogError;
pub use format::{DefaultFormatter, Formatter};
pub use level::Level;
pub use logger::Logger;
pub use queue::OverflowPolicy;
pub use sink::{SyslogError, SyslogWriter};

/// Process-wide logger instance
static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Get the process-wide logger, creating it with default settings on first use
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(Logger::new)
}

/// Install `logger` as the process-wide instance
///
/// Fails, handing the logger back, if the process-wide instance already exists.
pub fn init(logger: Logger) -> Result<(), Logger> {
    LOGGER.set(logger)
}

pub fn set_level(level: Level) {
    logger().set_level(level);
}

pub fn set_level_index(index: i64) {
    logger().set_level_index(index);
}

pub fn set_level_from_name(name: &str) {
    logger().set_level_from_name(name);
}

pub fn set_path(dir: impl AsRef<Path>) -> Result<(), LogError> {
    logger().set_path(dir)
}

pub fn set_syslog(tag: &str) -> Result<(), LogError> {
    logger().set_syslog(tag)
}

pub fn set_format(formatter: impl Formatter + 'static) {
    logger().set_format(formatter);
}

pub fn set_size_limit(max_bytes: Option<u64>) {
    logger().set_size_limit(max_bytes);
}

pub fn set_stdout(enabled: bool) {
    logger().set_stdout(enabled);
}

pub fn set_ttl(ttl_secs: u64) {
    logger().set_ttl(ttl_secs);
}

pub fn set_extension(extension: &str) {
    logger().set_extension(extension);
}

pub fn set_notifier<F>(callback: F, level_name: &str)
where
    F: Fn(Level, &str) + Send + Sync + 'static,
{
    logger().set_notifier(callback, level_name);
}

#[track_caller]
pub fn log(level: Level, message: &str) {
    logger().log(level, message);
}

#[track_caller]
pub fn log_fmt(level: Level, args: fmt::Arguments<'_>) {
    logger().log_fmt(level, args);
}

#[track_caller]
pub fn debug(message: &str) {
    logger().debug(message);
}

#[track_caller]
pub fn info(message: &str) {
    logger().info(message);
}

#[track_caller]
pub fn warn(message: &str) {
    logger().warn(message);
}

#[track_caller]
pub fn error(message: &str) {
    logger().error(message);
}

#[track_caller]
pub fn fatal(message: &str) {
    logger().fatal(message);
}

/// Block until every record accepted so far has been delivered
pub fn flush() {
    logger().flush();
}
