//! Configuration file support
//!
//! Lets a host describe its logging setup in TOML instead of calling each
//! setter by hand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::logger::{Logger, DEFAULT_EXTENSION};
use crate::queue::{OverflowPolicy, DEFAULT_QUEUE_CAPACITY};

pub const KILOBYTE: u64 = 1024;
pub const MEGABYTE: u64 = KILOBYTE * 1024;
pub const GIGABYTE: u64 = MEGABYTE * 1024;

const CONFIG_FILE: &str = "config.toml";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level name: "debug", "info", "warn", "error" or "fatal"
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for daily log files; file output is off when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Log file extension (default: "log")
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Size in bytes after which the day's file is rotated
    #[serde(default)]
    pub max_file_size: Option<u64>,

    /// Echo records to stdout/stderr
    #[serde(default)]
    pub stdout: bool,

    /// Delete log files older than this many seconds
    #[serde(default)]
    pub ttl_secs: Option<u64>,

    /// Forward records to syslog under this tag
    #[serde(default)]
    pub syslog_tag: Option<String>,

    /// Records that can wait for the worker (default: 100)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Behaviour when the queue is full: "block" (default) or "drop-oldest"
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

fn default_level() -> String {
    "debug".to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
            extension: default_extension(),
            max_file_size: None,
            stdout: false,
            ttl_secs: None,
            syslog_tag: None,
            queue_capacity: default_queue_capacity(),
            overflow: OverflowPolicy::default(),
        }
    }
}

impl LogConfig {
    /// Load configuration from `path`, or return the default if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::from_toml_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid logging configuration")
    }

    /// Default location of the configuration file (~/.tidelog/config.toml)
    ///
    /// Falls back to ./.tidelog if the home directory cannot be determined.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".tidelog"))
            .unwrap_or_else(|| {
                tracing::warn!(target: "tidelog", "Could not determine home directory, using current directory for config");
                PathBuf::from(".tidelog")
            })
            .join(CONFIG_FILE)
    }

    /// Build a new logger configured from this file
    pub fn build(&self) -> Result<Logger> {
        let logger = Logger::with_capacity(self.queue_capacity);
        self.apply(&logger)?;
        Ok(logger)
    }

    /// Apply every setting to `logger`
    ///
    /// The queue capacity is fixed when a logger is built and is not changed here.
    pub fn apply(&self, logger: &Logger) -> Result<()> {
        logger.set_level_from_name(&self.level);
        logger.set_extension(&self.extension);
        logger.set_size_limit(self.max_file_size);
        logger.set_stdout(self.stdout);
        logger.set_overflow_policy(self.overflow);

        if let Some(dir) = &self.directory {
            logger.set_path(dir)?;
        }
        if let Some(tag) = &self.syslog_tag {
            logger.set_syslog(tag)?;
        }
        if let Some(ttl) = self.ttl_secs {
            logger.set_ttl(ttl);
        }

        Ok(())
    }
}
