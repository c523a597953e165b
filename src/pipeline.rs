//! Delivery pipeline
//!
//! A record is rendered on the caller's thread, queued, and then written by a
//! single background worker: notifier first, then console, file and syslog in
//! that order. Each sink is attempted independently; a failure is reported to
//! the diagnostics channel and never stops the worker.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use chrono::{Local, NaiveDate};

use crate::diagnostics::Diagnostics;
use crate::level::Level;
use crate::sink::{self, SyslogWriter};

/// A rendered log line waiting for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub level: Level,
    pub line: String,
}

impl Record {
    pub fn new(level: Level, line: impl Into<String>) -> Self {
        Self {
            level,
            line: line.into(),
        }
    }
}

/// Callback invoked for every delivered record at or above `level`
pub type NotifyFn = dyn Fn(Level, &str) + Send + Sync;

/// Shared handle to a syslog connection
pub type SharedSyslog = Arc<Mutex<Box<dyn SyslogWriter>>>;

/// Notification hook configured on the logger
#[derive(Clone)]
pub struct Notifier {
    pub callback: Arc<NotifyFn>,
    pub level: Level,
}

/// File persistence settings captured for one record
#[derive(Debug, Clone)]
pub struct FileTarget {
    pub dir: PathBuf,
    pub extension: String,
    pub max_size: Option<u64>,
}

/// Everything the worker needs to deliver one record
///
/// Captured from the configuration when the record is dequeued, so the I/O
/// itself runs without holding the configuration lock.
#[derive(Clone)]
pub struct Delivery {
    pub notifier: Option<Notifier>,
    pub stdout: bool,
    pub file: Option<FileTarget>,
    pub syslog: Option<SharedSyslog>,
    pub diagnostics: Arc<dyn Diagnostics>,
}

impl Delivery {
    /// Deliver `record` to every enabled sink
    pub fn deliver(&self, record: &Record) {
        self.deliver_on(record, Local::now().date_naive());
    }

    /// Deliver `record`, writing file output into the log for `date`
    pub fn deliver_on(&self, record: &Record, date: NaiveDate) {
        if let Some(notifier) = &self.notifier {
            if record.level >= notifier.level {
                (notifier.callback)(record.level, &record.line);
            }
        }

        if self.stdout {
            if let Err(e) = sink::write_console(record.level, &record.line) {
                let stream = if record.level.is_alert() {
                    "stderr"
                } else {
                    "stdout"
                };
                self.diagnostics
                    .report(&format!("Can't write to {}: {}", stream, e));
            }
        }

        if let Some(target) = &self.file {
            if let Err(e) = sink::write_file(
                &target.dir,
                &target.extension,
                date,
                target.max_size,
                &record.line,
            ) {
                self.diagnostics
                    .report(&format!("Can't write log to file: {}", e));
            }
        }

        if let Some(syslog) = &self.syslog {
            let mut writer = syslog.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = sink::write_syslog(&mut **writer, record.level, &record.line) {
                self.diagnostics
                    .report(&format!("Can't write log to syslog: {}", e));
            }
        }
    }
}

/// Lifecycle of a lazily started background thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    #[default]
    Uninitialized,
    Running,
}

/// Starts a named background thread at most once
#[derive(Debug, Default)]
pub struct LazyThread {
    state: Mutex<WorkerState>,
}

impl LazyThread {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, WorkerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> WorkerState {
        *self.lock()
    }

    pub fn is_running(&self) -> bool {
        self.state() == WorkerState::Running
    }

    /// Spawn `body` on a thread called `name` unless one is already running
    ///
    /// Concurrent callers are serialized on the state lock, so exactly one of
    /// them spawns. `after_start` runs once, inside the same critical section,
    /// right after the transition to `Running`. A failed spawn leaves the state
    /// `Uninitialized` so the next caller tries again.
    pub fn start_once<F, A>(
        &self,
        name: &str,
        body: F,
        after_start: A,
        diagnostics: &dyn Diagnostics,
    ) -> bool
    where
        F: FnOnce() + Send + 'static,
        A: FnOnce(),
    {
        let mut state = self.lock();
        if *state == WorkerState::Running {
            return true;
        }

        match thread::Builder::new().name(name.to_string()).spawn(body) {
            Ok(_) => {
                *state = WorkerState::Running;
                tracing::debug!(target: "tidelog", "Started {} thread", name);
                after_start();
                true
            }
            Err(e) => {
                diagnostics.report(&format!("Can't start {} thread: {}", name, e));
                false
            }
        }
    }
}
