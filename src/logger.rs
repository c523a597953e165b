//! The logger handle
//!
//! A [`Logger`] owns the configuration store, the bounded record queue, the
//! outstanding-work counter and the lazily started worker and retention
//! threads. The crate root keeps one process-wide instance; independent
//! instances are mostly useful for tests and embedding.

use std::fmt;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::diagnostics::{Diagnostics, StderrDiagnostics};
use crate::error::{LogError, Result};
use crate::format::{self, DefaultFormatter, Formatter};
use crate::level::Level;
use crate::pipeline::{Delivery, FileTarget, LazyThread, Notifier, Record, SharedSyslog};
use crate::queue::{BoundedQueue, OverflowPolicy, Pushed, WorkCounter, DEFAULT_QUEUE_CAPACITY};
use crate::retention;
use crate::sink::{self, SyslogWriter};

/// Default extension of log files
pub const DEFAULT_EXTENSION: &str = "log";

/// Mutable settings, read on every emit and by the worker for every record
struct Settings {
    level: Level,
    directory: Option<PathBuf>,
    syslog: Option<SharedSyslog>,
    ttl: Option<Duration>,
    formatter: Arc<dyn Formatter>,
    extension: String,
    max_file_size: Option<u64>,
    stdout: bool,
    notifier: Option<Notifier>,
    diagnostics: Arc<dyn Diagnostics>,
    overflow: OverflowPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            directory: None,
            syslog: None,
            ttl: None,
            formatter: Arc::new(DefaultFormatter),
            extension: DEFAULT_EXTENSION.to_string(),
            max_file_size: None,
            stdout: false,
            notifier: None,
            diagnostics: Arc::new(StderrDiagnostics),
            overflow: OverflowPolicy::Block,
        }
    }
}

impl Settings {
    fn delivery(&self) -> Delivery {
        Delivery {
            notifier: self.notifier.clone(),
            stdout: self.stdout,
            file: self.directory.as_ref().map(|dir| FileTarget {
                dir: dir.clone(),
                extension: self.extension.clone(),
                max_size: self.max_file_size,
            }),
            syslog: self.syslog.clone(),
            diagnostics: Arc::clone(&self.diagnostics),
        }
    }
}

/// State shared between the handle and its background threads
struct Shared {
    settings: RwLock<Settings>,
    queue: BoundedQueue<Record>,
    outstanding: WorkCounter,
    worker: LazyThread,
    sweeper: LazyThread,
    sweep_interval: Duration,
    shutdown: Mutex<bool>,
    shutdown_signal: Condvar,
}

impl Shared {
    fn read(&self) -> RwLockReadGuard<'_, Settings> {
        self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Settings> {
        self.settings.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_worker(&self) {
        while let Some(record) = self.queue.pop() {
            let delivery = self.read().delivery();
            delivery.deliver(&record);
            self.outstanding.done();
        }
        tracing::debug!(target: "tidelog", "Worker drained its queue and stopped");
    }

    fn run_sweeper(&self) {
        loop {
            let (dir, ttl, diagnostics) = {
                let settings = self.read();
                (
                    settings.directory.clone(),
                    settings.ttl,
                    Arc::clone(&settings.diagnostics),
                )
            };

            if let (Some(dir), Some(ttl)) = (dir, ttl) {
                if let Err(e) = retention::sweep(&dir, ttl, diagnostics.as_ref()) {
                    diagnostics.report(&format!("Can't clean up old log files: {:#}", e));
                }
            }

            if self.wait_for_shutdown(self.sweep_interval) {
                return;
            }
        }
    }

    /// Sleep up to `timeout`; returns true if shutdown was requested
    fn wait_for_shutdown(&self, timeout: Duration) -> bool {
        let stopped = self.shutdown.lock().unwrap_or_else(PoisonError::into_inner);
        let (stopped, _) = self
            .shutdown_signal
            .wait_timeout_while(stopped, timeout, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }
}

/// Leveled logger with an asynchronous delivery pipeline
pub struct Logger {
    shared: Arc<Shared>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("running", &self.is_running())
            .field("outstanding", &self.outstanding())
            .finish()
    }
}

impl Logger {
    /// Create a logger with default settings and a queue of 100 records
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a logger whose queue holds up to `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(capacity, retention::SWEEP_INTERVAL)
    }

    /// Change how often the retention sweeper runs
    ///
    /// Only meaningful before the first record is emitted.
    pub fn with_sweep_interval(self, interval: Duration) -> Self {
        let capacity = self.shared.queue.capacity();
        Self::build(capacity, interval).inherit(self)
    }

    fn build(capacity: usize, sweep_interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                settings: RwLock::new(Settings::default()),
                queue: BoundedQueue::new(capacity),
                outstanding: WorkCounter::new(),
                worker: LazyThread::new(),
                sweeper: LazyThread::new(),
                sweep_interval,
                shutdown: Mutex::new(false),
                shutdown_signal: Condvar::new(),
            }),
        }
    }

    fn inherit(self, previous: Logger) -> Self {
        let settings = std::mem::take(&mut *previous.shared.write());
        *self.shared.write() = settings;
        self
    }

    // --- configuration -----------------------------------------------------

    /// Set the minimum level; records below it are dropped at the call site
    pub fn set_level(&self, level: Level) {
        self.shared.write().level = level;
    }

    /// Set the minimum level by numeric rank, ignoring values outside `0..=4`
    pub fn set_level_index(&self, index: i64) {
        if let Some(level) = Level::from_index(index) {
            self.set_level(level);
        }
    }

    /// Set the minimum level by case-insensitive name (unknown names mean debug)
    pub fn set_level_from_name(&self, name: &str) {
        self.set_level(Level::from_name(name));
    }

    /// Current minimum level
    pub fn level(&self) -> Level {
        self.shared.read().level
    }

    /// Persist records in daily files under `dir`, creating it if needed
    pub fn set_path(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| LogError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        self.shared.write().directory = Some(dir.to_path_buf());
        Ok(())
    }

    /// Stop writing log files
    pub fn disable_file(&self) {
        self.shared.write().directory = None;
    }

    /// Forward records to the local syslog daemon under `tag`
    ///
    /// On failure syslog forwarding is left disabled, the failure is reported
    /// to the diagnostics channel and returned.
    pub fn set_syslog(&self, tag: &str) -> Result<()> {
        match sink::connect_syslog(tag) {
            Ok(writer) => {
                self.shared.write().syslog = Some(Arc::new(Mutex::new(writer)));
                Ok(())
            }
            Err(e) => {
                let diagnostics = {
                    let mut settings = self.shared.write();
                    settings.syslog = None;
                    Arc::clone(&settings.diagnostics)
                };
                diagnostics.report(&format!("Can't init syslog with tag {}: {}", tag, e));
                Err(e)
            }
        }
    }

    /// Forward records to a custom syslog writer
    pub fn set_syslog_writer(&self, writer: impl SyslogWriter + 'static) {
        let writer: Box<dyn SyslogWriter> = Box::new(writer);
        self.shared.write().syslog = Some(Arc::new(Mutex::new(writer)));
    }

    /// Stop forwarding to syslog
    pub fn disable_syslog(&self) {
        self.shared.write().syslog = None;
    }

    /// Replace the formatter used for records emitted from now on
    pub fn set_format(&self, formatter: impl Formatter + 'static) {
        self.shared.write().formatter = Arc::new(formatter);
    }

    /// Rotate the day's file once it would grow past `max_bytes` (`None` for no limit)
    pub fn set_size_limit(&self, max_bytes: Option<u64>) {
        self.shared.write().max_file_size = max_bytes;
    }

    /// Echo records to stdout (below warn) and stderr (warn and above)
    pub fn set_stdout(&self, enabled: bool) {
        self.shared.write().stdout = enabled;
    }

    /// Delete files in the log directory older than `ttl_secs` seconds
    ///
    /// The sweeper starts with the worker, or right away if the worker is
    /// already running.
    pub fn set_ttl(&self, ttl_secs: u64) {
        self.shared.write().ttl = Some(Duration::from_secs(ttl_secs));
        if self.shared.worker.is_running() {
            self.start_sweeper();
        }
    }

    /// Extension of log files, without the leading dot
    pub fn set_extension(&self, extension: &str) {
        self.shared.write().extension = extension.trim_start_matches('.').to_string();
    }

    /// Call `callback` on the worker thread for every record at or above `level_name`
    ///
    /// The callback must not panic: it runs on the delivery worker and a panic
    /// there stops delivery for the rest of the process.
    pub fn set_notifier<F>(&self, callback: F, level_name: &str)
    where
        F: Fn(Level, &str) + Send + Sync + 'static,
    {
        self.shared.write().notifier = Some(Notifier {
            callback: Arc::new(callback),
            level: Level::from_name(level_name),
        });
    }

    /// Replace the channel that receives delivery failures
    pub fn set_diagnostics(&self, diagnostics: impl Diagnostics + 'static) {
        self.shared.write().diagnostics = Arc::new(diagnostics);
    }

    /// Choose what emitting threads do when the queue is full
    pub fn set_overflow_policy(&self, policy: OverflowPolicy) {
        self.shared.write().overflow = policy;
    }

    // --- emitting ------------------------------------------------------------

    /// Emit `message` at `level`
    #[track_caller]
    pub fn log(&self, level: Level, message: &str) {
        self.emit(level, Location::caller(), || message);
    }

    /// Emit pre-built format arguments at `level`; nothing is formatted if filtered
    #[track_caller]
    pub fn log_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        self.emit(level, Location::caller(), || args.to_string());
    }

    #[track_caller]
    pub fn debug(&self, message: &str) {
        self.emit(Level::Debug, Location::caller(), || message);
    }

    #[track_caller]
    pub fn info(&self, message: &str) {
        self.emit(Level::Info, Location::caller(), || message);
    }

    #[track_caller]
    pub fn warn(&self, message: &str) {
        self.emit(Level::Warn, Location::caller(), || message);
    }

    #[track_caller]
    pub fn error(&self, message: &str) {
        self.emit(Level::Error, Location::caller(), || message);
    }

    /// Emit at fatal level. The process keeps running.
    #[track_caller]
    pub fn fatal(&self, message: &str) {
        self.emit(Level::Fatal, Location::caller(), || message);
    }

    fn emit<M, F>(&self, level: Level, location: &Location<'_>, message: F)
    where
        M: AsRef<str>,
        F: FnOnce() -> M,
    {
        let (formatter, overflow, diagnostics) = {
            let settings = self.shared.read();
            if level < settings.level {
                return;
            }
            (
                Arc::clone(&settings.formatter),
                settings.overflow,
                Arc::clone(&settings.diagnostics),
            )
        };

        let message = message();
        let line = formatter.format(level, &format::call_site(location), message.as_ref());

        self.shared.outstanding.add();
        self.start_worker(diagnostics.as_ref());

        match self.shared.queue.push(Record::new(level, line), overflow) {
            Pushed::Queued => {}
            Pushed::Evicted(dropped) => {
                self.shared.outstanding.done();
                diagnostics.report(&format!(
                    "Log queue full, dropped oldest record: {}",
                    dropped.line
                ));
            }
            Pushed::Closed(_) => self.shared.outstanding.done(),
        }
    }

    fn start_worker(&self, diagnostics: &dyn Diagnostics) {
        let shared = Arc::clone(&self.shared);
        self.shared.worker.start_once(
            "tidelog-worker",
            move || shared.run_worker(),
            || {
                if self.shared.read().ttl.is_some() {
                    self.start_sweeper();
                }
            },
            diagnostics,
        );
    }

    fn start_sweeper(&self) {
        let shared = Arc::clone(&self.shared);
        let diagnostics = Arc::clone(&self.shared.read().diagnostics);
        self.shared.sweeper.start_once(
            "tidelog-retention",
            move || shared.run_sweeper(),
            || {},
            diagnostics.as_ref(),
        );
    }

    // --- synchronisation -----------------------------------------------------

    /// Block until every record accepted before this call has been delivered
    ///
    /// There is no timeout: a sink that hangs keeps this call waiting.
    pub fn flush(&self) {
        self.shared.outstanding.wait_idle();
    }

    /// Number of accepted records not yet delivered
    pub fn outstanding(&self) -> u64 {
        self.shared.outstanding.get()
    }

    /// Whether the delivery worker has been started
    pub fn is_running(&self) -> bool {
        self.shared.worker.is_running()
    }

    /// Whether the retention sweeper has been started
    pub fn is_sweeping(&self) -> bool {
        self.shared.sweeper.is_running()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shared.queue.close();
        *self
            .shared
            .shutdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
        self.shared.shutdown_signal.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::testing::CapturedDiagnostics;
    use crate::format::FIELD_SEPARATOR;
    use crate::rotation;
    use crate::sink::testing::RecordingSyslog;
    use chrono::Local;
    use std::fs::File;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn today_file(dir: &Path, extension: &str) -> PathBuf {
        rotation::daily_path(dir, extension, Local::now().date_naive())
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn message_of(line: &str) -> &str {
        line.rsplit(FIELD_SEPARATOR).next().unwrap()
    }

    #[test]
    fn test_filtered_records_are_not_queued() {
        let logger = Logger::new();
        logger.set_level(Level::Error);

        logger.debug("a");
        logger.info("b");
        logger.warn("c");

        assert_eq!(logger.outstanding(), 0);
        assert!(!logger.is_running(), "filtered emits must not start the worker");
    }

    #[test]
    fn test_level_threshold_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("x");
        let logger = Logger::new();
        logger.set_level(Level::Warn);
        logger.set_path(&dir).unwrap();
        logger.set_size_limit(Some(100));

        logger.debug("a");
        logger.info("b");
        logger.warn("c");
        logger.error("d");
        logger.flush();

        let lines = read_lines(&today_file(&dir, "log"));
        assert_eq!(lines.len(), 2);
        assert_eq!(message_of(&lines[0]), "c");
        assert_eq!(message_of(&lines[1]), "d");
        assert!(lines[0].contains("\tWARN\t"));
        assert!(lines[1].contains("\tERROR\t"));
    }

    #[test]
    fn test_default_line_carries_call_site() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new();
        logger.set_path(temp_dir.path()).unwrap();

        let line_no = line!() + 1;
        logger.info("located");
        logger.flush();

        let lines = read_lines(&today_file(temp_dir.path(), "log"));
        let fields: Vec<&str> = lines[0].split(FIELD_SEPARATOR).collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[1], "INFO");
        assert_eq!(fields[2], format!("src/logger.rs:{}", line_no));
        assert_eq!(fields[3], "located");
    }

    #[test]
    fn test_set_level_index_ignores_out_of_range() {
        let logger = Logger::new();
        logger.set_level_index(3);
        assert_eq!(logger.level(), Level::Error);

        logger.set_level_index(7);
        logger.set_level_index(-1);
        assert_eq!(logger.level(), Level::Error);
    }

    #[test]
    fn test_set_level_from_name_fails_open() {
        let logger = Logger::new();
        logger.set_level_from_name("FATAL");
        assert_eq!(logger.level(), Level::Fatal);

        logger.set_level_from_name("loud");
        assert_eq!(logger.level(), Level::Debug);
    }

    #[test]
    fn test_fifo_across_producers() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Arc::new(Logger::with_capacity(8));
        let syslog = RecordingSyslog::default();
        logger.set_path(temp_dir.path()).unwrap();
        logger.set_syslog_writer(syslog.clone());
        logger.set_format(|_level: Level, _site: &str, message: &str| message.to_string());

        let producers: Vec<_> = (0..4)
            .map(|t| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || {
                    for i in 0..50 {
                        logger.info(&format!("{}-{}", t, i));
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }
        logger.flush();

        let file_lines = read_lines(&today_file(temp_dir.path(), "log"));
        assert_eq!(file_lines.len(), 200);
        assert_eq!(file_lines, syslog.messages(), "sinks must see the same order");

        for t in 0..4 {
            let prefix = format!("{}-", t);
            let sequence: Vec<u32> = file_lines
                .iter()
                .filter_map(|l| l.strip_prefix(&prefix))
                .map(|n| n.parse().unwrap())
                .collect();
            assert_eq!(sequence, (0..50).collect::<Vec<u32>>());
        }
    }

    #[test]
    fn test_flush_waits_for_slow_sink() {
        let logger = Logger::new();
        let syslog = RecordingSyslog {
            delay: Duration::from_millis(30),
            ..Default::default()
        };
        logger.set_syslog_writer(syslog.clone());

        for i in 0..5 {
            logger.info(&format!("slow {}", i));
        }
        assert!(logger.outstanding() > 0);

        logger.flush();

        assert_eq!(logger.outstanding(), 0);
        assert_eq!(syslog.messages().len(), 5);
    }

    #[test]
    fn test_flush_without_records_returns() {
        let logger = Logger::new();
        logger.flush();
        assert_eq!(logger.outstanding(), 0);
    }

    #[test]
    fn test_formatter_change_is_not_retroactive() {
        let logger = Logger::new();
        let syslog = RecordingSyslog {
            delay: Duration::from_millis(20),
            ..Default::default()
        };
        logger.set_syslog_writer(syslog.clone());
        logger.set_format(|_level: Level, _site: &str, message: &str| format!("old {}", message));

        logger.info("first");
        logger.set_format(|_level: Level, _site: &str, message: &str| format!("new {}", message));
        logger.info("second");
        logger.flush();

        assert_eq!(
            syslog.messages(),
            vec!["old first".to_string(), "new second".to_string()]
        );
    }

    #[test]
    fn test_log_fmt_skips_formatting_when_filtered() {
        struct Loud<'a>(&'a AtomicUsize);
        impl fmt::Display for Loud<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fetch_add(1, Ordering::SeqCst);
                f.write_str("loud")
            }
        }

        let calls = AtomicUsize::new(0);
        let logger = Logger::new();
        logger.set_level(Level::Info);

        logger.log_fmt(Level::Debug, format_args!("{}", Loud(&calls)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        logger.log_fmt(Level::Info, format_args!("{}", Loud(&calls)));
        logger.flush();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_notifier_receives_rendered_line() {
        let logger = Logger::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        logger.set_format(|level: Level, _site: &str, message: &str| format!("{} {}", level, message));
        logger.set_notifier(
            move |level: Level, line: &str| sink.lock().unwrap().push((level, line.to_string())),
            "error",
        );

        logger.warn("ignored");
        logger.error("noticed");
        logger.flush();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen, vec![(Level::Error, "ERROR noticed".to_string())]);
    }

    #[test]
    fn test_file_failure_reported_and_worker_continues() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("logs");
        let logger = Logger::new();
        let diagnostics = CapturedDiagnostics::default();
        logger.set_diagnostics(diagnostics.clone());
        logger.set_path(&dir).unwrap();
        logger.set_size_limit(Some(1));

        // An unparsable rotated sibling makes every rotation fail.
        let primary = today_file(&dir, "log");
        let stray = PathBuf::from(format!("{}.bak", primary.display()));
        fs::write(&primary, "existing\n").unwrap();
        File::create(&stray).unwrap();

        logger.error("dropped");
        logger.flush();
        assert_eq!(diagnostics.reports().len(), 1);
        assert!(diagnostics.reports()[0].starts_with("Can't write log to file"));

        fs::remove_file(&stray).unwrap();
        logger.error("written");
        logger.flush();

        assert_eq!(diagnostics.reports().len(), 1);
        assert_eq!(read_lines(&primary).len(), 1);
        assert!(rotation::generation_path(&primary, 1).exists());
    }

    #[test]
    fn test_exhausted_generation_does_not_stop_worker() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("logs");
        let logger = Logger::new();
        let diagnostics = CapturedDiagnostics::default();
        let syslog = RecordingSyslog::default();
        logger.set_diagnostics(diagnostics.clone());
        logger.set_syslog_writer(syslog.clone());
        logger.set_path(&dir).unwrap();
        logger.set_size_limit(Some(1));

        let primary = today_file(&dir, "log");
        fs::write(&primary, "existing\n").unwrap();
        File::create(rotation::generation_path(&primary, u64::MAX)).unwrap();

        logger.error("first");
        logger.error("second");
        logger.flush();

        assert_eq!(logger.outstanding(), 0);
        assert_eq!(diagnostics.reports().len(), 2);
        assert_eq!(syslog.messages().len(), 2);
        assert_eq!(read_lines(&primary), vec!["existing".to_string()]);
    }

    #[test]
    fn test_set_path_failure_leaves_file_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let logger = Logger::new();
        let err = logger.set_path(blocker.join("logs")).unwrap_err();

        assert!(matches!(err, LogError::CreateDir { .. }));
        assert!(logger.shared.read().directory.is_none());
    }

    #[test]
    fn test_extension_and_rotation_through_logger() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new();
        logger.set_path(temp_dir.path()).unwrap();
        logger.set_extension(".txt");
        logger.set_size_limit(Some(10));
        logger.set_format(|_level: Level, _site: &str, message: &str| message.to_string());

        logger.info("aaaaaaaa");
        logger.info("bbbbbbbb");
        logger.info("cccccccc");
        logger.flush();

        let primary = today_file(temp_dir.path(), "txt");
        assert_eq!(read_lines(&primary), vec!["cccccccc".to_string()]);
        assert_eq!(
            read_lines(&rotation::generation_path(&primary, 1)),
            vec!["aaaaaaaa".to_string()]
        );
        assert_eq!(
            read_lines(&rotation::generation_path(&primary, 2)),
            vec!["bbbbbbbb".to_string()]
        );
    }

    #[test]
    fn test_drop_oldest_policy_keeps_counter_consistent() {
        let logger = Logger::with_capacity(1);
        let diagnostics = CapturedDiagnostics::default();
        let syslog = RecordingSyslog {
            delay: Duration::from_millis(20),
            ..Default::default()
        };
        logger.set_diagnostics(diagnostics.clone());
        logger.set_syslog_writer(syslog.clone());
        logger.set_overflow_policy(OverflowPolicy::DropOldest);

        for i in 0..10 {
            logger.info(&format!("burst {}", i));
        }
        logger.flush();

        let delivered = syslog.messages().len();
        let dropped = diagnostics.reports().len();
        assert_eq!(delivered + dropped, 10);
        assert!(dropped > 0);
        assert_eq!(logger.outstanding(), 0);
    }

    #[test]
    fn test_ttl_after_start_starts_sweeper() {
        let temp_dir = TempDir::new().unwrap();
        let stale = temp_dir.path().join("2020-01-01.log");
        File::create(&stale)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(3600))
            .unwrap();

        let logger = Logger::new().with_sweep_interval(Duration::from_millis(20));
        logger.set_path(temp_dir.path()).unwrap();
        logger.set_stdout(false);
        logger.set_format(|_level: Level, _site: &str, message: &str| message.to_string());

        logger.info("start the worker");
        logger.flush();
        assert!(logger.is_running());
        assert!(!logger.is_sweeping());

        logger.set_ttl(60);
        assert!(logger.is_sweeping());

        let mut waited = Duration::ZERO;
        while stale.exists() && waited < Duration::from_secs(5) {
            thread::sleep(Duration::from_millis(10));
            waited += Duration::from_millis(10);
        }
        assert!(!stale.exists(), "expired file should be swept");
        assert!(today_file(temp_dir.path(), "log").exists());
    }

    #[test]
    fn test_ttl_before_start_sweeper_starts_with_worker() {
        let logger = Logger::new();
        logger.set_ttl(3600);
        assert!(!logger.is_sweeping());

        logger.info("go");
        logger.flush();

        assert!(logger.is_running());
        assert!(logger.is_sweeping());
    }

    #[test]
    fn test_with_sweep_interval_keeps_settings() {
        let logger = Logger::with_capacity(4);
        logger.set_level(Level::Warn);

        let logger = logger.with_sweep_interval(Duration::from_secs(1));

        assert_eq!(logger.level(), Level::Warn);
        assert_eq!(logger.shared.queue.capacity(), 4);
    }
}
