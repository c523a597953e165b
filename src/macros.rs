//! Format-string emit macros
//!
//! `log_info!("{} done", n)` logs through the process-wide logger;
//! `log_info!(logger: &my_logger, "{} done", n)` through a specific one.
//! Arguments are only formatted when the level passes the filter.

#[macro_export]
macro_rules! log_at {
    (logger: $logger:expr, $lvl:expr, $($arg:tt)+) => {
        $logger.log_fmt($lvl, ::core::format_args!($($arg)+))
    };
    ($lvl:expr, $($arg:tt)+) => {
        $crate::log_fmt($lvl, ::core::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_debug {
    (logger: $logger:expr, $($arg:tt)+) => { $crate::log_at!(logger: $logger, $crate::Level::Debug, $($arg)+) };
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Debug, $($arg)+) };
}

#[macro_export]
macro_rules! log_info {
    (logger: $logger:expr, $($arg:tt)+) => { $crate::log_at!(logger: $logger, $crate::Level::Info, $($arg)+) };
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Info, $($arg)+) };
}

#[macro_export]
macro_rules! log_warn {
    (logger: $logger:expr, $($arg:tt)+) => { $crate::log_at!(logger: $logger, $crate::Level::Warn, $($arg)+) };
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Warn, $($arg)+) };
}

#[macro_export]
macro_rules! log_error {
    (logger: $logger:expr, $($arg:tt)+) => { $crate::log_at!(logger: $logger, $crate::Level::Error, $($arg)+) };
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Error, $($arg)+) };
}

#[macro_export]
macro_rules! log_fatal {
    (logger: $logger:expr, $($arg:tt)+) => { $crate::log_at!(logger: $logger, $crate::Level::Fatal, $($arg)+) };
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Fatal, $($arg)+) };
}
