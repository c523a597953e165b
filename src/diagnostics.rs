//! Diagnostic fallback channel
//!
//! Delivery happens on the worker thread after the emitting caller has
//! returned, so sink failures cannot be handed back to anyone. They are
//! reported here instead.

use std::io::{self, Write};

/// Destination for failures the pipeline cannot return to a caller
pub trait Diagnostics: Send + Sync {
    /// Report one failure. Must not panic and must not fail observably.
    fn report(&self, message: &str);
}

/// Writes each report as one line on the process's standard error
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrDiagnostics;

impl Diagnostics for StderrDiagnostics {
    fn report(&self, message: &str) {
        let _ = writeln!(io::stderr().lock(), "tidelog: {}", message);
    }
}

/// Forwards reports to `tracing` so the host's subscriber decides where they go
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, message: &str) {
        tracing::warn!(target: "tidelog", "{}", message);
    }
}

impl<F> Diagnostics for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}
