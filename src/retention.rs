//! Log file retention management
//!
//! Handles cleanup of old log files based on age.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};

use crate::diagnostics::Diagnostics;

/// How often the background sweeper scans the log directory
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Remove files directly under `logs_dir` last modified more than `ttl` ago
///
/// Subdirectories are left alone. A file that cannot be inspected or removed
/// is reported to `diagnostics` and skipped. Returns the number of files deleted.
pub fn sweep(logs_dir: &Path, ttl: Duration, diagnostics: &dyn Diagnostics) -> Result<usize> {
    sweep_before(logs_dir, cutoff(SystemTime::now(), ttl), diagnostics)
}

fn cutoff(now: SystemTime, ttl: Duration) -> SystemTime {
    now.checked_sub(ttl).unwrap_or(SystemTime::UNIX_EPOCH)
}

fn sweep_before(logs_dir: &Path, cutoff: SystemTime, diagnostics: &dyn Diagnostics) -> Result<usize> {
    if !logs_dir.exists() {
        return Ok(0);
    }

    let entries = fs::read_dir(logs_dir)
        .with_context(|| format!("Failed to read log directory {}", logs_dir.display()))?;

    let mut deleted_count = 0;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read log directory {}", logs_dir.display()))?;
        let path = entry.path();

        let modified = match fs::metadata(&path).and_then(|m| {
            if m.is_dir() {
                Ok(None)
            } else {
                m.modified().map(Some)
            }
        }) {
            Ok(Some(modified)) => modified,
            Ok(None) => continue,
            Err(e) => {
                diagnostics.report(&format!("Can't inspect log file {}: {}", path.display(), e));
                continue;
            }
        };

        if modified >= cutoff {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(target: "tidelog", "Removed expired log file {}", path.display());
                deleted_count += 1;
            }
            Err(e) => {
                diagnostics.report(&format!("Can't remove old log file {}: {}", path.display(), e));
            }
        }
    }

    Ok(deleted_count)
}
