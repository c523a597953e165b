//! Active log file resolution and size-based rotation
//!
//! One file per calendar day lives at `<dir>/<YYYY-MM-DD>.<ext>`. When the next
//! record would push it past the size limit, the file is renamed to
//! `<dir>/<YYYY-MM-DD>.<ext>.<N>` with `N` one past the highest existing
//! generation, and writing continues on a fresh primary file.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{LogError, Result};

/// Date layout used in log file names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Primary log file path for `date`
pub fn daily_path(dir: &Path, extension: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.{}", date.format(DATE_FORMAT), extension))
}

/// Resolve the file the next record of `record_len` bytes should be appended to
///
/// Rotates the current file aside first if appending would exceed `max_size`.
/// A missing limit means files grow without bound.
pub fn resolve_path(
    dir: &Path,
    extension: &str,
    date: NaiveDate,
    record_len: u64,
    max_size: Option<u64>,
) -> Result<PathBuf> {
    let path = daily_path(dir, extension, date);

    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(path),
        Err(source) => return Err(LogError::Io { path, source }),
    };

    let fits = match max_size {
        None => true,
        Some(limit) => metadata.len().saturating_add(record_len) <= limit,
    };
    if fits {
        return Ok(path);
    }

    let next = max_generation(&path)?
        .checked_add(1)
        .ok_or_else(|| LogError::BadGeneration {
            path: generation_path(&path, u64::MAX),
        })?;
    let rotated = generation_path(&path, next);
    fs::rename(&path, &rotated).map_err(|source| LogError::Rename {
        from: path.clone(),
        to: rotated.clone(),
        source,
    })?;

    tracing::debug!(target: "tidelog", "Rotated {} to {}", path.display(), rotated.display());

    Ok(path)
}

/// Path of rotated generation `n` of `path`
pub fn generation_path(path: &Path, n: u64) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{}", n));
    PathBuf::from(name)
}

/// Highest rotation generation present next to `path`, or 0 if none
///
/// Every sibling named `<file>.<suffix>` must carry a numeric suffix; anything
/// else aborts rotation so an unexpected file is never clobbered.
pub fn max_generation(path: &Path) -> Result<u64> {
    let Some(dir) = path.parent() else {
        return Ok(0);
    };
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(0);
    };
    let prefix = format!("{}.", file_name);

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(LogError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut max = 0;
    for entry in entries {
        let entry = entry.map_err(|source| LogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name();
        let Some(suffix) = name.to_str().and_then(|n| n.strip_prefix(&prefix)) else {
            continue;
        };

        let generation: u64 = suffix
            .parse()
            .map_err(|_| LogError::BadGeneration { path: entry.path() })?;
        max = max.max(generation);
    }

    Ok(max)
}
