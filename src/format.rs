//! Record formatting
//!
//! Turns a level, a call-site descriptor and a message into the single line
//! that every sink receives. The default layout is tab separated:
//! `YYYY-MM-DD HH:MM:SS<TAB>LEVEL<TAB>path:line<TAB>message`.

use std::panic::Location;
use std::path::Path;

use chrono::Local;

use crate::level::Level;

/// Separator between the fields of the default layout
pub const FIELD_SEPARATOR: char = '\t';

/// Timestamp layout of the default formatter (local time, second precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Strategy that renders a record into its output line
pub trait Formatter: Send + Sync {
    fn format(&self, level: Level, call_site: &str, message: &str) -> String;
}

impl<F> Formatter for F
where
    F: Fn(Level, &str, &str) -> String + Send + Sync,
{
    fn format(&self, level: Level, call_site: &str, message: &str) -> String {
        self(level, call_site, message)
    }
}

/// The built-in tab-separated layout
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl Formatter for DefaultFormatter {
    fn format(&self, level: Level, call_site: &str, message: &str) -> String {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        format!(
            "{timestamp}{sep}{level}{sep}{call_site}{sep}{message}",
            sep = FIELD_SEPARATOR,
            level = level.as_str(),
        )
    }
}

/// Describe a call site as `path:line`
///
/// Absolute paths below the current working directory are shown relative to
/// it; anything else is left as the compiler recorded it.
pub fn call_site(location: &Location<'_>) -> String {
    let file = Path::new(location.file());
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| file.strip_prefix(cwd).ok().map(Path::to_path_buf));

    match relative {
        Some(path) => format!("{}:{}", path.display(), location.line()),
        None => format!("{}:{}", location.file(), location.line()),
    }
}
