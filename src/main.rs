use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tidelog::{Level, LogConfig, TracingDiagnostics};

/// Environment variable pointing at an alternative configuration file
const CONFIG_ENV: &str = "TIDELOG_CONFIG";

fn main() -> Result<()> {
    // Facility diagnostics go to stderr, independent of the configured sinks
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tidelog=warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config_path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(LogConfig::default_path);
    let mut config = LogConfig::load(&config_path)?;

    // Never be silent: with no file and no syslog, echo to the console
    if config.directory.is_none() && config.syslog_tag.is_none() {
        config.stdout = true;
    }

    let logger = config.build()?;
    logger.set_diagnostics(TracingDiagnostics);
    if tidelog::init(logger).is_err() {
        anyhow::bail!("logger already initialized");
    }

    let level = std::env::args()
        .nth(1)
        .map(|name| Level::from_name(&name))
        .unwrap_or(Level::Info);

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        tidelog::log(level, &line);
    }

    tidelog::flush();
    Ok(())
}
