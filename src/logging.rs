//! Logging setup for the `hoverdoc` binary
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! caller's business. The binary builds a [`LogConfig`] from the environment,
//! applies command-line overrides and calls [`init_logging`].

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level filter environment variable
pub const ENV_LEVEL: &str = "RUST_LOG";
/// Log file environment variable
pub const ENV_FILE: &str = "HOVERDOC_LOG_FILE";
/// Set to `true` to suffix the log file name with the process id
pub const ENV_UNIQUE: &str = "HOVERDOC_LOG_UNIQUE";
/// Set to `true` for JSON log lines
pub const ENV_JSON: &str = "HOVERDOC_LOG_JSON";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `hoverdoc::docs=debug`
    pub level: String,
    /// Log file; stderr when `None`
    pub file_path: Option<PathBuf>,
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            json_format: false,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Configuration from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = |name: &str| lookup(name).is_some_and(|value| value == "true");

        let file_path = lookup(ENV_FILE).map(PathBuf::from).map(|path| {
            if enabled(ENV_UNIQUE) {
                with_pid(&path, std::process::id())
            } else {
                path
            }
        });

        Self {
            level: lookup(ENV_LEVEL).unwrap_or_else(|| "info".to_string()),
            file_path,
            json_format: enabled(ENV_JSON),
        }
    }

    /// Apply command-line values on top of the environment
    pub fn with_overrides(mut self, level: Option<String>, file_path: Option<PathBuf>) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        if file_path.is_some() {
            self.file_path = file_path;
        }
        self
    }
}

/// `dir/name.ext` → `dir/name.<pid>.ext`
fn with_pid(path: &Path, pid: u32) -> PathBuf {
    let Some(stem) = path.file_stem() else {
        return path.to_path_buf();
    };
    let name = match path.extension() {
        Some(ext) => format!(
            "{}.{}.{}",
            stem.to_string_lossy(),
            pid,
            ext.to_string_lossy()
        ),
        None => format!("{}.{}", stem.to_string_lossy(), pid),
    };
    path.with_file_name(name)
}

/// Install the global subscriber described by `config`
///
/// An invalid level directive falls back to `info`.
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_new(&config.level).or_else(|_| EnvFilter::try_new("info"))?;
    let registry = tracing_subscriber::registry().with(env_filter);

    match (&config.file_path, config.json_format) {
        (Some(file_path), json) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;
            if json {
                registry
                    .with(fmt::layer().json().with_writer(file).with_ansi(false))
                    .try_init()?;
            } else {
                registry
                    .with(
                        fmt::layer()
                            .with_writer(file)
                            .with_ansi(false)
                            .with_target(true)
                            .with_line_number(true),
                    )
                    .try_init()?;
            }
        }
        (None, true) => {
            registry
                .with(fmt::layer().json().with_writer(io::stderr).with_ansi(false))
                .try_init()?;
        }
        (None, false) => {
            registry
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .try_init()?;
        }
    }

    Ok(())
}

/// Emit a structured timing event for `operation`
#[macro_export]
macro_rules! log_timing {
    ($level:expr, $operation:expr, $duration:expr) => {
        tracing::event!(
            $level,
            operation = $operation,
            duration_ms = $duration.as_millis(),
            "Performance timing"
        );
    };
}
