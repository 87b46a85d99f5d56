// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for simbridge
//!
//! Console logging is always available. With `file-logging` each run also
//! gets its own folder of JSON log files with configurable retention.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingOptions};

/// Logging initialization result
///
/// Dropping the guard flushes any buffered file output.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving log files, if file output is active
    pub fn log_dir(&self) -> Option<&std::path::Path> {
        self.log_dir.as_deref()
    }
}

/// Build the filter shared by every layer
pub fn build_filter(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<EnvFilter> {
    let filter = debug_flags.to_filter_string_with_default(&options.level.to_lowercase());
    EnvFilter::try_new(&filter).with_context(|| format!("Invalid log filter: {}", filter))
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer {
    match format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter)
            .boxed(),
    }
}

/// Initialize console-only logging
pub fn init_console_logging(
    debug_flags: &CrateDebugFlags,
    options: &LoggingOptions,
) -> Result<LoggingGuard> {
    let filter = build_filter(debug_flags, options)?;

    Registry::default()
        .with(console_layer(options.format, filter))
        .try_init()
        .context("Failed to install the global tracing subscriber")?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: Vec::new(),
        log_dir: None,
    })
}

/// Initialize logging according to `options`
///
/// Falls back to console-only output when file output is requested but the
/// crate was built without `file-logging`.
pub fn init_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<LoggingGuard> {
    if options.file_output {
        #[cfg(feature = "file-logging")]
        return init_file_logging(debug_flags, options);

        #[cfg(not(feature = "file-logging"))]
        {
            let guard = init_console_logging(debug_flags, options)?;
            tracing::warn!("File logging requested but not compiled in; logging to console only");
            return Ok(guard);
        }
    }
    init_console_logging(debug_flags, options)
}

/// Initialize logging with file output and console output
///
/// Creates a timestamped folder structure:
/// ```text
/// ./logs/
///   └── run_20250101_120000/
///       ├── simbridge-io.log
///       ├── simbridge-motion.log
///       └── simbridge.log (combined)
/// ```
#[cfg(feature = "file-logging")]
pub fn init_file_logging(
    debug_flags: &CrateDebugFlags,
    options: &LoggingOptions,
) -> Result<LoggingGuard> {
    use tracing_appender::rolling;

    let now = chrono::Utc::now();
    let run_folder = options
        .log_dir
        .join(crate::retention::run_folder_name(now));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    crate::retention::cleanup_old_logs(
        &options.log_dir,
        options.retention_days,
        options.retention_runs,
        now,
    )?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut file_guards = Vec::new();

    layers.push(console_layer(
        options.format,
        build_filter(debug_flags, options)?,
    ));

    // File layers - one per crate
    for crate_name in crate::KNOWN_CRATES {
        let file_appender = rolling::never(&run_folder, format!("{}.log", crate_name));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        file_guards.push(guard);

        let target = crate_name.replace('-', "_");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(EnvFilter::try_new(format!("off,{}=debug", target))?)
            .boxed();
        layers.push(file_layer);
    }

    // Combined log file (all crates)
    let combined_appender = rolling::never(&run_folder, "simbridge.log");
    let (combined_non_blocking, combined_guard) = tracing_appender::non_blocking(combined_appender);
    file_guards.push(combined_guard);

    layers.push(
        tracing_subscriber::fmt::layer()
            .with_writer(combined_non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(build_filter(debug_flags, options)?)
            .boxed(),
    );

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install the global tracing subscriber")?;

    Ok(LoggingGuard {
        _file_guards: file_guards,
        log_dir: Some(run_folder),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_levels() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-simbridge-io".to_string()]);
        for level in ["trace", "debug", "INFO", "warn", "error"] {
            let options = LoggingOptions {
                level: level.to_string(),
                ..LoggingOptions::default()
            };
            assert!(build_filter(&flags, &options).is_ok(), "{}", level);
        }
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        let options = LoggingOptions {
            level: "simbridge_io=loud".to_string(),
            ..LoggingOptions::default()
        };
        assert!(build_filter(&CrateDebugFlags::default(), &options).is_err());
    }
}
