// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console logging is always available; file logging into timestamped run folders
//! needs the `file-logging` feature.

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingConfig};

/// `RUST_LOG` wins over the debug flags when set.
fn build_filter(debug_flags: &CrateDebugFlags) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(debug_flags.to_filter_string()))
}

fn console_layer(
    config: &LoggingConfig,
) -> Box<dyn Layer<Registry> + Send + Sync + 'static> {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(config.with_target)
        .with_thread_names(config.with_thread_names)
        .with_file(false)
        .with_line_number(false);
    match config.format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

/// Initialize console logging with the default layout.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags) -> Result<()> {
    init_logging_with_config(debug_flags, &LoggingConfig::default())
}

pub fn init_logging_with_format(debug_flags: &CrateDebugFlags, format: LogFormat) -> Result<()> {
    let config = LoggingConfig {
        format,
        ..LoggingConfig::default()
    };
    init_logging_with_config(debug_flags, &config)
}

pub fn init_logging_with_config(
    debug_flags: &CrateDebugFlags,
    config: &LoggingConfig,
) -> Result<()> {
    Registry::default()
        .with(console_layer(config).with_filter(build_filter(debug_flags)))
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}

#[cfg(feature = "file-logging")]
pub use file::{init_file_logging, LoggingGuard};

#[cfg(feature = "file-logging")]
mod file {
    use super::*;
    use anyhow::Context;
    use chrono::{NaiveDateTime, Utc};
    use std::path::{Path, PathBuf};
    use tracing_appender::rolling;

    /// Keeps the background writer alive; logs are flushed when dropped.
    pub struct LoggingGuard {
        _file_guard: tracing_appender::non_blocking::WorkerGuard,
        log_dir: PathBuf,
    }

    impl LoggingGuard {
        pub fn log_dir(&self) -> &Path {
            &self.log_dir
        }
    }

    /// Console logging plus a `gazectl.log` file in a timestamped run folder:
    /// ```text
    /// ./logs/
    ///   └── run_20250101_120000/
    ///       └── gazectl.log
    /// ```
    /// Only the newest `retention_runs` run folders (default 10) are kept.
    pub fn init_file_logging(
        debug_flags: &CrateDebugFlags,
        log_dir: Option<PathBuf>,
        retention_runs: Option<usize>,
    ) -> Result<LoggingGuard> {
        let base_log_dir = log_dir.unwrap_or_else(|| PathBuf::from("./logs"));
        let run_folder = base_log_dir.join(format!("run_{}", Utc::now().format("%Y%m%d_%H%M%S")));
        std::fs::create_dir_all(&run_folder)
            .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
        cleanup_old_runs(&base_log_dir, retention_runs.unwrap_or(10))?;

        let (non_blocking, guard) =
            tracing_appender::non_blocking(rolling::never(&run_folder, "gazectl.log"));
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_thread_names(true)
            .with_filter(build_filter(debug_flags));

        Registry::default()
            .with(console_layer(&LoggingConfig::default()).with_filter(build_filter(debug_flags)))
            .with(file_layer)
            .try_init()
            .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

        Ok(LoggingGuard {
            _file_guard: guard,
            log_dir: run_folder,
        })
    }

    fn cleanup_old_runs(base_log_dir: &Path, retention_runs: usize) -> Result<()> {
        let mut runs: Vec<(PathBuf, NaiveDateTime)> = Vec::new();
        for entry in std::fs::read_dir(base_log_dir)? {
            let path = entry?.path();
            let stamp = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_prefix("run_"))
                .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y%m%d_%H%M%S").ok());
            if let (true, Some(stamp)) = (path.is_dir(), stamp) {
                runs.push((path, stamp));
            }
        }

        runs.sort_by_key(|(_, stamp)| *stamp);
        let excess = runs.len().saturating_sub(retention_runs);
        for (path, _) in runs.into_iter().take(excess) {
            if let Err(e) = std::fs::remove_dir_all(&path) {
                tracing::warn!("Failed to remove old log directory {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

}
