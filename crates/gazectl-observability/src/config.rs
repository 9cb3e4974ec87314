//! Logging configuration types

use serde::{Deserialize, Serialize};

/// Console output layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-field human readable lines
    #[default]
    Text,
    /// Single-line abbreviated output
    Compact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Include the event target (module path) in each line
    pub with_target: bool,
    /// Include the emitting thread name, useful to tell event delivery apart from callers
    pub with_thread_names: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            format: LogFormat::Text,
            with_target: false,
            with_thread_names: true,
        }
    }
}
