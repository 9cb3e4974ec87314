//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-gazectl-client` or `--debug-all`.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Per-crate debug switches.
///
/// # Example
/// ```rust
/// use gazectl_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-gazectl-io".to_string()]);
/// assert!(flags.is_enabled("gazectl-io"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Looks for arguments matching `--debug-{crate-name}`; `--debug-all` enables every
    /// known crate.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();
        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
            } else if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enable(crate_name);
            }
        }
        flags
    }

    /// Comma-separated crate names, or `all`.
    pub fn from_env_value(value: &str) -> Self {
        let mut flags = CrateDebugFlags::default();
        flags.merge_env_value(value);
        flags
    }

    fn merge_env_value(&mut self, value: &str) {
        if value.trim() == "all" {
            self.enable_all();
            return;
        }
        for crate_name in value.split(',').map(str::trim) {
            if !crate_name.is_empty() {
                self.enable(crate_name);
            }
        }
    }

    pub fn enable(&mut self, crate_name: &str) {
        self.enabled_crates.insert(crate_name.to_string());
    }

    pub fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enable(crate_name);
        }
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// `DEBUG` if enabled, `INFO` otherwise.
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Filter string for `EnvFilter`, e.g. `gazectl_client=debug,info`.
    ///
    /// Tracing targets are module paths, so crate names are written with underscores.
    pub fn to_filter_string(&self) -> String {
        let mut filters: Vec<String> = self
            .enabled_crates
            .iter()
            .map(|crate_name| format!("{}=debug", crate_name.replace('-', "_")))
            .collect();
        filters.push("info".to_string());
        filters.join(",")
    }
}

/// Debug flags from the command line plus the `GAZECTL_DEBUG` environment variable.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(value) = env::var("GAZECTL_DEBUG") {
        flags.merge_env_value(&value);
    }
    flags
}

pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  GAZECTL_DEBUG={{crate-name}}[,{{crate-name}}]
  GAZECTL_DEBUG=all
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-gazectl-io".to_string()]);
        assert!(flags.is_enabled("gazectl-io"));
        assert!(!flags.is_enabled("gazectl-client"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec![
            "gazectl-demo".to_string(),
            "--debug-all".to_string(),
        ]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_env_value() {
        let flags = CrateDebugFlags::from_env_value(" gazectl-client , ,gazectl-io");
        assert!(flags.is_enabled("gazectl-client"));
        assert!(flags.is_enabled("gazectl-io"));
        assert_eq!(flags.enabled_crates.len(), 2);
    }

    #[test]
    fn test_filter_string() {
        assert_eq!(CrateDebugFlags::default().to_filter_string(), "info");

        let flags = CrateDebugFlags::from_args(vec![
            "--debug-gazectl-io".to_string(),
            "--debug-gazectl-client".to_string(),
        ]);
        assert_eq!(
            flags.to_filter_string(),
            "gazectl_client=debug,gazectl_io=debug,info"
        );
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-gazectl-client".to_string()]);
        assert_eq!(flags.log_level("gazectl-client"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("gazectl-io"), tracing::Level::INFO);
    }
}
