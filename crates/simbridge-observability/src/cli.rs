//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-simbridge-io`, `--debug-simbridge-motion`, etc.
//! to raise a single crate to debug level.

use std::collections::HashMap;
use std::env;

use crate::KNOWN_CRATES;

/// Environment variable holding comma-separated crate names, or `all`.
pub const DEBUG_ENV: &str = "SIMBRIDGE_DEBUG";

/// Parse debug flags from command-line arguments
///
/// # Example
/// ```rust
/// use simbridge_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-simbridge-io".to_string()]);
/// assert!(flags.is_enabled("simbridge-io"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}` pattern.
    /// Also supports `--debug-all` to enable all crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();

        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
                continue;
            }

            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enable(crate_name);
            }
        }

        flags
    }

    /// Merge a `SIMBRIDGE_DEBUG` style value: `all` or comma-separated names.
    pub fn merge_env_value(&mut self, value: &str) {
        if value.trim() == "all" {
            self.enable_all();
            return;
        }
        for crate_name in value.split(',') {
            let crate_name = crate_name.trim();
            if !crate_name.is_empty() {
                self.enable(crate_name);
            }
        }
    }

    pub fn enable(&mut self, crate_name: &str) {
        self.enabled_crates.insert(crate_name.to_string(), true);
    }

    fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enable(crate_name);
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    /// Get all enabled crates, sorted
    pub fn enabled_crates(&self) -> Vec<&String> {
        let mut names: Vec<&String> = self.enabled_crates.keys().collect();
        names.sort();
        names
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Get log level filter for a crate
    ///
    /// Returns `tracing::Level::DEBUG` if enabled, `tracing::Level::INFO` otherwise.
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Create a tracing filter from debug flags with `info` as the default level
    pub fn to_filter_string(&self) -> String {
        self.to_filter_string_with_default("info")
    }

    /// Create a tracing filter from debug flags
    ///
    /// Tracing targets use the library name, so hyphens become underscores.
    /// Format: "simbridge_io=debug,simbridge_motion=debug,warn" or just the default level.
    pub fn to_filter_string_with_default(&self, default_level: &str) -> String {
        let mut filters: Vec<String> = self
            .enabled_crates()
            .into_iter()
            .map(|crate_name| format!("{}=debug", crate_name.replace('-', "_")))
            .collect();
        filters.push(default_level.to_string());
        filters.join(",")
    }
}

/// Helper function to parse debug flags from the process
///
/// Checks both command-line arguments and the `SIMBRIDGE_DEBUG` environment variable.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());

    if let Ok(env_var) = env::var(DEBUG_ENV) {
        flags.merge_env_value(&env_var);
    }

    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  SIMBRIDGE_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  SIMBRIDGE_DEBUG=all                               Enable debug for all crates

Examples:
  --debug-simbridge-io
  --debug-simbridge-io --debug-simbridge-motion
  SIMBRIDGE_DEBUG=simbridge-io,simbridge-motion
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-simbridge-io".to_string()]);
        assert!(flags.is_enabled("simbridge-io"));
        assert!(!flags.is_enabled("simbridge-motion"));
    }

    #[test]
    fn test_ignores_other_arguments() {
        let flags = CrateDebugFlags::from_args(vec![
            "simbridge-agent".to_string(),
            "--port".to_string(),
            "3100".to_string(),
        ]);
        assert!(!flags.any_enabled());
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_env_value() {
        let mut flags = CrateDebugFlags::default();
        flags.merge_env_value(" simbridge-io , ,simbridge-motion");
        assert_eq!(
            flags.enabled_crates(),
            vec!["simbridge-io", "simbridge-motion"]
        );
    }

    #[test]
    fn test_filter_string_uses_targets() {
        let flags = CrateDebugFlags::from_args(vec![
            "--debug-simbridge-motion".to_string(),
            "--debug-simbridge-io".to_string(),
        ]);
        assert_eq!(
            flags.to_filter_string_with_default("warn"),
            "simbridge_io=debug,simbridge_motion=debug,warn"
        );
        assert_eq!(CrateDebugFlags::default().to_filter_string(), "info");
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-simbridge-io".to_string()]);
        assert_eq!(flags.log_level("simbridge-io"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("simbridge-motion"), tracing::Level::INFO);
    }

    #[test]
    fn test_help_lists_crates() {
        let help = debug_flags_help();
        for crate_name in KNOWN_CRATES {
            assert!(help.contains(crate_name));
        }
    }
}
