// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SimbridgeConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name searched for when no path is given.
pub const CONFIG_FILE_NAME: &str = "simbridge.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SIMBRIDGE_CONFIG_PATH";

/// Find the simbridge configuration file
///
/// Search order:
/// 1. `SIMBRIDGE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./simbridge.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by {} not found: {}",
                CONFIG_PATH_ENV,
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from a TOML file and apply overrides
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SimbridgeConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SimbridgeConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Like [`load_config`], but starts from defaults when no file is found.
///
/// An explicit `config_path` that does not exist is still an error, as is a
/// file that fails to parse.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SimbridgeConfig> {
    if config_path.is_some() {
        return load_config(config_path, cli_args);
    }
    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args),
        Err(ConfigError::FileNotFound(_)) if env::var(CONFIG_PATH_ENV).is_err() => {
            let mut config = SimbridgeConfig::default();
            apply_environment_overrides(&mut config);
            if let Some(cli) = cli_args {
                apply_cli_overrides(&mut config, cli);
            }
            Ok(config)
        }
        Err(e) => Err(e),
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SIMBRIDGE_SERVER_HOST` -> `server.host`
/// - `SIMBRIDGE_SERVER_PORT` -> `server.port`
/// - `SIMBRIDGE_TEAM` -> `robot.team`
/// - `SIMBRIDGE_UNUM` -> `robot.unum`
/// - `SIMBRIDGE_KEYFRAME_DIR` -> `motion.keyframe_dir`
/// - `SIMBRIDGE_LATENCY_COMPENSATION` -> `motion.latency_compensation`
/// - `SIMBRIDGE_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut SimbridgeConfig) {
    if let Ok(value) = env::var("SIMBRIDGE_SERVER_HOST") {
        config.server.host = value;
    }
    if let Ok(value) = env::var("SIMBRIDGE_SERVER_PORT") {
        if let Ok(port) = value.parse::<u16>() {
            config.server.port = port;
        }
    }

    if let Ok(value) = env::var("SIMBRIDGE_TEAM") {
        config.robot.team = value;
    }
    if let Ok(value) = env::var("SIMBRIDGE_UNUM") {
        if let Ok(unum) = value.parse::<u8>() {
            config.robot.unum = unum;
        }
    }

    if let Ok(value) = env::var("SIMBRIDGE_KEYFRAME_DIR") {
        config.motion.keyframe_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("SIMBRIDGE_LATENCY_COMPENSATION") {
        config.motion.latency_compensation = value;
    }

    if let Ok(value) = env::var("SIMBRIDGE_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"host": "192.168.1.1", "port": "3200"}`)
pub fn apply_cli_overrides(config: &mut SimbridgeConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("host") {
        config.server.host = value.clone();
    }
    if let Some(value) = cli_args.get("port") {
        if let Ok(port) = value.parse::<u16>() {
            config.server.port = port;
        }
    }

    if let Some(value) = cli_args.get("team") {
        config.robot.team = value.clone();
    }
    if let Some(value) = cli_args.get("unum") {
        if let Ok(unum) = value.parse::<u8>() {
            config.robot.unum = unum;
        }
    }

    if let Some(value) = cli_args.get("keyframe_dir") {
        config.motion.keyframe_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("latency_compensation") {
        config.motion.latency_compensation = value.clone();
    }

    if let Some(value) = cli_args.get("behavior") {
        config.agent.behavior = value.clone();
    }
    if let Some(value) = cli_args.get("developer_sequence") {
        config.agent.developer_sequence = value.clone();
    }
    if let Some(value) = cli_args.get("max_cycles") {
        if let Ok(cycles) = value.parse::<u64>() {
            config.agent.max_cycles = cycles;
        }
    }
    if let Some(value) = cli_args.get("head_scan") {
        config.agent.head_scan = value.to_lowercase() == "true" || value == "1";
    }

    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var(CONFIG_PATH_ENV, config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var(CONFIG_PATH_ENV);

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_env_var_pointing_nowhere_is_an_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();

        env::set_var(CONFIG_PATH_ENV, dir.path().join("missing.toml"));
        let found = find_config_file();
        let loaded = load_config_or_default(None, None);
        env::remove_var(CONFIG_PATH_ENV);

        assert!(matches!(found, Err(ConfigError::FileNotFound(_))));
        assert!(loaded.is_err());
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let saved_port = env::var("SIMBRIDGE_SERVER_PORT").ok();
        env::remove_var("SIMBRIDGE_SERVER_PORT");
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[server]").unwrap();
        writeln!(file, "port = 3200").unwrap();
        writeln!(file, "[robot]").unwrap();
        writeln!(file, "unum = 7").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.server.port, 3200);
        assert_eq!(config.robot.unum, 7);
        assert_eq!(config.motion.tick_ms, 20);

        if let Some(value) = saved_port {
            env::set_var("SIMBRIDGE_SERVER_PORT", value);
        }
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[server\nport = ").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = SimbridgeConfig::default();

        env::set_var("SIMBRIDGE_SERVER_HOST", "192.168.1.100");
        env::set_var("SIMBRIDGE_SERVER_PORT", "3999");
        env::set_var("SIMBRIDGE_UNUM", "not-a-number");
        env::set_var("SIMBRIDGE_LATENCY_COMPENSATION", "previous_tick");

        apply_environment_overrides(&mut config);

        env::remove_var("SIMBRIDGE_SERVER_HOST");
        env::remove_var("SIMBRIDGE_SERVER_PORT");
        env::remove_var("SIMBRIDGE_UNUM");
        env::remove_var("SIMBRIDGE_LATENCY_COMPENSATION");

        assert_eq!(config.server.host, "192.168.1.100");
        assert_eq!(config.server.port, 3999);
        assert_eq!(config.robot.unum, 1);
        assert_eq!(config.motion.latency_compensation, "previous_tick");
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = SimbridgeConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("host".to_string(), "10.0.0.1".to_string());
        cli_args.insert("behavior".to_string(), "walk_to_ball".to_string());
        cli_args.insert("head_scan".to_string(), "true".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.server.host, "10.0.0.1");
        assert_eq!(config.agent.behavior, "walk_to_ball");
        assert!(config.agent.head_scan);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[server]").unwrap();
        writeln!(file, "host = \"file-host\"").unwrap();
        writeln!(file, "port = 3000").unwrap();

        env::set_var("SIMBRIDGE_SERVER_HOST", "env-host");
        env::set_var("SIMBRIDGE_SERVER_PORT", "3001");

        let mut cli_args = HashMap::new();
        cli_args.insert("host".to_string(), "cli-host".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();

        env::remove_var("SIMBRIDGE_SERVER_HOST");
        env::remove_var("SIMBRIDGE_SERVER_PORT");

        // CLI wins for host, env wins for port (no CLI override)
        assert_eq!(config.server.host, "cli-host");
        assert_eq!(config.server.port, 3001);
    }
}
