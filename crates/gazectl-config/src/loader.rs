// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Resolution order: TOML file, then environment variables, then CLI arguments.

use crate::{ConfigError, ConfigResult, GazectlConfig, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the gazectl configuration file
///
/// Search order:
/// 1. `GAZECTL_CONFIG_PATH` environment variable
/// 2. Current working directory: `./gazectl.toml`
/// 3. Up to five parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("GAZECTL_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by GAZECTL_CONFIG_PATH not found: {}",
            path.display()
        )));
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

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\n\
         Set GAZECTL_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file and apply overrides.
///
/// * `config_path` - Optional path to the config file. If `None`, the file is searched for.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns an error if the file is not found or contains invalid TOML. Values are not
/// validated here; see [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<GazectlConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: GazectlConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `GAZECTL_REMOTE` -> `client.remote`
/// - `GAZECTL_LOCAL` -> `client.local`
/// - `GAZECTL_CARRIER` -> `client.carrier`
/// - `GAZECTL_TIMEOUT` -> `client.timeout`
/// - `GAZECTL_RPC_TIMEOUT_MS` -> `client.rpc_timeout_ms`
///
/// Unparseable numeric values are ignored.
pub fn apply_environment_overrides(config: &mut GazectlConfig) {
    let overrides: HashMap<String, String> = [
        ("remote", "GAZECTL_REMOTE"),
        ("local", "GAZECTL_LOCAL"),
        ("carrier", "GAZECTL_CARRIER"),
        ("timeout", "GAZECTL_TIMEOUT"),
        ("rpc_timeout_ms", "GAZECTL_RPC_TIMEOUT_MS"),
    ]
    .iter()
    .filter_map(|(key, var)| env::var(var).ok().map(|value| (key.to_string(), value)))
    .collect();

    apply_cli_overrides(config, &overrides);
}

/// Apply CLI argument overrides to configuration
///
/// Recognized keys: `remote`, `local`, `carrier`, `timeout`, `rpc_timeout_ms`.
pub fn apply_cli_overrides(config: &mut GazectlConfig, cli_args: &HashMap<String, String>) {
    let client = &mut config.client;
    if let Some(value) = cli_args.get("remote") {
        client.remote = Some(value.clone());
    }
    if let Some(value) = cli_args.get("local") {
        client.local = Some(value.clone());
    }
    if let Some(value) = cli_args.get("carrier") {
        client.carrier = value.clone();
    }
    if let Some(value) = cli_args.get("timeout") {
        if let Ok(timeout) = value.parse::<f64>() {
            client.timeout = timeout;
        }
    }
    if let Some(value) = cli_args.get("rpc_timeout_ms") {
        if let Ok(ms) = value.parse::<u64>() {
            client.rpc_timeout_ms = ms;
        }
    }
}
