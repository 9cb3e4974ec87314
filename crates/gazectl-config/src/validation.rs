// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Every problem is collected so a single error reports all of them.

use crate::{ConfigError, ConfigResult, GazeClientConfig, GazectlConfig, KNOWN_CARRIERS};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &GazectlConfig) -> ConfigResult<()> {
    let errors = validate_client_config(&config.client);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// Check the `[client]` table and return everything wrong with it.
pub fn validate_client_config(client: &GazeClientConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_prefix("client.remote", client.remote.as_deref(), &mut errors);
    validate_prefix("client.local", client.local.as_deref(), &mut errors);

    if !KNOWN_CARRIERS.contains(&client.carrier.trim().to_ascii_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "client.carrier".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                client.carrier,
                KNOWN_CARRIERS.join(", ")
            ),
        });
    }

    if !client.timeout.is_finite() || client.timeout <= 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "client.timeout".to_string(),
            reason: format!("must be a positive number of seconds, got {}", client.timeout),
        });
    }

    errors
}

fn validate_prefix(field: &str, value: Option<&str>, errors: &mut Vec<ConfigValidationError>) {
    match value {
        None => errors.push(ConfigValidationError::MissingRequired {
            field: field.to_string(),
        }),
        Some(prefix) if !prefix.starts_with('/') || prefix.len() < 2 => {
            errors.push(ConfigValidationError::InvalidValue {
                field: field.to_string(),
                reason: format!("'{}' must start with '/'", prefix),
            })
        }
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = GazectlConfig {
            client: GazeClientConfig::new("/gaze", "/app"),
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_default_config_misses_prefixes() {
        let errors = validate_client_config(&GazeClientConfig::default());
        assert_eq!(
            errors,
            vec![
                ConfigValidationError::MissingRequired {
                    field: "client.remote".to_string()
                },
                ConfigValidationError::MissingRequired {
                    field: "client.local".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_all_problems_reported() {
        let client = GazeClientConfig::new("gaze", "/app")
            .with_carrier("pigeon")
            .with_timeout(-1.0);
        let errors = validate_client_config(&client);
        assert_eq!(errors.len(), 3);

        let config = GazectlConfig { client };
        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("client.remote"));
        assert!(message.contains("client.carrier"));
        assert!(message.contains("client.timeout"));
    }
}
