// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks value ranges and the closed vocabularies (log levels, behaviors)
//! before anything connects to the simulator.

use crate::{ConfigError, ConfigResult, SimbridgeConfig};

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
pub const LOG_FORMATS: [&str; 2] = ["text", "json"];
pub const BEHAVIORS: [&str; 3] = ["idle", "keyframe_developer", "walk_to_ball"];
pub const DEVELOPER_SEQUENCES: [&str; 4] = [
    "file",
    "general_range_test",
    "crouch_and_head_turn",
    "neck_yaw_min_max",
];
pub const LATENCY_COMPENSATIONS: [&str; 2] = ["accumulated", "previous_tick"];

/// The only simulation step the simulator runs at.
pub const SUPPORTED_TICK_MS: u32 = 20;
pub const MIN_FRAME_BYTES: usize = 1024;
const MAX_TEAM_NAME_LEN: usize = 20;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    OutOfRange { field: String, value: String, range: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::OutOfRange {
                field,
                value,
                range,
            } => {
                write!(f, "{} = {} is outside valid range ({})", field, value, range)
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
pub fn validate_config(config: &SimbridgeConfig) -> ConfigResult<()> {
    let errors = collect_validation_errors(config);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

/// Every validation problem in `config`, in section order.
pub fn collect_validation_errors(config: &SimbridgeConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_server(config, &mut errors);
    validate_robot(config, &mut errors);
    validate_motion(config, &mut errors);
    validate_agent(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn validate_server(config: &SimbridgeConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.server.host.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "server.host".to_string(),
        });
    }
    if config.server.port == 0 {
        errors.push(ConfigValidationError::OutOfRange {
            field: "server.port".to_string(),
            value: "0".to_string(),
            range: "1-65535".to_string(),
        });
    }
    if config.server.max_frame_bytes < MIN_FRAME_BYTES {
        errors.push(ConfigValidationError::OutOfRange {
            field: "server.max_frame_bytes".to_string(),
            value: config.server.max_frame_bytes.to_string(),
            range: format!(">= {}", MIN_FRAME_BYTES),
        });
    }
}

fn validate_robot(config: &SimbridgeConfig, errors: &mut Vec<ConfigValidationError>) {
    let team = &config.robot.team;
    if team.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "robot.team".to_string(),
        });
    } else if team.chars().count() > MAX_TEAM_NAME_LEN {
        errors.push(ConfigValidationError::InvalidValue {
            field: "robot.team".to_string(),
            reason: format!("must be at most {} characters", MAX_TEAM_NAME_LEN),
        });
    } else if team
        .chars()
        .any(|c| c.is_whitespace() || c == '(' || c == ')')
    {
        errors.push(ConfigValidationError::InvalidValue {
            field: "robot.team".to_string(),
            reason: "must not contain whitespace or parentheses".to_string(),
        });
    }

    if !(1..=11).contains(&config.robot.unum) {
        errors.push(ConfigValidationError::OutOfRange {
            field: "robot.unum".to_string(),
            value: config.robot.unum.to_string(),
            range: "1-11".to_string(),
        });
    }
    if config.robot.scene.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "robot.scene".to_string(),
        });
    }
}

fn validate_motion(config: &SimbridgeConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.motion.tick_ms != SUPPORTED_TICK_MS {
        errors.push(ConfigValidationError::InvalidValue {
            field: "motion.tick_ms".to_string(),
            reason: format!(
                "only {} is supported, got {}",
                SUPPORTED_TICK_MS, config.motion.tick_ms
            ),
        });
    }
    check_vocabulary(
        "motion.latency_compensation",
        &config.motion.latency_compensation,
        &LATENCY_COMPENSATIONS,
        errors,
    );
}

fn validate_agent(config: &SimbridgeConfig, errors: &mut Vec<ConfigValidationError>) {
    check_vocabulary("agent.behavior", &config.agent.behavior, &BEHAVIORS, errors);
    check_vocabulary(
        "agent.developer_sequence",
        &config.agent.developer_sequence,
        &DEVELOPER_SEQUENCES,
        errors,
    );
}

fn validate_logging(config: &SimbridgeConfig, errors: &mut Vec<ConfigValidationError>) {
    check_vocabulary(
        "logging.level",
        &config.logging.level.to_lowercase(),
        &LOG_LEVELS,
        errors,
    );
    check_vocabulary(
        "logging.format",
        &config.logging.format,
        &LOG_FORMATS,
        errors,
    );
}

fn check_vocabulary(
    field: &str,
    value: &str,
    allowed: &[&str],
    errors: &mut Vec<ConfigValidationError>,
) {
    if !allowed.contains(&value) {
        errors.push(ConfigValidationError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' is not one of: {}", value, allowed.join(", ")),
        });
    }
}
