// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Typed agent settings resolved from the string-based configuration.

use std::path::PathBuf;

use simbridge_config::SimbridgeConfig;
use simbridge_io::{BeamPose, RobotIdentity};
use simbridge_motion::{BuiltinSequence, LatencyCompensation};
use simbridge_observability::{LogFormat, LoggingOptions};

use crate::behavior::{Behavior, BehaviorKind, KeyframeDeveloper};
use crate::error::{AgentError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    pub host: String,
    pub port: u16,
    pub max_frame_bytes: usize,
    pub identity: RobotIdentity,
    pub pose: BeamPose,
    pub keyframe_dir: PathBuf,
    pub compensation: LatencyCompensation,
    pub behavior: BehaviorKind,
    /// Generated sequence the keyframe developer replays; `None` uses the test file.
    pub developer_sequence: Option<BuiltinSequence>,
    /// `None` runs until the simulator disconnects or the agent is stopped.
    pub max_cycles: Option<u64>,
    pub head_scan: bool,
    pub snapshot_trace: Option<PathBuf>,
}

impl AgentSettings {
    pub fn from_config(config: &SimbridgeConfig) -> Result<Self> {
        let compensation = config
            .motion
            .latency_compensation
            .parse::<LatencyCompensation>()
            .map_err(|reason| AgentError::InvalidSetting {
                field: "motion.latency_compensation",
                reason,
            })?;
        let behavior = config
            .agent
            .behavior
            .parse::<BehaviorKind>()
            .map_err(|reason| AgentError::InvalidSetting {
                field: "agent.behavior",
                reason,
            })?;
        let developer_sequence = match config.agent.developer_sequence.trim() {
            "" | "file" => None,
            name => Some(name.parse::<BuiltinSequence>().map_err(|reason| {
                AgentError::InvalidSetting {
                    field: "agent.developer_sequence",
                    reason,
                }
            })?),
        };

        Ok(AgentSettings {
            host: config.server.host.clone(),
            port: config.server.port,
            max_frame_bytes: config.server.max_frame_bytes,
            identity: RobotIdentity {
                unum: config.robot.unum,
                team: config.robot.team.clone(),
                scene: config.robot.scene.clone(),
            },
            pose: BeamPose {
                x: config.robot.beam_x,
                y: config.robot.beam_y,
                rotation: config.robot.beam_rotation,
            },
            keyframe_dir: config.motion.keyframe_dir.clone(),
            compensation,
            behavior,
            developer_sequence,
            max_cycles: (config.agent.max_cycles > 0).then_some(config.agent.max_cycles),
            head_scan: config.agent.head_scan,
            snapshot_trace: config.agent.snapshot_trace.clone(),
        })
    }

    /// The configured behavior, with its settings applied.
    pub fn build_behavior(&self) -> Box<dyn Behavior> {
        match (self.behavior, self.developer_sequence) {
            (BehaviorKind::KeyframeDeveloper, Some(builtin)) => {
                Box::new(KeyframeDeveloper::with_builtin(builtin))
            }
            (kind, _) => kind.build(),
        }
    }
}

/// Logging options for the observability layer.
pub fn logging_options(config: &SimbridgeConfig) -> Result<LoggingOptions> {
    let format = config
        .logging
        .format
        .parse::<LogFormat>()
        .map_err(|reason| AgentError::InvalidSetting {
            field: "logging.format",
            reason,
        })?;
    Ok(LoggingOptions {
        level: config.logging.level.clone(),
        format,
        log_dir: config.logging.log_dir.clone(),
        file_output: config.logging.file_output,
        ..LoggingOptions::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve() {
        let settings = AgentSettings::from_config(&SimbridgeConfig::default()).unwrap();
        assert_eq!(settings.port, 3100);
        assert_eq!(settings.identity.unum, 1);
        assert_eq!(settings.compensation, LatencyCompensation::Accumulated);
        assert_eq!(settings.behavior, BehaviorKind::Idle);
        assert_eq!(settings.max_cycles, None);
    }

    #[test]
    fn test_max_cycles_and_names() {
        let mut config = SimbridgeConfig::default();
        config.agent.max_cycles = 250;
        config.agent.behavior = "walk_to_ball".to_string();
        config.motion.latency_compensation = "previous-tick".to_string();

        let settings = AgentSettings::from_config(&config).unwrap();
        assert_eq!(settings.max_cycles, Some(250));
        assert_eq!(settings.behavior, BehaviorKind::WalkToBall);
        assert_eq!(settings.compensation, LatencyCompensation::PreviousTick);
    }

    #[test]
    fn test_unknown_behavior_is_rejected() {
        let mut config = SimbridgeConfig::default();
        config.agent.behavior = "dance".to_string();
        assert!(matches!(
            AgentSettings::from_config(&config),
            Err(AgentError::InvalidSetting {
                field: "agent.behavior",
                ..
            })
        ));
    }

    #[test]
    fn test_developer_sequence() {
        let mut config = SimbridgeConfig::default();
        config.agent.behavior = "keyframe_developer".to_string();
        let settings = AgentSettings::from_config(&config).unwrap();
        assert_eq!(settings.developer_sequence, None);

        config.agent.developer_sequence = "crouch_and_head_turn".to_string();
        let settings = AgentSettings::from_config(&config).unwrap();
        assert_eq!(
            settings.developer_sequence,
            Some(BuiltinSequence::CrouchAndHeadTurn)
        );
        assert_eq!(settings.build_behavior().name(), "keyframe_developer");

        config.agent.developer_sequence = "moonwalk".to_string();
        assert!(matches!(
            AgentSettings::from_config(&config),
            Err(AgentError::InvalidSetting {
                field: "agent.developer_sequence",
                ..
            })
        ));
    }

    #[test]
    fn test_logging_options() {
        let mut config = SimbridgeConfig::default();
        config.logging.format = "json".to_string();
        let options = logging_options(&config).unwrap();
        assert_eq!(options.format, LogFormat::Json);
        assert_eq!(options.level, "info");

        config.logging.format = "xml".to_string();
        assert!(logging_options(&config).is_err());
    }
}
