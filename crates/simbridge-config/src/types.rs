// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to one section of `simbridge.toml`. Every field has a
//! default, so a file only needs the values it changes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimbridgeConfig {
    pub server: ServerConfig,
    pub robot: RobotConfig,
    pub motion: MotionConfig,
    pub agent: AgentConfig,
    pub logging: LoggingConfig,
}

/// Simulator connection
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest inbound frame accepted before the connection is treated as corrupt.
    pub max_frame_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3100,
            max_frame_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Robot identity and kick-off pose
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RobotConfig {
    pub team: String,
    /// Player number, 1-11.
    pub unum: u8,
    /// Robot model description loaded by the simulator.
    pub scene: String,
    pub beam_x: f64,
    pub beam_y: f64,
    /// Facing direction in degrees, counterclockwise from the x axis.
    pub beam_rotation: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            team: "SimBridge".to_string(),
            unum: 1,
            scene: "rsg/agent/nao/nao.rsg".to_string(),
            beam_x: -1.0,
            beam_y: 0.0,
            beam_rotation: 0.0,
        }
    }
}

/// Keyframe motion settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionConfig {
    pub keyframe_dir: PathBuf,
    /// `accumulated` or `previous_tick`
    pub latency_compensation: String,
    /// Simulator step; only 20 is supported.
    pub tick_ms: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            keyframe_dir: PathBuf::from("keyframes"),
            latency_compensation: "accumulated".to_string(),
            tick_ms: 20,
        }
    }
}

/// Agent loop settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Cycles to run after the handshake; 0 runs until the simulator disconnects.
    pub max_cycles: u64,
    /// Sweep the head continuously while the behavior runs.
    pub head_scan: bool,
    /// `idle`, `keyframe_developer` or `walk_to_ball`
    pub behavior: String,
    /// What `keyframe_developer` replays: `file` (the test keyframe file) or
    /// `general_range_test`, `crouch_and_head_turn`, `neck_yaw_min_max`
    pub developer_sequence: String,
    /// Write every decoded snapshot as a JSON line to this file.
    pub snapshot_trace: Option<PathBuf>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_cycles: 0,
            head_scan: false,
            behavior: "idle".to_string(),
            developer_sequence: "file".to_string(),
            snapshot_trace: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
    pub log_dir: PathBuf,
    /// Also write logs to per-run folders under `log_dir`.
    pub file_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            log_dir: PathBuf::from("logs"),
            file_output: false,
        }
    }
}
