// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-cycle sensor state.

use std::collections::BTreeMap;

use serde::Serialize;
use simbridge_structures::{BodyPart, DVec3, FlagId, GoalPostId, JointVector, PlayMode, PolarCoordinate};

/// Foot pressure sensor: point of contact and force vector, both in the foot frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForceReading {
    pub contact: DVec3,
    pub force: DVec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineDetection {
    pub start: PolarCoordinate,
    pub end: PolarCoordinate,
}

/// Another robot seen this cycle.
///
/// Team and id are optional on the wire; body parts are keyed by their wire
/// name so parts this crate does not know still come through.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlayerDetection {
    pub team: Option<String>,
    pub id: Option<String>,
    pub body_parts: BTreeMap<String, PolarCoordinate>,
}

impl PlayerDetection {
    pub fn body_part(&self, part: BodyPart) -> Option<&PolarCoordinate> {
        self.body_parts.get(part.wire_name())
    }
}

/// Everything reported by one `See` fragment. Camera relative, head pose not applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VisionFrame {
    pub ball: Option<PolarCoordinate>,
    pub goal_posts: BTreeMap<GoalPostId, PolarCoordinate>,
    pub flags: BTreeMap<FlagId, PolarCoordinate>,
    pub lines: Vec<LineDetection>,
    pub players: Vec<PlayerDetection>,
}

impl VisionFrame {
    pub fn goal_post(&self, id: GoalPostId) -> Option<&PolarCoordinate> {
        self.goal_posts.get(&id)
    }

    pub fn flag(&self, id: FlagId) -> Option<&PolarCoordinate> {
        self.flags.get(&id)
    }
}

/// A `say` message from another agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeardMessage {
    /// Game time at which the message was spoken.
    pub time: f64,
    /// Direction of the speaker in radians.
    pub direction: f64,
    /// Sender team, only sent by newer simulator versions.
    pub team: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GameState {
    /// Elapsed play time in seconds.
    pub play_time: f64,
    /// `None` when the simulator reported a mode this crate does not know.
    pub play_mode: Option<PlayMode>,
}

/// Decoded state of one simulation cycle.
///
/// Built fresh every cycle. Optional fields are `None` when the cycle did not
/// report them (or reported garbage); only `joint_angles` carries the last
/// known value forward.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SensorSnapshot {
    /// Simulator clock in seconds.
    pub server_time: Option<f64>,
    /// Hinge joint angles in radians.
    pub joint_angles: JointVector,
    /// Torso angular velocity in degrees per second.
    pub gyro: Option<DVec3>,
    /// Torso acceleration in m/s², gravity included.
    pub accelerometer: Option<DVec3>,
    pub left_foot: Option<ForceReading>,
    pub right_foot: Option<ForceReading>,
    /// Vision is only sent every third cycle.
    pub vision: Option<VisionFrame>,
    /// Messages of other agents; the agent's own broadcasts are dropped.
    pub heard: Vec<HeardMessage>,
    pub game_state: Option<GameState>,
}

impl SensorSnapshot {
    /// Snapshot with only the carried-forward joint angles set.
    pub fn with_joint_angles(joint_angles: JointVector) -> Self {
        SensorSnapshot {
            joint_angles,
            ..SensorSnapshot::default()
        }
    }

    pub fn ball(&self) -> Option<&PolarCoordinate> {
        self.vision.as_ref().and_then(|vision| vision.ball.as_ref())
    }
}
