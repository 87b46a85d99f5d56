// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Generated sequences for checking joint ranges and interpolation on a
//! live robot.

use std::fmt;
use std::str::FromStr;

use simbridge_structures::{JointId, JointVector};

use crate::keyframe::{Keyframe, KeyframeSequence};

const SWEEP_MS: u32 = 1000;

/// Leaning the feet forward keeps the robot upright while leg joints sweep.
const LEG_SWEEP_FOOT_PITCH: f64 = -30.0;

fn limits_pose(joints: &[JointId], pick_max: bool) -> JointVector {
    let mut pose = JointVector::zeros();
    for &joint in joints {
        let (min, max) = joint.limits_degrees();
        pose[joint] = if pick_max { max } else { min };
    }
    pose
}

/// Every joint to its minimum, then every joint to its maximum.
pub fn general_range_test() -> KeyframeSequence {
    KeyframeSequence::new(vec![
        Keyframe::new(SWEEP_MS, limits_pose(&JointId::ALL, false)),
        Keyframe::new(SWEEP_MS, limits_pose(&JointId::ALL, true)),
    ])
}

pub fn crouch_and_head_turn() -> KeyframeSequence {
    let mut crouch = JointVector::zeros();
    crouch[JointId::LeftHipPitch] = 50.0;
    crouch[JointId::RightHipPitch] = 50.0;
    crouch[JointId::LeftKneePitch] = -100.0;
    crouch[JointId::RightKneePitch] = -100.0;
    crouch[JointId::LeftFootPitch] = 50.0;
    crouch[JointId::RightFootPitch] = 50.0;

    let mut turn_head = JointVector::zeros();
    turn_head[JointId::NeckYaw] = 30.0;

    KeyframeSequence::new(vec![
        Keyframe::new(700, crouch),
        Keyframe::new(100, turn_head),
    ])
}

/// Sweep `joints` to their minimum and hold, then to their maximum and hold.
///
/// Leg joints are swept with the feet pitched forward first.
pub fn range_sweep(joints: &[JointId]) -> KeyframeSequence {
    let min = limits_pose(joints, false);
    let max = limits_pose(joints, true);
    let mut frames = Vec::with_capacity(5);

    if joints.iter().any(|joint| is_leg_joint(*joint)) {
        let mut lean = JointVector::zeros();
        lean[JointId::LeftFootPitch] = LEG_SWEEP_FOOT_PITCH;
        lean[JointId::RightFootPitch] = LEG_SWEEP_FOOT_PITCH;
        frames.push(Keyframe::new(SWEEP_MS, lean));
    }
    frames.push(Keyframe::new(SWEEP_MS, min));
    frames.push(Keyframe::new(SWEEP_MS, min));
    frames.push(Keyframe::new(SWEEP_MS, max));
    frames.push(Keyframe::new(SWEEP_MS, max));
    KeyframeSequence::new(frames)
}

pub fn neck_yaw_min_max() -> KeyframeSequence {
    range_sweep(&[JointId::NeckYaw])
}

/// The generated sequences, selectable by name in place of the test file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinSequence {
    GeneralRangeTest,
    CrouchAndHeadTurn,
    NeckYawMinMax,
}

impl BuiltinSequence {
    pub const ALL: [BuiltinSequence; 3] = [
        BuiltinSequence::GeneralRangeTest,
        BuiltinSequence::CrouchAndHeadTurn,
        BuiltinSequence::NeckYawMinMax,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuiltinSequence::GeneralRangeTest => "general_range_test",
            BuiltinSequence::CrouchAndHeadTurn => "crouch_and_head_turn",
            BuiltinSequence::NeckYawMinMax => "neck_yaw_min_max",
        }
    }

    pub fn sequence(self) -> KeyframeSequence {
        match self {
            BuiltinSequence::GeneralRangeTest => general_range_test(),
            BuiltinSequence::CrouchAndHeadTurn => crouch_and_head_turn(),
            BuiltinSequence::NeckYawMinMax => neck_yaw_min_max(),
        }
    }
}

impl FromStr for BuiltinSequence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        BuiltinSequence::ALL
            .into_iter()
            .find(|builtin| builtin.as_str() == normalized)
            .ok_or_else(|| format!("unknown built-in sequence '{}'", s))
    }
}

impl fmt::Display for BuiltinSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_leg_joint(joint: JointId) -> bool {
    use JointId::*;
    matches!(
        joint,
        LeftHipYawPitch
            | LeftHipRoll
            | LeftHipPitch
            | LeftKneePitch
            | LeftFootPitch
            | LeftFootRoll
            | RightHipYawPitch
            | RightHipRoll
            | RightHipPitch
            | RightKneePitch
            | RightFootPitch
            | RightFootRoll
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_range_hits_limits() {
        let sequence = general_range_test();
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.frames()[0].targets[JointId::LeftKneePitch], -130.0);
        assert_eq!(sequence.frames()[1].targets[JointId::NeckYaw], 120.0);
    }

    #[test]
    fn test_crouch_then_head() {
        let sequence = crouch_and_head_turn();
        assert_eq!(sequence.frames()[0].duration_ms, 700);
        assert_eq!(sequence.frames()[0].targets[JointId::RightKneePitch], -100.0);
        assert_eq!(sequence.frames()[1].duration_ms, 100);
        assert_eq!(sequence.frames()[1].targets[JointId::NeckYaw], 30.0);
    }

    #[test]
    fn test_neck_sweep_has_four_frames() {
        let sequence = neck_yaw_min_max();
        assert_eq!(sequence.len(), 4);
        assert_eq!(sequence.frames()[1].targets[JointId::NeckYaw], -120.0);
        assert_eq!(sequence.frames()[2].targets[JointId::NeckYaw], 120.0);
        assert_eq!(sequence.frames()[2].targets[JointId::NeckPitch], 0.0);
    }

    #[test]
    fn test_builtin_names() {
        for builtin in BuiltinSequence::ALL {
            assert_eq!(builtin.as_str().parse::<BuiltinSequence>(), Ok(builtin));
            assert!(!builtin.sequence().is_empty());
        }
        assert_eq!(
            "Neck-Yaw-Min-Max".parse::<BuiltinSequence>(),
            Ok(BuiltinSequence::NeckYawMinMax)
        );
        assert!("file".parse::<BuiltinSequence>().is_err());
    }

    #[test]
    fn test_leg_sweep_leans_first() {
        let sequence = range_sweep(&[JointId::LeftKneePitch, JointId::RightKneePitch]);
        assert_eq!(sequence.len(), 5);
        assert_eq!(sequence.frames()[0].targets[JointId::LeftFootPitch], -30.0);
    }
}
