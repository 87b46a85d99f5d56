// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The 22-joint humanoid model.
//!
//! Joint order matches the wire order used by the simulator and by keyframe
//! files. Each joint is reported by a hinge perceptor (`hj1`, `laj3`, ...) and
//! commanded through an effector with the same suffix (`he1`, `lae3`, ...).

use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::SimbridgeDataError;

/// Number of controllable joints on the robot.
pub const JOINT_COUNT: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JointId {
    NeckYaw,
    NeckPitch,
    LeftShoulderPitch,
    LeftShoulderYaw,
    LeftArmRoll,
    LeftArmYaw,
    LeftHipYawPitch,
    LeftHipRoll,
    LeftHipPitch,
    LeftKneePitch,
    LeftFootPitch,
    LeftFootRoll,
    RightHipYawPitch,
    RightHipRoll,
    RightHipPitch,
    RightKneePitch,
    RightFootPitch,
    RightFootRoll,
    RightShoulderPitch,
    RightShoulderYaw,
    RightArmRoll,
    RightArmYaw,
}

const PERCEPTOR_IDS: [&str; JOINT_COUNT] = [
    "hj1", "hj2", "laj1", "laj2", "laj3", "laj4", "llj1", "llj2", "llj3", "llj4", "llj5", "llj6",
    "rlj1", "rlj2", "rlj3", "rlj4", "rlj5", "rlj6", "raj1", "raj2", "raj3", "raj4",
];

const EFFECTOR_IDS: [&str; JOINT_COUNT] = [
    "he1", "he2", "lae1", "lae2", "lae3", "lae4", "lle1", "lle2", "lle3", "lle4", "lle5", "lle6",
    "rle1", "rle2", "rle3", "rle4", "rle5", "rle6", "rae1", "rae2", "rae3", "rae4",
];

const MAX_DEGREES: [f64; JOINT_COUNT] = [
    120.0, 45.0, 120.0, 95.0, 120.0, 1.0, 1.0, 45.0, 100.0, 1.0, 75.0, 25.0, 1.0, 25.0, 100.0, 1.0,
    75.0, 45.0, 120.0, 1.0, 120.0, 90.0,
];

const MIN_DEGREES: [f64; JOINT_COUNT] = [
    -120.0, -45.0, -120.0, -1.0, -120.0, -90.0, -90.0, -25.0, -25.0, -130.0, -45.0, -45.0, -90.0,
    -45.0, -25.0, -130.0, -45.0, -25.0, -120.0, -95.0, -120.0, -1.0,
];

impl JointId {
    /// All joints in wire order.
    pub const ALL: [JointId; JOINT_COUNT] = [
        JointId::NeckYaw,
        JointId::NeckPitch,
        JointId::LeftShoulderPitch,
        JointId::LeftShoulderYaw,
        JointId::LeftArmRoll,
        JointId::LeftArmYaw,
        JointId::LeftHipYawPitch,
        JointId::LeftHipRoll,
        JointId::LeftHipPitch,
        JointId::LeftKneePitch,
        JointId::LeftFootPitch,
        JointId::LeftFootRoll,
        JointId::RightHipYawPitch,
        JointId::RightHipRoll,
        JointId::RightHipPitch,
        JointId::RightKneePitch,
        JointId::RightFootPitch,
        JointId::RightFootRoll,
        JointId::RightShoulderPitch,
        JointId::RightShoulderYaw,
        JointId::RightArmRoll,
        JointId::RightArmYaw,
    ];

    /// Position of the joint in wire order.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<JointId> {
        Self::ALL.get(index).copied()
    }

    /// Name of the hinge perceptor reporting this joint's angle.
    pub const fn perceptor_id(self) -> &'static str {
        PERCEPTOR_IDS[self as usize]
    }

    /// Name of the effector accepting velocity commands for this joint.
    pub const fn effector_id(self) -> &'static str {
        EFFECTOR_IDS[self as usize]
    }

    pub fn from_perceptor_id(id: &str) -> Option<JointId> {
        PERCEPTOR_IDS
            .iter()
            .position(|candidate| *candidate == id)
            .and_then(Self::from_index)
    }

    pub fn from_effector_id(id: &str) -> Option<JointId> {
        EFFECTOR_IDS
            .iter()
            .position(|candidate| *candidate == id)
            .and_then(Self::from_index)
    }

    /// Mechanical range of the joint as `(min, max)` in degrees.
    pub const fn limits_degrees(self) -> (f64, f64) {
        (MIN_DEGREES[self as usize], MAX_DEGREES[self as usize])
    }

    /// Joint on the opposite body side and the sign to apply when mirroring a pose.
    ///
    /// Roll and yaw axes flip direction when a motion is mirrored, pitch axes
    /// keep it. Neck joints mirror onto themselves.
    pub const fn mirror(self) -> (JointId, f64) {
        use JointId::*;
        match self {
            NeckYaw => (NeckYaw, -1.0),
            NeckPitch => (NeckPitch, 1.0),
            LeftShoulderPitch => (RightShoulderPitch, 1.0),
            LeftShoulderYaw => (RightShoulderYaw, -1.0),
            LeftArmRoll => (RightArmRoll, -1.0),
            LeftArmYaw => (RightArmYaw, -1.0),
            LeftHipYawPitch => (RightHipYawPitch, 1.0),
            LeftHipRoll => (RightHipRoll, -1.0),
            LeftHipPitch => (RightHipPitch, 1.0),
            LeftKneePitch => (RightKneePitch, 1.0),
            LeftFootPitch => (RightFootPitch, 1.0),
            LeftFootRoll => (RightFootRoll, -1.0),
            RightHipYawPitch => (LeftHipYawPitch, 1.0),
            RightHipRoll => (LeftHipRoll, -1.0),
            RightHipPitch => (LeftHipPitch, 1.0),
            RightKneePitch => (LeftKneePitch, 1.0),
            RightFootPitch => (LeftFootPitch, 1.0),
            RightFootRoll => (LeftFootRoll, -1.0),
            RightShoulderPitch => (LeftShoulderPitch, 1.0),
            RightShoulderYaw => (LeftShoulderYaw, -1.0),
            RightArmRoll => (LeftArmRoll, -1.0),
            RightArmYaw => (LeftArmYaw, -1.0),
        }
    }
}

impl Display for JointId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One `f64` per joint, indexed by [`JointId`].
///
/// Used for sensed angles (radians), keyframe targets (degrees) and velocity
/// commands (radians per second); the unit is defined by the owner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointVector([f64; JOINT_COUNT]);

impl JointVector {
    pub const fn zeros() -> Self {
        JointVector([0.0; JOINT_COUNT])
    }

    pub const fn from_array(values: [f64; JOINT_COUNT]) -> Self {
        JointVector(values)
    }

    pub fn from_slice(values: &[f64]) -> Result<Self, SimbridgeDataError> {
        let array: [f64; JOINT_COUNT] =
            values
                .try_into()
                .map_err(|_| SimbridgeDataError::WrongJointCount {
                    expected: JOINT_COUNT,
                    found: values.len(),
                })?;
        Ok(JointVector(array))
    }

    pub fn as_array(&self) -> &[f64; JOINT_COUNT] {
        &self.0
    }

    pub fn get(&self, joint: JointId) -> f64 {
        self.0[joint.index()]
    }

    pub fn set(&mut self, joint: JointId, value: f64) {
        self.0[joint.index()] = value;
    }

    /// `(joint, value)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (JointId, f64)> + '_ {
        JointId::ALL.iter().map(move |joint| (*joint, self.0[joint.index()]))
    }

    pub fn is_all_zero(&self) -> bool {
        self.0.iter().all(|value| *value == 0.0)
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> JointVector {
        JointVector(self.0.map(f))
    }

    /// Left/right mirrored copy, see [`JointId::mirror`].
    pub fn mirrored(&self) -> JointVector {
        let mut out = JointVector::zeros();
        for joint in JointId::ALL {
            let (source, sign) = joint.mirror();
            out.set(joint, sign * self.get(source));
        }
        out
    }
}

impl Index<JointId> for JointVector {
    type Output = f64;

    fn index(&self, joint: JointId) -> &f64 {
        &self.0[joint.index()]
    }
}

impl IndexMut<JointId> for JointVector {
    fn index_mut(&mut self, joint: JointId) -> &mut f64 {
        &mut self.0[joint.index()]
    }
}

impl From<[f64; JOINT_COUNT]> for JointVector {
    fn from(values: [f64; JOINT_COUNT]) -> Self {
        JointVector(values)
    }
}

/// Named parts of another robot's body that vision can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyPart {
    Head,
    RightLowerArm,
    LeftLowerArm,
    RightFoot,
    LeftFoot,
}

impl BodyPart {
    pub const ALL: [BodyPart; 5] = [
        BodyPart::Head,
        BodyPart::RightLowerArm,
        BodyPart::LeftLowerArm,
        BodyPart::RightFoot,
        BodyPart::LeftFoot,
    ];

    pub const fn wire_name(self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::RightLowerArm => "rlowerarm",
            BodyPart::LeftLowerArm => "llowerarm",
            BodyPart::RightFoot => "rfoot",
            BodyPart::LeftFoot => "lfoot",
        }
    }

    pub fn from_wire(name: &str) -> Option<BodyPart> {
        Self::ALL.into_iter().find(|part| part.wire_name() == name)
    }
}
