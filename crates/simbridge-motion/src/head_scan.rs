// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Continuous head scan driven by neck velocities rather than keyframes.

use std::f64::consts::PI;

use simbridge_sensorimotor::ActuatorSink;
use simbridge_structures::{JointId, JointVector};
use tracing::trace;

/// Neck speed in rad/s.
pub const SCAN_VELOCITY: f64 = PI;

const DOWN_PITCH_DEG: f64 = -40.0;
const SIDE_YAW_DEG: f64 = 54.0;
const CENTER_TOLERANCE_DEG: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Down,
    CenterFromDown,
    Left,
    Right,
    CenterFromRight,
}

/// Looks down, back up, left, right and back to center, forever.
#[derive(Debug, Clone, Default)]
pub struct HeadScan {
    phase: ScanPhase,
}

impl HeadScan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Command the neck for this cycle given the sensed joint angles (radians).
    ///
    /// Only the joint the current phase moves is written; a phase switch
    /// without a stop command leaves the neck coasting for one cycle.
    pub fn drive<S: ActuatorSink + ?Sized>(&mut self, sensed: &JointVector, sink: &mut S) {
        let yaw = sensed[JointId::NeckYaw].to_degrees();
        let pitch = sensed[JointId::NeckPitch].to_degrees();
        let previous = self.phase;

        match self.phase {
            ScanPhase::Down => {
                if pitch <= DOWN_PITCH_DEG {
                    self.phase = ScanPhase::CenterFromDown;
                } else {
                    sink.set_joint_velocity(JointId::NeckPitch, -SCAN_VELOCITY);
                }
            }
            ScanPhase::CenterFromDown => {
                if pitch.abs() <= CENTER_TOLERANCE_DEG {
                    sink.set_joint_velocity(JointId::NeckPitch, 0.0);
                    self.phase = ScanPhase::Left;
                } else {
                    sink.set_joint_velocity(JointId::NeckPitch, SCAN_VELOCITY);
                }
            }
            ScanPhase::Left => {
                if yaw >= SIDE_YAW_DEG {
                    self.phase = ScanPhase::Right;
                } else {
                    sink.set_joint_velocity(JointId::NeckYaw, SCAN_VELOCITY);
                }
            }
            ScanPhase::Right => {
                if yaw <= -SIDE_YAW_DEG {
                    self.phase = ScanPhase::CenterFromRight;
                } else {
                    sink.set_joint_velocity(JointId::NeckYaw, -SCAN_VELOCITY);
                }
            }
            ScanPhase::CenterFromRight => {
                if yaw.abs() <= CENTER_TOLERANCE_DEG {
                    sink.set_joint_velocity(JointId::NeckYaw, 0.0);
                    self.phase = ScanPhase::Down;
                } else {
                    sink.set_joint_velocity(JointId::NeckYaw, SCAN_VELOCITY);
                }
            }
        }

        if previous != self.phase {
            trace!(from = ?previous, to = ?self.phase, yaw, pitch, "head scan phase");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simbridge_sensorimotor::EffectorOutput;

    fn neck(yaw_deg: f64, pitch_deg: f64) -> JointVector {
        let mut angles = JointVector::zeros();
        angles[JointId::NeckYaw] = yaw_deg.to_radians();
        angles[JointId::NeckPitch] = pitch_deg.to_radians();
        angles
    }

    #[test]
    fn test_full_cycle() {
        let mut scan = HeadScan::new();
        let mut out = EffectorOutput::new();

        scan.drive(&neck(0.0, 0.0), &mut out);
        assert_eq!(out.pending_velocity(JointId::NeckPitch), Some(-PI));
        out.clear();

        scan.drive(&neck(0.0, -41.0), &mut out);
        assert_eq!(scan.phase(), ScanPhase::CenterFromDown);
        scan.drive(&neck(0.0, -20.0), &mut out);
        assert_eq!(out.pending_velocity(JointId::NeckPitch), Some(PI));

        scan.drive(&neck(0.0, -4.0), &mut out);
        assert_eq!(out.pending_velocity(JointId::NeckPitch), Some(0.0));
        assert_eq!(scan.phase(), ScanPhase::Left);

        scan.drive(&neck(10.0, 0.0), &mut out);
        assert_eq!(out.pending_velocity(JointId::NeckYaw), Some(PI));
        scan.drive(&neck(55.0, 0.0), &mut out);
        assert_eq!(scan.phase(), ScanPhase::Right);
        scan.drive(&neck(20.0, 0.0), &mut out);
        assert_eq!(out.pending_velocity(JointId::NeckYaw), Some(-PI));
        scan.drive(&neck(-55.0, 0.0), &mut out);
        assert_eq!(scan.phase(), ScanPhase::CenterFromRight);
        scan.drive(&neck(-30.0, 0.0), &mut out);
        assert_eq!(out.pending_velocity(JointId::NeckYaw), Some(PI));
        scan.drive(&neck(3.0, 0.0), &mut out);
        assert_eq!(out.pending_velocity(JointId::NeckYaw), Some(0.0));
        assert_eq!(scan.phase(), ScanPhase::Down);
    }
}
