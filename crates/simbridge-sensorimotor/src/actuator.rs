// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Outbound side: collects joint velocity commands for one cycle and renders
//! the effector message.

use simbridge_serialization::{render_effector_message, SayMessage};
use simbridge_structures::{JointId, JointVector, JOINT_COUNT};
use tracing::warn;

/// Receiver of per-cycle joint commands.
pub trait ActuatorSink {
    /// Command a joint velocity in radians per second. A later call for the
    /// same joint within the cycle replaces the earlier one.
    fn set_joint_velocity(&mut self, joint: JointId, velocity: f64);

    fn set_joint_velocities(&mut self, velocities: &JointVector) {
        for (joint, velocity) in velocities.iter() {
            self.set_joint_velocity(joint, velocity);
        }
    }

    /// Render everything commanded this cycle and reset for the next one.
    fn flush(&mut self) -> String;
}

/// Default sink producing `(he1 0.5)(lae3 -0.1)..(say hi)(syn)` messages.
#[derive(Debug, Clone, Default)]
pub struct EffectorOutput {
    pending: [Option<f64>; JOINT_COUNT],
    say: Option<SayMessage>,
}

impl EffectorOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a broadcast for this cycle.
    pub fn say(&mut self, message: SayMessage) {
        self.say = Some(message);
    }

    pub fn pending_velocity(&self, joint: JointId) -> Option<f64> {
        self.pending[joint.index()]
    }

    pub fn clear(&mut self) {
        self.pending = [None; JOINT_COUNT];
        self.say = None;
    }
}

impl ActuatorSink for EffectorOutput {
    fn set_joint_velocity(&mut self, joint: JointId, velocity: f64) {
        let velocity = if velocity.is_finite() {
            velocity
        } else {
            warn!(%joint, velocity, "non-finite joint velocity replaced by 0");
            0.0
        };
        self.pending[joint.index()] = Some(velocity);
    }

    fn flush(&mut self) -> String {
        let commands = JointId::ALL
            .iter()
            .filter_map(|joint| self.pending[joint.index()].map(|velocity| (*joint, velocity)));
        let message = render_effector_message(commands, self.say.as_ref());
        self.clear();
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cycle_is_just_sync() {
        let mut output = EffectorOutput::new();
        assert_eq!(output.flush(), "(syn)");
    }

    #[test]
    fn test_last_command_wins_and_flush_resets() {
        let mut output = EffectorOutput::new();
        output.set_joint_velocity(JointId::NeckYaw, 1.0);
        output.set_joint_velocity(JointId::NeckYaw, -0.5);
        assert_eq!(output.pending_velocity(JointId::NeckYaw), Some(-0.5));

        let message = output.flush();
        assert!(message.contains("(he1 -0.5)"));
        assert!(message.ends_with("(syn)"));
        assert_eq!(output.pending_velocity(JointId::NeckYaw), None);
        assert_eq!(output.flush(), "(syn)");
    }

    #[test]
    fn test_non_finite_velocity_becomes_zero() {
        let mut output = EffectorOutput::new();
        output.set_joint_velocity(JointId::RightKneePitch, f64::NAN);
        assert_eq!(output.pending_velocity(JointId::RightKneePitch), Some(0.0));
    }

    #[test]
    fn test_say_is_emitted_once() {
        let mut output = EffectorOutput::new();
        output.say(SayMessage::new("hello").unwrap());
        assert!(output.flush().contains("(say hello)"));
        assert!(!output.flush().contains("say"));
    }
}
