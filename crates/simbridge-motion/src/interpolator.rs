// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Keyframe interpolation
//!
//! Replays a [`KeyframeSequence`] as one joint-velocity vector per cycle. Each
//! keyframe of `d` milliseconds spans `d / 20` ticks; every tick but the last
//! commands the velocity that covers an equal share of the remaining angle, so
//! the robot arrives when the keyframe's time runs out.
//!
//! Joint angles reported by the simulator lag one cycle behind the commands.
//! The angle already commanded since the keyframe started is added to the
//! sensed angle before computing what is still needed; [`LatencyCompensation`]
//! selects how that commanded angle is tracked.
//!
//! ```text
//!  select() ──► Loading ──next frame──► Executing ──all zero──► Loading
//!                  │                        ▲  │
//!                  └─ exhausted ─► Idle      └──┘ non-zero velocity
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use simbridge_sensorimotor::{ActuatorSink, SensorSnapshot};
use simbridge_structures::{JointId, JointVector, CYCLE_MS};
use tracing::{debug, trace};

use crate::catalogue::{MotionCatalogue, MotionName};
use crate::error::{MotionError, Result};
use crate::keyframe::{Keyframe, KeyframeSequence};
use crate::posture;

/// How the angle commanded during the current keyframe is accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyCompensation {
    /// Sum of every tick's share since the keyframe started.
    #[default]
    Accumulated,
    /// Only the share commanded on the previous tick, matching a simulator
    /// whose joint readings trail the commands by exactly one cycle.
    PreviousTick,
}

impl FromStr for LatencyCompensation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "accumulated" => Ok(LatencyCompensation::Accumulated),
            "previous_tick" => Ok(LatencyCompensation::PreviousTick),
            other => Err(format!(
                "unknown latency compensation '{}', expected 'accumulated' or 'previous_tick'",
                other
            )),
        }
    }
}

/// Which leg leads in the walk cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GaitPhase {
    #[default]
    Standing,
    LeftLegForward,
    RightLegForward,
    Fallen,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum MotionState {
    /// Ready for a new selection.
    #[default]
    Idle,
    /// The next keyframe of `sequence` starts on the next tick.
    Loading { sequence: KeyframeSequence },
    /// Mid-keyframe; the last tick commanded a non-zero velocity.
    Executing {
        sequence: KeyframeSequence,
        keyframe: Keyframe,
        ticks_remaining: u32,
    },
}

/// Closed-loop keyframe player with a busy/ready state machine.
///
/// Callers must check [`ready`](Self::ready) before selecting a new motion;
/// interrupting a running motion is a programming error and panics.
#[derive(Debug, Clone)]
pub struct MotionInterpolator {
    catalogue: MotionCatalogue,
    state: MotionState,
    compensation: LatencyCompensation,
    /// Degrees commanded so far in the current keyframe, per joint.
    delivered: JointVector,
    /// Degrees still needed as computed on the latest tick, per joint.
    remaining: JointVector,
    gait: GaitPhase,
}

impl MotionInterpolator {
    pub fn new(catalogue: MotionCatalogue) -> Self {
        MotionInterpolator {
            catalogue,
            state: MotionState::Idle,
            compensation: LatencyCompensation::default(),
            delivered: JointVector::zeros(),
            remaining: JointVector::zeros(),
            gait: GaitPhase::Standing,
        }
    }

    pub fn with_latency_compensation(mut self, compensation: LatencyCompensation) -> Self {
        self.compensation = compensation;
        self
    }

    pub fn catalogue(&self) -> &MotionCatalogue {
        &self.catalogue
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn ready(&self) -> bool {
        matches!(self.state, MotionState::Idle)
    }

    pub fn gait_phase(&self) -> GaitPhase {
        self.gait
    }

    pub fn is_walking(&self) -> bool {
        matches!(
            self.gait,
            GaitPhase::LeftLegForward | GaitPhase::RightLegForward
        )
    }

    /// Angle still needed per joint in degrees, as of the latest tick.
    pub fn remaining_angles(&self) -> &JointVector {
        &self.remaining
    }

    /// Start replaying `sequence` from its first keyframe.
    ///
    /// # Panics
    ///
    /// Panics when a motion is still running.
    pub fn select(&mut self, sequence: KeyframeSequence) {
        assert!(
            self.ready(),
            "motion selected while the previous motion is still running"
        );
        trace!(frames = sequence.len(), "motion selected");
        self.state = MotionState::Loading {
            sequence: sequence.rewound(),
        };
    }

    /// Select a motion from the catalogue by name.
    ///
    /// Walk steps, falls and standing up move the gait phase along with the
    /// motion. A walk motion that does not fit the current phase is refused
    /// and nothing changes.
    ///
    /// # Panics
    ///
    /// Panics when a motion is still running.
    pub fn select_motion(&mut self, name: MotionName) -> Result<()> {
        let next_gait = gait_transition(name, self.gait)?;
        let sequence = self.catalogue.sequence(name)?;
        self.select(sequence);
        debug!(motion = %name, "motion started");
        if let Some(phase) = next_gait {
            self.gait = phase;
        }
        Ok(())
    }

    /// Next half step of the walk: the first step from standing, then
    /// alternating left and right.
    pub fn select_walk_forward(&mut self) -> Result<()> {
        let motion = match self.gait {
            GaitPhase::Standing => MotionName::WalkBegin,
            GaitPhase::LeftLegForward => MotionName::WalkLeftStep,
            GaitPhase::RightLegForward => MotionName::WalkRightStep,
            phase => {
                return Err(MotionError::InvalidGaitPhase {
                    action: "walk forward",
                    phase,
                })
            }
        };
        self.select_motion(motion)
    }

    /// Bring the trailing leg alongside and return to standing.
    pub fn select_stop_walking(&mut self) -> Result<()> {
        let motion = match self.gait {
            GaitPhase::LeftLegForward => MotionName::WalkLeftEnd,
            GaitPhase::RightLegForward => MotionName::WalkRightEnd,
            phase => {
                return Err(MotionError::InvalidGaitPhase {
                    action: "stop walking",
                    phase,
                })
            }
        };
        self.select_motion(motion)
    }

    /// Pick the recovery motion for the robot's current orientation.
    pub fn select_stand_up(&mut self, snapshot: &SensorSnapshot) -> Result<()> {
        self.select_motion(posture::stand_up_motion(snapshot))
    }

    /// Mark the gait as fallen when the robot is lying down between motions.
    pub fn refresh_posture(&mut self, snapshot: &SensorSnapshot) {
        if self.ready() && posture::is_lying_down(snapshot) && self.gait != GaitPhase::Fallen {
            debug!(previous = ?self.gait, "robot is lying down");
            self.gait = GaitPhase::Fallen;
        }
    }

    /// Advance one cycle and return the joint velocities in rad/s.
    ///
    /// Returns the zero vector when idle. `sensed` holds joint angles in
    /// radians as reported this cycle.
    pub fn advance(&mut self, sensed: &JointVector) -> JointVector {
        self.tick(sensed).unwrap_or_default()
    }

    /// Advance one cycle and write the velocities to `sink`. Nothing is
    /// written when no keyframe was executed. Returns whether one was.
    pub fn drive<S: ActuatorSink + ?Sized>(&mut self, sensed: &JointVector, sink: &mut S) -> bool {
        match self.tick(sensed) {
            Some(velocities) => {
                sink.set_joint_velocities(&velocities);
                true
            }
            None => false,
        }
    }

    fn tick(&mut self, sensed: &JointVector) -> Option<JointVector> {
        match std::mem::take(&mut self.state) {
            MotionState::Idle => None,
            MotionState::Loading { mut sequence } => match sequence.next_frame() {
                Some(keyframe) => {
                    self.delivered = JointVector::zeros();
                    let ticks = keyframe.ticks();
                    trace!(duration_ms = keyframe.duration_ms, ticks, "keyframe started");
                    Some(self.execute(sequence, keyframe, ticks, sensed))
                }
                None => {
                    debug!("motion finished");
                    None
                }
            },
            MotionState::Executing {
                sequence,
                keyframe,
                ticks_remaining,
            } => Some(self.execute(sequence, keyframe, ticks_remaining, sensed)),
        }
    }

    fn execute(
        &mut self,
        sequence: KeyframeSequence,
        keyframe: Keyframe,
        ticks: u32,
        sensed: &JointVector,
    ) -> JointVector {
        let mut velocities = JointVector::zeros();

        if ticks > 1 {
            let shares = f64::from(ticks - 1);
            for joint in JointId::ALL {
                let need = keyframe.targets[joint] - (sensed[joint].to_degrees() + self.delivered[joint]);
                let this_tick = need / shares;
                velocities[joint] = this_tick.to_radians() / f64::from(CYCLE_MS) * 1000.0;
                self.remaining[joint] = need;
                match self.compensation {
                    LatencyCompensation::Accumulated => self.delivered[joint] += this_tick,
                    LatencyCompensation::PreviousTick => self.delivered[joint] = this_tick,
                }
            }
        }

        self.state = if velocities.is_all_zero() {
            MotionState::Loading { sequence }
        } else {
            MotionState::Executing {
                sequence,
                keyframe,
                ticks_remaining: ticks.saturating_sub(1),
            }
        };
        velocities
    }
}

/// Gait phase after starting `name` from `phase`; `None` leaves it as is.
///
/// The split walk (begin, steps, ends) is only valid in the phase it was
/// recorded for. The single-sequence walk and its stop start from standing
/// feet and are not tracked step by step.
fn gait_transition(name: MotionName, phase: GaitPhase) -> Result<Option<GaitPhase>> {
    let (action, required, next) = match name {
        MotionName::WalkBegin => ("begin walking", GaitPhase::Standing, Some(GaitPhase::LeftLegForward)),
        MotionName::WalkLeftStep => (
            "step with the right leg",
            GaitPhase::LeftLegForward,
            Some(GaitPhase::RightLegForward),
        ),
        MotionName::WalkRightStep => (
            "step with the left leg",
            GaitPhase::RightLegForward,
            Some(GaitPhase::LeftLegForward),
        ),
        MotionName::WalkLeftEnd => ("end a left step", GaitPhase::LeftLegForward, Some(GaitPhase::Standing)),
        MotionName::WalkRightEnd => ("end a right step", GaitPhase::RightLegForward, Some(GaitPhase::Standing)),
        MotionName::WalkForward => ("walk a full cycle", GaitPhase::Standing, None),
        MotionName::StopWalking => ("stop a full walk cycle", GaitPhase::Standing, None),
        MotionName::FallBack | MotionName::FallForward => return Ok(Some(GaitPhase::Fallen)),
        MotionName::StandUpFromBack => return Ok(Some(GaitPhase::Standing)),
        _ => return Ok(None),
    };
    if phase == required {
        Ok(next)
    } else {
        Err(MotionError::InvalidGaitPhase { action, phase })
    }
}
