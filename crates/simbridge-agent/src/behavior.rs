// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Decision logic run once per cycle, between sensing and acting.
//!
//! A behavior only chooses motions. It must check
//! [`MotionInterpolator::ready`] before selecting, because selecting while a
//! motion is still running panics.

use std::fmt;
use std::str::FromStr;

use simbridge_motion::{posture, BuiltinSequence, GaitPhase, MotionInterpolator, MotionName};
use simbridge_sensorimotor::{EffectorOutput, LocalFieldView, SensorSnapshot};
use tracing::{debug, info};

use crate::error::Result;

/// Everything a behavior may look at or steer during one cycle.
pub struct DecisionContext<'a> {
    pub cycle: u64,
    pub snapshot: &'a SensorSnapshot,
    pub field: &'a LocalFieldView,
    pub motion: &'a mut MotionInterpolator,
    /// Lets a behavior queue a `say` message for this cycle.
    pub output: &'a mut EffectorOutput,
}

pub trait Behavior {
    fn name(&self) -> &'static str;

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Result<()>;
}

impl<B: Behavior + ?Sized> Behavior for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Result<()> {
        (**self).decide(ctx)
    }
}

/// Never selects anything; the robot only holds still (or scans its head).
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl Behavior for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn decide(&mut self, _ctx: &mut DecisionContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Cycles to hold the reached pose before replaying the test motion.
pub const DEVELOPER_PAUSE_CYCLES: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeveloperState {
    Replay,
    Pause { cycles_left: u32 },
}

/// Replays the test motion over and over so a keyframe file can be tuned
/// while the agent runs. The file is read again for every replay, unless a
/// built-in sequence replaces it.
///
/// After each replay the pose is held for [`DEVELOPER_PAUSE_CYCLES`] to see
/// whether it is stable. A fallen robot stands up first.
#[derive(Debug, Clone)]
pub struct KeyframeDeveloper {
    state: DeveloperState,
    replays: u64,
    builtin: Option<BuiltinSequence>,
}

impl KeyframeDeveloper {
    pub fn new() -> Self {
        KeyframeDeveloper {
            state: DeveloperState::Replay,
            replays: 0,
            builtin: None,
        }
    }

    /// Replay a generated sequence instead of the test file.
    pub fn with_builtin(builtin: BuiltinSequence) -> Self {
        KeyframeDeveloper {
            builtin: Some(builtin),
            ..Self::new()
        }
    }

    pub fn replays(&self) -> u64 {
        self.replays
    }
}

impl Default for KeyframeDeveloper {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for KeyframeDeveloper {
    fn name(&self) -> &'static str {
        "keyframe_developer"
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Result<()> {
        if !ctx.motion.ready() {
            return Ok(());
        }

        if posture::is_lying_down(ctx.snapshot) {
            info!(cycle = ctx.cycle, "robot fell, standing up before the next replay");
            ctx.motion.select_stand_up(ctx.snapshot)?;
            self.state = DeveloperState::Replay;
            return Ok(());
        }

        match self.state {
            DeveloperState::Replay => {
                match self.builtin {
                    Some(builtin) => ctx.motion.select(builtin.sequence()),
                    None => ctx.motion.select_motion(MotionName::Test)?,
                }
                self.replays += 1;
                debug!(cycle = ctx.cycle, replay = self.replays, "test motion started");
                self.state = DeveloperState::Pause {
                    cycles_left: DEVELOPER_PAUSE_CYCLES,
                };
            }
            DeveloperState::Pause { cycles_left: 0 } => self.state = DeveloperState::Replay,
            DeveloperState::Pause { cycles_left } => {
                self.state = DeveloperState::Pause {
                    cycles_left: cycles_left - 1,
                }
            }
        }
        Ok(())
    }
}

/// Azimuth within which the ball counts as straight ahead.
pub const BALL_AHEAD_TOLERANCE_DEG: f64 = 30.0;

/// Walks forward while the ball is straight ahead, otherwise stops and turns
/// left until it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkToBall;

impl WalkToBall {
    fn ball_ahead(field: &LocalFieldView) -> bool {
        field
            .ball_in_view()
            .is_some_and(|ball| ball.azimuth.abs() < BALL_AHEAD_TOLERANCE_DEG.to_radians())
    }
}

impl Behavior for WalkToBall {
    fn name(&self) -> &'static str {
        "walk_to_ball"
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Result<()> {
        if !ctx.motion.ready() {
            return Ok(());
        }

        if posture::is_lying_down(ctx.snapshot) {
            ctx.motion.select_stand_up(ctx.snapshot)?;
        } else if Self::ball_ahead(ctx.field) && ctx.motion.gait_phase() != GaitPhase::Fallen {
            ctx.motion.select_walk_forward()?;
        } else if ctx.motion.is_walking() {
            ctx.motion.select_stop_walking()?;
        } else {
            ctx.motion.select_motion(MotionName::TurnLeft)?;
        }
        Ok(())
    }
}

/// Built-in behaviors selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BehaviorKind {
    #[default]
    Idle,
    KeyframeDeveloper,
    WalkToBall,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 3] = [
        BehaviorKind::Idle,
        BehaviorKind::KeyframeDeveloper,
        BehaviorKind::WalkToBall,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorKind::Idle => "idle",
            BehaviorKind::KeyframeDeveloper => "keyframe_developer",
            BehaviorKind::WalkToBall => "walk_to_ball",
        }
    }

    pub fn build(self) -> Box<dyn Behavior> {
        match self {
            BehaviorKind::Idle => Box::new(Idle),
            BehaviorKind::KeyframeDeveloper => Box::new(KeyframeDeveloper::new()),
            BehaviorKind::WalkToBall => Box::new(WalkToBall),
        }
    }
}

impl FromStr for BehaviorKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        BehaviorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown behavior '{}'", s))
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
