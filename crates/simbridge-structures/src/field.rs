// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Landmarks and game phases as named by the simulator.

use serde::{Deserialize, Serialize};

/// Goal posts. `1` is the left team's goal, `L`/`R` the post seen from that goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GoalPostId {
    G1L,
    G1R,
    G2L,
    G2R,
}

impl GoalPostId {
    pub const ALL: [GoalPostId; 4] = [
        GoalPostId::G1L,
        GoalPostId::G1R,
        GoalPostId::G2L,
        GoalPostId::G2R,
    ];

    pub const fn wire_name(self) -> &'static str {
        match self {
            GoalPostId::G1L => "G1L",
            GoalPostId::G1R => "G1R",
            GoalPostId::G2L => "G2L",
            GoalPostId::G2R => "G2R",
        }
    }

    pub fn from_wire(name: &str) -> Option<GoalPostId> {
        Self::ALL.into_iter().find(|id| id.wire_name() == name)
    }
}

/// Corner flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlagId {
    F1L,
    F1R,
    F2L,
    F2R,
}

impl FlagId {
    pub const ALL: [FlagId; 4] = [FlagId::F1L, FlagId::F1R, FlagId::F2L, FlagId::F2R];

    pub const fn wire_name(self) -> &'static str {
        match self {
            FlagId::F1L => "F1L",
            FlagId::F1R => "F1R",
            FlagId::F2L => "F2L",
            FlagId::F2R => "F2R",
        }
    }

    pub fn from_wire(name: &str) -> Option<FlagId> {
        Self::ALL.into_iter().find(|id| id.wire_name() == name)
    }
}

/// Play mode reported in the game-state fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    BeforeKickOff,
    KickOffLeft,
    KickOffRight,
    PlayOn,
    KickInLeft,
    KickInRight,
    CornerKickLeft,
    CornerKickRight,
    GoalKickLeft,
    GoalKickRight,
    OffsideLeft,
    OffsideRight,
    GameOver,
    GoalLeft,
    GoalRight,
    FreeKickLeft,
    FreeKickRight,
    /// The simulator's explicit `None` mode.
    Unset,
}

impl PlayMode {
    pub const ALL: [PlayMode; 18] = [
        PlayMode::BeforeKickOff,
        PlayMode::KickOffLeft,
        PlayMode::KickOffRight,
        PlayMode::PlayOn,
        PlayMode::KickInLeft,
        PlayMode::KickInRight,
        PlayMode::CornerKickLeft,
        PlayMode::CornerKickRight,
        PlayMode::GoalKickLeft,
        PlayMode::GoalKickRight,
        PlayMode::OffsideLeft,
        PlayMode::OffsideRight,
        PlayMode::GameOver,
        PlayMode::GoalLeft,
        PlayMode::GoalRight,
        PlayMode::FreeKickLeft,
        PlayMode::FreeKickRight,
        PlayMode::Unset,
    ];

    /// Lower-case wire literal.
    pub const fn wire_name(self) -> &'static str {
        match self {
            PlayMode::BeforeKickOff => "beforekickoff",
            PlayMode::KickOffLeft => "kickoff_left",
            PlayMode::KickOffRight => "kickoff_right",
            PlayMode::PlayOn => "playon",
            PlayMode::KickInLeft => "kickin_left",
            PlayMode::KickInRight => "kickin_right",
            PlayMode::CornerKickLeft => "corner_kick_left",
            PlayMode::CornerKickRight => "corner_kick_right",
            PlayMode::GoalKickLeft => "goal_kick_left",
            PlayMode::GoalKickRight => "goal_kick_right",
            PlayMode::OffsideLeft => "offside_left",
            PlayMode::OffsideRight => "offside_right",
            PlayMode::GameOver => "gameover",
            PlayMode::GoalLeft => "goal_left",
            PlayMode::GoalRight => "goal_right",
            PlayMode::FreeKickLeft => "free_kick_left",
            PlayMode::FreeKickRight => "free_kick_right",
            PlayMode::Unset => "none",
        }
    }

    /// Case-insensitive lookup, the simulator mixes `BeforeKickOff` and `beforekickoff`.
    pub fn from_wire(name: &str) -> Option<PlayMode> {
        let lowered = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|mode| mode.wire_name() == lowered)
    }
}
