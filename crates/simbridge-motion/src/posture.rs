// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Posture estimation from the torso accelerometer.

use simbridge_sensorimotor::SensorSnapshot;

use crate::catalogue::MotionName;

/// Vertical acceleration (m/s²) below which the torso is no longer upright.
pub const LYING_DOWN_THRESHOLD: f64 = 7.0;

/// True when gravity no longer points mostly along the torso axis.
///
/// A cycle without accelerometer data never counts as lying down.
pub fn is_lying_down(snapshot: &SensorSnapshot) -> bool {
    snapshot
        .accelerometer
        .is_some_and(|acc| acc.z < LYING_DOWN_THRESHOLD)
}

pub fn lies_on_back(snapshot: &SensorSnapshot) -> bool {
    snapshot.accelerometer.is_some_and(|acc| acc.y > 0.0)
}

/// Recovery motion for a fallen robot: stand up directly from the back,
/// otherwise roll over onto the back first.
pub fn stand_up_motion(snapshot: &SensorSnapshot) -> MotionName {
    if lies_on_back(snapshot) {
        MotionName::StandUpFromBack
    } else {
        MotionName::RollOverToBack
    }
}
