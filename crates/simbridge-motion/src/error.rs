// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::catalogue::MotionName;
use crate::interpolator::GaitPhase;
use crate::keyframe_file::KeyframeFileError;

/// Errors from selecting a motion.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error("motion {0} is not in the catalogue")]
    UnknownMotion(MotionName),

    #[error("cannot {action} while gait phase is {phase:?}")]
    InvalidGaitPhase {
        action: &'static str,
        phase: GaitPhase,
    },

    #[error(transparent)]
    KeyframeFile(#[from] KeyframeFileError),
}

pub type Result<T> = std::result::Result<T, MotionError>;
