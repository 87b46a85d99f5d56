// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # simbridge-motion
//!
//! Turns recorded poses into per-cycle joint velocities.
//!
//! - [`Keyframe`] / [`KeyframeSequence`]: target poses with durations
//! - [`keyframe_file`]: the plain-text keyframe format
//! - [`MotionCatalogue`]: named motions loaded from a keyframe directory
//! - [`MotionInterpolator`]: closed-loop replay with a busy/ready state machine and walk gait
//! - [`HeadScan`]: velocity-driven look-around
//!
//! ```rust
//! use simbridge_motion::{Keyframe, KeyframeSequence, MotionCatalogue, MotionInterpolator};
//! use simbridge_structures::{JointId, JointVector};
//!
//! let mut target = JointVector::zeros();
//! target[JointId::NeckYaw] = 45.0;
//!
//! let mut motion = MotionInterpolator::new(MotionCatalogue::new());
//! motion.select(KeyframeSequence::new(vec![Keyframe::new(500, target)]));
//!
//! let sensed = JointVector::zeros();
//! let velocities = motion.advance(&sensed);
//! assert!(velocities[JointId::NeckYaw] > 0.0);
//! assert!(!motion.ready());
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod catalogue;
mod error;
mod head_scan;
mod interpolator;
mod keyframe;
pub mod keyframe_file;
pub mod posture;
pub mod test_sequences;

pub use catalogue::{MotionCatalogue, MotionName};
pub use error::{MotionError, Result};
pub use head_scan::{HeadScan, ScanPhase, SCAN_VELOCITY};
pub use interpolator::{GaitPhase, LatencyCompensation, MotionInterpolator, MotionState};
pub use keyframe::{Keyframe, KeyframeSequence};
pub use test_sequences::BuiltinSequence;
pub use keyframe_file::{
    format_keyframes, load_keyframe_file, parse_keyframes, save_keyframe_file, KeyframeFileError,
};
