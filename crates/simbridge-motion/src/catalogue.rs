// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Named motions and the keyframe files they are recorded in.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MotionError, Result};
use crate::keyframe::KeyframeSequence;
use crate::keyframe_file::{load_keyframe_file, KeyframeFileError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionName {
    StandUpFromBack,
    RollOverToBack,
    FallBack,
    FallForward,
    /// Full walk cycle in a single sequence.
    WalkForward,
    WalkBegin,
    WalkLeftStep,
    WalkRightStep,
    WalkLeftEnd,
    WalkRightEnd,
    StopWalking,
    TurnLeft,
    TurnRight,
    TurnLeftSmall,
    TurnRightSmall,
    SideStepLeft,
    SideStepRight,
    TurnHeadLeft,
    TurnHeadRight,
    TurnHeadDown,
    Wave,
    Kick,
    /// Scratch motion for keyframe development, re-read on every selection.
    Test,
}

impl MotionName {
    pub const ALL: [MotionName; 23] = [
        MotionName::StandUpFromBack,
        MotionName::RollOverToBack,
        MotionName::FallBack,
        MotionName::FallForward,
        MotionName::WalkForward,
        MotionName::WalkBegin,
        MotionName::WalkLeftStep,
        MotionName::WalkRightStep,
        MotionName::WalkLeftEnd,
        MotionName::WalkRightEnd,
        MotionName::StopWalking,
        MotionName::TurnLeft,
        MotionName::TurnRight,
        MotionName::TurnLeftSmall,
        MotionName::TurnRightSmall,
        MotionName::SideStepLeft,
        MotionName::SideStepRight,
        MotionName::TurnHeadLeft,
        MotionName::TurnHeadRight,
        MotionName::TurnHeadDown,
        MotionName::Wave,
        MotionName::Kick,
        MotionName::Test,
    ];

    /// Keyframe file name inside the keyframe directory.
    pub const fn file_name(self) -> &'static str {
        match self {
            MotionName::StandUpFromBack => "stand_up_from_back.txt",
            MotionName::RollOverToBack => "roll_over_to_back.txt",
            MotionName::FallBack => "nika_fall_back.txt",
            MotionName::FallForward => "fall_forward.txt",
            MotionName::WalkForward => "walk_forward-flemming-nika.txt",
            MotionName::WalkBegin => "walk_forward-begin.txt",
            MotionName::WalkLeftStep => "walk_forward-left.txt",
            MotionName::WalkRightStep => "walk_forward-right.txt",
            MotionName::WalkLeftEnd => "walk_forward-left-end.txt",
            MotionName::WalkRightEnd => "walk_forward-right-end.txt",
            MotionName::StopWalking => "nika_stop_walking.txt",
            MotionName::TurnLeft => "turn-left-nika.txt",
            MotionName::TurnRight => "turn-right-nika.txt",
            MotionName::TurnLeftSmall => "turn-left-small-nika.txt",
            MotionName::TurnRightSmall => "turn-right-small-nika.txt",
            MotionName::SideStepLeft => "side-step-left-kika.txt",
            MotionName::SideStepRight => "side-step-right-kika.txt",
            MotionName::TurnHeadLeft => "turn-head-left.txt",
            MotionName::TurnHeadRight => "turn-head-right.txt",
            MotionName::TurnHeadDown => "turn-head-down.txt",
            MotionName::Wave => "wave_nika.txt",
            MotionName::Kick => "kick_the_ball.txt",
            MotionName::Test => "test.txt",
        }
    }
}

impl Display for MotionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Immutable set of named keyframe sequences.
///
/// Selecting hands out a rewound copy, the catalogue itself never changes.
/// The one exception is [`MotionName::Test`], which is read from disk again
/// on every lookup when the catalogue knows its file.
#[derive(Debug, Clone, Default)]
pub struct MotionCatalogue {
    sequences: HashMap<MotionName, KeyframeSequence>,
    test_file: Option<PathBuf>,
}

impl MotionCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every named motion found in `dir`.
    ///
    /// Missing files are skipped with a warning, selecting such a motion later
    /// fails with [`MotionError::UnknownMotion`]. A file that exists but does
    /// not parse is an error.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> std::result::Result<Self, KeyframeFileError> {
        let dir = dir.as_ref();
        let mut sequences = HashMap::new();

        for name in MotionName::ALL {
            if name == MotionName::Test {
                continue;
            }
            let path = dir.join(name.file_name());
            if !path.is_file() {
                warn!(motion = %name, path = %path.display(), "keyframe file not found, motion unavailable");
                continue;
            }
            sequences.insert(name, load_keyframe_file(&path)?);
        }

        info!(
            dir = %dir.display(),
            motions = sequences.len(),
            "loaded motion catalogue"
        );
        Ok(MotionCatalogue {
            sequences,
            test_file: Some(dir.join(MotionName::Test.file_name())),
        })
    }

    /// Catalogue from in-memory sequences.
    pub fn from_sequences(sequences: impl IntoIterator<Item = (MotionName, KeyframeSequence)>) -> Self {
        MotionCatalogue {
            sequences: sequences.into_iter().collect(),
            test_file: None,
        }
    }

    /// Re-read the test motion from `path` on every lookup.
    pub fn with_test_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.test_file = Some(path.into());
        self
    }

    pub fn contains(&self, name: MotionName) -> bool {
        self.sequences.contains_key(&name) || (name == MotionName::Test && self.test_file.is_some())
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// A fresh, rewound copy of the named sequence.
    pub fn sequence(&self, name: MotionName) -> Result<KeyframeSequence> {
        if name == MotionName::Test {
            if let Some(path) = &self.test_file {
                return Ok(load_keyframe_file(path)?);
            }
        }
        self.sequences
            .get(&name)
            .map(KeyframeSequence::rewound)
            .ok_or(MotionError::UnknownMotion(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Keyframe;
    use crate::keyframe_file::save_keyframe_file;
    use simbridge_structures::{JointId, JointVector};

    fn single_frame(duration_ms: u32, neck_yaw: f64) -> KeyframeSequence {
        let mut targets = JointVector::zeros();
        targets[JointId::NeckYaw] = neck_yaw;
        KeyframeSequence::new(vec![Keyframe::new(duration_ms, targets)])
    }

    #[test]
    fn test_file_names_are_unique() {
        let mut names: Vec<_> = MotionName::ALL.iter().map(|m| m.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MotionName::ALL.len());
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        save_keyframe_file(&single_frame(200, 10.0), dir.path().join("wave_nika.txt")).unwrap();

        let catalogue = MotionCatalogue::load_from_dir(dir.path()).unwrap();
        assert_eq!(catalogue.len(), 1);
        assert!(catalogue.contains(MotionName::Wave));
        assert!(matches!(
            catalogue.sequence(MotionName::Kick),
            Err(MotionError::UnknownMotion(MotionName::Kick))
        ));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kick_the_ball.txt"), "100 1 2 3\n").unwrap();
        assert!(MotionCatalogue::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_motion_is_reloaded_on_every_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let test_path = dir.path().join("test.txt");
        let catalogue = MotionCatalogue::load_from_dir(dir.path()).unwrap();

        assert!(matches!(
            catalogue.sequence(MotionName::Test),
            Err(MotionError::KeyframeFile(_))
        ));

        save_keyframe_file(&single_frame(100, 5.0), &test_path).unwrap();
        assert_eq!(catalogue.sequence(MotionName::Test).unwrap().frames()[0].duration_ms, 100);

        save_keyframe_file(&single_frame(400, 5.0), &test_path).unwrap();
        assert_eq!(catalogue.sequence(MotionName::Test).unwrap().frames()[0].duration_ms, 400);
    }

    #[test]
    fn test_lookup_hands_out_rewound_copies() {
        let catalogue = MotionCatalogue::from_sequences([(MotionName::Wave, single_frame(100, 1.0))]);
        let mut first = catalogue.sequence(MotionName::Wave).unwrap();
        assert!(first.next_frame().is_some());
        let mut second = catalogue.sequence(MotionName::Wave).unwrap();
        assert!(second.next_frame().is_some());
    }
}
