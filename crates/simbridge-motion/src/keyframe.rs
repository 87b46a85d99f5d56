// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use simbridge_structures::{JointVector, CYCLE_MS};

/// A target pose and the time allotted to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub duration_ms: u32,
    /// Target angle per joint in degrees.
    pub targets: JointVector,
}

impl Keyframe {
    pub fn new(duration_ms: u32, targets: JointVector) -> Self {
        Keyframe {
            duration_ms,
            targets,
        }
    }

    /// Number of cycles the keyframe spans; the last one always commands zero.
    pub fn ticks(&self) -> u32 {
        self.duration_ms / CYCLE_MS
    }

    /// Same keyframe for the opposite body side.
    pub fn mirrored(&self) -> Keyframe {
        Keyframe::new(self.duration_ms, self.targets.mirrored())
    }
}

/// Ordered keyframes with a replay cursor.
///
/// Frames are shared, so cloning a sequence out of a catalogue is cheap and
/// every clone replays from its own cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeSequence {
    frames: Arc<[Keyframe]>,
    cursor: usize,
}

impl KeyframeSequence {
    pub fn new(frames: Vec<Keyframe>) -> Self {
        KeyframeSequence {
            frames: frames.into(),
            cursor: 0,
        }
    }

    pub fn frames(&self) -> &[Keyframe] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Next keyframe, or `None` once the sequence is exhausted. Exhaustion
    /// rewinds the cursor so the sequence can be replayed.
    pub fn next_frame(&mut self) -> Option<Keyframe> {
        match self.frames.get(self.cursor) {
            Some(frame) => {
                self.cursor += 1;
                Some(*frame)
            }
            None => {
                self.cursor = 0;
                None
            }
        }
    }

    /// Copy of this sequence starting from the first frame.
    pub fn rewound(&self) -> KeyframeSequence {
        KeyframeSequence {
            frames: Arc::clone(&self.frames),
            cursor: 0,
        }
    }

    /// Left/right mirrored copy, e.g. a left side step from a right one.
    pub fn mirrored(&self) -> KeyframeSequence {
        KeyframeSequence::new(self.frames.iter().map(Keyframe::mirrored).collect())
    }

    /// Total replay time in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.frames.iter().map(|frame| u64::from(frame.duration_ms)).sum()
    }
}

impl FromIterator<Keyframe> for KeyframeSequence {
    fn from_iter<I: IntoIterator<Item = Keyframe>>(iter: I) -> Self {
        KeyframeSequence::new(iter.into_iter().collect())
    }
}
