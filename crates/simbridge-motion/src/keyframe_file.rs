// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Plain-text keyframe files.
//!
//! One keyframe per line: an integer duration in milliseconds followed by
//! exactly one angle per joint in degrees, in joint order, separated by
//! whitespace. Blank lines and lines starting with `//` or `#` are skipped.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use simbridge_structures::{JointVector, JOINT_COUNT};
use tracing::debug;

use crate::keyframe::{Keyframe, KeyframeSequence};

#[derive(Debug, thiserror::Error)]
pub enum KeyframeFileError {
    #[error("failed to read keyframe file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write keyframe file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: invalid duration {value:?}")]
    InvalidDuration { line: usize, value: String },

    #[error("line {line}: invalid angle {value:?}")]
    InvalidAngle { line: usize, value: String },

    #[error("line {line}: expected {} angles, found {found}", JOINT_COUNT)]
    WrongAngleCount { line: usize, found: usize },
}

fn is_skipped(line: &str) -> bool {
    line.is_empty() || line.starts_with("//") || line.starts_with('#')
}

/// Parse keyframe file contents. Line numbers in errors are 1-based.
pub fn parse_keyframes(text: &str) -> Result<KeyframeSequence, KeyframeFileError> {
    let mut frames = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();
        if is_skipped(line) {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let duration_token = tokens.next().unwrap_or_default();
        let duration_ms: u32 =
            duration_token
                .parse()
                .map_err(|_| KeyframeFileError::InvalidDuration {
                    line: line_number,
                    value: duration_token.to_string(),
                })?;

        let angles = tokens
            .map(|token| {
                token
                    .parse::<f64>()
                    .ok()
                    .filter(|angle| angle.is_finite())
                    .ok_or_else(|| KeyframeFileError::InvalidAngle {
                        line: line_number,
                        value: token.to_string(),
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let targets =
            JointVector::from_slice(&angles).map_err(|_| KeyframeFileError::WrongAngleCount {
                line: line_number,
                found: angles.len(),
            })?;

        frames.push(Keyframe::new(duration_ms, targets));
    }

    Ok(KeyframeSequence::new(frames))
}

pub fn load_keyframe_file(path: impl AsRef<Path>) -> Result<KeyframeSequence, KeyframeFileError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| KeyframeFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let sequence = parse_keyframes(&text)?;
    debug!(path = %path.display(), frames = sequence.len(), "loaded keyframe file");
    Ok(sequence)
}

/// Render a sequence in the file format read by [`parse_keyframes`].
pub fn format_keyframes(sequence: &KeyframeSequence) -> String {
    let mut out = String::new();
    for frame in sequence.frames() {
        let _ = write!(out, "{}", frame.duration_ms);
        for (_, angle) in frame.targets.iter() {
            let _ = write!(out, " {}", angle);
        }
        out.push('\n');
    }
    out
}

pub fn save_keyframe_file(
    sequence: &KeyframeSequence,
    path: impl AsRef<Path>,
) -> Result<(), KeyframeFileError> {
    let path = path.as_ref();
    fs::write(path, format_keyframes(sequence)).map_err(|source| KeyframeFileError::Write {
        path: path.to_path_buf(),
        source,
    })
}
