// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use simbridge_io::TransportError;
use simbridge_motion::{KeyframeFileError, MotionError};
use simbridge_serialization::ParseError;

/// Result type alias using AgentError
pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors that end the agent loop.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The cycle message did not parse at all; the agent has lost sync with the simulator
    #[error("Protocol desync in cycle {cycle}: {source}")]
    Desync {
        cycle: u64,
        #[source]
        source: ParseError,
    },

    #[error("Motion selection failed: {0}")]
    Motion(#[from] MotionError),

    #[error("Failed to load motions: {0}")]
    Keyframes(#[from] KeyframeFileError),

    #[error("Invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("Failed to write snapshot trace: {0}")]
    Trace(#[source] std::io::Error),
}
