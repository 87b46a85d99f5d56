// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Why a single perception fragment could not be converted.
///
/// These never escape the decoder; the affected snapshot field stays empty.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PerceptionError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' has no value at position {index}")]
    MissingValue { field: &'static str, index: usize },

    #[error("value {0:?} is not a finite number")]
    InvalidNumber(String),

    #[error("unknown {kind} identifier {id:?}")]
    UnknownIdentifier { kind: &'static str, id: String },

    #[error("malformed fragment: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, PerceptionError>;
