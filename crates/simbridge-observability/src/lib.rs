// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # simbridge-observability
//!
//! Logging setup shared by the simbridge binaries, with per-crate debug
//! flag support.
//!
//! ## Features
//! - `file-logging`: per-run log folders with per-crate JSON files

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;
pub mod retention;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known simbridge crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "simbridge-structures",
    "simbridge-serialization",
    "simbridge-io",
    "simbridge-sensorimotor",
    "simbridge-motion",
    "simbridge-config",
    "simbridge-agent",
];
