// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # simbridge-agent
//!
//! Runs a simulated humanoid in lockstep with the simulator. Every cycle:
//!
//! 1. receive and decode the sensor message
//! 2. update the local field view and posture
//! 3. let a [`Behavior`] pick the next motion
//! 4. drive the joints from the motion player (and head scan)
//! 5. answer the simulator
//!
//! ```rust,no_run
//! use std::sync::atomic::AtomicBool;
//! use simbridge_agent::{AgentSettings, SimAgent};
//!
//! let settings = AgentSettings::from_config(&Default::default()).unwrap();
//! let mut agent = SimAgent::connect(&settings).unwrap();
//! agent.initialize(&settings.identity, &settings.pose).unwrap();
//!
//! let mut behavior = settings.behavior.build();
//! agent.run(&mut behavior, &AtomicBool::new(false), settings.max_cycles).unwrap();
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod behavior;
mod error;
mod runtime;
pub mod settings;
mod stop;

pub use behavior::{Behavior, BehaviorKind, DecisionContext, Idle, KeyframeDeveloper, WalkToBall};
pub use error::{AgentError, Result};
pub use runtime::{CycleOutcome, RunSummary, SimAgent, StopReason};
pub use settings::{logging_options, AgentSettings};
pub use stop::StopSignal;
