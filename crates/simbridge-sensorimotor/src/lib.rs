// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # simbridge-sensorimotor
//!
//! Both directions of the per-cycle exchange with the simulator:
//!
//! - **[`PerceptionDecoder`]** turns the inbound message into a [`SensorSnapshot`]
//! - **[`LocalFieldView`]** accumulates vision across cycles in the torso frame
//! - **[`ActuatorSink`]** / **[`EffectorOutput`]** collect joint velocities and render the reply
//!
//! ```rust
//! use simbridge_sensorimotor::{ActuatorSink, EffectorOutput, PerceptionDecoder};
//! use simbridge_structures::JointId;
//!
//! let mut decoder = PerceptionDecoder::new();
//! let snapshot = decoder.decode("(time (now 1.20))(HJ (n hj1) (ax 10.0))");
//! assert_eq!(snapshot.server_time, Some(1.2));
//!
//! let mut output = EffectorOutput::new();
//! output.set_joint_velocity(JointId::NeckYaw, 0.5);
//! assert_eq!(output.flush(), "(he1 0.5)(syn)");
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod actuator;
mod decoder;
mod error;
pub mod field_view;
pub mod snapshot;

pub use actuator::{ActuatorSink, EffectorOutput};
pub use decoder::PerceptionDecoder;
pub use error::{PerceptionError, Result};
pub use field_view::{DatedItem, LocalFieldView, PlayerModel, UP_TO_DATE_PERIOD};
pub use snapshot::{
    ForceReading, GameState, HeardMessage, LineDetection, PlayerDetection, SensorSnapshot,
    VisionFrame,
};
