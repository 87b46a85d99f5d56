// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # simbridge-io
//!
//! Synchronous transport to the simulator: TCP with 4-byte big-endian length
//! prefixes, one receive/send pair per simulation cycle, and the robot
//! initialization handshake.
//!
//! ```rust,no_run
//! use simbridge_io::SimulatorConnection;
//!
//! let mut conn = SimulatorConnection::connect("127.0.0.1", 3100)?;
//! while let Some((ticket, message)) = conn.begin_cycle()? {
//!     // decode `message`, decide, then answer
//!     conn.end_cycle(ticket, "(syn)")?;
//! }
//! # Ok::<(), simbridge_io::TransportError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod connection;
mod error;
pub mod framing;

pub use connection::{
    BeamPose, CycleTicket, RobotIdentity, ShutdownHandle, SimulatorConnection, SETTLE_CYCLES,
};
pub use error::{Result, TransportError};
pub use framing::{read_frame, write_frame, DEFAULT_MAX_FRAME_BYTES};

/// Default simulator agent port.
pub const DEFAULT_SERVER_PORT: u16 = 3100;
