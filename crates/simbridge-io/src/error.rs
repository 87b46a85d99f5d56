// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::io;

/// Result type alias using TransportError
pub type Result<T> = std::result::Result<T, TransportError>;

/// Failures of the simulator connection. None of these are retried: once the
/// agent has lost a frame it can no longer stay in lockstep with the simulator.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// TCP connect or socket setup failed
    #[error("Failed to connect to simulator at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Writing a frame failed, typically because the peer closed the socket
    #[error("Failed to send frame: {0}")]
    Send(#[source] io::Error),

    /// Reading a frame failed for a reason other than an orderly close
    #[error("Failed to receive frame: {0}")]
    Receive(#[source] io::Error),

    /// Length prefix announces more bytes than the configured limit
    #[error("Inbound frame announces {length} bytes, limit is {limit}")]
    FrameTooLarge { length: usize, limit: usize },

    /// Payload cannot be described by a 4-byte length prefix
    #[error("Outbound payload of {0} bytes does not fit a 4-byte length prefix")]
    PayloadTooLarge(usize),

    /// Inbound frame carried bytes that are not UTF-8 text
    #[error("Inbound frame is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Peer closed the connection while a reply was required
    #[error("Simulator closed the connection during {0}")]
    Closed(&'static str),

    /// A cycle was received while the previous one was still unanswered
    #[error("Cycle {open} is still open, answer it before receiving the next one")]
    CycleStillOpen { open: u64 },

    /// Ticket does not belong to the currently open cycle
    #[error("Cycle ticket {ticket} does not match the open cycle ({open:?})")]
    CycleMismatch { ticket: u64, open: Option<u64> },
}
