// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Stop requests from outside the cycle loop, e.g. Ctrl-C.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use simbridge_io::ShutdownHandle;
use tracing::{info, warn};

/// Sets the loop's stop flag and closes the socket, so a loop blocked on a
/// stalled simulator wakes up as well.
#[derive(Clone)]
pub struct StopSignal {
    requested: Arc<AtomicBool>,
    connection: Arc<ShutdownHandle>,
}

impl StopSignal {
    pub fn new(connection: ShutdownHandle) -> Self {
        StopSignal {
            requested: Arc::new(AtomicBool::new(false)),
            connection: Arc::new(connection),
        }
    }

    /// Flag to pass to [`SimAgent::run`](crate::SimAgent::run).
    pub fn flag(&self) -> &AtomicBool {
        &self.requested
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Request the stop. Returns false when it was already requested.
    pub fn trigger(&self) -> bool {
        if self.requested.swap(true, Ordering::SeqCst) {
            return false;
        }
        info!("Shutdown signal received, closing the simulator connection...");
        if let Err(e) = self.connection.shutdown() {
            warn!(error = %e, "Failed to close the simulator connection");
        }
        true
    }
}
