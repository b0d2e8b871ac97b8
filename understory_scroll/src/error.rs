// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll session outcomes that are not plain consumption.

use crate::types::MutatePriority;

/// Reasons a scroll session or animation ended without completing.
///
/// None of these is a fault: they are ordinary control flow for cooperative
/// scrolling and must be propagated to the session boundary with `?`.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ScrollError {
    /// The session was superseded by a session of equal or higher priority.
    #[error("scroll session was cancelled")]
    Cancelled,
    /// A fling was superseded mid-flight.
    #[error("fling was cancelled with {velocity_left} px/s left")]
    FlingCancelled {
        /// Velocity left along the scroll axis when the fling stopped.
        velocity_left: f64,
    },
    /// A session was requested while a higher-priority session was active.
    #[error("{requested:?} scroll rejected while a {active:?} session is active")]
    Busy {
        /// Priority of the session holding the state.
        active: MutatePriority,
        /// Priority of the rejected request.
        requested: MutatePriority,
    },
}

impl ScrollError {
    /// Returns `true` for [`Cancelled`](Self::Cancelled) and
    /// [`FlingCancelled`](Self::FlingCancelled).
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::FlingCancelled { .. })
    }
}
