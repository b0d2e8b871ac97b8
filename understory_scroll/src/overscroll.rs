// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract between scrolling and an overscroll visual such as a stretch or a
//! glow.
//!
//! The effect itself lives outside this crate. [`ScrollingLogic`] hands it whole
//! scroll deltas and fling velocities, together with a continuation that runs
//! the normal nested scroll pipeline. The effect decides how much to forward to
//! the continuation and how much to absorb into its own visual state.
//!
//! [`ScrollingLogic`]: crate::ScrollingLogic

use crate::error::ScrollError;
use crate::types::{NestedScrollSource, Offset, Velocity};

/// An overscroll visual that wraps scroll and fling dispatch.
pub trait OverscrollEffect {
    /// Applies `delta`, calling `perform_scroll` for the part that should scroll
    /// content normally.
    ///
    /// Returns the total consumed by the effect and by `perform_scroll`.
    fn apply_to_scroll(
        &self,
        delta: Offset,
        source: NestedScrollSource,
        perform_scroll: &mut dyn FnMut(Offset) -> Offset,
    ) -> Offset;

    /// Applies a release `velocity`, calling `perform_fling` to run the regular
    /// fling with whatever velocity the effect forwards.
    ///
    /// `perform_fling` returns the velocity it consumed. Errors from it are
    /// cancellations and must be propagated.
    fn apply_to_fling(
        &self,
        velocity: Velocity,
        perform_fling: &mut dyn FnMut(Velocity) -> Result<Velocity, ScrollError>,
    ) -> Result<(), ScrollError>;

    /// Whether the effect is still animating, such as settling a stretch.
    ///
    /// A new drag latches onto a running effect without waiting for touch slop.
    fn is_in_progress(&self) -> bool;
}
