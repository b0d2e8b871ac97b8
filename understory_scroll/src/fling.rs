// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fling strategies and the default inertial decay.

use core::cell::{Cell, RefCell};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::clock::FrameClock;
use crate::decay::{Density, SplineBasedDecay};
use crate::error::ScrollError;
use crate::state::ScrollScope;

/// What a [`FlingBehavior`] may do while it runs: consume scroll and wait for
/// frames.
pub struct FlingScope<'a> {
    scroll: &'a mut dyn ScrollScope,
    clock: &'a mut dyn FrameClock,
}

impl core::fmt::Debug for FlingScope<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlingScope")
            .field("is_active", &self.scroll.is_active())
            .finish_non_exhaustive()
    }
}

impl<'a> FlingScope<'a> {
    /// Pairs a session scope with the clock that paces the fling.
    pub fn new(scroll: &'a mut dyn ScrollScope, clock: &'a mut dyn FrameClock) -> Self {
        Self { scroll, clock }
    }

    /// Consumes `pixels` and returns the part that was consumed.
    pub fn scroll_by(&mut self, pixels: f64) -> f64 {
        self.scroll.scroll_by(pixels)
    }

    /// Returns `false` once the enclosing session has been superseded.
    pub fn is_active(&self) -> bool {
        self.scroll.is_active()
    }

    /// Waits for the next frame.
    ///
    /// Returns [`ScrollError::Cancelled`] if the session was superseded while
    /// waiting.
    pub fn await_frame(&mut self) -> Result<u64, ScrollError> {
        let now = self.clock.next_frame();
        if self.scroll.is_active() {
            Ok(now)
        } else {
            Err(ScrollError::Cancelled)
        }
    }
}

/// Turns a release velocity into an animation of scroll deltas.
pub trait FlingBehavior {
    /// Animates a fling from `initial_velocity` (pixels per second along the
    /// scroll axis) and returns the velocity left when it stopped.
    fn perform_fling(
        &self,
        scope: &mut FlingScope<'_>,
        initial_velocity: f64,
    ) -> Result<f64, ScrollError>;

    /// Whether a mouse wheel gesture ending should start this fling.
    ///
    /// The platform default fling answers `false`: inertia is for touch.
    fn should_be_triggered_by_mouse_wheel(&self) -> bool {
        true
    }

    /// Re-derives density-dependent parameters.
    fn update_density(&self, density: Density) {
        let _ = density;
    }
}

const STOP_THRESHOLD_PX: f64 = 0.5;
const MIN_FLING_VELOCITY: f64 = 1.0;

/// The platform inertial fling over a [`SplineBasedDecay`].
#[derive(Debug)]
pub struct DefaultFlingBehavior {
    decay: RefCell<SplineBasedDecay>,
    motion_duration_scale: Cell<f64>,
    last_animation_cycle_count: Cell<u32>,
}

impl DefaultFlingBehavior {
    /// Creates the default fling for `density`.
    #[must_use]
    pub fn new(density: Density) -> Self {
        Self::with_decay(SplineBasedDecay::new(density))
    }

    /// Creates a fling over a specific decay.
    #[must_use]
    pub fn with_decay(decay: SplineBasedDecay) -> Self {
        Self {
            decay: RefCell::new(decay),
            motion_duration_scale: Cell::new(1.0),
            last_animation_cycle_count: Cell::new(0),
        }
    }

    /// Sets the factor that stretches animation time. `0.0` skips straight to
    /// the end.
    pub fn set_motion_duration_scale(&self, scale: f64) {
        self.motion_duration_scale.set(scale.max(0.0));
    }

    /// Current animation time factor.
    #[must_use]
    pub fn motion_duration_scale(&self) -> f64 {
        self.motion_duration_scale.get()
    }

    /// Number of frames the most recent fling ran for.
    #[must_use]
    pub fn last_animation_cycle_count(&self) -> u32 {
        self.last_animation_cycle_count.get()
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Scaled play time is clamped to the animation duration."
    )]
    fn play_time(&self, elapsed: u64, duration: u64) -> u64 {
        let scale = self.motion_duration_scale.get();
        if scale == 0.0 {
            return duration;
        }
        let scaled = (elapsed as f64 / scale) as u64;
        scaled.min(duration)
    }
}

impl Default for DefaultFlingBehavior {
    fn default() -> Self {
        Self::new(Density::ONE)
    }
}

impl FlingBehavior for DefaultFlingBehavior {
    fn perform_fling(
        &self,
        scope: &mut FlingScope<'_>,
        initial_velocity: f64,
    ) -> Result<f64, ScrollError> {
        if initial_velocity.abs() <= MIN_FLING_VELOCITY {
            return Ok(initial_velocity);
        }
        let decay = self.decay.borrow().clone();
        let duration = decay.duration_nanos(initial_velocity);
        log::debug!("fling start: velocity {initial_velocity}, duration {duration} ns");

        self.last_animation_cycle_count.set(0);
        let mut velocity_left = initial_velocity;
        let cancelled = |velocity_left| ScrollError::FlingCancelled { velocity_left };

        let start = scope.await_frame().map_err(|_| cancelled(velocity_left))?;
        let mut now = start;
        let mut last_value = 0.0;
        let mut frames = 0_u32;
        loop {
            frames = frames.saturating_add(1);
            self.last_animation_cycle_count.set(frames);

            let play = self.play_time(now.saturating_sub(start), duration);
            let value = decay.value_from_nanos(play, initial_velocity);
            let delta = value - last_value;
            last_value = value;
            velocity_left = decay.velocity_from_nanos(play, initial_velocity);
            if delta != 0.0 {
                let consumed = scope.scroll_by(delta);
                if (delta - consumed).abs() > STOP_THRESHOLD_PX {
                    log::debug!("fling hit a boundary, {velocity_left} px/s left");
                    return Ok(velocity_left);
                }
            }
            if play >= duration {
                log::debug!("fling finished after {frames} frames");
                return Ok(velocity_left);
            }
            now = scope.await_frame().map_err(|_| cancelled(velocity_left))?;
        }
    }

    fn should_be_triggered_by_mouse_wheel(&self) -> bool {
        false
    }

    fn update_density(&self, density: Density) {
        *self.decay.borrow_mut() = SplineBasedDecay::new(density);
    }
}
