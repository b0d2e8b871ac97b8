// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A spring used to animate one-shot scroll requests.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::clock::{FrameClock, NANOS_PER_SECOND};
use crate::error::ScrollError;

/// Parameters of a unit-mass damped spring.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpringSpec {
    /// `1.0` is critically damped; lower values bounce.
    pub damping_ratio: f64,
    /// Spring constant.
    pub stiffness: f64,
    /// Distance and speed below which the spring is considered settled.
    pub visibility_threshold: f64,
}

impl SpringSpec {
    /// Critically damped ratio.
    pub const DAMPING_RATIO_NO_BOUNCY: f64 = 1.0;
    /// Medium stiffness.
    pub const STIFFNESS_MEDIUM: f64 = 1500.0;

    /// Sets the damping ratio.
    #[must_use]
    pub const fn with_damping_ratio(mut self, damping_ratio: f64) -> Self {
        self.damping_ratio = damping_ratio;
        self
    }

    /// Sets the stiffness.
    #[must_use]
    pub const fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Sets the settle threshold.
    #[must_use]
    pub const fn with_visibility_threshold(mut self, threshold: f64) -> Self {
        self.visibility_threshold = threshold;
        self
    }

    fn damping(&self) -> f64 {
        2.0 * self.damping_ratio * self.stiffness.sqrt()
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            damping_ratio: Self::DAMPING_RATIO_NO_BOUNCY,
            stiffness: Self::STIFFNESS_MEDIUM,
            visibility_threshold: 0.01,
        }
    }
}

/// Longest integration step, in seconds.
const MAX_SUBSTEP: f64 = 0.004;

#[derive(Copy, Clone, Debug, Default)]
struct SpringState {
    position: f64,
    velocity: f64,
}

impl SpringState {
    /// Advances by `dt` seconds toward `target` with semi-implicit Euler.
    fn advance(&mut self, dt: f64, target: f64, spec: &SpringSpec) {
        if dt <= 0.0 {
            return;
        }
        let damping = spec.damping();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Frame gaps are far below u32::MAX substeps."
        )]
        let steps = (dt / MAX_SUBSTEP) as u32 + 1;
        let h = dt / f64::from(steps);
        for _ in 0..steps {
            let acceleration =
                -spec.stiffness * (self.position - target) - damping * self.velocity;
            self.velocity += acceleration * h;
            self.position += self.velocity * h;
        }
    }

    fn is_settled(&self, target: f64, threshold: f64) -> bool {
        (self.position - target).abs() < threshold && self.velocity.abs() < threshold
    }
}

/// Animates from `0` to `target`, calling `on_frame` once per frame.
///
/// The first frame reports `0` and the last reports exactly `target`. An error
/// from `on_frame` ends the animation where it stands and is returned.
pub fn animate_to(
    spec: &SpringSpec,
    target: f64,
    clock: &mut dyn FrameClock,
    on_frame: &mut dyn FnMut(f64) -> Result<(), ScrollError>,
) -> Result<(), ScrollError> {
    let mut state = SpringState::default();
    let mut last = clock.next_frame();
    on_frame(0.0)?;
    if target == 0.0 {
        return Ok(());
    }
    loop {
        let now = clock.next_frame();
        let dt = now.saturating_sub(last) as f64 / NANOS_PER_SECOND as f64;
        last = now;
        state.advance(dt, target, spec);
        if state.is_settled(target, spec.visibility_threshold) {
            return on_frame(target);
        }
        on_frame(state.position)?;
    }
}
