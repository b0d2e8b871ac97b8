// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spline-based fling decay calibrated to display density.
//!
//! The curve is the platform inertial scroll curve: a fling's total distance
//! and duration follow from the initial speed and a physical deceleration
//! coefficient, and the position over time follows a precomputed spline.

use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::clock::NANOS_PER_MILLI;
use crate::float;

/// Display density relative to the 160 dpi baseline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Density(f64);

impl Density {
    /// The 160 dpi baseline.
    pub const ONE: Self = Self(1.0);

    /// Creates a density. Non-positive or non-finite values fall back to `1.0`.
    #[must_use]
    pub fn new(density: f64) -> Self {
        if density.is_finite() && density > 0.0 {
            Self(density)
        } else {
            Self::ONE
        }
    }

    /// Density as a scale factor.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::ONE
    }
}

const NB_SAMPLES: usize = 100;
const INFLEXION: f64 = 0.35;
const START_TENSION: f64 = 0.5;
const END_TENSION: f64 = 1.0;
const P1: f64 = START_TENSION * INFLEXION;
const P2: f64 = 1.0 - END_TENSION * (1.0 - INFLEXION);

const GRAVITY_EARTH: f64 = 9.80665;
const INCHES_PER_METER: f64 = 39.37;
const PHYSICAL_FRICTION: f64 = 0.84;

/// Default scroll friction.
pub const DEFAULT_SCROLL_FRICTION: f64 = 0.015;

fn deceleration_rate() -> f64 {
    0.78_f64.ln() / 0.9_f64.ln()
}

/// Normalized distance samples of the fling spline, `positions[NB_SAMPLES] == 1`.
fn spline_positions() -> [f64; NB_SAMPLES + 1] {
    let mut positions = [0.0; NB_SAMPLES + 1];
    let mut x_min = 0.0_f64;
    for (i, slot) in positions.iter_mut().take(NB_SAMPLES).enumerate() {
        let alpha = i as f64 / NB_SAMPLES as f64;
        let mut x_max = 1.0_f64;
        let (x, coef) = loop {
            let x = x_min + (x_max - x_min) / 2.0;
            let coef = 3.0 * x * (1.0 - x);
            let tx = coef * ((1.0 - x) * P1 + x * P2) + x * x * x;
            if (tx - alpha).abs() < 1e-5 {
                break (x, coef);
            }
            if tx > alpha {
                x_max = x;
            } else {
                x_min = x;
            }
        };
        *slot = coef * ((1.0 - x) * START_TENSION + x * END_TENSION) + x * x * x;
    }
    positions[NB_SAMPLES] = 1.0;
    positions
}

/// Distance and velocity coefficients at a normalized time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct SplinePoint {
    pub(crate) distance_coefficient: f64,
    pub(crate) velocity_coefficient: f64,
}

/// The result of [`FlingCalculator::fling_info`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlingInfo {
    /// Starting velocity in pixels per second.
    pub initial_velocity: f64,
    /// Unsigned total travel in pixels.
    pub distance: f64,
    /// Total duration in milliseconds.
    pub duration_millis: u64,
}

/// Converts fling velocities into travel distance and duration.
#[derive(Clone)]
pub struct FlingCalculator {
    friction: f64,
    physical_coefficient: f64,
    deceleration_rate: f64,
    positions: [f64; NB_SAMPLES + 1],
}

impl fmt::Debug for FlingCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlingCalculator")
            .field("friction", &self.friction)
            .field("physical_coefficient", &self.physical_coefficient)
            .finish_non_exhaustive()
    }
}

impl FlingCalculator {
    /// Creates a calculator for `friction` at `density`.
    #[must_use]
    pub fn new(friction: f64, density: Density) -> Self {
        Self {
            friction,
            physical_coefficient: GRAVITY_EARTH
                * INCHES_PER_METER
                * density.get()
                * 160.0
                * PHYSICAL_FRICTION,
            deceleration_rate: deceleration_rate(),
            positions: spline_positions(),
        }
    }

    fn spline_deceleration(&self, velocity: f64) -> f64 {
        (INFLEXION * velocity.abs() / (self.friction * self.physical_coefficient)).ln()
    }

    /// Duration of a fling starting at `velocity`, in milliseconds.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Durations are whole milliseconds, matching the platform curve."
    )]
    pub fn fling_duration_millis(&self, velocity: f64) -> u64 {
        let l = self.spline_deceleration(velocity);
        (1000.0 * float::exp(l / (self.deceleration_rate - 1.0))) as u64
    }

    /// Unsigned distance travelled by a fling starting at `velocity`.
    #[must_use]
    pub fn fling_distance(&self, velocity: f64) -> f64 {
        let l = self.spline_deceleration(velocity);
        let decel_minus_one = self.deceleration_rate - 1.0;
        self.friction
            * self.physical_coefficient
            * float::exp(self.deceleration_rate / decel_minus_one * l)
    }

    /// Distance and duration of a fling starting at `velocity`.
    #[must_use]
    pub fn fling_info(&self, velocity: f64) -> FlingInfo {
        FlingInfo {
            initial_velocity: velocity,
            distance: self.fling_distance(velocity),
            duration_millis: self.fling_duration_millis(velocity),
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Sample index is bounds-checked right after the cast."
    )]
    fn fling_position(&self, time: f64) -> SplinePoint {
        let index = (NB_SAMPLES as f64 * time) as usize;
        if index >= NB_SAMPLES {
            return SplinePoint {
                distance_coefficient: 1.0,
                velocity_coefficient: 0.0,
            };
        }
        let t_inf = index as f64 / NB_SAMPLES as f64;
        let t_sup = (index + 1) as f64 / NB_SAMPLES as f64;
        let d_inf = self.positions[index];
        let d_sup = self.positions[index + 1];
        let velocity_coefficient = (d_sup - d_inf) / (t_sup - t_inf);
        SplinePoint {
            distance_coefficient: d_inf + (time - t_inf) * velocity_coefficient,
            velocity_coefficient,
        }
    }

    /// Signed offset from the start at `time_millis` into `info`'s fling.
    #[must_use]
    pub fn position(&self, info: &FlingInfo, time_millis: u64) -> f64 {
        let point = self.fling_position(Self::spline_time(info, time_millis));
        info.distance * info.initial_velocity.signum() * point.distance_coefficient
    }

    /// Signed velocity at `time_millis` into `info`'s fling.
    #[must_use]
    pub fn velocity(&self, info: &FlingInfo, time_millis: u64) -> f64 {
        if info.duration_millis == 0 {
            return 0.0;
        }
        let point = self.fling_position(Self::spline_time(info, time_millis));
        point.velocity_coefficient * info.initial_velocity.signum() * info.distance
            / info.duration_millis as f64
            * 1000.0
    }

    fn spline_time(info: &FlingInfo, time_millis: u64) -> f64 {
        if info.duration_millis > 0 {
            time_millis as f64 / info.duration_millis as f64
        } else {
            1.0
        }
    }
}

/// Decay animation over [`FlingCalculator`], measured from a zero origin.
#[derive(Clone, Debug)]
pub struct SplineBasedDecay {
    calculator: FlingCalculator,
}

impl SplineBasedDecay {
    /// Creates the platform decay for `density`.
    #[must_use]
    pub fn new(density: Density) -> Self {
        Self {
            calculator: FlingCalculator::new(DEFAULT_SCROLL_FRICTION, density),
        }
    }

    /// The underlying calculator.
    #[must_use]
    pub fn calculator(&self) -> &FlingCalculator {
        &self.calculator
    }

    /// Signed offset reached `play_nanos` after starting at `initial_velocity`.
    #[must_use]
    pub fn value_from_nanos(&self, play_nanos: u64, initial_velocity: f64) -> f64 {
        let info = self.calculator.fling_info(initial_velocity);
        self.calculator
            .position(&info, play_nanos / NANOS_PER_MILLI)
    }

    /// Signed velocity `play_nanos` after starting at `initial_velocity`.
    ///
    /// At zero play time this is `initial_velocity` itself.
    #[must_use]
    pub fn velocity_from_nanos(&self, play_nanos: u64, initial_velocity: f64) -> f64 {
        if play_nanos == 0 {
            return initial_velocity;
        }
        let info = self.calculator.fling_info(initial_velocity);
        self.calculator
            .velocity(&info, play_nanos / NANOS_PER_MILLI)
    }

    /// Total animation time for `initial_velocity`.
    #[must_use]
    pub fn duration_nanos(&self, initial_velocity: f64) -> u64 {
        self.calculator
            .fling_duration_millis(initial_velocity)
            .saturating_mul(NANOS_PER_MILLI)
    }

    /// Signed offset at which the fling comes to rest.
    #[must_use]
    pub fn target_value(&self, initial_velocity: f64) -> f64 {
        self.calculator.fling_distance(initial_velocity) * initial_velocity.signum()
    }
}
