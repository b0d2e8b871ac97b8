// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame clocks that pace animations.
//!
//! Animations in this crate never read wall time. Each step calls
//! [`FrameClock::next_frame`] and receives the timestamp of the frame to
//! render, in nanoseconds. Hosts drive the clock from their display refresh;
//! tests use [`FixedStepClock`] or a closure.

/// Nanoseconds in one second.
pub(crate) const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Nanoseconds in one millisecond.
pub(crate) const NANOS_PER_MILLI: u64 = 1_000_000;

/// Source of animation frame timestamps.
///
/// `next_frame` is a suspension point: work that another task wants to
/// interleave with a running animation happens inside it. Timestamps must not
/// decrease.
pub trait FrameClock {
    /// Waits for the next frame and returns its timestamp in nanoseconds.
    fn next_frame(&mut self) -> u64;
}

impl<F: FnMut() -> u64> FrameClock for F {
    fn next_frame(&mut self) -> u64 {
        self()
    }
}

/// A clock that advances by a fixed step on every frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedStepClock {
    now: u64,
    step: u64,
}

impl FixedStepClock {
    /// Step of a 60 Hz display, rounded to whole nanoseconds.
    pub const SIXTY_HZ: u64 = 16_666_667;

    /// Creates a clock starting at zero that advances by `step_nanos` per frame.
    #[must_use]
    pub const fn new(step_nanos: u64) -> Self {
        Self {
            now: 0,
            step: step_nanos,
        }
    }

    /// Starts the clock at `start_nanos` instead of zero.
    #[must_use]
    pub const fn with_start(mut self, start_nanos: u64) -> Self {
        self.now = start_nanos;
        self
    }

    /// Timestamp of the most recent frame.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.now
    }
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(Self::SIXTY_HZ)
    }
}

impl FrameClock for FixedStepClock {
    fn next_frame(&mut self) -> u64 {
        self.now = self.now.saturating_add(self.step);
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_step_clock_advances() {
        let mut clock = FixedStepClock::new(10).with_start(5);
        assert_eq!(clock.next_frame(), 15);
        assert_eq!(clock.next_frame(), 25);
        assert_eq!(clock.now(), 25);
    }

    #[test]
    fn closures_are_clocks() {
        let mut t = 0;
        let mut clock = || {
            t += 7;
            t
        };
        assert_eq!(FrameClock::next_frame(&mut clock), 7);
        assert_eq!(FrameClock::next_frame(&mut clock), 14);
    }
}
