// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core value types shared by every scroll participant.

use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A 2D spatial delta in pixels.
///
/// Used for drag deltas, wheel deltas, and nested-scroll consumption amounts.
pub type Offset = kurbo::Vec2;

/// Axis along which a scrollable moves its content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Scroll along the x axis.
    Horizontal,
    /// Scroll along the y axis.
    #[default]
    Vertical,
}

/// A 2D velocity in pixels per second.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Velocity {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Velocity {
    /// The zero velocity.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a velocity from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Velocity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Velocity {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Velocity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Velocity {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Velocity {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Velocity {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Origin class of a scroll or fling delta.
///
/// Ancestors in a nested chain may react differently depending on the source,
/// for example only showing visual feedback for direct manipulation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NestedScrollSource {
    /// Produced directly by the user: drag, wheel, keyboard paging, accessibility.
    #[default]
    UserInput,
    /// Produced as a consequence of earlier input, such as a decay fling.
    SideEffect,
}

/// Priority of a scroll session.
///
/// Variants are ordered: a session may supersede any active session of equal or
/// lower priority.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MutatePriority {
    /// Programmatic and animation-driven scrolling, including flings.
    #[default]
    Default,
    /// Scrolling driven by active user input.
    UserInput,
    /// Scrolling that must not be interrupted by user input.
    PreventUserInput,
}

/// Horizontal reading direction of the surrounding layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities_are_ordered() {
        assert!(MutatePriority::Default < MutatePriority::UserInput);
        assert!(MutatePriority::UserInput < MutatePriority::PreventUserInput);
    }

    #[test]
    fn velocity_arithmetic() {
        let a = Velocity::new(3.0, -4.0);
        let b = Velocity::new(1.0, 1.0);
        assert_eq!(a + b, Velocity::new(4.0, -3.0));
        assert_eq!(a - b, Velocity::new(2.0, -5.0));
        assert_eq!(-a, Velocity::new(-3.0, 4.0));
        assert_eq!(a * 2.0, Velocity::new(6.0, -8.0));
    }
}
