// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection between 2D caller space and the single scroll axis.

use crate::types::{Offset, Orientation, Velocity};

/// The active scroll axis and whether deltas along it are reversed.
///
/// Every conversion into the single-axis domain zeroes the cross axis. Reversal
/// negates the value and is its own inverse.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrollAxis {
    /// Axis that carries scroll motion.
    pub orientation: Orientation,
    /// Negate deltas on the way to and from the local state.
    pub reverse_direction: bool,
}

impl ScrollAxis {
    /// Creates an axis description.
    #[must_use]
    pub const fn new(orientation: Orientation, reverse_direction: bool) -> Self {
        Self {
            orientation,
            reverse_direction,
        }
    }

    /// Returns `true` for [`Orientation::Vertical`].
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self.orientation, Orientation::Vertical)
    }

    /// Zeroes the cross-axis component of `offset`.
    #[must_use]
    pub fn single_axis_offset(self, offset: Offset) -> Offset {
        match self.orientation {
            Orientation::Horizontal => Offset::new(offset.x, 0.0),
            Orientation::Vertical => Offset::new(0.0, offset.y),
        }
    }

    /// Zeroes the cross-axis component of `velocity`.
    #[must_use]
    pub fn single_axis_velocity(self, velocity: Velocity) -> Velocity {
        match self.orientation {
            Orientation::Horizontal => Velocity::new(velocity.x, 0.0),
            Orientation::Vertical => Velocity::new(0.0, velocity.y),
        }
    }

    /// Reads the active component of `offset`.
    #[must_use]
    pub fn offset_to_scalar(self, offset: Offset) -> f64 {
        match self.orientation {
            Orientation::Horizontal => offset.x,
            Orientation::Vertical => offset.y,
        }
    }

    /// Expands `value` into an offset along the active axis.
    #[must_use]
    pub fn scalar_to_offset(self, value: f64) -> Offset {
        if value == 0.0 {
            return Offset::ZERO;
        }
        match self.orientation {
            Orientation::Horizontal => Offset::new(value, 0.0),
            Orientation::Vertical => Offset::new(0.0, value),
        }
    }

    /// Reads the active component of `velocity`.
    #[must_use]
    pub fn velocity_to_scalar(self, velocity: Velocity) -> f64 {
        match self.orientation {
            Orientation::Horizontal => velocity.x,
            Orientation::Vertical => velocity.y,
        }
    }

    /// Expands `value` into a velocity along the active axis.
    #[must_use]
    pub fn scalar_to_velocity(self, value: f64) -> Velocity {
        if value == 0.0 {
            return Velocity::ZERO;
        }
        match self.orientation {
            Orientation::Horizontal => Velocity::new(value, 0.0),
            Orientation::Vertical => Velocity::new(0.0, value),
        }
    }

    /// Replaces the active component of `velocity`, keeping the cross axis.
    #[must_use]
    pub fn with_velocity_component(self, velocity: Velocity, value: f64) -> Velocity {
        match self.orientation {
            Orientation::Horizontal => Velocity::new(value, velocity.y),
            Orientation::Vertical => Velocity::new(velocity.x, value),
        }
    }

    /// Negates `value` when the axis is reversed.
    #[must_use]
    pub fn reverse_if_needed(self, value: f64) -> f64 {
        if self.reverse_direction { -value } else { value }
    }

    /// Negates `offset` when the axis is reversed.
    #[must_use]
    pub fn reverse_offset_if_needed(self, offset: Offset) -> Offset {
        if self.reverse_direction { -offset } else { offset }
    }

    /// Negates `velocity` when the axis is reversed.
    #[must_use]
    pub fn reverse_velocity_if_needed(self, velocity: Velocity) -> Velocity {
        if self.reverse_direction {
            -velocity
        } else {
            velocity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_projection_drops_vertical_component() {
        let axis = ScrollAxis::new(Orientation::Horizontal, false);
        assert_eq!(
            axis.single_axis_offset(Offset::new(5.0, 7.0)),
            Offset::new(5.0, 0.0)
        );
        assert_eq!(axis.offset_to_scalar(Offset::new(5.0, 7.0)), 5.0);
        assert_eq!(axis.scalar_to_offset(3.0), Offset::new(3.0, 0.0));
        assert_eq!(
            axis.single_axis_velocity(Velocity::new(10.0, 20.0)),
            Velocity::new(10.0, 0.0)
        );
    }

    #[test]
    fn vertical_projection_drops_horizontal_component() {
        let axis = ScrollAxis::new(Orientation::Vertical, false);
        assert_eq!(
            axis.single_axis_offset(Offset::new(5.0, 7.0)),
            Offset::new(0.0, 7.0)
        );
        assert_eq!(axis.velocity_to_scalar(Velocity::new(1.0, 2.0)), 2.0);
        assert_eq!(axis.scalar_to_velocity(-4.0), Velocity::new(0.0, -4.0));
    }

    #[test]
    fn zero_scalar_expands_to_zero() {
        let axis = ScrollAxis::new(Orientation::Vertical, true);
        assert_eq!(axis.scalar_to_offset(0.0), Offset::ZERO);
        assert_eq!(axis.scalar_to_velocity(0.0), Velocity::ZERO);
    }

    #[test]
    fn double_reversal_is_identity() {
        let axis = ScrollAxis::new(Orientation::Horizontal, true);
        let offset = Offset::new(12.5, -3.0);
        let velocity = Velocity::new(-800.0, 40.0);
        assert_eq!(
            axis.reverse_offset_if_needed(axis.reverse_offset_if_needed(offset)),
            offset
        );
        assert_eq!(
            axis.reverse_velocity_if_needed(axis.reverse_velocity_if_needed(velocity)),
            velocity
        );
        assert_eq!(axis.reverse_if_needed(axis.reverse_if_needed(9.0)), 9.0);
        assert_eq!(axis.reverse_if_needed(9.0), -9.0);
    }

    #[test]
    fn non_reversed_axis_passes_values_through() {
        let axis = ScrollAxis::new(Orientation::Vertical, false);
        assert_eq!(axis.reverse_if_needed(9.0), 9.0);
    }

    #[test]
    fn velocity_component_replacement_keeps_cross_axis() {
        let axis = ScrollAxis::new(Orientation::Vertical, false);
        let v = axis.with_velocity_component(Velocity::new(3.0, 100.0), 25.0);
        assert_eq!(v, Velocity::new(3.0, 25.0));
    }
}
