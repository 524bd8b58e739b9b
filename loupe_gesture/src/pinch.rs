// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

/// Pinches starting with fingers closer than this (in pixels) are ignored;
/// the distance ratio is too noisy to drive zoom.
pub const MIN_PINCH_DISTANCE: f64 = 10.0;

/// Two-pointer pinch geometry, updated incrementally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchState {
    midpoint: Point,
    distance: f64,
}

impl PinchState {
    /// Starts a pinch between `a` and `b`.
    ///
    /// Returns `None` when the pointers are closer than [`MIN_PINCH_DISTANCE`].
    #[must_use]
    pub fn begin(a: Point, b: Point) -> Option<Self> {
        let distance = (b - a).hypot();
        (distance >= MIN_PINCH_DISTANCE).then_some(Self {
            midpoint: a.midpoint(b),
            distance,
        })
    }

    /// Moves the pinch to the new pointer positions.
    ///
    /// Returns `(anchor, factor, pan)`: the new midpoint, the distance ratio
    /// since the last update, and the midpoint movement. Collapsed pointers
    /// report a factor of `1.0`.
    pub fn update(&mut self, a: Point, b: Point) -> (Point, f64, Vec2) {
        let midpoint = a.midpoint(b);
        let distance = (b - a).hypot();
        let factor = if distance > 0.0 && self.distance > 0.0 {
            distance / self.distance
        } else {
            1.0
        };
        let pan = midpoint - self.midpoint;
        self.midpoint = midpoint;
        if distance > 0.0 {
            self.distance = distance;
        }
        (midpoint, factor, pan)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::PinchState;

    #[test]
    fn close_pointers_do_not_pinch() {
        assert!(PinchState::begin(Point::new(0.0, 0.0), Point::new(3.0, 4.0)).is_none());
        assert!(PinchState::begin(Point::new(0.0, 0.0), Point::new(30.0, 40.0)).is_some());
    }

    #[test]
    fn spreading_fingers_zoom_in_about_midpoint() {
        let mut pinch = PinchState::begin(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        let (anchor, factor, pan) = pinch.update(Point::new(-50.0, 0.0), Point::new(150.0, 0.0));
        assert_eq!(anchor, Point::new(50.0, 0.0));
        assert_eq!(factor, 2.0);
        assert_eq!(pan, Vec2::ZERO);
    }

    #[test]
    fn collapsed_pointers_keep_scale() {
        let mut pinch = PinchState::begin(Point::new(0.0, 0.0), Point::new(20.0, 0.0)).unwrap();
        let (_, factor, pan) = pinch.update(Point::new(30.0, 0.0), Point::new(30.0, 0.0));
        assert_eq!(factor, 1.0);
        assert_eq!(pan, Vec2::new(20.0, 0.0));
    }
}
