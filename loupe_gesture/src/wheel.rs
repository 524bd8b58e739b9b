// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Wheel zoom speed matching common pan/zoom widgets.
pub const DEFAULT_WHEEL_SPEED: f64 = 0.065;

/// Multiplicative zoom factor for a vertical wheel delta in pixels.
///
/// Positive deltas (scrolling down) zoom out. A single event changes the
/// scale by at most 25%.
#[must_use]
pub fn wheel_factor(delta_y: f64, speed: f64) -> f64 {
    if !delta_y.is_finite() || !speed.is_finite() || delta_y == 0.0 {
        return 1.0;
    }
    let step = (speed * delta_y / 128.0).abs().min(0.25);
    if delta_y > 0.0 { 1.0 - step } else { 1.0 + step }
}
