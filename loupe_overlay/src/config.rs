// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use loupe_gesture::DEFAULT_WHEEL_SPEED;
use loupe_view::{ClampMode, ZoomLimits};

/// Tunables for a [`Lightbox`](crate::Lightbox).
///
/// Durations are kept in milliseconds so the type deserializes from plain
/// numbers when the `serde` feature is enabled.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LightboxConfig {
    /// Allowed scale range.
    pub zoom_limits: ZoomLimits,
    /// Factor applied by the zoom-in control; zoom-out uses its inverse.
    pub zoom_step: f64,
    /// Wheel zoom speed, see [`loupe_gesture::wheel_factor`].
    pub wheel_speed: f64,
    /// Pan clamping.
    pub clamp_mode: ClampMode,
    /// Margin kept free around the fitted diagram, in pixels.
    pub fit_padding: f64,
    /// Delay between mounting and starting the opening transition.
    pub reveal_delay_ms: u32,
    /// Length of the closing transition; teardown waits this long.
    pub transition_ms: u32,
    /// Quiet period after the last resize before re-fitting.
    pub resize_debounce_ms: u32,
}

/// Error returned by [`LightboxConfig::validate`].
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The zoom step must be finite and greater than one.
    #[error("zoom step must be finite and > 1, got {0}")]
    ZoomStep(f64),
    /// The wheel speed must be finite and positive.
    #[error("wheel speed must be finite and > 0, got {0}")]
    WheelSpeed(f64),
    /// The fit padding must be finite and not negative.
    #[error("fit padding must be finite and >= 0, got {0}")]
    FitPadding(f64),
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            zoom_limits: ZoomLimits::DEFAULT,
            zoom_step: 1.25,
            wheel_speed: DEFAULT_WHEEL_SPEED,
            clamp_mode: ClampMode::None,
            fit_padding: 24.0,
            reveal_delay_ms: 10,
            transition_ms: 200,
            resize_debounce_ms: 150,
        }
    }
}

impl LightboxConfig {
    /// Sets the allowed scale range.
    #[must_use]
    pub fn with_zoom_limits(mut self, limits: ZoomLimits) -> Self {
        self.zoom_limits = limits;
        self
    }

    /// Sets the control zoom step.
    #[must_use]
    pub fn with_zoom_step(mut self, step: f64) -> Self {
        self.zoom_step = step;
        self
    }

    /// Sets the wheel zoom speed.
    #[must_use]
    pub fn with_wheel_speed(mut self, speed: f64) -> Self {
        self.wheel_speed = speed;
        self
    }

    /// Sets the pan clamp mode.
    #[must_use]
    pub fn with_clamp_mode(mut self, mode: ClampMode) -> Self {
        self.clamp_mode = mode;
        self
    }

    /// Sets the fit padding.
    #[must_use]
    pub fn with_fit_padding(mut self, padding: f64) -> Self {
        self.fit_padding = padding;
        self
    }

    /// Sets the closing transition length.
    #[must_use]
    pub fn with_transition_ms(mut self, ms: u32) -> Self {
        self.transition_ms = ms;
        self
    }

    /// Sets the resize debounce window.
    #[must_use]
    pub fn with_resize_debounce_ms(mut self, ms: u32) -> Self {
        self.resize_debounce_ms = ms;
        self
    }

    /// Checks values that cannot be expressed in the field types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(ConfigError::ZoomStep(self.zoom_step));
        }
        if !self.wheel_speed.is_finite() || self.wheel_speed <= 0.0 {
            return Err(ConfigError::WheelSpeed(self.wheel_speed));
        }
        if !self.fit_padding.is_finite() || self.fit_padding < 0.0 {
            return Err(ConfigError::FitPadding(self.fit_padding));
        }
        Ok(())
    }

    /// Delay before the opening transition starts.
    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms.into())
    }

    /// Closing transition length.
    #[must_use]
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms.into())
    }

    /// Resize debounce window.
    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms.into())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, LightboxConfig};

    #[test]
    fn defaults_are_valid() {
        assert_eq!(LightboxConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let c = LightboxConfig::default().with_zoom_step(1.0);
        assert_eq!(c.validate(), Err(ConfigError::ZoomStep(1.0)));
        let c = LightboxConfig::default().with_wheel_speed(-0.1);
        assert_eq!(c.validate(), Err(ConfigError::WheelSpeed(-0.1)));
        let c = LightboxConfig::default().with_fit_padding(f64::NAN);
        assert!(matches!(c.validate(), Err(ConfigError::FitPadding(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_keeps_defaults() {
        let c: LightboxConfig =
            serde_json::from_str(r#"{ "zoom_limits": [8.0, 0.5], "transition_ms": 300 }"#).unwrap();
        assert_eq!(c.zoom_limits.min(), 0.5);
        assert_eq!(c.zoom_limits.max(), 8.0);
        assert_eq!(c.transition_ms, 300);
        assert_eq!(c.zoom_step, LightboxConfig::default().zoom_step);

        let bad = serde_json::from_str::<LightboxConfig>(r#"{ "zoom_limits": [0.0, 2.0] }"#);
        assert!(bad.is_err(), "non-positive zoom limits must be rejected");
    }
}
