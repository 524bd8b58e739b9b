// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Inclusive range of allowed scale factors.
///
/// The invariant `0 < min <= max` holds for every value produced by
/// [`ZoomLimits::new`] and [`ZoomLimits::try_new`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "[f64; 2]", into = "[f64; 2]"))]
pub struct ZoomLimits {
    min: f64,
    max: f64,
}

/// Error returned by [`ZoomLimits::try_new`] for unusable bounds.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ZoomLimitsError {
    /// One of the bounds is NaN or infinite.
    #[error("zoom limits must be finite, got [{min}, {max}]")]
    NotFinite {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },
    /// One of the bounds is zero or negative.
    #[error("zoom limits must be positive, got [{min}, {max}]")]
    NotPositive {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },
}

impl ZoomLimits {
    /// Limits used when nothing else is configured: `[0.2, 8.0]`.
    pub const DEFAULT: Self = Self { min: 0.2, max: 8.0 };

    /// Creates limits from two bounds, swapping them if given out of order.
    ///
    /// Bounds that are not finite and positive fall back to [`Self::DEFAULT`];
    /// use [`Self::try_new`] to detect that case.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        Self::try_new(a, b).unwrap_or(Self::DEFAULT)
    }

    /// Creates limits from two bounds, swapping them if given out of order.
    pub fn try_new(a: f64, b: f64) -> Result<Self, ZoomLimitsError> {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        if !min.is_finite() || !max.is_finite() {
            return Err(ZoomLimitsError::NotFinite { min, max });
        }
        if min <= 0.0 {
            return Err(ZoomLimitsError::NotPositive { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamps `scale` into the range. NaN maps to the lower bound.
    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.min;
        }
        scale.clamp(self.min, self.max)
    }

    /// Returns `true` if `scale` lies inside the range.
    #[must_use]
    pub fn contains(&self, scale: f64) -> bool {
        self.min <= scale && scale <= self.max
    }
}

impl TryFrom<[f64; 2]> for ZoomLimits {
    type Error = ZoomLimitsError;

    fn try_from([a, b]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::try_new(a, b)
    }
}

impl From<ZoomLimits> for [f64; 2] {
    fn from(limits: ZoomLimits) -> Self {
        [limits.min, limits.max]
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::{ZoomLimits, ZoomLimitsError};

    #[test]
    fn out_of_order_bounds_are_swapped() {
        let limits = ZoomLimits::new(8.0, 0.5);
        assert_eq!(limits.min(), 0.5);
        assert_eq!(limits.max(), 8.0);
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        assert!(matches!(
            ZoomLimits::try_new(0.0, 2.0),
            Err(ZoomLimitsError::NotPositive { .. })
        ));
        assert!(matches!(
            ZoomLimits::try_new(f64::NAN, 2.0),
            Err(ZoomLimitsError::NotFinite { .. })
        ));
        assert_eq!(
            ZoomLimits::new(-1.0, f64::INFINITY),
            ZoomLimits::DEFAULT,
            "invalid input should fall back to the default range"
        );
    }

    #[test]
    fn clamp_handles_nan_and_extremes() {
        let limits = ZoomLimits::new(0.5, 4.0);
        assert_eq!(limits.clamp(f64::NAN), 0.5);
        assert_eq!(limits.clamp(f64::INFINITY), 4.0);
        assert_eq!(limits.clamp(0.0), 0.5);
        assert_eq!(limits.clamp(2.0), 2.0);
        assert!(limits.contains(4.0));
        assert!(!limits.contains(4.000_001));
    }
}
