// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intrinsic surface geometry and the fit computation.

use core::num::ParseFloatError;

use kurbo::{Point, Rect, Size, Vec2};

use crate::limits::ZoomLimits;

/// Content size assumed when a surface exposes no usable geometry at all.
pub const FALLBACK_SIZE: Size = Size::new(500.0, 500.0);

/// Error returned by [`parse_view_box`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ViewBoxError {
    /// The attribute does not hold exactly four numbers.
    #[error("viewBox needs 4 numbers, found {found}")]
    WrongArity {
        /// Number of values found.
        found: usize,
    },
    /// One of the values is not a number.
    #[error("viewBox contains an invalid number")]
    InvalidNumber(#[from] ParseFloatError),
    /// One of the values is NaN or infinite.
    #[error("viewBox contains a non-finite number")]
    NotFinite,
    /// Width or height is negative.
    #[error("viewBox width and height must not be negative")]
    NegativeSize,
}

/// Parses an SVG `viewBox` attribute (`"min-x min-y width height"`).
///
/// Values may be separated by whitespace, commas, or both.
pub fn parse_view_box(value: &str) -> Result<Rect, ViewBoxError> {
    let mut values = [0.0_f64; 4];
    let mut found = 0;
    for token in value
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        if found < values.len() {
            values[found] = token.parse::<f64>()?;
        }
        found += 1;
    }
    if found != values.len() {
        return Err(ViewBoxError::WrongArity { found });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ViewBoxError::NotFinite);
    }
    let [x, y, w, h] = values;
    if w < 0.0 || h < 0.0 {
        return Err(ViewBoxError::NegativeSize);
    }
    Ok(Rect::from_origin_size(Point::new(x, y), Size::new(w, h)))
}

/// Parses a `width`/`height` attribute in user units or pixels.
///
/// Relative units such as `%` or `em` depend on layout and yield `None`.
#[must_use]
pub fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim_end();
    let parsed = number.parse::<f64>().ok()?;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

/// Geometry a host can read from a rendered vector surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceGeometry {
    /// Parsed `viewBox`, if present and valid.
    pub view_box: Option<Rect>,
    /// Explicit `width` attribute in pixels.
    pub width: Option<f64>,
    /// Explicit `height` attribute in pixels.
    pub height: Option<f64>,
    /// Rendered client size as measured by layout.
    pub client_size: Option<Size>,
}

impl SurfaceGeometry {
    /// Builds geometry from raw attribute values. Unparseable values are dropped.
    #[must_use]
    pub fn from_attributes(view_box: Option<&str>, width: Option<&str>, height: Option<&str>) -> Self {
        Self {
            view_box: view_box.and_then(|v| parse_view_box(v).ok()),
            width: width.and_then(parse_length),
            height: height.and_then(parse_length),
            client_size: None,
        }
    }

    /// Adds a measured client size.
    #[must_use]
    pub fn with_client_size(mut self, size: Size) -> Self {
        self.client_size = Some(size);
        self
    }

    /// Returns the content bounding box in the surface's user space.
    ///
    /// Sources are tried in order: a non-empty `viewBox`, the explicit
    /// `width`/`height` pair, the measured client size, then
    /// [`FALLBACK_SIZE`]. The result always has a positive, finite area.
    #[must_use]
    pub fn content_box(&self) -> Rect {
        if let Some(vb) = self.view_box.filter(|r| usable_size(r.size())) {
            return vb;
        }
        if let (Some(w), Some(h)) = (self.width, self.height) {
            let size = Size::new(w, h);
            if usable_size(size) {
                return Rect::from_origin_size(Point::ZERO, size);
            }
        }
        if let Some(size) = self.client_size.filter(|s| usable_size(*s)) {
            return Rect::from_origin_size(Point::ZERO, size);
        }
        Rect::from_origin_size(Point::ZERO, FALLBACK_SIZE)
    }

    /// Height an inline container should be capped at to show this surface
    /// at its native size.
    ///
    /// Uses the `viewBox` height, then the `height` attribute, then the
    /// height of [`FALLBACK_SIZE`].
    #[must_use]
    pub fn inline_max_height(&self) -> f64 {
        self.view_box
            .map(|vb| vb.height())
            .filter(|h| *h > 0.0)
            .or(self.height.filter(|h| *h > 0.0))
            .unwrap_or(FALLBACK_SIZE.height)
    }
}

fn usable_size(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

/// Scale and translation that place a content box inside an available area.
///
/// A content point `p` lands at `translation + scale * p`, relative to the
/// origin of the available area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
    /// Uniform scale factor, always inside the limits passed to [`fit`].
    pub scale: f64,
    /// Translation applied after scaling.
    pub translation: Vec2,
}

/// Fits `content` into an area of size `available`, centered, preserving
/// aspect ratio.
///
/// The raw scale `min(avail_w / w, avail_h / h)` is clamped into `limits`.
/// A content box without positive finite area is replaced by one of
/// [`FALLBACK_SIZE`] at the same origin. If `available` is itself degenerate
/// the scale is `limits.clamp(1.0)` and the content's origin is pinned to the
/// area origin.
#[must_use]
pub fn fit(content: Rect, available: Size, limits: ZoomLimits) -> Fit {
    let content = content.abs();
    let content = if usable_size(content.size()) {
        content
    } else {
        let origin = content.origin();
        let origin = if origin.x.is_finite() && origin.y.is_finite() {
            origin
        } else {
            Point::ZERO
        };
        Rect::from_origin_size(origin, FALLBACK_SIZE)
    };

    if !usable_size(available) {
        let scale = limits.clamp(1.0);
        return Fit {
            scale,
            translation: -content.origin().to_vec2() * scale,
        };
    }

    let sx = available.width / content.width();
    let sy = available.height / content.height();
    let scale = limits.clamp(sx.min(sy));
    let area_center = Vec2::new(available.width * 0.5, available.height * 0.5);
    Fit {
        scale,
        translation: area_center - content.center().to_vec2() * scale,
    }
}
