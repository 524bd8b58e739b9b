// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::geometry::{Fit, fit};
use crate::limits::ZoomLimits;
use crate::modes::ClampMode;

/// Scale and translation of the content, relative to the view rect origin.
///
/// A content point `p` is displayed at `view_origin + translation + scale * p`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    /// Uniform scale factor.
    pub scale: f64,
    /// Translation in view pixels.
    pub translation: Vec2,
}

impl ViewportState {
    /// Unit scale, no translation.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translation: Vec2::ZERO,
    };

    /// Content-to-view transform, relative to the view rect origin.
    #[must_use]
    pub fn affine(&self) -> Affine {
        Affine::translate(self.translation) * Affine::scale(self.scale)
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Fit> for ViewportState {
    fn from(fit: Fit) -> Self {
        Self {
            scale: fit.scale,
            translation: fit.translation,
        }
    }
}

/// Pan/zoom state for one displayed surface.
///
/// `Viewport` maps content coordinates into a rectangle in view (device)
/// space. Its scale never leaves the configured [`ZoomLimits`]; translation
/// is free unless [`ClampMode::Contain`] is selected and content bounds are
/// known.
#[derive(Clone, Debug)]
pub struct Viewport {
    view_rect: Rect,
    content: Option<Rect>,
    limits: ZoomLimits,
    clamp_mode: ClampMode,
    state: ViewportState,
    world_to_view: Affine,
    view_to_world: Affine,
}

impl Viewport {
    /// Creates a viewport covering `view_rect`.
    ///
    /// The initial scale is `1.0` clamped into `limits`, with no translation.
    #[must_use]
    pub fn new(view_rect: Rect, limits: ZoomLimits) -> Self {
        let mut vp = Self {
            view_rect,
            content: None,
            limits,
            clamp_mode: ClampMode::default(),
            state: ViewportState {
                scale: limits.clamp(1.0),
                translation: Vec2::ZERO,
            },
            world_to_view: Affine::IDENTITY,
            view_to_world: Affine::IDENTITY,
        };
        vp.rebuild_transforms();
        vp
    }

    /// Current view rectangle in device coordinates.
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        self.view_rect
    }

    /// Moves or resizes the view rectangle. Scale and translation are kept.
    pub fn set_view_rect(&mut self, rect: Rect) {
        if self.view_rect == rect {
            return;
        }
        self.view_rect = rect;
        self.rebuild_transforms();
        self.clamp_to_content();
    }

    /// Content bounds used by [`ClampMode::Contain`], if known.
    #[must_use]
    pub fn content_bounds(&self) -> Option<Rect> {
        self.content
    }

    /// Sets the content bounds used for clamping.
    pub fn set_content_bounds(&mut self, bounds: Option<Rect>) {
        if self.content == bounds {
            return;
        }
        self.content = bounds;
        self.clamp_to_content();
    }

    /// Current zoom limits.
    #[must_use]
    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Replaces the zoom limits, re-clamping the scale about the view center.
    pub fn set_limits(&mut self, limits: ZoomLimits) {
        self.limits = limits;
        let center = self.view_rect.center();
        self.zoom_abs(center, self.state.scale);
    }

    /// Current clamp mode.
    #[must_use]
    pub fn clamp_mode(&self) -> ClampMode {
        self.clamp_mode
    }

    /// Sets the clamp mode for panning relative to content bounds.
    pub fn set_clamp_mode(&mut self, mode: ClampMode) {
        if self.clamp_mode != mode {
            self.clamp_mode = mode;
            self.clamp_to_content();
        }
    }

    /// Snapshot of scale and translation.
    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.state
    }

    /// Current scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    /// Sets an absolute scale, keeping the content under `anchor` (view
    /// coordinates) fixed on screen.
    ///
    /// `target` is clamped into the zoom limits. Non-finite or non-positive
    /// targets are ignored.
    pub fn zoom_abs(&mut self, anchor: Point, target: f64) {
        if !target.is_finite() || target <= 0.0 || !is_finite_point(anchor) {
            return;
        }
        let new_scale = self.limits.clamp(target);
        if (new_scale - self.state.scale).abs() < f64::EPSILON {
            return;
        }

        let world_at_anchor = self.view_to_world_point(anchor);
        self.state.scale = new_scale;
        self.rebuild_transforms();
        let drifted = self.world_to_view_point(world_at_anchor);
        self.state.translation += anchor - drifted;
        self.rebuild_transforms();
        self.clamp_to_content();
    }

    /// Multiplies the scale by `factor` around `anchor`.
    ///
    /// Equivalent to `zoom_abs(anchor, scale * factor)`.
    pub fn zoom_by(&mut self, anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.zoom_abs(anchor, self.state.scale * factor);
    }

    /// Sets an absolute translation. Non-finite input is ignored.
    pub fn pan_to(&mut self, translation: Vec2) {
        if !translation.is_finite() || translation == self.state.translation {
            return;
        }
        self.state.translation = translation;
        self.rebuild_transforms();
        self.clamp_to_content();
    }

    /// Moves the content by `delta` view pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        self.pan_to(self.state.translation + delta);
    }

    /// Fits `content` into the view rect inset by `padding` on every side,
    /// records it as the content bounds and returns the applied fit.
    pub fn fit_content(&mut self, content: Rect, padding: f64) -> Fit {
        let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
        let size = self.view_rect.size();
        let inner = Size::new(size.width - 2.0 * padding, size.height - 2.0 * padding);
        let (area, pad) = if inner.width > 0.0 && inner.height > 0.0 {
            (inner, padding)
        } else {
            (size, 0.0)
        };
        let mut fitted = fit(content, area, self.limits);
        fitted.translation += Vec2::new(pad, pad);

        self.content = Some(content);
        self.state = fitted.into();
        self.rebuild_transforms();
        self.clamp_to_content();
        fitted
    }

    /// Content bounds as currently displayed, in view coordinates.
    #[must_use]
    pub fn content_view_rect(&self) -> Option<Rect> {
        self.content.map(|r| self.world_to_view_rect(r))
    }

    /// Converts a content-space point into view coordinates.
    #[must_use]
    pub fn world_to_view_point(&self, pt: Point) -> Point {
        self.world_to_view * pt
    }

    /// Converts a view-space point into content coordinates.
    #[must_use]
    pub fn view_to_world_point(&self, pt: Point) -> Point {
        self.view_to_world * pt
    }

    /// Converts a content-space rectangle into view coordinates.
    #[must_use]
    pub fn world_to_view_rect(&self, rect: Rect) -> Rect {
        // Axis-aligned uniform scale: the two corners are enough.
        let p0 = self.world_to_view * rect.origin();
        let p1 = self.world_to_view * Point::new(rect.x1, rect.y1);
        Rect::from_points(p0, p1)
    }

    /// Snapshot of the viewport for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            view_rect: self.view_rect,
            content_bounds: self.content,
            content_view_rect: self.content_view_rect(),
            state: self.state,
            limits: self.limits,
            clamp_mode: self.clamp_mode,
        }
    }

    fn rebuild_transforms(&mut self) {
        let view_origin = self.view_rect.origin().to_vec2();
        // Content → view: scale, translate, then move into the view rect.
        self.world_to_view = Affine::translate(view_origin) * self.state.affine();
        self.view_to_world = self.world_to_view.inverse();
    }

    fn clamp_to_content(&mut self) {
        if self.clamp_mode == ClampMode::None {
            return;
        }
        let Some(content) = self.content_view_rect() else {
            return;
        };
        let view = self.view_rect;
        let dx = contain_axis(content.x0, content.x1, view.x0, view.x1);
        let dy = contain_axis(content.y0, content.y1, view.y0, view.y1);
        if dx != 0.0 || dy != 0.0 {
            self.state.translation += Vec2::new(dx, dy);
            self.rebuild_transforms();
        }
    }
}

/// Shift needed along one axis so that the smaller of `[c0, c1]` and
/// `[v0, v1]` lies inside the larger.
fn contain_axis(c0: f64, c1: f64, v0: f64, v1: f64) -> f64 {
    if c1 - c0 <= v1 - v0 {
        if c0 < v0 {
            v0 - c0
        } else if c1 > v1 {
            v1 - c1
        } else {
            0.0
        }
    } else if c0 > v0 {
        v0 - c0
    } else if c1 < v1 {
        v1 - c1
    } else {
        0.0
    }
}

fn is_finite_point(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Debug snapshot of a [`Viewport`].
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// View rectangle in device coordinates.
    pub view_rect: Rect,
    /// Content bounds, if known.
    pub content_bounds: Option<Rect>,
    /// Content bounds in view coordinates, if known.
    pub content_view_rect: Option<Rect>,
    /// Scale and translation.
    pub state: ViewportState,
    /// Zoom limits.
    pub limits: ZoomLimits,
    /// Clamp mode for panning.
    pub clamp_mode: ClampMode,
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Vec2};

    use super::{ClampMode, Viewport};
    use crate::ZoomLimits;

    fn viewport() -> Viewport {
        Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0), ZoomLimits::new(0.5, 4.0))
    }

    #[test]
    fn world_view_roundtrip_with_offset_view() {
        let mut vp = Viewport::new(Rect::new(40.0, 30.0, 840.0, 630.0), ZoomLimits::DEFAULT);
        vp.zoom_by(Point::new(100.0, 100.0), 1.7);
        vp.pan_by(Vec2::new(-13.0, 8.0));

        let world = Point::new(10.0, -5.0);
        let back = vp.view_to_world_point(vp.world_to_view_point(world));
        assert!((back - world).hypot() < 1e-9);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut vp = viewport();
        vp.pan_to(Vec2::new(35.0, -20.0));
        let anchor = Point::new(123.0, 456.0);
        let before = vp.view_to_world_point(anchor);

        vp.zoom_by(anchor, 2.0);
        let after = vp.view_to_world_point(anchor);

        assert_eq!(vp.scale(), 2.0);
        assert!((after - before).hypot() < 1e-9, "anchor drifted: {before:?} -> {after:?}");
    }

    #[test]
    fn zoom_abs_clamps_target() {
        let mut vp = viewport();
        vp.zoom_abs(Point::ZERO, 100.0);
        assert_eq!(vp.scale(), 4.0);
        vp.zoom_abs(Point::ZERO, 0.01);
        assert_eq!(vp.scale(), 0.5);
    }

    #[test]
    fn repeated_zoom_in_saturates() {
        let mut vp = viewport();
        let anchor = Point::new(400.0, 300.0);
        for _ in 0..1_000 {
            vp.zoom_by(anchor, 1.25);
        }
        assert_eq!(vp.scale(), 4.0);
        let t = vp.state().translation;
        assert!(t.is_finite());
    }

    #[test]
    fn invalid_factors_are_ignored() {
        let mut vp = viewport();
        let before = vp.state();
        vp.zoom_by(Point::ZERO, 0.0);
        vp.zoom_by(Point::ZERO, -2.0);
        vp.zoom_by(Point::ZERO, f64::NAN);
        vp.zoom_abs(Point::new(f64::NAN, 0.0), 2.0);
        vp.pan_to(Vec2::new(f64::INFINITY, 0.0));
        assert_eq!(vp.state(), before);
    }

    #[test]
    fn pan_is_unclamped_by_default() {
        let mut vp = viewport();
        vp.fit_content(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0);
        vp.pan_to(Vec2::new(10_000.0, -10_000.0));
        assert_eq!(vp.state().translation, Vec2::new(10_000.0, -10_000.0));
    }

    #[test]
    fn contain_keeps_small_content_inside_view() {
        let mut vp = viewport();
        vp.set_clamp_mode(ClampMode::Contain);
        vp.set_content_bounds(Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        vp.pan_by(Vec2::new(5_000.0, 5_000.0));

        let shown = vp.content_view_rect().unwrap();
        assert!(shown.x1 <= 800.0 + 1e-9 && shown.y1 <= 600.0 + 1e-9, "{shown:?}");
        assert!(shown.x0 >= -1e-9 && shown.y0 >= -1e-9, "{shown:?}");
    }

    #[test]
    fn contain_keeps_large_content_covering_view() {
        let mut vp = viewport();
        vp.set_clamp_mode(ClampMode::Contain);
        vp.set_content_bounds(Some(Rect::new(0.0, 0.0, 1_000.0, 1_000.0)));
        vp.pan_by(Vec2::new(300.0, 300.0));

        let shown = vp.content_view_rect().unwrap();
        assert!(shown.x0 <= 1e-9 && shown.y0 <= 1e-9, "{shown:?}");
        assert!(shown.x1 >= 800.0 - 1e-9 && shown.y1 >= 600.0 - 1e-9, "{shown:?}");
    }

    #[test]
    fn fit_content_applies_padding() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 948.0, 648.0), ZoomLimits::new(0.2, 8.0));
        let fitted = vp.fit_content(Rect::new(0.0, 0.0, 800.0, 400.0), 24.0);
        assert_eq!(fitted.scale, 1.125);
        let shown = vp.content_view_rect().unwrap();
        assert_eq!(shown, Rect::new(24.0, 99.0, 924.0, 549.0));
    }

    #[test]
    fn fit_content_ignores_padding_larger_than_view() {
        let mut vp = Viewport::new(Rect::new(0.0, 0.0, 40.0, 40.0), ZoomLimits::new(0.1, 8.0));
        let fitted = vp.fit_content(Rect::new(0.0, 0.0, 40.0, 40.0), 24.0);
        assert_eq!(fitted.scale, 1.0);
        assert_eq!(fitted.translation, Vec2::ZERO);
    }

    #[test]
    fn set_limits_reclamps_scale() {
        let mut vp = viewport();
        vp.zoom_abs(Point::ZERO, 4.0);
        vp.set_limits(ZoomLimits::new(0.5, 2.0));
        assert_eq!(vp.scale(), 2.0);
        let info = vp.debug_info();
        assert_eq!(info.limits.max(), 2.0);
        assert_eq!(info.clamp_mode, ClampMode::None);
    }
}
