// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Vec2};
use loupe_gesture::{GestureEvent, GestureTracker, Intent};
use loupe_view::{Fit, Viewport, ViewportState};

use crate::config::LightboxConfig;
use crate::host::{Binding, EventKind, Host, Target};

const GESTURE_EVENTS: [EventKind; 5] = [
    EventKind::PointerDown,
    EventKind::PointerMove,
    EventKind::PointerUp,
    EventKind::PointerCancel,
    EventKind::Wheel,
];

/// Pan/zoom state of the displayed surface plus the gesture listeners
/// feeding it.
///
/// Zoom and pan operations delegate to [`Viewport`], so the scale always
/// stays within the configured limits. The controller owns the gesture
/// listeners it registers and gives them back in [`Self::dispose`].
pub struct ViewportController<H: Host> {
    viewport: Viewport,
    gestures: GestureTracker,
    listeners: Vec<H::Listener>,
    disposed: bool,
}

impl<H: Host> fmt::Debug for ViewportController<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportController")
            .field("viewport", &self.viewport)
            .field("gestures", &self.gestures)
            .field("listeners", &self.listeners)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl<H: Host> ViewportController<H> {
    /// Creates a detached controller for a stage covering `view_rect`.
    #[must_use]
    pub fn new(view_rect: Rect, config: &LightboxConfig) -> Self {
        let mut viewport = Viewport::new(view_rect, config.zoom_limits);
        viewport.set_clamp_mode(config.clamp_mode);
        Self {
            viewport,
            gestures: GestureTracker::new(config.wheel_speed),
            listeners: Vec::new(),
            disposed: false,
        }
    }

    /// Registers drag, pinch and wheel listeners on the mounted surface.
    ///
    /// Does nothing once the controller has been disposed or when already
    /// attached.
    pub fn attach(&mut self, host: &mut H) {
        if self.disposed || !self.listeners.is_empty() {
            return;
        }
        for kind in GESTURE_EVENTS {
            let listener = host.listen(Binding::new(Target::Surface, kind));
            self.listeners.push(listener);
        }
    }

    /// Applies a raw gesture. Returns `true` if the state changed.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> bool {
        if self.disposed {
            return false;
        }
        let before = self.viewport.state();
        match self.gestures.handle(event) {
            Some(Intent::PanBy(delta)) => self.viewport.pan_by(delta),
            Some(Intent::ZoomAbout { anchor, factor }) => self.viewport.zoom_by(anchor, factor),
            Some(Intent::Pinch {
                anchor,
                factor,
                pan,
            }) => {
                self.viewport.pan_by(pan);
                self.viewport.zoom_by(anchor, factor);
            }
            None => {}
        }
        self.viewport.state() != before
    }

    /// Sets an absolute scale keeping `anchor` fixed on screen.
    pub fn zoom_abs(&mut self, anchor: Point, scale: f64) {
        self.viewport.zoom_abs(anchor, scale);
    }

    /// Multiplies the scale by `factor` keeping `anchor` fixed on screen.
    pub fn zoom_by(&mut self, anchor: Point, factor: f64) {
        self.viewport.zoom_by(anchor, factor);
    }

    /// Sets an absolute translation.
    pub fn pan_to(&mut self, translation: Vec2) {
        self.viewport.pan_to(translation);
    }

    /// Updates the stage rectangle.
    pub fn set_view_rect(&mut self, rect: Rect) {
        self.viewport.set_view_rect(rect);
    }

    /// Fits `content` into the stage with `padding` on every side.
    pub fn fit(&mut self, content: Rect, padding: f64) -> Fit {
        self.viewport.fit_content(content, padding)
    }

    /// Current scale and translation.
    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.viewport.state()
    }

    /// The underlying viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Returns `true` once [`Self::dispose`] has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Removes every listener this controller registered.
    ///
    /// Calling it again is a no-op.
    pub fn dispose(&mut self, host: &mut H) {
        for listener in self.listeners.drain(..) {
            host.unlisten(listener);
        }
        self.gestures.reset();
        self.disposed = true;
    }
}
