// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::drag::DragState;
use crate::pinch::PinchState;
use crate::wheel::{DEFAULT_WHEEL_SPEED, wheel_factor};

/// Identifier of an active pointer (mouse, pen or touch contact).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub i32);

/// Raw input delivered by the host, positions in view coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// A pointer went down on the surface.
    PointerDown {
        /// Pointer identity.
        id: PointerId,
        /// Position in view coordinates.
        position: Point,
        /// Whether the primary button (or a touch contact) caused the press.
        primary: bool,
    },
    /// An active pointer moved.
    PointerMove {
        /// Pointer identity.
        id: PointerId,
        /// Position in view coordinates.
        position: Point,
    },
    /// A pointer was released.
    PointerUp {
        /// Pointer identity.
        id: PointerId,
    },
    /// The platform cancelled a pointer.
    PointerCancel {
        /// Pointer identity.
        id: PointerId,
    },
    /// Wheel or trackpad scroll, with the delta already converted to pixels.
    Wheel {
        /// Pointer position in view coordinates.
        position: Point,
        /// Scroll delta in pixels.
        delta: Vec2,
    },
}

/// Pan/zoom operation requested by a gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    /// Move the content by a view-space delta.
    PanBy(Vec2),
    /// Multiply the scale by `factor`, keeping `anchor` fixed.
    ZoomAbout {
        /// Fixed point in view coordinates.
        anchor: Point,
        /// Multiplicative factor.
        factor: f64,
    },
    /// Pan by `pan`, then zoom by `factor` about `anchor`.
    Pinch {
        /// Current pinch midpoint in view coordinates.
        anchor: Point,
        /// Distance ratio since the previous update.
        factor: f64,
        /// Midpoint movement since the previous update.
        pan: Vec2,
    },
}

#[derive(Clone, Copy, Debug)]
struct ActivePointer {
    id: PointerId,
    position: Point,
}

/// Follows pointer and wheel input and emits [`Intent`]s.
///
/// At most two pointers are tracked; additional contacts are ignored until
/// one of the tracked ones lifts.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    pointers: SmallVec<[ActivePointer; 2]>,
    drag: DragState,
    pinch: Option<PinchState>,
    wheel_speed: f64,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(DEFAULT_WHEEL_SPEED)
    }
}

impl GestureTracker {
    /// Creates a tracker with the given wheel zoom speed.
    #[must_use]
    pub fn new(wheel_speed: f64) -> Self {
        Self {
            pointers: SmallVec::new(),
            drag: DragState::default(),
            pinch: None,
            wheel_speed,
        }
    }

    /// Number of pointers currently held down.
    #[must_use]
    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    /// Returns `true` while a pinch is in progress.
    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Forgets every active pointer.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.drag.end();
        self.pinch = None;
    }

    /// Feeds one event, returning the intent it produces, if any.
    pub fn handle(&mut self, event: GestureEvent) -> Option<Intent> {
        match event {
            GestureEvent::PointerDown {
                id,
                position,
                primary,
            } => {
                self.press(id, position, primary);
                None
            }
            GestureEvent::PointerMove { id, position } => self.moved(id, position),
            GestureEvent::PointerUp { id } | GestureEvent::PointerCancel { id } => {
                self.release(id);
                None
            }
            GestureEvent::Wheel { position, delta } => {
                let factor = wheel_factor(delta.y, self.wheel_speed);
                (factor != 1.0).then_some(Intent::ZoomAbout {
                    anchor: position,
                    factor,
                })
            }
        }
    }

    fn press(&mut self, id: PointerId, position: Point, primary: bool) {
        if self.pointers.iter().any(|p| p.id == id) || self.pointers.len() >= 2 {
            return;
        }
        if self.pointers.is_empty() && !primary {
            return;
        }
        self.pointers.push(ActivePointer { id, position });
        match self.pointers.as_slice() {
            [only] => self.drag.start(only.position),
            [a, b] => {
                self.drag.end();
                self.pinch = PinchState::begin(a.position, b.position);
            }
            _ => {}
        }
    }

    fn moved(&mut self, id: PointerId, position: Point) -> Option<Intent> {
        let tracked = self.pointers.iter_mut().find(|p| p.id == id)?;
        tracked.position = position;
        match self.pointers.as_slice() {
            [_] => self
                .drag
                .update(position)
                .filter(|delta| *delta != Vec2::ZERO)
                .map(Intent::PanBy),
            [a, b] => {
                let pinch = self.pinch.as_mut()?;
                let (anchor, factor, pan) = pinch.update(a.position, b.position);
                Some(Intent::Pinch {
                    anchor,
                    factor,
                    pan,
                })
            }
            _ => None,
        }
    }

    fn release(&mut self, id: PointerId) {
        let before = self.pointers.len();
        self.pointers.retain(|p| p.id != id);
        if self.pointers.len() == before {
            return;
        }
        self.pinch = None;
        match self.pointers.first() {
            // Keep panning with the remaining contact.
            Some(rest) => self.drag.start(rest.position),
            None => self.drag.end(),
        }
    }
}
