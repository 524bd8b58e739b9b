// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

/// Tracks a single-pointer drag and reports incremental movement.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragState {
    last: Option<Point>,
}

impl DragState {
    /// Starts (or restarts) a drag at `pos`.
    pub fn start(&mut self, pos: Point) {
        self.last = Some(pos);
    }

    /// Records a new position and returns the movement since the last one.
    ///
    /// Returns `None` while no drag is active.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        let last = self.last.as_mut()?;
        let delta = pos - *last;
        *last = pos;
        Some(delta)
    }

    /// Ends the drag.
    pub fn end(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` while a drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}
