// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=loupe_gesture --heading-base-level=0

//! Loupe Gesture: turn raw pointer and wheel input into pan/zoom intents.
//!
//! [`GestureTracker`] follows up to two active pointers:
//!
//! - One primary pointer dragging produces [`Intent::PanBy`].
//! - Two pointers produce [`Intent::Pinch`]: the distance ratio is the zoom
//!   factor, the midpoint is the anchor, and midpoint motion pans.
//! - A vertical wheel delta produces [`Intent::ZoomAbout`] at the pointer.
//!
//! The tracker holds no viewport; callers apply intents to whatever owns
//! the pan/zoom state, keeping the content under the anchor fixed.
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use loupe_gesture::{GestureEvent, GestureTracker, Intent, PointerId};
//!
//! let mut gestures = GestureTracker::default();
//! let id = PointerId(1);
//! gestures.handle(GestureEvent::PointerDown { id, position: Point::new(10.0, 10.0), primary: true });
//! let intent = gestures.handle(GestureEvent::PointerMove { id, position: Point::new(14.0, 7.0) });
//! assert_eq!(intent, Some(Intent::PanBy(Vec2::new(4.0, -3.0))));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod drag;
mod pinch;
mod tracker;
mod wheel;

pub use drag::DragState;
pub use pinch::{MIN_PINCH_DISTANCE, PinchState};
pub use tracker::{GestureEvent, GestureTracker, Intent, PointerId};
pub use wheel::{DEFAULT_WHEEL_SPEED, wheel_factor};
