// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=loupe_view --heading-base-level=0

//! Loupe View: headless pan/zoom state and fit geometry for a diagram lightbox.
//!
//! This crate holds the pure parts of the lightbox:
//! - Reading a vector surface's intrinsic geometry (`viewBox`, `width`,
//!   `height`, measured client size) into a content box, with fallbacks.
//! - Fitting a content box into an available stage rectangle under zoom limits.
//! - A [`Viewport`] that owns scale + translation and exposes the zoom/pan
//!   primitives used by gestures and on-screen controls.
//!
//! It does **not** touch a DOM, register listeners or schedule anything.
//! `loupe_overlay` wires these primitives to a host.
//!
//! ## Fitting a diagram
//!
//! ```rust
//! use kurbo::Size;
//! use loupe_view::{SurfaceGeometry, ZoomLimits, fit};
//!
//! let geometry = SurfaceGeometry::from_attributes(Some("0 0 800 400"), None, None);
//! let content = geometry.content_box();
//! let fitted = fit(content, Size::new(900.0, 600.0), ZoomLimits::new(0.2, 8.0));
//! assert_eq!(fitted.scale, 1.125);
//! ```
//!
//! ## Zooming about a point
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use loupe_view::{Viewport, ZoomLimits};
//!
//! let mut view = Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0), ZoomLimits::new(0.5, 4.0));
//! let anchor = Point::new(200.0, 150.0);
//! let under_anchor = view.view_to_world_point(anchor);
//! view.zoom_by(anchor, 2.0);
//! assert!((view.view_to_world_point(anchor) - under_anchor).hypot() < 1e-9);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod geometry;
mod limits;
mod modes;
mod viewport;

pub use geometry::{
    FALLBACK_SIZE, Fit, SurfaceGeometry, ViewBoxError, fit, parse_length, parse_view_box,
};
pub use limits::{ZoomLimits, ZoomLimitsError};
pub use modes::ClampMode;
pub use viewport::{Viewport, ViewportDebugInfo, ViewportState};
