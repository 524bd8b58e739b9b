// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=loupe_overlay --heading-base-level=0

//! Loupe Overlay: a headless lightbox for inspecting one diagram at a time.
//!
//! [`Lightbox`] clones a vector surface into a modal overlay, fits it to the
//! stage and lets the user pan and zoom it. Its life is a small state machine:
//!
//! ```text
//! Closed --open--> Opening --reveal--> Open --close--> Closing --teardown--> Closed
//! ```
//!
//! The lightbox never touches a platform API. Everything it needs, from
//! mounting the clone to scheduling the reveal, goes through the [`Host`]
//! trait; scheduled work comes back as a [`Tick`] passed to
//! [`Lightbox::handle`]. Each open starts a new [`SessionId`], and ticks
//! carrying an older id are ignored, so late timers can never act on a
//! newer session.
//!
//! Per session the lightbox
//!
//! - locks page scrolling and restores it on teardown,
//! - closes on a backdrop or close-button click, or on the first Escape,
//! - re-fits on resize after the events settle for the debounce interval,
//! - zooms around the diagram's visual center from the on-screen controls.
//!
//! [`HeadlessHost`] is an in-memory host with a virtual clock, suitable for
//! tests and for driving the lightbox outside a browser.
//!
//! ```rust
//! use core::time::Duration;
//! use kurbo::Rect;
//! use loupe_overlay::{HeadlessHost, Lightbox, LightboxConfig, LightboxEvent, Phase};
//! use loupe_view::SurfaceGeometry;
//!
//! let mut host = HeadlessHost::new(Rect::new(0.0, 0.0, 900.0, 600.0));
//! let diagram = host.add_surface(SurfaceGeometry::from_attributes(Some("0 0 800 400"), None, None));
//!
//! let mut lightbox = Lightbox::new(LightboxConfig::default().with_fit_padding(0.0));
//! lightbox.open(&mut host, &diagram);
//! assert_eq!(lightbox.phase(), Phase::Opening);
//!
//! for tick in host.advance(Duration::from_millis(10)) {
//!     lightbox.handle(&mut host, LightboxEvent::Tick(tick));
//! }
//! for tick in host.next_frame() {
//!     lightbox.handle(&mut host, LightboxEvent::Tick(tick));
//! }
//! assert_eq!(lightbox.phase(), Phase::Open);
//! assert_eq!(lightbox.viewport_state().unwrap().scale, 1.125);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod controller;
pub mod headless;
mod host;
mod lightbox;

pub use config::{ConfigError, LightboxConfig};
pub use controller::ViewportController;
pub use headless::{HeadlessHost, HeadlessSurface};
pub use host::{Binding, EventKind, Host, Key, Schedule, SessionId, Target, Task, Tick};
pub use lightbox::{Control, Lightbox, LightboxEvent, Phase};

pub use loupe_gesture::{GestureEvent, PointerId};
pub use loupe_view::{ClampMode, SurfaceGeometry, ViewportState, ZoomLimits};
