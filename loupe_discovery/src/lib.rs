// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=loupe_discovery --heading-base-level=0

//! Loupe Discovery: find rendered diagrams on a page and open them in a lightbox.
//!
//! Diagram containers appear whenever the page's renderer gets to them, often
//! well after the page itself has mounted. This crate bridges that gap:
//!
//! - [`Watcher`] scans the page for containers matching a selector, wires a
//!   click listener onto each one exactly once, and rescans on every
//!   mutation batch the page reports.
//! - [`PageSession`] owns one watcher and one
//!   [`Lightbox`](loupe_overlay::Lightbox) for the lifetime of a page, and
//!   on [`PageSession::unmount`] releases every observer, listener and
//!   scroll lock it took.
//!
//! The page is reached through the [`Page`] trait, an extension of
//! [`Host`](loupe_overlay::Host). [`headless::HeadlessPage`] implements it in
//! memory.
//!
//! ```rust
//! use kurbo::Rect;
//! use loupe_discovery::headless::HeadlessPage;
//! use loupe_discovery::{DiscoveryConfig, PageEvent, PageSession, DEFAULT_SELECTOR};
//! use loupe_overlay::Phase;
//! use loupe_view::SurfaceGeometry;
//!
//! let mut page = HeadlessPage::new(Rect::new(0.0, 0.0, 900.0, 600.0));
//! let mut session = PageSession::mount(&mut page, DiscoveryConfig::default()).unwrap();
//!
//! // A diagram renders after mount.
//! let container = page.add_container(DEFAULT_SELECTOR);
//! page.render_diagram(container, SurfaceGeometry::from_attributes(Some("0 0 800 400"), None, None));
//! session.handle(&mut page, PageEvent::Mutations);
//!
//! let key = page.marker_of(container).unwrap();
//! session.handle(&mut page, PageEvent::ContainerClick(key));
//! assert_eq!(session.lightbox().phase(), Phase::Opening);
//!
//! session.unmount(&mut page);
//! assert_eq!(page.live_observers(), 0);
//! assert!(!page.host().scroll_locked());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
pub mod headless;
mod page;
mod session;
mod watcher;

pub use config::{DEFAULT_HINT, DEFAULT_SELECTOR, DiscoveryConfig, DiscoveryConfigError};
pub use page::{Decoration, Page, WireKey};
pub use session::{PageEvent, PageSession};
pub use watcher::Watcher;
