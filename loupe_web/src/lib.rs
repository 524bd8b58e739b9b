// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=loupe_web --heading-base-level=0

//! Loupe Web: the diagram lightbox in a browser.
//!
//! This crate implements the [`Host`](loupe_overlay::Host) and
//! [`Page`](loupe_discovery::Page) seams on top of `web-sys` and exports a
//! single handle, `DiagramLightbox`, through `wasm-bindgen`:
//!
//! - `DiagramLightbox.mount(configJson?)` injects a stylesheet and the overlay
//!   (backdrop, stage, zoom and close buttons), wires every container
//!   matching the configured selector (by default
//!   `.docusaurus-mermaid-container`) and watches the document for more.
//! - `unmount()` removes every listener, observer, timer and element it added
//!   and restores the page's `overflow`.
//!
//! The configuration is a JSON object shaped like
//! [`DiscoveryConfig`](loupe_discovery::DiscoveryConfig); missing fields keep
//! their defaults. See [`parse_config`].
//!
//! On targets other than `wasm32` only a stub `DiagramLightbox` is provided,
//! whose `mount` validates the configuration and then reports
//! [`WebError::Unsupported`].

#[cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "helpers for the wasm32 DOM host")
)]
mod convert;
mod error;
#[cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "only the wasm32 DOM host injects styles")
)]
mod style;
#[cfg(target_arch = "wasm32")]
mod web;

pub use convert::parse_config;
pub use error::WebError;

#[cfg(target_arch = "wasm32")]
pub use web::DiagramLightbox;

/// Stand-in for the browser handle on targets without a DOM.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct DiagramLightbox;

#[cfg(not(target_arch = "wasm32"))]
impl DiagramLightbox {
    /// Validates `config_json`, then fails: there is no document to mount on.
    pub fn mount(config_json: Option<String>) -> Result<Self, WebError> {
        parse_config(config_json.as_deref())?;
        Err(WebError::Unsupported)
    }

    /// Does nothing.
    pub fn unmount(&mut self) {}

    /// Always `false`.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        false
    }
}
