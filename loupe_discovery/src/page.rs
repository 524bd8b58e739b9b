// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between discovery and the page's element tree.

use alloc::vec::Vec;
use core::fmt::Debug;

use loupe_overlay::Host;

/// Identity stamped on a container once it has been wired.
///
/// The page stores it on the element itself, so wiring survives any number
/// of rescans without a second listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireKey(pub u32);

/// How an inline container is dressed once its diagram has rendered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decoration<'a> {
    /// Height cap for the inline container, in pixels.
    pub max_height: f64,
    /// Caption to insert, if any.
    pub hint: Option<&'a str>,
}

/// A [`Host`] that also exposes the page the diagrams live in.
pub trait Page: Host {
    /// Handle to a diagram container element.
    ///
    /// Equal handles name the same element.
    type Container: Clone + Debug + PartialEq;
    /// Handle to a live subtree observer.
    type Observer: Debug;

    /// Containers currently attached to the page that match `selector`, in
    /// document order.
    fn containers(&self, selector: &str) -> Vec<Self::Container>;
    /// Wiring marker stored on `container`, if any.
    fn marker(&self, container: &Self::Container) -> Option<WireKey>;
    /// Stores or clears the wiring marker on `container`.
    fn set_marker(&mut self, container: &Self::Container, key: Option<WireKey>);
    /// The rendered surface inside `container`, if rendering has finished.
    fn surface_of(&self, container: &Self::Container) -> Option<Self::Surface>;
    /// Registers a click listener that reports activations of `container`
    /// under `key`.
    fn listen_container(&mut self, container: &Self::Container, key: WireKey) -> Self::Listener;
    /// Starts observing additions anywhere in the page's element tree.
    fn observe(&mut self) -> Self::Observer;
    /// Stops an observer started with [`Page::observe`].
    fn disconnect(&mut self, observer: Self::Observer);
    /// Applies `decoration` to `container`.
    ///
    /// Must be idempotent: a caption already present is not inserted again.
    fn decorate(&mut self, container: &Self::Container, decoration: &Decoration<'_>);
}
