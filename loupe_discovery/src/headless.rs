// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`Page`] built on [`HeadlessHost`].
//!
//! Containers are registered under the exact selector string that should
//! find them. Rendering a diagram into a container, removing it, and
//! observing mutations are all explicit calls, so tests control precisely
//! what discovery sees.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use loupe_overlay::{
    Binding, EventKind, HeadlessHost, HeadlessSurface, Host, Phase, Schedule, Target, Tick,
    ViewportState,
};
use loupe_view::SurfaceGeometry;

use crate::page::{Decoration, Page, WireKey};

/// Container handle used by [`HeadlessPage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HeadlessContainer(usize);

/// Observer handle issued by [`HeadlessPage`].
#[derive(Debug, PartialEq, Eq)]
pub struct HeadlessObserver(u64);

#[derive(Debug)]
struct Element {
    selector: String,
    attached: bool,
    marker: Option<WireKey>,
    surface: Option<HeadlessSurface>,
    max_height: Option<f64>,
    hint: Option<String>,
    decorations: usize,
}

/// Reference page. See the [module docs](self).
#[derive(Debug)]
pub struct HeadlessPage {
    host: HeadlessHost,
    elements: Vec<Element>,
    observers: BTreeSet<u64>,
    next_observer: u64,
    stray_disconnects: usize,
}

impl HeadlessPage {
    /// Creates an empty page whose lightbox stage covers `stage`.
    #[must_use]
    pub fn new(stage: Rect) -> Self {
        Self {
            host: HeadlessHost::new(stage),
            elements: Vec::new(),
            observers: BTreeSet::new(),
            next_observer: 0,
            stray_disconnects: 0,
        }
    }

    /// The underlying host.
    #[must_use]
    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    /// Mutable access to the underlying host, to move its clock.
    pub fn host_mut(&mut self) -> &mut HeadlessHost {
        &mut self.host
    }

    /// Adds an empty container that `selector` matches.
    pub fn add_container(&mut self, selector: &str) -> HeadlessContainer {
        self.elements.push(Element {
            selector: String::from(selector),
            attached: true,
            marker: None,
            surface: None,
            max_height: None,
            hint: None,
            decorations: 0,
        });
        HeadlessContainer(self.elements.len() - 1)
    }

    /// Finishes rendering a diagram into `container`.
    pub fn render_diagram(
        &mut self,
        container: HeadlessContainer,
        geometry: SurfaceGeometry,
    ) -> HeadlessSurface {
        let surface = self.host.add_surface(geometry);
        self.elements[container.0].surface = Some(surface.clone());
        surface
    }

    /// Detaches `container` from the page.
    pub fn remove_container(&mut self, container: HeadlessContainer) {
        self.elements[container.0].attached = false;
    }

    /// Marker currently stored on `container`.
    #[must_use]
    pub fn marker_of(&self, container: HeadlessContainer) -> Option<WireKey> {
        self.elements[container.0].marker
    }

    /// Height cap applied to `container`, if decorated.
    #[must_use]
    pub fn max_height_of(&self, container: HeadlessContainer) -> Option<f64> {
        self.elements[container.0].max_height
    }

    /// Caption inserted into `container`, if any.
    #[must_use]
    pub fn hint_of(&self, container: HeadlessContainer) -> Option<&str> {
        self.elements[container.0].hint.as_deref()
    }

    /// Number of times `container` was decorated.
    #[must_use]
    pub fn decorations_of(&self, container: HeadlessContainer) -> usize {
        self.elements[container.0].decorations
    }

    /// Number of live observers.
    #[must_use]
    pub fn live_observers(&self) -> usize {
        self.observers.len()
    }

    /// Number of live container click listeners.
    #[must_use]
    pub fn container_listeners(&self) -> usize {
        self.host
            .listeners_for(Binding::new(Target::Container, EventKind::Click))
    }

    /// Observer handles given back that were never issued or already returned.
    #[must_use]
    pub fn stray_disconnects(&self) -> usize {
        self.stray_disconnects
    }
}

impl Host for HeadlessPage {
    type Surface = HeadlessSurface;
    type Listener = <HeadlessHost as Host>::Listener;
    type Timer = <HeadlessHost as Host>::Timer;

    fn clone_surface(&mut self, original: &HeadlessSurface) -> Option<HeadlessSurface> {
        self.host.clone_surface(original)
    }

    fn mount(&mut self, clone: &HeadlessSurface) {
        self.host.mount(clone);
    }

    fn unmount(&mut self, clone: &HeadlessSurface) {
        self.host.unmount(clone);
    }

    fn set_phase(&mut self, phase: Phase) {
        self.host.set_phase(phase);
    }

    fn lock_scroll(&mut self) {
        self.host.lock_scroll();
    }

    fn unlock_scroll(&mut self) {
        self.host.unlock_scroll();
    }

    fn listen(&mut self, binding: Binding) -> Self::Listener {
        self.host.listen(binding)
    }

    fn unlisten(&mut self, listener: Self::Listener) {
        self.host.unlisten(listener);
    }

    fn schedule(&mut self, tick: Tick, when: Schedule) -> Self::Timer {
        self.host.schedule(tick, when)
    }

    fn cancel(&mut self, timer: Self::Timer) {
        self.host.cancel(timer);
    }

    fn stage_rect(&self) -> Rect {
        self.host.stage_rect()
    }

    fn surface_geometry(&self, surface: &HeadlessSurface) -> SurfaceGeometry {
        self.host.surface_geometry(surface)
    }

    fn surface_rect(&self, surface: &HeadlessSurface) -> Option<Rect> {
        self.host.surface_rect(surface)
    }

    fn render(&mut self, surface: &HeadlessSurface, content: Rect, state: ViewportState) {
        self.host.render(surface, content, state);
    }
}

impl Page for HeadlessPage {
    type Container = HeadlessContainer;
    type Observer = HeadlessObserver;

    fn containers(&self, selector: &str) -> Vec<HeadlessContainer> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.attached && e.selector == selector)
            .map(|(i, _)| HeadlessContainer(i))
            .collect()
    }

    fn marker(&self, container: &HeadlessContainer) -> Option<WireKey> {
        self.elements[container.0].marker
    }

    fn set_marker(&mut self, container: &HeadlessContainer, key: Option<WireKey>) {
        self.elements[container.0].marker = key;
    }

    fn surface_of(&self, container: &HeadlessContainer) -> Option<HeadlessSurface> {
        self.elements[container.0].surface.clone()
    }

    fn listen_container(&mut self, _: &HeadlessContainer, _: WireKey) -> Self::Listener {
        self.host
            .listen(Binding::new(Target::Container, EventKind::Click))
    }

    fn observe(&mut self) -> HeadlessObserver {
        let id = self.next_observer;
        self.next_observer += 1;
        self.observers.insert(id);
        HeadlessObserver(id)
    }

    fn disconnect(&mut self, observer: HeadlessObserver) {
        if !self.observers.remove(&observer.0) {
            self.stray_disconnects += 1;
        }
    }

    fn decorate(&mut self, container: &HeadlessContainer, decoration: &Decoration<'_>) {
        let element = &mut self.elements[container.0];
        element.max_height = Some(decoration.max_height);
        if element.hint.is_none() {
            element.hint = decoration.hint.map(String::from);
        }
        element.decorations += 1;
    }
}
