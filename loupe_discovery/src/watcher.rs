// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::{HashMap, HashSet};
use tracing::{debug, trace};

use crate::config::DiscoveryConfig;
use crate::page::{Decoration, Page, WireKey};

struct Wired<P: Page> {
    container: P::Container,
    listener: P::Listener,
    decorated: bool,
}

/// Finds diagram containers as they appear and wires each one exactly once.
///
/// Diagrams render after the page has painted, so a single scan at mount
/// time is not enough. The watcher scans once on [`Watcher::start`], then
/// again for every mutation batch the page reports, until [`Watcher::stop`].
///
/// Wiring is recorded twice: as a [`WireKey`] marker on the element and in
/// the watcher's own table. A container counts as wired only when both
/// agree, so markers left behind by an earlier watcher or copied along with
/// an element are rewired rather than trusted.
pub struct Watcher<P: Page> {
    selector: String,
    hint: Option<String>,
    decorate: bool,
    observer: Option<P::Observer>,
    wired: HashMap<WireKey, Wired<P>>,
    next_key: u32,
    stopped: bool,
}

impl<P: Page> fmt::Debug for Watcher<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("selector", &self.selector)
            .field("observer", &self.observer)
            .field("wired", &self.wired.len())
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

impl<P: Page> Watcher<P> {
    /// Scans the page once and starts observing it.
    pub fn start(page: &mut P, config: &DiscoveryConfig) -> Self {
        let mut watcher = Self {
            selector: config.selector.clone(),
            hint: config.hint.clone(),
            decorate: config.decorate,
            observer: None,
            wired: HashMap::new(),
            next_key: 0,
            stopped: false,
        };
        watcher.scan(page);
        watcher.observer = Some(page.observe());
        watcher
    }

    /// Whether the page observer is connected.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    /// Number of containers currently wired.
    #[must_use]
    pub fn wired_count(&self) -> usize {
        self.wired.len()
    }

    /// Whether `key` names a wired container.
    #[must_use]
    pub fn is_wired(&self, key: WireKey) -> bool {
        self.wired.contains_key(&key)
    }

    /// Wires every matching container not wired yet and returns how many
    /// were newly wired.
    ///
    /// Containers that have left the page are unwired. Containers whose
    /// diagram has rendered since the last scan are decorated.
    pub fn scan(&mut self, page: &mut P) -> usize {
        if self.stopped {
            return 0;
        }
        let containers = page.containers(&self.selector);
        let mut seen = HashSet::with_capacity(containers.len());
        let mut newly_wired = 0;

        for container in containers {
            let key = match page.marker(&container) {
                Some(key)
                    if !seen.contains(&key)
                        && self
                            .wired
                            .get(&key)
                            .is_some_and(|wired| wired.container == container) =>
                {
                    key
                }
                stale => {
                    if let Some(stale) = stale {
                        trace!(key = stale.0, "rewiring container with a foreign marker");
                    }
                    newly_wired += 1;
                    self.wire(page, container)
                }
            };
            seen.insert(key);
            self.decorate_if_ready(page, key);
        }

        let gone: Vec<WireKey> = self
            .wired
            .keys()
            .filter(|key| !seen.contains(*key))
            .copied()
            .collect();
        for key in gone {
            if let Some(wired) = self.wired.remove(&key) {
                trace!(key = key.0, "container left the page");
                Self::unwire(page, key, wired);
            }
        }

        if newly_wired > 0 {
            debug!(
                newly_wired,
                total = self.wired.len(),
                selector = %self.selector,
                "wired diagram containers"
            );
        }
        newly_wired
    }

    /// The rendered surface inside the container wired as `key`.
    #[must_use]
    pub fn surface_for(&self, page: &P, key: WireKey) -> Option<P::Surface> {
        let wired = self.wired.get(&key)?;
        page.surface_of(&wired.container)
    }

    /// Disconnects the observer and unwires every container.
    ///
    /// Calling it again is a no-op.
    pub fn stop(&mut self, page: &mut P) {
        if let Some(observer) = self.observer.take() {
            page.disconnect(observer);
        }
        let count = self.wired.len();
        for (key, wired) in self.wired.drain() {
            Self::unwire(page, key, wired);
        }
        if !self.stopped {
            debug!(unwired = count, "watcher stopped");
        }
        self.stopped = true;
    }

    fn wire(&mut self, page: &mut P, container: P::Container) -> WireKey {
        let key = WireKey(self.next_key);
        self.next_key = self.next_key.wrapping_add(1);
        page.set_marker(&container, Some(key));
        let listener = page.listen_container(&container, key);
        self.wired.insert(
            key,
            Wired {
                container,
                listener,
                decorated: false,
            },
        );
        key
    }

    fn unwire(page: &mut P, key: WireKey, wired: Wired<P>) {
        page.unlisten(wired.listener);
        // The element may have been rewired under a newer key meanwhile.
        if page.marker(&wired.container) == Some(key) {
            page.set_marker(&wired.container, None);
        }
    }

    fn decorate_if_ready(&mut self, page: &mut P, key: WireKey) {
        if !self.decorate {
            return;
        }
        let Some(wired) = self.wired.get_mut(&key) else {
            return;
        };
        if wired.decorated {
            return;
        }
        let Some(surface) = page.surface_of(&wired.container) else {
            trace!(key = key.0, "container has no rendered surface yet");
            return;
        };
        let geometry = page.surface_geometry(&surface);
        let decoration = Decoration {
            max_height: geometry.inline_max_height(),
            hint: self.hint.as_deref(),
        };
        page.decorate(&wired.container, &decoration);
        wired.decorated = true;
    }
}
