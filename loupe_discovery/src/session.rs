// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use loupe_overlay::{Lightbox, LightboxEvent};
use tracing::{debug, trace};

use crate::config::{DiscoveryConfig, DiscoveryConfigError};
use crate::page::{Page, WireKey};
use crate::watcher::Watcher;

/// Input delivered to [`PageSession::handle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PageEvent {
    /// The observer reported a batch of mutations.
    Mutations,
    /// A wired container was clicked.
    ContainerClick(WireKey),
    /// Input for the lightbox.
    Lightbox(LightboxEvent),
}

/// Everything the page shell mounts: one watcher and one lightbox.
///
/// Create it when the page mounts and call [`PageSession::unmount`] when it
/// goes away. Unmounting leaves no observer, listener, scroll lock or
/// overlay behind, even with the lightbox open.
pub struct PageSession<P: Page> {
    watcher: Watcher<P>,
    lightbox: Lightbox<P>,
    mounted: bool,
}

impl<P: Page> fmt::Debug for PageSession<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageSession")
            .field("watcher", &self.watcher)
            .field("lightbox", &self.lightbox)
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl<P: Page> PageSession<P> {
    /// Validates `config`, scans `page` and starts observing it.
    pub fn mount(page: &mut P, config: DiscoveryConfig) -> Result<Self, DiscoveryConfigError> {
        config.validate()?;
        let watcher = Watcher::start(page, &config);
        debug!(
            selector = %config.selector,
            wired = watcher.wired_count(),
            "page session mounted"
        );
        Ok(Self {
            watcher,
            lightbox: Lightbox::new(config.lightbox),
            mounted: true,
        })
    }

    /// Whether [`PageSession::unmount`] has not run yet.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The lightbox owned by this session.
    #[must_use]
    pub fn lightbox(&self) -> &Lightbox<P> {
        &self.lightbox
    }

    /// The container watcher owned by this session.
    #[must_use]
    pub fn watcher(&self) -> &Watcher<P> {
        &self.watcher
    }

    /// Processes one event. Events after unmount are dropped.
    pub fn handle(&mut self, page: &mut P, event: PageEvent) {
        if !self.mounted {
            trace!(?event, "dropping event after unmount");
            return;
        }
        match event {
            PageEvent::Mutations => {
                self.watcher.scan(page);
            }
            PageEvent::ContainerClick(key) => match self.watcher.surface_for(page, key) {
                Some(surface) => {
                    self.lightbox.open(page, &surface);
                }
                None => debug!(key = key.0, "ignoring activation, diagram not rendered yet"),
            },
            PageEvent::Lightbox(event) => self.lightbox.handle(page, event),
        }
    }

    /// Stops the watcher and releases the lightbox immediately.
    ///
    /// Calling it again is a no-op.
    pub fn unmount(&mut self, page: &mut P) {
        if !self.mounted {
            return;
        }
        self.watcher.stop(page);
        self.lightbox.shutdown(page);
        self.mounted = false;
        debug!("page session unmounted");
    }
}
