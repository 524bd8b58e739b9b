// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the lightbox and the page it runs in.

use core::fmt::Debug;
use core::time::Duration;

use kurbo::Rect;
use loupe_view::{SurfaceGeometry, ViewportState};

use crate::lightbox::Phase;

/// Something a listener can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// The dimmed area around the stage.
    Backdrop,
    /// The close affordance.
    CloseButton,
    /// The zoom-in affordance.
    ZoomIn,
    /// The zoom-out affordance.
    ZoomOut,
    /// The reset-to-fit affordance.
    Reset,
    /// The mounted clone of the surface.
    Surface,
    /// The browser window (or equivalent top-level viewport).
    Window,
    /// The document, for keyboard input.
    Document,
    /// A diagram container in the page.
    Container,
}

/// Kind of event a listener receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Primary activation.
    Click,
    /// Key press.
    KeyDown,
    /// Viewport size change.
    Resize,
    /// Pointer pressed.
    PointerDown,
    /// Pointer moved.
    PointerMove,
    /// Pointer released.
    PointerUp,
    /// Pointer cancelled by the platform.
    PointerCancel,
    /// Wheel or trackpad scroll.
    Wheel,
}

/// A listener registration request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binding {
    /// Element the listener is attached to.
    pub target: Target,
    /// Event the listener receives.
    pub kind: EventKind,
}

impl Binding {
    /// Creates a binding.
    #[must_use]
    pub const fn new(target: Target, kind: EventKind) -> Self {
        Self { target, kind }
    }
}

/// Keys the lightbox reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// The Escape key.
    Escape,
    /// Any other key.
    Other,
}

/// Identity of one open-to-close cycle of the lightbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Deferred work a session schedules on the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Task {
    /// Finish the opening transition.
    Reveal,
    /// First fit once the clone has layout.
    InitialFit,
    /// Debounced fit after resizing.
    Refit,
    /// Final teardown after the closing transition.
    Teardown,
}

/// A scheduled callback, delivered back through
/// [`LightboxEvent::Tick`](crate::LightboxEvent::Tick).
///
/// The session id acts as a cancellation token: ticks for a session that is
/// no longer current are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tick {
    /// Session that scheduled the work.
    pub session: SessionId,
    /// What to do.
    pub task: Task,
}

/// When a tick should fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    /// Before the next paint, once layout is up to date.
    NextFrame,
    /// After a delay.
    After(Duration),
}

/// Services the lightbox needs from its environment.
///
/// Implementations own the actual presentation (a DOM, a test double, ...).
/// The lightbox never holds references into the host; it keeps only the
/// opaque handles returned here and gives each one back exactly once.
pub trait Host {
    /// Handle to a vector surface.
    type Surface: Clone + Debug;
    /// Handle to a registered listener.
    type Listener: Debug;
    /// Handle to a scheduled tick.
    type Timer: Debug;

    /// Makes a deep copy of `original`; the original is never modified.
    ///
    /// Returns `None` if the copy could not be made.
    fn clone_surface(&mut self, original: &Self::Surface) -> Option<Self::Surface>;
    /// Shows the overlay with `clone` on its stage.
    fn mount(&mut self, clone: &Self::Surface);
    /// Removes `clone` and hides the overlay.
    fn unmount(&mut self, clone: &Self::Surface);
    /// Reflects the lightbox phase, typically by toggling transition classes.
    fn set_phase(&mut self, phase: Phase);
    /// Prevents the page behind the overlay from scrolling.
    fn lock_scroll(&mut self);
    /// Restores page scrolling as it was before [`Host::lock_scroll`].
    fn unlock_scroll(&mut self);
    /// Registers a listener.
    fn listen(&mut self, binding: Binding) -> Self::Listener;
    /// Removes a listener.
    fn unlisten(&mut self, listener: Self::Listener);
    /// Schedules `tick` to be delivered later.
    fn schedule(&mut self, tick: Tick, when: Schedule) -> Self::Timer;
    /// Cancels a tick that has not fired yet.
    fn cancel(&mut self, timer: Self::Timer);
    /// Area available for the diagram, in the coordinates gestures use.
    fn stage_rect(&self) -> Rect;
    /// Intrinsic and measured geometry of `surface`.
    fn surface_geometry(&self, surface: &Self::Surface) -> SurfaceGeometry;
    /// Current on-screen rectangle of `surface`, if it has layout.
    fn surface_rect(&self, surface: &Self::Surface) -> Option<Rect>;
    /// Displays `surface` whose content box is `content` with `state` applied.
    fn render(&mut self, surface: &Self::Surface, content: Rect, state: ViewportState);
}
