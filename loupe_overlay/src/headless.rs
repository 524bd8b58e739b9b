// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`Host`] that records what the lightbox asks of it.
//!
//! `HeadlessHost` keeps a virtual clock instead of real timers: scheduled
//! ticks are returned by [`HeadlessHost::next_frame`] and
//! [`HeadlessHost::advance`] and must be fed back into the lightbox by the
//! caller. Every handle it gives out is checked on return, so tests can
//! assert that nothing leaked and nothing was released twice.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::time::Duration;

use kurbo::{Affine, Rect};
use loupe_view::{SurfaceGeometry, ViewportState};

use crate::host::{Binding, Host, Schedule, Tick};
use crate::lightbox::Phase;

/// Surface handle used by [`HeadlessHost`].
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessSurface {
    /// Unique id; clones get fresh ids.
    pub id: u32,
    /// Id of the surface this one was cloned from.
    pub cloned_from: Option<u32>,
    /// Geometry reported for this surface.
    pub geometry: SurfaceGeometry,
}

/// Listener handle issued by [`HeadlessHost`].
#[derive(Debug, PartialEq, Eq)]
pub struct HeadlessListener(u64);

/// Timer handle issued by [`HeadlessHost`].
#[derive(Debug, PartialEq, Eq)]
pub struct HeadlessTimer(u64);

#[derive(Clone, Copy, Debug)]
struct Pending {
    tick: Tick,
    due: Option<Duration>,
}

/// Reference host with a virtual clock. See the [module docs](self).
#[derive(Debug)]
pub struct HeadlessHost {
    stage: Rect,
    now: Duration,
    next_surface: u32,
    next_handle: u64,
    phase: Phase,
    scroll_locks: i32,
    mounted: Vec<HeadlessSurface>,
    listeners: BTreeMap<u64, Binding>,
    timers: BTreeMap<u64, Pending>,
    rendered: BTreeMap<u32, (Rect, ViewportState)>,
    renders: usize,
    stray_releases: usize,
}

impl HeadlessHost {
    /// Creates a host whose stage covers `stage`.
    #[must_use]
    pub fn new(stage: Rect) -> Self {
        Self {
            stage,
            now: Duration::ZERO,
            next_surface: 0,
            next_handle: 0,
            phase: Phase::Closed,
            scroll_locks: 0,
            mounted: Vec::new(),
            listeners: BTreeMap::new(),
            timers: BTreeMap::new(),
            rendered: BTreeMap::new(),
            renders: 0,
            stray_releases: 0,
        }
    }

    /// Creates an in-page surface with the given geometry.
    pub fn add_surface(&mut self, geometry: SurfaceGeometry) -> HeadlessSurface {
        let id = self.next_surface;
        self.next_surface += 1;
        HeadlessSurface {
            id,
            cloned_from: None,
            geometry,
        }
    }

    /// Changes the stage size, as a window resize would.
    pub fn set_stage(&mut self, stage: Rect) {
        self.stage = stage;
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Last phase the lightbox reported.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether page scrolling is locked.
    #[must_use]
    pub fn scroll_locked(&self) -> bool {
        self.scroll_locks > 0
    }

    /// Net number of lock calls not yet balanced by an unlock.
    #[must_use]
    pub fn scroll_lock_depth(&self) -> i32 {
        self.scroll_locks
    }

    /// Surfaces currently mounted in the overlay.
    #[must_use]
    pub fn mounted(&self) -> &[HeadlessSurface] {
        &self.mounted
    }

    /// Number of live listeners.
    #[must_use]
    pub fn live_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Number of live listeners for `binding`.
    #[must_use]
    pub fn listeners_for(&self, binding: Binding) -> usize {
        self.listeners.values().filter(|b| **b == binding).count()
    }

    /// Number of ticks scheduled and not yet fired or cancelled.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Ticks scheduled and not yet fired or cancelled, in scheduling order.
    #[must_use]
    pub fn pending_ticks(&self) -> Vec<Tick> {
        self.timers.values().map(|p| p.tick).collect()
    }

    /// Handles given back that were never issued or were already returned.
    #[must_use]
    pub fn stray_releases(&self) -> usize {
        self.stray_releases
    }

    /// Number of [`Host::render`] calls so far.
    #[must_use]
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Last state rendered for `surface`.
    #[must_use]
    pub fn rendered(&self, surface: &HeadlessSurface) -> Option<ViewportState> {
        self.rendered.get(&surface.id).map(|(_, state)| *state)
    }

    /// Fires every tick scheduled for the next frame.
    pub fn next_frame(&mut self) -> Vec<Tick> {
        self.take_where(|p| p.due.is_none())
    }

    /// Moves the clock forward by `by`, firing frame ticks and every delayed
    /// tick that has come due, earliest first.
    pub fn advance(&mut self, by: Duration) -> Vec<Tick> {
        self.now += by;
        let now = self.now;
        let mut fired = self.take_where(|p| p.due.is_none());
        let mut due: Vec<(Duration, u64, Tick)> = Vec::new();
        self.timers.retain(|handle, p| match p.due {
            Some(at) if at <= now => {
                due.push((at, *handle, p.tick));
                false
            }
            _ => true,
        });
        due.sort_by_key(|(at, handle, _)| (*at, *handle));
        fired.extend(due.into_iter().map(|(_, _, tick)| tick));
        fired
    }

    fn take_where(&mut self, mut pred: impl FnMut(&Pending) -> bool) -> Vec<Tick> {
        let mut fired = Vec::new();
        self.timers.retain(|_, p| {
            if pred(p) {
                fired.push(p.tick);
                false
            } else {
                true
            }
        });
        fired
    }

    fn handle(&mut self) -> u64 {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }
}

impl Host for HeadlessHost {
    type Surface = HeadlessSurface;
    type Listener = HeadlessListener;
    type Timer = HeadlessTimer;

    fn clone_surface(&mut self, original: &HeadlessSurface) -> Option<HeadlessSurface> {
        let mut clone = self.add_surface(original.geometry);
        clone.cloned_from = Some(original.id);
        Some(clone)
    }

    fn mount(&mut self, clone: &HeadlessSurface) {
        self.mounted.push(clone.clone());
    }

    fn unmount(&mut self, clone: &HeadlessSurface) {
        let before = self.mounted.len();
        self.mounted.retain(|s| s.id != clone.id);
        if self.mounted.len() == before {
            self.stray_releases += 1;
        }
        self.rendered.remove(&clone.id);
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    fn lock_scroll(&mut self) {
        self.scroll_locks += 1;
    }

    fn unlock_scroll(&mut self) {
        self.scroll_locks -= 1;
    }

    fn listen(&mut self, binding: Binding) -> HeadlessListener {
        let h = self.handle();
        self.listeners.insert(h, binding);
        HeadlessListener(h)
    }

    fn unlisten(&mut self, listener: HeadlessListener) {
        if self.listeners.remove(&listener.0).is_none() {
            self.stray_releases += 1;
        }
    }

    fn schedule(&mut self, tick: Tick, when: Schedule) -> HeadlessTimer {
        let h = self.handle();
        let due = match when {
            Schedule::NextFrame => None,
            Schedule::After(delay) => Some(self.now + delay),
        };
        self.timers.insert(h, Pending { tick, due });
        HeadlessTimer(h)
    }

    fn cancel(&mut self, timer: HeadlessTimer) {
        // Cancelling a timer that already fired is allowed, as with
        // `clearTimeout`.
        self.timers.remove(&timer.0);
    }

    fn stage_rect(&self) -> Rect {
        self.stage
    }

    fn surface_geometry(&self, surface: &HeadlessSurface) -> SurfaceGeometry {
        surface.geometry
    }

    fn surface_rect(&self, surface: &HeadlessSurface) -> Option<Rect> {
        self.rendered.get(&surface.id).map(|(content, state)| {
            let to_view = Affine::translate(self.stage.origin().to_vec2()) * state.affine();
            to_view.transform_rect_bbox(*content)
        })
    }

    fn render(&mut self, surface: &HeadlessSurface, content: Rect, state: ViewportState) {
        self.rendered.insert(surface.id, (content, state));
        self.renders += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{EventKind, SessionId, Target, Task};

    fn tick(task: Task) -> Tick {
        Tick {
            session: SessionId(0),
            task,
        }
    }

    #[test]
    fn advance_fires_due_ticks_in_order() {
        let mut host = HeadlessHost::new(Rect::ZERO);
        host.schedule(tick(Task::Teardown), Schedule::After(Duration::from_millis(20)));
        host.schedule(tick(Task::Reveal), Schedule::After(Duration::from_millis(10)));
        host.schedule(tick(Task::InitialFit), Schedule::NextFrame);

        assert_eq!(host.advance(Duration::from_millis(5)), [tick(Task::InitialFit)]);
        assert_eq!(
            host.advance(Duration::from_millis(20)),
            [tick(Task::Reveal), tick(Task::Teardown)]
        );
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn cancelled_ticks_never_fire() {
        let mut host = HeadlessHost::new(Rect::ZERO);
        let timer = host.schedule(tick(Task::Refit), Schedule::After(Duration::from_millis(1)));
        host.cancel(timer);
        assert!(host.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn double_release_is_counted() {
        let mut host = HeadlessHost::new(Rect::ZERO);
        let binding = Binding::new(Target::Window, EventKind::Resize);
        let listener = host.listen(binding);
        assert_eq!(host.listeners_for(binding), 1);
        host.unlisten(listener);
        host.unlisten(HeadlessListener(0));
        assert_eq!(host.stray_releases(), 1);

        let surface = host.add_surface(SurfaceGeometry::default());
        let clone = host.clone_surface(&surface).unwrap();
        assert_ne!(clone.id, surface.id);
        host.mount(&clone);
        host.unmount(&clone);
        host.unmount(&clone);
        assert_eq!(host.stray_releases(), 2);
    }
}
