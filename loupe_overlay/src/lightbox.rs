// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect};
use loupe_gesture::GestureEvent;
use loupe_view::ViewportState;
use tracing::{debug, trace, warn};

use crate::config::LightboxConfig;
use crate::controller::ViewportController;
use crate::host::{Binding, EventKind, Host, Key, Schedule, SessionId, Target, Task, Tick};

/// Where the lightbox is in its open/close cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing is mounted.
    #[default]
    Closed,
    /// Mounted, waiting for the opening transition.
    Opening,
    /// Fully shown and interactive.
    Open,
    /// Playing the closing transition; teardown is pending.
    Closing,
}

/// On-screen overlay controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// Zoom in by the configured step.
    ZoomIn,
    /// Zoom out by the configured step.
    ZoomOut,
    /// Re-fit the diagram to the stage.
    Reset,
}

/// Input delivered to [`Lightbox::handle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightboxEvent {
    /// Click on the backdrop.
    BackdropClick,
    /// Click on the close affordance.
    CloseClick,
    /// Key press on the document.
    Key(Key),
    /// The window was resized.
    Resize,
    /// One of the zoom/reset controls was activated.
    Control(Control),
    /// Raw pointer or wheel input on the surface.
    Gesture(GestureEvent),
    /// A previously scheduled tick fired.
    Tick(Tick),
}

const SESSION_BINDINGS: [Binding; 6] = [
    Binding::new(Target::Backdrop, EventKind::Click),
    Binding::new(Target::CloseButton, EventKind::Click),
    Binding::new(Target::ZoomIn, EventKind::Click),
    Binding::new(Target::ZoomOut, EventKind::Click),
    Binding::new(Target::Reset, EventKind::Click),
    Binding::new(Target::Window, EventKind::Resize),
];

struct Timers<H: Host> {
    reveal: Option<H::Timer>,
    fit: Option<H::Timer>,
    refit: Option<H::Timer>,
    teardown: Option<H::Timer>,
}

impl<H: Host> Timers<H> {
    fn slot(&mut self, task: Task) -> &mut Option<H::Timer> {
        match task {
            Task::Reveal => &mut self.reveal,
            Task::InitialFit => &mut self.fit,
            Task::Refit => &mut self.refit,
            Task::Teardown => &mut self.teardown,
        }
    }

    fn cancel(&mut self, task: Task, host: &mut H) {
        if let Some(timer) = self.slot(task).take() {
            host.cancel(timer);
        }
    }

    fn cancel_all(&mut self, host: &mut H) {
        for task in [Task::Reveal, Task::InitialFit, Task::Refit, Task::Teardown] {
            self.cancel(task, host);
        }
    }
}

/// Everything one open-to-close cycle registered.
struct Session<H: Host> {
    id: SessionId,
    clone: H::Surface,
    content: Option<Rect>,
    controller: ViewportController<H>,
    listeners: Vec<H::Listener>,
    escape: Option<H::Listener>,
    timers: Timers<H>,
}

impl<H: Host> Session<H> {
    fn schedule(&mut self, host: &mut H, task: Task, when: Schedule) {
        self.timers.cancel(task, host);
        let timer = host.schedule(
            Tick {
                session: self.id,
                task,
            },
            when,
        );
        *self.timers.slot(task) = Some(timer);
    }

    fn fit(&mut self, host: &mut H, padding: f64) {
        let stage = host.stage_rect();
        let content = host.surface_geometry(&self.clone).content_box();
        self.controller.set_view_rect(stage);
        let fitted = self.controller.fit(content, padding);
        self.content = Some(content);
        debug!(
            session = self.id.0,
            scale = fitted.scale,
            content_w = content.width(),
            content_h = content.height(),
            "fitted diagram to stage"
        );
        host.render(&self.clone, content, self.controller.state());
    }

    fn render(&self, host: &mut H) {
        if let Some(content) = self.content {
            host.render(&self.clone, content, self.controller.state());
        }
    }

    /// Visual center of the diagram as currently displayed.
    fn visual_center(&self, host: &H) -> Point {
        host.surface_rect(&self.clone)
            .or_else(|| self.controller.viewport().content_view_rect())
            .unwrap_or_else(|| self.controller.viewport().view_rect())
            .center()
    }

    /// Releases every resource this session registered.
    fn release(mut self, host: &mut H) {
        self.timers.cancel_all(host);
        if let Some(escape) = self.escape.take() {
            host.unlisten(escape);
        }
        for listener in self.listeners.drain(..) {
            host.unlisten(listener);
        }
        self.controller.dispose(host);
        host.unmount(&self.clone);
        host.unlock_scroll();
    }
}

/// Modal overlay presenting one cloned diagram surface with pan and zoom.
///
/// At most one session exists at a time. Opening while a session is live
/// releases that session first, so overlays never stack.
///
/// The lightbox is sans-IO: the host delivers input through
/// [`Lightbox::handle`], including the [`Tick`]s it was asked to schedule.
pub struct Lightbox<H: Host> {
    config: LightboxConfig,
    phase: Phase,
    session: Option<Session<H>>,
    next_session: u64,
}

impl<H: Host> fmt::Debug for Lightbox<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lightbox")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("session", &self.session.as_ref().map(|s| s.id))
            .finish_non_exhaustive()
    }
}

impl<H: Host> Lightbox<H> {
    /// Creates a closed lightbox.
    #[must_use]
    pub fn new(config: LightboxConfig) -> Self {
        Self {
            config,
            phase: Phase::Closed,
            session: None,
            next_session: 0,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Identity of the live session, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Pan/zoom state of the live session, if any.
    #[must_use]
    pub fn viewport_state(&self) -> Option<ViewportState> {
        self.session.as_ref().map(|s| s.controller.state())
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &LightboxConfig {
        &self.config
    }

    /// Opens the lightbox on a clone of `surface`.
    ///
    /// Any live session, whatever its phase, is released first. Returns
    /// `None`, leaving the lightbox untouched, if the host cannot clone
    /// `surface`.
    pub fn open(&mut self, host: &mut H, surface: &H::Surface) -> Option<SessionId> {
        let Some(clone) = host.clone_surface(surface) else {
            warn!("could not clone surface, ignoring activation");
            return None;
        };
        if let Some(previous) = self.session.take() {
            debug!(session = previous.id.0, "discarding live session before opening");
            previous.release(host);
        }

        let id = SessionId(self.next_session);
        self.next_session += 1;

        host.mount(&clone);
        host.lock_scroll();
        host.set_phase(Phase::Opening);

        let listeners = SESSION_BINDINGS
            .iter()
            .map(|binding| host.listen(*binding))
            .collect();
        let escape = Some(host.listen(Binding::new(Target::Document, EventKind::KeyDown)));

        let mut controller = ViewportController::new(host.stage_rect(), &self.config);
        controller.attach(host);

        let mut session = Session {
            id,
            clone,
            content: None,
            controller,
            listeners,
            escape,
            timers: Timers {
                reveal: None,
                fit: None,
                refit: None,
                teardown: None,
            },
        };
        session.schedule(host, Task::Reveal, Schedule::After(self.config.reveal_delay()));

        debug!(session = id.0, "lightbox opening");
        self.session = Some(session);
        self.phase = Phase::Opening;
        Some(id)
    }

    /// Starts the closing transition.
    ///
    /// Only meaningful while opening or open; otherwise a no-op.
    pub fn close(&mut self, host: &mut H) {
        if !matches!(self.phase, Phase::Opening | Phase::Open) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for task in [Task::Reveal, Task::InitialFit, Task::Refit] {
            session.timers.cancel(task, host);
        }
        session.schedule(
            host,
            Task::Teardown,
            Schedule::After(self.config.transition()),
        );
        host.set_phase(Phase::Closing);
        debug!(session = session.id.0, "lightbox closing");
        self.phase = Phase::Closing;
    }

    /// Releases everything immediately, skipping the closing transition.
    ///
    /// Safe to call in any phase, any number of times.
    pub fn shutdown(&mut self, host: &mut H) {
        if let Some(session) = self.session.take() {
            debug!(session = session.id.0, "lightbox shut down");
            session.release(host);
            host.set_phase(Phase::Closed);
        }
        self.phase = Phase::Closed;
    }

    /// Processes one event.
    pub fn handle(&mut self, host: &mut H, event: LightboxEvent) {
        match event {
            LightboxEvent::Tick(tick) => self.on_tick(host, tick),
            LightboxEvent::BackdropClick | LightboxEvent::CloseClick => self.close(host),
            LightboxEvent::Key(Key::Escape) => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                // One-shot: the key listener goes away as soon as Escape is seen.
                let Some(escape) = session.escape.take() else {
                    return;
                };
                host.unlisten(escape);
                self.close(host);
            }
            LightboxEvent::Key(Key::Other) => {}
            LightboxEvent::Resize => {
                if !matches!(self.phase, Phase::Opening | Phase::Open) {
                    return;
                }
                if let Some(session) = self.session.as_mut() {
                    let debounce = self.config.resize_debounce();
                    session.schedule(host, Task::Refit, Schedule::After(debounce));
                }
            }
            LightboxEvent::Control(control) => self.on_control(host, control),
            LightboxEvent::Gesture(gesture) => {
                if self.phase != Phase::Open {
                    return;
                }
                if let Some(session) = self.session.as_mut() {
                    if session.controller.handle_gesture(gesture) {
                        session.render(host);
                    }
                }
            }
        }
    }

    fn on_tick(&mut self, host: &mut H, tick: Tick) {
        let padding = self.config.fit_padding;
        let Some(session) = self.session.as_mut().filter(|s| s.id == tick.session) else {
            trace!(session = tick.session.0, task = ?tick.task, "ignoring stale tick");
            return;
        };
        // The timer fired; its handle is spent.
        if session.timers.slot(tick.task).take().is_none() {
            trace!(session = tick.session.0, task = ?tick.task, "ignoring cancelled tick");
            return;
        }
        match (tick.task, self.phase) {
            (Task::Reveal, Phase::Opening) => {
                host.set_phase(Phase::Open);
                self.phase = Phase::Open;
                session.schedule(host, Task::InitialFit, Schedule::NextFrame);
                debug!(session = session.id.0, "lightbox open");
            }
            (Task::InitialFit | Task::Refit, Phase::Opening | Phase::Open) => {
                session.fit(host, padding);
            }
            (Task::Teardown, Phase::Closing) => {
                if let Some(session) = self.session.take() {
                    debug!(session = session.id.0, "lightbox closed");
                    session.release(host);
                }
                host.set_phase(Phase::Closed);
                self.phase = Phase::Closed;
            }
            (task, phase) => {
                trace!(task = ?task, phase = ?phase, "tick does not apply in this phase");
            }
        }
    }

    fn on_control(&mut self, host: &mut H, control: Control) {
        if self.phase != Phase::Open {
            return;
        }
        let step = self.config.zoom_step;
        let padding = self.config.fit_padding;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match control {
            Control::ZoomIn | Control::ZoomOut => {
                let factor = if control == Control::ZoomIn { step } else { 1.0 / step };
                let anchor = session.visual_center(host);
                session.controller.zoom_by(anchor, factor);
                session.render(host);
            }
            Control::Reset => session.fit(host, padding),
        }
    }
}
