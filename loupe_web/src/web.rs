// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM implementation of [`Host`] and [`Page`], and the exported handle.
//!
//! Every DOM callback holds only a `Weak` reference to the shared state and
//! funnels into [`dispatch`], so the page and session are borrowed mutably
//! in exactly one place. Callbacks removed while an event is being handled
//! are parked in `retired` and dropped at the start of the next dispatch,
//! never while they may still be on the stack.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};
use loupe_discovery::{Decoration, Page, PageEvent, PageSession, WireKey};
use loupe_gesture::{GestureEvent, PointerId};
use loupe_overlay::{
    Binding, Control, EventKind, Host, LightboxEvent, Phase, Schedule, Target, Tick, ViewportState,
};
use loupe_view::SurfaceGeometry;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent,
    MutationObserver, MutationObserverInit, PointerEvent, WheelEvent, Window,
};

use crate::convert::{
    cancels_default, event_name, key_from_dom, parse_config, phase_name, surface_style,
    wheel_delta_pixels,
};
use crate::error::WebError;
use crate::style;

type Callback = Closure<dyn FnMut(JsValue)>;

/// Attribute holding a container's [`WireKey`].
const MARKER_ATTR: &str = "data-loupe-key";

/// Style applied to a freshly mounted clone until its first render.
const UNRENDERED_STYLE: &str = "position:absolute;left:0;top:0;visibility:hidden";

fn warn_on_err(result: Result<(), JsValue>, what: &str) {
    if let Err(err) = result {
        warn!(?err, "{what} failed");
    }
}

fn rect_of(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.right(), r.bottom())
}

fn html(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, WebError> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| WebError::Dom(format!("<{tag}> is not an HTML element")))
}

fn button(document: &Document, label: &str, text: &str) -> Result<HtmlElement, WebError> {
    let button = html(document, "button", style::BUTTON_CLASS)?;
    button.set_attribute("type", "button")?;
    button.set_attribute("aria-label", label)?;
    button.set_text_content(Some(text));
    Ok(button)
}

/// The overlay's fixed DOM.
#[derive(Debug)]
struct Overlay {
    root: HtmlElement,
    backdrop: HtmlElement,
    stage: HtmlElement,
    close: HtmlElement,
    zoom_in: HtmlElement,
    zoom_out: HtmlElement,
    reset: HtmlElement,
}

impl Overlay {
    fn build(document: &Document, transition_ms: u32) -> Result<Self, WebError> {
        let root = html(document, "div", style::OVERLAY_CLASS)?;
        root.set_attribute("role", "dialog")?;
        root.set_attribute("aria-modal", "true")?;
        root.set_attribute("data-phase", phase_name(Phase::Closed))?;
        root.style()
            .set_property(style::TRANSITION_VAR, &format!("{transition_ms}ms"))?;

        let backdrop = html(document, "div", style::BACKDROP_CLASS)?;
        let stage = html(document, "div", style::STAGE_CLASS)?;
        let controls = html(document, "div", style::CONTROLS_CLASS)?;
        let zoom_in = button(document, "Zoom in", "+")?;
        let zoom_out = button(document, "Zoom out", "\u{2212}")?;
        let reset = button(document, "Fit to screen", "\u{2922}")?;
        let close = button(document, "Close", "\u{00d7}")?;
        for control in [&zoom_in, &zoom_out, &reset, &close] {
            controls.append_child(control)?;
        }
        root.append_child(&backdrop)?;
        root.append_child(&stage)?;
        root.append_child(&controls)?;

        Ok(Self {
            root,
            backdrop,
            stage,
            close,
            zoom_in,
            zoom_out,
            reset,
        })
    }
}

struct Listener {
    target: EventTarget,
    name: &'static str,
    callback: Callback,
    wired: Option<Element>,
}

#[derive(Clone, Copy)]
enum TimerHandle {
    Timeout(i32),
    Frame(i32),
}

struct Timer {
    handle: TimerHandle,
    callback: Callback,
}

struct Observer {
    observer: MutationObserver,
    callback: Callback,
}

/// Listener handle for [`WebPage`].
#[derive(Debug)]
pub(crate) struct WebListener(u64);

/// Timer handle for [`WebPage`].
#[derive(Debug)]
pub(crate) struct WebTimer(u64);

/// Observer handle for [`WebPage`].
#[derive(Debug)]
pub(crate) struct WebObserver(u64);

/// The live document, seen through the [`Host`] and [`Page`] seams.
pub(crate) struct WebPage {
    this: Weak<RefCell<Inner>>,
    window: Window,
    document: Document,
    body: HtmlElement,
    stylesheet: Element,
    overlay: Overlay,
    mounted: Option<Element>,
    listeners: HashMap<u64, Listener>,
    timers: HashMap<u64, Timer>,
    observers: HashMap<u64, Observer>,
    retired: Vec<Callback>,
    saved_overflow: Option<String>,
    next_id: u64,
}

impl fmt::Debug for WebPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebPage")
            .field("mounted", &self.mounted.is_some())
            .field("listeners", &self.listeners.len())
            .field("timers", &self.timers.len())
            .field("observers", &self.observers.len())
            .field("scroll_locked", &self.saved_overflow.is_some())
            .finish_non_exhaustive()
    }
}

impl WebPage {
    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn add_listener(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        wired: Option<Element>,
        translate: impl Fn(&Event) -> Option<PageEvent> + 'static,
    ) -> WebListener {
        let id = self.next_id();
        let this = self.this.clone();
        let callback = Callback::new(move |event: JsValue| {
            let event: Event = event.unchecked_into();
            if let Some(page_event) = translate(&event) {
                dispatch(&this, page_event);
            }
        });
        let name = event_name(kind);
        let options = AddEventListenerOptions::new();
        options.set_passive(!cancels_default(kind));
        warn_on_err(
            target.add_event_listener_with_callback_and_add_event_listener_options(
                name,
                callback.as_ref().unchecked_ref(),
                &options,
            ),
            "addEventListener",
        );
        self.listeners.insert(
            id,
            Listener {
                target,
                name,
                callback,
                wired,
            },
        );
        WebListener(id)
    }

    fn remove_listener(&mut self, listener: Listener) {
        warn_on_err(
            listener
                .target
                .remove_event_listener_with_callback(
                    listener.name,
                    listener.callback.as_ref().unchecked_ref(),
                ),
            "removeEventListener",
        );
        if let Some(container) = &listener.wired {
            warn_on_err(
                container.class_list().remove_1(style::WIRED_CLASS),
                "classList.remove",
            );
        }
        self.retired.push(listener.callback);
    }

    fn clear_timer(&mut self, timer: Timer) {
        match timer.handle {
            TimerHandle::Timeout(handle) => self.window.clear_timeout_with_handle(handle),
            TimerHandle::Frame(handle) => {
                warn_on_err(
                    self.window.cancel_animation_frame(handle),
                    "cancelAnimationFrame",
                );
            }
        }
        self.retired.push(timer.callback);
    }

    fn target_for(&self, target: Target) -> EventTarget {
        let element: &HtmlElement = match target {
            Target::Backdrop => &self.overlay.backdrop,
            Target::CloseButton => &self.overlay.close,
            Target::ZoomIn => &self.overlay.zoom_in,
            Target::ZoomOut => &self.overlay.zoom_out,
            Target::Reset => &self.overlay.reset,
            Target::Window => return self.window.clone().into(),
            Target::Document => return self.document.clone().into(),
            Target::Surface => match &self.mounted {
                Some(surface) => return surface.clone().into(),
                None => {
                    warn!("surface listener requested with nothing mounted");
                    &self.overlay.stage
                }
            },
            Target::Container => {
                warn!("container listeners are registered per container");
                return self.document.clone().into();
            }
        };
        element.clone().into()
    }

    /// Releases everything still registered and removes the injected DOM.
    fn dispose(&mut self) {
        let listeners: Vec<Listener> = self.listeners.drain().map(|(_, l)| l).collect();
        for listener in listeners {
            self.remove_listener(listener);
        }
        let timers: Vec<Timer> = self.timers.drain().map(|(_, t)| t).collect();
        for timer in timers {
            self.clear_timer(timer);
        }
        for (_, observer) in self.observers.drain() {
            observer.observer.disconnect();
            self.retired.push(observer.callback);
        }
        self.unlock_scroll();
        self.overlay.root.remove();
        self.stylesheet.remove();
        self.mounted = None;
        self.retired.clear();
    }
}

fn translate(binding: Binding, event: &Event) -> Option<PageEvent> {
    let lightbox = match (binding.target, binding.kind) {
        (Target::Backdrop, EventKind::Click) => LightboxEvent::BackdropClick,
        (Target::CloseButton, EventKind::Click) => LightboxEvent::CloseClick,
        (Target::ZoomIn, EventKind::Click) => LightboxEvent::Control(Control::ZoomIn),
        (Target::ZoomOut, EventKind::Click) => LightboxEvent::Control(Control::ZoomOut),
        (Target::Reset, EventKind::Click) => LightboxEvent::Control(Control::Reset),
        (_, EventKind::KeyDown) => {
            let key = event.dyn_ref::<KeyboardEvent>()?.key();
            LightboxEvent::Key(key_from_dom(&key))
        }
        (_, EventKind::Resize) => LightboxEvent::Resize,
        (_, kind) => LightboxEvent::Gesture(gesture(kind, event)?),
    };
    Some(PageEvent::Lightbox(lightbox))
}

fn gesture(kind: EventKind, event: &Event) -> Option<GestureEvent> {
    if kind == EventKind::Wheel {
        let wheel = event.dyn_ref::<WheelEvent>()?;
        event.prevent_default();
        let page = event
            .current_target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .map_or(Size::ZERO, |e| rect_of(&e).size());
        return Some(GestureEvent::Wheel {
            position: Point::new(f64::from(wheel.client_x()), f64::from(wheel.client_y())),
            delta: wheel_delta_pixels(
                Vec2::new(wheel.delta_x(), wheel.delta_y()),
                wheel.delta_mode(),
                page,
            ),
        });
    }

    let pointer = event.dyn_ref::<PointerEvent>()?;
    let id = PointerId(pointer.pointer_id());
    let position = Point::new(f64::from(pointer.client_x()), f64::from(pointer.client_y()));
    match kind {
        EventKind::PointerDown => {
            event.prevent_default();
            if let Some(target) = event
                .current_target()
                .and_then(|t| t.dyn_into::<Element>().ok())
            {
                warn_on_err(target.set_pointer_capture(id.0), "setPointerCapture");
            }
            Some(GestureEvent::PointerDown {
                id,
                position,
                primary: pointer.is_primary(),
            })
        }
        EventKind::PointerMove => Some(GestureEvent::PointerMove { id, position }),
        EventKind::PointerUp => Some(GestureEvent::PointerUp { id }),
        EventKind::PointerCancel => Some(GestureEvent::PointerCancel { id }),
        _ => None,
    }
}

impl Host for WebPage {
    type Surface = Element;
    type Listener = WebListener;
    type Timer = WebTimer;

    fn clone_surface(&mut self, original: &Element) -> Option<Element> {
        match original.clone_node_with_deep(true) {
            Ok(node) => node.dyn_into::<Element>().ok(),
            Err(err) => {
                warn!(?err, "cloneNode failed");
                None
            }
        }
    }

    fn mount(&mut self, clone: &Element) {
        warn_on_err(clone.set_attribute("style", UNRENDERED_STYLE), "style");
        warn_on_err(clone.class_list().add_1(style::SURFACE_CLASS), "classList.add");
        warn_on_err(
            self.overlay.stage.append_child(clone).map(drop),
            "appendChild",
        );
        warn_on_err(
            self.overlay.root.class_list().add_1(style::MOUNTED_CLASS),
            "classList.add",
        );
        self.mounted = Some(clone.clone());
    }

    fn unmount(&mut self, clone: &Element) {
        clone.remove();
        if self.mounted.as_ref() == Some(clone) {
            self.mounted = None;
        }
        warn_on_err(
            self.overlay.root.class_list().remove_1(style::MOUNTED_CLASS),
            "classList.remove",
        );
    }

    fn set_phase(&mut self, phase: Phase) {
        warn_on_err(
            self.overlay
                .root
                .set_attribute("data-phase", phase_name(phase)),
            "data-phase",
        );
    }

    fn lock_scroll(&mut self) {
        if self.saved_overflow.is_some() {
            return;
        }
        let style = self.body.style();
        let previous = style.get_property_value("overflow").unwrap_or_default();
        warn_on_err(style.set_property("overflow", "hidden"), "overflow");
        self.saved_overflow = Some(previous);
    }

    fn unlock_scroll(&mut self) {
        let Some(previous) = self.saved_overflow.take() else {
            return;
        };
        let style = self.body.style();
        if previous.is_empty() {
            warn_on_err(style.remove_property("overflow").map(drop), "overflow");
        } else {
            warn_on_err(style.set_property("overflow", &previous), "overflow");
        }
    }

    fn listen(&mut self, binding: Binding) -> WebListener {
        let target = self.target_for(binding.target);
        self.add_listener(target, binding.kind, None, move |event| {
            translate(binding, event)
        })
    }

    fn unlisten(&mut self, listener: WebListener) {
        if let Some(listener) = self.listeners.remove(&listener.0) {
            self.remove_listener(listener);
        }
    }

    fn schedule(&mut self, tick: Tick, when: Schedule) -> WebTimer {
        let id = self.next_id();
        let this = self.this.clone();
        let callback = Callback::new(move |_: JsValue| fire_timer(&this, id, tick));
        let handle = match when {
            Schedule::NextFrame => self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .map(TimerHandle::Frame),
            Schedule::After(delay) => self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.as_ref().unchecked_ref(),
                    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX),
                )
                .map(TimerHandle::Timeout),
        };
        match handle {
            Ok(handle) => {
                self.timers.insert(id, Timer { handle, callback });
            }
            Err(err) => warn!(?err, task = ?tick.task, "could not schedule tick"),
        }
        WebTimer(id)
    }

    fn cancel(&mut self, timer: WebTimer) {
        if let Some(timer) = self.timers.remove(&timer.0) {
            self.clear_timer(timer);
        }
    }

    fn stage_rect(&self) -> Rect {
        rect_of(&self.overlay.stage)
    }

    fn surface_geometry(&self, surface: &Element) -> SurfaceGeometry {
        let attr = |name: &str| surface.get_attribute(name);
        SurfaceGeometry::from_attributes(
            attr("viewBox").as_deref(),
            attr("width").as_deref(),
            attr("height").as_deref(),
        )
        .with_client_size(rect_of(surface).size())
    }

    fn surface_rect(&self, surface: &Element) -> Option<Rect> {
        let rect = rect_of(surface);
        (rect.width() > 0.0 && rect.height() > 0.0).then_some(rect)
    }

    fn render(&mut self, surface: &Element, content: Rect, state: ViewportState) {
        warn_on_err(
            surface.set_attribute("style", &surface_style(content, state)),
            "style",
        );
    }
}

impl Page for WebPage {
    type Container = Element;
    type Observer = WebObserver;

    fn containers(&self, selector: &str) -> Vec<Element> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                warn!(?err, selector, "querySelectorAll failed");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn marker(&self, container: &Element) -> Option<WireKey> {
        container
            .get_attribute(MARKER_ATTR)?
            .parse()
            .ok()
            .map(WireKey)
    }

    fn set_marker(&mut self, container: &Element, key: Option<WireKey>) {
        let result = match key {
            Some(key) => container.set_attribute(MARKER_ATTR, &key.0.to_string()),
            None => container.remove_attribute(MARKER_ATTR),
        };
        warn_on_err(result, MARKER_ATTR);
    }

    fn surface_of(&self, container: &Element) -> Option<Element> {
        container.query_selector("svg").ok().flatten()
    }

    fn listen_container(&mut self, container: &Element, key: WireKey) -> WebListener {
        warn_on_err(
            container.class_list().add_1(style::WIRED_CLASS),
            "classList.add",
        );
        self.add_listener(
            container.clone().into(),
            EventKind::Click,
            Some(container.clone()),
            move |_| Some(PageEvent::ContainerClick(key)),
        )
    }

    fn observe(&mut self) -> WebObserver {
        let id = self.next_id();
        let this = self.this.clone();
        let callback = Callback::new(move |_: JsValue| dispatch(&this, PageEvent::Mutations));
        match MutationObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => {
                let init = MutationObserverInit::new();
                init.set_child_list(true);
                init.set_subtree(true);
                warn_on_err(
                    observer.observe_with_options(&self.body, &init),
                    "MutationObserver.observe",
                );
                self.observers.insert(id, Observer { observer, callback });
            }
            Err(err) => warn!(?err, "could not create MutationObserver"),
        }
        WebObserver(id)
    }

    fn disconnect(&mut self, observer: WebObserver) {
        if let Some(observer) = self.observers.remove(&observer.0) {
            observer.observer.disconnect();
            self.retired.push(observer.callback);
        }
    }

    fn decorate(&mut self, container: &Element, decoration: &Decoration<'_>) {
        if let Some(container) = container.dyn_ref::<HtmlElement>() {
            warn_on_err(
                container
                    .style()
                    .set_property("max-height", &format!("{}px", decoration.max_height)),
                "max-height",
            );
        }
        let Some(hint) = decoration.hint else {
            return;
        };
        if container
            .query_selector(style::HINT_SELECTOR)
            .ok()
            .flatten()
            .is_some()
        {
            return;
        }
        match html(&self.document, "div", style::HINT_CLASS) {
            Ok(caption) => {
                caption.set_text_content(Some(hint));
                warn_on_err(container.prepend_with_node_1(&caption), "prepend");
            }
            Err(err) => warn!(%err, "could not create hint caption"),
        }
    }
}

struct Inner {
    page: WebPage,
    session: Option<PageSession<WebPage>>,
}

impl Inner {
    fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.unmount(&mut self.page);
        }
        self.page.dispose();
    }
}

fn dispatch(this: &Weak<RefCell<Inner>>, event: PageEvent) {
    let Some(inner) = this.upgrade() else {
        return;
    };
    let Ok(mut guard) = inner.try_borrow_mut() else {
        warn!(?event, "dropping re-entrant event");
        return;
    };
    let Inner { page, session } = &mut *guard;
    page.retired.clear();
    if let Some(session) = session {
        session.handle(page, event);
    }
}

fn fire_timer(this: &Weak<RefCell<Inner>>, id: u64, tick: Tick) {
    let Some(inner) = this.upgrade() else {
        return;
    };
    let Ok(mut guard) = inner.try_borrow_mut() else {
        warn!(task = ?tick.task, "dropping re-entrant tick");
        return;
    };
    let Inner { page, session } = &mut *guard;
    page.retired.clear();
    // The browser has spent the handle; park the callback, it is running.
    let Some(timer) = page.timers.remove(&id) else {
        return;
    };
    page.retired.push(timer.callback);
    if let Some(session) = session {
        session.handle(page, PageEvent::Lightbox(LightboxEvent::Tick(tick)));
    }
}

/// Lightbox for every rendered diagram on the page.
///
/// `mount` injects the overlay and its stylesheet, wires every diagram
/// container already on the page, and keeps watching for new ones.
/// `unmount` removes all of it; it also runs when the handle is freed.
///
/// ```js
/// import { DiagramLightbox } from "loupe_web";
///
/// const lightbox = DiagramLightbox.mount(JSON.stringify({ lightbox: { transition_ms: 250 } }));
/// // ... on navigation away:
/// lightbox.unmount();
/// ```
#[wasm_bindgen]
pub struct DiagramLightbox {
    inner: Option<Rc<RefCell<Inner>>>,
}

impl fmt::Debug for DiagramLightbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramLightbox")
            .field("mounted", &self.inner.is_some())
            .finish()
    }
}

#[wasm_bindgen]
impl DiagramLightbox {
    /// Mounts the lightbox on the current document.
    ///
    /// `config_json` is an optional JSON object; fields left out keep their
    /// defaults.
    pub fn mount(config_json: Option<String>) -> Result<DiagramLightbox, JsValue> {
        Ok(Self::try_mount(config_json.as_deref())?)
    }

    /// Removes every listener, observer, timer and element the lightbox
    /// added, and restores page scrolling. Calling it again is a no-op.
    pub fn unmount(&mut self) {
        let Some(inner) = self.inner.take() else {
            return;
        };
        match inner.try_borrow_mut() {
            Ok(mut inner) => inner.teardown(),
            Err(_) => warn!("unmount called while an event was being handled"),
        }
        debug!("diagram lightbox unmounted");
    }

    /// Whether the lightbox is mounted.
    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.inner.is_some()
    }
}

impl DiagramLightbox {
    fn try_mount(config_json: Option<&str>) -> Result<Self, WebError> {
        let config = parse_config(config_json)?;
        let window = web_sys::window().ok_or(WebError::MissingGlobal("window"))?;
        let document = window
            .document()
            .ok_or(WebError::MissingGlobal("document"))?;
        let body = document
            .body()
            .ok_or(WebError::MissingGlobal("document.body"))?;

        let overlay = Overlay::build(&document, config.lightbox.transition_ms)?;
        let stylesheet = document.create_element("style")?;
        stylesheet.set_text_content(Some(style::STYLESHEET));
        let head = document.head().map_or_else(|| body.clone(), Into::into);
        head.append_child(&stylesheet)?;
        if let Err(err) = body.append_child(&overlay.root) {
            stylesheet.remove();
            return Err(err.into());
        }

        let inner = Rc::new_cyclic(|this| {
            RefCell::new(Inner {
                page: WebPage {
                    this: this.clone(),
                    window,
                    document,
                    body,
                    stylesheet,
                    overlay,
                    mounted: None,
                    listeners: HashMap::new(),
                    timers: HashMap::new(),
                    observers: HashMap::new(),
                    retired: Vec::new(),
                    saved_overflow: None,
                    next_id: 0,
                },
                session: None,
            })
        });
        {
            let mut guard = inner.borrow_mut();
            let Inner { page, session } = &mut *guard;
            match PageSession::mount(page, config) {
                Ok(mounted) => *session = Some(mounted),
                Err(err) => {
                    page.dispose();
                    return Err(err.into());
                }
            }
        }
        debug!("diagram lightbox mounted");
        Ok(Self { inner: Some(inner) })
    }
}

impl Drop for DiagramLightbox {
    fn drop(&mut self) {
        self.unmount();
    }
}
