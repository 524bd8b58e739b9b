// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `loupe_overlay` crate.
//!
//! These drive a [`Lightbox`] through a [`HeadlessHost`], feeding scheduled
//! ticks back by hand, and check that every resource a session takes is
//! given back exactly once.

use core::time::Duration;

use kurbo::{Point, Rect, Vec2};
use loupe_overlay::{
    Binding, Control, EventKind, GestureEvent, HeadlessHost, HeadlessSurface, Host, Key, Lightbox,
    LightboxConfig, LightboxEvent, Phase, PointerId, SessionId, SurfaceGeometry, Target, Task,
    Tick,
};

const STAGE: Rect = Rect::new(0.0, 0.0, 900.0, 600.0);

fn setup() -> (HeadlessHost, HeadlessSurface, Lightbox<HeadlessHost>) {
    let mut host = HeadlessHost::new(STAGE);
    let diagram = host.add_surface(SurfaceGeometry::from_attributes(
        Some("0 0 800 400"),
        None,
        None,
    ));
    let lightbox = Lightbox::new(LightboxConfig::default().with_fit_padding(0.0));
    (host, diagram, lightbox)
}

fn pump(host: &mut HeadlessHost, lightbox: &mut Lightbox<HeadlessHost>, ticks: Vec<Tick>) {
    for tick in ticks {
        lightbox.handle(host, LightboxEvent::Tick(tick));
    }
}

fn advance(host: &mut HeadlessHost, lightbox: &mut Lightbox<HeadlessHost>, ms: u64) {
    let ticks = host.advance(Duration::from_millis(ms));
    pump(host, lightbox, ticks);
}

fn frame(host: &mut HeadlessHost, lightbox: &mut Lightbox<HeadlessHost>) {
    let ticks = host.next_frame();
    pump(host, lightbox, ticks);
}

/// Opens and runs the reveal and the initial fit.
fn open_fully(
    host: &mut HeadlessHost,
    lightbox: &mut Lightbox<HeadlessHost>,
    diagram: &HeadlessSurface,
) -> SessionId {
    let id = lightbox.open(host, diagram).unwrap();
    advance(host, lightbox, 10);
    frame(host, lightbox);
    assert_eq!(lightbox.phase(), Phase::Open);
    id
}

fn assert_released(host: &HeadlessHost) {
    assert!(host.mounted().is_empty());
    assert_eq!(host.live_listeners(), 0);
    assert_eq!(host.pending_timers(), 0);
    assert_eq!(host.scroll_lock_depth(), 0);
    assert_eq!(host.stray_releases(), 0);
}

fn visual_center(host: &HeadlessHost, clone: &HeadlessSurface) -> Point {
    host.surface_rect(clone).unwrap().center()
}

fn close_to(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn open_reveals_then_fits() {
    let (mut host, diagram, mut lightbox) = setup();

    lightbox.open(&mut host, &diagram);
    assert_eq!(lightbox.phase(), Phase::Opening);
    assert_eq!(host.phase(), Phase::Opening);
    assert!(host.scroll_locked());
    assert_eq!(host.mounted().len(), 1);
    assert_eq!(host.mounted()[0].cloned_from, Some(diagram.id));
    // Nothing is drawn before the clone has had a frame to lay out.
    assert_eq!(host.renders(), 0);

    advance(&mut host, &mut lightbox, 10);
    assert_eq!(lightbox.phase(), Phase::Open);
    assert_eq!(host.phase(), Phase::Open);
    assert_eq!(host.renders(), 0);

    frame(&mut host, &mut lightbox);
    let state = lightbox.viewport_state().unwrap();
    assert_eq!(state.scale, 1.125);
    assert_eq!(state.translation, Vec2::new(0.0, 75.0));
    assert_eq!(host.rendered(&host.mounted()[0]), Some(state));
}

#[test]
fn open_registers_session_and_gesture_listeners() {
    let (mut host, diagram, mut lightbox) = setup();
    open_fully(&mut host, &mut lightbox, &diagram);

    // Five clicks, resize, Escape, then five surface gesture kinds.
    assert_eq!(host.live_listeners(), 12);
    for target in [
        Target::Backdrop,
        Target::CloseButton,
        Target::ZoomIn,
        Target::ZoomOut,
        Target::Reset,
    ] {
        assert_eq!(host.listeners_for(Binding::new(target, EventKind::Click)), 1);
    }
    assert_eq!(
        host.listeners_for(Binding::new(Target::Window, EventKind::Resize)),
        1
    );
    assert_eq!(
        host.listeners_for(Binding::new(Target::Surface, EventKind::Wheel)),
        1
    );
}

#[test]
fn fit_falls_back_to_default_size() {
    let (mut host, _, mut lightbox) = setup();
    let bare = host.add_surface(SurfaceGeometry::default());
    open_fully(&mut host, &mut lightbox, &bare);

    // 500x500 into 900x600 binds on height.
    assert_eq!(lightbox.viewport_state().unwrap().scale, 1.2);
}

#[test]
fn close_tears_down_after_transition() {
    let (mut host, diagram, mut lightbox) = setup();
    open_fully(&mut host, &mut lightbox, &diagram);

    lightbox.handle(&mut host, LightboxEvent::CloseClick);
    assert_eq!(lightbox.phase(), Phase::Closing);
    assert_eq!(host.phase(), Phase::Closing);
    assert_eq!(host.mounted().len(), 1);

    advance(&mut host, &mut lightbox, 199);
    assert_eq!(lightbox.phase(), Phase::Closing);

    advance(&mut host, &mut lightbox, 1);
    assert_eq!(lightbox.phase(), Phase::Closed);
    assert_eq!(host.phase(), Phase::Closed);
    assert_eq!(lightbox.session_id(), None);
    assert_released(&host);
}

#[test]
fn backdrop_click_closes() {
    let (mut host, diagram, mut lightbox) = setup();
    open_fully(&mut host, &mut lightbox, &diagram);

    lightbox.handle(&mut host, LightboxEvent::BackdropClick);
    assert_eq!(lightbox.phase(), Phase::Closing);
    advance(&mut host, &mut lightbox, 200);
    assert_released(&host);
}

#[test]
fn close_during_opening_cancels_reveal() {
    let (mut host, diagram, mut lightbox) = setup();
    let id = lightbox.open(&mut host, &diagram).unwrap();
    lightbox.close(&mut host);

    assert_eq!(
        host.pending_ticks(),
        vec![Tick {
            session: id,
            task: Task::Teardown
        }]
    );
    advance(&mut host, &mut lightbox, 200);
    assert_eq!(lightbox.phase(), Phase::Closed);
    assert_released(&host);
}

#[test]
fn reopening_replaces_the_live_session() {
    let (mut host, diagram, mut lightbox) = setup();
    let other = host.add_surface(SurfaceGeometry::from_attributes(
        Some("0 0 100 100"),
        None,
        None,
    ));

    let first = open_fully(&mut host, &mut lightbox, &diagram);
    let second = lightbox.open(&mut host, &other).unwrap();
    assert_ne!(first, second);

    assert_eq!(host.mounted().len(), 1);
    assert_eq!(host.mounted()[0].cloned_from, Some(other.id));
    assert_eq!(host.scroll_lock_depth(), 1);
    assert_eq!(host.live_listeners(), 12);
    assert_eq!(host.stray_releases(), 0);
    assert!(host.pending_ticks().iter().all(|t| t.session == second));
}

#[test]
fn reopening_while_closing_cancels_teardown() {
    let (mut host, diagram, mut lightbox) = setup();
    open_fully(&mut host, &mut lightbox, &diagram);
    lightbox.close(&mut host);

    let second = lightbox.open(&mut host, &diagram).unwrap();
    assert_eq!(lightbox.phase(), Phase::Opening);
    assert_eq!(
        host.pending_ticks(),
        vec![Tick {
            session: second,
            task: Task::Reveal
        }]
    );

    advance(&mut host, &mut lightbox, 300);
    frame(&mut host, &mut lightbox);
    assert_eq!(lightbox.phase(), Phase::Open);
    assert_eq!(host.mounted().len(), 1);
}

#[test]
fn stale_ticks_are_ignored() {
    let (mut host, diagram, mut lightbox) = setup();
    let first = open_fully(&mut host, &mut lightbox, &diagram);
    lightbox.open(&mut host, &diagram);
    let renders = host.renders();

    for task in [Task::Reveal, Task::InitialFit, Task::Refit, Task::Teardown] {
        lightbox.handle(
            &mut host,
            LightboxEvent::Tick(Tick {
                session: first,
                task,
            }),
        );
    }
    assert_eq!(lightbox.phase(), Phase::Opening);
    assert_eq!(host.renders(), renders);
    assert_eq!(host.mounted().len(), 1);
}

#[test]
fn unscheduled_ticks_for_the_live_session_are_ignored() {
    let (mut host, diagram, mut lightbox) = setup();
    let id = open_fully(&mut host, &mut lightbox, &diagram);
    let renders = host.renders();

    lightbox.handle(
        &mut host,
        LightboxEvent::Tick(Tick {
            session: id,
            task: Task::Refit,
        }),
    );
    lightbox.handle(
        &mut host,
        LightboxEvent::Tick(Tick {
            session: id,
            task: Task::Teardown,
        }),
    );
    assert_eq!(lightbox.phase(), Phase::Open);
    assert_eq!(host.renders(), renders);
}

#[test]
fn close_and_shutdown_are_idempotent() {
    let (mut host, diagram, mut lightbox) = setup();

    lightbox.close(&mut host);
    lightbox.shutdown(&mut host);
    assert_released(&host);

    open_fully(&mut host, &mut lightbox, &diagram);
    lightbox.close(&mut host);
    lightbox.close(&mut host);
    assert_eq!(host.pending_timers(), 1);

    lightbox.shutdown(&mut host);
    lightbox.shutdown(&mut host);
    assert_eq!(lightbox.phase(), Phase::Closed);
    assert_eq!(host.phase(), Phase::Closed);
    assert_released(&host);

    // Timer handles are gone; nothing fires later.
    advance(&mut host, &mut lightbox, 1_000);
    assert_released(&host);
}

#[test]
fn rapid_resizes_refit_once() {
    let (mut host, diagram, mut lightbox) = setup();
    let id = open_fully(&mut host, &mut lightbox, &diagram);
    let renders = host.renders();

    host.set_stage(Rect::new(0.0, 0.0, 450.0, 300.0));
    for _ in 0..5 {
        lightbox.handle(&mut host, LightboxEvent::Resize);
        advance(&mut host, &mut lightbox, 50);
    }
    assert_eq!(host.renders(), renders);
    assert_eq!(
        host.pending_ticks(),
        vec![Tick {
            session: id,
            task: Task::Refit
        }]
    );

    advance(&mut host, &mut lightbox, 99);
    assert_eq!(host.renders(), renders);
    advance(&mut host, &mut lightbox, 1);
    assert_eq!(host.renders(), renders + 1);
    assert_eq!(lightbox.viewport_state().unwrap().scale, 0.5625);
}

#[test]
fn resize_after_close_is_ignored() {
    let (mut host, diagram, mut lightbox) = setup();
    open_fully(&mut host, &mut lightbox, &diagram);
    lightbox.close(&mut host);

    lightbox.handle(&mut host, LightboxEvent::Resize);
    assert!(
        host.pending_ticks()
            .iter()
            .all(|t| t.task == Task::Teardown)
    );
}

#[test]
fn escape_is_one_shot() {
    let (mut host, diagram, mut lightbox) = setup();
    open_fully(&mut host, &mut lightbox, &diagram);
    let escape = Binding::new(Target::Document, EventKind::KeyDown);

    lightbox.handle(&mut host, LightboxEvent::Key(Key::Other));
    assert_eq!(lightbox.phase(), Phase::Open);
    assert_eq!(host.listeners_for(escape), 1);

    lightbox.handle(&mut host, LightboxEvent::Key(Key::Escape));
    assert_eq!(lightbox.phase(), Phase::Closing);
    assert_eq!(host.listeners_for(escape), 0);

    lightbox.handle(&mut host, LightboxEvent::Key(Key::Escape));
    assert_eq!(host.pending_timers(), 1);
    assert_eq!(host.stray_releases(), 0);

    advance(&mut host, &mut lightbox, 200);
    assert_released(&host);
}

#[test]
fn zoom_controls_keep_the_diagram_centered() {
    let (mut host, diagram, mut lightbox) = setup();
    open_fully(&mut host, &mut lightbox, &diagram);
    let clone = host.mounted()[0].clone();
    let center = visual_center(&host, &clone);
    assert!(close_to(center, Point::new(450.0, 300.0)));

    lightbox.handle(&mut host, LightboxEvent::Control(Control::ZoomIn));
    let state = lightbox.viewport_state().unwrap();
    assert!((state.scale - 1.125 * 1.25).abs() < 1e-12);
    assert!(close_to(visual_center(&host, &clone), center));

    lightbox.handle(&mut host, LightboxEvent::Control(Control::ZoomOut));
    lightbox.handle(&mut host, LightboxEvent::Control(Control::ZoomOut));
    let state = lightbox.viewport_state().unwrap();
    assert!((state.scale - 1.125 / 1.25).abs() < 1e-12);
    assert!(close_to(visual_center(&host, &clone), center));
}

#[test]
fn reset_restores_the_fit() {
    let (mut host, diagram, mut lightbox) = setup();
    open_fully(&mut host, &mut lightbox, &diagram);
    let fitted = lightbox.viewport_state().unwrap();

    let id = PointerId(1);
    lightbox.handle(
        &mut host,
        LightboxEvent::Gesture(GestureEvent::PointerDown {
            id,
            position: Point::new(100.0, 100.0),
            primary: true,
        }),
    );
    lightbox.handle(
        &mut host,
        LightboxEvent::Gesture(GestureEvent::PointerMove {
            id,
            position: Point::new(130.0, 90.0),
        }),
    );
    lightbox.handle(&mut host, LightboxEvent::Gesture(GestureEvent::PointerUp { id }));
    let panned = lightbox.viewport_state().unwrap();
    assert_eq!(panned.translation, fitted.translation + Vec2::new(30.0, -10.0));
    assert_eq!(host.rendered(&host.mounted()[0]), Some(panned));

    lightbox.handle(&mut host, LightboxEvent::Control(Control::Reset));
    assert_eq!(lightbox.viewport_state(), Some(fitted));
}

#[test]
fn wheel_zooms_about_the_pointer() {
    let (mut host, diagram, mut lightbox) = setup();
    open_fully(&mut host, &mut lightbox, &diagram);
    let before = lightbox.viewport_state().unwrap();
    let position = Point::new(200.0, 150.0);

    lightbox.handle(
        &mut host,
        LightboxEvent::Gesture(GestureEvent::Wheel {
            position,
            delta: Vec2::new(0.0, -120.0),
        }),
    );
    let after = lightbox.viewport_state().unwrap();
    assert!(after.scale > before.scale);
    let content_before = before.affine().inverse() * position;
    let content_after = after.affine().inverse() * position;
    assert!(close_to(content_before, content_after));
}

#[test]
fn input_is_ignored_until_open() {
    let (mut host, diagram, mut lightbox) = setup();
    lightbox.open(&mut host, &diagram);
    let before = lightbox.viewport_state();

    lightbox.handle(&mut host, LightboxEvent::Control(Control::ZoomIn));
    lightbox.handle(
        &mut host,
        LightboxEvent::Gesture(GestureEvent::Wheel {
            position: Point::new(10.0, 10.0),
            delta: Vec2::new(0.0, -120.0),
        }),
    );
    assert_eq!(lightbox.viewport_state(), before);
    assert_eq!(host.renders(), 0);
}
