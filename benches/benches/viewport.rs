// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size, Vec2};
use loupe_gesture::{GestureEvent, GestureTracker, PointerId};
use loupe_view::{ClampMode, Viewport, ZoomLimits, fit};

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport/fit");
    let contents: Vec<Rect> = (1..=256)
        .map(|i| Rect::new(0.0, 0.0, f64::from(i) * 7.0, f64::from(257 - i) * 3.0))
        .collect();
    group.throughput(Throughput::Elements(contents.len() as u64));
    group.bench_function("mixed_aspect", |b| {
        b.iter(|| {
            for content in &contents {
                black_box(fit(
                    black_box(*content),
                    Size::new(1280.0, 720.0),
                    ZoomLimits::DEFAULT,
                ));
            }
        });
    });
    group.finish();
}

fn bench_zoom_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport/zoom_by");

    // Contain clamping re-derives the content rect after every step.
    for mode in [ClampMode::None, ClampMode::Contain] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{mode:?}")),
            &mode,
            |b, mode| {
                let mut vp = Viewport::new(Rect::new(0.0, 0.0, 900.0, 600.0), ZoomLimits::DEFAULT);
                vp.set_clamp_mode(*mode);
                vp.fit_content(Rect::new(0.0, 0.0, 800.0, 400.0), 24.0);
                let mut anchor = Point::new(450.0, 300.0);
                b.iter(|| {
                    for step in 0..64 {
                        let factor = if step % 2 == 0 { 1.25 } else { 0.8 };
                        anchor += Vec2::new(1.0, -1.0);
                        vp.zoom_by(anchor, factor);
                        vp.pan_by(Vec2::new(-3.0, 2.0));
                    }
                    black_box(vp.state())
                });
            },
        );
    }
    group.finish();
}

fn bench_gesture_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture/pinch_stream");
    let a = PointerId(1);
    let b = PointerId(2);
    let events: Vec<GestureEvent> = (0..512)
        .map(|i| {
            let spread = 40.0 + f64::from(i % 200);
            if i % 2 == 0 {
                GestureEvent::PointerMove {
                    id: a,
                    position: Point::new(400.0 - spread, 300.0),
                }
            } else {
                GestureEvent::PointerMove {
                    id: b,
                    position: Point::new(400.0 + spread, 300.0),
                }
            }
        })
        .collect();
    group.throughput(Throughput::Elements(events.len() as u64));
    group.bench_function("two_pointers", |bench| {
        bench.iter(|| {
            let mut tracker = GestureTracker::default();
            tracker.handle(GestureEvent::PointerDown {
                id: a,
                position: Point::new(380.0, 300.0),
                primary: true,
            });
            tracker.handle(GestureEvent::PointerDown {
                id: b,
                position: Point::new(420.0, 300.0),
                primary: false,
            });
            for event in &events {
                black_box(tracker.handle(*event));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_fit, bench_zoom_sequence, bench_gesture_stream);
criterion_main!(benches);
