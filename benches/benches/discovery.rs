// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::Rect;
use loupe_discovery::headless::HeadlessPage;
use loupe_discovery::{DEFAULT_SELECTOR, DiscoveryConfig, Watcher};
use loupe_view::SurfaceGeometry;

fn page_with(containers: usize) -> HeadlessPage {
    let mut page = HeadlessPage::new(Rect::new(0.0, 0.0, 1280.0, 720.0));
    for _ in 0..containers {
        let c = page.add_container(DEFAULT_SELECTOR);
        page.render_diagram(
            c,
            SurfaceGeometry::from_attributes(Some("0 0 800 400"), None, None),
        );
    }
    page
}

fn bench_rescan(c: &mut Criterion) {
    let mut group = c.benchmark_group("discovery/rescan");

    // Every mutation batch triggers a rescan; once wired, a rescan should
    // only read markers.
    for len in [8usize, 64, 512] {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("all_wired", len), &len, |b, &len| {
            let mut page = page_with(len);
            let mut watcher = Watcher::start(&mut page, &DiscoveryConfig::default());
            b.iter(|| black_box(watcher.scan(&mut page)));
        });
        group.bench_with_input(BenchmarkId::new("first_scan", len), &len, |b, &len| {
            b.iter_batched(
                || page_with(len),
                |mut page| {
                    let watcher = Watcher::start(&mut page, &DiscoveryConfig::default());
                    black_box(watcher.wired_count());
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rescan);
criterion_main!(benches);
