// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Vec2};
use understory_anchor::{AlignX, AlignY, AnchoredSurface, Constraints, SizeSpec, Viewport, place};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Anchors scattered over an 800x600 viewport, with surfaces of random natural size.
fn gen_inputs(count: usize) -> Vec<(Rect, Rect)> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let x0 = rng.next_f64() * 760.0;
            let y0 = rng.next_f64() * 580.0;
            let anchor = Rect::new(x0, y0, x0 + 40.0, y0 + 20.0);
            let natural = Rect::new(
                0.0,
                0.0,
                50.0 + rng.next_f64() * 400.0,
                20.0 + rng.next_f64() * 700.0,
            );
            (anchor, natural)
        })
        .collect()
}

fn bench_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("place");
    let inputs = gen_inputs(1024);
    let viewport = Viewport::new(800.0, 600.0).with_scroll(Vec2::new(0.0, 1200.0));
    let variants = [
        ("menu_bottom", Constraints {
            x: AlignX::LeftInner,
            y: AlignY::Bottom,
            width: SizeSpec::Fit,
            edge_margin: 12.0,
            ..Default::default()
        }),
        ("tooltip_top_center", Constraints {
            x: AlignX::Center,
            y: AlignY::Top,
            distance: 8.0,
            edge_margin: 12.0,
            max_width: SizeSpec::Px(320.0),
            ..Default::default()
        }),
        ("overlap_allow_overflow", Constraints {
            x: AlignX::Right,
            y: AlignY::BottomInner,
            overlap: true,
            allow_overflow: true,
            ..Default::default()
        }),
    ];
    group.throughput(Throughput::Elements(inputs.len() as u64));
    for (name, constraints) in variants {
        group.bench_function(name, |b| {
            b.iter(|| {
                for (anchor, natural) in &inputs {
                    black_box(place(Some(*anchor), Some(*natural), &constraints, &viewport));
                }
            });
        });
    }
    group.finish();
}

fn bench_surface_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchored_surface");
    let inputs = gen_inputs(1024);
    let viewport = Viewport::new(800.0, 600.0);
    group.bench_function("commit_clean", |b| {
        let mut surface = AnchoredSurface::new(Constraints::default(), viewport);
        surface.set_anchor(Some(inputs[0].0));
        surface.set_natural(Some(inputs[0].1));
        let _ = surface.commit();
        b.iter(|| {
            surface.set_anchor(Some(inputs[0].0));
            black_box(surface.commit());
        });
    });
    group.bench_function("commit_scrolling", |b| {
        let mut surface = AnchoredSurface::new(Constraints::default(), viewport);
        surface.set_natural(Some(inputs[0].1));
        let mut i = 0_usize;
        b.iter(|| {
            i = (i + 1) % inputs.len();
            surface.set_anchor(Some(inputs[i].0));
            black_box(surface.commit());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_place, bench_surface_commit);
criterion_main!(benches);
