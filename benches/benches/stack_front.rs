// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use understory_stack::{
    Activator, CloseOptions, Instant, Measure, Registry, Scope, ScrollLock, StackId, StackOptions,
    StackType,
};

struct Host;

impl Measure<u32> for Host {
    fn bounding_rect(&self, _: &u32) -> Option<Rect> {
        None
    }
    fn contains(&self, ancestor: &u32, node: &u32) -> bool {
        ancestor == node
    }
}

impl ScrollLock for Host {
    fn acquire(&mut self) {}
    fn release(&mut self) {}
}

const SHEET: StackType = StackType("sheet");

/// `n` registered controllers, every other one a sheet, all active.
fn open_registry(n: usize) -> (Registry<(), u32>, Vec<StackId>) {
    let mut reg = Registry::new();
    let ids: Vec<StackId> = (0..n)
        .map(|i| {
            let id = reg.create(StackOptions {
                stack_type: (i % 2 == 0).then_some(SHEET),
                ..StackOptions::default()
            });
            reg.add(id);
            reg.show(id, Activator::None, &Host);
            id
        })
        .collect();
    reg.tick(Instant(0), &mut Host);
    (reg, ids)
}

fn bench_front(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_front");
    for &n in &[8usize, 64, 512] {
        let (reg, _) = open_registry(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("all_n{}", n), |b| {
            b.iter(|| black_box(reg.get_front(Scope::All)));
        });
        group.bench_function(format!("typed_n{}", n), |b| {
            b.iter(|| black_box(reg.get_front(Scope::Type(SHEET))));
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle");
    for &n in &[8usize, 64] {
        group.bench_function(format!("close_reopen_all_n{}", n), |b| {
            b.iter_batched(
                || open_registry(n),
                |(mut reg, ids)| {
                    for &id in &ids {
                        reg.close(id, CloseOptions::default());
                    }
                    for &id in &ids {
                        reg.show(id, Activator::None, &Host);
                    }
                    reg.tick(Instant(16), &mut Host);
                    black_box(reg.drain_events().len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_front, bench_churn);
criterion_main!(benches);
