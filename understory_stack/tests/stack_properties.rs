// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end lifecycle properties driven through the public API with virtual time.

use core::time::Duration;

use kurbo::Rect;
use proptest::prelude::*;
use understory_stack::{
    Activator, CloseOptions, CloseOutcome, Instant, Measure, Phase, Registry, Scope, ScrollLock,
    ShowOutcome, StackEvent, StackId, StackOptions, StackType,
};

#[derive(Default)]
struct Host {
    locks: u32,
}

impl Measure<u32> for Host {
    fn bounding_rect(&self, _: &u32) -> Option<Rect> {
        None
    }
    fn contains(&self, ancestor: &u32, node: &u32) -> bool {
        ancestor == node
    }
}

impl ScrollLock for Host {
    fn acquire(&mut self) {
        self.locks += 1;
    }
    fn release(&mut self) {
        self.locks -= 1;
    }
}

fn registry(n: usize) -> (Registry<i32, u32>, Vec<StackId>) {
    let mut reg = Registry::new();
    let ids = (0..n)
        .map(|i| {
            let ty = if i % 2 == 0 { "even" } else { "odd" };
            let id = reg.create(StackOptions {
                stack_type: Some(StackType(ty)),
                ..StackOptions::default()
            });
            reg.add(id);
            id
        })
        .collect();
    (reg, ids)
}

#[derive(Clone, Debug)]
enum Op {
    Show(usize),
    Close(usize),
    ToFront(usize),
    Tick,
}

fn op(n: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..n).prop_map(Op::Show),
        (0..n).prop_map(Op::Close),
        (0..n).prop_map(Op::ToFront),
        Just(Op::Tick),
    ]
}

proptest! {
    #[test]
    fn exactly_one_front_with_max_order(ops in prop::collection::vec(op(6), 1..60)) {
        let (mut reg, ids) = registry(6);
        let mut host = Host::default();
        let mut now = 0;
        for op in ops {
            match op {
                Op::Show(i) => {
                    reg.show(ids[i], Activator::None, &host);
                }
                Op::Close(i) => {
                    reg.close(ids[i], CloseOptions::default());
                }
                Op::ToFront(i) => {
                    reg.to_front(ids[i]);
                }
                Op::Tick => {
                    now += 16;
                    reg.tick(Instant(now), &mut host);
                }
            }

            let active: Vec<(StackId, u32)> = ids
                .iter()
                .filter_map(|&id| {
                    let c = reg.get(id)?;
                    c.is_active().then(|| (id, c.activate_order()))
                })
                .collect();
            let front = reg.get_front(Scope::All);
            let max = active.iter().max_by_key(|(_, order)| *order).map(|(id, _)| *id);
            prop_assert_eq!(front, max);
            let fronts = ids.iter().filter(|&&id| reg.is_front(id, Scope::All)).count();
            prop_assert_eq!(fronts, usize::from(!active.is_empty()));

            let mut orders: Vec<u32> = active.iter().map(|(_, o)| *o).collect();
            orders.sort_unstable();
            orders.dedup();
            prop_assert_eq!(orders.len(), active.len());
            prop_assert!(reg.get_front(Scope::All) == reg.get_front(Scope::All));
        }
    }

    #[test]
    fn typed_front_is_max_within_type(shows in prop::collection::vec(0..6_usize, 1..12)) {
        let (mut reg, ids) = registry(6);
        let mut host = Host::default();
        for i in shows {
            reg.show(ids[i], Activator::None, &host);
            reg.tick(Instant(0), &mut host);
        }
        for ty in ["even", "odd"] {
            let expected = ids
                .iter()
                .filter_map(|&id| {
                    let c = reg.get(id)?;
                    (c.is_active() && c.options().stack_type == Some(StackType(ty)))
                        .then(|| (id, c.activate_order()))
                })
                .max_by_key(|(_, o)| *o)
                .map(|(id, _)| id);
            prop_assert_eq!(reg.get_front(Scope::Type(StackType(ty))), expected);
        }
    }
}

#[test]
fn orders_follow_call_order() {
    let (mut reg, ids) = registry(3);
    let mut host = Host::default();
    for &id in &ids {
        assert_eq!(reg.show(id, Activator::None, &host), ShowOutcome::Deferred);
    }
    reg.tick(Instant(0), &mut host);
    let orders: Vec<u32> = ids
        .iter()
        .map(|&id| reg.get(id).unwrap().activate_order())
        .collect();
    assert!(orders[0] < orders[1] && orders[1] < orders[2]);
    assert_eq!(reg.get_front(Scope::All), Some(ids[2]));
}

#[test]
fn repeated_show_is_idempotent() {
    let (mut reg, ids) = registry(1);
    let mut host = Host::default();
    let id = ids[0];
    assert_eq!(reg.show(id, Activator::None, &host), ShowOutcome::Deferred);
    assert_eq!(reg.show(id, Activator::None, &host), ShowOutcome::AlreadyActive);
    reg.tick(Instant(0), &mut host);
    let order = reg.get(id).unwrap().activate_order();
    assert_eq!(reg.show(id, Activator::None, &host), ShowOutcome::AlreadyActive);
    reg.tick(Instant(16), &mut host);
    assert_eq!(reg.get(id).unwrap().activate_order(), order);
    let shows = reg
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, StackEvent::Show(_)))
        .count();
    assert_eq!(shows, 1);
}

#[test]
fn persistent_refuses_unforced_close() {
    let mut reg = Registry::<i32, u32>::new();
    let mut host = Host::default();
    let id = reg.create(StackOptions {
        persistent: true,
        ..StackOptions::dialog()
    });
    reg.add(id);
    reg.show(id, Activator::None, &host);
    reg.tick(Instant(0), &mut host);
    let before = reg.get(id).unwrap().close_reason();

    assert_eq!(reg.close(id, CloseOptions::default()), CloseOutcome::Guarded);
    let c = reg.get(id).unwrap();
    assert!(c.is_active());
    assert_eq!(c.close_reason(), before);
    assert_eq!(host.locks, 1);
}

#[test]
fn resolve_sets_value() {
    let (mut reg, ids) = registry(1);
    let mut host = Host::default();
    reg.show(ids[0], Activator::None, &host);
    reg.tick(Instant(0), &mut host);
    assert_eq!(reg.resolve(ids[0], Some(42)), CloseOutcome::Closed);
    let c = reg.get(ids[0]).unwrap();
    assert!(c.is_resolved());
    assert_eq!(c.value(), Some(&42));
    assert!(!c.is_active());
}

#[test]
fn teardown_releases_timers() {
    let mut reg = Registry::<i32, u32>::new();
    let mut host = Host::default();
    let id = reg.create(StackOptions {
        timeout: Some(Duration::from_millis(100)),
        open_on_hover: true,
        open_delay: Duration::from_millis(300),
        scroll_lock: true,
        ..StackOptions::default()
    });
    reg.add(id);
    reg.show(id, Activator::None, &host);
    reg.tick(Instant(0), &mut host);
    reg.after_enter(id, &mut NoFocus);
    assert_eq!(host.locks, 1);

    // A second controller whose hover open is armed.
    let other = reg.create(StackOptions {
        open_on_hover: true,
        open_delay: Duration::from_millis(300),
        ..StackOptions::default()
    });
    reg.add(other);
    reg.hover_enter(other, &5);
    assert!(reg.get(id).unwrap().has_pending_timers());
    assert!(reg.get(other).unwrap().has_pending_timers());

    assert!(reg.destroy(id));
    assert!(reg.destroy(other));
    let _ = reg.drain_events();
    reg.tick(Instant(10_000), &mut host);

    assert!(reg.get(id).is_none());
    assert!(reg.get(other).is_none());
    assert_eq!(host.locks, 0);
    assert_eq!(reg.drain_events(), vec![StackEvent::ScrollLock { locked: false }]);

    // Operations on destroyed controllers are silent no-ops.
    assert_eq!(reg.show(id, Activator::None, &host), ShowOutcome::Stale);
    assert_eq!(reg.close(id, CloseOptions::default()), CloseOutcome::Stale);
    reg.set_value(id, Some(1));
    reg.tick(Instant(20_000), &mut host);
    assert!(reg.events().is_empty());
}

#[test]
fn deferred_activation_survives_a_stale_queue_entry() {
    let (mut reg, ids) = registry(2);
    let mut host = Host::default();
    reg.show(ids[0], Activator::None, &host);
    reg.show(ids[1], Activator::None, &host);
    reg.destroy(ids[0]);
    reg.tick(Instant(0), &mut host);
    assert_eq!(reg.get(ids[1]).map(|c| c.phase()), Some(Phase::Active));
    assert_eq!(reg.get(ids[1]).unwrap().activate_order(), 1);
}

struct NoFocus;

impl understory_stack::Focus<u32> for NoFocus {
    fn attempt_focus(&mut self, _: &u32) -> bool {
        false
    }
    fn focus_first_descendant(&mut self, _: &u32) -> bool {
        false
    }
}
