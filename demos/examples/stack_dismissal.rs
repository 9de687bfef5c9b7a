// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Front-most arbitration and guarded dismissal.
//!
//! A menu opens a confirmation dialog on top of itself. Escape and outside clicks only ever
//! reach the front-most overlay, and a persistent dialog refuses with a guard pulse.
//!
//! Run:
//! - `cargo run -p understory_demos --example stack_dismissal`

use kurbo::Rect;
use understory_stack::{
    Activator, Dismissal, Focus, Instant, Measure, Registry, Scope, ScrollLock, StackEvent,
    StackId, StackOptions,
};

/// A tiny "DOM": element `n` contains `m` when `m / 10 == n`.
#[derive(Default)]
struct Page {
    focused: Option<u32>,
    locked: bool,
}

impl Measure<u32> for Page {
    fn bounding_rect(&self, _: &u32) -> Option<Rect> {
        None
    }
    fn contains(&self, ancestor: &u32, node: &u32) -> bool {
        ancestor == node || node / 10 == *ancestor
    }
    fn focused(&self) -> Option<u32> {
        self.focused
    }
}

impl Focus<u32> for Page {
    fn attempt_focus(&mut self, element: &u32) -> bool {
        self.focused = Some(*element);
        true
    }
    fn focus_first_descendant(&mut self, element: &u32) -> bool {
        self.focused = Some(element * 10);
        true
    }
}

impl ScrollLock for Page {
    fn acquire(&mut self) {
        self.locked = true;
    }
    fn release(&mut self) {
        self.locked = false;
    }
}

/// Run a complete enter transition.
fn enter(reg: &mut Registry<(), u32>, page: &mut Page, id: StackId, content: u32, now: u64) {
    reg.tick(Instant(now), page);
    reg.set_content(id, Some(content));
    reg.before_enter(id);
    reg.after_enter(id, page);
}

fn main() {
    let mut page = Page::default();
    let mut reg: Registry<(), u32> = Registry::new();

    let menu = reg.create(StackOptions::menu());
    let dialog = reg.create(StackOptions {
        persistent: true,
        ..StackOptions::dialog()
    });
    reg.add(menu);
    reg.add(dialog);

    // Button 1 opens the menu (content 2); menu item 21 opens the dialog (content 3).
    reg.show(menu, Activator::Element(1), &page);
    enter(&mut reg, &mut page, menu, 2, 0);
    reg.show(dialog, Activator::Element(21), &page);
    enter(&mut reg, &mut page, dialog, 3, 16);

    println!("== Stack ==");
    for (id, c) in reg.registered() {
        println!("  {:?}: order={} z={:?}", id, c.activate_order(), reg.z_index(id));
    }
    assert_eq!(reg.get_front(Scope::All), Some(dialog));
    assert!(page.locked, "dialogs lock page scrolling");
    assert_eq!(page.focused, Some(30), "the dialog trapped focus");

    // Escape reaches only the dialog, which is persistent.
    assert_eq!(reg.on_escape(), Some(Dismissal::Guarded(dialog)));
    // An outside click does not fall through to the menu underneath.
    assert_eq!(reg.on_outside_click(&9, &page), vec![Dismissal::Guarded(dialog)]);
    println!("== Events ==\n  {:?}", reg.drain_events());

    // Confirming resolves the dialog; focus returns to the menu item after the leave.
    reg.resolve(dialog, None);
    reg.before_leave(dialog);
    reg.after_leave(dialog, &mut page);
    assert_eq!(page.focused, Some(21));
    assert!(!page.locked);

    assert_eq!(reg.on_escape(), Some(Dismissal::Closed(menu)));
    let events = reg.drain_events();
    println!("== Events ==\n  {:?}", events);
    assert!(events.contains(&StackEvent::Resolved(dialog)));
}
