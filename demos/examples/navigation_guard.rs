// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation guards on an open editor dialog.
//!
//! Leaving the editor route asks the dialog's guard. A synchronous veto blocks at once; an
//! asynchronous guard is awaited by the navigation host.
//!
//! Run:
//! - `cargo run -p understory_demos --example navigation_guard`

use futures::executor::block_on;
use understory_stack::{
    Activator, BoxError, GuardScope, GuardVerdict, Instant, Measure, NavigationCheck, Registry,
    ScrollLock, StackOptions,
};

struct Page;

impl Measure<u32> for Page {
    fn bounding_rect(&self, _: &u32) -> Option<kurbo::Rect> {
        None
    }
    fn contains(&self, ancestor: &u32, node: &u32) -> bool {
        ancestor == node
    }
}

impl ScrollLock for Page {
    fn acquire(&mut self) {}
    fn release(&mut self) {}
}

fn main() {
    let mut reg: Registry<(), u32> = Registry::new();
    let editor = reg.create(StackOptions {
        guard_scope: GuardScope::Leave("/edit".to_owned()),
        ..StackOptions::dialog()
    });
    reg.add(editor);
    reg.show(editor, Activator::None, &Page);
    reg.tick(Instant(0), &mut Page);

    let mut dirty = true;
    reg.set_navigation_guard(
        editor,
        Some(Box::new(move |to: &str, _: &str| {
            if to == "/help" {
                // Ask the user; they agree to leave.
                return GuardVerdict::Pending(Box::pin(async { Ok::<_, BoxError>(true) }));
            }
            let verdict = (!dirty).into();
            dirty = false;
            verdict
        })),
    );

    // Navigations that do not leave the editor route are not consulted.
    assert!(reg.before_navigate("/edit", "/home").is_proceed());

    let check = reg.before_navigate("/home", "/edit");
    println!("== Leave while dirty ==\n  {:?}", check);
    assert!(matches!(check, NavigationCheck::Vetoed(_)));
    assert!(reg.get(editor).is_some_and(|c| c.guard_animating()));

    let NavigationCheck::Pending(pending) = reg.before_navigate("/help", "/edit") else {
        panic!("the help route asks asynchronously");
    };
    let verdict = block_on(pending).expect("guard does not fail");
    reg.finish_navigation(&verdict);
    println!("== Async verdict ==\n  allowed={}", verdict.allowed());
    assert!(verdict.allowed());

    let closed = reg.after_navigate();
    println!("== After navigate ==\n  closed {:?}", closed);
    assert_eq!(closed, vec![editor]);
    println!("== Events ==\n  {:?}", reg.drain_events());
}
