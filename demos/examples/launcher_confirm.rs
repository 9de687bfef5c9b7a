// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Awaitable, imperatively launched surfaces.
//!
//! A bound launcher normalizes a title into confirmation props, launches the surface, and
//! the caller awaits its answer. A second prompt is dismissed without answering.
//!
//! Run:
//! - `cargo run -p understory_demos --example launcher_confirm`

use futures::executor::block_on;
use understory_stack::{
    Dismissed, Instant, LaunchProps, Launcher, Registry, ScrollLock, StackId, StackOptions,
    create_launcher,
};

#[derive(Clone, Debug)]
struct Confirm {
    title: String,
    actions: Vec<&'static str>,
}

impl LaunchProps<bool, u32> for Confirm {
    fn stack_options(&self) -> StackOptions<u32> {
        StackOptions {
            persistent: true,
            ..StackOptions::dialog()
        }
    }
}

/// What the host would render for a pending surface.
#[derive(Debug)]
struct View {
    stack: StackId,
    text: String,
}

struct Page;

impl ScrollLock for Page {
    fn acquire(&mut self) {}
    fn release(&mut self) {}
}

fn main() {
    let mut reg: Registry<bool, u32> = Registry::new();
    let mut launcher: Launcher<View, Confirm, ()> = Launcher::new();
    launcher.mount_root();

    let mut confirm = create_launcher(
        |stack, props: &Confirm, _: Option<&()>| View {
            stack,
            text: format!("{} {:?}", props.title, props.actions),
        },
        |title: &str| Confirm {
            title: title.to_owned(),
            actions: vec!["Cancel", "OK"],
        },
    );

    let delete = confirm
        .launch(&mut launcher, &mut reg, "Delete file?", None)
        .expect("root is mounted");
    let discard = confirm
        .launch(&mut launcher, &mut reg, "Discard draft?", None)
        .expect("root is mounted");
    reg.tick(Instant(0), &mut Page);

    println!("== Pending ==");
    for entry in launcher.pending() {
        println!("  #{} {:?}", entry.key, entry.view);
    }

    // The user presses OK on the first prompt.
    let stack = delete.stack();
    reg.resolve(stack, Some(true));
    launcher.removed(&mut reg, stack, &mut Page);
    assert_eq!(block_on(delete), Ok(Some(true)));

    // The second prompt is torn down without an answer.
    let stack = discard.stack();
    reg.cancel(stack, true);
    launcher.removed(&mut reg, stack, &mut Page);
    assert_eq!(block_on(discard), Err(Dismissed));
    assert!(launcher.pending().is_empty());
    println!("== Done ==");
}
