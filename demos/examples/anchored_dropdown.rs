// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positioning an anchored surface next to its activator.
//!
//! A dropdown near the bottom of the viewport does not fit below its button and flips
//! above it. After scrolling, the cached surface recomputes only because an input changed.
//!
//! Run:
//! - `cargo run -p understory_demos --example anchored_dropdown`

use kurbo::{Rect, Size, Vec2};
use understory_anchor::{AlignX, AlignY, AnchoredSurface, Constraints, SizeSpec, Viewport};
use understory_stack::adapters::anchor::{place_stack, refresh};
use understory_stack::{Activator, Instant, Measure, Registry, ScrollLock, StackOptions};

struct Page {
    scroll: Vec2,
}

impl Measure<&'static str> for Page {
    fn bounding_rect(&self, element: &&'static str) -> Option<Rect> {
        match *element {
            "button" => Some(Rect::new(100.0, 500.0, 200.0, 540.0) - self.scroll),
            "list" => Some(Rect::new(0.0, 0.0, 150.0, 200.0)),
            _ => None,
        }
    }
    fn contains(&self, ancestor: &&'static str, node: &&'static str) -> bool {
        ancestor == node
    }
    fn viewport_size(&self) -> Size {
        Size::new(800.0, 600.0)
    }
    fn scroll_offset(&self) -> Vec2 {
        self.scroll
    }
}

impl ScrollLock for Page {
    fn acquire(&mut self) {}
    fn release(&mut self) {}
}

fn main() {
    let mut page = Page { scroll: Vec2::ZERO };
    let mut reg: Registry<(), &'static str> = Registry::new();
    let dropdown = reg.create(StackOptions::menu());
    reg.add(dropdown);
    reg.show(dropdown, Activator::Element("button"), &page);
    reg.tick(Instant(0), &mut page);
    reg.set_content(dropdown, Some("list"));

    let constraints = Constraints {
        x: AlignX::LeftInner,
        y: AlignY::Bottom,
        distance: 10.0,
        edge_margin: 20.0,
        min_width: SizeSpec::Fit,
        ..Default::default()
    };

    let p = place_stack(&reg, dropdown, &constraints, &page).expect("both rects are laid out");
    println!("== Placement ==\n  {:?}", p);
    assert_eq!(p.y, AlignY::Top, "flipped above the button");
    assert_eq!(p.rect, Rect::new(100.0, 290.0, 250.0, 490.0));

    let mut surface = AnchoredSurface::new(constraints, Viewport::new(800.0, 600.0));
    assert!(refresh(&mut surface, &reg, dropdown, &page));
    assert!(!refresh(&mut surface, &reg, dropdown, &page), "nothing changed");

    // Scrolling moves the button up in viewport space; the placement is root-relative.
    page.scroll = Vec2::new(0.0, 300.0);
    assert!(refresh(&mut surface, &reg, dropdown, &page));
    let scrolled = surface.placement().expect("still laid out");
    println!("== After scroll ==\n  {:?} dirty={:?}", scrolled, surface.dirty());
    assert_eq!(scrolled.y, AlignY::Bottom, "room below again");
    assert_eq!(scrolled.rect, Rect::new(100.0, 550.0, 250.0, 750.0));
}
