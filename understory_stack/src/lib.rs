// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_stack --heading-base-level=0

//! Understory Stack: deterministic, `no_std` overlay stacking.
//!
//! ## Overview
//!
//! Dialogs, menus, sheets, and snackbars compete for the top of the screen. This crate keeps
//! the bookkeeping: which overlay is front-most, which may be dismissed by Escape or an
//! outside click, when a persistent overlay refuses, when timers fire, and when page scrolling
//! is locked. It does not render, animate, or measure anything; the host supplies those
//! through the traits in [`Host`].
//!
//! - [`Registry`]: one per UI root. Owns every [`StackController`] in a generational arena,
//!   assigns activation orders, and answers front-most queries.
//! - Lifecycle: [`Registry::show`] defers activation to the next [`Registry::tick`], so the
//!   input event that triggered it finishes first. [`Registry::close`],
//!   [`Registry::resolve`], and [`Registry::cancel`] close with a [`CloseReason`].
//! - Transitions: the renderer reports `before_enter`/`after_enter`/`before_leave`/
//!   `after_leave` and their cancellations; the controller's [`Transition`] follows.
//! - Global handlers: [`Registry::on_escape`], [`Registry::on_outside_click`],
//!   [`Registry::on_focus_in`], hover intent, and navigation guards
//!   ([`Registry::before_navigate`]).
//! - [`Launcher`]: imperative, awaitable surfaces (confirmations, prompts) that clean up
//!   after themselves.
//! - Notifications queue up as [`StackEvent`]s; drain them with [`Registry::drain_events`].
//!
//! Time is explicit. The registry never reads a clock; the host passes an [`Instant`] to
//! [`Registry::tick`], which makes every timer deterministic under test.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_stack::{Activator, Instant, Measure, Registry, Scope, ScrollLock, StackOptions};
//!
//! // Elements are plain integers here.
//! struct Page;
//!
//! impl Measure<u32> for Page {
//!     fn bounding_rect(&self, _: &u32) -> Option<Rect> {
//!         None
//!     }
//!     fn contains(&self, ancestor: &u32, node: &u32) -> bool {
//!         ancestor == node
//!     }
//! }
//!
//! impl ScrollLock for Page {
//!     fn acquire(&mut self) {}
//!     fn release(&mut self) {}
//! }
//!
//! let mut reg: Registry<(), u32> = Registry::new();
//! let menu = reg.create(StackOptions::menu());
//! let dialog = reg.create(StackOptions::dialog());
//! reg.add(menu);
//! reg.add(dialog);
//!
//! reg.show(menu, Activator::Element(1), &Page);
//! reg.show(dialog, Activator::Element(2), &Page);
//! // Nothing is active until the next tick.
//! assert_eq!(reg.get_front(Scope::All), None);
//!
//! reg.tick(Instant::from_millis(16), &mut Page);
//! assert_eq!(reg.get_front(Scope::All), Some(dialog));
//! assert!(reg.z_index(menu) < reg.z_index(dialog));
//! assert!(reg.is_scroll_locked());
//!
//! // Escape is ignored while the dialog's enter transition runs.
//! assert_eq!(reg.on_escape(), None);
//! ```
//!
//! ## Features
//!
//! - `std` (default) / `libm`: forwarded to Kurbo.
//! - `tracing`: emit `tracing` events for lifecycle transitions and guard rejections.
//! - `anchor_adapter`: positioning helpers in [`adapters::anchor`] backed by
//!   `understory_anchor`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;

mod controller;
mod dismiss;
mod error;
mod host;
mod hover;
mod launcher;
mod lifecycle;
mod navigation;
mod options;
mod registry;
mod types;

pub use controller::StackController;
pub use error::{Dismissed, StackError};
pub use host::{Focus, Host, Measure, ResponseSink, ScrollLock};
pub use launcher::{BoundLauncher, LaunchProps, Launched, Launcher, PendingSurface, create_launcher};
pub use navigation::{
    BoxError, GuardFuture, GuardVerdict, NavigationCheck, NavigationGuard, NavigationVerdict,
    PendingNavigation,
};
pub use options::{
    DEFAULT_BASE_Z_INDEX, DismissScope, GUARD_PULSE, GuardScope, RegistryConfig, StackOptions,
};
pub use registry::Registry;
pub use types::{
    Activator, CloseOptions, CloseOutcome, CloseReason, Dismissal, Instant, Phase, Scope,
    ShowOutcome, StackEvent, StackId, StackType, Transition,
};
