// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-overlay state.
//!
//! A [`StackController`] is plain data owned by the [`Registry`](crate::Registry) arena.
//! Everything that changes it goes through registry operations, which also keep the
//! registry-wide state (front order, scroll lock, events) consistent. Read access is public.

use futures::channel::oneshot;
use kurbo::Point;

use crate::hover::HoverIntent;
use crate::navigation::NavigationGuard;
use crate::options::StackOptions;
use crate::types::{CloseReason, Instant, Phase, Transition};

/// Scheduled deadlines that are not hover related.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Timers {
    /// Auto-close deadline.
    pub(crate) timeout: Option<Instant>,
    /// When the guard effect switches off.
    pub(crate) guard_pulse: Option<Instant>,
}

/// State of a single overlay.
pub struct StackController<P, E> {
    pub(crate) generation: u32,
    pub(crate) options: StackOptions<E>,
    pub(crate) phase: Phase,
    pub(crate) transition: Transition,
    pub(crate) activator: Option<E>,
    pub(crate) pointer: Option<Point>,
    pub(crate) content: Option<E>,
    pub(crate) close_reason: CloseReason,
    pub(crate) initial_value: Option<P>,
    pub(crate) input_value: Option<P>,
    pub(crate) activate_order: u32,
    pub(crate) need_render: bool,
    pub(crate) guard_animating: bool,
    pub(crate) booted: bool,
    pub(crate) holds_scroll_lock: bool,
    pub(crate) timers: Timers,
    pub(crate) hover: HoverIntent,
    /// Activator recorded by a hover enter, used when the delayed open fires.
    pub(crate) hover_activator: Option<E>,
    pub(crate) guard: Option<NavigationGuard>,
    pub(crate) settle: Option<oneshot::Sender<Option<P>>>,
}

impl<P: core::fmt::Debug, E: core::fmt::Debug> core::fmt::Debug for StackController<P, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StackController")
            .field("phase", &self.phase)
            .field("transition", &self.transition)
            .field("activate_order", &self.activate_order)
            .field("close_reason", &self.close_reason)
            .field("activator", &self.activator)
            .field("input_value", &self.input_value)
            .field("need_render", &self.need_render)
            .field("guard_animating", &self.guard_animating)
            .field("has_guard", &self.guard.is_some())
            .finish_non_exhaustive()
    }
}

impl<P, E> StackController<P, E> {
    pub(crate) fn new(generation: u32, options: StackOptions<E>) -> Self {
        let need_render = options.always_render;
        Self {
            generation,
            options,
            phase: Phase::Inactive,
            transition: Transition::Idle,
            activator: None,
            pointer: None,
            content: None,
            close_reason: CloseReason::Indeterminate,
            initial_value: None,
            input_value: None,
            activate_order: 0,
            need_render,
            guard_animating: false,
            booted: false,
            holds_scroll_lock: false,
            timers: Timers::default(),
            hover: HoverIntent::default(),
            hover_activator: None,
            guard: None,
            settle: None,
        }
    }

    /// Whether the surface is logically open.
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Activation phase, including the deferred `Pending` step.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Transition window reported by the renderer.
    pub fn transition(&self) -> Transition {
        self.transition
    }

    /// Enter transition running.
    pub fn is_showing(&self) -> bool {
        self.transition == Transition::Showing
    }

    /// Leave transition running.
    pub fn is_closing(&self) -> bool {
        self.transition == Transition::Closing
    }

    /// Rank among active controllers; `0` while inactive.
    pub fn activate_order(&self) -> u32 {
        self.activate_order
    }

    /// Why the last close happened.
    pub fn close_reason(&self) -> CloseReason {
        self.close_reason
    }

    /// Closed through resolve.
    pub fn is_resolved(&self) -> bool {
        self.close_reason == CloseReason::Resolved
    }

    /// Closed through cancel.
    pub fn is_canceled(&self) -> bool {
        self.close_reason == CloseReason::Canceled
    }

    /// The resolved payload. `None` unless the last close was a resolve.
    pub fn value(&self) -> Option<&P> {
        if self.is_resolved() {
            self.input_value.as_ref()
        } else {
            None
        }
    }

    /// The live payload, regardless of how the controller closed.
    pub fn input_value(&self) -> Option<&P> {
        self.input_value.as_ref()
    }

    /// The element that opened the surface.
    pub fn activator(&self) -> Option<&E> {
        self.activator.as_ref()
    }

    /// Pointer position of a pointer activator, in viewport space.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// The surface's root element, once mounted by the renderer.
    pub fn content(&self) -> Option<&E> {
        self.content.as_ref()
    }

    /// Whether the surface subtree should exist.
    pub fn need_render(&self) -> bool {
        self.need_render
    }

    /// Whether the rejected-dismissal affordance is showing.
    pub fn guard_animating(&self) -> bool {
        self.guard_animating
    }

    /// Whether this controller has ever been registered.
    pub fn is_booted(&self) -> bool {
        self.booted
    }

    /// Configuration.
    pub fn options(&self) -> &StackOptions<E> {
        &self.options
    }

    /// Whether any deadline is armed.
    pub fn has_pending_timers(&self) -> bool {
        self.timers.timeout.is_some() || self.timers.guard_pulse.is_some() || self.hover.is_armed()
    }

    pub(crate) fn clear_timers(&mut self) {
        self.timers = Timers::default();
        self.hover.cancel();
        self.hover_activator = None;
    }

    /// Release everything that could outlive the controller.
    pub(crate) fn teardown(&mut self) {
        self.clear_timers();
        self.guard = None;
        // Dropping the sender wakes a launched handle with `Dismissed`.
        self.settle = None;
    }
}
