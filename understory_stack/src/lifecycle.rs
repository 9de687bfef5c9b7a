// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller lifecycle: activation, closing, resolution, and renderer transition callbacks.
//!
//! All operations take a [`StackId`]; a stale id is a silent no-op (or a `Stale` outcome).

use kurbo::Point;

use crate::host::{Focus, Measure, ScrollLock};
use crate::options::GUARD_PULSE;
use crate::registry::Registry;
use crate::types::{
    Activator, CloseOptions, CloseOutcome, CloseReason, Phase, Scope, ShowOutcome, StackEvent,
    StackId, Transition,
};

impl<P, E> Registry<P, E> {
    /// Schedule activation with an already-resolved activator element.
    ///
    /// The controller enters [`Phase::Pending`] and is promoted on the next
    /// [`Registry::tick`].
    pub(crate) fn request_show(
        &mut self,
        id: StackId,
        activator: Option<E>,
        pointer: Option<Point>,
    ) -> ShowOutcome {
        let Some(c) = self.get_mut(id) else {
            return ShowOutcome::Stale;
        };
        if c.phase != Phase::Inactive {
            return ShowOutcome::AlreadyActive;
        }
        c.hover.cancel_close();
        c.activator = activator;
        c.pointer = pointer;
        c.phase = Phase::Pending;
        self.pending.push(id);
        #[cfg(feature = "tracing")]
        tracing::trace!(?id, "stack activation deferred");
        ShowOutcome::Deferred
    }

    /// Close a controller.
    ///
    /// A persistent controller refuses unless `options.force` is set; the refusal changes
    /// nothing. Closing a pending controller withdraws its activation without a
    /// notification.
    pub fn close(&mut self, id: StackId, options: CloseOptions) -> CloseOutcome {
        let Some(c) = self.get_mut(id) else {
            return CloseOutcome::Stale;
        };
        if c.phase == Phase::Inactive {
            return CloseOutcome::AlreadyClosed;
        }
        if c.options.persistent && !options.force {
            #[cfg(feature = "tracing")]
            tracing::debug!(?id, "close refused by persistent stack");
            return CloseOutcome::Guarded;
        }
        let was_pending = c.phase == Phase::Pending;
        c.phase = Phase::Inactive;
        c.close_reason = options.reason;
        c.activate_order = 0;
        c.timers.timeout = None;
        c.hover.cancel();
        if was_pending {
            self.pending.retain(|&p| p != id);
            return CloseOutcome::Closed;
        }
        c.transition = Transition::Closing;
        #[cfg(feature = "tracing")]
        tracing::debug!(?id, reason = ?options.reason, "stack closed");
        self.release_lock(id);
        self.emit(StackEvent::Close {
            id,
            reason: options.reason,
        });
        CloseOutcome::Closed
    }

    /// Raise an active controller above every other active controller.
    ///
    /// No-op when inactive or already front-most. Returns whether the order changed.
    pub fn to_front(&mut self, id: StackId) -> bool {
        let front = self.get_front(Scope::All);
        if front == Some(id) {
            return false;
        }
        let order = self.front_order() + 1;
        match self.get_mut(id) {
            Some(c) if c.is_active() => {
                c.activate_order = order;
                true
            }
            _ => false,
        }
    }

    /// Pulse the rejected-dismissal affordance for [`GUARD_PULSE`].
    ///
    /// Does nothing when the controller disables the effect.
    pub fn guard_effect(&mut self, id: StackId) {
        let now = self.now;
        let Some(c) = self.get_mut(id) else {
            return;
        };
        if !c.options.guard_effect {
            return;
        }
        c.timers.guard_pulse = Some(now.saturating_add(GUARD_PULSE));
        if !c.guard_animating {
            c.guard_animating = true;
            self.emit(StackEvent::GuardEffect { id, active: true });
        }
    }

    /// Record the surface's root element once the renderer has mounted it.
    pub fn set_content(&mut self, id: StackId, content: Option<E>) {
        if let Some(c) = self.get_mut(id) {
            c.content = content;
        }
    }

    /// Replace the live payload without touching the snapshot.
    pub fn set_input_value(&mut self, id: StackId, value: Option<P>) {
        if let Some(c) = self.get_mut(id) {
            c.input_value = value;
        }
    }

    /// Renderer: enter transition started.
    pub fn before_enter(&mut self, id: StackId) {
        if let Some(c) = self.get_mut(id) {
            if c.is_active() {
                c.transition = Transition::Showing;
            }
        }
    }

    /// Renderer: enter transition finished.
    ///
    /// Arms the auto-close timeout and, if the controller traps focus and is front-most,
    /// moves focus into the surface.
    pub fn after_enter<H: Focus<E> + ?Sized>(&mut self, id: StackId, host: &mut H) {
        let now = self.now;
        let is_front = self.is_front(id, Scope::All);
        let Some(c) = self.get_mut(id) else {
            return;
        };
        if c.transition == Transition::Showing {
            c.transition = Transition::Idle;
        }
        if !c.is_active() {
            return;
        }
        if let Some(timeout) = c.options.timeout {
            c.timers.timeout = Some(now.saturating_add(timeout));
        }
        if c.options.focus_trap && is_front {
            if let Some(content) = c.content.as_ref() {
                let _ = host.focus_first_descendant(content);
            }
        }
    }

    /// Renderer: enter transition interrupted.
    pub fn enter_cancelled(&mut self, id: StackId) {
        if let Some(c) = self.get_mut(id) {
            if c.transition == Transition::Showing {
                c.transition = Transition::Idle;
            }
        }
    }

    /// Renderer: leave transition started.
    pub fn before_leave(&mut self, id: StackId) {
        if let Some(c) = self.get_mut(id) {
            if !c.is_active() {
                c.transition = Transition::Closing;
            }
        }
    }

    /// Renderer: leave transition finished.
    ///
    /// Unmounts the surface unless it always renders, returns focus to the activator, and
    /// reconciles scroll locking.
    pub fn after_leave<H: Focus<E> + ScrollLock + ?Sized>(&mut self, id: StackId, host: &mut H) {
        if let Some(c) = self.get_mut(id) {
            if c.transition == Transition::Closing {
                c.transition = Transition::Idle;
            }
            if !c.is_active() {
                c.need_render = c.options.always_render;
                if c.options.return_focus {
                    if let Some(activator) = c.activator.as_ref() {
                        let _ = host.attempt_focus(activator);
                    }
                }
            }
        }
        self.reconcile_scroll_lock(host);
    }

    /// Renderer: leave transition interrupted.
    pub fn leave_cancelled(&mut self, id: StackId) {
        if let Some(c) = self.get_mut(id) {
            if c.transition == Transition::Closing {
                c.transition = Transition::Idle;
            }
        }
    }
}

impl<P, E: Clone> Registry<P, E> {
    /// Request activation.
    ///
    /// The activator is resolved in order: the explicit `activator`, the configured default
    /// activator, then (with `capture_focus`) the currently focused element. A pointer
    /// activator also records the pointer position.
    ///
    /// Calling `show` on an active or pending controller changes nothing.
    pub fn show<M: Measure<E> + ?Sized>(
        &mut self,
        id: StackId,
        activator: Activator<E>,
        measure: &M,
    ) -> ShowOutcome {
        let Some(c) = self.get(id) else {
            return ShowOutcome::Stale;
        };
        if c.phase != Phase::Inactive {
            return ShowOutcome::AlreadyActive;
        }
        let pointer = match &activator {
            Activator::Pointer { position, .. } => Some(*position),
            _ => None,
        };
        let element = match activator {
            Activator::None => match &c.options.default_activator {
                Some(default) => measure.resolve_activator(&Activator::Element(default.clone())),
                None if c.options.capture_focus => measure.focused(),
                None => None,
            },
            explicit => measure.resolve_activator(&explicit),
        };
        self.request_show(id, element, pointer)
    }

    /// Close if active or pending, otherwise show.
    pub fn toggle<M: Measure<E> + ?Sized>(
        &mut self,
        id: StackId,
        activator: Activator<E>,
        measure: &M,
    ) -> bool {
        match self.get(id).map(|c| c.phase) {
            Some(Phase::Inactive) => self.show(id, activator, measure) == ShowOutcome::Deferred,
            Some(_) => self.close(id, CloseOptions::default()) == CloseOutcome::Closed,
            None => false,
        }
    }
}

impl<P: Clone, E> Registry<P, E> {
    /// Close with a verdict, forcing past persistence.
    ///
    /// `value`, when given, replaces the live payload first. A launched instance's result
    /// handle receives the payload.
    pub fn resolve(&mut self, id: StackId, value: Option<P>) -> CloseOutcome {
        match self.get(id) {
            None => return CloseOutcome::Stale,
            Some(c) if c.phase == Phase::Inactive => return CloseOutcome::AlreadyClosed,
            Some(_) => {}
        }
        if let Some(c) = self.get_mut(id) {
            if value.is_some() {
                c.input_value = value;
            }
        }
        let outcome = self.close(id, CloseOptions::forced(CloseReason::Resolved));
        if outcome == CloseOutcome::Closed {
            if let Some(c) = self.get_mut(id) {
                if let Some(tx) = c.settle.take() {
                    let _ = tx.send(c.input_value.clone());
                }
            }
            self.emit(StackEvent::Resolved(id));
        }
        outcome
    }

    /// Close as canceled. The live payload is left as is; see [`Registry::reset_value`].
    pub fn cancel(&mut self, id: StackId, force: bool) -> CloseOutcome {
        self.close(
            id,
            CloseOptions {
                force,
                reason: CloseReason::Canceled,
            },
        )
    }

    /// Restore the live payload to the last snapshot.
    pub fn reset_value(&mut self, id: StackId) {
        if let Some(c) = self.get_mut(id) {
            c.input_value = c.initial_value.clone();
        }
    }

    /// Push a new external value: refresh both the snapshot and the live payload.
    pub fn set_value(&mut self, id: StackId, value: Option<P>) {
        if let Some(c) = self.get_mut(id) {
            c.initial_value = value.clone();
            c.input_value = value;
        }
    }
}
