// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Global input handlers: Escape, outside clicks, focus trapping, and hover intent.
//!
//! ## Guarded dismissal
//!
//! Escape and outside clicks consult one predicate, [`Registry::can_dismiss`], before
//! closing anything. A controller may be dismissed only when all of these hold:
//!
//! - it is active and not in its enter transition,
//! - it is front-most within its [`DismissScope`](crate::DismissScope),
//! - no other registered controller is transitioning.
//!
//! A persistent controller that passes the predicate refuses and pulses its guard effect
//! instead.
//!
//! ## Focus trap
//!
//! There is one focus listener per registry ([`Registry::on_focus_in`]). Only the front-most
//! controller's trap is ever in effect.

use alloc::vec::Vec;

use crate::host::{Focus, Measure};
use crate::registry::Registry;
use crate::types::{CloseOptions, Dismissal, Phase, Scope, StackId, Transition};

impl<P, E> Registry<P, E> {
    /// Whether a dismissal (Escape, outside click) may close `id` right now.
    pub fn can_dismiss(&self, id: StackId) -> bool {
        let Some(c) = self.get(id) else {
            return false;
        };
        c.is_active()
            && c.transition != Transition::Showing
            && self.is_front(id, c.options.dismiss_filter())
            && !self.others_transitioning(id)
    }

    fn dismiss(&mut self, id: StackId) -> Dismissal {
        if self.get(id).is_some_and(|c| c.options.persistent) {
            #[cfg(feature = "tracing")]
            tracing::debug!(?id, "dismissal refused by persistent stack");
            self.guard_effect(id);
            return Dismissal::Guarded(id);
        }
        let _ = self.close(id, CloseOptions::default());
        Dismissal::Closed(id)
    }

    /// Escape was pressed.
    ///
    /// Dismisses the highest controller that closes on Escape and passes
    /// [`Registry::can_dismiss`].
    pub fn on_escape(&mut self) -> Option<Dismissal> {
        let target = self.get_front_by(|id, c| c.options.close_on_escape && self.can_dismiss(id))?;
        Some(self.dismiss(target))
    }

    /// A pointer press landed on `target`.
    ///
    /// Every controller that closes on outside clicks, passes [`Registry::can_dismiss`], and
    /// contains `target` neither in its surface nor in its activator is dismissed. All
    /// decisions are taken before anything closes.
    pub fn on_outside_click<M: Measure<E> + ?Sized>(
        &mut self,
        target: &E,
        measure: &M,
    ) -> Vec<Dismissal> {
        let hit: Vec<StackId> = self
            .registered()
            .filter(|&(id, c)| {
                c.options.close_on_outside_click
                    && self.can_dismiss(id)
                    && !c.content.as_ref().is_some_and(|e| measure.contains(e, target))
                    && !c.activator.as_ref().is_some_and(|e| measure.contains(e, target))
            })
            .map(|(id, _)| id)
            .collect();
        hit.into_iter().map(|id| self.dismiss(id)).collect()
    }

    /// Focus moved to `target`.
    ///
    /// If the front-most controller traps focus and `target` is outside its surface, focus is
    /// moved back to the surface's first focusable descendant. Returns whether focus was
    /// redirected.
    pub fn on_focus_in<H: Measure<E> + Focus<E> + ?Sized>(
        &mut self,
        target: &E,
        host: &mut H,
    ) -> bool {
        let Some(front) = self.get_front(Scope::All) else {
            return false;
        };
        let Some(c) = self.get(front) else {
            return false;
        };
        if !c.options.focus_trap {
            return false;
        }
        let Some(content) = c.content.as_ref() else {
            return false;
        };
        if host.contains(content, target) {
            return false;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(id = ?front, "focus trapped");
        host.focus_first_descendant(content)
    }

    /// The pointer entered the surface: keep a hover-opened controller open.
    pub fn hover_stay(&mut self, id: StackId) {
        if let Some(c) = self.get_mut(id) {
            c.hover.stay();
        }
    }
}

impl<P, E: Clone> Registry<P, E> {
    /// The pointer entered `activator`.
    ///
    /// For `open_on_hover` controllers this cancels a pending close and, if the controller is
    /// closed, schedules an open after `open_delay`.
    pub fn hover_enter(&mut self, id: StackId, activator: &E) {
        let now = self.now;
        let Some(c) = self.get_mut(id) else {
            return;
        };
        if !c.options.open_on_hover {
            return;
        }
        if c.phase == Phase::Inactive {
            c.hover.enter(now, c.options.open_delay);
            c.hover_activator = Some(activator.clone());
        } else {
            c.hover.stay();
        }
    }

    /// The pointer left the activator or the surface, moving to `related` (if known).
    ///
    /// A pending open is cancelled. A close is scheduled after `close_delay` unless `related`
    /// is inside the surface or the activator.
    pub fn hover_leave<M: Measure<E> + ?Sized>(
        &mut self,
        id: StackId,
        related: Option<&E>,
        measure: &M,
    ) {
        let now = self.now;
        let Some(c) = self.get_mut(id) else {
            return;
        };
        if !c.options.open_on_hover {
            return;
        }
        let inside = related.is_some_and(|r| {
            c.content.as_ref().is_some_and(|e| measure.contains(e, r))
                || c.activator.as_ref().is_some_and(|e| measure.contains(e, r))
        });
        if inside {
            c.hover.stay();
            return;
        }
        if c.phase == Phase::Inactive {
            c.hover.cancel_open();
            c.hover_activator = None;
        } else {
            c.hover.leave(now, c.options.close_delay);
        }
    }
}
