// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The registry: controller arena, registration list, and front-most arbitration.
//!
//! ## Overview
//!
//! One registry exists per UI root. It owns every controller in a generational arena and
//! keeps a separate registration list, which is the only structure shared across overlays.
//! Only [`Registry::add`] and [`Registry::remove`] change that list.
//!
//! ## Front-most selection
//!
//! - Candidates are registered controllers in [`Phase::Active`].
//! - An optional [`Scope`] (or an arbitrary predicate) filters candidates first.
//! - The candidate with the highest activation order wins. Orders are assigned by the
//!   registry and are unique among active controllers, so there are no ties.
//! - Queries never mutate anything; repeated queries within a tick agree.
//!
//! ## Time
//!
//! The registry has no clock. [`Registry::tick`] takes the host's current time, promotes
//! deferred activations in call order, fires due deadlines, and reconciles scroll locking.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::controller::StackController;
use crate::error::StackError;
use crate::hover::HoverAction;
use crate::host::{ResponseSink, ScrollLock};
use crate::options::{RegistryConfig, StackOptions};
use crate::types::{
    CloseOptions, CloseOutcome, CloseReason, Instant, Phase, Scope, StackEvent, StackId, Transition,
};

/// Ordered collection of live overlay controllers.
pub struct Registry<P, E> {
    slots: Vec<Option<StackController<P, E>>>,
    generations: Vec<u32>, // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    list: Vec<StackId>,
    pub(crate) pending: Vec<StackId>,
    pub(crate) events: Vec<StackEvent>,
    next_launch_id: u64,
    pub(crate) now: Instant,
    config: RegistryConfig,
    lock_count: usize,
    lock_applied: bool,
    response: Option<Box<dyn ResponseSink<P>>>,
}

impl<P, E> core::fmt::Debug for Registry<P, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("Registry")
            .field("controllers_alive", &alive)
            .field("registered", &self.list.len())
            .field("pending", &self.pending.len())
            .field("events", &self.events.len())
            .field("now", &self.now)
            .field("config", &self.config)
            .field("scroll_locked", &self.lock_applied)
            .finish_non_exhaustive()
    }
}

impl<P, E> Default for Registry<P, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, E> Registry<P, E> {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            list: Vec::new(),
            pending: Vec::new(),
            events: Vec::new(),
            next_launch_id: 0,
            now: Instant::default(),
            config,
            lock_count: 0,
            lock_applied: false,
            response: None,
        }
    }

    /// Registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The time of the last [`Registry::tick`].
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Create a controller (the owning UI node mounted). It is not registered yet.
    pub fn create(&mut self, options: StackOptions<E>) -> StackId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(StackController::new(generation, options));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(StackController::new(generation, options)));
            self.generations.push(generation);
            (self.slots.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "StackId uses 32-bit indices by design."
        )]
        let id = StackId::new(idx as u32, generation);
        #[cfg(feature = "tracing")]
        tracing::trace!(?id, "stack controller created");
        id
    }

    /// Register a controller. Idempotent.
    ///
    /// Returns the new position in the registration list, or `None` if the controller is
    /// already registered or the id is stale.
    pub fn add(&mut self, id: StackId) -> Option<usize> {
        if !self.is_alive(id) || self.list.contains(&id) {
            return None;
        }
        if let Some(c) = self.get_mut(id) {
            c.booted = true;
        }
        self.list.push(id);
        Some(self.list.len() - 1)
    }

    /// Deregister a controller by identity. Returns it if it was registered.
    pub fn remove(&mut self, id: StackId) -> Option<StackId> {
        let pos = self.list.iter().position(|&x| x == id)?;
        Some(self.list.remove(pos))
    }

    /// Tear a controller down: deregister it, clear every deadline, drop its navigation
    /// guard and settlement channel, release its scroll lock, and free its slot.
    ///
    /// Returns false for stale ids.
    pub fn destroy(&mut self, id: StackId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let _ = self.remove(id);
        self.pending.retain(|&p| p != id);
        if let Some(c) = self.get_mut(id) {
            c.teardown();
        }
        self.release_lock(id);
        self.slots[id.idx()] = None;
        self.free_list.push(id.idx());
        #[cfg(feature = "tracing")]
        tracing::trace!(?id, "stack controller destroyed");
        true
    }

    /// [`Registry::destroy`], then settle the host's scroll lock immediately.
    ///
    /// Use this when no further [`Registry::tick`] is guaranteed, such as when the root
    /// rendering the controller goes away.
    pub fn destroy_with<H: ScrollLock + ?Sized>(&mut self, id: StackId, host: &mut H) -> bool {
        let destroyed = self.destroy(id);
        self.reconcile_scroll_lock(host);
        destroyed
    }

    /// Returns true if `id` refers to a live controller.
    pub fn is_alive(&self, id: StackId) -> bool {
        self.slots
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .is_some_and(|c| c.generation == id.1)
    }

    /// Whether a controller is gone. Operations on destroyed controllers are no-ops.
    pub fn is_destroyed(&self, id: StackId) -> bool {
        !self.is_alive(id)
    }

    /// Whether `id` is in the registration list.
    pub fn is_registered(&self, id: StackId) -> bool {
        self.list.contains(&id)
    }

    /// Read a controller.
    pub fn get(&self, id: StackId) -> Option<&StackController<P, E>> {
        let c = self.slots.get(id.idx())?.as_ref()?;
        (c.generation == id.1).then_some(c)
    }

    pub(crate) fn get_mut(&mut self, id: StackId) -> Option<&mut StackController<P, E>> {
        let c = self.slots.get_mut(id.idx())?.as_mut()?;
        (c.generation == id.1).then_some(c)
    }

    /// Registered controllers in registration order.
    pub fn registered(&self) -> impl Iterator<Item = (StackId, &StackController<P, E>)> + '_ {
        self.list
            .iter()
            .filter_map(move |&id| self.get(id).map(|c| (id, c)))
    }

    /// Front-most active controller among those matching `scope`.
    pub fn get_front(&self, scope: Scope) -> Option<StackId> {
        self.get_front_by(|_, c| match scope {
            Scope::All => true,
            Scope::Type(ty) => c.options.stack_type == Some(ty),
        })
    }

    /// Front-most active controller among those matching `filter`.
    pub fn get_front_by(
        &self,
        filter: impl Fn(StackId, &StackController<P, E>) -> bool,
    ) -> Option<StackId> {
        let mut best: Option<(StackId, u32)> = None;
        for (id, c) in self.registered() {
            if c.phase != Phase::Active || !filter(id, c) {
                continue;
            }
            match best {
                Some((_, order)) if order >= c.activate_order => {}
                _ => best = Some((id, c.activate_order)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Whether `id` is the front-most controller within `scope`.
    pub fn is_front(&self, id: StackId, scope: Scope) -> bool {
        self.get_front(scope) == Some(id)
    }

    /// Highest activation order among active controllers, or `0`.
    pub(crate) fn front_order(&self) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|c| c.is_active())
            .map(|c| c.activate_order)
            .max()
            .unwrap_or(0)
    }

    /// Whether any registered controller is in an enter or leave transition.
    pub fn some_transitioning(&self) -> bool {
        self.registered()
            .any(|(_, c)| c.transition != Transition::Idle)
    }

    pub(crate) fn others_transitioning(&self, id: StackId) -> bool {
        self.registered()
            .any(|(other, c)| other != id && c.transition != Transition::Idle)
    }

    /// Allocate an identity for a dynamically launched surface.
    pub fn gen_id(&mut self) -> u64 {
        self.next_launch_id += 1;
        self.next_launch_id
    }

    /// Paint order for an active controller: the configured baseline plus its activation
    /// order. `None` while inactive.
    pub fn z_index(&self, id: StackId) -> Option<i32> {
        let c = self.get(id)?;
        c.is_active()
            .then(|| self.config.base_z_index.saturating_add_unsigned(c.activate_order))
    }

    /// Notifications produced since the last drain.
    pub fn events(&self) -> &[StackEvent] {
        &self.events
    }

    /// Take all pending notifications.
    pub fn drain_events(&mut self) -> Vec<StackEvent> {
        core::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: StackEvent) {
        self.events.push(event);
    }

    /// Install the side channel used by [`Registry::write_response`].
    pub fn set_response_sink(&mut self, sink: Option<Box<dyn ResponseSink<P>>>) {
        self.response = sink;
    }

    /// Relay `payload` to the embedding environment.
    ///
    /// Fails with [`StackError::NoResponseHost`] when no sink is installed.
    pub fn write_response(&mut self, payload: &P) -> Result<(), StackError> {
        let sink = self.response.as_mut().ok_or(StackError::NoResponseHost)?;
        sink.write(payload);
        Ok(())
    }

    /// Whether page scrolling is currently locked on the host.
    pub fn is_scroll_locked(&self) -> bool {
        self.lock_applied
    }

    pub(crate) fn take_lock(&mut self, id: StackId) {
        let Some(c) = self.get_mut(id) else {
            return;
        };
        if c.options.scroll_lock && !c.holds_scroll_lock {
            c.holds_scroll_lock = true;
            self.lock_count += 1;
        }
    }

    pub(crate) fn release_lock(&mut self, id: StackId) {
        let Some(c) = self.get_mut(id) else {
            return;
        };
        if c.holds_scroll_lock {
            c.holds_scroll_lock = false;
            self.lock_count -= 1;
        }
    }

    /// Acquire or release the host's scroll lock if the desired state changed.
    pub fn reconcile_scroll_lock<H: ScrollLock + ?Sized>(&mut self, host: &mut H) {
        let want = self.lock_count > 0;
        if want == self.lock_applied {
            return;
        }
        if want {
            host.acquire();
        } else {
            host.release();
        }
        self.lock_applied = want;
        self.emit(StackEvent::ScrollLock { locked: want });
    }

    fn live_ids(&self) -> Vec<StackId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "StackId uses 32-bit indices by design."
                )]
                s.as_ref().map(|c| StackId::new(i as u32, c.generation))
            })
            .collect()
    }

    /// Advance the host clock.
    ///
    /// Fires due deadlines (guard pulse end, auto-close timeout, hover open/close), then
    /// promotes deferred activations in the order they were requested, then reconciles
    /// scroll locking.
    pub fn tick<H: ScrollLock + ?Sized>(&mut self, now: Instant, host: &mut H) {
        if now > self.now {
            self.now = now;
        }
        self.fire_due();
        self.activate_pending();
        self.reconcile_scroll_lock(host);
    }

    fn fire_due(&mut self) {
        let now = self.now;
        for id in self.live_ids() {
            let Some(c) = self.get_mut(id) else {
                continue;
            };
            if c.timers.guard_pulse.is_some_and(|t| t <= now) {
                c.timers.guard_pulse = None;
                c.guard_animating = false;
                self.emit(StackEvent::GuardEffect { id, active: false });
            }

            let Some(c) = self.get_mut(id) else {
                continue;
            };
            if c.timers.timeout.is_some_and(|t| t <= now) {
                c.timers.timeout = None;
                #[cfg(feature = "tracing")]
                tracing::debug!(?id, "stack auto-close timeout elapsed");
                if self.close(id, CloseOptions::forced(CloseReason::Indeterminate))
                    == CloseOutcome::Closed
                {
                    self.emit(StackEvent::TimedOut(id));
                }
            }

            let Some(c) = self.get_mut(id) else {
                continue;
            };
            match c.hover.take_due(now) {
                Some(HoverAction::Open) => {
                    let activator = c.hover_activator.take();
                    let _ = self.request_show(id, activator, None);
                }
                Some(HoverAction::Close) => {
                    let _ = self.close(id, CloseOptions::default());
                }
                None => {}
            }
        }
    }

    fn activate_pending(&mut self) {
        let queue = core::mem::take(&mut self.pending);
        for id in queue {
            let order = self.front_order() + 1;
            let Some(c) = self.get_mut(id) else {
                continue;
            };
            if c.phase != Phase::Pending {
                continue;
            }
            c.phase = Phase::Active;
            c.transition = Transition::Showing;
            c.close_reason = CloseReason::Indeterminate;
            c.activate_order = order;
            c.need_render = true;
            #[cfg(feature = "tracing")]
            tracing::debug!(?id, order, "stack shown");
            self.take_lock(id);
            self.emit(StackEvent::Show(id));
        }
    }
}
