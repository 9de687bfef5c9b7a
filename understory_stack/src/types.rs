// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: identifiers, clock, lifecycle phases, activators, and notifications.

use core::time::Duration;

use kurbo::Point;

/// Identifier for a controller in a [`Registry`](crate::Registry).
///
/// A small, copyable generational handle: a slot index and a generation counter.
/// Destroying a controller frees its slot; a later controller reusing the slot gets a
/// higher generation, so stale ids never alias a live controller. Every operation taking a
/// stale id is a silent no-op.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct StackId(pub(crate) u32, pub(crate) u32);

impl StackId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A family of overlays that compete for front-most status among themselves.
///
/// For example, sheets may only care which sheet is on top, regardless of dialogs.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct StackType(pub &'static str);

/// Restricts which controllers compete in a front-most query.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Scope {
    /// Every registered controller.
    #[default]
    All,
    /// Only controllers of the given type.
    Type(StackType),
}

/// A point on the host's monotonic clock, in milliseconds.
///
/// The registry never reads a clock itself. Hosts pass the current time to
/// [`Registry::tick`](crate::Registry::tick); tests drive it as virtual time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(pub u64);

impl Instant {
    /// Construct from milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Milliseconds since the host's epoch.
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// `self + d`, saturating at the end of time.
    #[must_use]
    pub fn saturating_add(self, d: Duration) -> Self {
        let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(ms))
    }
}

/// Why the last close happened.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum CloseReason {
    /// Closed without a verdict (dismissed, toggled, timed out, navigated away).
    #[default]
    Indeterminate,
    /// Closed through [`Registry::resolve`](crate::Registry::resolve).
    Resolved,
    /// Closed through [`Registry::cancel`](crate::Registry::cancel).
    Canceled,
}

/// Logical activation state.
///
/// `Pending` is the one-tick deferral between [`Registry::show`](crate::Registry::show) and
/// activation, so the triggering input event finishes propagating before the overlay
/// claims the front.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Closed.
    #[default]
    Inactive,
    /// Shown, waiting for the next tick.
    Pending,
    /// Open.
    Active,
}

/// Renderer transition window.
///
/// A single enum, so "showing" and "closing" can never both be true.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Transition {
    /// No transition running.
    #[default]
    Idle,
    /// Enter transition running.
    Showing,
    /// Leave transition running.
    Closing,
}

/// What opened an overlay.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Activator<E> {
    /// Nothing explicit; fall back to the configured default or the focused element.
    #[default]
    None,
    /// A UI element.
    Element(E),
    /// A pointer event on an element, with its position in viewport space.
    Pointer {
        /// Element the event was delivered to.
        target: E,
        /// Pointer position.
        position: Point,
    },
}

/// Notifications produced by the registry.
///
/// Drained by the host with [`Registry::drain_events`](crate::Registry::drain_events).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StackEvent {
    /// A controller became active.
    Show(StackId),
    /// A controller closed.
    Close {
        /// The controller.
        id: StackId,
        /// Why.
        reason: CloseReason,
    },
    /// A controller resolved with its payload.
    Resolved(StackId),
    /// The auto-close timeout elapsed.
    TimedOut(StackId),
    /// The guard effect pulsed on or off.
    GuardEffect {
        /// The controller.
        id: StackId,
        /// Whether the attention affordance is now showing.
        active: bool,
    },
    /// Page scrolling was locked or unlocked.
    ScrollLock {
        /// New lock state.
        locked: bool,
    },
    /// A navigation guard vetoed a navigation.
    NavigationVetoed(StackId),
}

/// Outcome of [`Registry::show`](crate::Registry::show).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShowOutcome {
    /// Activation is scheduled for the next tick.
    Deferred,
    /// Already active or pending; nothing changed.
    AlreadyActive,
    /// The id is stale.
    Stale,
}

/// Outcome of [`Registry::close`](crate::Registry::close).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CloseOutcome {
    /// The controller closed (or a pending activation was withdrawn).
    Closed,
    /// The controller is persistent and the close was not forced.
    Guarded,
    /// Already inactive; nothing changed.
    AlreadyClosed,
    /// The id is stale.
    Stale,
}

/// Options for [`Registry::close`](crate::Registry::close).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct CloseOptions {
    /// Close even if persistent.
    pub force: bool,
    /// Reason recorded on the controller.
    pub reason: CloseReason,
}

impl CloseOptions {
    /// A forced close with the given reason.
    pub const fn forced(reason: CloseReason) -> Self {
        Self {
            force: true,
            reason,
        }
    }
}

/// Outcome of a dismissal attempt (Escape or outside click).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Dismissal {
    /// Closed with [`CloseReason::Indeterminate`].
    Closed(StackId),
    /// Persistent: refused, and the guard effect fired.
    Guarded(StackId),
}
