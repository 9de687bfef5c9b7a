// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover intent: delayed, cancellable open and close driven by pointer enter/leave.
//!
//! At most one of the two deadlines is armed at a time. Entering cancels a pending close;
//! leaving cancels a pending open.

use core::time::Duration;

use crate::types::Instant;

/// The action a due hover deadline asks for.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum HoverAction {
    Open,
    Close,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct HoverIntent {
    open_at: Option<Instant>,
    close_at: Option<Instant>,
}

impl HoverIntent {
    /// Pointer entered the activator: cancel any close and schedule an open.
    pub(crate) fn enter(&mut self, now: Instant, delay: Duration) {
        self.close_at = None;
        self.open_at = Some(now.saturating_add(delay));
    }

    /// Pointer is still over the activator or surface: cancel any close.
    pub(crate) fn stay(&mut self) {
        self.close_at = None;
    }

    /// Pointer left: cancel any open and schedule a close.
    pub(crate) fn leave(&mut self, now: Instant, delay: Duration) {
        self.open_at = None;
        self.close_at = Some(now.saturating_add(delay));
    }

    /// Drop both deadlines.
    pub(crate) fn cancel(&mut self) {
        self.open_at = None;
        self.close_at = None;
    }

    pub(crate) fn cancel_open(&mut self) {
        self.open_at = None;
    }

    pub(crate) fn cancel_close(&mut self) {
        self.close_at = None;
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.open_at.is_some() || self.close_at.is_some()
    }

    /// Take the deadline that has come due at `now`, if any.
    pub(crate) fn take_due(&mut self, now: Instant) -> Option<HoverAction> {
        if self.open_at.is_some_and(|t| t <= now) {
            self.open_at = None;
            return Some(HoverAction::Open);
        }
        if self.close_at.is_some_and(|t| t <= now) {
            self.close_at = None;
            return Some(HoverAction::Close);
        }
        None
    }
}
