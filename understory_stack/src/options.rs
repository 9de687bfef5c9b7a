// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration for controllers and registries.

use alloc::string::String;
use core::time::Duration;

use crate::types::{Scope, StackType};

/// How long a rejected dismissal keeps the guard effect visible.
pub const GUARD_PULSE: Duration = Duration::from_millis(150);

/// Default paint-order baseline for managed overlays.
pub const DEFAULT_BASE_Z_INDEX: i32 = 2000;

/// Which front-most check a dismissal (Escape, outside click) consults.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DismissScope {
    /// Must be front among all controllers.
    #[default]
    Global,
    /// Must be front among controllers of the same [`StackType`]. Falls back to
    /// [`DismissScope::Global`] when the controller has no type.
    SameType,
}

/// When a controller's navigation guard is consulted.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum GuardScope {
    /// On every navigation while active.
    #[default]
    BeforeEach,
    /// Only when navigating away from the given route.
    Leave(String),
}

/// Per-controller configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct StackOptions<E> {
    /// Refuse non-forced closes.
    pub persistent: bool,
    /// Auto-close after the enter transition completes.
    pub timeout: Option<Duration>,
    /// Open on pointer enter instead of explicit `show`.
    pub open_on_hover: bool,
    /// Delay before a hover open.
    pub open_delay: Duration,
    /// Delay before a hover close.
    pub close_delay: Duration,
    /// Escape dismisses.
    pub close_on_escape: bool,
    /// Clicking outside the surface and activator dismisses.
    pub close_on_outside_click: bool,
    /// Force-close after a navigation completes.
    pub close_on_navigation: bool,
    /// Keep focus inside the surface while front-most.
    pub focus_trap: bool,
    /// Return focus to the activator once the leave transition completes.
    pub return_focus: bool,
    /// Lock page scrolling while active.
    pub scroll_lock: bool,
    /// Keep the surface subtree mounted even while closed.
    pub always_render: bool,
    /// Pulse the guard effect on rejected dismissals.
    pub guard_effect: bool,
    /// With no explicit activator, fall back to the focused element.
    pub capture_focus: bool,
    /// Activator used when `show` gets none.
    pub default_activator: Option<E>,
    /// Family this controller competes in.
    pub stack_type: Option<StackType>,
    /// Front-most check for dismissals.
    pub dismiss_scope: DismissScope,
    /// When the navigation guard runs.
    pub guard_scope: GuardScope,
}

impl<E> Default for StackOptions<E> {
    fn default() -> Self {
        Self {
            persistent: false,
            timeout: None,
            open_on_hover: false,
            open_delay: Duration::ZERO,
            close_delay: Duration::ZERO,
            close_on_escape: true,
            close_on_outside_click: true,
            close_on_navigation: true,
            focus_trap: false,
            return_focus: true,
            scroll_lock: false,
            always_render: false,
            guard_effect: true,
            capture_focus: true,
            default_activator: None,
            stack_type: None,
            dismiss_scope: DismissScope::Global,
            guard_scope: GuardScope::BeforeEach,
        }
    }
}

impl<E> StackOptions<E> {
    /// Modal dialog defaults: trapped focus and locked scrolling.
    pub fn dialog() -> Self {
        Self {
            focus_trap: true,
            scroll_lock: true,
            ..Self::default()
        }
    }

    /// Menu defaults: no focus trap or scroll lock.
    pub fn menu() -> Self {
        Self::default()
    }

    /// Snackbar defaults: never dismissed by Escape or outside clicks.
    pub fn snackbar(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            close_on_escape: false,
            close_on_outside_click: false,
            return_focus: false,
            capture_focus: false,
            ..Self::default()
        }
    }

    /// The scope a dismissal consults for this controller.
    pub(crate) fn dismiss_filter(&self) -> Scope {
        match (self.dismiss_scope, self.stack_type) {
            (DismissScope::SameType, Some(ty)) => Scope::Type(ty),
            _ => Scope::All,
        }
    }
}

/// Registry-wide configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RegistryConfig {
    /// Added to each active controller's activation order to produce its paint order.
    pub base_z_index: i32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_z_index: DEFAULT_BASE_Z_INDEX,
        }
    }
}
