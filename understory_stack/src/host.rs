// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capabilities the registry consumes from its host.
//!
//! ## Overview
//!
//! The registry never touches a DOM, a compositor, or a window system. Anything that needs
//! measurement, focus, or scroll locking goes through these traits. They are generic over the
//! host's element handle `E`, which only has to be cloneable and comparable.
//!
//! - [`Measure`]: bounding rects, containment, focused element, activator resolution.
//! - [`Focus`]: move focus.
//! - [`ScrollLock`]: scoped page-scroll locking.
//! - [`Host`]: all three, implemented automatically.
//! - [`ResponseSink`]: optional side channel for hosts that relay results elsewhere.

use alloc::vec::Vec;

use kurbo::{Rect, Size, Vec2};

use crate::types::Activator;

/// Element measurement and queries.
pub trait Measure<E> {
    /// Bounding box of `element` in viewport space, or `None` if it is not laid out.
    fn bounding_rect(&self, element: &E) -> Option<Rect>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &E, node: &E) -> bool;

    /// The currently focused element, if any.
    fn focused(&self) -> Option<E> {
        None
    }

    /// Resolve an activator to the element it refers to.
    fn resolve_activator(&self, activator: &Activator<E>) -> Option<E>
    where
        E: Clone,
    {
        match activator {
            Activator::None => None,
            Activator::Element(e) => Some(e.clone()),
            Activator::Pointer { target, .. } => Some(target.clone()),
        }
    }

    /// Scrollable ancestors of `element`, nearest first.
    fn scroll_ancestors(&self, _element: &E) -> Vec<E> {
        Vec::new()
    }

    /// Visible viewport size.
    fn viewport_size(&self) -> Size {
        Size::ZERO
    }

    /// Page scroll offset.
    fn scroll_offset(&self) -> Vec2 {
        Vec2::ZERO
    }
}

/// Focus movement.
pub trait Focus<E> {
    /// Try to focus `element`. Returns whether focus moved.
    fn attempt_focus(&mut self, element: &E) -> bool;

    /// Focus the first focusable descendant of `element`. Returns whether focus moved.
    fn focus_first_descendant(&mut self, element: &E) -> bool;
}

/// Page-scroll locking.
///
/// The registry reference-counts scroll-locking controllers and calls `acquire` exactly on
/// the first lock and `release` exactly on the last unlock.
pub trait ScrollLock {
    /// Lock page scrolling.
    fn acquire(&mut self);
    /// Unlock page scrolling.
    fn release(&mut self);
}

/// A full host: measurement, focus, and scroll locking.
pub trait Host<E>: Measure<E> + Focus<E> + ScrollLock {}

impl<E, T> Host<E> for T where T: Measure<E> + Focus<E> + ScrollLock {}

/// Side channel that relays a payload to an embedding environment.
pub trait ResponseSink<P> {
    /// Deliver `payload`.
    fn write(&mut self, payload: &P);
}
