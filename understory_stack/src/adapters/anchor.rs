// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter helpers for Understory Anchor.
//!
//! ## Feature
//!
//! Enable with `anchor_adapter`.
//!
//! ## Notes
//!
//! These helpers read a controller's activator, pointer, and content from the registry,
//! measure them through the host's [`Measure`], and feed the results to the positioning
//! engine. A pointer activator anchors to the pointer position (a zero-size rect) instead of
//! the target element's box.

use kurbo::Rect;
use understory_anchor::{AnchoredSurface, Constraints, Placement, Viewport, place};

use crate::host::Measure;
use crate::registry::Registry;
use crate::types::StackId;

/// The current viewport, as reported by the host.
pub fn viewport<E, M: Measure<E> + ?Sized>(measure: &M) -> Viewport {
    Viewport {
        size: measure.viewport_size(),
        scroll: measure.scroll_offset(),
    }
}

/// The rect a controller's surface anchors to, in viewport space.
///
/// `None` when the controller has no activator or it is not laid out.
pub fn anchor_rect<P, E, M: Measure<E> + ?Sized>(
    registry: &Registry<P, E>,
    id: StackId,
    measure: &M,
) -> Option<Rect> {
    let c = registry.get(id)?;
    if let Some(pt) = c.pointer() {
        return Some(Rect::from_points(pt, pt));
    }
    measure.bounding_rect(c.activator()?)
}

/// The natural (unconstrained) rect of a controller's surface.
pub fn natural_rect<P, E, M: Measure<E> + ?Sized>(
    registry: &Registry<P, E>,
    id: StackId,
    measure: &M,
) -> Option<Rect> {
    measure.bounding_rect(registry.get(id)?.content()?)
}

/// Place a controller's surface.
///
/// Returns `None` while the surface should stay hidden: it is not rendered, or either rect
/// is not available yet.
pub fn place_stack<P, E, M: Measure<E> + ?Sized>(
    registry: &Registry<P, E>,
    id: StackId,
    constraints: &Constraints,
    measure: &M,
) -> Option<Placement> {
    if !registry.get(id)?.need_render() {
        return None;
    }
    place(
        anchor_rect(registry, id, measure),
        natural_rect(registry, id, measure),
        constraints,
        &viewport(measure),
    )
}

/// Re-measure a controller into a cached [`AnchoredSurface`] and commit.
///
/// Returns whether the placement changed.
pub fn refresh<P, E, M: Measure<E> + ?Sized>(
    surface: &mut AnchoredSurface,
    registry: &Registry<P, E>,
    id: StackId,
    measure: &M,
) -> bool {
    let rendered = registry.get(id).is_some_and(|c| c.need_render());
    if rendered {
        surface.set_anchor(anchor_rect(registry, id, measure));
        surface.set_natural(natural_rect(registry, id, measure));
    } else {
        surface.set_anchor(None);
        surface.set_natural(None);
    }
    surface.set_viewport(viewport(measure));
    surface.commit()
}
