// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A dirty-tracked anchored surface.
//!
//! Hosts re-measure on scroll, resize, and every render tick. [`AnchoredSurface`] keeps the
//! last inputs, marks only the inputs that actually changed, and recomputes the placement on
//! [`AnchoredSurface::commit`] when something is dirty.

use kurbo::Rect;

use crate::place::place;
use crate::types::{Constraints, Placement, Viewport};

bitflags::bitflags! {
    /// Inputs that changed since the last commit.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DirtyInputs: u8 {
        /// Anchor rect changed.
        const ANCHOR      = 0b0000_0001;
        /// Natural surface rect changed.
        const NATURAL     = 0b0000_0010;
        /// Viewport size or scroll changed.
        const VIEWPORT    = 0b0000_0100;
        /// Constraints changed.
        const CONSTRAINTS = 0b0000_1000;
    }
}

/// Cached placement for one surface.
#[derive(Clone, Debug)]
pub struct AnchoredSurface {
    anchor: Option<Rect>,
    natural: Option<Rect>,
    viewport: Viewport,
    constraints: Constraints,
    dirty: DirtyInputs,
    placement: Option<Placement>,
}

impl AnchoredSurface {
    /// Create a surface with no measurements yet.
    pub fn new(constraints: Constraints, viewport: Viewport) -> Self {
        Self {
            anchor: None,
            natural: None,
            viewport,
            constraints,
            dirty: DirtyInputs::all(),
            placement: None,
        }
    }

    /// Update the anchor rect (viewport space). `None` means not laid out.
    pub fn set_anchor(&mut self, anchor: Option<Rect>) {
        if self.anchor != anchor {
            self.anchor = anchor;
            self.dirty |= DirtyInputs::ANCHOR;
        }
    }

    /// Update the surface's natural rect. `None` means not laid out.
    pub fn set_natural(&mut self, natural: Option<Rect>) {
        if self.natural != natural {
            self.natural = natural;
            self.dirty |= DirtyInputs::NATURAL;
        }
    }

    /// Update the viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.dirty |= DirtyInputs::VIEWPORT;
        }
    }

    /// Update the constraints.
    pub fn set_constraints(&mut self, constraints: Constraints) {
        if self.constraints != constraints {
            self.constraints = constraints;
            self.dirty |= DirtyInputs::CONSTRAINTS;
        }
    }

    /// Current constraints.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Inputs changed since the last commit.
    pub fn dirty(&self) -> DirtyInputs {
        self.dirty
    }

    /// The last committed placement, or `None` while the surface should stay hidden.
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// Recompute if any input changed. Returns true when the placement differs from the
    /// previous one.
    pub fn commit(&mut self) -> bool {
        if self.dirty.is_empty() {
            return false;
        }
        self.dirty = DirtyInputs::empty();
        let next = place(self.anchor, self.natural, &self.constraints, &self.viewport);
        let changed = next != self.placement;
        self.placement = next;
        changed
    }
}
