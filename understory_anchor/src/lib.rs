// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_anchor --heading-base-level=0

//! Understory Anchor: Kurbo-native placement for floating surfaces.
//!
//! Menus, tooltips, and popovers float next to a reference element. This crate answers one
//! question: given the anchor's box, the surface's natural box, a set of [`Constraints`],
//! and the [`Viewport`], where does the surface go?
//!
//! - Preferred sides per axis: outer (`Left`/`Right`, `Top`/`Bottom`), inner (edges flush),
//!   or centered.
//! - Flip to the opposite side only when it has more room; otherwise shrink in place.
//! - Keep an edge margin, translate back into the viewport, and shrink as a last resort.
//! - `Fit` sizes follow the anchor; `Free` sizes follow the surface.
//!
//! It does not measure anything. Feed it rects from whatever layout or DOM you have.
//!
//! ## API overview
//!
//! - [`place`]: the pure solver. Returns `None` while either rect is unavailable.
//! - [`AnchoredSurface`]: caches the inputs with [`DirtyInputs`] and recomputes on
//!   [`AnchoredSurface::commit`], for hosts that re-measure on every scroll or resize.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_anchor::{AlignX, AlignY, Constraints, SizeSpec, Viewport, place};
//!
//! // A dropdown: same width as its button, below it, left edges flush.
//! let constraints = Constraints {
//!     x: AlignX::LeftInner,
//!     y: AlignY::Bottom,
//!     width: SizeSpec::Fit,
//!     edge_margin: 12.0,
//!     ..Default::default()
//! };
//! let button = Rect::new(40.0, 40.0, 200.0, 72.0);
//! let list = Rect::new(0.0, 0.0, 120.0, 300.0);
//!
//! let p = place(Some(button), Some(list), &constraints, &Viewport::new(1024.0, 768.0)).unwrap();
//! assert_eq!(p.rect, Rect::new(40.0, 72.0, 200.0, 372.0));
//! ```
//!
//! Coordinates are floating point and never rounded here; round for presentation only.
//!
//! This crate is `no_std`.

#![no_std]

mod place;
mod surface;
mod types;

pub use place::place;
pub use surface::{AnchoredSurface, DirtyInputs};
pub use types::{Align, AlignX, AlignY, Constraints, Placement, SizeSpec, Viewport};
