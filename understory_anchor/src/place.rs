// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The placement solver.
//!
//! ## Overview
//!
//! [`place`] is a pure function. Each axis is solved independently:
//!
//! 1. Resolve the requested length against the anchor and the natural length, then apply
//!    the minimum and maximum.
//! 2. Measure the free space before and after the anchor, net of the edge margin. With
//!    `overlap`, the anchor's own extent counts as free.
//! 3. For outer (directional) alignments, if the length does not fit on the preferred side,
//!    flip only when the opposite side has strictly more room. Either way, cap the length
//!    to the room on the side finally chosen.
//! 4. Position the surface from the alignment and translate by the page scroll.
//! 5. Clamp into the viewport by translating first; if it still overflows and
//!    `allow_overflow` is off, shrink.
//!
//! No rounding is performed.

use kurbo::Rect;

use crate::types::{Align, Constraints, Placement, SizeSpec, Viewport};

/// Compute a placement for a surface anchored to `anchor`.
///
/// `anchor` is the reference element's bounding box in viewport space. `natural` is the
/// surface's unconstrained measured box; only its size is consulted.
///
/// Returns `None` when either box is unavailable (not yet laid out). Callers should keep
/// the surface hidden until both are known.
///
/// ```
/// use kurbo::Rect;
/// use understory_anchor::{AlignY, Constraints, Viewport, place};
///
/// let constraints = Constraints {
///     y: AlignY::Bottom,
///     distance: 10.0,
///     edge_margin: 20.0,
///     ..Default::default()
/// };
/// let anchor = Rect::new(100.0, 500.0, 200.0, 540.0);
/// let natural = Rect::new(0.0, 0.0, 150.0, 200.0);
/// let p = place(Some(anchor), Some(natural), &constraints, &Viewport::new(800.0, 600.0)).unwrap();
///
/// // Not enough room below, plenty above: flipped.
/// assert_eq!(p.y, AlignY::Top);
/// assert_eq!(p.rect.y0, 290.0);
/// ```
pub fn place(
    anchor: Option<Rect>,
    natural: Option<Rect>,
    constraints: &Constraints,
    viewport: &Viewport,
) -> Option<Placement> {
    let anchor = anchor?;
    let natural = natural?;

    let x = solve_axis(&Axis {
        anchor_start: anchor.x0,
        anchor_end: anchor.x1,
        natural: natural.width(),
        size: constraints.width,
        min: constraints.min_width,
        max: constraints.max_width,
        align: constraints.x.into(),
        viewport: viewport.size.width,
        scroll: viewport.scroll.x,
        constraints,
    });
    let y = solve_axis(&Axis {
        anchor_start: anchor.y0,
        anchor_end: anchor.y1,
        natural: natural.height(),
        size: constraints.height,
        min: constraints.min_height,
        max: constraints.max_height,
        align: constraints.y.into(),
        viewport: viewport.size.height,
        scroll: viewport.scroll.y,
        constraints,
    });

    Some(Placement {
        rect: Rect::new(x.start, y.start, x.start + x.len, y.start + y.len),
        x: x.align.into(),
        y: y.align.into(),
    })
}

struct Axis<'a> {
    anchor_start: f64,
    anchor_end: f64,
    natural: f64,
    size: SizeSpec,
    min: SizeSpec,
    max: SizeSpec,
    align: Align,
    viewport: f64,
    scroll: f64,
    constraints: &'a Constraints,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Solved {
    start: f64,
    len: f64,
    align: Align,
}

/// Free space before and after the anchor along one axis, floored at zero.
fn free_space(axis: &Axis<'_>) -> (f64, f64) {
    let margin = axis.constraints.edge_margin;
    let (before_edge, after_edge) = if axis.constraints.overlap {
        (axis.anchor_end, axis.anchor_start)
    } else {
        (axis.anchor_start, axis.anchor_end)
    };
    let before = before_edge - margin;
    let after = axis.viewport - margin - after_edge;
    (before.max(0.0), after.max(0.0))
}

fn solve_axis(axis: &Axis<'_>) -> Solved {
    let c = axis.constraints;
    let anchor_len = axis.anchor_end - axis.anchor_start;
    let min = axis.min.resolve_min(anchor_len);
    let max = axis.max.resolve_max(anchor_len);
    let mut len = axis
        .size
        .resolve_size(anchor_len, axis.natural)
        .min(max)
        .max(min);

    let mut align = axis.align;
    if align.is_directional() {
        let (before, after) = free_space(axis);
        let room = |a: Align| if a == Align::Before { before } else { after };
        if len > room(align) {
            if room(align.flip()) > room(align) {
                align = align.flip();
            }
            // Shrink to the chosen side; an explicit minimum still wins.
            len = len.min(room(align)).max(min);
        }
    }

    let mut start = match align {
        Align::Before => {
            let edge = if c.overlap {
                axis.anchor_end
            } else {
                axis.anchor_start
            };
            edge - len - c.distance
        }
        Align::After => {
            let edge = if c.overlap {
                axis.anchor_start
            } else {
                axis.anchor_end
            };
            edge + c.distance
        }
        Align::BeforeInner => axis.anchor_start,
        Align::AfterInner => axis.anchor_end - len,
        Align::Center => axis.anchor_start + (anchor_len - len) / 2.0,
    } + axis.scroll;

    let lo = c.edge_margin + axis.scroll;
    let hi = axis.viewport - c.edge_margin + axis.scroll;
    if start + len > hi {
        start = hi - len;
    }
    if start < lo {
        start = lo;
    }
    if !c.allow_overflow && start + len > hi {
        len = (hi - start).max(0.0);
    }

    Solved { start, len, align }
}
