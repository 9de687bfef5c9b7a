// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for anchored placement: size specs, alignments, constraints, and results.

use kurbo::{Rect, Size, Vec2};

/// A requested dimension.
///
/// Used for the surface size as well as its minimum and maximum.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum SizeSpec {
    /// An explicit length in pixels.
    Px(f64),
    /// Follow the anchor.
    ///
    /// As a size this is `max(anchor, natural)`; as a minimum or maximum it is the anchor's length.
    Fit,
    /// No opinion.
    ///
    /// As a size this is the surface's natural length; as a maximum it is unbounded; as a
    /// minimum it is zero.
    #[default]
    Free,
}

impl SizeSpec {
    /// Resolve as a surface length.
    pub fn resolve_size(self, anchor: f64, natural: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Fit => anchor.max(natural),
            Self::Free => natural,
        }
    }

    /// Resolve as an upper bound.
    pub fn resolve_max(self, anchor: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Fit => anchor,
            Self::Free => f64::INFINITY,
        }
    }

    /// Resolve as a lower bound.
    pub fn resolve_min(self, anchor: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Fit => anchor,
            Self::Free => 0.0,
        }
    }
}

/// Axis-neutral alignment of a surface relative to its anchor.
///
/// `Before` is left/top, `After` is right/bottom.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Align {
    /// Fully before the anchor (outer placement).
    Before,
    /// Centered on the anchor.
    Center,
    /// Fully after the anchor (outer placement).
    After,
    /// Leading edges flush (inner placement).
    BeforeInner,
    /// Trailing edges flush (inner placement).
    AfterInner,
}

impl Align {
    /// Whether this alignment expresses a side that can be flipped.
    ///
    /// Only outer placements are directional; centered and inner placements never flip.
    pub const fn is_directional(self) -> bool {
        matches!(self, Self::Before | Self::After)
    }

    /// The opposite outer side. Non-directional alignments are returned unchanged.
    pub const fn flip(self) -> Self {
        match self {
            Self::Before => Self::After,
            Self::After => Self::Before,
            other => other,
        }
    }
}

/// Horizontal preference.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum AlignX {
    /// Left of the anchor.
    Left,
    /// Horizontally centered on the anchor.
    Center,
    /// Right of the anchor.
    Right,
    /// Left edges flush.
    #[default]
    LeftInner,
    /// Right edges flush.
    RightInner,
}

/// Vertical preference.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum AlignY {
    /// Above the anchor.
    Top,
    /// Vertically centered on the anchor.
    Center,
    /// Below the anchor.
    #[default]
    Bottom,
    /// Top edges flush.
    TopInner,
    /// Bottom edges flush.
    BottomInner,
}

impl From<AlignX> for Align {
    fn from(a: AlignX) -> Self {
        match a {
            AlignX::Left => Self::Before,
            AlignX::Center => Self::Center,
            AlignX::Right => Self::After,
            AlignX::LeftInner => Self::BeforeInner,
            AlignX::RightInner => Self::AfterInner,
        }
    }
}

impl From<AlignY> for Align {
    fn from(a: AlignY) -> Self {
        match a {
            AlignY::Top => Self::Before,
            AlignY::Center => Self::Center,
            AlignY::Bottom => Self::After,
            AlignY::TopInner => Self::BeforeInner,
            AlignY::BottomInner => Self::AfterInner,
        }
    }
}

impl From<Align> for AlignX {
    fn from(a: Align) -> Self {
        match a {
            Align::Before => Self::Left,
            Align::Center => Self::Center,
            Align::After => Self::Right,
            Align::BeforeInner => Self::LeftInner,
            Align::AfterInner => Self::RightInner,
        }
    }
}

impl From<Align> for AlignY {
    fn from(a: Align) -> Self {
        match a {
            Align::Before => Self::Top,
            Align::Center => Self::Center,
            Align::After => Self::Bottom,
            Align::BeforeInner => Self::TopInner,
            Align::AfterInner => Self::BottomInner,
        }
    }
}

/// The visible page area and its scroll offset.
///
/// Anchor rects are given in viewport space; placements are returned in root space,
/// which is viewport space translated by `scroll`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Visible size.
    pub size: Size,
    /// Page scroll offset.
    pub scroll: Vec2,
}

impl Viewport {
    /// A viewport with no scroll offset.
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            scroll: Vec2::ZERO,
        }
    }

    /// Set the scroll offset.
    #[must_use]
    pub fn with_scroll(mut self, scroll: Vec2) -> Self {
        self.scroll = scroll;
        self
    }
}

/// Placement constraints for an anchored surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Constraints {
    /// Horizontal preference.
    pub x: AlignX,
    /// Vertical preference.
    pub y: AlignY,
    /// Gap between anchor and surface along a directional axis.
    pub distance: f64,
    /// Minimum clearance from the viewport edges.
    pub edge_margin: f64,
    /// Allow the surface to cover the anchor's own footprint.
    pub overlap: bool,
    /// Skip the final shrink-to-fit when the surface is larger than the viewport.
    pub allow_overflow: bool,
    /// Requested width.
    pub width: SizeSpec,
    /// Requested height.
    pub height: SizeSpec,
    /// Minimum width.
    pub min_width: SizeSpec,
    /// Minimum height.
    pub min_height: SizeSpec,
    /// Maximum width.
    pub max_width: SizeSpec,
    /// Maximum height.
    pub max_height: SizeSpec,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            x: AlignX::default(),
            y: AlignY::default(),
            distance: 0.0,
            edge_margin: 0.0,
            overlap: false,
            allow_overflow: false,
            width: SizeSpec::Free,
            height: SizeSpec::Free,
            min_width: SizeSpec::Free,
            min_height: SizeSpec::Free,
            max_width: SizeSpec::Free,
            max_height: SizeSpec::Free,
        }
    }
}

/// The outcome of a placement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Resolved rectangle in root space.
    pub rect: Rect,
    /// Horizontal side actually used.
    pub x: AlignX,
    /// Vertical side actually used.
    pub y: AlignY,
}

impl Placement {
    /// Whether the horizontal side differs from the one requested.
    pub fn flipped_x(&self, constraints: &Constraints) -> bool {
        self.x != constraints.x
    }

    /// Whether the vertical side differs from the one requested.
    pub fn flipped_y(&self, constraints: &Constraints) -> bool {
        self.y != constraints.y
    }
}
