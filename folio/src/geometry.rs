// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer geometry in view coordinates.

#[cfg(feature = "libm")]
#[allow(unused_imports, reason = "not needed when std provides the float methods")]
use core_maths::CoreFloat;

/// A point in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate; grows downwards.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by `dx` and `dy`.
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// A width and height in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Size {
    /// A size with no area.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle with its origin at the top left corner.
///
/// Width and height are never negative for bounds produced by this crate: the
/// intersection of disjoint bounds is empty rather than inverted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Bounds {
    /// Empty bounds at the origin.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// Create bounds from an origin and a size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds of the given size at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// The top left corner.
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The width and height.
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The exclusive right edge.
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// The exclusive bottom edge.
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Returns `true` if the bounds enclose no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns these bounds moved by `dx` and `dy`.
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Returns `true` if the point lies within the bounds.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    /// Returns `true` if the two bounds share at least one pixel.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// The overlapping region of the two bounds; empty if they are disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Self::new(x, y, (right - x).max(0), (bottom - y).max(0))
    }

    /// The smallest bounds enclosing both; an empty operand is ignored.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }
}

/// Space reserved around content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Insets {
    /// Space above.
    pub top: i32,
    /// Space to the left.
    pub left: i32,
    /// Space below.
    pub bottom: i32,
    /// Space to the right.
    pub right: i32,
}

impl Insets {
    /// No insets.
    pub const ZERO: Self = Self::uniform(0);

    /// Create insets from the top, left, bottom and right values.
    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The same inset on every edge.
    pub const fn uniform(inset: i32) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    /// Combined left and right insets.
    pub const fn width(&self) -> i32 {
        self.left + self.right
    }

    /// Combined top and bottom insets.
    pub const fn height(&self) -> i32 {
        self.top + self.bottom
    }

    /// Top left corner of the inset content.
    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

/// Round a logical extent up to whole pixels.
#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel extents are far below the i32 range; the cast saturates otherwise"
)]
pub(crate) fn ceil_px(value: f32) -> i32 {
    value.ceil() as i32
}

/// Round a logical position down to whole pixels.
#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel positions are far below the i32 range; the cast saturates otherwise"
)]
pub(crate) fn floor_px(value: f32) -> i32 {
    value.floor() as i32
}

/// Round a logical position to the nearest pixel.
#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel positions are far below the i32 range; the cast saturates otherwise"
)]
pub(crate) fn round_px(value: f32) -> i32 {
    value.round() as i32
}
