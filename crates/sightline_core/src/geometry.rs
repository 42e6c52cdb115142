//! Geometry primitives for viewport math
//!
//! Everything the derivation layer needs to reason about element positions:
//! points, sizes, and axis-aligned rectangles with containment and
//! intersection-area queries. Coordinates follow screen convention
//! (y grows downward, origin at the viewport's top-left).

/// A 2D point in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 2D size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Area, clamped to zero for degenerate sizes
    pub fn area(&self) -> f32 {
        (self.width.max(0.0)) * (self.height.max(0.0))
    }
}

/// An axis-aligned rectangle in viewport coordinates
///
/// `y` is the distance from the viewport top; a rect scrolled above the
/// viewport has a negative `y`. Rects move on every scroll, so they are
/// always re-read at sample time, never cached across events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Construct from an origin point and a size
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Area, zero for degenerate rects
    pub fn area(&self) -> f32 {
        self.size().area()
    }

    /// Whether the point lies inside this rect
    ///
    /// Edges are inclusive: an anchor sitting exactly on a section border
    /// counts as inside, matching hit-testing convention.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// The overlapping region of two rects, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Fraction of this rect's area that overlaps `other`, in [0, 1]
    ///
    /// A zero-area rect reports 0 rather than dividing by zero.
    pub fn visible_fraction(&self, other: &Rect) -> f32 {
        let own = self.area();
        if own <= 0.0 {
            return 0.0;
        }
        match self.intersection(other) {
            Some(overlap) => (overlap.area() / own).clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}
