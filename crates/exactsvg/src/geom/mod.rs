// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The geometric engine: exact bounding boxes, Bezier and arc analysis,
//! polygon intersection and viewport clipping.

use exactsvg_types::{Decimal, DecimalContext, DecimalExt, ViewBox};

mod arc;
mod bbox;
mod bezier;
mod clip;
mod gjk;
pub(crate) mod walk;

pub use arc::{calculate_sagitta, is_arc_straight};
pub use bbox::{path_bbox, shape_bbox};
pub use bezier::{
    cubic_bezier_to_line, is_cubic_bezier_straight, is_quadratic_bezier_straight,
    lower_cubic_to_quadratic,
};
pub use clip::{clip_line_to_viewbox, clip_path_to_viewbox, clip_polygon_to_viewbox};
pub use gjk::polygons_intersect;

/// A 2D point.
///
/// Coordinates are immutable decimal values.
#[derive(Clone, PartialEq, Debug)]
pub struct Point {
    /// Position along the X-axis.
    pub x: Decimal,
    /// Position along the Y-axis.
    pub y: Decimal,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub fn new(x: Decimal, y: Decimal) -> Self {
        Point { x, y }
    }

    /// Returns `true` when both coordinates match within `tolerance`.
    pub fn fuzzy_eq(&self, other: &Point, tolerance: &Decimal) -> bool {
        self.x.fuzzy_eq(&other.x, tolerance) && self.y.fuzzy_eq(&other.y, tolerance)
    }

    /// The squared distance to another point.
    ///
    /// Exact, so distance comparisons don't need a square root.
    pub fn distance_squared(&self, other: &Point) -> Decimal {
        let dx = &self.x - &other.x;
        let dy = &self.y - &other.y;
        &dx * &dx + &dy * &dy
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Point({} {})", self.x, self.y)
    }
}

/// An axis-aligned bounding box.
#[derive(Clone, PartialEq, Debug)]
pub struct BBox {
    /// The left edge.
    pub min_x: Decimal,
    /// The top edge.
    pub min_y: Decimal,
    /// The right edge.
    pub max_x: Decimal,
    /// The bottom edge.
    pub max_y: Decimal,

    /// Set when every sampled source point lies inside the box
    /// inflated by the default tolerance.
    pub verified: bool,
}

impl BBox {
    /// Builds a box from a non-empty point sequence.
    pub fn from_points<'a, I>(points: I) -> Option<BBox>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;

        let mut bbox = BBox {
            min_x: first.x.clone(),
            min_y: first.y.clone(),
            max_x: first.x.clone(),
            max_y: first.y.clone(),
            verified: false,
        };

        for p in iter {
            bbox.expand(p);
        }

        Some(bbox)
    }

    pub(crate) fn expand(&mut self, p: &Point) {
        if p.x < self.min_x {
            self.min_x = p.x.clone();
        }
        if p.x > self.max_x {
            self.max_x = p.x.clone();
        }
        if p.y < self.min_y {
            self.min_y = p.y.clone();
        }
        if p.y > self.max_y {
            self.max_y = p.y.clone();
        }
    }

    /// The box width. Never negative.
    #[inline]
    pub fn width(&self) -> Decimal {
        &self.max_x - &self.min_x
    }

    /// The box height. Never negative.
    #[inline]
    pub fn height(&self) -> Decimal {
        &self.max_y - &self.min_y
    }

    /// Checks that a point lies inside the box inflated by `tolerance`.
    pub fn contains_point(&self, p: &Point, tolerance: &Decimal) -> bool {
        p.x >= &self.min_x - tolerance
            && p.x <= &self.max_x + tolerance
            && p.y >= &self.min_y - tolerance
            && p.y <= &self.max_y + tolerance
    }

    /// Converts the box into a counter-clockwise quad.
    pub fn to_polygon(&self) -> Vec<Point> {
        vec![
            Point::new(self.min_x.clone(), self.min_y.clone()),
            Point::new(self.max_x.clone(), self.min_y.clone()),
            Point::new(self.max_x.clone(), self.max_y.clone()),
            Point::new(self.min_x.clone(), self.max_y.clone()),
        ]
    }

    /// Checks whether the box overlaps a viewbox.
    ///
    /// Runs the GJK test over both rectangles; edge contact counts
    /// as an overlap.
    pub fn intersects_viewbox(&self, vb: &ViewBox) -> bool {
        gjk::polygons_intersect(&self.to_polygon(), &viewbox_polygon(vb))
    }
}

/// Converts a viewbox into a counter-clockwise quad.
pub(crate) fn viewbox_polygon(vb: &ViewBox) -> Vec<Point> {
    let max_x = &vb.x + &vb.w;
    let max_y = &vb.y + &vb.h;
    vec![
        Point::new(vb.x.clone(), vb.y.clone()),
        Point::new(max_x.clone(), vb.y.clone()),
        Point::new(max_x, max_y.clone()),
        Point::new(vb.x.clone(), max_y),
    ]
}

/// Checks that a point lies inside a viewbox inflated by `tolerance`.
pub fn point_in_viewbox(p: &Point, vb: &ViewBox, tolerance: &Decimal) -> bool {
    p.x >= &vb.x - tolerance
        && p.x <= &(&vb.x + &vb.w) + tolerance
        && p.y >= &vb.y - tolerance
        && p.y <= &(&vb.y + &vb.h) + tolerance
}

/// Checks that two boxes overlap, symmetrically.
pub fn bbox_intersects(a: &BBox, b: &BBox) -> bool {
    gjk::polygons_intersect(&a.to_polygon(), &b.to_polygon())
}

/// Returns `i / n` as a curve parameter in `[0, 1]`.
pub(crate) fn sample_t(i: u32, n: u32, ctx: &DecimalContext) -> Decimal {
    // `n` is a small non-zero constant; the division cannot fail.
    ctx.div(&Decimal::from(i), &Decimal::from(n)).unwrap()
}
