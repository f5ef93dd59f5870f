// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Viewport clipping: Cohen-Sutherland for line segments,
//! Sutherland-Hodgman for polygons, and a path clipper on top.

use exactsvg_types::{Decimal, DecimalContext, DecimalExt, PathSegment, ViewBox};

use super::bezier::CURVE_SAMPLES;
use super::walk::{self, Curve};
use super::{point_in_viewbox, Point};
use crate::Error;

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

struct ClipRect {
    min_x: Decimal,
    min_y: Decimal,
    max_x: Decimal,
    max_y: Decimal,
}

impl ClipRect {
    fn from_viewbox(vb: &ViewBox) -> Self {
        ClipRect {
            min_x: vb.x.clone(),
            min_y: vb.y.clone(),
            max_x: &vb.x + &vb.w,
            max_y: &vb.y + &vb.h,
        }
    }

    fn outcode(&self, p: &Point) -> u8 {
        let mut code = INSIDE;
        if p.x < self.min_x {
            code |= LEFT;
        } else if p.x > self.max_x {
            code |= RIGHT;
        }
        if p.y < self.min_y {
            code |= BOTTOM;
        } else if p.y > self.max_y {
            code |= TOP;
        }
        code
    }
}

/// Clips a line segment against a viewbox with the Cohen-Sutherland
/// outcode algorithm.
///
/// Returns `None` when the segment lies fully outside. Horizontal and
/// vertical segments are clipped along a single axis, which avoids the
/// division by a vanishing delta.
///
/// # Errors
///
/// Only on an internal division failure, which a finite input cannot
/// trigger.
pub fn clip_line_to_viewbox(
    p1: &Point,
    p2: &Point,
    vb: &ViewBox,
    ctx: &DecimalContext,
) -> Result<Option<(Point, Point)>, Error> {
    let rect = ClipRect::from_viewbox(vb);
    let eps = ctx.epsilon();

    let dx = &p2.x - &p1.x;
    let dy = &p2.y - &p1.y;

    // Degenerate slopes clip along one axis only.
    if dy.is_near_zero(&eps) {
        if p1.y < rect.min_y || p1.y > rect.max_y {
            return Ok(None);
        }
        return Ok(clamp_span(p1, p2, &rect.min_x, &rect.max_x, true));
    }
    if dx.is_near_zero(&eps) {
        if p1.x < rect.min_x || p1.x > rect.max_x {
            return Ok(None);
        }
        return Ok(clamp_span(p1, p2, &rect.min_y, &rect.max_y, false));
    }

    let mut a = p1.clone();
    let mut b = p2.clone();
    let mut code_a = rect.outcode(&a);
    let mut code_b = rect.outcode(&b);

    loop {
        if code_a | code_b == INSIDE {
            // Both endpoints inside.
            return Ok(Some((a, b)));
        }
        if code_a & code_b != INSIDE {
            // Both endpoints share an outside half-plane.
            return Ok(None);
        }

        // Pick an outside endpoint and pull it onto the boundary.
        let code = if code_a != INSIDE { code_a } else { code_b };

        let p = if code & TOP != 0 {
            intersect_horizontal(p1, &dx, &dy, &rect.max_y, ctx)?
        } else if code & BOTTOM != 0 {
            intersect_horizontal(p1, &dx, &dy, &rect.min_y, ctx)?
        } else if code & RIGHT != 0 {
            intersect_vertical(p1, &dx, &dy, &rect.max_x, ctx)?
        } else {
            intersect_vertical(p1, &dx, &dy, &rect.min_x, ctx)?
        };

        if code == code_a {
            a = p;
            code_a = rect.outcode(&a);
        } else {
            b = p;
            code_b = rect.outcode(&b);
        }
    }
}

/// Intersection with a horizontal boundary `y = bound`.
fn intersect_horizontal(
    p1: &Point,
    dx: &Decimal,
    dy: &Decimal,
    bound: &Decimal,
    ctx: &DecimalContext,
) -> Result<Point, Error> {
    let t = ctx.div(&(bound - &p1.y), dy)?;
    Ok(Point::new(&p1.x + dx * &t, bound.clone()))
}

/// Intersection with a vertical boundary `x = bound`.
fn intersect_vertical(
    p1: &Point,
    dx: &Decimal,
    dy: &Decimal,
    bound: &Decimal,
    ctx: &DecimalContext,
) -> Result<Point, Error> {
    let t = ctx.div(&(bound - &p1.x), dx)?;
    Ok(Point::new(bound.clone(), &p1.y + dy * &t))
}

/// Clamps an axis-parallel segment to `[min, max]` along its axis.
fn clamp_span(
    p1: &Point,
    p2: &Point,
    min: &Decimal,
    max: &Decimal,
    horizontal: bool,
) -> Option<(Point, Point)> {
    let (a, b) = if horizontal {
        (&p1.x, &p2.x)
    } else {
        (&p1.y, &p2.y)
    };

    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if hi < min || lo > max {
        return None;
    }

    let clamped_a = a.clone().max(min.clone()).min(max.clone());
    let clamped_b = b.clone().max(min.clone()).min(max.clone());

    if horizontal {
        Some((
            Point::new(clamped_a, p1.y.clone()),
            Point::new(clamped_b, p1.y.clone()),
        ))
    } else {
        Some((
            Point::new(p1.x.clone(), clamped_a),
            Point::new(p1.x.clone(), clamped_b),
        ))
    }
}

#[derive(Clone, Copy)]
enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

/// Clips a polygon against a viewbox with the Sutherland-Hodgman
/// algorithm.
///
/// The polygon is clipped against each of the four viewbox edges in
/// succession. An empty result means the polygon lies fully outside.
///
/// # Errors
///
/// - `InternalInvariant` when an output point escapes the inflated
///   viewbox, which would mean the clipper itself misbehaved.
pub fn clip_polygon_to_viewbox(
    points: &[Point],
    vb: &ViewBox,
    ctx: &DecimalContext,
) -> Result<Vec<Point>, Error> {
    let rect = ClipRect::from_viewbox(vb);

    let mut output = points.to_vec();
    for edge in [Edge::Left, Edge::Right, Edge::Bottom, Edge::Top] {
        if output.is_empty() {
            break;
        }
        output = clip_against_edge(&output, edge, &rect, ctx)?;
    }

    let tolerance = ctx.tolerance();
    for p in &output {
        if !point_in_viewbox(p, vb, &tolerance) {
            return Err(Error::InternalInvariant(format!(
                "clipped point {} escaped the viewbox",
                p
            )));
        }
    }

    Ok(output)
}

fn edge_inside(p: &Point, edge: Edge, rect: &ClipRect) -> bool {
    match edge {
        Edge::Left => p.x >= rect.min_x,
        Edge::Right => p.x <= rect.max_x,
        Edge::Bottom => p.y >= rect.min_y,
        Edge::Top => p.y <= rect.max_y,
    }
}

fn edge_intersection(
    s: &Point,
    e: &Point,
    edge: Edge,
    rect: &ClipRect,
    ctx: &DecimalContext,
) -> Result<Point, Error> {
    let dx = &e.x - &s.x;
    let dy = &e.y - &s.y;

    match edge {
        Edge::Left | Edge::Right => {
            let bound = match edge {
                Edge::Left => &rect.min_x,
                _ => &rect.max_x,
            };
            // The caller only asks when s and e straddle the boundary,
            // so dx cannot vanish.
            let t = ctx.div(&(bound - &s.x), &dx)?;
            Ok(Point::new(bound.clone(), &s.y + &dy * &t))
        }
        Edge::Bottom | Edge::Top => {
            let bound = match edge {
                Edge::Bottom => &rect.min_y,
                _ => &rect.max_y,
            };
            let t = ctx.div(&(bound - &s.y), &dy)?;
            Ok(Point::new(&s.x + &dx * &t, bound.clone()))
        }
    }
}

fn clip_against_edge(
    points: &[Point],
    edge: Edge,
    rect: &ClipRect,
    ctx: &DecimalContext,
) -> Result<Vec<Point>, Error> {
    let mut output = Vec::with_capacity(points.len() + 4);

    for (i, e) in points.iter().enumerate() {
        let s = &points[(i + points.len() - 1) % points.len()];

        let s_inside = edge_inside(s, edge, rect);
        let e_inside = edge_inside(e, edge, rect);

        match (s_inside, e_inside) {
            (true, true) => output.push(e.clone()),
            (true, false) => {
                output.push(edge_intersection(s, e, edge, rect, ctx)?);
            }
            (false, true) => {
                output.push(edge_intersection(s, e, edge, rect, ctx)?);
                output.push(e.clone());
            }
            (false, false) => {}
        }
    }

    Ok(output)
}

/// Clips a path to a viewbox, producing a move/line path that renders
/// identically inside the viewport and contains no outside geometry.
///
/// Curves and arcs are flattened at 20 samples per segment. Closed
/// subpaths clip as polygons (Sutherland-Hodgman); open subpaths clip
/// segment by segment (Cohen-Sutherland), splitting where a segment
/// leaves the viewport.
pub fn clip_path_to_viewbox(
    segments: &[PathSegment],
    vb: &ViewBox,
    ctx: &DecimalContext,
) -> Result<Vec<PathSegment>, Error> {
    let walked = walk::walk(segments, ctx)?;

    // Split into subpaths, remembering which ones are closed.
    let mut subpaths: Vec<(Vec<Point>, bool)> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    fn flush(current: &mut Vec<Point>, closed: bool, subpaths: &mut Vec<(Vec<Point>, bool)>) {
        if current.len() > 1 {
            subpaths.push((std::mem::take(current), closed));
        } else {
            current.clear();
        }
    }

    for (seg, info) in segments.iter().zip(walked.iter()) {
        match seg {
            PathSegment::MoveTo { .. } => {
                flush(&mut current, false, &mut subpaths);
                current.push(info.end.clone());
            }
            PathSegment::ClosePath { .. } => {
                // The polygon clipper treats the point list as cyclic,
                // so the implicit closing line needs no samples.
                flush(&mut current, true, &mut subpaths);
                current.push(info.end.clone());
            }
            _ => match &info.curve {
                Some(Curve::Line { p0, p1 }) => {
                    if current.is_empty() {
                        current.push(p0.clone());
                    }
                    current.push(p1.clone());
                }
                Some(curve) => {
                    let mut points = curve.sample_points(CURVE_SAMPLES, ctx);
                    if current.is_empty() {
                        current.push(points.remove(0));
                    } else {
                        points.remove(0);
                    }
                    current.extend(points);
                }
                None => {}
            },
        }
    }
    flush(&mut current, false, &mut subpaths);

    // Clip each subpath with the algorithm fitting its class.
    let mut out: Vec<PathSegment> = Vec::new();

    for (points, closed) in subpaths {
        if closed {
            let clipped = clip_polygon_to_viewbox(&points, vb, ctx)?;
            if clipped.len() >= 3 {
                emit_polygon(&clipped, &mut out);
            }
        } else {
            emit_clipped_polyline(&points, vb, ctx, &mut out)?;
        }
    }

    Ok(out)
}

fn emit_polygon(points: &[Point], out: &mut Vec<PathSegment>) {
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        out.push(PathSegment::MoveTo {
            abs: true,
            x: first.x.clone(),
            y: first.y.clone(),
        });
        for p in iter {
            out.push(PathSegment::LineTo {
                abs: true,
                x: p.x.clone(),
                y: p.y.clone(),
            });
        }
        out.push(PathSegment::ClosePath { abs: true });
    }
}

fn emit_clipped_polyline(
    points: &[Point],
    vb: &ViewBox,
    ctx: &DecimalContext,
    out: &mut Vec<PathSegment>,
) -> Result<(), Error> {
    let mut last_emitted: Option<Point> = None;

    for pair in points.windows(2) {
        let clipped = clip_line_to_viewbox(&pair[0], &pair[1], vb, ctx)?;

        match clipped {
            Some((a, b)) => {
                let continues = last_emitted
                    .as_ref()
                    .map_or(false, |last| last.fuzzy_eq(&a, &ctx.tolerance()));

                if !continues {
                    out.push(PathSegment::MoveTo {
                        abs: true,
                        x: a.x.clone(),
                        y: a.y.clone(),
                    });
                }
                if !a.fuzzy_eq(&b, &ctx.epsilon()) {
                    out.push(PathSegment::LineTo {
                        abs: true,
                        x: b.x.clone(),
                        y: b.y.clone(),
                    });
                }
                last_emitted = Some(b);
            }
            None => {
                last_emitted = None;
            }
        }
    }

    Ok(())
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use exactsvg_types::parse_path;

    fn p(x: i64, y: i64) -> Point {
        Point::new(Decimal::from(x), Decimal::from(y))
    }

    fn vb(x: i64, y: i64, w: i64, h: i64) -> ViewBox {
        ViewBox::new(
            Decimal::from(x), Decimal::from(y), Decimal::from(w), Decimal::from(h),
        )
        .unwrap()
    }

    #[test]
    fn horizontal_segment() {
        let ctx = DecimalContext::default();
        let (a, b) = clip_line_to_viewbox(&p(-10, 50), &p(110, 50), &vb(0, 0, 100, 100), &ctx)
            .unwrap()
            .unwrap();
        assert_eq!(a, p(0, 50));
        assert_eq!(b, p(100, 50));
    }

    #[test]
    fn vertical_segment() {
        let ctx = DecimalContext::default();
        let (a, b) = clip_line_to_viewbox(&p(50, -10), &p(50, 110), &vb(0, 0, 100, 100), &ctx)
            .unwrap()
            .unwrap();
        assert_eq!(a, p(50, 0));
        assert_eq!(b, p(50, 100));
    }

    #[test]
    fn horizontal_outside_band() {
        let ctx = DecimalContext::default();
        assert!(clip_line_to_viewbox(&p(-10, 150), &p(110, 150), &vb(0, 0, 100, 100), &ctx)
            .unwrap()
            .is_none());
    }

    #[test]
    fn diagonal_segment() {
        let ctx = DecimalContext::default();
        let (a, b) = clip_line_to_viewbox(&p(-50, -50), &p(150, 150), &vb(0, 0, 100, 100), &ctx)
            .unwrap()
            .unwrap();
        assert_eq!(a, p(0, 0));
        assert_eq!(b, p(100, 100));
    }

    #[test]
    fn fully_inside() {
        let ctx = DecimalContext::default();
        let (a, b) = clip_line_to_viewbox(&p(10, 10), &p(20, 30), &vb(0, 0, 100, 100), &ctx)
            .unwrap()
            .unwrap();
        assert_eq!(a, p(10, 10));
        assert_eq!(b, p(20, 30));
    }

    #[test]
    fn fully_outside_reject() {
        let ctx = DecimalContext::default();
        assert!(clip_line_to_viewbox(&p(-50, -10), &p(-10, -50), &vb(0, 0, 100, 100), &ctx)
            .unwrap()
            .is_none());
    }

    #[test]
    fn polygon_square_overlap() {
        let ctx = DecimalContext::default();
        // A square poking out of the right edge.
        let polygon = [p(50, 20), p(150, 20), p(150, 80), p(50, 80)];
        let clipped = clip_polygon_to_viewbox(&polygon, &vb(0, 0, 100, 100), &ctx).unwrap();

        assert!(!clipped.is_empty());
        let tolerance = ctx.tolerance();
        for point in &clipped {
            assert!(point_in_viewbox(point, &vb(0, 0, 100, 100), &tolerance));
        }
        assert!(clipped.contains(&p(100, 20)));
        assert!(clipped.contains(&p(100, 80)));
    }

    #[test]
    fn polygon_fully_outside() {
        let ctx = DecimalContext::default();
        let polygon = [p(200, 200), p(300, 200), p(300, 300)];
        let clipped = clip_polygon_to_viewbox(&polygon, &vb(0, 0, 100, 100), &ctx).unwrap();
        assert!(clipped.is_empty());
    }

    #[test]
    fn path_clipping_produces_inside_points() {
        let ctx = DecimalContext::default();
        let segments = parse_path("M-50 50 L150 50").unwrap();
        let clipped = clip_path_to_viewbox(&segments, &vb(0, 0, 100, 100), &ctx).unwrap();

        assert_eq!(clipped.len(), 2);
        assert_eq!(
            clipped[0],
            PathSegment::MoveTo { abs: true, x: Decimal::from(0), y: Decimal::from(50) }
        );
        assert_eq!(
            clipped[1],
            PathSegment::LineTo { abs: true, x: Decimal::from(100), y: Decimal::from(50) }
        );
    }
}
