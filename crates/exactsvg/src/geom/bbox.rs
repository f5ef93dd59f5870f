// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bounding boxes for paths and primitive shapes.

use exactsvg_types::{Decimal, DecimalContext, PathSegment};

use super::bezier::CURVE_SAMPLES;
use super::walk::{self, Curve};
use super::{sample_t, BBox, Point};
use crate::shapes::Shape;
use crate::Error;

/// The number of perimeter samples used to verify circle and ellipse
/// boxes.
const PERIMETER_SAMPLES: u32 = 16;

/// Calculates the exact bounding box of a path.
///
/// Lines contribute endpoints; Bezier segments contribute 21 Bernstein
/// samples; arcs contribute their endpoints plus the axis-aligned
/// extrema that fall inside the swept range, so the box is conservative
/// even when the arc bulges past its chord.
///
/// Returns `None` for an empty path.
///
/// # Errors
///
/// Propagates numeric failures from degenerate arc parameters.
pub fn path_bbox(
    segments: &[PathSegment],
    ctx: &DecimalContext,
) -> Result<Option<BBox>, Error> {
    if segments.is_empty() {
        return Ok(None);
    }

    let walked = walk::walk(segments, ctx)?;
    let mut candidates: Vec<Point> = Vec::new();

    for seg in &walked {
        match &seg.curve {
            None => candidates.push(seg.end.clone()),
            Some(Curve::Line { p0, p1 }) => {
                candidates.push(p0.clone());
                candidates.push(p1.clone());
            }
            Some(Curve::Arc { geometry, p0, p1 }) => {
                candidates.push(p0.clone());
                candidates.push(p1.clone());
                for theta in geometry.extrema_angles(ctx) {
                    candidates.push(geometry.point_at_angle(&theta, ctx));
                }
                // Interior samples only feed verification; the extrema
                // already bound the box.
                for i in 1..CURVE_SAMPLES {
                    candidates.push(geometry.point_at(&sample_t(i, CURVE_SAMPLES, ctx), ctx));
                }
            }
            Some(curve) => {
                candidates.extend(curve.sample_points(CURVE_SAMPLES, ctx));
            }
        }
    }

    Ok(finish_bbox(candidates, ctx))
}

/// Calculates the closed-form bounding box of a shape.
///
/// Circles and ellipses are verified against 16 perimeter samples.
///
/// Returns `None` for an empty point list.
pub fn shape_bbox(shape: &Shape, ctx: &DecimalContext) -> Result<Option<BBox>, Error> {
    let bbox = match shape {
        Shape::Rect {
            x, y, width, height, ..
        } => {
            let corners = [
                Point::new(x.clone(), y.clone()),
                Point::new(x + width, y + height),
            ];
            finish_bbox(corners.to_vec(), ctx)
        }
        Shape::Circle { cx, cy, r } => ellipse_bbox(cx, cy, r, r, ctx),
        Shape::Ellipse { cx, cy, rx, ry } => ellipse_bbox(cx, cy, rx, ry, ctx),
        Shape::Line { x1, y1, x2, y2 } => {
            let ends = [
                Point::new(x1.clone(), y1.clone()),
                Point::new(x2.clone(), y2.clone()),
            ];
            finish_bbox(ends.to_vec(), ctx)
        }
        Shape::Polygon { points } | Shape::Polyline { points } => {
            let points: Vec<Point> = points
                .iter()
                .map(|(x, y)| Point::new(x.clone(), y.clone()))
                .collect();
            finish_bbox(points, ctx)
        }
    };

    Ok(bbox)
}

fn ellipse_bbox(
    cx: &Decimal,
    cy: &Decimal,
    rx: &Decimal,
    ry: &Decimal,
    ctx: &DecimalContext,
) -> Option<BBox> {
    let rx = rx.abs();
    let ry = ry.abs();

    let mut bbox = BBox {
        min_x: cx - &rx,
        min_y: cy - &ry,
        max_x: cx + &rx,
        max_y: cy + &ry,
        verified: false,
    };

    // Perimeter verification samples.
    let two_pi = ctx.two_pi();
    let mut verified = true;
    let tolerance = ctx.tolerance();
    for i in 0..PERIMETER_SAMPLES {
        let theta = sample_t(i, PERIMETER_SAMPLES, ctx) * &two_pi;
        let p = Point::new(
            cx + &rx * ctx.cos(&theta),
            cy + &ry * ctx.sin(&theta),
        );
        if !bbox.contains_point(&p, &tolerance) {
            verified = false;
        }
    }

    bbox.verified = verified;
    Some(bbox)
}

fn finish_bbox(candidates: Vec<Point>, ctx: &DecimalContext) -> Option<BBox> {
    let mut bbox = BBox::from_points(candidates.iter())?;

    // Independent containment re-check of every candidate.
    let tolerance = ctx.tolerance();
    bbox.verified = candidates
        .iter()
        .all(|p| bbox.contains_point(p, &tolerance));

    Some(bbox)
}
