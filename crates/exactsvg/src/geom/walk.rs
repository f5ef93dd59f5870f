// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The path walker: resolves a raw segment stream into absolute
//! geometry, maintaining the current point, the start of the subpath
//! and the smooth-curve reflection state.
//!
//! Everything downstream - bounding boxes, clipping, rewrite
//! verification - is driven by this single state machine, so the
//! smooth-command and relative-coordinate rules live in exactly one
//! place.

use exactsvg_types::{Decimal, DecimalContext, PathSegment};
use num_traits::Zero;

use super::arc::{arc_to_center, ArcGeometry};
use super::bezier::{cubic_point, line_point, quadratic_point, CURVE_SAMPLES};
use super::{sample_t, Point};
use crate::Error;

/// Absolute drawable geometry of one segment.
#[derive(Clone, Debug)]
pub(crate) enum Curve {
    Line {
        p0: Point,
        p1: Point,
    },
    Quadratic {
        p0: Point,
        p1: Point,
        p2: Point,
    },
    Cubic {
        p0: Point,
        p1: Point,
        p2: Point,
        p3: Point,
    },
    Arc {
        geometry: ArcGeometry,
        p0: Point,
        p1: Point,
    },
}

impl Curve {
    pub fn point_at(&self, t: &Decimal, ctx: &DecimalContext) -> Point {
        match self {
            Curve::Line { p0, p1 } => line_point(p0, p1, t),
            Curve::Quadratic { p0, p1, p2 } => quadratic_point(p0, p1, p2, t),
            Curve::Cubic { p0, p1, p2, p3 } => cubic_point(p0, p1, p2, p3, t),
            Curve::Arc { geometry, .. } => geometry.point_at(t, ctx),
        }
    }

    /// Inclusive samples at `t = 0, 1/n, …, 1`.
    pub fn sample_points(&self, n: u32, ctx: &DecimalContext) -> Vec<Point> {
        (0..=n).map(|i| self.point_at(&sample_t(i, n, ctx), ctx)).collect()
    }
}

/// One walked segment: the original command plus its resolved geometry.
#[derive(Clone, Debug)]
pub(crate) struct WalkedSegment {
    /// The current point before the segment.
    pub start: Point,
    /// The current point after the segment.
    pub end: Point,
    /// The start of the enclosing subpath.
    pub subpath_start: Point,
    /// Drawable geometry; `None` for MoveTo.
    pub curve: Option<Curve>,
    /// Where a smooth cubic control would land after this segment's
    /// predecessor, i.e. the reflection of the previous C/S second
    /// control around the segment start.
    pub reflected_cubic_control: Option<Point>,
    /// The quadratic analogue, reflecting the previous Q/T control.
    pub reflected_quad_control: Option<Point>,
}

fn origin() -> Point {
    Point::new(Decimal::zero(), Decimal::zero())
}

fn resolve(abs: bool, v: &Decimal, base: &Decimal) -> Decimal {
    if abs {
        v.clone()
    } else {
        v + base
    }
}

fn resolve_point(abs: bool, x: &Decimal, y: &Decimal, base: &Point) -> Point {
    Point::new(resolve(abs, x, &base.x), resolve(abs, y, &base.y))
}

fn reflect(center: &Point, p: &Point) -> Point {
    Point::new(
        Decimal::from(2) * &center.x - &p.x,
        Decimal::from(2) * &center.y - &p.y,
    )
}

/// Walks a segment stream, producing one [`WalkedSegment`] per input
/// segment.
pub(crate) fn walk(
    segments: &[PathSegment],
    ctx: &DecimalContext,
) -> Result<Vec<WalkedSegment>, Error> {
    let mut out = Vec::with_capacity(segments.len());

    let mut cur = origin();
    let mut subpath_start = origin();
    // Second control of the previous C/S, if the previous command was one.
    let mut last_cubic_ctrl: Option<Point> = None;
    // Control of the previous Q/T, if the previous command was one.
    let mut last_quad_ctrl: Option<Point> = None;

    for seg in segments {
        let start = cur.clone();
        let reflected_cubic_control = last_cubic_ctrl.as_ref().map(|c| reflect(&start, c));
        let reflected_quad_control = last_quad_ctrl.as_ref().map(|c| reflect(&start, c));

        let abs = seg.is_absolute();
        let mut new_cubic_ctrl = None;
        let mut new_quad_ctrl = None;

        let (end, curve) = match seg {
            PathSegment::MoveTo { x, y, .. } => {
                let p = resolve_point(abs, x, y, &cur);
                subpath_start = p.clone();
                (p, None)
            }
            PathSegment::LineTo { x, y, .. } => {
                let p = resolve_point(abs, x, y, &cur);
                (
                    p.clone(),
                    Some(Curve::Line {
                        p0: start.clone(),
                        p1: p,
                    }),
                )
            }
            PathSegment::HorizontalLineTo { x, .. } => {
                let p = Point::new(resolve(abs, x, &cur.x), cur.y.clone());
                (
                    p.clone(),
                    Some(Curve::Line {
                        p0: start.clone(),
                        p1: p,
                    }),
                )
            }
            PathSegment::VerticalLineTo { y, .. } => {
                let p = Point::new(cur.x.clone(), resolve(abs, y, &cur.y));
                (
                    p.clone(),
                    Some(Curve::Line {
                        p0: start.clone(),
                        p1: p,
                    }),
                )
            }
            PathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
                ..
            } => {
                let p1 = resolve_point(abs, x1, y1, &cur);
                let p2 = resolve_point(abs, x2, y2, &cur);
                let p3 = resolve_point(abs, x, y, &cur);
                new_cubic_ctrl = Some(p2.clone());
                (
                    p3.clone(),
                    Some(Curve::Cubic {
                        p0: start.clone(),
                        p1,
                        p2,
                        p3,
                    }),
                )
            }
            PathSegment::SmoothCurveTo { x2, y2, x, y, .. } => {
                // 'The first control point is assumed to be the reflection
                // of the second control point on the previous command
                // relative to the current point.'
                let p1 = reflected_cubic_control.clone().unwrap_or_else(|| start.clone());
                let p2 = resolve_point(abs, x2, y2, &cur);
                let p3 = resolve_point(abs, x, y, &cur);
                new_cubic_ctrl = Some(p2.clone());
                (
                    p3.clone(),
                    Some(Curve::Cubic {
                        p0: start.clone(),
                        p1,
                        p2,
                        p3,
                    }),
                )
            }
            PathSegment::Quadratic { x1, y1, x, y, .. } => {
                let p1 = resolve_point(abs, x1, y1, &cur);
                let p2 = resolve_point(abs, x, y, &cur);
                new_quad_ctrl = Some(p1.clone());
                (
                    p2.clone(),
                    Some(Curve::Quadratic {
                        p0: start.clone(),
                        p1,
                        p2,
                    }),
                )
            }
            PathSegment::SmoothQuadratic { x, y, .. } => {
                let p1 = reflected_quad_control.clone().unwrap_or_else(|| start.clone());
                let p2 = resolve_point(abs, x, y, &cur);
                new_quad_ctrl = Some(p1.clone());
                (
                    p2.clone(),
                    Some(Curve::Quadratic {
                        p0: start.clone(),
                        p1,
                        p2,
                    }),
                )
            }
            PathSegment::EllipticalArc {
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
                ..
            } => {
                let p = resolve_point(abs, x, y, &cur);
                let curve = match arc_to_center(
                    &start,
                    &p,
                    rx,
                    ry,
                    x_axis_rotation,
                    *large_arc,
                    *sweep,
                    ctx,
                )? {
                    Some(geometry) => Curve::Arc {
                        geometry,
                        p0: start.clone(),
                        p1: p.clone(),
                    },
                    // Degenerate arcs render as a straight line.
                    None => Curve::Line {
                        p0: start.clone(),
                        p1: p.clone(),
                    },
                };
                (p, Some(curve))
            }
            PathSegment::ClosePath { .. } => {
                let p = subpath_start.clone();
                (
                    p.clone(),
                    Some(Curve::Line {
                        p0: start.clone(),
                        p1: p,
                    }),
                )
            }
        };

        cur = end.clone();
        last_cubic_ctrl = new_cubic_ctrl;
        last_quad_ctrl = new_quad_ctrl;

        out.push(WalkedSegment {
            start,
            end,
            subpath_start: subpath_start.clone(),
            curve,
            reflected_cubic_control,
            reflected_quad_control,
        });
    }

    Ok(out)
}

/// Flattens walked segments into one polyline per subpath.
///
/// Lines contribute their endpoints, curves and arcs contribute
/// `samples + 1` points.
pub(crate) fn flatten(
    walked: &[WalkedSegment],
    samples: u32,
    ctx: &DecimalContext,
) -> Vec<Vec<Point>> {
    let mut polylines: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for seg in walked {
        match &seg.curve {
            None => {
                // MoveTo starts a new subpath.
                if current.len() > 1 {
                    polylines.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                current.push(seg.end.clone());
            }
            Some(Curve::Line { p0, p1 }) => {
                if current.is_empty() {
                    current.push(p0.clone());
                }
                current.push(p1.clone());
            }
            Some(curve) => {
                let mut points = curve.sample_points(samples, ctx);
                if !current.is_empty() {
                    points.remove(0);
                }
                current.extend(points);
            }
        }
    }

    if current.len() > 1 {
        polylines.push(current);
    }

    polylines
}

/// Collects every endpoint and `CURVE_SAMPLES` interior samples per
/// drawable segment, for verification re-walks.
pub(crate) fn sample_all(walked: &[WalkedSegment], ctx: &DecimalContext) -> Vec<Point> {
    let mut points = Vec::new();

    for seg in walked {
        match &seg.curve {
            None => points.push(seg.end.clone()),
            Some(Curve::Line { p0, p1 }) => {
                points.push(p0.clone());
                points.push(p1.clone());
            }
            Some(curve) => {
                points.extend(curve.sample_points(CURVE_SAMPLES, ctx));
            }
        }
    }

    points
}
