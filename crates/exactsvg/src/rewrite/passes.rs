// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The individual rewrite passes.

use exactsvg_types::{round_half_up, Decimal, DecimalExt, PathSegment};
use num_traits::Signed;

use super::{pow10_negative, PassContext, PassReport};
use crate::geom::walk::{self, Curve, WalkedSegment};
use crate::geom::{
    is_arc_straight, is_cubic_bezier_straight, is_quadratic_bezier_straight,
    lower_cubic_to_quadratic,
};
use crate::Error;

/// Fuses adjacent collinear, same-direction line segments.
///
/// The letter-level merging (`L 1 2 L 3 4` serialized as `L 1 2 3 4`)
/// happens in the writer; this pass reports how many letters will
/// collapse and performs the structural fusion that actually shortens
/// the stream.
pub(crate) fn collapse_repeated(
    segments: &[PathSegment],
    pc: &PassContext,
) -> Result<PassReport, Error> {
    let walked = walk::walk(segments, pc.ctx)?;
    let eps = pc.ctx.epsilon();

    let mut out: Vec<PathSegment> = Vec::with_capacity(segments.len());
    let mut merges = 0usize;

    let mut i = 0;
    while i < segments.len() {
        if !is_line_family(&segments[i]) {
            out.push(segments[i].clone());
            i += 1;
            continue;
        }

        // Extend the fusion run as far as the direction holds.
        let mut end = i;
        while end + 1 < segments.len() && can_fuse(segments, &walked, i, end, &eps) {
            end += 1;
        }

        if end > i {
            merges += end - i;
            out.push(fused_segment(&segments[i], &walked[i], &walked[end]));
        } else {
            out.push(segments[i].clone());
        }

        i = end + 1;
    }

    let collapse_count = elidable_letters(&out);
    let mut report = PassReport::empty();
    report.merge_count = Some(merges);
    report.collapse_count = Some(collapse_count);
    pc.finish("collapse_repeated", segments, out, merges, &pc.tolerance, report)
}

fn is_line_family(seg: &PathSegment) -> bool {
    matches!(
        seg,
        PathSegment::LineTo { .. }
            | PathSegment::HorizontalLineTo { .. }
            | PathSegment::VerticalLineTo { .. }
    )
}

/// Checks that segment `j + 1` continues the fusion run started at
/// `run_start`: same letter and case, collinear with the run so far,
/// and not reversing direction.
///
/// The run direction is accumulated from the run start, so a
/// zero-length segment in the middle cannot bridge two non-collinear
/// neighbors.
fn can_fuse(
    segments: &[PathSegment],
    walked: &[WalkedSegment],
    run_start: usize,
    j: usize,
    eps: &Decimal,
) -> bool {
    let a = &segments[j];
    let b = &segments[j + 1];

    if a.letter() != b.letter() || !is_line_family(a) {
        return false;
    }

    let d1x = &walked[j].end.x - &walked[run_start].start.x;
    let d1y = &walked[j].end.y - &walked[run_start].start.y;
    let d2x = &walked[j + 1].end.x - &walked[j + 1].start.x;
    let d2y = &walked[j + 1].end.y - &walked[j + 1].start.y;

    let cross = &d1x * &d2y - &d1y * &d2x;
    if !cross.is_near_zero(eps) {
        return false;
    }

    let dot = &d1x * &d2x + &d1y * &d2y;
    !dot.is_negative()
}

fn fused_segment(template: &PathSegment, first: &WalkedSegment, last: &WalkedSegment) -> PathSegment {
    let abs = template.is_absolute();

    match template {
        PathSegment::LineTo { .. } => {
            if abs {
                PathSegment::LineTo {
                    abs,
                    x: last.end.x.clone(),
                    y: last.end.y.clone(),
                }
            } else {
                PathSegment::LineTo {
                    abs,
                    x: &last.end.x - &first.start.x,
                    y: &last.end.y - &first.start.y,
                }
            }
        }
        PathSegment::HorizontalLineTo { .. } => PathSegment::HorizontalLineTo {
            abs,
            x: if abs {
                last.end.x.clone()
            } else {
                &last.end.x - &first.start.x
            },
        },
        PathSegment::VerticalLineTo { .. } => PathSegment::VerticalLineTo {
            abs,
            y: if abs {
                last.end.y.clone()
            } else {
                &last.end.y - &first.start.y
            },
        },
        _ => template.clone(),
    }
}

/// Counts command letters the writer will elide.
fn elidable_letters(segments: &[PathSegment]) -> usize {
    segments
        .windows(2)
        .filter(|pair| {
            let prev = pair[0].letter();
            let curr = pair[1].letter();
            match curr {
                b'Z' | b'z' | b'M' | b'm' => false,
                b'L' => prev == b'L' || prev == b'M',
                b'l' => prev == b'l' || prev == b'm',
                _ => prev == curr,
            }
        })
        .count()
}

/// Drops drawing commands whose post-state equals their pre-state.
///
/// Curves must also have both control points at the endpoint,
/// otherwise they have visible shape despite identical endpoints.
/// `Z` is never removed, and a removal is skipped when the next
/// command is a smooth shorthand, whose reflection would re-resolve
/// against the wrong predecessor.
pub(crate) fn remove_zero_length(
    segments: &[PathSegment],
    pc: &PassContext,
) -> Result<PassReport, Error> {
    let walked = walk::walk(segments, pc.ctx)?;
    let tol = &pc.tolerance;

    let mut out = Vec::with_capacity(segments.len());
    let mut removed = 0usize;

    for (i, seg) in segments.iter().enumerate() {
        let next_is_smooth = matches!(
            segments.get(i + 1),
            Some(PathSegment::SmoothCurveTo { .. }) | Some(PathSegment::SmoothQuadratic { .. })
        );

        if !next_is_smooth && is_zero_length(seg, &walked[i], tol) {
            removed += 1;
            continue;
        }

        out.push(seg.clone());
    }

    let mut report = PassReport::empty();
    report.remove_count = Some(removed);
    pc.finish("remove_zero_length", segments, out, removed, &pc.tolerance, report)
}

fn is_zero_length(seg: &PathSegment, info: &WalkedSegment, tol: &Decimal) -> bool {
    if !info.start.fuzzy_eq(&info.end, tol) {
        return false;
    }

    match seg {
        PathSegment::MoveTo { .. } | PathSegment::ClosePath { .. } => false,
        PathSegment::LineTo { .. }
        | PathSegment::HorizontalLineTo { .. }
        | PathSegment::VerticalLineTo { .. }
        | PathSegment::EllipticalArc { .. } => true,
        PathSegment::CurveTo { .. } | PathSegment::SmoothCurveTo { .. } => match &info.curve {
            Some(Curve::Cubic { p1, p2, p3, .. }) => {
                p1.fuzzy_eq(p3, tol) && p2.fuzzy_eq(p3, tol)
            }
            _ => false,
        },
        PathSegment::Quadratic { .. } | PathSegment::SmoothQuadratic { .. } => {
            match &info.curve {
                Some(Curve::Quadratic { p1, p2, .. }) => p1.fuzzy_eq(p2, tol),
                _ => false,
            }
        }
    }
}

/// Replaces curves that are straight within tolerance by lines, and
/// lowers degree-elevated cubics back to quadratics.
pub(crate) fn straight_curves(
    segments: &[PathSegment],
    pc: &PassContext,
    convert_to_q: bool,
) -> Result<PassReport, Error> {
    let walked = walk::walk(segments, pc.ctx)?;
    let ctx = pc.ctx;
    let tol = &pc.tolerance;

    let mut out = Vec::with_capacity(segments.len());
    let mut changes = 0usize;

    for (i, seg) in segments.iter().enumerate() {
        let info = &walked[i];
        let abs = seg.is_absolute();

        // A smooth follower reflects this command's control point;
        // replacing the command would change the follower's shape.
        let next_is_smooth = matches!(
            segments.get(i + 1),
            Some(PathSegment::SmoothCurveTo { .. }) | Some(PathSegment::SmoothQuadratic { .. })
        );

        let replacement = if next_is_smooth {
            None
        } else {
            match (seg, &info.curve) {
                (
                    PathSegment::CurveTo { x, y, .. } | PathSegment::SmoothCurveTo { x, y, .. },
                    Some(Curve::Cubic { p0, p1, p2, p3 }),
                ) => {
                    if is_cubic_bezier_straight(p0, p1, p2, p3, tol, ctx) {
                        Some(line_to(abs, x, y))
                    } else if convert_to_q && matches!(seg, PathSegment::CurveTo { .. }) {
                        lower_cubic_to_quadratic(p0, p1, p2, p3, tol).map(|q1| {
                            let (q1x, q1y) = if abs {
                                (q1.x.clone(), q1.y.clone())
                            } else {
                                (&q1.x - &info.start.x, &q1.y - &info.start.y)
                            };
                            PathSegment::Quadratic {
                                abs,
                                x1: q1x,
                                y1: q1y,
                                x: x.clone(),
                                y: y.clone(),
                            }
                        })
                    } else {
                        None
                    }
                }
                (
                    PathSegment::Quadratic { x, y, .. } | PathSegment::SmoothQuadratic { x, y, .. },
                    Some(Curve::Quadratic { p0, p1, p2 }),
                ) => {
                    if is_quadratic_bezier_straight(p0, p1, p2, tol, ctx) {
                        Some(line_to(abs, x, y))
                    } else {
                        None
                    }
                }
                (
                    PathSegment::EllipticalArc {
                        rx, ry, large_arc, x, y, ..
                    },
                    _,
                ) => {
                    if is_arc_straight(rx, ry, *large_arc, &info.start, &info.end, tol, ctx) {
                        Some(line_to(abs, x, y))
                    } else {
                        None
                    }
                }
                _ => None,
            }
        };

        match replacement {
            Some(new_seg) => {
                changes += 1;
                out.push(new_seg);
            }
            None => out.push(seg.clone()),
        }
    }

    let mut report = PassReport::empty();
    report.merge_count = Some(changes);
    pc.finish("straight_curves", segments, out, changes, &pc.tolerance, report)
}

fn line_to(abs: bool, x: &Decimal, y: &Decimal) -> PathSegment {
    PathSegment::LineTo {
        abs,
        x: x.clone(),
        y: y.clone(),
    }
}

/// Turns axis-parallel lines into the `H`/`V` shorthands.
pub(crate) fn line_shorthands(
    segments: &[PathSegment],
    pc: &PassContext,
) -> Result<PassReport, Error> {
    let walked = walk::walk(segments, pc.ctx)?;
    let tol = &pc.tolerance;

    let mut out = Vec::with_capacity(segments.len());
    let mut changes = 0usize;

    for (i, seg) in segments.iter().enumerate() {
        if let PathSegment::LineTo { abs, x, y } = seg {
            let info = &walked[i];
            let dy = (&info.end.y - &info.start.y).abs();
            let dx = (&info.end.x - &info.start.x).abs();

            if dy < *tol {
                changes += 1;
                out.push(PathSegment::HorizontalLineTo {
                    abs: *abs,
                    x: x.clone(),
                });
                continue;
            }
            if dx < *tol {
                changes += 1;
                out.push(PathSegment::VerticalLineTo {
                    abs: *abs,
                    y: y.clone(),
                });
                continue;
            }
        }

        out.push(seg.clone());
    }

    let mut report = PassReport::empty();
    report.merge_count = Some(changes);
    pc.finish("line_shorthands", segments, out, changes, &pc.tolerance, report)
}

/// Turns curves whose first control reflects the previous curve into
/// the `S`/`T` shorthands.
pub(crate) fn curve_smooth_shorthands(
    segments: &[PathSegment],
    pc: &PassContext,
) -> Result<PassReport, Error> {
    let walked = walk::walk(segments, pc.ctx)?;
    let tol = &pc.tolerance;

    let mut out = Vec::with_capacity(segments.len());
    let mut changes = 0usize;

    for (i, seg) in segments.iter().enumerate() {
        let info = &walked[i];

        match seg {
            PathSegment::CurveTo {
                abs, x2, y2, x, y, ..
            } => {
                let reflected = info.reflected_cubic_control.as_ref();
                let p1 = match &info.curve {
                    Some(Curve::Cubic { p1, .. }) => p1,
                    _ => unreachable!("a CurveTo always walks to a cubic"),
                };

                if reflected.map_or(false, |r| r.fuzzy_eq(p1, tol)) {
                    changes += 1;
                    out.push(PathSegment::SmoothCurveTo {
                        abs: *abs,
                        x2: x2.clone(),
                        y2: y2.clone(),
                        x: x.clone(),
                        y: y.clone(),
                    });
                    continue;
                }
            }
            PathSegment::Quadratic { abs, x, y, .. } => {
                let reflected = info.reflected_quad_control.as_ref();
                let p1 = match &info.curve {
                    Some(Curve::Quadratic { p1, .. }) => p1,
                    _ => unreachable!("a Quadratic always walks to a quadratic"),
                };

                if reflected.map_or(false, |r| r.fuzzy_eq(p1, tol)) {
                    changes += 1;
                    out.push(PathSegment::SmoothQuadratic {
                        abs: *abs,
                        x: x.clone(),
                        y: y.clone(),
                    });
                    continue;
                }
            }
            _ => {}
        }

        out.push(seg.clone());
    }

    let mut report = PassReport::empty();
    report.merge_count = Some(changes);
    pc.finish(
        "curve_smooth_shorthands",
        segments,
        out,
        changes,
        &pc.tolerance,
        report,
    )
}

/// Replaces a final line back to the subpath start with `Z`,
/// and drops it entirely when a `Z` follows anyway.
pub(crate) fn convert_to_z(
    segments: &[PathSegment],
    pc: &PassContext,
) -> Result<PassReport, Error> {
    let walked = walk::walk(segments, pc.ctx)?;
    let tol = &pc.tolerance;

    let mut out = Vec::with_capacity(segments.len());
    let mut changes = 0usize;
    let mut removed = 0usize;

    for (i, seg) in segments.iter().enumerate() {
        if let PathSegment::LineTo { abs, .. } = seg {
            let info = &walked[i];
            let at_subpath_end = matches!(
                segments.get(i + 1),
                None | Some(PathSegment::ClosePath { .. }) | Some(PathSegment::MoveTo { .. })
            );

            if at_subpath_end && info.end.fuzzy_eq(&info.subpath_start, tol) {
                if matches!(segments.get(i + 1), Some(PathSegment::ClosePath { .. })) {
                    // The following Z draws this exact line.
                    removed += 1;
                    changes += 1;
                    continue;
                }

                changes += 1;
                out.push(PathSegment::ClosePath { abs: *abs });
                continue;
            }
        }

        out.push(seg.clone());
    }

    let mut report = PassReport::empty();
    report.remove_count = Some(removed);
    pc.finish("convert_to_z", segments, out, changes, &pc.tolerance, report)
}

/// Rounds every coordinate to the configured precision, half-up.
///
/// The verification tolerance widens to the rounding step: a pass at
/// precision 3 legitimately moves geometry by up to `5e-4` per
/// coordinate.
pub(crate) fn format_numbers(
    segments: &[PathSegment],
    pc: &PassContext,
) -> Result<PassReport, Error> {
    let mut out = Vec::with_capacity(segments.len());
    let mut changes = 0usize;

    for seg in segments {
        let rounded = round_segment(seg, pc.precision);
        if &rounded != seg {
            changes += 1;
        }
        out.push(rounded);
    }

    let base = pow10_negative(pc.precision).max(pc.tolerance.clone());
    let mut report = PassReport::empty();
    report.merge_count = Some(changes);
    pc.finish("format_numbers", segments, out, changes, &base, report)
}

fn round_segment(seg: &PathSegment, precision: u8) -> PathSegment {
    let r = |d: &Decimal| round_half_up(d, precision);

    match seg {
        PathSegment::MoveTo { abs, x, y } => PathSegment::MoveTo {
            abs: *abs,
            x: r(x),
            y: r(y),
        },
        PathSegment::LineTo { abs, x, y } => PathSegment::LineTo {
            abs: *abs,
            x: r(x),
            y: r(y),
        },
        PathSegment::HorizontalLineTo { abs, x } => PathSegment::HorizontalLineTo {
            abs: *abs,
            x: r(x),
        },
        PathSegment::VerticalLineTo { abs, y } => PathSegment::VerticalLineTo {
            abs: *abs,
            y: r(y),
        },
        PathSegment::CurveTo {
            abs,
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        } => PathSegment::CurveTo {
            abs: *abs,
            x1: r(x1),
            y1: r(y1),
            x2: r(x2),
            y2: r(y2),
            x: r(x),
            y: r(y),
        },
        PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => PathSegment::SmoothCurveTo {
            abs: *abs,
            x2: r(x2),
            y2: r(y2),
            x: r(x),
            y: r(y),
        },
        PathSegment::Quadratic { abs, x1, y1, x, y } => PathSegment::Quadratic {
            abs: *abs,
            x1: r(x1),
            y1: r(y1),
            x: r(x),
            y: r(y),
        },
        PathSegment::SmoothQuadratic { abs, x, y } => PathSegment::SmoothQuadratic {
            abs: *abs,
            x: r(x),
            y: r(y),
        },
        PathSegment::EllipticalArc {
            abs,
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            x,
            y,
        } => PathSegment::EllipticalArc {
            abs: *abs,
            rx: r(rx),
            ry: r(ry),
            x_axis_rotation: r(x_axis_rotation),
            large_arc: *large_arc,
            sweep: *sweep,
            x: r(x),
            y: r(y),
        },
        PathSegment::ClosePath { abs } => PathSegment::ClosePath { abs: *abs },
    }
}
