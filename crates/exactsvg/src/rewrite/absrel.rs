// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-command absolute/relative selection.
//!
//! Conversions are exact decimal translations against the walked
//! current point. Verification is by coordinate reconstruction: the
//! converted stream is re-walked and its positions compared against
//! the original. The two conversions never invoke each other.

use exactsvg_types::{write_path, Decimal, PathSegment, WriteOptions};

use super::{PassContext, PassReport};
use crate::geom::walk;
use crate::geom::Point;
use crate::Error;

/// Rewrites a segment into its absolute form, given the current point
/// before the segment.
pub fn to_absolute(seg: &PathSegment, start: &Point) -> PathSegment {
    if seg.is_absolute() {
        return seg.clone();
    }
    translate(seg, &start.x, &start.y, true)
}

/// Rewrites a segment into its relative form, given the current point
/// before the segment.
pub fn to_relative(seg: &PathSegment, start: &Point) -> PathSegment {
    if !seg.is_absolute() {
        return seg.clone();
    }
    translate(seg, &(-&start.x), &(-&start.y), false)
}

/// Shifts every positional argument by `(dx, dy)` and stamps the new
/// absolute flag. Radii, rotation and flags are frame-independent.
fn translate(seg: &PathSegment, dx: &Decimal, dy: &Decimal, abs: bool) -> PathSegment {
    match seg {
        PathSegment::MoveTo { x, y, .. } => PathSegment::MoveTo {
            abs,
            x: x + dx,
            y: y + dy,
        },
        PathSegment::LineTo { x, y, .. } => PathSegment::LineTo {
            abs,
            x: x + dx,
            y: y + dy,
        },
        PathSegment::HorizontalLineTo { x, .. } => PathSegment::HorizontalLineTo {
            abs,
            x: x + dx,
        },
        PathSegment::VerticalLineTo { y, .. } => PathSegment::VerticalLineTo {
            abs,
            y: y + dy,
        },
        PathSegment::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
            ..
        } => PathSegment::CurveTo {
            abs,
            x1: x1 + dx,
            y1: y1 + dy,
            x2: x2 + dx,
            y2: y2 + dy,
            x: x + dx,
            y: y + dy,
        },
        PathSegment::SmoothCurveTo { x2, y2, x, y, .. } => PathSegment::SmoothCurveTo {
            abs,
            x2: x2 + dx,
            y2: y2 + dy,
            x: x + dx,
            y: y + dy,
        },
        PathSegment::Quadratic { x1, y1, x, y, .. } => PathSegment::Quadratic {
            abs,
            x1: x1 + dx,
            y1: y1 + dy,
            x: x + dx,
            y: y + dy,
        },
        PathSegment::SmoothQuadratic { x, y, .. } => PathSegment::SmoothQuadratic {
            abs,
            x: x + dx,
            y: y + dy,
        },
        PathSegment::EllipticalArc {
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            x,
            y,
            ..
        } => PathSegment::EllipticalArc {
            abs,
            rx: rx.clone(),
            ry: ry.clone(),
            x_axis_rotation: x_axis_rotation.clone(),
            large_arc: *large_arc,
            sweep: *sweep,
            x: x + dx,
            y: y + dy,
        },
        PathSegment::ClosePath { .. } => PathSegment::ClosePath { abs },
    }
}

/// For every non-MoveTo command, serializes both the absolute and the
/// relative form at the current precision and keeps the shorter one.
/// Equal lengths prefer the absolute form.
pub(crate) fn choose_shorter_form(
    segments: &[PathSegment],
    pc: &PassContext,
) -> Result<PassReport, Error> {
    let walked = walk::walk(segments, pc.ctx)?;

    let write_opt = WriteOptions {
        precision: pc.precision,
        minify: true,
        ..WriteOptions::default()
    };

    let mut out = Vec::with_capacity(segments.len());
    let mut changes = 0usize;

    for (i, seg) in segments.iter().enumerate() {
        if matches!(seg, PathSegment::MoveTo { .. }) {
            out.push(seg.clone());
            continue;
        }

        let start = &walked[i].start;
        let absolute = to_absolute(seg, start);
        let relative = to_relative(seg, start);

        // Coordinate reconstruction: shifting back must restore the
        // original arguments exactly. Decimal addition is exact, so a
        // mismatch would mean the conversion itself is broken.
        if to_absolute(&relative, start) != absolute {
            log::warn!("absolute/relative conversion failed to reconstruct; pass skipped");
            let mut report = PassReport::empty();
            report.name = "choose_shorter_form";
            report.segments = segments.to_vec();
            return Ok(report);
        }

        let abs_len = write_path(std::slice::from_ref(&absolute), &write_opt).len();
        let rel_len = write_path(std::slice::from_ref(&relative), &write_opt).len();

        let chosen = if rel_len < abs_len { relative } else { absolute };
        if chosen.is_absolute() != seg.is_absolute() {
            changes += 1;
        }
        out.push(chosen);
    }

    let mut report = PassReport::empty();
    report.merge_count = Some(changes);
    pc.finish(
        "choose_shorter_form",
        segments,
        out,
        changes,
        &pc.tolerance,
        report,
    )
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use exactsvg_types::parse_path;

    fn p(x: i64, y: i64) -> Point {
        Point::new(Decimal::from(x), Decimal::from(y))
    }

    #[test]
    fn round_trip_is_exact() {
        let segments = parse_path("M10 10 L20 30 C1 2 3 4 5 6 A5 5 0 1 0 9 9 Z").unwrap();
        let start = p(10, 10);

        for seg in &segments[1..] {
            let rel = to_relative(seg, &start);
            let abs = to_absolute(seg, &start);
            assert_eq!(to_absolute(&rel, &start), abs);
            assert_eq!(to_relative(&abs, &start), rel);
        }
    }

    #[test]
    fn horizontal_uses_single_axis() {
        let seg = parse_path("M10 10 H25").unwrap()[1].clone();
        let rel = to_relative(&seg, &p(10, 10));
        assert_eq!(
            rel,
            PathSegment::HorizontalLineTo { abs: false, x: Decimal::from(15) }
        );
    }

    #[test]
    fn arc_keeps_radii() {
        let seg = parse_path("M10 10 A5 6 30 1 0 20 20").unwrap()[1].clone();
        let rel = to_relative(&seg, &p(10, 10));
        match rel {
            PathSegment::EllipticalArc { rx, ry, x, y, abs, .. } => {
                assert!(!abs);
                assert_eq!(rx, Decimal::from(5));
                assert_eq!(ry, Decimal::from(6));
                assert_eq!(x, Decimal::from(10));
                assert_eq!(y, Decimal::from(10));
            }
            _ => unreachable!(),
        }
    }
}
