// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Geometry verification by coordinate reconstruction.
//!
//! Both streams are walked independently and sampled densely; every
//! sampled point of each stream must lie within tolerance of the other
//! stream's flattened polylines. Verification never calls a reverse
//! rewrite - reconstruction is the only mechanism.

use exactsvg_types::{Decimal, DecimalContext, PathSegment};
use num_traits::Zero;

use crate::geom::walk::{self, WalkedSegment};
use crate::geom::Point;
use crate::Error;

const FLATTEN_SAMPLES: u32 = 20;

/// Checks that two command streams draw the same geometry within
/// `tolerance`.
pub(crate) fn streams_match(
    a: &[PathSegment],
    b: &[PathSegment],
    ctx: &DecimalContext,
    tolerance: &Decimal,
) -> Result<bool, Error> {
    let wa = walk::walk(a, ctx)?;
    let wb = walk::walk(b, ctx)?;

    let tol2 = tolerance * tolerance;
    Ok(covered_by(&wb, &wa, &tol2, ctx) && covered_by(&wa, &wb, &tol2, ctx))
}

/// Every sampled point of `probe` lies on some polyline of `reference`.
fn covered_by(
    probe: &[WalkedSegment],
    reference: &[WalkedSegment],
    tol2: &Decimal,
    ctx: &DecimalContext,
) -> bool {
    let samples = walk::sample_all(probe, ctx);
    if samples.is_empty() {
        return true;
    }

    let polylines = walk::flatten(reference, FLATTEN_SAMPLES, ctx);
    if polylines.is_empty() {
        // Nothing drawable to compare against: only trivially empty
        // probes pass.
        return samples.is_empty() || probe.iter().all(|s| s.curve.is_none());
    }

    samples
        .iter()
        .all(|p| polylines.iter().any(|line| on_polyline(p, line, tol2, ctx)))
}

fn on_polyline(p: &Point, polyline: &[Point], tol2: &Decimal, ctx: &DecimalContext) -> bool {
    if polyline.len() == 1 {
        return p.distance_squared(&polyline[0]) <= *tol2;
    }

    polyline
        .windows(2)
        .any(|pair| segment_distance_squared(p, &pair[0], &pair[1], ctx) <= *tol2)
}

/// The squared distance from a point to a segment.
fn segment_distance_squared(p: &Point, a: &Point, b: &Point, ctx: &DecimalContext) -> Decimal {
    let ab2 = a.distance_squared(b);
    if ab2.is_zero() {
        return p.distance_squared(a);
    }

    let apx = &p.x - &a.x;
    let apy = &p.y - &a.y;
    let abx = &b.x - &a.x;
    let aby = &b.y - &a.y;

    // The projection parameter, clamped to the segment.
    let t = ctx
        .div(&(&apx * &abx + &apy * &aby), &ab2)
        .unwrap_or_else(|_| Decimal::zero())
        .max(Decimal::zero())
        .min(Decimal::from(1));

    let proj = Point::new(&a.x + &abx * &t, &a.y + &aby * &t);
    p.distance_squared(&proj)
}
