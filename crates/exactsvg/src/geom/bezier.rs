// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bezier curve evaluation and degree analysis.

use exactsvg_types::{Decimal, DecimalContext, DecimalExt};
use num_traits::One;

use super::{sample_t, Point};

/// The number of interior samples used by straightness tests
/// and bounding boxes.
pub(crate) const CURVE_SAMPLES: u32 = 20;

/// Evaluates a line at `t`.
pub(crate) fn line_point(p0: &Point, p1: &Point, t: &Decimal) -> Point {
    let mt = Decimal::one() - t;
    Point::new(&p0.x * &mt + &p1.x * t, &p0.y * &mt + &p1.y * t)
}

/// Evaluates a quadratic Bezier at `t` in the Bernstein form.
pub(crate) fn quadratic_point(p0: &Point, p1: &Point, p2: &Point, t: &Decimal) -> Point {
    let mt = Decimal::one() - t;
    let a = &mt * &mt;
    let b = Decimal::from(2) * &mt * t;
    let c = t * t;

    Point::new(
        &p0.x * &a + &p1.x * &b + &p2.x * &c,
        &p0.y * &a + &p1.y * &b + &p2.y * &c,
    )
}

/// Evaluates a cubic Bezier at `t` in the Bernstein form.
pub(crate) fn cubic_point(p0: &Point, p1: &Point, p2: &Point, p3: &Point, t: &Decimal) -> Point {
    let mt = Decimal::one() - t;
    let mt2 = &mt * &mt;
    let t2 = t * t;

    let a = &mt2 * &mt;
    let b = Decimal::from(3) * &mt2 * t;
    let c = Decimal::from(3) * &mt * &t2;
    let d = &t2 * t;

    Point::new(
        &p0.x * &a + &p1.x * &b + &p2.x * &c + &p3.x * &d,
        &p0.y * &a + &p1.y * &b + &p2.y * &c + &p3.y * &d,
    )
}

/// The squared perpendicular deviation of `p` from the chord `a..b`,
/// scaled by the squared chord length.
///
/// `deviation <= tol` is equivalent to `cross^2 <= tol^2 * chord_len^2`,
/// which avoids both the division and the square root.
fn chord_cross(a: &Point, b: &Point, p: &Point) -> Decimal {
    let abx = &b.x - &a.x;
    let aby = &b.y - &a.y;
    let apx = &p.x - &a.x;
    let apy = &p.y - &a.y;
    &abx * &apy - &aby * &apx
}

fn max_deviation_holds(
    chord_a: &Point,
    chord_b: &Point,
    samples: &[Point],
    tolerance: &Decimal,
    ctx: &DecimalContext,
) -> bool {
    let chord_len2 = chord_a.distance_squared(chord_b);
    let tol2 = tolerance * tolerance;

    if chord_len2.is_near_zero(&ctx.epsilon()) {
        // A degenerate chord: measure plain distance to the start point.
        return samples
            .iter()
            .all(|p| p.distance_squared(chord_a) <= tol2);
    }

    let limit = &tol2 * &chord_len2;
    samples.iter().all(|p| {
        let cross = chord_cross(chord_a, chord_b, p);
        &cross * &cross <= limit
    })
}

/// Checks that a cubic Bezier deviates from its chord by at most
/// `tolerance`, sampling 20 interior points.
///
/// A fully degenerate curve (all four points coincide) is straight.
pub fn is_cubic_bezier_straight(
    p0: &Point,
    p1: &Point,
    p2: &Point,
    p3: &Point,
    tolerance: &Decimal,
    ctx: &DecimalContext,
) -> bool {
    let samples: Vec<Point> = (1..CURVE_SAMPLES)
        .map(|i| cubic_point(p0, p1, p2, p3, &sample_t(i, CURVE_SAMPLES, ctx)))
        .collect();

    max_deviation_holds(p0, p3, &samples, tolerance, ctx)
}

/// Degree-reduces a straight cubic to its chord.
pub fn cubic_bezier_to_line(
    p0: &Point,
    p1: &Point,
    p2: &Point,
    p3: &Point,
    tolerance: &Decimal,
    ctx: &DecimalContext,
) -> Option<(Point, Point)> {
    if is_cubic_bezier_straight(p0, p1, p2, p3, tolerance, ctx) {
        Some((p0.clone(), p3.clone()))
    } else {
        None
    }
}

/// Recovers the quadratic control point of a degree-elevated cubic.
///
/// A cubic is an elevated quadratic iff `p1 = p0 + 2/3·(Q1 − p0)` and
/// `p2 = p3 + 2/3·(Q1 − p3)` hold for the same `Q1`. Both implied
/// controls are computed; when they coincide within `tolerance`,
/// their midpoint is returned.
pub fn lower_cubic_to_quadratic(
    p0: &Point,
    p1: &Point,
    p2: &Point,
    p3: &Point,
    tolerance: &Decimal,
) -> Option<Point> {
    let half = half();
    let three = Decimal::from(3);

    // Q1 = (3*p1 - p0) / 2
    let qa = Point::new(
        (&three * &p1.x - &p0.x) * &half,
        (&three * &p1.y - &p0.y) * &half,
    );
    // Q1' = (3*p2 - p3) / 2
    let qb = Point::new(
        (&three * &p2.x - &p3.x) * &half,
        (&three * &p2.y - &p3.y) * &half,
    );

    if qa.fuzzy_eq(&qb, tolerance) {
        Some(Point::new(
            (&qa.x + &qb.x) * &half,
            (&qa.y + &qb.y) * &half,
        ))
    } else {
        None
    }
}

/// Checks that a quadratic Bezier deviates from its chord by at most
/// `tolerance`.
///
/// A quadratic is convex, so the control-point deviation bounds the
/// curve; sampling still runs to keep the measure uniform with cubics.
pub fn is_quadratic_bezier_straight(
    p0: &Point,
    p1: &Point,
    p2: &Point,
    tolerance: &Decimal,
    ctx: &DecimalContext,
) -> bool {
    let samples: Vec<Point> = (1..CURVE_SAMPLES)
        .map(|i| quadratic_point(p0, p1, p2, &sample_t(i, CURVE_SAMPLES, ctx)))
        .collect();

    max_deviation_holds(p0, p2, &samples, tolerance, ctx)
}

// Multiplying by 0.5 is exact; dividing by 2 would round.
fn half() -> Decimal {
    Decimal::new(num_bigint::BigInt::from(5), 1)
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i64, y: i64) -> Point {
        Point::new(Decimal::from(x), Decimal::from(y))
    }

    #[test]
    fn collinear_cubic_is_straight() {
        let ctx = DecimalContext::default();
        let tol = ctx.tolerance();
        assert!(is_cubic_bezier_straight(
            &p(0, 0), &p(10, 0), &p(20, 0), &p(30, 0), &tol, &ctx
        ));
    }

    #[test]
    fn degenerate_cubic_is_straight() {
        let ctx = DecimalContext::default();
        let tol = ctx.tolerance();
        assert!(is_cubic_bezier_straight(
            &p(5, 5), &p(5, 5), &p(5, 5), &p(5, 5), &tol, &ctx
        ));
    }

    #[test]
    fn bulging_cubic_is_not_straight() {
        let ctx = DecimalContext::default();
        let tol = ctx.tolerance();
        assert!(!is_cubic_bezier_straight(
            &p(0, 0), &p(0, 100), &p(100, 100), &p(100, 0), &tol, &ctx
        ));
    }

    #[test]
    fn elevated_quadratic_lowers() {
        let ctx = DecimalContext::default();
        // Elevate Q(0,0)-(30,60)-(60,0): p1 = p0 + 2/3*(Q1-p0) = (20,40),
        // p2 = p3 + 2/3*(Q1-p3) = (40,40).
        let q1 = lower_cubic_to_quadratic(
            &p(0, 0), &p(20, 40), &p(40, 40), &p(60, 0), &ctx.tolerance(),
        )
        .unwrap();
        assert_eq!(q1, p(30, 60));
    }

    #[test]
    fn generic_cubic_does_not_lower() {
        let ctx = DecimalContext::default();
        assert!(lower_cubic_to_quadratic(
            &p(0, 0), &p(0, 100), &p(100, 100), &p(100, 0), &ctx.tolerance(),
        )
        .is_none());
    }

    #[test]
    fn quadratic_straightness() {
        let ctx = DecimalContext::default();
        let tol = ctx.tolerance();
        assert!(is_quadratic_bezier_straight(&p(0, 0), &p(5, 0), &p(10, 0), &tol, &ctx));
        assert!(!is_quadratic_bezier_straight(&p(0, 0), &p(5, 8), &p(10, 0), &tol, &ctx));
    }

    #[test]
    fn cubic_midpoint() {
        // The hump M0 0 C0 100 100 100 100 0 peaks at t=0.5, y=75.
        let mid = cubic_point(&p(0, 0), &p(0, 100), &p(100, 100), &p(100, 0), &half());
        assert_eq!(mid, p(50, 75));
    }
}
