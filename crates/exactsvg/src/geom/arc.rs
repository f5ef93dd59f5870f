// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Elliptical arc geometry: endpoint to center conversion, sampling,
//! extrema and straightness.

use exactsvg_types::{Decimal, DecimalContext, DecimalExt, NumericError};
use num_traits::{One, Signed, Zero};

use super::Point;

/// An arc in center parameterization.
///
/// Derived from the SVG endpoint form via the standard conversion
/// (SVG 1.1, F.6.5), with out-of-range radii scaled up as renderers do.
#[derive(Clone, Debug)]
pub(crate) struct ArcGeometry {
    pub cx: Decimal,
    pub cy: Decimal,
    pub rx: Decimal,
    pub ry: Decimal,
    pub cos_phi: Decimal,
    pub sin_phi: Decimal,
    pub theta1: Decimal,
    pub delta: Decimal,
}

impl ArcGeometry {
    /// Evaluates the ellipse at the eccentric angle `theta`.
    pub fn point_at_angle(&self, theta: &Decimal, ctx: &DecimalContext) -> Point {
        let cos_t = ctx.cos(theta);
        let sin_t = ctx.sin(theta);

        let x = &self.cx + &self.rx * &cos_t * &self.cos_phi - &self.ry * &sin_t * &self.sin_phi;
        let y = &self.cy + &self.rx * &cos_t * &self.sin_phi + &self.ry * &sin_t * &self.cos_phi;
        Point::new(x, y)
    }

    /// Evaluates the arc at the sweep parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: &Decimal, ctx: &DecimalContext) -> Point {
        let theta = &self.theta1 + t * &self.delta;
        self.point_at_angle(&theta, ctx)
    }

    /// The eccentric angles of the axis-aligned extrema that fall
    /// inside the swept range.
    ///
    /// Solving `dx/dθ = 0` gives `tan θ = −ry·tan φ / rx`; `dy/dθ = 0`
    /// gives `tan θ = ry·cot φ / rx`. Both roots and their antipodes
    /// are candidates.
    pub fn extrema_angles(&self, ctx: &DecimalContext) -> Vec<Decimal> {
        let pi = ctx.pi();

        let theta_x = ctx.atan2(
            &(-(&self.ry * &self.sin_phi)),
            &(&self.rx * &self.cos_phi),
        );
        let theta_y = ctx.atan2(
            &(&self.ry * &self.cos_phi),
            &(&self.rx * &self.sin_phi),
        );

        let mut candidates = vec![
            theta_x.clone(),
            &theta_x + &pi,
            theta_y.clone(),
            &theta_y + &pi,
        ];
        candidates.retain(|theta| self.angle_in_sweep(theta, ctx));
        candidates
    }

    fn angle_in_sweep(&self, theta: &Decimal, ctx: &DecimalContext) -> bool {
        let two_pi = ctx.two_pi();

        // Offset from theta1, normalized to [0, 2π).
        let mut d = theta - &self.theta1;
        while d.is_negative() {
            d += &two_pi;
        }
        while d >= two_pi {
            d -= &two_pi;
        }

        if self.delta.is_negative() {
            &two_pi - &d <= -&self.delta || d.is_zero()
        } else {
            d <= self.delta
        }
    }
}

/// Converts an SVG endpoint arc into center parameterization.
///
/// Returns `None` for degenerate cases (zero radius or coincident
/// endpoints) which renderers draw as a straight line or nothing.
pub(crate) fn arc_to_center(
    start: &Point,
    end: &Point,
    rx: &Decimal,
    ry: &Decimal,
    rotation_degrees: &Decimal,
    large_arc: bool,
    sweep: bool,
    ctx: &DecimalContext,
) -> Result<Option<ArcGeometry>, NumericError> {
    let eps = ctx.epsilon();

    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx.is_near_zero(&eps) || ry.is_near_zero(&eps) {
        return Ok(None);
    }
    if start.fuzzy_eq(end, &eps) {
        return Ok(None);
    }

    let phi = ctx.deg_to_rad(rotation_degrees);
    let cos_phi = ctx.cos(&phi);
    let sin_phi = ctx.sin(&phi);

    let half = half();

    // F.6.5.1
    let half_dx = (&start.x - &end.x) * &half;
    let half_dy = (&start.y - &end.y) * &half;
    let x1p = &cos_phi * &half_dx + &sin_phi * &half_dy;
    let y1p = -&sin_phi * &half_dx + &cos_phi * &half_dy;

    // F.6.6: scale radii up when no ellipse could reach the endpoint.
    let rx2 = &rx * &rx;
    let ry2 = &ry * &ry;
    let x1p2 = &x1p * &x1p;
    let y1p2 = &y1p * &y1p;
    let lambda = ctx.div(&x1p2, &rx2)? + ctx.div(&y1p2, &ry2)?;
    if lambda > Decimal::one() {
        let s = ctx.sqrt(&lambda)?;
        rx = ctx.round(&rx * &s);
        ry = ctx.round(&ry * &s);
    }

    // F.6.5.2
    let rx2 = &rx * &rx;
    let ry2 = &ry * &ry;
    let den = &rx2 * &y1p2 + &ry2 * &x1p2;
    if den.is_zero() {
        return Ok(None);
    }
    let num = &rx2 * &ry2 - &rx2 * &y1p2 - &ry2 * &x1p2;
    // Rounding may push the radicand a hair below zero.
    let radicand = ctx.div(&num, &den)?.max(Decimal::zero());
    let mut coef = ctx.sqrt(&radicand)?;
    if large_arc == sweep {
        coef = -coef;
    }

    let cxp = &coef * ctx.div(&(&rx * &y1p), &ry)?;
    let cyp = -&coef * ctx.div(&(&ry * &x1p), &rx)?;

    // F.6.5.3
    let mid_x = (&start.x + &end.x) * &half;
    let mid_y = (&start.y + &end.y) * &half;
    let cx = &cos_phi * &cxp - &sin_phi * &cyp + mid_x;
    let cy = &sin_phi * &cxp + &cos_phi * &cyp + mid_y;

    // F.6.5.5 / F.6.5.6
    let ux = ctx.div(&(&x1p - &cxp), &rx)?;
    let uy = ctx.div(&(&y1p - &cyp), &ry)?;
    let vx = ctx.div(&(-&x1p - &cxp), &rx)?;
    let vy = ctx.div(&(-&y1p - &cyp), &ry)?;

    let theta1 = ctx.atan2(&uy, &ux);
    let theta2 = ctx.atan2(&vy, &vx);

    let mut delta = &theta2 - &theta1;
    let two_pi = ctx.two_pi();
    if !sweep && delta.is_positive() {
        delta -= &two_pi;
    } else if sweep && delta.is_negative() {
        delta += &two_pi;
    }

    Ok(Some(ArcGeometry {
        cx,
        cy,
        rx,
        ry,
        cos_phi,
        sin_phi,
        theta1,
        delta,
    }))
}

/// The sagitta of a circular arc: `r − √(r² − (chord/2)²)`.
///
/// Returns `None` when the chord exceeds the diameter.
pub fn calculate_sagitta(
    r: &Decimal,
    chord: &Decimal,
    ctx: &DecimalContext,
) -> Option<Decimal> {
    let half_chord = chord * half();
    let radicand = r * r - &half_chord * &half_chord;
    if radicand.is_negative() {
        return None;
    }

    // Non-negative radicand: `sqrt` cannot fail.
    let root = ctx.sqrt(&radicand).ok()?;
    Some(ctx.round(r - root))
}

/// Checks that an arc segment is indistinguishable from its chord.
///
/// Zero radii always produce a line. A set large-arc flag sweeps more
/// than half of the ellipse and is never straight for a non-trivial
/// chord.
pub fn is_arc_straight(
    rx: &Decimal,
    ry: &Decimal,
    large_arc: bool,
    start: &Point,
    end: &Point,
    tolerance: &Decimal,
    ctx: &DecimalContext,
) -> bool {
    let eps = ctx.epsilon();

    if rx.is_near_zero(&eps) || ry.is_near_zero(&eps) {
        return true;
    }

    if start.fuzzy_eq(end, &eps) {
        return true;
    }

    if large_arc {
        return false;
    }

    let chord2 = start.distance_squared(end);
    let chord = match ctx.sqrt(&chord2) {
        Ok(c) => c,
        Err(_) => return false,
    };

    let r = rx.abs().max(ry.abs());
    match calculate_sagitta(&r, &chord, ctx) {
        Some(sagitta) => sagitta <= *tolerance,
        None => false,
    }
}

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

    fn d(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn unit_half_circle() {
        let ctx = DecimalContext::default();
        // A positive-sweep half circle from (0,0) to (2,0) with r=1:
        // the center is (1,0).
        let arc = arc_to_center(
            &p(0, 0), &p(2, 0), &d(1), &d(1), &d(0), false, true, &ctx,
        )
        .unwrap()
        .unwrap();

        assert!(arc.cx.fuzzy_eq(&d(1), &ctx.tolerance()));
        assert!(arc.cy.fuzzy_eq(&d(0), &ctx.tolerance()));
        assert!(arc.delta.fuzzy_eq(&ctx.pi(), &ctx.tolerance()));

        // Sweep=1 runs in the positive-angle direction, which in SVG's
        // y-down frame bulges toward negative y.
        let apex = arc.point_at(&Decimal::new(num_bigint::BigInt::from(5), 1), &ctx);
        assert!(apex.fuzzy_eq(&p(1, -1), &ctx.tolerance()));
    }

    #[test]
    fn degenerate_radius_is_a_line() {
        let ctx = DecimalContext::default();
        let arc = arc_to_center(
            &p(0, 0), &p(10, 0), &d(0), &d(5), &d(0), false, true, &ctx,
        )
        .unwrap();
        assert!(arc.is_none());
    }

    #[test]
    fn sagitta_values() {
        let ctx = DecimalContext::default();

        // r=5, chord=8 -> sagitta = 5 - sqrt(25 - 16) = 2.
        let s = calculate_sagitta(&d(5), &d(8), &ctx).unwrap();
        assert!(s.fuzzy_eq(&d(2), &ctx.tolerance()));

        // Chord longer than the diameter.
        assert!(calculate_sagitta(&d(5), &d(11), &ctx).is_none());
    }

    #[test]
    fn tiny_arcs_are_straight() {
        let ctx = DecimalContext::default();
        let tol = ctx.tolerance();

        // A huge radius over a short chord is flat:
        // the sagitta is (chord/2)^2 / (2r) = 1.25e-11.
        assert!(is_arc_straight(
            &d(10_000_000_000), &d(10_000_000_000), false,
            &p(0, 0), &p(1, 0), &tol, &ctx
        ));

        // A small radius over the same chord bulges.
        assert!(!is_arc_straight(&d(1), &d(1), false, &p(0, 0), &p(1, 0), &tol, &ctx));

        // The large-arc flag always sweeps the long way.
        assert!(!is_arc_straight(
            &d(10_000_000_000), &d(10_000_000_000), true,
            &p(0, 0), &p(1, 0), &tol, &ctx
        ));
    }

    #[test]
    fn extrema_of_a_half_sweep() {
        let ctx = DecimalContext::default();
        // Half circle from (1,0) to (-1,0) around the origin.
        let arc = arc_to_center(
            &p(1, 0), &p(-1, 0), &d(1), &d(1), &d(0), false, true, &ctx,
        )
        .unwrap()
        .unwrap();

        // The sweep passes through the (0,1) extremum.
        let extrema = arc.extrema_angles(&ctx);
        let hits_apex = extrema.iter().any(|theta| {
            arc.point_at_angle(theta, &ctx).fuzzy_eq(&p(0, 1), &ctx.tolerance())
        });
        assert!(hits_apex);
    }
}
