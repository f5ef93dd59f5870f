// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Convex polygon overlap via the Gilbert-Johnson-Keerthi algorithm.
//!
//! The simplex search runs on the Minkowski difference of the two
//! polygons; a zero-containing simplex proves overlap, an exhausted
//! search direction proves disjointness. Decimal arithmetic makes
//! every comparison, and therefore termination, exact. Edge and
//! vertex contact count as overlap.

use exactsvg_types::Decimal;
use num_traits::Zero;

use super::Point;

#[derive(Clone, Debug)]
struct Vec2 {
    x: Decimal,
    y: Decimal,
}

impl Vec2 {
    fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    fn neg(&self) -> Vec2 {
        Vec2 {
            x: -&self.x,
            y: -&self.y,
        }
    }
}

fn sub(a: &Point, b: &Point) -> Vec2 {
    Vec2 {
        x: &a.x - &b.x,
        y: &a.y - &b.y,
    }
}

fn dot(a: &Vec2, b: &Vec2) -> Decimal {
    &a.x * &b.x + &a.y * &b.y
}

/// `(a × b) × c` expressed in 2D: `b·(a·c) − a·(b·c)`.
fn triple(a: &Vec2, b: &Vec2, c: &Vec2) -> Vec2 {
    let ac = dot(a, c);
    let bc = dot(b, c);
    Vec2 {
        x: &b.x * &ac - &a.x * &bc,
        y: &b.y * &ac - &a.y * &bc,
    }
}

/// The vertex of `poly` farthest along `direction`.
fn support_vertex<'a>(poly: &'a [Point], direction: &Vec2) -> &'a Point {
    let mut best = &poly[0];
    let mut best_dot = dot(&sub(best, &origin()), direction);

    for p in &poly[1..] {
        let d = dot(&sub(p, &origin()), direction);
        if d > best_dot {
            best_dot = d;
            best = p;
        }
    }

    best
}

fn origin() -> Point {
    Point::new(Decimal::zero(), Decimal::zero())
}

/// The Minkowski-difference support point.
fn support(a: &[Point], b: &[Point], direction: &Vec2) -> Vec2 {
    let pa = support_vertex(a, direction);
    let pb = support_vertex(b, &direction.neg());
    sub(pa, pb)
}

/// Checks whether two convex polygons overlap.
///
/// Both polygons must be non-empty; vertex order does not matter.
pub fn polygons_intersect(a: &[Point], b: &[Point]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    let mut direction = sub(&a[0], &b[0]);
    if direction.is_zero() {
        // Shared vertex.
        return true;
    }

    let first = support(a, b, &direction);
    if first.is_zero() {
        return true;
    }
    direction = first.neg();

    let mut simplex = vec![first];

    // Exact arithmetic terminates on its own; the cap only guards
    // against a malformed input polygon.
    for _ in 0..(a.len() + b.len()) * 3 + 16 {
        if direction.is_zero() {
            // The origin lies on the latest edge.
            return true;
        }

        let p = support(a, b, &direction);
        if dot(&p, &direction) < Decimal::zero() {
            // The whole difference lies strictly on one side:
            // no simplex can ever reach the origin.
            return false;
        }

        simplex.push(p);

        match evolve_simplex(&mut simplex, &mut direction) {
            Some(result) => return result,
            None => {}
        }
    }

    log::warn!("GJK did not converge; assuming an intersection.");
    true
}

/// Advances the simplex toward the origin.
///
/// Returns `Some(true)` when the simplex contains the origin,
/// `Some(false)` never (rejection happens on the support step),
/// and `None` to continue searching.
fn evolve_simplex(simplex: &mut Vec<Vec2>, direction: &mut Vec2) -> Option<bool> {
    match simplex.len() {
        2 => {
            let a = simplex[1].clone(); // latest
            let b = simplex[0].clone();
            let ab = Vec2 {
                x: &b.x - &a.x,
                y: &b.y - &a.y,
            };
            let ao = a.neg();

            let perp = triple(&ab, &ao, &ab);
            if perp.is_zero() {
                // Collinear: the origin is on the segment iff its
                // projection parameter lies inside [0, |AB|^2].
                let t = dot(&ao, &ab);
                let len2 = dot(&ab, &ab);
                return Some(t >= Decimal::zero() && t <= len2);
            }

            *direction = perp;
            None
        }
        3 => {
            let a = simplex[2].clone(); // latest
            let b = simplex[1].clone();
            let c = simplex[0].clone();
            let ab = Vec2 {
                x: &b.x - &a.x,
                y: &b.y - &a.y,
            };
            let ac = Vec2 {
                x: &c.x - &a.x,
                y: &c.y - &a.y,
            };
            let ao = a.neg();

            let ab_perp = triple(&ac, &ab, &ab);
            let ac_perp = triple(&ab, &ac, &ac);

            if dot(&ab_perp, &ao) > Decimal::zero() {
                // Origin beyond AB: drop C.
                simplex.remove(0);
                *direction = ab_perp;
                None
            } else if dot(&ac_perp, &ao) > Decimal::zero() {
                // Origin beyond AC: drop B.
                simplex.remove(1);
                *direction = ac_perp;
                None
            } else {
                // Inside the triangle, boundary included.
                Some(true)
            }
        }
        _ => None,
    }
}
