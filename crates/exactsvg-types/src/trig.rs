//! Trigonometry over [`Decimal`] values.
//!
//! Everything here runs at the context's working precision (configured
//! precision + guard digits) and is rounded once on the way out.
//! Series arithmetic uses a fixed fractional scale; intermediate
//! divisions go through exact `BigInt` math instead of the default
//! `Div` impl, whose precision would cap the guard digits.

use bigdecimal::RoundingMode;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use crate::decimal::{Decimal, DecimalContext, NumericError};

#[inline]
fn work_scale(ctx: &DecimalContext) -> i64 {
    i64::from(ctx.working_precision()) + 4
}

#[inline]
fn rescale(value: Decimal, scale: i64) -> Decimal {
    value.with_scale_round(scale, RoundingMode::HalfUp)
}

#[inline]
fn pow10(n: u64) -> BigInt {
    BigInt::from(10u8).pow(n as u32)
}

/// `a / b` with exactly `scale` fractional digits, truncated.
///
/// The divisor must not be zero.
fn div_scaled(a: &Decimal, b: &Decimal, scale: i64) -> Decimal {
    debug_assert!(!b.is_zero());

    let (ai, ae) = a.as_bigint_and_exponent();
    let (bi, be) = b.as_bigint_and_exponent();

    // a/b = (ai/bi) * 10^(be-ae)
    let shift = scale + be - ae;
    let q = if shift >= 0 {
        (ai * pow10(shift as u64)) / bi
    } else {
        ai / (bi * pow10((-shift) as u64))
    };

    Decimal::new(q, scale)
}

fn sqrt_working(value: &Decimal) -> Decimal {
    debug_assert!(!value.is_negative());

    // The argument is non-negative, so `sqrt` cannot fail.
    value.sqrt().unwrap()
}

/// π at working precision via Machin's formula:
/// `π = 16·atan(1/5) − 4·atan(1/239)`.
pub(crate) fn compute_pi(ctx: &DecimalContext) -> Decimal {
    let scale = work_scale(ctx);
    let a = atan_inverse(5, scale);
    let b = atan_inverse(239, scale);
    rescale(Decimal::from(16) * a - Decimal::from(4) * b, scale)
}

/// `atan(1/n)` for a small integer `n` via the Maclaurin series.
fn atan_inverse(n: u64, scale: i64) -> Decimal {
    let limit = Decimal::new(BigInt::one(), scale);
    let n2 = Decimal::from(n * n);

    let mut power = div_scaled(&Decimal::one(), &Decimal::from(n), scale);
    let mut total = power.clone();
    let mut k: u64 = 1;

    loop {
        power = div_scaled(&power, &n2, scale);
        let term = div_scaled(&power, &Decimal::from(2 * k + 1), scale);
        if term.abs() < limit {
            break;
        }

        if k % 2 == 1 {
            total -= &term;
        } else {
            total += &term;
        }
        k += 1;
    }

    total
}

/// Reduces an angle to `(-π, π]`.
fn reduce_angle(x: &Decimal, ctx: &DecimalContext, scale: i64) -> Decimal {
    let pi = ctx.pi_working();

    if x.abs() <= pi {
        return x.clone();
    }

    let two_pi = &pi * Decimal::from(2);
    let turns = div_scaled(x, &two_pi, scale).with_scale_round(0, RoundingMode::Floor);
    let mut r = x - turns * &two_pi;
    if r > pi {
        r -= &two_pi;
    }

    rescale(r, scale)
}

pub(crate) fn sin(x: &Decimal, ctx: &DecimalContext) -> Decimal {
    let scale = work_scale(ctx);
    let r = reduce_angle(x, ctx, scale);
    ctx.round(sin_series(&r, scale))
}

pub(crate) fn cos(x: &Decimal, ctx: &DecimalContext) -> Decimal {
    let scale = work_scale(ctx);
    let r = reduce_angle(x, ctx, scale);
    ctx.round(cos_series(&r, scale))
}

/// `sin` Maclaurin series; converges for the reduced range.
fn sin_series(x: &Decimal, scale: i64) -> Decimal {
    let limit = Decimal::new(BigInt::one(), scale);
    let x2 = rescale(x * x, scale);

    let mut term = x.clone();
    let mut total = x.clone();
    let mut n: u64 = 1;

    loop {
        term = rescale(&term * &x2, scale);
        term = div_scaled(&term, &Decimal::from(2 * n * (2 * n + 1)), scale);
        term = -term;
        if term.abs() < limit {
            break;
        }

        total += &term;
        n += 1;
    }

    total
}

fn cos_series(x: &Decimal, scale: i64) -> Decimal {
    let limit = Decimal::new(BigInt::one(), scale);
    let x2 = rescale(x * x, scale);

    let mut term = Decimal::one();
    let mut total = Decimal::one();
    let mut n: u64 = 1;

    loop {
        term = rescale(&term * &x2, scale);
        term = div_scaled(&term, &Decimal::from((2 * n - 1) * (2 * n)), scale);
        term = -term;
        if term.abs() < limit {
            break;
        }

        total += &term;
        n += 1;
    }

    total
}

pub(crate) fn atan(x: &Decimal, ctx: &DecimalContext) -> Decimal {
    ctx.round(atan_working(x, ctx))
}

fn atan_working(x: &Decimal, ctx: &DecimalContext) -> Decimal {
    if x.is_zero() {
        return Decimal::zero();
    }
    if x.is_negative() {
        return -atan_working(&-x.clone(), ctx);
    }

    let scale = work_scale(ctx);

    // Halve the angle until the series converges fast:
    // atan(x) = 2*atan(x / (1 + sqrt(1 + x^2))).
    let threshold = Decimal::new(BigInt::one(), 1); // 0.1
    let mut value = rescale(x.clone(), scale);
    let mut doublings = 0u32;
    while value > threshold {
        let w = sqrt_working(&(Decimal::one() + rescale(&value * &value, scale)));
        value = div_scaled(&value, &(Decimal::one() + w), scale);
        doublings += 1;
    }

    let limit = Decimal::new(BigInt::one(), scale);
    let x2 = rescale(&value * &value, scale);
    let mut power = value.clone();
    let mut total = value;
    let mut k: u64 = 1;

    loop {
        power = rescale(&power * &x2, scale);
        let term = div_scaled(&power, &Decimal::from(2 * k + 1), scale);
        if term.abs() < limit {
            break;
        }

        if k % 2 == 1 {
            total -= &term;
        } else {
            total += &term;
        }
        k += 1;
    }

    total * Decimal::from(1u64 << doublings)
}

/// Full-quadrant arc tangent. `atan2(0, 0)` is defined as `0`.
pub(crate) fn atan2(y: &Decimal, x: &Decimal, ctx: &DecimalContext) -> Decimal {
    if x.is_zero() {
        if y.is_zero() {
            return Decimal::zero();
        }
        let half_pi = ctx.half_pi();
        return if y.is_negative() { -half_pi } else { half_pi };
    }

    let scale = work_scale(ctx);
    let ratio = div_scaled(y, x, scale);
    let a = atan_working(&ratio, ctx);

    if !x.is_negative() {
        ctx.round(a)
    } else if y.is_negative() {
        ctx.round(a - ctx.pi_working())
    } else {
        ctx.round(a + ctx.pi_working())
    }
}

/// Inverse cosine via `acos(x) = atan2(sqrt(1 − x²), x)`.
pub(crate) fn acos(x: &Decimal, ctx: &DecimalContext) -> Result<Decimal, NumericError> {
    if x.abs() > Decimal::one() {
        return Err(NumericError::AcosOutOfRange);
    }

    let s = sqrt_working(&rescale(Decimal::one() - x * x, work_scale(ctx)));
    Ok(atan2(&s, x, ctx))
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use crate::decimal::DecimalExt;

    // 100 digits of pi.
    const PI_100: &str =
        "3.141592653589793238462643383279502884197169399375105820974944592307816406286208998628034825342117068";

    fn tol(digits: i64) -> Decimal {
        Decimal::new(BigInt::one(), digits)
    }

    #[test]
    fn pi_80_digits() {
        let ctx = DecimalContext::default();
        let expected = Decimal::from_str(PI_100).unwrap();
        assert!(ctx.pi().fuzzy_eq(&expected, &tol(78)));
    }

    #[test]
    fn sin_cos_identity() {
        let ctx = DecimalContext::default();
        let x = Decimal::from_str("0.7").unwrap();
        let s = ctx.sin(&x);
        let c = ctx.cos(&x);
        let one = &s * &s + &c * &c;
        assert!(one.fuzzy_eq(&Decimal::one(), &tol(75)));
    }

    #[test]
    fn sin_known_values() {
        let ctx = DecimalContext::default();
        assert!(ctx.sin(&Decimal::zero()).is_zero());
        assert!(ctx.sin(&ctx.pi()).fuzzy_eq(&Decimal::zero(), &tol(75)));
        assert!(ctx.sin(&ctx.half_pi()).fuzzy_eq(&Decimal::one(), &tol(75)));
        assert!(ctx.cos(&ctx.pi()).fuzzy_eq(&Decimal::from(-1), &tol(75)));
    }

    #[test]
    fn sin_reduces_large_angles() {
        let ctx = DecimalContext::default();
        // sin(x + 2pi) == sin(x)
        let x = Decimal::from_str("1.25").unwrap();
        let shifted = &x + ctx.two_pi() * Decimal::from(7);
        assert!(ctx.sin(&shifted).fuzzy_eq(&ctx.sin(&x), &tol(70)));
    }

    #[test]
    fn atan_one_is_quarter_pi() {
        let ctx = DecimalContext::default();
        let quarter_pi = ctx.atan(&Decimal::one()) * Decimal::from(4);
        assert!(quarter_pi.fuzzy_eq(&ctx.pi(), &tol(75)));
    }

    #[test]
    fn atan2_quadrants() {
        let ctx = DecimalContext::default();
        let one = Decimal::one();

        assert!(ctx.atan2(&Decimal::zero(), &Decimal::zero()).is_zero());
        assert!(ctx.atan2(&one, &Decimal::zero()).fuzzy_eq(&ctx.half_pi(), &tol(75)));
        assert!(ctx
            .atan2(&Decimal::zero(), &-one.clone())
            .fuzzy_eq(&ctx.pi(), &tol(75)));

        // (-1, -1) -> -3pi/4
        let a = ctx.atan2(&-one.clone(), &-one.clone());
        let expected = ctx.pi() * Decimal::from_str("-0.75").unwrap();
        assert!(a.fuzzy_eq(&ctx.round(expected), &tol(75)));
    }

    #[test]
    fn acos_known_values() {
        let ctx = DecimalContext::default();
        assert!(ctx.acos(&Decimal::one()).unwrap().is_zero());
        assert!(ctx
            .acos(&Decimal::from(-1))
            .unwrap()
            .fuzzy_eq(&ctx.pi(), &tol(75)));
        assert!(ctx
            .acos(&Decimal::zero())
            .unwrap()
            .fuzzy_eq(&ctx.half_pi(), &tol(75)));

        assert_eq!(
            ctx.acos(&Decimal::from(2)).unwrap_err(),
            NumericError::AcosOutOfRange
        );
    }
}
