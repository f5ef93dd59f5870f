use std::num::NonZeroU64;

use bigdecimal::RoundingMode;
use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};
use once_cell::unsync::OnceCell;

use crate::trig;

/// The arbitrary-precision decimal used for every coordinate in this
/// workspace.
///
/// Addition, subtraction and multiplication are exact. Division, square
/// roots and trigonometry are rounded to a configurable precision by
/// [`DecimalContext`].
pub type Decimal = bigdecimal::BigDecimal;

/// The default number of significant digits.
pub const DEFAULT_PRECISION: u32 = 80;

/// The largest supported precision.
///
/// Bounded by the 100 significant digits `bigdecimal` computes for
/// division; advertising more would silently produce fewer.
pub const MAX_PRECISION: u32 = 100;

/// Extra digits carried by inexact operations before the final rounding.
pub(crate) const GUARD_DIGITS: u32 = 8;

/// List of all numeric evaluation errors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NumericError {
    /// Attempted to divide by zero.
    DivisionByZero,

    /// Attempted to take a square root of a negative number.
    NegativeSquareRoot,

    /// The inverse cosine is defined only on `[-1, 1]`.
    AcosOutOfRange,

    /// The requested precision is outside `[1, MAX_PRECISION]`.
    InvalidPrecision(u32),
}

impl std::fmt::Display for NumericError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            NumericError::DivisionByZero => {
                write!(f, "division by zero")
            }
            NumericError::NegativeSquareRoot => {
                write!(f, "square root of a negative number")
            }
            NumericError::AcosOutOfRange => {
                write!(f, "acos argument is outside [-1, 1]")
            }
            NumericError::InvalidPrecision(n) => {
                write!(f, "precision {} is outside [1, {}]", n, MAX_PRECISION)
            }
        }
    }
}

impl std::error::Error for NumericError {}

/// A decimal evaluation context.
///
/// Owns the precision setting and the constants derived from it.
/// Exact operations (`+`, `-`, `*`, comparisons) don't need it;
/// everything rounded does. Constructed once at operation entry and
/// passed down explicitly - there is no global precision state.
#[derive(Clone, Debug)]
pub struct DecimalContext {
    precision: u32,
    pi: OnceCell<Decimal>,
    kappa: OnceCell<Decimal>,
}

impl Default for DecimalContext {
    #[inline]
    fn default() -> Self {
        // `DEFAULT_PRECISION` is always in range.
        DecimalContext::new(DEFAULT_PRECISION).unwrap()
    }
}

impl DecimalContext {
    /// Creates a context with the specified number of significant digits.
    ///
    /// # Errors
    ///
    /// - `InvalidPrecision` when outside `[1, MAX_PRECISION]`
    pub fn new(precision: u32) -> Result<Self, NumericError> {
        if precision == 0 || precision > MAX_PRECISION {
            return Err(NumericError::InvalidPrecision(precision));
        }

        Ok(DecimalContext {
            precision,
            pi: OnceCell::new(),
            kappa: OnceCell::new(),
        })
    }

    /// Returns the configured precision.
    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    #[inline]
    pub(crate) fn working_precision(&self) -> u32 {
        self.precision + GUARD_DIGITS
    }

    /// The zero-test threshold: `1e-40`.
    #[inline]
    pub fn epsilon(&self) -> Decimal {
        Decimal::new(BigInt::one(), 40)
    }

    /// The default positional tolerance: `1e-10`.
    #[inline]
    pub fn tolerance(&self) -> Decimal {
        Decimal::new(BigInt::one(), 10)
    }

    /// Rounds a value to the context precision, half-up.
    #[inline]
    pub fn round(&self, value: Decimal) -> Decimal {
        value.with_precision_round(
            NonZeroU64::new(u64::from(self.precision)).unwrap(),
            RoundingMode::HalfUp,
        )
    }

    /// Divides `a` by `b` at the context precision.
    ///
    /// # Errors
    ///
    /// - `DivisionByZero`
    pub fn div(&self, a: &Decimal, b: &Decimal) -> Result<Decimal, NumericError> {
        if b.is_zero() {
            return Err(NumericError::DivisionByZero);
        }

        Ok(self.round(a / b))
    }

    /// Computes the square root of `a` at the context precision.
    ///
    /// # Errors
    ///
    /// - `NegativeSquareRoot`
    pub fn sqrt(&self, a: &Decimal) -> Result<Decimal, NumericError> {
        match a.sqrt() {
            Some(root) => Ok(self.round(root)),
            None => Err(NumericError::NegativeSquareRoot),
        }
    }

    /// π at working precision, for internal consumers.
    #[inline]
    pub(crate) fn pi_working(&self) -> Decimal {
        self.pi.get_or_init(|| trig::compute_pi(self)).clone()
    }

    /// π, computed once per context via Machin's formula.
    pub fn pi(&self) -> Decimal {
        self.round(self.pi_working())
    }

    /// 2π.
    pub fn two_pi(&self) -> Decimal {
        self.round(self.pi_working() * Decimal::from(2))
    }

    /// π/2.
    pub fn half_pi(&self) -> Decimal {
        // Halving is exact: multiply by 0.5.
        self.round(self.pi_working() * Decimal::new(BigInt::from(5), 1))
    }

    /// The quarter-circle Bezier constant: `4·(√2 − 1)/3`.
    pub fn kappa(&self) -> Decimal {
        self.kappa
            .get_or_init(|| {
                // `sqrt(2)` and the division by 3 cannot fail.
                let sqrt2 = self.sqrt(&Decimal::from(2)).unwrap();
                let n = (sqrt2 - Decimal::one()) * Decimal::from(4);
                self.div(&n, &Decimal::from(3)).unwrap()
            })
            .clone()
    }

    /// Converts an angle in degrees to radians.
    pub fn deg_to_rad(&self, degrees: &Decimal) -> Decimal {
        self.div(&(degrees * self.pi_working()), &Decimal::from(180))
            .unwrap()
    }

    /// Computes `sin(x)` (x in radians) at the context precision.
    pub fn sin(&self, x: &Decimal) -> Decimal {
        trig::sin(x, self)
    }

    /// Computes `cos(x)` (x in radians) at the context precision.
    pub fn cos(&self, x: &Decimal) -> Decimal {
        trig::cos(x, self)
    }

    /// Computes `atan(x)` at the context precision.
    pub fn atan(&self, x: &Decimal) -> Decimal {
        trig::atan(x, self)
    }

    /// Computes `atan2(y, x)` at the context precision.
    ///
    /// `atan2(0, 0)` is defined as `0`.
    pub fn atan2(&self, y: &Decimal, x: &Decimal) -> Decimal {
        trig::atan2(y, x, self)
    }

    /// Computes `acos(x)` at the context precision.
    ///
    /// # Errors
    ///
    /// - `AcosOutOfRange`
    pub fn acos(&self, x: &Decimal) -> Result<Decimal, NumericError> {
        trig::acos(x, self)
    }
}

/// A trait for fuzzy/approximate equality comparisons of decimals.
pub trait DecimalExt {
    /// Returns `true` if values are equal within `tolerance`.
    fn fuzzy_eq(&self, other: &Decimal, tolerance: &Decimal) -> bool;

    /// Returns `true` if the value is zero within `epsilon`.
    fn is_near_zero(&self, epsilon: &Decimal) -> bool;
}

impl DecimalExt for Decimal {
    #[inline]
    fn fuzzy_eq(&self, other: &Decimal, tolerance: &Decimal) -> bool {
        (self - other).abs() <= *tolerance
    }

    #[inline]
    fn is_near_zero(&self, epsilon: &Decimal) -> bool {
        self.abs() <= *epsilon
    }
}

/// Writes a decimal in plain (non-scientific) notation
/// without trailing zeros.
pub fn to_plain_string(value: &Decimal) -> String {
    let (int, scale) = value.normalized().as_bigint_and_exponent();

    if int.is_zero() {
        return "0".to_string();
    }

    let negative = int.sign() == Sign::Minus;
    let digits = int.magnitude().to_string();

    let mut out = String::with_capacity(digits.len() + 4);
    if negative {
        out.push('-');
    }

    if scale <= 0 {
        out.push_str(&digits);
        for _ in 0..(-scale) {
            out.push('0');
        }
    } else if (digits.len() as i64) > scale {
        let split = digits.len() - scale as usize;
        out.push_str(&digits[..split]);
        out.push('.');
        out.push_str(&digits[split..]);
    } else {
        out.push_str("0.");
        for _ in 0..(scale - digits.len() as i64) {
            out.push('0');
        }
        out.push_str(&digits);
    }

    out
}

/// Rounds a decimal to `fraction_digits` digits after the point, half-up.
pub fn round_half_up(value: &Decimal, fraction_digits: u8) -> Decimal {
    value.with_scale_round(i64::from(fraction_digits), RoundingMode::HalfUp)
}

/// Rounds a decimal to `fraction_digits` digits after the point, half-up,
/// and formats it with trailing zeros stripped.
///
/// Integers are written without a decimal point and `-0` becomes `0`.
pub fn format_decimal(value: &Decimal, fraction_digits: u8) -> String {
    to_plain_string(&round_half_up(value, fraction_digits))
}

/// Like [`format_decimal`], but in minified form the redundant integer
/// zero is dropped as well: `0.5` becomes `.5` and `-0.5` becomes `-.5`.
pub fn write_coordinate(value: &Decimal, fraction_digits: u8, minify: bool) -> String {
    let s = format_decimal(value, fraction_digits);

    if minify {
        if let Some(rest) = s.strip_prefix("0.") {
            return format!(".{}", rest);
        }
        if let Some(rest) = s.strip_prefix("-0.") {
            return format!("-.{}", rest);
        }
    }

    s
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    macro_rules! test_format {
        ($name:ident, $text:expr, $digits:expr, $result:expr) => (
            #[test]
            fn $name() {
                let d = Decimal::from_str($text).unwrap();
                assert_eq!(format_decimal(&d, $digits), $result);
            }
        )
    }

    test_format!(format_1,  "10",        3, "10");
    test_format!(format_2,  "10.000",    3, "10");
    test_format!(format_3,  "10.1234",   3, "10.123");
    test_format!(format_4,  "10.1235",   3, "10.124");
    test_format!(format_5,  "-10.1235",  3, "-10.124");
    test_format!(format_6,  "0.5",       3, "0.5");
    test_format!(format_7,  "-0.0001",   3, "0");
    test_format!(format_8,  "0",         3, "0");
    test_format!(format_9,  "0.0005",    3, "0.001");
    test_format!(format_10, "400",       0, "400");
    test_format!(format_11, "1e3",       3, "1000");
    test_format!(format_12, "123.450",   6, "123.45");

    #[test]
    fn coordinate_minify() {
        let d = Decimal::from_str("0.5").unwrap();
        assert_eq!(write_coordinate(&d, 3, true), ".5");

        let d = Decimal::from_str("-0.5").unwrap();
        assert_eq!(write_coordinate(&d, 3, true), "-.5");

        let d = Decimal::from_str("10.5").unwrap();
        assert_eq!(write_coordinate(&d, 3, true), "10.5");
    }

    #[test]
    fn precision_bounds() {
        assert!(DecimalContext::new(0).is_err());
        assert!(DecimalContext::new(MAX_PRECISION + 1).is_err());
        assert_eq!(DecimalContext::new(1).unwrap().precision(), 1);
        assert_eq!(DecimalContext::default().precision(), DEFAULT_PRECISION);
    }

    #[test]
    fn division() {
        let ctx = DecimalContext::default();
        let one = Decimal::from(1);
        let three = Decimal::from(3);

        assert_eq!(
            ctx.div(&one, &Decimal::from(0)).unwrap_err(),
            NumericError::DivisionByZero
        );

        let third = ctx.div(&one, &three).unwrap();
        // 80 significant digits of 1/3.
        let expected = format!("0.{}", "3".repeat(80));
        assert_eq!(to_plain_string(&third), expected);
    }

    #[test]
    fn square_root() {
        let ctx = DecimalContext::default();
        assert_eq!(
            ctx.sqrt(&Decimal::from(-1)).unwrap_err(),
            NumericError::NegativeSquareRoot
        );

        let root = ctx.sqrt(&Decimal::from(2)).unwrap();
        let squared = ctx.round(&root * &root);
        assert!(squared.fuzzy_eq(&Decimal::from(2), &ctx.epsilon()));
    }

    #[test]
    fn kappa_value() {
        let ctx = DecimalContext::default();
        // kappa = 4*(sqrt(2) - 1)/3 = 0.5522847...
        let kappa = ctx.kappa();
        let approx = Decimal::from_str("0.55228474983079339840225163227959743809289583383086").unwrap();
        assert!(kappa.fuzzy_eq(&approx, &Decimal::new(num_bigint::BigInt::from(1), 45)));
    }

    #[test]
    fn exact_addition_is_commutative() {
        let a = Decimal::from_str("0.1").unwrap();
        let b = Decimal::from_str("0.2").unwrap();
        assert_eq!(&a + &b, &b + &a);
        assert_eq!(&a + &b, Decimal::from_str("0.3").unwrap());
    }
}
