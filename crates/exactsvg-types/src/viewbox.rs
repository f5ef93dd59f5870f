use num_traits::Zero;

use crate::{decimal, Decimal, Stream};

/// List of possible [`ViewBox`] parsing errors.
#[derive(Clone, Copy, Debug)]
pub enum ViewBoxError {
    /// One of the numbers is invalid.
    InvalidNumber,

    /// A viewBox must contain exactly four numbers.
    InvalidNumberCount,

    /// ViewBox has a negative or zero size.
    InvalidSize,
}

impl std::fmt::Display for ViewBoxError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ViewBoxError::InvalidNumber => {
                write!(f, "viewBox contains an invalid number")
            }
            ViewBoxError::InvalidNumberCount => {
                write!(f, "viewBox must contain exactly four numbers")
            }
            ViewBoxError::InvalidSize => {
                write!(f, "viewBox width and height must be positive")
            }
        }
    }
}

impl std::error::Error for ViewBoxError {
    fn description(&self) -> &str {
        "a viewBox parsing error"
    }
}

/// Representation of the [`<viewBox>`] type.
///
/// [`<viewBox>`]: https://www.w3.org/TR/SVG2/coords.html#ViewBoxAttribute
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct ViewBox {
    pub x: Decimal,
    pub y: Decimal,
    pub w: Decimal,
    pub h: Decimal,

    /// Set when the canonical form of the parsed value round-trips.
    pub verified: bool,
}

impl ViewBox {
    /// Creates a new `ViewBox`.
    ///
    /// Returns `None` for a non-positive size.
    pub fn new(x: Decimal, y: Decimal, w: Decimal, h: Decimal) -> Option<Self> {
        if w <= Decimal::zero() || h <= Decimal::zero() {
            return None;
        }

        Some(ViewBox {
            x,
            y,
            w,
            h,
            verified: true,
        })
    }

    /// Parses a viewBox from a string of four numbers separated
    /// by whitespace and/or commas.
    pub fn parse(text: &str) -> Result<Self, ViewBoxError> {
        let mut vb = Self::parse_impl(text)?;
        vb.verified = vb.verify();
        Ok(vb)
    }

    fn parse_impl(text: &str) -> Result<Self, ViewBoxError> {
        let mut s = Stream::from(text);

        let x = s
            .parse_list_decimal()
            .map_err(|_| ViewBoxError::InvalidNumber)?;
        let y = s
            .parse_list_decimal()
            .map_err(|_| ViewBoxError::InvalidNumber)?;
        let w = s
            .parse_list_decimal()
            .map_err(|_| ViewBoxError::InvalidNumber)?;
        let h = s
            .parse_list_decimal()
            .map_err(|_| ViewBoxError::InvalidNumber)?;

        s.skip_spaces();
        if !s.at_end() {
            return Err(ViewBoxError::InvalidNumberCount);
        }

        if w <= Decimal::zero() || h <= Decimal::zero() {
            return Err(ViewBoxError::InvalidSize);
        }

        Ok(ViewBox {
            x,
            y,
            w,
            h,
            verified: false,
        })
    }

    /// Writes the viewBox back in its canonical, space-separated form.
    pub fn to_canonical_string(&self) -> String {
        format!(
            "{} {} {} {}",
            decimal::to_plain_string(&self.x),
            decimal::to_plain_string(&self.y),
            decimal::to_plain_string(&self.w),
            decimal::to_plain_string(&self.h)
        )
    }

    /// Re-derives the value from its canonical string and compares.
    fn verify(&self) -> bool {
        match Self::parse_impl(&self.to_canonical_string()) {
            Ok(other) => {
                self.x == other.x && self.y == other.y && self.w == other.w && self.h == other.h
            }
            Err(_) => false,
        }
    }
}

impl std::str::FromStr for ViewBox {
    type Err = ViewBoxError;

    #[inline]
    fn from_str(text: &str) -> Result<Self, ViewBoxError> {
        ViewBox::parse(text)
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $x:expr, $y:expr, $w:expr, $h:expr) => (
            #[test]
            fn $name() {
                let v = ViewBox::parse($text).unwrap();
                assert_eq!(v.x, Decimal::from($x));
                assert_eq!(v.y, Decimal::from($y));
                assert_eq!(v.w, Decimal::from($w));
                assert_eq!(v.h, Decimal::from($h));
                assert!(v.verified);
            }
        )
    }

    test!(parse_1, "-20 30 100 500", -20, 30, 100, 500);
    test!(parse_2, "0 0 100 100", 0, 0, 100, 100);
    test!(parse_3, "0,0,100,100", 0, 0, 100, 100);
    test!(parse_4, " 0 , 0 , 100 100 ", 0, 0, 100, 100);

    macro_rules! test_err {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(ViewBox::parse($text).unwrap_err().to_string(), $result);
            }
        )
    }

    test_err!(parse_err_1, "qwe", "viewBox contains an invalid number");
    test_err!(parse_err_2, "10 20 30 0", "viewBox width and height must be positive");
    test_err!(parse_err_3, "10 20 0 40", "viewBox width and height must be positive");
    test_err!(parse_err_4, "10 20 -30 40", "viewBox width and height must be positive");
    test_err!(parse_err_5, "0 0 100 100 1", "viewBox must contain exactly four numbers");
    test_err!(parse_err_6, "0 0 100", "viewBox contains an invalid number");

    #[test]
    fn canonical_string() {
        let v = ViewBox::parse("0,0,  100.50,100").unwrap();
        assert_eq!(v.to_canonical_string(), "0 0 100.5 100");
    }
}
