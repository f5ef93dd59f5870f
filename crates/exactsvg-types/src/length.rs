use std::str::FromStr;

use crate::{Decimal, Error, Stream};

/// List of all length units.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum LengthUnit {
    None,
    Percent,
    Em,
    Rem,
    Ex,
    Ch,
    Px,
    In,
    Cm,
    Mm,
    Pt,
    Pc,
    Q,
    Vw,
    Vh,
    VMin,
    VMax,
}

impl LengthUnit {
    /// Resolves a unit from its suffix, case-insensitively.
    ///
    /// An empty suffix is `None`.
    pub fn from_suffix(text: &str) -> Option<LengthUnit> {
        // The longest suffix is 4 bytes; avoid allocating for the rest.
        let mut buf = [0u8; 4];
        if text.len() > buf.len() {
            return None;
        }
        for (i, c) in text.bytes().enumerate() {
            buf[i] = c.to_ascii_lowercase();
        }

        let unit = match &buf[..text.len()] {
            b"" => LengthUnit::None,
            b"%" => LengthUnit::Percent,
            b"em" => LengthUnit::Em,
            b"rem" => LengthUnit::Rem,
            b"ex" => LengthUnit::Ex,
            b"ch" => LengthUnit::Ch,
            b"px" => LengthUnit::Px,
            b"in" => LengthUnit::In,
            b"cm" => LengthUnit::Cm,
            b"mm" => LengthUnit::Mm,
            b"pt" => LengthUnit::Pt,
            b"pc" => LengthUnit::Pc,
            b"q" => LengthUnit::Q,
            b"vw" => LengthUnit::Vw,
            b"vh" => LengthUnit::Vh,
            b"vmin" => LengthUnit::VMin,
            b"vmax" => LengthUnit::VMax,
            _ => return None,
        };

        Some(unit)
    }

    /// The canonical (lowercase) suffix.
    pub fn to_suffix(self) -> &'static str {
        match self {
            LengthUnit::None => "",
            LengthUnit::Percent => "%",
            LengthUnit::Em => "em",
            LengthUnit::Rem => "rem",
            LengthUnit::Ex => "ex",
            LengthUnit::Ch => "ch",
            LengthUnit::Px => "px",
            LengthUnit::In => "in",
            LengthUnit::Cm => "cm",
            LengthUnit::Mm => "mm",
            LengthUnit::Pt => "pt",
            LengthUnit::Pc => "pc",
            LengthUnit::Q => "q",
            LengthUnit::Vw => "vw",
            LengthUnit::Vh => "vh",
            LengthUnit::VMin => "vmin",
            LengthUnit::VMax => "vmax",
        }
    }
}

/// Representation of the `<length>` type.
///
/// Callers that must preserve units-bearing values verbatim keep the
/// original text around; this type only classifies it.
#[derive(Clone, PartialEq, Debug)]
pub struct Length {
    /// The numeric part.
    pub number: Decimal,
    /// The unit suffix.
    pub unit: LengthUnit,
}

impl Length {
    /// Constructs a new length.
    #[inline]
    pub fn new(number: Decimal, unit: LengthUnit) -> Length {
        Length { number, unit }
    }

    /// Constructs a new unit-less length.
    #[inline]
    pub fn new_number(number: Decimal) -> Length {
        Length {
            number,
            unit: LengthUnit::None,
        }
    }

    /// Constructs a zero length.
    #[inline]
    pub fn zero() -> Length {
        Length::new_number(Decimal::from(0))
    }

    /// Checks if the value carries a unit suffix.
    #[inline]
    pub fn has_unit(&self) -> bool {
        self.unit != LengthUnit::None
    }
}

impl Default for Length {
    #[inline]
    fn default() -> Self {
        Length::zero()
    }
}

impl std::str::FromStr for Length {
    type Err = Error;

    #[inline]
    fn from_str(text: &str) -> Result<Self, Error> {
        let mut s = Stream::from(text);
        let l = s.parse_length()?;

        s.skip_spaces();
        if !s.at_end() {
            return Err(Error::UnexpectedData(s.calc_char_pos()));
        }

        Ok(l)
    }
}

impl<'a> Stream<'a> {
    /// Parses a length from the stream.
    ///
    /// Unit suffixes are matched case-insensitively.
    pub fn parse_length(&mut self) -> Result<Length, Error> {
        self.skip_spaces();

        let number = self.parse_decimal()?;

        let start = self.pos();
        if self.is_curr_byte_eq(b'%') {
            self.advance(1);
        } else {
            self.skip_bytes(|_, c| c.is_ascii_alphabetic());
        }
        let suffix = self.slice_back(start);

        match LengthUnit::from_suffix(suffix) {
            Some(unit) => Ok(Length::new(number, unit)),
            None => Err(Error::UnexpectedData(self.calc_char_pos_at(start))),
        }
    }
}

/// Checks if a value ends with a recognized unit suffix.
///
/// Used by numeric passes to leave such values untouched.
pub fn has_unit_suffix(text: &str) -> bool {
    match Length::from_str(text.trim()) {
        Ok(l) => l.has_unit(),
        Err(_) => false,
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $number:expr, $unit:expr) => (
            #[test]
            fn $name() {
                let l = Length::from_str($text).unwrap();
                assert_eq!(l.number, Decimal::from_str($number).unwrap());
                assert_eq!(l.unit, $unit);
            }
        )
    }

    test!(parse_1,  "1",      "1",   LengthUnit::None);
    test!(parse_2,  "1.5em",  "1.5", LengthUnit::Em);
    test!(parse_3,  "10%",    "10",  LengthUnit::Percent);
    test!(parse_4,  "-10px",  "-10", LengthUnit::Px);
    test!(parse_5,  "10PX",   "10",  LengthUnit::Px);
    test!(parse_6,  "1rem",   "1",   LengthUnit::Rem);
    test!(parse_7,  "2vmin",  "2",   LengthUnit::VMin);
    test!(parse_8,  "3Q",     "3",   LengthUnit::Q);
    test!(parse_9,  "1e2cm",  "100", LengthUnit::Cm);
    test!(parse_10, "1ex",    "1",   LengthUnit::Ex);

    #[test]
    fn parse_err_1() {
        assert!(Length::from_str("1q2").is_err());
        assert!(Length::from_str("1zz").is_err());
        assert!(Length::from_str("px").is_err());
    }

    #[test]
    fn unit_suffix_detection() {
        assert!(has_unit_suffix("10px"));
        assert!(has_unit_suffix("10%"));
        assert!(!has_unit_suffix("10"));
        assert!(!has_unit_suffix("abc"));
    }
}
