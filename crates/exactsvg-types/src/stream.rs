use std::str::FromStr;

use crate::{Decimal, Error};

/// Extension methods for XML-subset only operations.
pub(crate) trait ByteExt {
    /// Checks if a byte is a numeric sign.
    fn is_sign(&self) -> bool;

    /// Checks if a byte is a digit.
    ///
    /// `[0-9]`
    fn is_digit(&self) -> bool;

    /// Checks if a byte is a hex digit.
    ///
    /// `[0-9A-Fa-f]`
    fn is_hex_digit(&self) -> bool;

    /// Checks if a byte is a space.
    ///
    /// `[ \r\n\t]`
    fn is_space(&self) -> bool;

    /// Checks if a byte is an ASCII char.
    ///
    /// `[A-Za-z]`
    fn is_letter(&self) -> bool;
}

impl ByteExt for u8 {
    #[inline]
    fn is_sign(&self) -> bool {
        matches!(*self, b'+' | b'-')
    }

    #[inline]
    fn is_digit(&self) -> bool {
        matches!(*self, b'0'..=b'9')
    }

    #[inline]
    fn is_hex_digit(&self) -> bool {
        matches!(*self, b'0'..=b'9' | b'A'..=b'F' | b'a'..=b'f')
    }

    #[inline]
    fn is_space(&self) -> bool {
        matches!(*self, b' ' | b'\t' | b'\n' | b'\r')
    }

    #[inline]
    fn is_letter(&self) -> bool {
        matches!(*self, b'A'..=b'Z' | b'a'..=b'z')
    }
}

/// A streaming text parsing interface.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Stream<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> From<&'a str> for Stream<'a> {
    #[inline]
    fn from(text: &'a str) -> Self {
        Stream { text, pos: 0 }
    }
}

impl<'a> Stream<'a> {
    /// Returns the current position in bytes.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Calculates the current position in chars.
    pub fn calc_char_pos(&self) -> usize {
        self.calc_char_pos_at(self.pos)
    }

    /// Calculates the position of `byte_pos` in chars.
    pub fn calc_char_pos_at(&self, byte_pos: usize) -> usize {
        let mut pos = 1;
        for (idx, _) in self.text.char_indices() {
            if idx >= byte_pos {
                break;
            }

            pos += 1;
        }

        pos
    }

    /// Sets current position equal to the end.
    ///
    /// Used to indicate end of parsing on error.
    #[inline]
    pub fn jump_to_end(&mut self) {
        self.pos = self.text.len();
    }

    /// Checks if the stream reached the end.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Returns a byte from a current stream position.
    ///
    /// # Errors
    ///
    /// - `UnexpectedEndOfStream`
    #[inline]
    pub fn curr_byte(&self) -> Result<u8, Error> {
        if self.at_end() {
            return Err(Error::UnexpectedEndOfStream);
        }

        Ok(self.curr_byte_unchecked())
    }

    /// Returns a byte from a current stream position.
    ///
    /// # Panics
    ///
    /// - if the current position is after the end of the data
    #[inline]
    pub fn curr_byte_unchecked(&self) -> u8 {
        self.text.as_bytes()[self.pos]
    }

    /// Checks that current byte is equal to provided.
    ///
    /// Returns `false` if no bytes left.
    #[inline]
    pub fn is_curr_byte_eq(&self, c: u8) -> bool {
        if !self.at_end() {
            self.curr_byte_unchecked() == c
        } else {
            false
        }
    }

    /// Returns a next byte from a current stream position.
    ///
    /// # Errors
    ///
    /// - `UnexpectedEndOfStream`
    #[inline]
    pub fn next_byte(&self) -> Result<u8, Error> {
        if self.pos + 1 >= self.text.len() {
            return Err(Error::UnexpectedEndOfStream);
        }

        Ok(self.text.as_bytes()[self.pos + 1])
    }

    /// Advances by `n` bytes.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.text.len());
        self.pos += n;
    }

    /// Skips whitespaces.
    ///
    /// Accepted values: `' ' \n \r \t`.
    pub fn skip_spaces(&mut self) {
        while !self.at_end() && self.curr_byte_unchecked().is_space() {
            self.advance(1);
        }
    }

    /// Checks that the stream starts with a selected text.
    ///
    /// We are using `&[u8]` instead of `&str` for performance reasons.
    #[inline]
    pub fn starts_with(&self, text: &[u8]) -> bool {
        self.text.as_bytes()[self.pos..].starts_with(text)
    }

    /// Consumes current byte if it's equal to the provided byte.
    ///
    /// # Errors
    ///
    /// - `InvalidChar`
    /// - `UnexpectedEndOfStream`
    pub fn consume_byte(&mut self, c: u8) -> Result<(), Error> {
        if self.curr_byte()? != c {
            return Err(Error::InvalidChar(
                vec![self.curr_byte_unchecked(), c],
                self.calc_char_pos(),
            ));
        }

        self.advance(1);
        Ok(())
    }

    /// Consumes bytes by the predicate and returns them.
    ///
    /// The result can be empty.
    pub fn consume_bytes<F>(&mut self, f: F) -> &'a str
    where
        F: Fn(&Stream, u8) -> bool,
    {
        let start = self.pos();
        self.skip_bytes(f);
        self.slice_back(start)
    }

    /// Consumes bytes by the predicate.
    pub fn skip_bytes<F>(&mut self, f: F)
    where
        F: Fn(&Stream, u8) -> bool,
    {
        while !self.at_end() {
            let c = self.curr_byte_unchecked();
            if f(self, c) {
                self.advance(1);
            } else {
                break;
            }
        }
    }

    /// Slices data from `pos` to the current position.
    #[inline]
    pub fn slice_back(&self, pos: usize) -> &'a str {
        &self.text[pos..self.pos]
    }

    /// Slices data from the current position to the end.
    #[inline]
    pub fn slice_tail(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Skips digits.
    pub fn skip_digits(&mut self) {
        self.skip_bytes(|_, c| c.is_digit());
    }

    #[inline]
    pub(crate) fn parse_list_separator(&mut self) {
        if self.is_curr_byte_eq(b',') {
            self.advance(1);
        }
    }

    /// Parses a decimal number from the stream.
    ///
    /// Accepts the [SVG number grammar]: an optional sign, an integer part,
    /// a fractional part and a scientific exponent. `.5`, `5.` and `-.5e2`
    /// are all valid. The token is converted losslessly, no float round-trip
    /// is involved.
    ///
    /// [SVG number grammar]: https://www.w3.org/TR/SVG2/paths.html#PathDataBNF
    ///
    /// # Errors
    ///
    /// - `InvalidNumber`
    pub fn parse_decimal(&mut self) -> Result<Decimal, Error> {
        self.skip_spaces();

        let start = self.pos();

        if self.at_end() {
            return Err(Error::InvalidNumber(self.calc_char_pos_at(start)));
        }

        self.parse_decimal_impl()
            .map_err(|_| Error::InvalidNumber(self.calc_char_pos_at(start)))
    }

    fn parse_decimal_impl(&mut self) -> Result<Decimal, Error> {
        let start = self.pos();

        let mut c = self.curr_byte()?;

        // Consume sign.
        if c.is_sign() {
            self.advance(1);
            c = self.curr_byte()?;
        }

        // Consume integer.
        match c {
            b'0'..=b'9' => self.skip_digits(),
            b'.' => {}
            _ => return Err(Error::InvalidNumber(0)),
        }

        // Consume fraction.
        if let Ok(b'.') = self.curr_byte() {
            self.advance(1);
            self.skip_digits();
        }

        if let Ok(c) = self.curr_byte() {
            if matches!(c, b'e' | b'E') {
                let c2 = self.next_byte()?;
                // Check for `em`/`ex`.
                if c2 != b'm' && c2 != b'x' {
                    self.advance(1);

                    match self.curr_byte()? {
                        b'+' | b'-' => {
                            self.advance(1);
                            self.skip_digits();
                        }
                        b'0'..=b'9' => self.skip_digits(),
                        _ => {
                            return Err(Error::InvalidNumber(0));
                        }
                    }
                }
            }
        }

        let text = self.slice_back(start);
        parse_decimal_token(text).ok_or(Error::InvalidNumber(0))
    }

    /// Parses a decimal from a list of numbers.
    ///
    /// # Errors
    ///
    /// - `InvalidNumber`
    /// - `UnexpectedEndOfStream`
    pub fn parse_list_decimal(&mut self) -> Result<Decimal, Error> {
        if self.at_end() {
            return Err(Error::UnexpectedEndOfStream);
        }

        let n = self.parse_decimal()?;
        self.skip_spaces();
        self.parse_list_separator();
        Ok(n)
    }
}

/// Converts a raw, already validated number token into a `Decimal`.
///
/// `BigDecimal::from_str` rejects tokens like `.5` or `5.`,
/// so the token is normalized first.
fn parse_decimal_token(text: &str) -> Option<Decimal> {
    debug_assert!(!text.is_empty());

    let mut normalized = String::with_capacity(text.len() + 1);
    let mut bytes = text.bytes().peekable();

    if let Some(&c) = bytes.peek() {
        if c.is_sign() {
            if c == b'-' {
                normalized.push('-');
            }
            bytes.next();
        }
    }

    // A leading point needs an explicit integer part.
    if bytes.peek() == Some(&b'.') {
        normalized.push('0');
    }

    let mut prev = b'0';
    for c in bytes {
        // A trailing point before the exponent (or the end) is dropped.
        if prev == b'.' && !c.is_digit() {
            normalized.pop();
        }
        normalized.push(c as char);
        prev = c;
    }
    if normalized.ends_with('.') {
        normalized.pop();
    }
    if normalized.is_empty() || normalized == "-" {
        return None;
    }

    Decimal::from_str(&normalized).ok()
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_number {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                let mut s = Stream::from($text);
                assert_eq!(s.parse_decimal().unwrap(), Decimal::from_str($result).unwrap());
            }
        )
    }

    test_number!(number_1,  "10",       "10");
    test_number!(number_2,  "10.5",     "10.5");
    test_number!(number_3,  ".5",       "0.5");
    test_number!(number_4,  "-.5",      "-0.5");
    test_number!(number_5,  "-10",      "-10");
    test_number!(number_6,  "+10",      "10");
    test_number!(number_7,  "10e2",     "1000");
    test_number!(number_8,  "10e-2",    "0.1");
    test_number!(number_9,  "10.5e-2",  "0.105");
    test_number!(number_10, "5.",       "5");
    test_number!(number_11, "-.5e1",    "-5");
    test_number!(number_12, "0.0000000000000000000000000000000000000001",
                            "1e-40");

    macro_rules! test_number_err {
        ($name:ident, $text:expr) => (
            #[test]
            fn $name() {
                let mut s = Stream::from($text);
                assert!(s.parse_decimal().is_err());
            }
        )
    }

    test_number_err!(number_err_1, "q");
    test_number_err!(number_err_2, "");
    test_number_err!(number_err_3, "-");
    test_number_err!(number_err_4, "+");
    test_number_err!(number_err_5, "-q");
    test_number_err!(number_err_6, ".");
    test_number_err!(number_err_7, "1e99999999999999999999999");

    #[test]
    fn number_exact_digits() {
        // The token must survive with all of its digits intact.
        let text = "3.14159265358979323846264338327950288419716939937510582097494459230781640628620899";
        let mut s = Stream::from(text);
        let n = s.parse_decimal().unwrap();
        assert_eq!(crate::decimal::to_plain_string(&n), text);
    }

    #[test]
    fn list_1() {
        let mut s = Stream::from("10 20,  30");
        assert_eq!(s.parse_list_decimal().unwrap(), Decimal::from(10));
        assert_eq!(s.parse_list_decimal().unwrap(), Decimal::from(20));
        assert_eq!(s.parse_list_decimal().unwrap(), Decimal::from(30));
        assert!(s.at_end());
    }
}
