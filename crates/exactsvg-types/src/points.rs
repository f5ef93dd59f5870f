use crate::{Decimal, Error, Stream};

/// A pull-based parser for the `points` attribute of
/// `polyline` and `polygon` elements.
///
/// Stops silently on the first invalid token, like renderers do;
/// use [`parse_points`] for a strict variant.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PointsParser<'a>(Stream<'a>);

impl<'a> From<&'a str> for PointsParser<'a> {
    #[inline]
    fn from(text: &'a str) -> Self {
        PointsParser(Stream::from(text))
    }
}

impl<'a> Iterator for PointsParser<'a> {
    type Item = (Decimal, Decimal);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.skip_spaces();

        if self.0.at_end() {
            return None;
        }

        let x = self.0.parse_list_decimal().ok()?;
        let y = self.0.parse_list_decimal().ok()?;

        Some((x, y))
    }
}

/// Strictly parses a point list.
///
/// # Errors
///
/// - `InvalidNumber` on a malformed token
/// - `UnexpectedEndOfStream` on an odd number of coordinates
pub fn parse_points(text: &str) -> Result<Vec<(Decimal, Decimal)>, Error> {
    let mut s = Stream::from(text);
    let mut points = Vec::new();

    loop {
        s.skip_spaces();
        if s.at_end() {
            break;
        }

        let x = s.parse_list_decimal()?;
        let y = s.parse_list_decimal()?;
        points.push((x, y));
    }

    Ok(points)
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_1() {
        let points: Vec<_> = PointsParser::from("10 20 30 40").collect();
        assert_eq!(points, vec![
            (Decimal::from(10), Decimal::from(20)),
            (Decimal::from(30), Decimal::from(40)),
        ]);
    }

    #[test]
    fn parse_2() {
        let points: Vec<_> = PointsParser::from("10,20 30,40").collect();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn odd_coordinate_is_discarded() {
        let points: Vec<_> = PointsParser::from("10 20 30").collect();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn strict_odd_coordinate_is_an_error() {
        assert!(parse_points("10 20 30").is_err());
    }

    #[test]
    fn strict_garbage_is_an_error() {
        assert!(parse_points("10 20 q 40").is_err());
    }
}
