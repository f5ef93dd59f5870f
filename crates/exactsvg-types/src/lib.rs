/*!
*exactsvg-types* is a collection of parsers for [SVG](https://www.w3.org/TR/SVG2/) types
that keep every number as an arbitrary-precision decimal.

## Supported SVG types

- [`<number>`](https://www.w3.org/TR/SVG2/types.html#InterfaceSVGNumber)
- [`<length>`](https://www.w3.org/TR/SVG2/types.html#InterfaceSVGLength)
- [`<viewBox>`](https://www.w3.org/TR/SVG2/coords.html#ViewBoxAttribute)
- [`<path>`](https://www.w3.org/TR/SVG2/paths.html#PathData)
- [`<list-of-points>`](https://www.w3.org/TR/SVG11/shapes.html#PointsBNF)
- [`<color>`](https://www.w3.org/TR/css-color-3/) (validity checking)

## Features

- Complete support of paths, so data like `M10-20A5.5.3-4 110-.1` will be parsed correctly.
- Implicit path commands will be automatically converted into explicit one.
- Coordinates survive parsing digit for digit: there is no `f64` round-trip anywhere.
- A decimal evaluation context with configurable precision (default 80 significant
  digits), half-up rounding and exact comparisons, including square roots and
  trigonometry for the geometry layer.

## Limitations

- Accepts only [normalized](https://www.w3.org/TR/REC-xml/#AVNormalize) values,
  e.g. an input text should not contain `&#x20;` or `&data;`.
- Keywords must be lowercase. Case-insensitive parsing is supported only for
  colors and length units.

## Safety

- The library should not panic. Any panic considered as a critical bug and should be reported.
- The library forbids unsafe code.
*/

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

/// Arbitrary-precision decimal type and evaluation context.
pub mod decimal;

mod color;
mod error;
mod length;
mod path;
mod points;
mod stream;
mod trig;
mod viewbox;

pub use color::{is_valid_color, NAMED_COLORS};
pub use decimal::{
    format_decimal, round_half_up, to_plain_string, write_coordinate, Decimal, DecimalContext,
    DecimalExt, NumericError, DEFAULT_PRECISION, MAX_PRECISION,
};
pub use error::Error;
pub use length::{has_unit_suffix, Length, LengthUnit};
pub use path::{parse_path, write_path, PathParser, PathSegment, WriteOptions};
pub use points::{parse_points, PointsParser};
pub use stream::Stream;
pub use viewbox::{ViewBox, ViewBoxError};
