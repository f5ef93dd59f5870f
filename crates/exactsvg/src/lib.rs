// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
*exactsvg* is an SVG optimization and validation toolkit.

Its distinguishing property is arbitrary-precision decimal arithmetic
(80 significant digits by default) applied to all geometric computation:
bounding boxes, viewport intersection and clipping, and lossless path
rewriting are exact and reproducible, with every transformation verified
against the original geometry.

The crate is a library first; the `exactsvg` binary is a thin CLI over
the [`harness`] module.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod geom;
pub mod harness;
pub mod rewrite;
pub mod validate;

mod shapes;

pub use exactsvg_tree as tree;
pub use exactsvg_types as types;

pub use exactsvg_types::{Decimal, DecimalContext};
pub use shapes::Shape;

use exactsvg_types::NumericError;

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// Unparseable path data, shape attributes, viewBox or document input.
    MalformedInput(String),

    /// A numeric domain failure: square root of a negative,
    /// division by zero, or a non-finite result.
    NumericDomain(NumericError),

    /// An unknown path command letter.
    UnsupportedCommand(char),

    /// The requested output format is not in the supported set.
    UnsupportedFormat(String),

    /// A file is not readable, a URL is unreachable or timed out.
    ResourceFailure(String),

    /// An invalid option, e.g. a precision outside the supported range.
    ConfigurationError(String),

    /// A verification step detected an inconsistency.
    ///
    /// Reported, but never corrupts output: the pre-verification state
    /// is restored.
    InternalInvariant(String),
}

impl From<NumericError> for Error {
    fn from(e: NumericError) -> Self {
        match e {
            NumericError::InvalidPrecision(_) => Error::ConfigurationError(e.to_string()),
            _ => Error::NumericDomain(e),
        }
    }
}

impl From<exactsvg_types::Error> for Error {
    fn from(e: exactsvg_types::Error) -> Self {
        Error::MalformedInput(e.to_string())
    }
}

impl From<exactsvg_tree::Error> for Error {
    fn from(e: exactsvg_tree::Error) -> Self {
        Error::MalformedInput(e.to_string())
    }
}

impl From<exactsvg_types::ViewBoxError> for Error {
    fn from(e: exactsvg_types::ViewBoxError) -> Self {
        Error::MalformedInput(e.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::MalformedInput(ref reason) => {
                write!(f, "malformed input: {}", reason)
            }
            Error::NumericDomain(ref e) => {
                write!(f, "numeric domain failure: {}", e)
            }
            Error::UnsupportedCommand(c) => {
                write!(f, "unsupported path command '{}'", c)
            }
            Error::UnsupportedFormat(ref name) => {
                write!(f, "unsupported output format '{}'", name)
            }
            Error::ResourceFailure(ref reason) => {
                write!(f, "resource failure: {}", reason)
            }
            Error::ConfigurationError(ref reason) => {
                write!(f, "invalid configuration: {}", reason)
            }
            Error::InternalInvariant(ref reason) => {
                write!(f, "verification failure: {}", reason)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Parses path data, classifying an unknown command letter separately
/// from plain garbage.
pub(crate) fn parse_path_data(d: &str) -> Result<Vec<exactsvg_types::PathSegment>, Error> {
    exactsvg_types::parse_path(d).map_err(|e| match e {
        exactsvg_types::Error::UnexpectedData(pos) => {
            // Parser positions are 1-based chars.
            match d.chars().nth(pos.saturating_sub(1)) {
                Some(c) if c.is_ascii_alphabetic() => Error::UnsupportedCommand(c),
                _ => Error::MalformedInput(e.to_string()),
            }
        }
        _ => Error::MalformedInput(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_command_letter_is_classified() {
        assert!(matches!(
            parse_path_data("M 0 0 X 10"),
            Err(Error::UnsupportedCommand('X'))
        ));
        assert!(matches!(
            parse_path_data("M 0 0 L"),
            Err(Error::MalformedInput(_))
        ));
        assert!(parse_path_data("M 0 0 L 10 10").is_ok());
    }
}
