// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Primitive shape records and their lowering to path data.

use exactsvg_types::{Decimal, DecimalContext, PathSegment, PointsParser, Stream};
use exactsvg_tree::Node;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::Error;

/// A primitive shape record.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum Shape {
    Rect {
        x: Decimal,
        y: Decimal,
        width: Decimal,
        height: Decimal,
        rx: Decimal,
        ry: Decimal,
    },
    Circle {
        cx: Decimal,
        cy: Decimal,
        r: Decimal,
    },
    Ellipse {
        cx: Decimal,
        cy: Decimal,
        rx: Decimal,
        ry: Decimal,
    },
    Line {
        x1: Decimal,
        y1: Decimal,
        x2: Decimal,
        y2: Decimal,
    },
    Polygon {
        points: Vec<(Decimal, Decimal)>,
    },
    Polyline {
        points: Vec<(Decimal, Decimal)>,
    },
}

impl Shape {
    /// Parses a shape from an element node.
    ///
    /// Returns `None` for elements that are not primitive shapes.
    ///
    /// # Errors
    ///
    /// - `MalformedInput` when a required attribute is absent or
    ///   non-numeric, or a forbidden-negative length is negative.
    pub fn from_node(node: &Node) -> Result<Option<Shape>, Error> {
        let shape = match node.tag_name() {
            Some("rect") => Some(convert_rect(node)?),
            Some("circle") => Some(convert_circle(node)?),
            Some("ellipse") => Some(convert_ellipse(node)?),
            Some("line") => Some(convert_line(node)?),
            Some("polygon") => Some(Shape::Polygon {
                points: convert_points(node)?,
            }),
            Some("polyline") => Some(Shape::Polyline {
                points: convert_points(node)?,
            }),
            _ => None,
        };

        Ok(shape)
    }

    /// Lowers the shape into an absolute path.
    ///
    /// Rects without corner radii become `M H V H Z`; rounded rects get
    /// four arc corners; circles and ellipses become four kappa cubics,
    /// one per quadrant.
    pub fn to_path(&self, ctx: &DecimalContext) -> Vec<PathSegment> {
        match self {
            Shape::Rect {
                x,
                y,
                width,
                height,
                rx,
                ry,
            } => {
                if rx.is_zero() && ry.is_zero() {
                    rect_path(x, y, width, height)
                } else {
                    rounded_rect_path(x, y, width, height, rx, ry)
                }
            }
            Shape::Circle { cx, cy, r } => ellipse_path(cx, cy, r, r, ctx),
            Shape::Ellipse { cx, cy, rx, ry } => ellipse_path(cx, cy, rx, ry, ctx),
            Shape::Line { x1, y1, x2, y2 } => vec![
                PathSegment::MoveTo {
                    abs: true,
                    x: x1.clone(),
                    y: y1.clone(),
                },
                PathSegment::LineTo {
                    abs: true,
                    x: x2.clone(),
                    y: y2.clone(),
                },
            ],
            Shape::Polygon { points } => points_path(points, true),
            Shape::Polyline { points } => points_path(points, false),
        }
    }
}

/// Parses a plain (unit-less) number attribute.
///
/// Values carrying units or percents are a `MalformedInput`; geometry
/// cannot resolve them without a viewport context.
fn parse_coordinate(node: &Node, name: &str, default: Option<Decimal>) -> Result<Decimal, Error> {
    let text = match node.attribute(name) {
        Some(text) => text,
        None => {
            return default.ok_or_else(|| {
                Error::MalformedInput(format!(
                    "'{}' requires the '{}' attribute",
                    node.tag_name().unwrap_or(""),
                    name
                ))
            });
        }
    };

    let mut s = Stream::from(text);
    let n = s.parse_decimal().map_err(|_| {
        Error::MalformedInput(format!("'{}' has an invalid '{}' value", tag(node), name))
    })?;

    s.skip_spaces();
    if !s.at_end() {
        return Err(Error::MalformedInput(format!(
            "'{}' has a non-numeric '{}' value",
            tag(node),
            name
        )));
    }

    Ok(n)
}

fn tag<'a>(node: &Node<'a>) -> &'a str {
    node.tag_name().unwrap_or("")
}

fn non_negative(value: Decimal, node: &Node, name: &str) -> Result<Decimal, Error> {
    if value.is_negative() {
        return Err(Error::MalformedInput(format!(
            "'{}' has a negative '{}' value",
            tag(node),
            name
        )));
    }
    Ok(value)
}

fn convert_rect(node: &Node) -> Result<Shape, Error> {
    let zero = || Some(Decimal::zero());

    let x = parse_coordinate(node, "x", zero())?;
    let y = parse_coordinate(node, "y", zero())?;
    let width = non_negative(parse_coordinate(node, "width", None)?, node, "width")?;
    let height = non_negative(parse_coordinate(node, "height", None)?, node, "height")?;

    let (rx, ry) = resolve_rx_ry(node, &width, &height)?;

    Ok(Shape::Rect {
        x,
        y,
        width,
        height,
        rx,
        ry,
    })
}

/// Resolves the `rx`/`ry` pair of a rect.
///
/// Negative values are treated as absent, a missing one mirrors the
/// other, and the result is clamped to half the extent.
fn resolve_rx_ry(node: &Node, width: &Decimal, height: &Decimal) -> Result<(Decimal, Decimal), Error> {
    let parse_radius = |name: &str| -> Result<Option<Decimal>, Error> {
        match node.attribute(name) {
            None => Ok(None),
            Some(_) => {
                let v = parse_coordinate(node, name, None)?;
                // Remove negative values first.
                if v.is_negative() {
                    Ok(None)
                } else {
                    Ok(Some(v))
                }
            }
        }
    };

    let rx_opt = parse_radius("rx")?;
    let ry_opt = parse_radius("ry")?;

    let (mut rx, mut ry) = match (rx_opt, ry_opt) {
        (None, None) => (Decimal::zero(), Decimal::zero()),
        (Some(rx), None) => (rx.clone(), rx),
        (None, Some(ry)) => (ry.clone(), ry),
        (Some(rx), Some(ry)) => (rx, ry),
    };

    // Clamp rx/ry to the half of the width/height.
    //
    // Should be done only after resolving.
    let half = half();
    let half_width = width * &half;
    let half_height = height * &half;
    if rx > half_width {
        rx = half_width;
    }
    if ry > half_height {
        ry = half_height;
    }

    Ok((rx, ry))
}

fn convert_circle(node: &Node) -> Result<Shape, Error> {
    let zero = || Some(Decimal::zero());

    let cx = parse_coordinate(node, "cx", zero())?;
    let cy = parse_coordinate(node, "cy", zero())?;
    let r = non_negative(parse_coordinate(node, "r", None)?, node, "r")?;

    Ok(Shape::Circle { cx, cy, r })
}

fn convert_ellipse(node: &Node) -> Result<Shape, Error> {
    let zero = || Some(Decimal::zero());

    let cx = parse_coordinate(node, "cx", zero())?;
    let cy = parse_coordinate(node, "cy", zero())?;
    let rx = non_negative(parse_coordinate(node, "rx", None)?, node, "rx")?;
    let ry = non_negative(parse_coordinate(node, "ry", None)?, node, "ry")?;

    Ok(Shape::Ellipse { cx, cy, rx, ry })
}

fn convert_line(node: &Node) -> Result<Shape, Error> {
    let zero = || Some(Decimal::zero());

    Ok(Shape::Line {
        x1: parse_coordinate(node, "x1", zero())?,
        y1: parse_coordinate(node, "y1", zero())?,
        x2: parse_coordinate(node, "x2", zero())?,
        y2: parse_coordinate(node, "y2", zero())?,
    })
}

fn convert_points(node: &Node) -> Result<Vec<(Decimal, Decimal)>, Error> {
    let text = node.attribute("points").ok_or_else(|| {
        Error::MalformedInput(format!("'{}' requires the 'points' attribute", tag(node)))
    })?;

    let points: Vec<_> = PointsParser::from(text).collect();

    // 'polyline' and 'polygon' elements must contain at least 2 points.
    if points.len() < 2 {
        return Err(Error::MalformedInput(format!(
            "'{}' has less than 2 points",
            tag(node)
        )));
    }

    Ok(points)
}

fn rect_path(x: &Decimal, y: &Decimal, width: &Decimal, height: &Decimal) -> Vec<PathSegment> {
    vec![
        PathSegment::MoveTo {
            abs: true,
            x: x.clone(),
            y: y.clone(),
        },
        PathSegment::HorizontalLineTo {
            abs: true,
            x: x + width,
        },
        PathSegment::VerticalLineTo {
            abs: true,
            y: y + height,
        },
        PathSegment::HorizontalLineTo { abs: true, x: x.clone() },
        PathSegment::ClosePath { abs: true },
    ]
}

fn rounded_rect_path(
    x: &Decimal,
    y: &Decimal,
    width: &Decimal,
    height: &Decimal,
    rx: &Decimal,
    ry: &Decimal,
) -> Vec<PathSegment> {
    let right = x + width;
    let bottom = y + height;

    let arc = |to_x: &Decimal, to_y: &Decimal| PathSegment::EllipticalArc {
        abs: true,
        rx: rx.clone(),
        ry: ry.clone(),
        x_axis_rotation: Decimal::zero(),
        large_arc: false,
        sweep: true,
        x: to_x.clone(),
        y: to_y.clone(),
    };
    let line = |to_x: &Decimal, to_y: &Decimal| PathSegment::LineTo {
        abs: true,
        x: to_x.clone(),
        y: to_y.clone(),
    };

    vec![
        PathSegment::MoveTo {
            abs: true,
            x: x + rx,
            y: y.clone(),
        },
        line(&(&right - rx), y),
        arc(&right, &(y + ry)),
        line(&right, &(&bottom - ry)),
        arc(&(&right - rx), &bottom),
        line(&(x + rx), &bottom),
        arc(x, &(&bottom - ry)),
        line(x, &(y + ry)),
        arc(&(x + rx), y),
        PathSegment::ClosePath { abs: true },
    ]
}

/// Lowers an ellipse into four cubic Beziers, one per quadrant,
/// with the control offset `kappa = 4·(√2 − 1)/3`.
fn ellipse_path(
    cx: &Decimal,
    cy: &Decimal,
    rx: &Decimal,
    ry: &Decimal,
    ctx: &DecimalContext,
) -> Vec<PathSegment> {
    let kappa = ctx.kappa();
    let kx = rx * &kappa;
    let ky = ry * &kappa;

    let right = cx + rx;
    let left = cx - rx;
    let bottom = cy + ry;
    let top = cy - ry;

    let curve = |x1: Decimal, y1: Decimal, x2: Decimal, y2: Decimal, x: Decimal, y: Decimal| {
        PathSegment::CurveTo {
            abs: true,
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        }
    };

    vec![
        PathSegment::MoveTo {
            abs: true,
            x: right.clone(),
            y: cy.clone(),
        },
        curve(
            right.clone(),
            cy + &ky,
            cx + &kx,
            bottom.clone(),
            cx.clone(),
            bottom.clone(),
        ),
        curve(
            cx - &kx,
            bottom.clone(),
            left.clone(),
            cy + &ky,
            left.clone(),
            cy.clone(),
        ),
        curve(
            left.clone(),
            cy - &ky,
            cx - &kx,
            top.clone(),
            cx.clone(),
            top.clone(),
        ),
        curve(
            cx + &kx,
            top.clone(),
            right.clone(),
            cy - &ky,
            right.clone(),
            cy.clone(),
        ),
        PathSegment::ClosePath { abs: true },
    ]
}

fn points_path(points: &[(Decimal, Decimal)], close: bool) -> Vec<PathSegment> {
    let mut path = Vec::with_capacity(points.len() + 1);

    for (i, (x, y)) in points.iter().enumerate() {
        if i == 0 {
            path.push(PathSegment::MoveTo {
                abs: true,
                x: x.clone(),
                y: y.clone(),
            });
        } else {
            path.push(PathSegment::LineTo {
                abs: true,
                x: x.clone(),
                y: y.clone(),
            });
        }
    }

    if close {
        path.push(PathSegment::ClosePath { abs: true });
    }

    path
}

fn half() -> Decimal {
    Decimal::new(BigInt::from(5), 1)
}
