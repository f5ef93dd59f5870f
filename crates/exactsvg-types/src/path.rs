use crate::{decimal, Decimal, Error, Stream};

/// Representation of a path segment.
///
/// Segment coordinates are kept exactly as written: the `abs` flag
/// preserves the command case so a rewriter can choose between the
/// absolute and relative form later.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum PathSegment {
    MoveTo {
        abs: bool,
        x: Decimal,
        y: Decimal,
    },
    LineTo {
        abs: bool,
        x: Decimal,
        y: Decimal,
    },
    HorizontalLineTo {
        abs: bool,
        x: Decimal,
    },
    VerticalLineTo {
        abs: bool,
        y: Decimal,
    },
    CurveTo {
        abs: bool,
        x1: Decimal,
        y1: Decimal,
        x2: Decimal,
        y2: Decimal,
        x: Decimal,
        y: Decimal,
    },
    SmoothCurveTo {
        abs: bool,
        x2: Decimal,
        y2: Decimal,
        x: Decimal,
        y: Decimal,
    },
    Quadratic {
        abs: bool,
        x1: Decimal,
        y1: Decimal,
        x: Decimal,
        y: Decimal,
    },
    SmoothQuadratic {
        abs: bool,
        x: Decimal,
        y: Decimal,
    },
    EllipticalArc {
        abs: bool,
        rx: Decimal,
        ry: Decimal,
        x_axis_rotation: Decimal,
        large_arc: bool,
        sweep: bool,
        x: Decimal,
        y: Decimal,
    },
    ClosePath {
        abs: bool,
    },
}

impl PathSegment {
    /// Returns the segment letter in its original case.
    pub fn letter(&self) -> u8 {
        let upper = match self {
            PathSegment::MoveTo { .. } => b'M',
            PathSegment::LineTo { .. } => b'L',
            PathSegment::HorizontalLineTo { .. } => b'H',
            PathSegment::VerticalLineTo { .. } => b'V',
            PathSegment::CurveTo { .. } => b'C',
            PathSegment::SmoothCurveTo { .. } => b'S',
            PathSegment::Quadratic { .. } => b'Q',
            PathSegment::SmoothQuadratic { .. } => b'T',
            PathSegment::EllipticalArc { .. } => b'A',
            PathSegment::ClosePath { .. } => b'Z',
        };

        if self.is_absolute() {
            upper
        } else {
            upper.to_ascii_lowercase()
        }
    }

    /// Checks if the segment was written in absolute form.
    pub fn is_absolute(&self) -> bool {
        *match self {
            PathSegment::MoveTo { abs, .. } => abs,
            PathSegment::LineTo { abs, .. } => abs,
            PathSegment::HorizontalLineTo { abs, .. } => abs,
            PathSegment::VerticalLineTo { abs, .. } => abs,
            PathSegment::CurveTo { abs, .. } => abs,
            PathSegment::SmoothCurveTo { abs, .. } => abs,
            PathSegment::Quadratic { abs, .. } => abs,
            PathSegment::SmoothQuadratic { abs, .. } => abs,
            PathSegment::EllipticalArc { abs, .. } => abs,
            PathSegment::ClosePath { abs } => abs,
        }
    }

    /// Returns a copy with the absolute flag replaced.
    pub fn with_absolute(&self, abs: bool) -> PathSegment {
        let mut seg = self.clone();
        match &mut seg {
            PathSegment::MoveTo { abs: a, .. }
            | PathSegment::LineTo { abs: a, .. }
            | PathSegment::HorizontalLineTo { abs: a, .. }
            | PathSegment::VerticalLineTo { abs: a, .. }
            | PathSegment::CurveTo { abs: a, .. }
            | PathSegment::SmoothCurveTo { abs: a, .. }
            | PathSegment::Quadratic { abs: a, .. }
            | PathSegment::SmoothQuadratic { abs: a, .. }
            | PathSegment::EllipticalArc { abs: a, .. }
            | PathSegment::ClosePath { abs: a } => *a = abs,
        }
        seg
    }
}

/// A pull-based path data parser.
///
/// # Notes
///
/// Implicit commands are converted into explicit ones: an implicit
/// MoveTo continuation becomes, per the SVG spec, an explicit LineTo.
///
/// Example: `M 10 20 30 40 50 60` -> `M 10 20 L 30 40 L 50 60`
///
/// # Examples
///
/// ```
/// use exactsvg_types::{PathParser, PathSegment, Decimal};
///
/// let mut segments = Vec::new();
/// for segment in PathParser::from("M10-20l30.1.5.1-20z") {
///     segments.push(segment.unwrap());
/// }
///
/// assert_eq!(segments.len(), 4);
/// assert_eq!(
///     segments[0],
///     PathSegment::MoveTo { abs: true, x: Decimal::from(10), y: Decimal::from(-20) }
/// );
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PathParser<'a> {
    stream: Stream<'a>,
    prev_cmd: Option<u8>,
}

impl<'a> From<&'a str> for PathParser<'a> {
    #[inline]
    fn from(v: &'a str) -> Self {
        PathParser {
            stream: Stream::from(v),
            prev_cmd: None,
        }
    }
}

impl<'a> Iterator for PathParser<'a> {
    type Item = Result<PathSegment, Error>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let s = &mut self.stream;

        s.skip_spaces();

        if s.at_end() {
            return None;
        }

        let res = next_impl(s, &mut self.prev_cmd);
        if res.is_err() {
            s.jump_to_end();
        }

        Some(res)
    }
}

fn next_impl(s: &mut Stream, prev_cmd: &mut Option<u8>) -> Result<PathSegment, Error> {
    let start = s.pos();

    let has_prev_cmd = prev_cmd.is_some();
    let first_char = s.curr_byte_unchecked();

    if !has_prev_cmd && !is_cmd(first_char) {
        return Err(Error::UnexpectedData(s.calc_char_pos_at(start)));
    }

    if !has_prev_cmd && !matches!(first_char, b'M' | b'm') {
        // The first segment must be a MoveTo.
        return Err(Error::UnexpectedData(s.calc_char_pos_at(start)));
    }

    let is_implicit_move_to;
    let cmd: u8;
    if is_cmd(first_char) {
        is_implicit_move_to = false;
        cmd = first_char;
        s.advance(1);
    } else if is_number_start(first_char) && has_prev_cmd {
        // `unwrap` is safe, because we checked `has_prev_cmd`.
        let p_cmd = prev_cmd.unwrap();

        if p_cmd == b'Z' || p_cmd == b'z' {
            // ClosePath cannot be followed by a number.
            return Err(Error::UnexpectedData(s.calc_char_pos_at(start)));
        }

        if p_cmd == b'M' || p_cmd == b'm' {
            // 'If a moveto is followed by multiple pairs of coordinates,
            // the subsequent pairs are treated as implicit lineto commands.'
            is_implicit_move_to = true;
            cmd = if is_absolute(p_cmd) { b'L' } else { b'l' };
        } else {
            is_implicit_move_to = false;
            cmd = p_cmd;
        }
    } else {
        return Err(Error::UnexpectedData(s.calc_char_pos_at(start)));
    }

    let cmdl = cmd.to_ascii_lowercase();
    let absolute = is_absolute(cmd);
    let token = match cmdl {
        b'm' => PathSegment::MoveTo {
            abs: absolute,
            x: s.parse_list_decimal()?,
            y: s.parse_list_decimal()?,
        },
        b'l' => PathSegment::LineTo {
            abs: absolute,
            x: s.parse_list_decimal()?,
            y: s.parse_list_decimal()?,
        },
        b'h' => PathSegment::HorizontalLineTo {
            abs: absolute,
            x: s.parse_list_decimal()?,
        },
        b'v' => PathSegment::VerticalLineTo {
            abs: absolute,
            y: s.parse_list_decimal()?,
        },
        b'c' => PathSegment::CurveTo {
            abs: absolute,
            x1: s.parse_list_decimal()?,
            y1: s.parse_list_decimal()?,
            x2: s.parse_list_decimal()?,
            y2: s.parse_list_decimal()?,
            x: s.parse_list_decimal()?,
            y: s.parse_list_decimal()?,
        },
        b's' => PathSegment::SmoothCurveTo {
            abs: absolute,
            x2: s.parse_list_decimal()?,
            y2: s.parse_list_decimal()?,
            x: s.parse_list_decimal()?,
            y: s.parse_list_decimal()?,
        },
        b'q' => PathSegment::Quadratic {
            abs: absolute,
            x1: s.parse_list_decimal()?,
            y1: s.parse_list_decimal()?,
            x: s.parse_list_decimal()?,
            y: s.parse_list_decimal()?,
        },
        b't' => PathSegment::SmoothQuadratic {
            abs: absolute,
            x: s.parse_list_decimal()?,
            y: s.parse_list_decimal()?,
        },
        b'a' => PathSegment::EllipticalArc {
            abs: absolute,
            rx: s.parse_list_decimal()?,
            ry: s.parse_list_decimal()?,
            x_axis_rotation: s.parse_list_decimal()?,
            large_arc: parse_flag(s)?,
            sweep: parse_flag(s)?,
            x: s.parse_list_decimal()?,
            y: s.parse_list_decimal()?,
        },
        b'z' => PathSegment::ClosePath { abs: absolute },
        _ => unreachable!(),
    };

    *prev_cmd = Some(if is_implicit_move_to {
        if absolute {
            b'M'
        } else {
            b'm'
        }
    } else {
        cmd
    });

    Ok(token)
}

/// Parses a whole path at once.
///
/// # Errors
///
/// Returns the first parsing error; the already parsed prefix is dropped.
pub fn parse_path(text: &str) -> Result<Vec<PathSegment>, Error> {
    PathParser::from(text).collect()
}

/// Returns `true` if the selected char is the command.
#[rustfmt::skip]
#[inline]
fn is_cmd(c: u8) -> bool {
    matches!(c,
          b'M' | b'm'
        | b'Z' | b'z'
        | b'L' | b'l'
        | b'H' | b'h'
        | b'V' | b'v'
        | b'C' | b'c'
        | b'S' | b's'
        | b'Q' | b'q'
        | b'T' | b't'
        | b'A' | b'a')
}

/// Returns `true` if the selected char is the absolute command.
#[inline]
fn is_absolute(c: u8) -> bool {
    debug_assert!(is_cmd(c));
    matches!(
        c,
        b'M' | b'Z' | b'L' | b'H' | b'V' | b'C' | b'S' | b'Q' | b'T' | b'A'
    )
}

#[inline]
fn is_number_start(c: u8) -> bool {
    matches!(c, b'0'..=b'9' | b'.' | b'-' | b'+')
}

// By the SVG spec 'large-arc' and 'sweep' must contain only one char
// and can be written without any separators, e.g.: 10 20 30 01 10 20.
fn parse_flag(s: &mut Stream) -> Result<bool, Error> {
    s.skip_spaces();

    let c = s.curr_byte()?;
    match c {
        b'0' | b'1' => {
            s.advance(1);
            if s.is_curr_byte_eq(b',') {
                s.advance(1);
            }
            s.skip_spaces();

            Ok(c == b'1')
        }
        _ => Err(Error::UnexpectedData(s.calc_char_pos_at(s.pos()))),
    }
}

/// Path serialization options.
#[derive(Clone, Copy, Debug)]
pub struct WriteOptions {
    /// Coordinate precision: the number of fractional digits kept.
    ///
    /// Default: 6
    pub precision: u8,

    /// Removes all optional whitespace.
    ///
    /// Default: false
    pub minify: bool,

    /// Merges adjacent same-letter commands into a single command
    /// with concatenated argument lists, e.g. `L 10 20 L 30 40`
    /// becomes `L 10 20 30 40`. A LineTo directly after a matching
    /// MoveTo becomes an implicit one.
    ///
    /// Default: false
    pub collapse_repeated: bool,
}

impl Default for WriteOptions {
    #[inline]
    fn default() -> Self {
        WriteOptions {
            precision: 6,
            minify: false,
            collapse_repeated: false,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum ArgKind {
    Number,
    Flag,
}

/// Checks that a segment's letter can be left out after `prev`.
fn can_elide_letter(prev: u8, curr: u8) -> bool {
    match curr {
        // An elided Z would vanish entirely.
        b'Z' | b'z' => false,
        // Coordinates after a MoveTo continue as implicit LineTo.
        b'L' => prev == b'L' || prev == b'M',
        b'l' => prev == b'l' || prev == b'm',
        // MoveTo repetition would turn into LineTo; never elide.
        b'M' | b'm' => false,
        _ => prev == curr,
    }
}

/// Writes path segments back into path data.
pub fn write_path(segments: &[PathSegment], opt: &WriteOptions) -> String {
    let mut out = String::new();

    // The last emitted argument, carried across segments so that
    // collapsed commands keep valid separators in minify mode.
    let mut prev_arg: Option<(String, ArgKind)> = None;
    let mut prev_letter: Option<u8> = None;

    for seg in segments.iter() {
        let letter = seg.letter();
        let elide = opt.collapse_repeated
            && prev_letter.map_or(false, |prev| can_elide_letter(prev, letter));

        if !elide {
            if prev_letter.is_some() && !opt.minify {
                out.push(' ');
            }
            out.push(letter as char);
            prev_arg = None;
        }

        prev_letter = Some(letter);

        let args = segment_args(seg, opt);
        if args.is_empty() {
            prev_arg = None;
            continue;
        }

        if !opt.minify {
            for (a, _) in &args {
                out.push(' ');
                out.push_str(a);
            }
            prev_arg = args.into_iter().last();
            continue;
        }

        for arg in args {
            if let Some((prev_text, prev_kind)) = &prev_arg {
                let no_separator = arg.0.starts_with('-')
                    || *prev_kind == ArgKind::Flag
                    || (arg.0.starts_with('.') && prev_text.contains('.'));

                if !no_separator {
                    out.push(' ');
                }
            }

            out.push_str(&arg.0);
            prev_arg = Some(arg);
        }
    }

    out
}

fn segment_args(seg: &PathSegment, opt: &WriteOptions) -> Vec<(String, ArgKind)> {
    let num =
        |d: &Decimal| -> (String, ArgKind) {
            (
                decimal::write_coordinate(d, opt.precision, opt.minify),
                ArgKind::Number,
            )
        };
    let flag = |v: bool| -> (String, ArgKind) {
        (if v { "1" } else { "0" }.to_string(), ArgKind::Flag)
    };

    match seg {
        PathSegment::MoveTo { x, y, .. } | PathSegment::LineTo { x, y, .. } => {
            vec![num(x), num(y)]
        }
        PathSegment::HorizontalLineTo { x, .. } => vec![num(x)],
        PathSegment::VerticalLineTo { y, .. } => vec![num(y)],
        PathSegment::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
            ..
        } => vec![num(x1), num(y1), num(x2), num(y2), num(x), num(y)],
        PathSegment::SmoothCurveTo { x2, y2, x, y, .. } => {
            vec![num(x2), num(y2), num(x), num(y)]
        }
        PathSegment::Quadratic { x1, y1, x, y, .. } => {
            vec![num(x1), num(y1), num(x), num(y)]
        }
        PathSegment::SmoothQuadratic { x, y, .. } => vec![num(x), num(y)],
        PathSegment::EllipticalArc {
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            x,
            y,
            ..
        } => vec![
            num(rx),
            num(ry),
            num(x_axis_rotation),
            flag(*large_arc),
            flag(*sweep),
            num(x),
            num(y),
        ],
        PathSegment::ClosePath { .. } => Vec::new(),
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn ds(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    macro_rules! test {
        ($name:ident, $text:expr, $( $seg:expr ),*) => (
            #[test]
            fn $name() {
                let mut s = PathParser::from($text);
                $(
                    assert_eq!(s.next().unwrap().unwrap(), $seg);
                )*

                if let Some(res) = s.next() {
                    assert!(res.is_err());
                }
            }
        )
    }

    test!(null, "", );
    test!(not_a_path, "q", );
    test!(not_a_move_to, "L 20 30", );
    test!(stop_on_err_1, "M 10 20 L 30 40 L 50",
        PathSegment::MoveTo { abs: true, x: d(10), y: d(20) },
        PathSegment::LineTo { abs: true, x: d(30), y: d(40) }
    );

    test!(move_to_1, "M 10 20", PathSegment::MoveTo { abs: true, x: d(10), y: d(20) });
    test!(move_to_2, "m 10 20", PathSegment::MoveTo { abs: false, x: d(10), y: d(20) });
    test!(move_to_3, "M 10 20 30 40 50 60",
        PathSegment::MoveTo { abs: true, x: d(10), y: d(20) },
        PathSegment::LineTo { abs: true, x: d(30), y: d(40) },
        PathSegment::LineTo { abs: true, x: d(50), y: d(60) }
    );

    test!(arc_to_1, "M 10 20 A 5 5 30 1 1 20 20",
        PathSegment::MoveTo { abs: true, x: d(10), y: d(20) },
        PathSegment::EllipticalArc {
            abs: true,
            rx: d(5), ry: d(5),
            x_axis_rotation: d(30),
            large_arc: true, sweep: true,
            x: d(20), y: d(20)
        }
    );

    test!(arc_to_10, "M10-20A5.5.3-4 010-.1",
        PathSegment::MoveTo { abs: true, x: d(10), y: d(-20) },
        PathSegment::EllipticalArc {
            abs: true,
            rx: ds("5.5"), ry: ds("0.3"),
            x_axis_rotation: d(-4),
            large_arc: false, sweep: true,
            x: d(0), y: ds("-0.1")
        }
    );

    test!(separator_1, "M 10 20 L 5 15 C 10 20 30 40 50 60",
        PathSegment::MoveTo { abs: true, x: d(10), y: d(20) },
        PathSegment::LineTo { abs: true, x: d(5), y: d(15) },
        PathSegment::CurveTo {
            abs: true,
            x1: d(10), y1: d(20),
            x2: d(30), y2: d(40),
            x:  d(50), y:  d(60),
        }
    );

    test!(separator_2, "M 10, 20 L 5, 15 C 10, 20 30, 40 50, 60",
        PathSegment::MoveTo { abs: true, x: d(10), y: d(20) },
        PathSegment::LineTo { abs: true, x: d(5), y: d(15) },
        PathSegment::CurveTo {
            abs: true,
            x1: d(10), y1: d(20),
            x2: d(30), y2: d(40),
            x:  d(50), y:  d(60),
        }
    );

    test!(separator_5, "M10 20V30H40V50H60Z",
        PathSegment::MoveTo { abs: true, x: d(10), y: d(20) },
        PathSegment::VerticalLineTo { abs: true, y: d(30) },
        PathSegment::HorizontalLineTo { abs: true, x: d(40) },
        PathSegment::VerticalLineTo { abs: true, y: d(50) },
        PathSegment::HorizontalLineTo { abs: true, x: d(60) },
        PathSegment::ClosePath { abs: true }
    );

    test!(all_segments_1, "M 10 20 L 30 40 H 50 V 60 C 70 80 90 100 110 120 S 130 140 150 160
        Q 170 180 190 200 T 210 220 A 50 50 30 1 1 230 240 Z",
        PathSegment::MoveTo { abs: true, x: d(10), y: d(20) },
        PathSegment::LineTo { abs: true, x: d(30), y: d(40) },
        PathSegment::HorizontalLineTo { abs: true, x: d(50) },
        PathSegment::VerticalLineTo { abs: true, y: d(60) },
        PathSegment::CurveTo {
            abs: true,
            x1: d(70), y1: d(80),
            x2: d(90), y2: d(100),
            x:  d(110), y: d(120),
        },
        PathSegment::SmoothCurveTo {
            abs: true,
            x2: d(130), y2: d(140),
            x:  d(150), y: d(160),
        },
        PathSegment::Quadratic {
            abs: true,
            x1: d(170), y1: d(180),
            x:  d(190), y: d(200),
        },
        PathSegment::SmoothQuadratic { abs: true, x: d(210), y: d(220) },
        PathSegment::EllipticalArc {
            abs: true,
            rx: d(50), ry: d(50),
            x_axis_rotation: d(30),
            large_arc: true, sweep: true,
            x: d(230), y: d(240)
        },
        PathSegment::ClosePath { abs: true }
    );

    test!(close_path_2, "M10 20 L 30 40 zM 100 200 L 300 400",
        PathSegment::MoveTo { abs: true, x: d(10), y: d(20) },
        PathSegment::LineTo { abs: true, x: d(30), y: d(40) },
        PathSegment::ClosePath { abs: false },
        PathSegment::MoveTo { abs: true, x: d(100), y: d(200) },
        PathSegment::LineTo { abs: true, x: d(300), y: d(400) }
    );

    // ClosePath can't be followed by a number.
    test!(invalid_2, "M 0 0 Z 2",
        PathSegment::MoveTo { abs: true, x: d(0), y: d(0) },
        PathSegment::ClosePath { abs: true }
    );

    // ClosePath can be followed by any command.
    test!(invalid_3, "M 0 0 Z H 10",
        PathSegment::MoveTo { abs: true, x: d(0), y: d(0) },
        PathSegment::ClosePath { abs: true },
        PathSegment::HorizontalLineTo { abs: true, x: d(10) }
    );

    macro_rules! test_write {
        ($name:ident, $input:expr, $minify:expr, $result:expr) => (
            #[test]
            fn $name() {
                let segments = parse_path($input).unwrap();
                let opt = WriteOptions { minify: $minify, ..WriteOptions::default() };
                assert_eq!(write_path(&segments, &opt), $result);
            }
        )
    }

    macro_rules! test_write_collapsed {
        ($name:ident, $input:expr, $minify:expr, $result:expr) => (
            #[test]
            fn $name() {
                let segments = parse_path($input).unwrap();
                let opt = WriteOptions {
                    minify: $minify,
                    collapse_repeated: true,
                    ..WriteOptions::default()
                };
                assert_eq!(write_path(&segments, &opt), $result);
            }
        )
    }

    test_write_collapsed!(collapse_1, "M 10 20 L 30 40 L 50 60", false, "M 10 20 30 40 50 60");
    test_write_collapsed!(collapse_2, "M 0 0 H 10 H 20 V 5 V 10", true, "M0 0H10 20V5 10");
    test_write_collapsed!(collapse_3, "M 0 0 L 10 0 Z M 5 5 L 6 6", false, "M 0 0 10 0 Z M 5 5 6 6");
    test_write_collapsed!(collapse_4, "m 1 2 l 3 4 l 5 6", true, "m1 2 3 4 5 6");
    test_write_collapsed!(collapse_5, "M 0 0 C 1 1 2 2 3 3 C 4 4 5 5 6 6", false,
        "M 0 0 C 1 1 2 2 3 3 4 4 5 5 6 6");

    #[test]
    fn collapsed_output_reparses_identically() {
        let input = "M 10 20 L 30 40 L 50 60 H 70 H 80 Z";
        let segments = parse_path(input).unwrap();
        let opt = WriteOptions { collapse_repeated: true, ..WriteOptions::default() };
        let collapsed = write_path(&segments, &opt);
        let reparsed = parse_path(&collapsed).unwrap();
        assert_eq!(segments, reparsed);
    }

    test_write!(write_1, "M 10 20 L 30 40 Z", false, "M 10 20 L 30 40 Z");
    test_write!(write_2, "M10 20L30 40Z", false, "M 10 20 L 30 40 Z");
    test_write!(write_3, "M 10 20 L 30 40 Z", true, "M10 20L30 40Z");
    test_write!(write_4, "M 10 -20 L -30 40", true, "M10-20L-30 40");
    test_write!(write_5, "M 0.5 0.25 L 0.5 0.75", true, "M.5.25L.5.75");
    test_write!(write_6, "M 10 20 A 5 5 30 1 1 20 20", true, "M10 20A5 5 30 1120 20");
    test_write!(write_7, "M 10.123456789 0", false, "M 10.123457 0");

    #[test]
    fn round_trip_preserves_case() {
        let text = "m 10 20 l 30 40 H 50 z";
        let segments = parse_path(text).unwrap();
        let opt = WriteOptions::default();
        assert_eq!(write_path(&segments, &opt), "m 10 20 l 30 40 H 50 z");
    }

    #[test]
    fn implicit_move_to_keeps_case() {
        let segments = parse_path("m 10 20 30 40").unwrap();
        assert_eq!(segments[1], PathSegment::LineTo { abs: false, x: d(30), y: d(40) });
    }

    #[test]
    fn error_position() {
        let mut s = PathParser::from("M 10 20 X 30");
        s.next().unwrap().unwrap();
        assert_eq!(s.next().unwrap().unwrap_err(), Error::UnexpectedData(9));
    }
}
