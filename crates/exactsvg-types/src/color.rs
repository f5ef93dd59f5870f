use crate::stream::ByteExt;
use crate::{Error, Stream};

/// CSS named colors, sorted for binary search.
#[rustfmt::skip]
pub const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige",
    "bisque", "black", "blanchedalmond", "blue", "blueviolet", "brown",
    "burlywood", "cadetblue", "chartreuse", "chocolate", "coral",
    "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue", "darkcyan",
    "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred",
    "darksalmon", "darkseagreen", "darkslateblue", "darkslategray",
    "darkslategrey", "darkturquoise", "darkviolet", "deeppink", "deepskyblue",
    "dimgray", "dimgrey", "dodgerblue", "firebrick", "floralwhite",
    "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink",
    "indianred", "indigo", "ivory", "khaki", "lavender", "lavenderblush",
    "lawngreen", "lemonchiffon", "lightblue", "lightcoral", "lightcyan",
    "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue",
    "lightslategray", "lightslategrey", "lightsteelblue", "lightyellow",
    "lime", "limegreen", "linen", "magenta", "maroon", "mediumaquamarine",
    "mediumblue", "mediumorchid", "mediumpurple", "mediumseagreen",
    "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin",
    "navajowhite", "navy", "oldlace", "olive", "olivedrab", "orange",
    "orangered", "orchid", "palegoldenrod", "palegreen", "paleturquoise",
    "palevioletred", "papayawhip", "peachpuff", "peru", "pink", "plum",
    "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna",
    "silver", "skyblue", "slateblue", "slategray", "slategrey", "snow",
    "springgreen", "steelblue", "tan", "teal", "thistle", "tomato",
    "turquoise", "violet", "wheat", "white", "whitesmoke", "yellow",
    "yellowgreen",
];

/// Paint keywords that are not colors but are valid wherever one is.
const KEYWORDS: &[&str] = &["currentcolor", "inherit", "none", "transparent"];

/// Checks a color literal against the CSS color grammar:
/// named colors, `#RGB`/`#RGBA`/`#RRGGBB`/`#RRGGBBAA`, `rgb()`/`rgba()`,
/// `hsl()`/`hsla()`, `url(#id)` references and the paint keywords.
pub fn is_valid_color(text: &str) -> bool {
    parse_color(text).is_ok()
}

fn parse_color(text: &str) -> Result<(), Error> {
    let mut s = Stream::from(text);
    s.skip_spaces();

    if s.at_end() {
        return Err(Error::UnexpectedEndOfStream);
    }

    if s.curr_byte()? == b'#' {
        s.advance(1);
        let digits = s.consume_bytes(|_, c| c.is_hex_digit());
        if !matches!(digits.len(), 3 | 4 | 6 | 8) {
            return Err(Error::InvalidValue);
        }
    } else {
        let start = s.pos();
        s.skip_bytes(|_, c| c.is_letter());
        let name = s.slice_back(start).to_ascii_lowercase();

        match name.as_str() {
            "rgb" | "rgba" => parse_function_args(&mut s, 3)?,
            "hsl" | "hsla" => parse_function_args(&mut s, 3)?,
            "url" => {
                s.consume_byte(b'(')?;
                s.consume_byte(b'#')?;
                let id = s.consume_bytes(|_, c| c != b')');
                if id.is_empty() {
                    return Err(Error::InvalidValue);
                }
                s.consume_byte(b')')?;
            }
            _ => {
                if !KEYWORDS.contains(&name.as_str())
                    && NAMED_COLORS.binary_search(&name.as_str()).is_err()
                {
                    return Err(Error::InvalidValue);
                }
            }
        }
    }

    s.skip_spaces();
    if !s.at_end() {
        return Err(Error::UnexpectedData(s.calc_char_pos()));
    }

    Ok(())
}

/// Consumes `( v, v, v [, alpha] )` where values may carry a `%` suffix.
fn parse_function_args(s: &mut Stream, count: usize) -> Result<(), Error> {
    s.consume_byte(b'(')?;

    for _ in 0..count {
        s.skip_spaces();
        s.parse_decimal()?;
        if s.is_curr_byte_eq(b'%') {
            s.advance(1);
        }
        s.skip_spaces();
        s.parse_list_separator();
    }

    s.skip_spaces();
    if !s.is_curr_byte_eq(b')') {
        // Optional alpha.
        s.parse_decimal()?;
        if s.is_curr_byte_eq(b'%') {
            s.advance(1);
        }
        s.skip_spaces();
    }

    s.consume_byte(b')')?;
    Ok(())
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_valid {
        ($name:ident, $text:expr) => (
            #[test]
            fn $name() {
                assert!(is_valid_color($text), "{} must be valid", $text);
            }
        )
    }

    macro_rules! test_invalid {
        ($name:ident, $text:expr) => (
            #[test]
            fn $name() {
                assert!(!is_valid_color($text), "{} must be invalid", $text);
            }
        )
    }

    test_valid!(named_1, "red");
    test_valid!(named_2, "RED");
    test_valid!(named_3, "rebeccapurple");
    test_valid!(hex_1, "#fff");
    test_valid!(hex_2, "#ffffff");
    test_valid!(hex_3, "#ffff");
    test_valid!(hex_4, "#ffffffff");
    test_valid!(rgb_1, "rgb(255, 0, 0)");
    test_valid!(rgb_2, "rgb(100%, 0%, 0%)");
    test_valid!(rgb_3, "rgba(255, 0, 0, 0.5)");
    test_valid!(hsl_1, "hsl(120, 50%, 50%)");
    test_valid!(hsl_2, "hsla(120, 50%, 50%, 0.5)");
    test_valid!(url_1, "url(#grad1)");
    test_valid!(keyword_1, "none");
    test_valid!(keyword_2, "currentColor");
    test_valid!(keyword_3, "inherit");
    test_valid!(keyword_4, "transparent");

    test_invalid!(invalid_1, "zzz");
    test_invalid!(invalid_2, "#ff");
    test_invalid!(invalid_3, "#fffff");
    test_invalid!(invalid_4, "rgb(255, 0)");
    test_invalid!(invalid_5, "rgb(255, 0, 0");
    test_invalid!(invalid_6, "url(#)");
    test_invalid!(invalid_7, "");
    test_invalid!(invalid_8, "red blue");

    #[test]
    fn named_colors_are_sorted() {
        let mut sorted = NAMED_COLORS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, NAMED_COLORS);
    }
}
