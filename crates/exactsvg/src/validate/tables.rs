// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The static SVG vocabulary the validator checks against.

/// Every element of SVG 1.1.
#[rustfmt::skip]
pub(crate) const SVG11_ELEMENTS: &[&str] = &[
    "a", "altGlyph", "altGlyphDef", "altGlyphItem", "animate", "animateColor",
    "animateMotion", "animateTransform", "circle", "clipPath", "color-profile",
    "cursor", "defs", "desc", "ellipse", "feBlend", "feColorMatrix",
    "feComponentTransfer", "feComposite", "feConvolveMatrix",
    "feDiffuseLighting", "feDisplacementMap", "feDistantLight", "feFlood",
    "feFuncA", "feFuncB", "feFuncG", "feFuncR", "feGaussianBlur", "feImage",
    "feMerge", "feMergeNode", "feMorphology", "feOffset", "fePointLight",
    "feSpecularLighting", "feSpotLight", "feTile", "feTurbulence", "filter",
    "font", "font-face", "font-face-format", "font-face-name", "font-face-src",
    "font-face-uri", "foreignObject", "g", "glyph", "glyphRef", "hkern",
    "image", "line", "linearGradient", "marker", "mask", "metadata",
    "missing-glyph", "mpath", "path", "pattern", "polygon", "polyline",
    "radialGradient", "rect", "script", "set", "stop", "style", "svg",
    "switch", "symbol", "text", "textPath", "title", "tref", "tspan", "use",
    "view", "vkern",
];

/// SVG 2.0 additions, recognized as valid so they are never reported
/// as mistyped. Other rules still apply to them.
#[rustfmt::skip]
pub(crate) const SVG2_ELEMENTS: &[&str] = &[
    "discard", "hatch", "hatchpath", "mesh", "meshgradient", "meshpatch",
    "meshrow", "solidcolor", "unknown", "video",
];

/// Every attribute of SVG 1.1, including the xlink and xml namespaces.
#[rustfmt::skip]
pub(crate) const SVG11_ATTRIBUTES: &[&str] = &[
    "accent-height", "accumulate", "additive", "alignment-baseline",
    "alphabetic", "amplitude", "arabic-form", "ascent", "attributeName",
    "attributeType", "azimuth", "baseFrequency", "baseProfile",
    "baseline-shift", "bbox", "begin", "bias", "by", "calcMode", "cap-height",
    "class", "clip", "clip-path", "clip-rule", "clipPathUnits", "color",
    "color-interpolation", "color-interpolation-filters", "color-profile",
    "color-rendering", "contentScriptType", "contentStyleType", "cursor",
    "cx", "cy", "d", "descent", "diffuseConstant", "direction", "display",
    "divisor", "dominant-baseline", "dur", "dx", "dy", "edgeMode",
    "elevation", "enable-background", "end", "exponent",
    "externalResourcesRequired", "fill", "fill-opacity", "fill-rule",
    "filter", "filterRes", "filterUnits", "flood-color", "flood-opacity",
    "font-family", "font-size", "font-size-adjust", "font-stretch",
    "font-style", "font-variant", "font-weight", "format", "from", "fx",
    "fy", "g1", "g2", "glyph-name", "glyph-orientation-horizontal",
    "glyph-orientation-vertical", "glyphRef", "gradientTransform",
    "gradientUnits", "hanging", "height", "horiz-adv-x", "horiz-origin-x",
    "horiz-origin-y", "id", "ideographic", "image-rendering", "in", "in2",
    "intercept", "k", "k1", "k2", "k3", "k4", "kernelMatrix",
    "kernelUnitLength", "kerning", "keyPoints", "keySplines", "keyTimes",
    "lang", "lengthAdjust", "letter-spacing", "lighting-color",
    "limitingConeAngle", "local", "marker-end", "marker-mid", "marker-start",
    "markerHeight", "markerUnits", "markerWidth", "mask", "maskContentUnits",
    "maskUnits", "mathematical", "max", "media", "method", "min", "mode",
    "name", "numOctaves", "offset", "onabort", "onactivate", "onbegin",
    "onclick", "onend", "onerror", "onfocusin", "onfocusout", "onload",
    "onmousedown", "onmousemove", "onmouseout", "onmouseover", "onmouseup",
    "onrepeat", "onresize", "onscroll", "onunload", "onzoom", "opacity",
    "operator", "order", "orient", "orientation", "origin", "overflow",
    "overline-position", "overline-thickness", "panose-1", "path",
    "pathLength", "patternContentUnits", "patternTransform", "patternUnits",
    "pointer-events", "points", "pointsAtX", "pointsAtY", "pointsAtZ",
    "preserveAlpha", "preserveAspectRatio", "primitiveUnits", "r", "radius",
    "refX", "refY", "rendering-intent", "repeatCount", "repeatDur",
    "requiredExtensions", "requiredFeatures", "restart", "result", "rotate",
    "rx", "ry", "scale", "seed", "shape-rendering", "slope", "spacing",
    "specularConstant", "specularExponent", "spreadMethod", "startOffset",
    "stdDeviation", "stemh", "stemv", "stitchTiles", "stop-color",
    "stop-opacity", "strikethrough-position", "strikethrough-thickness",
    "string", "stroke", "stroke-dasharray", "stroke-dashoffset",
    "stroke-linecap", "stroke-linejoin", "stroke-miterlimit",
    "stroke-opacity", "stroke-width", "style", "surfaceScale",
    "systemLanguage", "tableValues", "target", "targetX", "targetY",
    "text-anchor", "text-decoration", "text-rendering", "textLength",
    "title", "to", "transform", "type", "u1", "u2", "underline-position",
    "underline-thickness", "unicode", "unicode-bidi", "unicode-range",
    "units-per-em", "v-alphabetic", "v-hanging", "v-ideographic",
    "v-mathematical", "values", "version", "vert-adv-y", "vert-origin-x",
    "vert-origin-y", "viewBox", "viewTarget", "visibility", "width",
    "widths", "word-spacing", "writing-mode", "x", "x-height", "x1", "x2",
    "xChannelSelector", "xlink:actuate", "xlink:arcrole", "xlink:href",
    "xlink:role", "xlink:show", "xlink:title", "xlink:type", "xml:base",
    "xml:lang", "xml:space", "xmlns", "xmlns:xlink", "y", "y1", "y2",
    "yChannelSelector", "z", "zoomAndPan",
];

/// SVG 2.0 attribute additions.
#[rustfmt::skip]
pub(crate) const SVG2_ATTRIBUTES: &[&str] = &[
    "href", "isolation", "mix-blend-mode", "paint-order", "tabindex",
    "transform-origin", "vector-effect", "white-space",
];

/// The animation elements.
pub(crate) const ANIMATION_ELEMENTS: &[&str] = &[
    "animate",
    "animateColor",
    "animateMotion",
    "animateTransform",
    "discard",
    "set",
];

/// Elements the SVG 1.1 DTD declares as EMPTY: nothing, not even an
/// animation element, may appear inside them.
pub(crate) const DTD_EMPTY_ELEMENTS: &[&str] = &[
    "definition-src",
    "font-face-format",
    "font-face-name",
    "glyphRef",
    "hkern",
    "vkern",
];

/// Case-insensitive membership is never wanted here: SVG names are
/// case-sensitive.
pub(crate) fn has(list: &[&str], name: &str) -> bool {
    list.iter().any(|v| *v == name)
}

pub(crate) fn is_known_element(name: &str) -> bool {
    has(SVG11_ELEMENTS, name) || has(SVG2_ELEMENTS, name)
}

pub(crate) fn is_known_attribute(name: &str) -> bool {
    has(SVG11_ATTRIBUTES, name) || has(SVG2_ATTRIBUTES, name)
}

/// Attributes an element cannot render without.
pub(crate) fn required_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "path" => &["d"],
        "polygon" | "polyline" => &["points"],
        "rect" => &["width", "height"],
        "circle" => &["r"],
        "ellipse" => &["rx", "ry"],
        "use" | "image" => &[],
        _ => &[],
    }
}

/// Content models for elements with a closed child set.
///
/// Returns `None` when any child is acceptable.
pub(crate) fn allowed_children(tag: &str) -> Option<&'static [&'static str]> {
    match tag {
        // Shapes take descriptive and animation content only.
        "circle" | "ellipse" | "line" | "path" | "polygon" | "polyline" | "rect" => Some(&[
            "animate",
            "animateColor",
            "animateMotion",
            "animateTransform",
            "desc",
            "metadata",
            "mpath",
            "set",
            "title",
        ]),
        "linearGradient" | "radialGradient" => Some(&[
            "animate",
            "animateTransform",
            "desc",
            "metadata",
            "set",
            "stop",
            "title",
        ]),
        "stop" => Some(&["animate", "animateColor", "set"]),
        "image" | "use" => Some(&[
            "animate",
            "animateColor",
            "animateMotion",
            "animateTransform",
            "desc",
            "metadata",
            "set",
            "title",
        ]),
        _ => None,
    }
}

/// Attributes that have no effect on an element and usually signal a
/// copy-paste mistake.
pub(crate) fn denied_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "g" | "defs" => &["x", "y", "width", "height", "rx", "ry", "cx", "cy", "r"],
        "circle" => &["width", "height", "rx", "ry", "x", "y"],
        "ellipse" => &["r", "width", "height", "x", "y"],
        "rect" => &["r", "cx", "cy"],
        "line" => &["width", "height", "points", "d"],
        "path" => &["x", "y", "width", "height", "points"],
        "polygon" | "polyline" => &["d", "x", "y", "width", "height"],
        _ => &[],
    }
}

/// Closed value sets of enumerated attributes.
pub(crate) fn enumerated_values(attr: &str) -> Option<&'static [&'static str]> {
    match attr {
        "fill-rule" | "clip-rule" => Some(&["nonzero", "evenodd", "inherit"]),
        "stroke-linecap" => Some(&["butt", "round", "square", "inherit"]),
        "stroke-linejoin" => Some(&["miter", "round", "bevel", "inherit"]),
        "visibility" => Some(&["visible", "hidden", "collapse", "inherit"]),
        "shape-rendering" => Some(&[
            "auto",
            "optimizeSpeed",
            "crispEdges",
            "geometricPrecision",
            "inherit",
        ]),
        "text-rendering" => Some(&[
            "auto",
            "optimizeSpeed",
            "optimizeLegibility",
            "geometricPrecision",
            "inherit",
        ]),
        "image-rendering" => Some(&["auto", "optimizeSpeed", "optimizeQuality", "inherit"]),
        "text-anchor" => Some(&["start", "middle", "end", "inherit"]),
        "spreadMethod" => Some(&["pad", "reflect", "repeat"]),
        "gradientUnits" | "patternUnits" | "patternContentUnits" | "clipPathUnits"
        | "maskUnits" | "maskContentUnits" | "filterUnits" | "primitiveUnits" => {
            Some(&["userSpaceOnUse", "objectBoundingBox"])
        }
        "markerUnits" => Some(&["strokeWidth", "userSpaceOnUse"]),
        "lengthAdjust" => Some(&["spacing", "spacingAndGlyphs"]),
        "method" => Some(&["align", "stretch"]),
        "xml:space" => Some(&["default", "preserve"]),
        _ => None,
    }
}

/// Inclusive numeric bounds of range-checked attributes.
pub(crate) fn numeric_range(attr: &str) -> Option<(Option<i64>, Option<i64>)> {
    match attr {
        "opacity" | "fill-opacity" | "stroke-opacity" | "stop-opacity" | "flood-opacity" => {
            Some((Some(0), Some(1)))
        }
        "stroke-miterlimit" => Some((Some(1), None)),
        "stroke-width" | "r" | "rx" | "ry" | "width" | "height" => Some((Some(0), None)),
        _ => None,
    }
}

/// Attributes whose values follow the color grammar.
pub(crate) const COLOR_ATTRIBUTES: &[&str] = &[
    "color",
    "fill",
    "flood-color",
    "lighting-color",
    "stop-color",
    "stroke",
];

/// The Levenshtein distance between two names, capped at `limit + 1`.
///
/// A full matrix is unnecessary: two rolling rows suffice, and a
/// length difference beyond the cap answers immediately.
pub(crate) fn levenshtein(a: &str, b: &str, limit: usize) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > limit {
        return limit + 1;
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];

        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
            row_min = row_min.min(curr[j + 1]);
        }

        if row_min > limit {
            return limit + 1;
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Finds a dictionary word within edit distance 2 of `name`.
pub(crate) fn closest_match<'a>(name: &str, dictionary: &[&'a str]) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;

    for word in dictionary {
        let d = levenshtein(name, word, 2);
        if d <= 2 {
            match best {
                Some((_, bd)) if bd <= d => {}
                _ => best = Some((word, d)),
            }
        }
    }

    best.map(|(w, _)| w)
}
