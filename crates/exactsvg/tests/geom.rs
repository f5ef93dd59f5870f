use std::str::FromStr;

use exactsvg::geom::{
    bbox_intersects, clip_line_to_viewbox, path_bbox, point_in_viewbox, shape_bbox, BBox, Point,
};
use exactsvg::{Decimal, DecimalContext, Shape};
use exactsvg_types::{parse_path, ViewBox};

fn d(n: i64) -> Decimal {
    Decimal::from(n)
}

fn p(x: i64, y: i64) -> Point {
    Point::new(d(x), d(y))
}

fn vb(x: i64, y: i64, w: i64, h: i64) -> ViewBox {
    ViewBox::new(d(x), d(y), d(w), d(h)).unwrap()
}

fn bbox(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> BBox {
    BBox {
        min_x: d(min_x),
        min_y: d(min_y),
        max_x: d(max_x),
        max_y: d(max_y),
        verified: true,
    }
}

#[test]
fn viewbox_parse() {
    let v = ViewBox::parse("0 0 100 100").unwrap();
    assert_eq!(v.x, d(0));
    assert_eq!(v.y, d(0));
    assert_eq!(v.w, d(100));
    assert_eq!(v.h, d(100));
    assert!(v.verified);

    let err = ViewBox::parse("0 0 0 100").unwrap_err();
    assert!(err.to_string().contains("positive"));
}

#[test]
fn viewbox_canonical_round_trip() {
    for text in ["0 0 100 100", " 0,0 , 100 100 ", "-10.5 2 30 40"] {
        let v = ViewBox::parse(text).unwrap();
        let canonical = v.to_canonical_string();
        let reparsed = ViewBox::parse(&canonical).unwrap();
        assert_eq!(canonical, reparsed.to_canonical_string());
    }
}

#[test]
fn square_path_bbox() {
    let ctx = DecimalContext::default();
    let segments = parse_path("M0 0 L100 0 L100 50 L0 50 Z").unwrap();
    let b = path_bbox(&segments, &ctx).unwrap().unwrap();

    assert_eq!(b.min_x, d(0));
    assert_eq!(b.min_y, d(0));
    assert_eq!(b.max_x, d(100));
    assert_eq!(b.max_y, d(50));
    assert_eq!(b.width(), d(100));
    assert_eq!(b.height(), d(50));
    assert!(b.verified);
}

#[test]
fn cubic_bbox_bulge() {
    let ctx = DecimalContext::default();
    let segments = parse_path("M0 0 C0 100 100 100 100 0").unwrap();
    let b = path_bbox(&segments, &ctx).unwrap().unwrap();

    assert_eq!(b.min_x, d(0));
    assert_eq!(b.max_x, d(100));
    assert_eq!(b.min_y, d(0));
    assert!(b.max_y > d(60));
    assert!(b.max_y <= d(75));
}

#[test]
fn bbox_containment_invariant() {
    let ctx = DecimalContext::default();

    let paths = [
        "M0 0 L100 0 L100 50 L0 50 Z",
        "M0 0 C0 100 100 100 100 0",
        "M10 10 Q50 90 90 10",
        "M0 50 A50 50 0 0 1 100 50",
        "m5 5 l10 0 q5 5 10 0 t10 0 z",
    ];

    for path in paths {
        let segments = parse_path(path).unwrap();
        let b = path_bbox(&segments, &ctx).unwrap().unwrap();

        // The verified flag is the containment invariant: every
        // sampled source point sits inside the box inflated by the
        // default tolerance.
        assert!(b.verified, "{} must verify", path);
        assert!(b.width() >= d(0));
        assert!(b.height() >= d(0));
    }
}

#[test]
fn gjk_intersection_scenarios() {
    let inside = bbox(20, 20, 80, 80);
    let outside = bbox(-100, 20, -10, 80);
    let viewport = bbox(0, 0, 100, 100);

    assert!(bbox_intersects(&inside, &viewport));
    assert!(!bbox_intersects(&outside, &viewport));
}

#[test]
fn gjk_symmetry() {
    let pairs = [
        (bbox(20, 20, 80, 80), bbox(0, 0, 100, 100)),
        (bbox(-100, 20, -10, 80), bbox(0, 0, 100, 100)),
        (bbox(100, 0, 200, 100), bbox(0, 0, 100, 100)),
        (bbox(-3, -3, -1, -1), bbox(1, 1, 2, 2)),
    ];

    for (a, b) in &pairs {
        assert_eq!(bbox_intersects(a, b), bbox_intersects(b, a));
    }
}

#[test]
fn viewbox_intersection() {
    let viewport = vb(0, 0, 100, 100);
    assert!(bbox(20, 20, 80, 80).intersects_viewbox(&viewport));
    assert!(!bbox(-100, 20, -10, 80).intersects_viewbox(&viewport));
    // Edge contact counts as an overlap.
    assert!(bbox(100, 0, 150, 50).intersects_viewbox(&viewport));
}

#[test]
fn cohen_sutherland_scenarios() {
    let ctx = DecimalContext::default();
    let viewport = vb(0, 0, 100, 100);

    let (a, b) = clip_line_to_viewbox(&p(-10, 50), &p(110, 50), &viewport, &ctx)
        .unwrap()
        .unwrap();
    assert_eq!((a, b), (p(0, 50), p(100, 50)));

    let (a, b) = clip_line_to_viewbox(&p(50, -10), &p(50, 110), &viewport, &ctx)
        .unwrap()
        .unwrap();
    assert_eq!((a, b), (p(50, 0), p(50, 100)));
}

#[test]
fn clip_path_output_is_contained() {
    let ctx = DecimalContext::default();
    let viewport = vb(0, 0, 100, 100);
    let tolerance = ctx.tolerance();

    let paths = [
        "M-50 50 L150 50",
        "M50 50 L150 150 L150 50 Z",
        "M-10 -10 C50 200 60 -100 110 110",
    ];

    for path in paths {
        let segments = parse_path(path).unwrap();
        let clipped = exactsvg::geom::clip_path_to_viewbox(&segments, &viewport, &ctx).unwrap();

        for seg in &clipped {
            match seg {
                exactsvg_types::PathSegment::MoveTo { x, y, .. }
                | exactsvg_types::PathSegment::LineTo { x, y, .. } => {
                    let point = Point::new(x.clone(), y.clone());
                    assert!(
                        point_in_viewbox(&point, &viewport, &tolerance),
                        "{} escaped while clipping {}",
                        point,
                        path
                    );
                }
                exactsvg_types::PathSegment::ClosePath { .. } => {}
                other => panic!("clipping must emit only M/L/Z, got {:?}", other),
            }
        }
    }
}

#[test]
fn shape_bboxes() {
    let ctx = DecimalContext::default();

    let circle = Shape::Circle {
        cx: d(50),
        cy: d(50),
        r: d(40),
    };
    let b = shape_bbox(&circle, &ctx).unwrap().unwrap();
    assert_eq!(b.min_x, d(10));
    assert_eq!(b.max_y, d(90));
    assert!(b.verified);

    let line = Shape::Line {
        x1: d(10),
        y1: d(90),
        x2: d(90),
        y2: d(10),
    };
    let b = shape_bbox(&line, &ctx).unwrap().unwrap();
    assert_eq!(b.min_x, d(10));
    assert_eq!(b.min_y, d(10));
    assert_eq!(b.max_x, d(90));
    assert_eq!(b.max_y, d(90));
}

#[test]
fn high_precision_survives_the_bbox() {
    let ctx = DecimalContext::default();

    // 45 fractional digits; an f64 implementation would mangle them.
    let x = "10.123456789012345678901234567890123456789012345";
    let segments = parse_path(&format!("M{} 0 L20 0", x)).unwrap();
    let b = path_bbox(&segments, &ctx).unwrap().unwrap();

    assert_eq!(b.min_x, Decimal::from_str(x).unwrap());
}
