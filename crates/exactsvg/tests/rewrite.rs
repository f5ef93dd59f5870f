use exactsvg::rewrite::{optimize, optimize_path_data, RewriteOptions};
use exactsvg::DecimalContext;
use exactsvg_types::{parse_path, write_path, WriteOptions};

fn run(d: &str) -> String {
    let ctx = DecimalContext::default();
    optimize_path_data(d, &RewriteOptions::default(), &ctx).unwrap()
}

#[test]
fn composed_rewrite_scenario() {
    // remove-zero-length, L->H/V, collapse-repeated, L->Z compose into
    // the minimal square form.
    assert_eq!(run("M0 0 L10 0 L20 0 L20 0 L20 10 L0 10 Z"), "M0 0H20V10H0Z");
}

#[test]
fn zero_length_segments_are_removed() {
    assert_eq!(run("M0 0 L10 0 L10 0 L10 10"), "M0 0H10V10");
}

#[test]
fn straight_cubic_becomes_a_line() {
    assert_eq!(run("M0 0 C10 0 20 0 30 0"), "M0 0H30");
}

#[test]
fn bulging_cubic_stays_a_curve() {
    assert_eq!(run("M0 0 C0 100 100 100 100 0"), "M0 0C0 100 100 100 100 0");
}

#[test]
fn elevated_cubic_lowers_to_quadratic() {
    // C20 40 40 40 60 0 is Q30 60 60 0 degree-elevated.
    assert_eq!(run("M0 0 C20 40 40 40 60 0"), "M0 0Q30 60 60 0");
}

#[test]
fn reflected_cubic_becomes_smooth() {
    // The shorthand then wins the relative/absolute comparison too.
    assert_eq!(
        run("M10 10 C20 0 30 20 40 10 C50 0 60 20 70 10"),
        "M10 10C20 0 30 20 40 10s20 10 30 0"
    );
}

#[test]
fn reflected_quadratic_becomes_smooth() {
    assert_eq!(run("M0 0 Q10 20 20 0 Q30 -20 40 0"), "M0 0Q10 20 20 0T40 0");
}

#[test]
fn final_line_becomes_close() {
    assert_eq!(run("M0 0 L10 0 L10 10 L0 0"), "M0 0H10V10Z");
}

#[test]
fn line_before_close_is_dropped() {
    assert_eq!(run("M0 0 L10 0 L10 10 L0 0 Z"), "M0 0H10V10Z");
}

#[test]
fn relative_form_wins_when_shorter() {
    // Large absolute coordinates with small deltas favor relative.
    assert_eq!(run("M1000 1000 L1010 1010"), "M1000 1000l10 10");
}

#[test]
fn absolute_wins_ties() {
    let out = run("M10 10 L20 30");
    // "L20 30" and "l10 20" tie at 6 bytes; the absolute form stays.
    assert_eq!(out, "M10 10L20 30");
}

#[test]
fn numeric_formatting_rounds_and_trims() {
    assert_eq!(run("M0 0 L10.1234567 0"), "M0 0H10.123457");
}

#[test]
fn leading_zeros_are_stripped() {
    assert_eq!(run("M0.5000 0.25 L0.5 10"), "M.5.25V10");
}

#[test]
fn pipeline_is_idempotent() {
    let ctx = DecimalContext::default();
    let opt = RewriteOptions::default();

    let inputs = [
        "M0 0 L10 0 L20 0 L20 0 L20 10 L0 10 Z",
        "M0 0 C10 0 20 0 30 0 Q40 0 50 0",
        "M10 10 C20 0 30 20 40 10 C50 0 60 20 70 10",
        "m5 5 l10 0 l0 10 l-10 0 z",
        "M0 50 A50 50 0 0 1 100 50",
    ];

    for input in inputs {
        let once = optimize_path_data(input, &opt, &ctx).unwrap();
        let twice = optimize_path_data(&once, &opt, &ctx).unwrap();
        assert_eq!(once, twice, "pipeline must be idempotent for {}", input);
    }
}

#[test]
fn every_pass_verifies() {
    let ctx = DecimalContext::default();
    let opt = RewriteOptions::default();

    let segments = parse_path("M0 0 L10 0 L20 0 L20 0 L20 10 L0 10 Z").unwrap();
    let result = optimize(&segments, &opt, &ctx).unwrap();

    assert!(!result.passes.is_empty());
    for pass in &result.passes {
        assert!(pass.verified, "pass '{}' must verify", pass.name);
    }
}

#[test]
fn arcs_survive_when_curved() {
    // The relative endpoint (100, 0) is a byte shorter than (100, 50).
    assert_eq!(run("M0 50 A50 50 0 0 1 100 50"), "M0 50a50 50 0 01100 0");
}

#[test]
fn flat_arc_becomes_a_line() {
    // Sagitta of 1e10 over a chord of 1 is far below the tolerance.
    assert_eq!(run("M0 0 A10000000000 10000000000 0 0 1 1 0"), "M0 0H1");
}

#[test]
fn curves_with_visible_shape_are_kept_despite_equal_endpoints() {
    let out = run("M0 0 C0 50 50 50 0 0");
    assert!(out.contains('C') || out.contains('c'), "got {}", out);
}

#[test]
fn rewriter_never_mutates_its_input() {
    let ctx = DecimalContext::default();
    let segments = parse_path("M0 0 L10 0 L20 0").unwrap();
    let before = write_path(&segments, &WriteOptions::default());

    let _ = optimize(&segments, &RewriteOptions::default(), &ctx).unwrap();

    assert_eq!(write_path(&segments, &WriteOptions::default()), before);
}

#[test]
fn units_bearing_values_never_reach_the_rewriter() {
    // The numeric pass operates on parsed path data only; a `d` with
    // units is simply unparseable and the caller keeps the original.
    assert!(parse_path("M10px 0").is_err());
}
