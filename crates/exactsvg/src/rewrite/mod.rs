// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The path rewriter: a pipeline of idempotent, individually verified
//! canonicalization passes over a command stream.
//!
//! Every pass returns a fresh stream and a diagnostic record; a pass
//! that cannot verify its own output against the input geometry
//! returns the input unchanged and reports `verified = false`.

use exactsvg_types::{write_path, Decimal, DecimalContext, PathSegment, WriteOptions};
use num_bigint::BigInt;

use crate::{parse_path_data, Error};

mod absrel;
mod passes;
mod verify;

pub use absrel::{to_absolute, to_relative};

/// Rewrite pipeline options.
#[derive(Clone, Debug)]
pub struct RewriteOptions {
    /// Numeric precision for the formatting pass and for the
    /// shorter-form comparison, in fractional digits.
    ///
    /// Default: 6
    pub precision: u8,

    /// Positional tolerance. `None` uses the context default (1e-10).
    pub tolerance: Option<Decimal>,

    /// Fuses adjacent collinear same-direction line segments and
    /// merges repeated command letters on output.
    pub collapse_repeated: bool,

    /// Drops segments whose post-state equals their pre-state.
    pub remove_zero_length: bool,

    /// Turns curves that are straight within tolerance into lines.
    pub straight_curves: bool,

    /// Lowers degree-elevated cubics back to quadratics.
    pub convert_to_q: bool,

    /// Turns axis-parallel lines into `H`/`V`.
    pub line_shorthands: bool,

    /// Turns reflected curves into `S`/`T` shorthands.
    pub curve_smooth_shorthands: bool,

    /// Turns a final line back to the subpath start into `Z`.
    pub convert_to_z: bool,

    /// Chooses the shorter of the absolute and relative form
    /// per command.
    pub utilize_absolute: bool,

    /// Rounds coordinates to `precision` fractional digits.
    pub format_numbers: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        RewriteOptions {
            precision: 6,
            tolerance: None,
            collapse_repeated: true,
            remove_zero_length: true,
            straight_curves: true,
            convert_to_q: true,
            line_shorthands: true,
            curve_smooth_shorthands: true,
            convert_to_z: true,
            utilize_absolute: true,
            format_numbers: true,
        }
    }
}

/// The outcome of a single rewrite pass.
#[derive(Clone, Debug)]
pub struct PassReport {
    /// The pass name.
    pub name: &'static str,
    /// The rewritten stream; equals the input when unverified.
    pub segments: Vec<PathSegment>,
    /// Whether the output geometry re-verified against the input.
    pub verified: bool,
    /// Serialized size win in bytes, when non-negative.
    pub saved_bytes: Option<i64>,
    /// Segments fused with a neighbor.
    pub merge_count: Option<usize>,
    /// Command letters that will collapse away on output.
    pub collapse_count: Option<usize>,
    /// Segments removed outright.
    pub remove_count: Option<usize>,
}

/// The outcome of the whole pipeline.
#[derive(Clone, Debug)]
pub struct RewriteResult {
    /// The final stream.
    pub segments: Vec<PathSegment>,
    /// Per-pass diagnostics, in execution order.
    pub passes: Vec<PassReport>,
}

pub(crate) struct PassContext<'a> {
    pub ctx: &'a DecimalContext,
    pub tolerance: Decimal,
    pub precision: u8,
}

impl PassContext<'_> {
    /// Seals a pass: re-verifies the rewritten stream against the
    /// original and reverts on failure.
    ///
    /// The verification tolerance scales with the number of changes:
    /// every individual rewrite moves geometry by at most the base
    /// tolerance, and relative chains accumulate the error linearly.
    pub fn finish(
        &self,
        name: &'static str,
        original: &[PathSegment],
        rewritten: Vec<PathSegment>,
        changes: usize,
        base_tolerance: &Decimal,
        mut report: PassReport,
    ) -> Result<PassReport, Error> {
        if changes == 0 {
            report.name = name;
            report.segments = original.to_vec();
            report.verified = true;
            return Ok(report);
        }

        let scaled = base_tolerance * Decimal::from(changes as u64 + 1);
        let verified = verify::streams_match(original, &rewritten, self.ctx, &scaled)?;

        report.name = name;
        if verified {
            report.saved_bytes = Some(saved_bytes(original, &rewritten));
            report.segments = rewritten;
            report.verified = true;
        } else {
            log::warn!("Pass '{}' failed verification; reverted.", name);
            report.segments = original.to_vec();
            report.verified = false;
        }

        Ok(report)
    }
}

impl PassReport {
    pub(crate) fn empty() -> Self {
        PassReport {
            name: "",
            segments: Vec::new(),
            verified: false,
            saved_bytes: None,
            merge_count: None,
            collapse_count: None,
            remove_count: None,
        }
    }
}

fn saved_bytes(before: &[PathSegment], after: &[PathSegment]) -> i64 {
    let opt = WriteOptions {
        minify: true,
        collapse_repeated: true,
        ..WriteOptions::default()
    };
    write_path(before, &opt).len() as i64 - write_path(after, &opt).len() as i64
}

/// Runs the default pipeline over a command stream.
///
/// Pipeline order: collapse-repeated, remove-zero-length,
/// straight-curves-to-lines (with degree lowering), line-shorthands,
/// curve-to-smooth, collapse-repeated again, line-to-Z,
/// absolute-or-relative selection, numeric formatting.
///
/// Running the pipeline twice produces the same stream as running it
/// once.
pub fn optimize(
    segments: &[PathSegment],
    opt: &RewriteOptions,
    ctx: &DecimalContext,
) -> Result<RewriteResult, Error> {
    let pass_ctx = PassContext {
        ctx,
        tolerance: opt.tolerance.clone().unwrap_or_else(|| ctx.tolerance()),
        precision: opt.precision,
    };

    let mut current = segments.to_vec();
    let mut reports = Vec::new();

    let run = |current: &mut Vec<PathSegment>,
                   reports: &mut Vec<PassReport>,
                   enabled: bool,
                   pass: &dyn Fn(&[PathSegment], &PassContext) -> Result<PassReport, Error>|
     -> Result<(), Error> {
        if !enabled {
            return Ok(());
        }
        let report = pass(current, &pass_ctx)?;
        *current = report.segments.clone();
        reports.push(report);
        Ok(())
    };

    run(&mut current, &mut reports, opt.collapse_repeated, &passes::collapse_repeated)?;
    run(&mut current, &mut reports, opt.remove_zero_length, &passes::remove_zero_length)?;
    run(
        &mut current,
        &mut reports,
        opt.straight_curves,
        &|s, c| passes::straight_curves(s, c, opt.convert_to_q),
    )?;
    run(&mut current, &mut reports, opt.line_shorthands, &passes::line_shorthands)?;
    run(
        &mut current,
        &mut reports,
        opt.curve_smooth_shorthands,
        &passes::curve_smooth_shorthands,
    )?;
    run(&mut current, &mut reports, opt.collapse_repeated, &passes::collapse_repeated)?;
    run(&mut current, &mut reports, opt.convert_to_z, &passes::convert_to_z)?;
    run(&mut current, &mut reports, opt.utilize_absolute, &absrel::choose_shorter_form)?;
    run(&mut current, &mut reports, opt.format_numbers, &passes::format_numbers)?;

    Ok(RewriteResult {
        segments: current,
        passes: reports,
    })
}

/// Parses, optimizes and reserializes a `d` attribute.
///
/// The output uses minified whitespace and collapsed command letters.
pub fn optimize_path_data(
    d: &str,
    opt: &RewriteOptions,
    ctx: &DecimalContext,
) -> Result<String, Error> {
    let segments = parse_path_data(d)?;
    let result = optimize(&segments, opt, ctx)?;

    let write_opt = WriteOptions {
        precision: opt.precision,
        minify: true,
        collapse_repeated: opt.collapse_repeated,
    };
    Ok(write_path(&result.segments, &write_opt))
}

pub(crate) fn pow10_negative(digits: u8) -> Decimal {
    Decimal::new(BigInt::from(1), i64::from(digits))
}
