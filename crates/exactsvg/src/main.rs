// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Read;
use std::process;
use std::str::FromStr;

use pico_args::Arguments;

use exactsvg::harness::{Harness, Options};
use exactsvg::validate::OutputFormat;

const HELP: &str = "\
exactsvg is an SVG optimization and validation tool with
arbitrary-precision geometry.

USAGE:
  exactsvg [OPTIONS] <in-svg> <out-file>   # from file to file
  exactsvg [OPTIONS] <in-svg> -c           # from file to stdout
  exactsvg [OPTIONS] - <out-file>          # from stdin to file
  exactsvg [OPTIONS] - -c                  # from stdin to stdout

OPTIONS:
  -h, --help                Prints help information
  -V, --version             Prints version information
  -c                        Prints the output to the stdout

  --validate                Validates the input instead of rewriting it
  --format FORMAT           Selects the validation report format
                            [default: text]
                            [possible values: text, json, yaml, xml]

  --clip                    Clips every path to the document viewBox
  --remove-offscreen        Removes elements fully outside the viewBox
  --bbox ID                 Prints the exact bounding box of the element
                            with the given id instead of rewriting

  --precision DIGITS        Sets the coordinate output precision
                            [default: 6] [possible values: 0..12]
  --decimal-digits DIGITS   Sets the significant digits of the decimal
                            arithmetic [default: 80] [possible values: 1..100]

  --quiet                   Disables warnings

ARGS:
  <in-svg>                  Input file, inline markup or '-' for stdin
  <out-file>                Output file or '-c' for stdout
";

#[derive(Debug)]
struct Args {
    validate: bool,
    format: OutputFormat,
    clip: bool,
    remove_offscreen: bool,
    bbox: Option<String>,
    precision: u8,
    decimal_digits: u32,
    quiet: bool,
    input: String,
    output: String,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    Ok(Args {
        validate: input.contains("--validate"),
        format: input
            .opt_value_from_fn("--format", parse_format)?
            .unwrap_or(OutputFormat::Text),
        clip: input.contains("--clip"),
        remove_offscreen: input.contains("--remove-offscreen"),
        bbox: input.opt_value_from_str("--bbox")?,
        precision: input
            .opt_value_from_fn("--precision", parse_precision)?
            .unwrap_or(6),
        decimal_digits: input
            .opt_value_from_fn("--decimal-digits", parse_decimal_digits)?
            .unwrap_or(exactsvg::types::DEFAULT_PRECISION),
        quiet: input.contains("--quiet"),
        input: input.free_from_str()?,
        output: input.free_from_str()?,
    })
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(s).map_err(|e| e.to_string())
}

fn parse_precision(s: &str) -> Result<u8, String> {
    let n: u8 = s.parse().map_err(|_| "invalid number")?;

    if n <= 12 {
        Ok(n)
    } else {
        Err("precision out of bounds".to_string())
    }
}

fn parse_decimal_digits(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if n >= 1 && n <= exactsvg::types::MAX_PRECISION {
        Ok(n)
    } else {
        Err("decimal digits out of bounds".to_string())
    }
}

#[derive(Clone, PartialEq, Debug)]
enum InputFrom<'a> {
    Stdin,
    Source(&'a str),
}

#[derive(Clone, PartialEq, Debug)]
enum OutputTo<'a> {
    Stdout,
    File(&'a str),
}

fn main() {
    let args = match collect_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            process::exit(1);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    if let Err(e) = process(args) {
        eprintln!("Error: {}.", e);
        process::exit(1);
    }
}

fn process(args: Args) -> Result<(), String> {
    let (svg_from, svg_to) = {
        let in_svg = args.input.as_str();
        let out_svg = args.output.as_str();

        let svg_from = if in_svg == "-" {
            InputFrom::Stdin
        } else if in_svg == "-c" {
            return Err("-c should be set after input".to_string());
        } else {
            InputFrom::Source(in_svg)
        };

        let svg_to = if out_svg == "-c" {
            OutputTo::Stdout
        } else {
            OutputTo::File(out_svg)
        };

        (svg_from, svg_to)
    };

    let mut options = Options::default();
    options.precision = args.decimal_digits;
    options.rewrite.precision = args.precision;

    let harness = Harness::new(options).map_err(|e| e.to_string())?;

    let input = match svg_from {
        InputFrom::Stdin => load_stdin()?,
        InputFrom::Source(source) => source.to_string(),
    };

    let output = if args.validate {
        let report = harness.validate(&input).map_err(|e| e.to_string())?;
        report.render(args.format)
    } else if let Some(id) = &args.bbox {
        let loaded = harness.load(&input).map_err(|e| e.to_string())?;
        let node = loaded
            .document
            .element_by_id(id)
            .ok_or_else(|| format!("no element with id '{}'", id))?;

        match harness
            .element_bbox(&loaded.document, node.id())
            .map_err(|e| e.to_string())?
        {
            Some(bbox) => format!(
                "{} {} {} {}\n",
                exactsvg::types::to_plain_string(&bbox.min_x),
                exactsvg::types::to_plain_string(&bbox.min_y),
                exactsvg::types::to_plain_string(&bbox.width()),
                exactsvg::types::to_plain_string(&bbox.height())
            ),
            None => return Err(format!("element '{}' has no geometry", id)),
        }
    } else {
        let mut loaded = harness.load(&input).map_err(|e| e.to_string())?;

        if args.clip {
            harness
                .clip_to_viewbox(&mut loaded.document)
                .map_err(|e| e.to_string())?;
        }
        if args.remove_offscreen {
            harness
                .remove_offscreen(&mut loaded.document)
                .map_err(|e| e.to_string())?;
        }

        harness
            .optimize_document(&mut loaded.document)
            .map_err(|e| e.to_string())?;

        harness.emit(&loaded.document)
    };

    match svg_to {
        OutputTo::Stdout => {
            print!("{}", output);
        }
        OutputTo::File(path) => {
            std::fs::write(path, output).map_err(|e| e.to_string())?;
        }
    }

    Ok(())
}

fn load_stdin() -> Result<String, String> {
    let mut buf = String::new();
    let stdin = std::io::stdin();
    let mut handle = stdin.lock();

    handle.read_to_string(&mut buf).map_err(|e| e.to_string())?;

    Ok(buf)
}

static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, record.args()),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, record.args()),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, record.args()),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, record.args()),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, record.args()),
            }
        }
    }

    fn flush(&self) {}
}
