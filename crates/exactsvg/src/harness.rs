// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The operation harness: a uniform adapter around the core.
//!
//! Inputs are classified, loaded and parsed; operations dispatch into
//! the geometry, rewriter and validator layers; outputs are emitted as
//! markup or handed back as a tree. The harness owns no geometry or
//! validation logic of its own.

use std::io::Read;
use std::time::Duration;

use exactsvg_tree::{Document, NodeId};
use exactsvg_types::{DecimalContext, PathSegment, ViewBox, DEFAULT_PRECISION};

use crate::geom::{clip_path_to_viewbox, path_bbox, BBox};
use crate::rewrite::{optimize_path_data, RewriteOptions};
use crate::validate::{self, ValidationReport};
use crate::{parse_path_data, Error, Shape};

/// How a string input should be interpreted.
///
/// Classification priority: markup, URL, selector, file path.
/// (A parsed tree enters through the typed [`Document`] APIs directly
/// and outranks every string form.)
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputKind {
    /// Inline SVG markup.
    Markup,
    /// An `http://` or `https://` URL.
    Url,
    /// A CSS selector, resolvable only against a document context.
    Selector,
    /// A filesystem path.
    FilePath,
}

/// Classifies a string input.
pub fn classify_input(text: &str) -> InputKind {
    if text.starts_with('<') {
        InputKind::Markup
    } else if text.starts_with("http://") || text.starts_with("https://") {
        InputKind::Url
    } else if text.starts_with('#') || text.starts_with('.') || text.starts_with('[') {
        InputKind::Selector
    } else {
        InputKind::FilePath
    }
}

/// What an operation should produce.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum OutputKind {
    /// Serialized markup.
    Markup,
    /// The mutated tree itself.
    Tree,
    /// Match the input kind: markup in, markup out.
    #[default]
    Auto,
}

/// What to do when a resource cannot be loaded.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ResourcePolicy {
    /// Propagate the failure.
    #[default]
    Fail,
    /// Log a warning and continue without the resource.
    Warn,
    /// Continue silently.
    Skip,
}

/// A pluggable URL loader.
///
/// Network access is an external collaborator; the default resolver
/// refuses every URL. Implementations must honor the passed timeout.
pub type UrlResolver = Box<dyn Fn(&str, Duration) -> Result<Vec<u8>, String>>;

/// Harness options.
pub struct Options {
    /// Decimal precision in significant digits.
    ///
    /// Default: 80
    pub precision: u32,

    /// Path rewriting options.
    pub rewrite: RewriteOptions,

    /// Resource failure handling.
    pub resource_policy: ResourcePolicy,

    /// Network timeout.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// URL loading hook.
    pub url_resolver: Option<UrlResolver>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            precision: DEFAULT_PRECISION,
            rewrite: RewriteOptions::default(),
            resource_policy: ResourcePolicy::default(),
            timeout: Duration::from_secs(30),
            url_resolver: None,
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("precision", &self.precision)
            .field("rewrite", &self.rewrite)
            .field("resource_policy", &self.resource_policy)
            .field("timeout", &self.timeout)
            .field(
                "url_resolver",
                if self.url_resolver.is_some() {
                    &"Some(..)"
                } else {
                    &"None"
                },
            )
            .finish()
    }
}

/// A loaded input: the parsed tree plus its source text, which the
/// validator needs for position tracking.
#[derive(Debug)]
pub struct Loaded {
    /// The parsed document.
    pub document: Document,
    /// The source markup.
    pub source: String,
}

/// The uniform operation wrapper.
///
/// One harness runs one operation at a time; there is no shared
/// mutable state between operations, and byte-identical inputs with
/// identical options produce byte-identical outputs.
#[derive(Debug)]
pub struct Harness {
    options: Options,
    ctx: DecimalContext,
}

impl Harness {
    /// Creates a harness, validating the configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError` for a precision outside the supported
    ///   range.
    pub fn new(options: Options) -> Result<Self, Error> {
        let ctx = DecimalContext::new(options.precision).map_err(Error::from)?;
        Ok(Harness { options, ctx })
    }

    /// The decimal context operations run under.
    pub fn context(&self) -> &DecimalContext {
        &self.ctx
    }

    /// Resolves an input to raw markup per the classification rules.
    ///
    /// Files are read from disk, with gzip-compressed SVGZ inflated
    /// transparently. URLs go through the configured resolver.
    /// Selectors cannot be loaded without a document context.
    fn load_text(&self, input: &str) -> Result<String, Error> {
        match classify_input(input) {
            InputKind::Markup => Ok(input.to_string()),
            InputKind::FilePath => {
                let data = std::fs::read(input).map_err(|e| {
                    Error::ResourceFailure(format!("cannot read '{}': {}", input, e))
                })?;
                decode_svg_data(data)
            }
            InputKind::Url => {
                let resolver = self.options.url_resolver.as_ref().ok_or_else(|| {
                    Error::ResourceFailure(format!("no URL resolver configured for '{}'", input))
                })?;
                let data =
                    resolver(input, self.options.timeout).map_err(Error::ResourceFailure)?;
                decode_svg_data(data)
            }
            InputKind::Selector => Err(Error::ConfigurationError(format!(
                "selector input '{}' requires a document context",
                input
            ))),
        }
    }

    /// Loads and parses an input per the classification rules.
    pub fn load(&self, input: &str) -> Result<Loaded, Error> {
        let text = self.load_text(input)?;
        let document = Document::parse_str(&text)?;
        Ok(Loaded {
            document,
            source: text,
        })
    }

    /// Validates an input, producing an ordered issue report.
    ///
    /// Parsing problems become issues, never errors. A resource
    /// failure surfaces only under the `Fail` policy; `Warn` and
    /// `Skip` produce an empty report.
    pub fn validate(&self, input: &str) -> Result<ValidationReport, Error> {
        let text = match self.load_text(input) {
            Ok(text) => text,
            Err(e @ Error::ResourceFailure(_)) => {
                return match self.options.resource_policy {
                    ResourcePolicy::Fail => Err(e),
                    ResourcePolicy::Warn => {
                        log::warn!("{}", e);
                        Ok(ValidationReport { issues: Vec::new() })
                    }
                    ResourcePolicy::Skip => Ok(ValidationReport { issues: Vec::new() }),
                };
            }
            Err(e) => return Err(e),
        };

        Ok(validate::validate_str(&text))
    }

    /// Runs the default rewrite pipeline over every `d` attribute.
    ///
    /// Returns the number of rewritten paths.
    pub fn optimize_document(&self, doc: &mut Document) -> Result<usize, Error> {
        let targets: Vec<NodeId> = doc
            .descendants()
            .filter(|n| n.tag_name() == Some("path") && n.has_attribute("d"))
            .map(|n| n.id())
            .collect();

        let mut rewritten = 0;
        for id in targets {
            let d = match doc.get(id).attribute("d") {
                Some(d) => d.to_string(),
                None => continue,
            };

            match optimize_path_data(&d, &self.options.rewrite, &self.ctx) {
                Ok(optimized) => {
                    if optimized.len() <= d.len() {
                        doc.set_attribute(id, "d", &optimized);
                        rewritten += 1;
                    }
                }
                Err(e) => {
                    log::warn!("skipping an unoptimizable path: {}", e);
                }
            }
        }

        Ok(rewritten)
    }

    /// Loads an input, optimizes it and emits markup.
    pub fn optimize(&self, input: &str) -> Result<String, Error> {
        let mut loaded = self.load(input)?;
        self.optimize_document(&mut loaded.document)?;
        Ok(self.emit(&loaded.document))
    }

    /// The exact bounding box of one element's own geometry.
    ///
    /// Returns `None` for elements with no geometry (groups, gradients)
    /// and for empty paths.
    pub fn element_bbox(&self, doc: &Document, id: NodeId) -> Result<Option<BBox>, Error> {
        match self.element_path(doc, id)? {
            Some(segments) => path_bbox(&segments, &self.ctx),
            None => Ok(None),
        }
    }

    /// Checks whether an element's geometry lies entirely outside the
    /// document viewBox.
    ///
    /// Returns `None` when the element has no geometry or the document
    /// has no viewBox. Out-of-view detection operates on the element's
    /// own geometry; references are not followed.
    pub fn is_out_of_view(&self, doc: &Document, id: NodeId) -> Result<Option<bool>, Error> {
        let vb = match self.document_viewbox(doc)? {
            Some(vb) => vb,
            None => return Ok(None),
        };

        match self.element_bbox(doc, id)? {
            Some(bbox) => Ok(Some(!bbox.intersects_viewbox(&vb))),
            None => Ok(None),
        }
    }

    /// Clips every path to the document viewBox.
    ///
    /// Paths that vanish entirely are removed. Returns the number of
    /// touched elements.
    pub fn clip_to_viewbox(&self, doc: &mut Document) -> Result<usize, Error> {
        let vb = match self.document_viewbox(doc)? {
            Some(vb) => vb,
            None => return Ok(0),
        };

        let targets: Vec<NodeId> = doc
            .descendants()
            .filter(|n| n.tag_name() == Some("path") && n.has_attribute("d"))
            .map(|n| n.id())
            .collect();

        let mut touched = 0;
        for id in targets {
            let d = match doc.get(id).attribute("d") {
                Some(d) => d.to_string(),
                None => continue,
            };

            let segments = match parse_path_data(&d) {
                Ok(s) => s,
                Err(e) => {
                    log::warn!("skipping an unclippable path: {}", e);
                    continue;
                }
            };

            let clipped = clip_path_to_viewbox(&segments, &vb, &self.ctx)?;
            if clipped.is_empty() {
                doc.remove_child(id);
            } else {
                let write_opt = exactsvg_types::WriteOptions {
                    precision: self.options.rewrite.precision,
                    minify: true,
                    collapse_repeated: true,
                };
                doc.set_attribute(id, "d", &exactsvg_types::write_path(&clipped, &write_opt));
            }
            touched += 1;
        }

        Ok(touched)
    }

    /// Removes every element whose geometry lies entirely outside the
    /// document viewBox. Returns the number of removed elements.
    pub fn remove_offscreen(&self, doc: &mut Document) -> Result<usize, Error> {
        let candidates: Vec<NodeId> = doc
            .descendants()
            .filter(|n| n.is_element())
            .map(|n| n.id())
            .collect();

        let mut removed = 0;
        for id in candidates {
            if self.is_out_of_view(doc, id)? == Some(true) {
                doc.remove_child(id);
                removed += 1;
            }
        }

        Ok(removed)
    }

    /// Serializes a document back to markup.
    pub fn emit(&self, doc: &Document) -> String {
        doc.to_string_pretty(&exactsvg_tree::WriteOptions::default())
    }

    /// The document viewBox, when present and well-formed.
    fn document_viewbox(&self, doc: &Document) -> Result<Option<ViewBox>, Error> {
        match doc.root_element().attribute("viewBox") {
            Some(text) => Ok(Some(ViewBox::parse(text)?)),
            None => Ok(None),
        }
    }

    /// An element's own geometry as an absolute-capable segment stream:
    /// parsed path data, or a lowered shape.
    fn element_path(&self, doc: &Document, id: NodeId) -> Result<Option<Vec<PathSegment>>, Error> {
        let node = doc.get(id);

        if node.tag_name() == Some("path") {
            return match node.attribute("d") {
                Some(d) => Ok(Some(parse_path_data(d)?)),
                None => Ok(None),
            };
        }

        match Shape::from_node(&node) {
            Ok(Some(shape)) => Ok(Some(shape.to_path(&self.ctx))),
            Ok(None) => Ok(None),
            Err(e) => {
                // A shape with units or bad numbers has no geometry we
                // can reason about; skip rather than fail the batch.
                log::warn!("{}", e);
                Ok(None)
            }
        }
    }
}

fn decode_svg_data(data: Vec<u8>) -> Result<String, Error> {
    // SVGZ sniffing: a gzip stream starts with 0x1f 0x8b.
    let data = if data.starts_with(&[0x1f, 0x8b]) {
        let mut decoder = flate2::read::GzDecoder::new(data.as_slice());
        let mut decoded = Vec::with_capacity(data.len() * 32);
        decoder
            .read_to_end(&mut decoded)
            .map_err(|e| Error::MalformedInput(format!("malformed SVGZ: {}", e)))?;
        decoded
    } else {
        data
    };

    String::from_utf8(data)
        .map_err(|_| Error::MalformedInput("provided data has not an UTF-8 encoding".to_string()))
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_classification() {
        assert_eq!(classify_input("<svg/>"), InputKind::Markup);
        assert_eq!(classify_input("http://example.com/a.svg"), InputKind::Url);
        assert_eq!(classify_input("https://example.com/a.svg"), InputKind::Url);
        assert_eq!(classify_input("#icon"), InputKind::Selector);
        assert_eq!(classify_input(".icon"), InputKind::Selector);
        assert_eq!(classify_input("[data-x]"), InputKind::Selector);
        assert_eq!(classify_input("images/a.svg"), InputKind::FilePath);
        assert_eq!(classify_input("httpish.svg"), InputKind::FilePath);
    }

    #[test]
    fn invalid_precision_is_a_configuration_error() {
        let options = Options { precision: 0, ..Options::default() };
        assert!(matches!(
            Harness::new(options),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn url_without_resolver_fails() {
        let harness = Harness::new(Options::default()).unwrap();
        assert!(matches!(
            harness.load("https://example.com/a.svg"),
            Err(Error::ResourceFailure(_))
        ));
    }

    #[test]
    fn custom_resolver_runs() {
        let mut options = Options::default();
        options.url_resolver = Some(Box::new(|_url, _timeout| {
            Ok(b"<svg xmlns='http://www.w3.org/2000/svg'/>".to_vec())
        }));

        let harness = Harness::new(options).unwrap();
        let loaded = harness.load("https://example.com/a.svg").unwrap();
        assert_eq!(loaded.document.root_element().tag_name(), Some("svg"));
    }

    #[test]
    fn validate_reports_parse_failures_as_issues() {
        let harness = Harness::new(Options::default()).unwrap();
        let report = harness.validate("<svg").unwrap();
        assert!(!report.is_valid());
        assert_eq!(report.issue_count(), 1);
    }

    #[test]
    fn skip_policy_swallows_resource_failures() {
        let mut options = Options::default();
        options.resource_policy = ResourcePolicy::Skip;

        let harness = Harness::new(options).unwrap();
        let report = harness.validate("https://example.com/a.svg").unwrap();
        assert!(report.issues.is_empty());
    }

    #[test]
    fn optimize_rewrites_paths() {
        let harness = Harness::new(Options::default()).unwrap();
        let out = harness
            .optimize("<svg xmlns='http://www.w3.org/2000/svg'><path d='M 0 0 L 10 0 L 20 0 L 20 10'/></svg>")
            .unwrap();
        assert!(out.contains("M0 0H20V10") || out.contains("m0 0h20v10"));
    }

    #[test]
    fn out_of_view_detection() {
        let harness = Harness::new(Options::default()).unwrap();
        let loaded = harness
            .load("<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>\
                     <rect x='-200' y='0' width='50' height='50'/>\
                     <rect x='20' y='20' width='50' height='50'/>\
                   </svg>")
            .unwrap();

        let doc = loaded.document;
        let ids: Vec<NodeId> = doc
            .root_element()
            .children()
            .filter(|n| n.is_element())
            .map(|n| n.id())
            .collect();

        assert_eq!(harness.is_out_of_view(&doc, ids[0]).unwrap(), Some(true));
        assert_eq!(harness.is_out_of_view(&doc, ids[1]).unwrap(), Some(false));
    }

    #[test]
    fn remove_offscreen_drops_elements() {
        let harness = Harness::new(Options::default()).unwrap();
        let mut loaded = harness
            .load("<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>\
                     <circle cx='-500' cy='0' r='10'/>\
                     <circle cx='50' cy='50' r='10'/>\
                   </svg>")
            .unwrap();

        let removed = harness.remove_offscreen(&mut loaded.document).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(
            loaded.document.root_element().children().count(),
            1
        );
    }
}
