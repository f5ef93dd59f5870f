// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rule-driven static analysis of an SVG document.
//!
//! The validator never mutates and never aborts: an unparseable input
//! produces a single `input_error` issue and the pass completes. Issues
//! carry source positions resolved through a raw-text scan, ordered by
//! `(line, column)`.

use std::collections::{HashMap, HashSet};

use exactsvg_tree::{Document, Node};
use exactsvg_types::{
    is_valid_color, parse_path, parse_points, Decimal, LengthUnit, Stream, ViewBox,
};

mod position;
mod report;
mod tables;

pub use report::{OutputFormat, ValidationReport};

use position::PositionIndex;

/// Issue severity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Severity {
    /// The document is broken or renders incorrectly.
    Error,
    /// The document works but carries a defect.
    Warning,
}

impl Severity {
    /// The lowercase tag used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// The rule family an issue belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum IssueKind {
    InputError,
    BrokenReference,
    DuplicateId,
    MissingRequiredAttribute,
    InvalidChild,
    AnimationInEmptyElement,
    MalformedValue,
    InvalidEnumValue,
    NumericRangeViolation,
    DisallowedAttribute,
    MissingNamespace,
    LexicalStyle,
    MistypedName,
    InvalidColor,
}

impl IssueKind {
    /// The snake_case tag used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::InputError => "input_error",
            IssueKind::BrokenReference => "broken_reference",
            IssueKind::DuplicateId => "duplicate_id",
            IssueKind::MissingRequiredAttribute => "missing_required_attribute",
            IssueKind::InvalidChild => "invalid_child",
            IssueKind::AnimationInEmptyElement => "animation_in_empty_element",
            IssueKind::MalformedValue => "malformed_value",
            IssueKind::InvalidEnumValue => "invalid_enum_value",
            IssueKind::NumericRangeViolation => "numeric_range_violation",
            IssueKind::DisallowedAttribute => "disallowed_attribute",
            IssueKind::MissingNamespace => "missing_namespace",
            IssueKind::LexicalStyle => "lexical_style",
            IssueKind::MistypedName => "mistyped_name",
            IssueKind::InvalidColor => "invalid_color",
        }
    }
}

/// A single validation finding.
#[derive(Clone, Debug)]
pub struct Issue {
    /// The rule family.
    pub kind: IssueKind,
    /// Error or warning, per the fixed classification table.
    pub severity: Severity,
    /// 1-based source line; 0 for document-level issues.
    pub line: usize,
    /// 1-based source column; 0 for document-level issues.
    pub column: usize,
    /// The element tag name, when attributable.
    pub element: Option<String>,
    /// The attribute name, when attributable.
    pub attribute: Option<String>,
    /// The offending value, when attributable.
    pub value: Option<String>,
    /// A human-readable explanation.
    pub reason: String,
    /// The raw source line.
    pub source_line: Option<String>,
}

/// Validates an SVG document given as text.
pub fn validate_str(text: &str) -> ValidationReport {
    let index = PositionIndex::build(text);
    let mut issues = Vec::new();

    check_xlink_namespace(&index, &mut issues);

    match Document::parse_str(text) {
        Ok(doc) => {
            let mut validator = Validator {
                index: &index,
                issues: &mut issues,
                seen_ids: HashSet::new(),
                pending_refs: Vec::new(),
                occurrences: HashMap::new(),
            };
            validator.run(&doc);
        }
        Err(e) => {
            let pos = e.pos();
            let (line, column) = (pos.row as usize, pos.col as usize);
            issues.push(Issue {
                kind: IssueKind::InputError,
                severity: Severity::Error,
                line,
                column,
                element: None,
                attribute: None,
                value: None,
                reason: format!("the document is not parseable: {}", e),
                source_line: index.source_line(line),
            });
        }
    }

    issues.sort_by(|a, b| {
        (a.line, a.column, a.severity).cmp(&(b.line, b.column, b.severity))
    });

    ValidationReport { issues }
}

struct Validator<'a> {
    index: &'a PositionIndex,
    issues: &'a mut Vec<Issue>,
    seen_ids: HashSet<String>,
    // (id, issue skeleton) pairs resolved once all ids are known.
    pending_refs: Vec<(String, Issue)>,
    occurrences: HashMap<String, usize>,
}

impl Validator<'_> {
    fn run(&mut self, doc: &Document) {
        let all_ids: HashSet<String> = doc
            .descendants()
            .filter_map(|n| n.attribute("id").map(|v| v.to_string()))
            .collect();

        for node in doc.descendants().filter(|n| n.is_element()) {
            self.check_element(&node);
        }

        for (id, mut issue) in std::mem::take(&mut self.pending_refs) {
            if !all_ids.contains(&id) {
                issue.reason = format!("reference to a non-existent id '{}'", id);
                self.issues.push(issue);
            }
        }
    }

    fn push(
        &mut self,
        kind: IssueKind,
        severity: Severity,
        pos: (usize, usize),
        element: Option<&str>,
        attribute: Option<&str>,
        value: Option<&str>,
        reason: String,
    ) {
        self.issues.push(Issue {
            kind,
            severity,
            line: pos.0,
            column: pos.1,
            element: element.map(|s| s.to_string()),
            attribute: attribute.map(|s| s.to_string()),
            value: value.map(|s| s.to_string()),
            reason,
            source_line: self.index.source_line(pos.0),
        });
    }

    fn check_element(&mut self, node: &Node) {
        let tag = match node.tag_name() {
            Some(tag) => tag.to_string(),
            None => return,
        };

        let n = {
            let counter = self.occurrences.entry(tag.clone()).or_insert(0);
            let n = *counter;
            *counter += 1;
            n
        };

        let elem_pos = self
            .index
            .occurrence(&tag, n)
            .map(|occ| (occ.line, occ.column))
            .unwrap_or((0, 0));

        self.check_element_name(&tag, elem_pos);
        self.check_required_attributes(node, &tag, elem_pos);
        self.check_parent_child(node, &tag, elem_pos);
        self.check_duplicate_id(node, &tag, elem_pos);

        for attr in node.attributes() {
            let attr_pos = self
                .index
                .attribute_position(&tag, n, &attr.name)
                .unwrap_or(elem_pos);
            self.check_attribute(&tag, &attr.name, &attr.value, attr_pos);
        }
    }

    fn check_element_name(&mut self, tag: &str, pos: (usize, usize)) {
        if tables::is_known_element(tag) || tag.contains(':') {
            return;
        }

        let mut dictionary: Vec<&str> = Vec::new();
        dictionary.extend_from_slice(tables::SVG11_ELEMENTS);
        dictionary.extend_from_slice(tables::SVG2_ELEMENTS);

        if let Some(suggestion) = tables::closest_match(tag, &dictionary) {
            self.push(
                IssueKind::MistypedName,
                Severity::Warning,
                pos,
                Some(tag),
                None,
                None,
                format!("unknown element '{}'; did you mean '{}'?", tag, suggestion),
            );
        }
    }

    fn check_required_attributes(&mut self, node: &Node, tag: &str, pos: (usize, usize)) {
        for required in tables::required_attributes(tag) {
            if !node.has_attribute(required) {
                self.push(
                    IssueKind::MissingRequiredAttribute,
                    Severity::Error,
                    pos,
                    Some(tag),
                    Some(required),
                    None,
                    format!("'{}' requires the '{}' attribute", tag, required),
                );
            }
        }
    }

    fn check_parent_child(&mut self, node: &Node, tag: &str, pos: (usize, usize)) {
        let parent_tag = match node.parent_element().and_then(|p| p.tag_name().map(String::from)) {
            Some(t) => t,
            None => return,
        };

        if let Some(allowed) = tables::allowed_children(&parent_tag) {
            if !tables::has(allowed, tag) {
                self.push(
                    IssueKind::InvalidChild,
                    Severity::Error,
                    pos,
                    Some(tag),
                    None,
                    None,
                    format!("'{}' is not a valid child of '{}'", tag, parent_tag),
                );
            }
        }

        if tables::has(tables::ANIMATION_ELEMENTS, tag)
            && tables::has(tables::DTD_EMPTY_ELEMENTS, &parent_tag)
        {
            self.push(
                IssueKind::AnimationInEmptyElement,
                Severity::Error,
                pos,
                Some(tag),
                None,
                None,
                format!("animation element '{}' inside the empty element '{}'", tag, parent_tag),
            );
        }
    }

    fn check_duplicate_id(&mut self, node: &Node, tag: &str, pos: (usize, usize)) {
        if let Some(id) = node.attribute("id") {
            if !self.seen_ids.insert(id.to_string()) {
                self.push(
                    IssueKind::DuplicateId,
                    Severity::Error,
                    pos,
                    Some(tag),
                    Some("id"),
                    Some(id),
                    format!("duplicate id '{}'", id),
                );
            }
        }
    }

    fn check_attribute(&mut self, tag: &str, name: &str, value: &str, pos: (usize, usize)) {
        self.check_attribute_name(tag, name, pos);
        self.check_denied(tag, name, pos);
        self.check_references(tag, name, value, pos);
        self.check_enumerated(tag, name, value, pos);
        self.check_numeric_range(tag, name, value, pos);
        self.check_structured_value(tag, name, value, pos);
        self.check_color(tag, name, value, pos);
        self.check_lexical(tag, name, value, pos);
    }

    fn check_attribute_name(&mut self, tag: &str, name: &str, pos: (usize, usize)) {
        if tables::is_known_attribute(name) {
            return;
        }
        // Foreign namespaces and data attributes are out of scope.
        if name.starts_with("data-") || name.starts_with("xmlns") {
            return;
        }
        if name.contains(':') && !(name.starts_with("xlink:") || name.starts_with("xml:")) {
            return;
        }

        let mut dictionary: Vec<&str> = Vec::new();
        dictionary.extend_from_slice(tables::SVG11_ATTRIBUTES);
        dictionary.extend_from_slice(tables::SVG2_ATTRIBUTES);

        if let Some(suggestion) = tables::closest_match(name, &dictionary) {
            self.push(
                IssueKind::MistypedName,
                Severity::Warning,
                pos,
                Some(tag),
                Some(name),
                None,
                format!("unknown attribute '{}'; did you mean '{}'?", name, suggestion),
            );
        }
    }

    fn check_denied(&mut self, tag: &str, name: &str, pos: (usize, usize)) {
        if tables::has(tables::denied_attributes(tag), name) {
            self.push(
                IssueKind::DisallowedAttribute,
                Severity::Warning,
                pos,
                Some(tag),
                Some(name),
                None,
                format!("'{}' has no effect on '{}'", name, tag),
            );
        }
    }

    fn check_references(&mut self, tag: &str, name: &str, value: &str, pos: (usize, usize)) {
        let mut register = |id: String, this: &mut Self| {
            let skeleton = Issue {
                kind: IssueKind::BrokenReference,
                severity: Severity::Error,
                line: pos.0,
                column: pos.1,
                element: Some(tag.to_string()),
                attribute: Some(name.to_string()),
                value: Some(value.to_string()),
                reason: String::new(),
                source_line: this.index.source_line(pos.0),
            };
            this.pending_refs.push((id, skeleton));
        };

        if matches!(name, "href" | "xlink:href") {
            if let Some(id) = value.strip_prefix('#') {
                register(id.to_string(), self);
                return;
            }
        }

        // url(#id) references inside paint and filter values.
        if let Some(start) = value.find("url(#") {
            let rest = &value[start + 5..];
            if let Some(end) = rest.find(')') {
                let id = &rest[..end];
                if !id.is_empty() {
                    register(id.to_string(), self);
                }
            }
        }
    }

    fn check_enumerated(&mut self, tag: &str, name: &str, value: &str, pos: (usize, usize)) {
        if let Some(allowed) = tables::enumerated_values(name) {
            if !tables::has(allowed, value.trim()) {
                self.push(
                    IssueKind::InvalidEnumValue,
                    Severity::Error,
                    pos,
                    Some(tag),
                    Some(name),
                    Some(value),
                    format!(
                        "'{}' is not a valid '{}' value; expected one of: {}",
                        value,
                        name,
                        allowed.join(", ")
                    ),
                );
            }
        }
    }

    fn check_numeric_range(&mut self, tag: &str, name: &str, value: &str, pos: (usize, usize)) {
        let (min, max) = match tables::numeric_range(name) {
            Some(range) => range,
            None => return,
        };

        // Non-numeric values (keywords, units) are someone else's rule.
        let number: Decimal = match value.trim().parse() {
            Ok(n) => n,
            Err(_) => return,
        };

        let below = min.map_or(false, |m| number < Decimal::from(m));
        let above = max.map_or(false, |m| number > Decimal::from(m));
        if below || above {
            let bounds = match (min, max) {
                (Some(a), Some(b)) => format!("[{}, {}]", a, b),
                (Some(a), None) => format!("at least {}", a),
                (None, Some(b)) => format!("at most {}", b),
                (None, None) => String::new(),
            };
            self.push(
                IssueKind::NumericRangeViolation,
                Severity::Error,
                pos,
                Some(tag),
                Some(name),
                Some(value),
                format!("'{}' must be {}", name, bounds),
            );
        }
    }

    fn check_structured_value(&mut self, tag: &str, name: &str, value: &str, pos: (usize, usize)) {
        let failure: Option<String> = match name {
            "viewBox" => ViewBox::parse(value).err().map(|e| e.to_string()),
            "points" if matches!(tag, "polygon" | "polyline") => {
                parse_points(value).err().map(|e| e.to_string())
            }
            "d" if tag == "path" => parse_path(value).err().map(|e| e.to_string()),
            "transform" | "gradientTransform" | "patternTransform" => {
                validate_transform(value).err()
            }
            _ => None,
        };

        if let Some(reason) = failure {
            self.push(
                IssueKind::MalformedValue,
                Severity::Error,
                pos,
                Some(tag),
                Some(name),
                Some(value),
                format!("malformed '{}' value: {}", name, reason),
            );
        }
    }

    fn check_color(&mut self, tag: &str, name: &str, value: &str, pos: (usize, usize)) {
        if tables::has(tables::COLOR_ATTRIBUTES, name) && !is_valid_color(value) {
            self.push(
                IssueKind::InvalidColor,
                Severity::Warning,
                pos,
                Some(tag),
                Some(name),
                Some(value),
                format!("'{}' is not a valid color", value),
            );
        }
    }

    fn check_lexical(&mut self, tag: &str, name: &str, value: &str, pos: (usize, usize)) {
        if value != value.trim() {
            self.push(
                IssueKind::LexicalStyle,
                Severity::Warning,
                pos,
                Some(tag),
                Some(name),
                Some(value),
                format!("'{}' value has surrounding whitespace", name),
            );
        }

        let trimmed = value.trim();

        // A number with a trailing decimal point, e.g. `5.`.
        if trimmed.ends_with('.') && trimmed[..trimmed.len() - 1].parse::<Decimal>().is_ok() {
            self.push(
                IssueKind::LexicalStyle,
                Severity::Warning,
                pos,
                Some(tag),
                Some(name),
                Some(value),
                "number has a trailing decimal point".to_string(),
            );
        }

        // An uppercase unit suffix, e.g. `10PX`.
        let mut s = Stream::from(trimmed);
        if s.parse_decimal().is_ok() {
            let suffix = s.slice_tail();
            if !suffix.is_empty()
                && LengthUnit::from_suffix(suffix).is_some()
                && suffix.chars().any(|c| c.is_ascii_uppercase())
            {
                self.push(
                    IssueKind::LexicalStyle,
                    Severity::Warning,
                    pos,
                    Some(tag),
                    Some(name),
                    Some(value),
                    format!("unit '{}' should be lowercase", suffix),
                );
            }
        }
    }
}

/// Validates the transform-list grammar:
/// `matrix(6) translate(1-2) scale(1-2) rotate(1|3) skewX(1) skewY(1)`.
fn validate_transform(text: &str) -> Result<(), String> {
    let mut s = Stream::from(text);

    let mut any = false;
    loop {
        s.skip_spaces();
        if s.at_end() {
            break;
        }

        let start = s.pos();
        s.skip_bytes(|_, c| c.is_ascii_alphabetic());
        let name = s.slice_back(start);

        let allowed_counts: &[usize] = match name {
            "matrix" => &[6],
            "translate" | "scale" => &[1, 2],
            "rotate" => &[1, 3],
            "skewX" | "skewY" => &[1],
            _ => return Err(format!("unknown transform '{}'", name)),
        };

        s.skip_spaces();
        s.consume_byte(b'(').map_err(|e| e.to_string())?;

        let mut count = 0usize;
        loop {
            s.skip_spaces();
            if s.is_curr_byte_eq(b')') {
                s.advance(1);
                break;
            }
            if s.at_end() {
                return Err("unterminated transform arguments".to_string());
            }
            s.parse_list_decimal().map_err(|e| e.to_string())?;
            count += 1;
        }

        if !allowed_counts.contains(&count) {
            return Err(format!(
                "'{}' takes {} arguments, found {}",
                name,
                allowed_counts
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" or "),
                count
            ));
        }

        any = true;
        s.skip_spaces();
        if s.is_curr_byte_eq(b',') {
            s.advance(1);
        }
    }

    if !any {
        return Err("empty transform".to_string());
    }

    Ok(())
}

/// Flags `xlink:`-prefixed attributes used without the namespace
/// declaration. Runs on the raw scan, so it works even when the XML
/// parser rejects the document for exactly this reason.
fn check_xlink_namespace(index: &PositionIndex, issues: &mut Vec<Issue>) {
    let declared = index
        .all_occurrences()
        .any(|(_, occ)| occ.attributes.iter().any(|a| a.name == "xmlns:xlink"));
    if declared {
        return;
    }

    let mut uses: Vec<(&str, usize, usize)> = Vec::new();
    for (tag, occ) in index.all_occurrences() {
        for attr in &occ.attributes {
            if attr.name.starts_with("xlink:") {
                uses.push((tag, attr.line, attr.column));
            }
        }
    }
    uses.sort_by_key(|(_, line, column)| (*line, *column));

    if let Some((tag, line, column)) = uses.first() {
        issues.push(Issue {
            kind: IssueKind::MissingNamespace,
            severity: Severity::Warning,
            line: *line,
            column: *column,
            element: Some(tag.to_string()),
            attribute: None,
            value: None,
            reason: "'xlink:' attributes are used without declaring 'xmlns:xlink'".to_string(),
            source_line: index.source_line(*line),
        });
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(svg: &str) -> Vec<IssueKind> {
        validate_str(svg).issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn valid_document_is_clean() {
        let report = validate_str(
            "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>\
                <path d='M0 0 L10 10' fill='red'/>\
             </svg>",
        );
        assert!(report.is_valid());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn unparseable_input_is_a_single_issue() {
        let report = validate_str("<svg");
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::InputError);
        assert_eq!(report.issues[0].severity, Severity::Error);
    }

    #[test]
    fn missing_required_attribute() {
        assert!(kinds("<svg xmlns='http://www.w3.org/2000/svg'><path/></svg>")
            .contains(&IssueKind::MissingRequiredAttribute));
    }

    #[test]
    fn duplicate_ids() {
        assert!(kinds(
            "<svg xmlns='http://www.w3.org/2000/svg'><g id='a'/><g id='a'/></svg>"
        )
        .contains(&IssueKind::DuplicateId));
    }

    #[test]
    fn broken_reference() {
        assert!(kinds(
            "<svg xmlns='http://www.w3.org/2000/svg'><rect width='1' height='1' fill='url(#nope)'/></svg>"
        )
        .contains(&IssueKind::BrokenReference));
    }

    #[test]
    fn resolved_reference_is_fine() {
        assert!(!kinds(
            "<svg xmlns='http://www.w3.org/2000/svg'>\
                <linearGradient id='g'/>\
                <rect width='1' height='1' fill='url(#g)'/>\
             </svg>"
        )
        .contains(&IssueKind::BrokenReference));
    }

    #[test]
    fn malformed_viewbox() {
        assert!(kinds("<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 0 100'/>")
            .contains(&IssueKind::MalformedValue));
    }

    #[test]
    fn invalid_enum_value() {
        assert!(kinds(
            "<svg xmlns='http://www.w3.org/2000/svg'><path d='M0 0' fill-rule='evenod'/></svg>"
        )
        .contains(&IssueKind::InvalidEnumValue));
    }

    #[test]
    fn opacity_range() {
        assert!(kinds(
            "<svg xmlns='http://www.w3.org/2000/svg'><path d='M0 0' opacity='1.5'/></svg>"
        )
        .contains(&IssueKind::NumericRangeViolation));
    }

    #[test]
    fn denied_attribute_on_group() {
        assert!(kinds(
            "<svg xmlns='http://www.w3.org/2000/svg'><g x='10'/></svg>"
        )
        .contains(&IssueKind::DisallowedAttribute));
    }

    #[test]
    fn mistyped_element() {
        assert!(kinds("<svg xmlns='http://www.w3.org/2000/svg'><circel r='5'/></svg>")
            .contains(&IssueKind::MistypedName));
    }

    #[test]
    fn svg2_element_is_not_a_typo() {
        assert!(!kinds("<svg xmlns='http://www.w3.org/2000/svg'><mesh/></svg>")
            .contains(&IssueKind::MistypedName));
    }

    #[test]
    fn invalid_color() {
        assert!(kinds(
            "<svg xmlns='http://www.w3.org/2000/svg'><path d='M0 0' fill='#zzz'/></svg>"
        )
        .contains(&IssueKind::InvalidColor));
    }

    #[test]
    fn uppercase_unit() {
        assert!(kinds(
            "<svg xmlns='http://www.w3.org/2000/svg' width='10PX'/>"
        )
        .contains(&IssueKind::LexicalStyle));
    }

    #[test]
    fn invalid_child_of_shape() {
        assert!(kinds(
            "<svg xmlns='http://www.w3.org/2000/svg'><rect width='1' height='1'><g/></rect></svg>"
        )
        .contains(&IssueKind::InvalidChild));
    }

    #[test]
    fn malformed_transform() {
        assert!(kinds(
            "<svg xmlns='http://www.w3.org/2000/svg'><g transform='rotate(1 2)'/></svg>"
        )
        .contains(&IssueKind::MalformedValue));
        assert!(!kinds(
            "<svg xmlns='http://www.w3.org/2000/svg'><g transform='rotate(45) translate(1, 2)'/></svg>"
        )
        .contains(&IssueKind::MalformedValue));
    }

    #[test]
    fn issues_are_ordered() {
        let report = validate_str(
            "<svg xmlns='http://www.w3.org/2000/svg'>\n\
               <g x='1'/>\n\
               <path/>\n\
             </svg>",
        );
        let positions: Vec<_> = report.issues.iter().map(|i| (i.line, i.column)).collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert!(report.issues.len() >= 2);
    }
}
