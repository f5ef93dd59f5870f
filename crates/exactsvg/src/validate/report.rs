// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Validation report rendering.
//!
//! Four formats, all hand-rolled: the data is flat enough that a
//! serialization framework would cost more than these few loops.

use std::collections::BTreeMap;
use std::str::FromStr;

use super::{Issue, Severity};
use crate::Error;

/// The closed set of report output formats.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputFormat {
    /// Plain text, one issue per line.
    Text,
    /// A JSON object.
    Json,
    /// A YAML document.
    Yaml,
    /// A simple XML document.
    Xml,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        match text {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "xml" => Ok(OutputFormat::Xml),
            _ => Err(Error::UnsupportedFormat(text.to_string())),
        }
    }
}

/// The outcome of one validation pass.
#[derive(Clone, Debug)]
pub struct ValidationReport {
    /// All findings, ordered by `(line, column)`.
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// A document is valid when it produced no errors.
    /// Warnings don't count.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Checks for error-severity issues.
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Checks for warning-severity issues.
    pub fn has_warnings(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Warning)
    }

    /// The number of errors.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// The number of warnings.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// The total number of issues.
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Issue counts per rule family, deterministically ordered.
    pub fn summary(&self) -> BTreeMap<&'static str, usize> {
        let mut summary = BTreeMap::new();
        for issue in &self.issues {
            *summary.entry(issue.kind.as_str()).or_insert(0) += 1;
        }
        summary
    }

    /// Renders the report in the requested format.
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.to_text(),
            OutputFormat::Json => self.to_json(),
            OutputFormat::Yaml => self.to_yaml(),
            OutputFormat::Xml => self.to_xml(),
        }
    }

    fn to_text(&self) -> String {
        let mut out = String::new();

        if self.issues.is_empty() {
            out.push_str("the document is valid\n");
            return out;
        }

        for issue in &self.issues {
            out.push_str(&format!(
                "{}:{}: {} [{}] {}\n",
                issue.line,
                issue.column,
                issue.severity.as_str(),
                issue.kind.as_str(),
                issue.reason
            ));
            if let Some(source) = &issue.source_line {
                out.push_str(&format!("    {}\n", source));
            }
        }

        out.push_str(&format!(
            "{} error(s), {} warning(s)\n",
            self.error_count(),
            self.warning_count()
        ));

        out
    }

    fn to_json(&self) -> String {
        let mut out = String::from("{\n");

        out.push_str(&format!("  \"isValid\": {},\n", self.is_valid()));
        out.push_str(&format!("  \"hasErrors\": {},\n", self.has_errors()));
        out.push_str(&format!("  \"hasWarnings\": {},\n", self.has_warnings()));
        out.push_str(&format!("  \"errorCount\": {},\n", self.error_count()));
        out.push_str(&format!("  \"warningCount\": {},\n", self.warning_count()));
        out.push_str(&format!("  \"issueCount\": {},\n", self.issue_count()));

        out.push_str("  \"summary\": {");
        let summary = self.summary();
        let mut first = true;
        for (kind, count) in &summary {
            if !first {
                out.push(',');
            }
            first = false;
            out.push_str(&format!("\n    \"{}\": {}", kind, count));
        }
        if !summary.is_empty() {
            out.push_str("\n  ");
        }
        out.push_str("},\n");

        out.push_str("  \"issues\": [");
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str("\n    {");
            let mut fields: Vec<String> = vec![
                format!("\"type\": \"{}\"", issue.kind.as_str()),
                format!("\"severity\": \"{}\"", issue.severity.as_str()),
                format!("\"line\": {}", issue.line),
                format!("\"column\": {}", issue.column),
            ];
            if let Some(element) = &issue.element {
                fields.push(format!("\"element\": \"{}\"", escape_json(element)));
            }
            if let Some(attribute) = &issue.attribute {
                fields.push(format!("\"attribute\": \"{}\"", escape_json(attribute)));
            }
            if let Some(value) = &issue.value {
                fields.push(format!("\"value\": \"{}\"", escape_json(value)));
            }
            fields.push(format!("\"reason\": \"{}\"", escape_json(&issue.reason)));
            if let Some(source) = &issue.source_line {
                fields.push(format!("\"sourceLine\": \"{}\"", escape_json(source)));
            }
            out.push_str(&fields.join(", "));
            out.push('}');
        }
        if !self.issues.is_empty() {
            out.push_str("\n  ");
        }
        out.push_str("]\n}\n");

        out
    }

    fn to_yaml(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("isValid: {}\n", self.is_valid()));
        out.push_str(&format!("hasErrors: {}\n", self.has_errors()));
        out.push_str(&format!("hasWarnings: {}\n", self.has_warnings()));
        out.push_str(&format!("errorCount: {}\n", self.error_count()));
        out.push_str(&format!("warningCount: {}\n", self.warning_count()));
        out.push_str(&format!("issueCount: {}\n", self.issue_count()));

        let summary = self.summary();
        if summary.is_empty() {
            out.push_str("summary: {}\n");
        } else {
            out.push_str("summary:\n");
            for (kind, count) in &summary {
                out.push_str(&format!("  {}: {}\n", kind, count));
            }
        }

        if self.issues.is_empty() {
            out.push_str("issues: []\n");
        } else {
            out.push_str("issues:\n");
            for issue in &self.issues {
                out.push_str(&format!("  - type: {}\n", issue.kind.as_str()));
                out.push_str(&format!("    severity: {}\n", issue.severity.as_str()));
                out.push_str(&format!("    line: {}\n", issue.line));
                out.push_str(&format!("    column: {}\n", issue.column));
                if let Some(element) = &issue.element {
                    out.push_str(&format!("    element: {}\n", escape_yaml(element)));
                }
                if let Some(attribute) = &issue.attribute {
                    out.push_str(&format!("    attribute: {}\n", escape_yaml(attribute)));
                }
                if let Some(value) = &issue.value {
                    out.push_str(&format!("    value: {}\n", escape_yaml(value)));
                }
                out.push_str(&format!("    reason: {}\n", escape_yaml(&issue.reason)));
            }
        }

        out
    }

    fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        out.push_str(&format!(
            "<validation isValid=\"{}\" errorCount=\"{}\" warningCount=\"{}\">\n",
            self.is_valid(),
            self.error_count(),
            self.warning_count()
        ));

        for issue in &self.issues {
            out.push_str(&format!(
                "  <issue type=\"{}\" severity=\"{}\" line=\"{}\" column=\"{}\"",
                issue.kind.as_str(),
                issue.severity.as_str(),
                issue.line,
                issue.column
            ));
            if let Some(element) = &issue.element {
                out.push_str(&format!(" element=\"{}\"", escape_xml(element)));
            }
            if let Some(attribute) = &issue.attribute {
                out.push_str(&format!(" attribute=\"{}\"", escape_xml(attribute)));
            }
            if let Some(value) = &issue.value {
                out.push_str(&format!(" value=\"{}\"", escape_xml(value)));
            }
            out.push('>');
            out.push_str(&escape_xml(&issue.reason));
            out.push_str("</issue>\n");
        }

        out.push_str("</validation>\n");
        out
    }
}

fn escape_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn escape_yaml(text: &str) -> String {
    // Quote anything that could be misread as YAML syntax.
    let needs_quotes = text.is_empty()
        || text
            .chars()
            .any(|c| matches!(c, ':' | '#' | '\'' | '"' | '[' | ']' | '{' | '}' | '\n'))
        || text.starts_with(|c: char| c.is_whitespace() || c == '-')
        || text.ends_with(char::is_whitespace);

    if needs_quotes {
        format!("\"{}\"", escape_json(text))
    } else {
        text.to_string()
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_str;

    const BROKEN: &str =
        "<svg xmlns='http://www.w3.org/2000/svg'><path/><g x='1'/></svg>";

    #[test]
    fn format_parsing() {
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert!(matches!(
            OutputFormat::from_str("toml"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn json_shape() {
        let report = validate_str(BROKEN);
        let json = report.render(OutputFormat::Json);

        assert!(json.contains("\"isValid\": false"));
        assert!(json.contains("\"errorCount\": 1"));
        assert!(json.contains("\"warningCount\": 1"));
        assert!(json.contains("\"type\": \"missing_required_attribute\""));
        assert!(json.contains("\"summary\""));
    }

    #[test]
    fn text_shape() {
        let report = validate_str(BROKEN);
        let text = report.render(OutputFormat::Text);
        assert!(text.contains("error"));
        assert!(text.contains("1 error(s), 1 warning(s)"));
    }

    #[test]
    fn xml_escaping() {
        assert_eq!(escape_xml("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&apos;");
    }

    #[test]
    fn yaml_shape() {
        let report = validate_str(BROKEN);
        let yaml = report.render(OutputFormat::Yaml);
        assert!(yaml.contains("isValid: false"));
        assert!(yaml.contains("- type: missing_required_attribute"));
    }

    #[test]
    fn clean_report() {
        let report = validate_str(
            "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 1 1'/>",
        );
        assert!(report.is_valid());
        assert_eq!(report.render(OutputFormat::Text), "the document is valid\n");
        assert!(report.render(OutputFormat::Json).contains("\"issues\": []"));
    }
}
