// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Source position tracking.
//!
//! A byte-level scan of the raw document records the line and column
//! of every opening tag and of every attribute inside it, keyed by tag
//! name. The validator walks the parsed tree with a per-tag occurrence
//! counter and looks the n-th occurrence up here, so issues point at
//! real source locations without the XML parser's cooperation.

use std::collections::HashMap;

/// An attribute name with its source position.
#[derive(Clone, Debug)]
pub(crate) struct AttrPos {
    pub name: String,
    pub line: usize,
    pub column: usize,
}

/// One opening tag in the source.
#[derive(Clone, Debug)]
pub(crate) struct TagOccurrence {
    pub line: usize,
    pub column: usize,
    pub attributes: Vec<AttrPos>,
}

/// The tag-to-occurrences index over one source string.
#[derive(Debug, Default)]
pub(crate) struct PositionIndex {
    tags: HashMap<String, Vec<TagOccurrence>>,
    lines: Vec<String>,
}

impl PositionIndex {
    pub fn build(text: &str) -> Self {
        let mut index = PositionIndex {
            tags: HashMap::new(),
            lines: text.lines().map(|l| l.to_string()).collect(),
        };

        Scanner::new(text).run(&mut index);
        index
    }

    /// The n-th (zero-based) occurrence of a tag.
    pub fn occurrence(&self, tag: &str, n: usize) -> Option<&TagOccurrence> {
        self.tags.get(tag)?.get(n)
    }

    /// The position of an attribute inside the n-th occurrence of a tag.
    pub fn attribute_position(&self, tag: &str, n: usize, attr: &str) -> Option<(usize, usize)> {
        self.occurrence(tag, n)?
            .attributes
            .iter()
            .find(|a| a.name == attr)
            .map(|a| (a.line, a.column))
    }

    /// The raw source line (1-based), trimmed on the right.
    pub fn source_line(&self, line: usize) -> Option<String> {
        self.lines
            .get(line.checked_sub(1)?)
            .map(|l| l.trim_end().to_string())
    }

    /// Iterates every recorded occurrence of every tag.
    pub fn all_occurrences(&self) -> impl Iterator<Item = (&str, &TagOccurrence)> {
        self.tags
            .iter()
            .flat_map(|(tag, list)| list.iter().map(move |occ| (tag.as_str(), occ)))
    }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Scanner {
    fn new(text: &str) -> Self {
        Scanner {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn curr(&self) -> char {
        self.chars[self.pos]
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn bump(&mut self) {
        if self.curr() == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += 1;
    }

    fn skip_until(&mut self, suffix: &str) {
        let pattern: Vec<char> = suffix.chars().collect();
        while !self.at_end() {
            if self.chars[self.pos..].starts_with(&pattern[..]) {
                for _ in 0..pattern.len() {
                    self.bump();
                }
                return;
            }
            self.bump();
        }
    }

    fn is_name_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_' | '.')
    }

    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        while !self.at_end() && Self::is_name_char(self.curr()) {
            name.push(self.curr());
            self.bump();
        }
        name
    }

    fn run(&mut self, index: &mut PositionIndex) {
        while !self.at_end() {
            if self.curr() != '<' {
                self.bump();
                continue;
            }

            match self.peek(1) {
                Some('!') => {
                    // Comment, CDATA or doctype.
                    if self.chars[self.pos..].starts_with(&['<', '!', '-', '-']) {
                        self.skip_until("-->");
                    } else if self.chars[self.pos..]
                        .starts_with(&['<', '!', '[', 'C', 'D', 'A', 'T', 'A', '['])
                    {
                        self.skip_until("]]>");
                    } else {
                        self.skip_until(">");
                    }
                }
                Some('?') => self.skip_until("?>"),
                Some('/') => self.skip_until(">"),
                Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                    self.scan_open_tag(index);
                }
                _ => self.bump(),
            }
        }
    }

    fn scan_open_tag(&mut self, index: &mut PositionIndex) {
        let tag_line = self.line;
        let tag_column = self.column;

        self.bump(); // '<'
        let tag_name = self.consume_name();

        let mut occurrence = TagOccurrence {
            line: tag_line,
            column: tag_column,
            attributes: Vec::new(),
        };

        loop {
            if self.at_end() {
                break;
            }

            let c = self.curr();
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if c == '>' {
                self.bump();
                break;
            }
            if c == '/' {
                self.bump();
                continue;
            }

            if Self::is_name_char(c) {
                let attr_line = self.line;
                let attr_column = self.column;
                let name = self.consume_name();
                occurrence.attributes.push(AttrPos {
                    name,
                    line: attr_line,
                    column: attr_column,
                });

                // Skip an optional value, quotes included, so a '>'
                // inside the value cannot end the tag early.
                while !self.at_end() && self.curr().is_whitespace() {
                    self.bump();
                }
                if !self.at_end() && self.curr() == '=' {
                    self.bump();
                    while !self.at_end() && self.curr().is_whitespace() {
                        self.bump();
                    }
                    if !self.at_end() && (self.curr() == '"' || self.curr() == '\'') {
                        let quote = self.curr();
                        self.bump();
                        while !self.at_end() && self.curr() != quote {
                            self.bump();
                        }
                        if !self.at_end() {
                            self.bump();
                        }
                    }
                }
            } else {
                self.bump();
            }
        }

        index.tags.entry(tag_name).or_default().push(occurrence);
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_tag_positions() {
        let index = PositionIndex::build("<svg>\n  <path d=\"M0 0\"/>\n  <path/>\n</svg>");

        let svg = index.occurrence("svg", 0).unwrap();
        assert_eq!((svg.line, svg.column), (1, 1));

        let first = index.occurrence("path", 0).unwrap();
        assert_eq!((first.line, first.column), (2, 3));

        let second = index.occurrence("path", 1).unwrap();
        assert_eq!((second.line, second.column), (3, 3));

        assert!(index.occurrence("path", 2).is_none());
    }

    #[test]
    fn records_attribute_positions() {
        let index = PositionIndex::build("<svg width=\"10\" height=\"20\"/>");

        assert_eq!(index.attribute_position("svg", 0, "width"), Some((1, 6)));
        assert_eq!(index.attribute_position("svg", 0, "height"), Some((1, 17)));
    }

    #[test]
    fn angle_bracket_inside_value() {
        let index = PositionIndex::build("<svg title=\"a > b\"><g/></svg>");
        assert!(index.occurrence("g", 0).is_some());
    }

    #[test]
    fn skips_comments_and_doctype() {
        let index = PositionIndex::build(
            "<!DOCTYPE svg><!-- <fake/> --><svg><rect/></svg>",
        );
        assert!(index.occurrence("fake", 0).is_none());
        assert!(index.occurrence("rect", 0).is_some());
    }

    #[test]
    fn source_line_lookup() {
        let index = PositionIndex::build("<svg>\n  <rect/>   \n</svg>");
        assert_eq!(index.source_line(2).unwrap(), "  <rect/>");
        assert!(index.source_line(9).is_none());
    }
}
