use crate::{Document, Error, NodeData, NodeId, NodeKind, SVG_NS, XLINK_NS, XML_NS};

/// Parsing options.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Allow a DTD in the input.
    ///
    /// Real-world SVG files frequently start with a doctype.
    ///
    /// Default: true
    pub allow_dtd: bool,
}

impl Default for ParseOptions {
    #[inline]
    fn default() -> Self {
        ParseOptions { allow_dtd: true }
    }
}

pub(crate) fn parse(text: &str, opt: &ParseOptions) -> Result<Document, Error> {
    let xml_opt = roxmltree::ParsingOptions {
        allow_dtd: opt.allow_dtd,
        ..roxmltree::ParsingOptions::default()
    };

    let xml = roxmltree::Document::parse_with_options(text, xml_opt)?;

    let mut doc = Document {
        nodes: Vec::with_capacity(xml.descendants().count() + 1),
    };
    doc.nodes.push(NodeData {
        parent: None,
        prev_sibling: None,
        next_sibling: None,
        first_child: None,
        last_child: None,
        kind: NodeKind::Root,
    });

    let root_id = doc.root_id();
    for child in xml.root().children() {
        append_xml_node(child, root_id, &mut doc);
    }

    Ok(doc)
}

fn append_xml_node(xml_node: roxmltree::Node, parent: NodeId, doc: &mut Document) {
    match xml_node.node_type() {
        roxmltree::NodeType::Element => {
            let tag_name = qualified_name(
                &xml_node,
                xml_node.tag_name().namespace(),
                xml_node.tag_name().name(),
            );

            let attributes = xml_node
                .attributes()
                .map(|attr| crate::Attribute {
                    name: qualified_name(&xml_node, attr.namespace(), attr.name()),
                    value: attr.value().to_string(),
                })
                .collect();

            let id = doc.push_node(NodeKind::Element {
                tag_name,
                attributes,
            });
            doc.append_child(parent, id);

            for child in xml_node.children() {
                append_xml_node(child, id, doc);
            }
        }
        roxmltree::NodeType::Text => {
            if let Some(text) = xml_node.text() {
                // Whitespace-only runs between elements are layout noise.
                if !text.trim().is_empty() {
                    let id = doc.push_text(text);
                    doc.append_child(parent, id);
                }
            }
        }
        _ => {}
    }
}

/// Restores the prefixed name of a namespaced element or attribute.
///
/// SVG-namespace names stay bare: the default namespace is by far
/// the common case and the validator compares local names.
fn qualified_name(xml_node: &roxmltree::Node, namespace: Option<&str>, local: &str) -> String {
    match namespace {
        None => local.to_string(),
        Some(SVG_NS) => local.to_string(),
        Some(XLINK_NS) => format!("xlink:{}", local),
        Some(XML_NS) => format!("xml:{}", local),
        Some(uri) => match xml_node.lookup_prefix(uri) {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local),
            _ => local.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::Document;

    #[test]
    fn xlink_attributes_keep_their_prefix() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg' \
                  xmlns:xlink='http://www.w3.org/1999/xlink'>\
                <use xlink:href='#a'/>\
             </svg>",
        )
        .unwrap();

        let use_node = doc.root_element().first_element_child().unwrap();
        assert_eq!(use_node.attribute("xlink:href"), Some("#a"));
    }

    #[test]
    fn text_content() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'><title>hello</title></svg>",
        )
        .unwrap();

        let title = doc.root_element().first_element_child().unwrap();
        assert_eq!(title.text(), "hello");
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(Document::parse_str("<svg").is_err());
        assert!(Document::parse_str("").is_err());
    }
}
