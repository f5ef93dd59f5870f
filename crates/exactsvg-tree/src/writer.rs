use xmlwriter::XmlWriter;

use crate::{Document, Node};

/// XML writing options, re-exported from `xmlwriter`.
pub type WriteOptions = xmlwriter::Options;

pub(crate) fn write(doc: &Document, opt: &WriteOptions) -> String {
    let mut xml = XmlWriter::new(*opt);

    for child in doc.root().children() {
        write_node(child, &mut xml);
    }

    xml.end_document()
}

fn write_node(node: Node, xml: &mut XmlWriter) {
    if let Some(tag_name) = node.tag_name() {
        xml.start_element(tag_name);

        for attr in node.attributes() {
            xml.write_attribute(&attr.name, &attr.value);
        }

        for child in node.children() {
            write_node(child, xml);
        }

        xml.end_element();
    } else if node.is_text() {
        xml.write_text(node.text());
    }
}

#[cfg(test)]
mod tests {
    use crate::Document;

    #[test]
    fn round_trip() {
        let doc = Document::parse_str(
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><rect width=\"10\" height=\"10\"/></svg>",
        )
        .unwrap();

        let opt = xmlwriter::Options {
            indent: xmlwriter::Indent::None,
            ..xmlwriter::Options::default()
        };
        assert_eq!(
            doc.to_string_pretty(&opt),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><rect width=\"10\" height=\"10\"/></svg>"
        );
    }

    #[test]
    fn writes_edits() {
        let mut doc = Document::parse_str(
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><rect width=\"10\" height=\"10\"/></svg>",
        )
        .unwrap();

        let rect = doc.root_element().first_element_child().unwrap().id();
        doc.set_attribute(rect, "width", "20");

        let opt = xmlwriter::Options {
            indent: xmlwriter::Indent::None,
            ..xmlwriter::Options::default()
        };
        assert!(doc.to_string_pretty(&opt).contains("width=\"20\""));
    }
}
