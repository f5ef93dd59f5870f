use crate::{Document, Node, NodeId};

/// A selector-matching view over a node.
#[derive(Clone, Copy)]
struct SelectorNode<'a>(Node<'a>);

impl<'a> SelectorNode<'a> {
    fn prev_sibling_element_impl(&self) -> Option<Self> {
        let mut node = self.0.prev_sibling();
        while let Some(n) = node {
            if n.is_element() {
                return Some(SelectorNode(n));
            }
            node = n.prev_sibling();
        }
        None
    }
}

impl simplecss::Element for SelectorNode<'_> {
    fn parent_element(&self) -> Option<Self> {
        self.0.parent_element().map(SelectorNode)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.prev_sibling_element_impl()
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.0.tag_name() == Some(local_name)
    }

    fn attribute_matches(&self, local_name: &str, operator: simplecss::AttributeOperator) -> bool {
        match self.0.attribute(local_name) {
            Some(value) => operator.matches(value),
            None => false,
        }
    }

    fn pseudo_class_matches(&self, class: simplecss::PseudoClass) -> bool {
        match class {
            simplecss::PseudoClass::FirstChild => self.prev_sibling_element_impl().is_none(),
            // We are querying a static document; dynamic classes never match.
            _ => false,
        }
    }
}

pub(crate) fn query(doc: &Document, selector: &str) -> Vec<NodeId> {
    let selector = match simplecss::Selector::parse(selector) {
        Some(s) => s,
        None => {
            log::warn!("Failed to parse selector: '{}'.", selector);
            return Vec::new();
        }
    };

    doc.descendants()
        .filter(|n| n.is_element())
        .filter(|n| selector.matches(&SelectorNode(*n)))
        .map(|n| n.id())
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::Document;

    const SVG: &str = "<svg xmlns='http://www.w3.org/2000/svg'>\
        <g class='layer'><rect id='r1' width='10' height='10'/></g>\
        <rect id='r2' width='20' height='20'/>\
    </svg>";

    #[test]
    fn by_id() {
        let doc = Document::parse_str(SVG).unwrap();
        let n = doc.query_selector("#r2").unwrap();
        assert_eq!(n.attribute("width"), Some("20"));
    }

    #[test]
    fn by_class() {
        let doc = Document::parse_str(SVG).unwrap();
        let n = doc.query_selector(".layer").unwrap();
        assert_eq!(n.tag_name(), Some("g"));
    }

    #[test]
    fn by_tag() {
        let doc = Document::parse_str(SVG).unwrap();
        assert_eq!(doc.query_selector_all("rect").len(), 2);
    }

    #[test]
    fn by_attribute() {
        let doc = Document::parse_str(SVG).unwrap();
        assert_eq!(doc.query_selector_all("[width='20']").len(), 1);
    }

    #[test]
    fn bad_selector() {
        let doc = Document::parse_str(SVG).unwrap();
        assert!(doc.query_selector("").is_none());
    }
}
