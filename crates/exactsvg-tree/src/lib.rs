/*!
Represents an SVG document as a mutable tree.

Parsing is delegated to [`roxmltree`](https://github.com/RazrFalcon/roxmltree);
the XML tree is then converted into an arena of nodes addressed by [`NodeId`],
so structural edits stay local and parents remain reachable. Unlike a
rendering-oriented tree, nothing is filtered on parse: unknown elements and
attributes survive, because downstream consumers validate them.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::num::NonZeroU32;

mod parse;
mod select;
mod writer;

pub use parse::ParseOptions;
pub use roxmltree::{self, Error};
pub use writer::WriteOptions;

/// The namespace of SVG elements.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
/// The xlink namespace.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
/// The xml namespace.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// An SVG document container.
///
/// Nodes live in an arena; removing a node unlinks it from its parent and
/// siblings but keeps the slot, so every `NodeId` handed out stays valid.
pub struct Document {
    nodes: Vec<NodeData>,
}

/// A node identifier inside a [`Document`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    #[inline]
    fn new(id: u32) -> Self {
        debug_assert!(id < u32::MAX);

        // We are using `NonZeroU32` to reduce overhead of `Option<NodeId>`.
        NodeId(NonZeroU32::new(id + 1).unwrap())
    }

    #[inline]
    fn get_usize(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

enum NodeKind {
    Root,
    Element {
        tag_name: String,
        attributes: Vec<Attribute>,
    },
    Text(String),
}

struct NodeData {
    parent: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    kind: NodeKind,
}

/// An attribute.
#[derive(Clone, PartialEq, Debug)]
pub struct Attribute {
    /// Attribute's qualified name, e.g. `xlink:href`.
    pub name: String,
    /// Attribute's value.
    pub value: String,
}

impl Document {
    /// Parses a document from an SVG string.
    ///
    /// # Errors
    ///
    /// Forwards `roxmltree` parsing errors.
    pub fn parse_str(text: &str) -> Result<Self, Error> {
        parse::parse(text, &ParseOptions::default())
    }

    /// Parses a document from an SVG string with custom options.
    ///
    /// # Errors
    ///
    /// Forwards `roxmltree` parsing errors.
    pub fn parse_str_with_options(text: &str, opt: &ParseOptions) -> Result<Self, Error> {
        parse::parse(text, opt)
    }

    /// Creates an empty document with a single root element.
    pub fn new_svg() -> Self {
        let mut doc = Document {
            nodes: Vec::with_capacity(2),
        };
        doc.nodes.push(NodeData {
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
            kind: NodeKind::Root,
        });
        let svg = doc.push_element("svg");
        doc.append_child(doc.root_id(), svg);
        doc
    }

    #[inline]
    fn root_id(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> Node {
        self.get(self.root_id())
    }

    /// Returns the outermost element.
    ///
    /// A document is guaranteed to have at least one element.
    #[inline]
    pub fn root_element(&self) -> Node {
        // `unwrap` is safe, because `Document` always has an element.
        self.root().first_element_child().unwrap()
    }

    /// Resolves a `NodeId` into a node handle.
    #[inline]
    pub fn get(&self, id: NodeId) -> Node {
        Node {
            id,
            d: &self.nodes[id.get_usize()],
            doc: self,
        }
    }

    /// Returns an iterator over the document's descendant nodes.
    #[inline]
    pub fn descendants(&self) -> Descendants {
        self.root().descendants()
    }

    /// Returns the first element with the `id` attribute equal to `id`.
    pub fn element_by_id(&self, id: &str) -> Option<Node> {
        self.descendants()
            .find(|n| n.attribute("id") == Some(id))
    }

    /// Allocates a new, unlinked element node.
    pub fn push_element(&mut self, tag_name: &str) -> NodeId {
        self.push_node(NodeKind::Element {
            tag_name: tag_name.to_string(),
            attributes: Vec::new(),
        })
    }

    /// Allocates a new, unlinked text node.
    pub fn push_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Text(text.to_string()))
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
            kind,
        });
        id
    }

    /// Sets an attribute value, replacing an existing one.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[id.get_usize()].kind {
            if let Some(attr) = attributes.iter_mut().find(|a| a.name == name) {
                attr.value = value.to_string();
            } else {
                attributes.push(Attribute {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }
    }

    /// Removes an attribute. Does nothing when absent.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[id.get_usize()].kind {
            attributes.retain(|a| a.name != name);
        }
    }

    /// Replaces the node's text content with a single text child.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        while let Some(child) = self.get(id).first_child() {
            let child_id = child.id();
            self.remove_child(child_id);
        }
        let text_id = self.push_text(text);
        self.append_child(id, text_id);
    }

    /// Appends `new` as the last child of `parent`.
    ///
    /// The node is detached from its previous position first.
    pub fn append_child(&mut self, parent: NodeId, new: NodeId) {
        self.detach(new);

        let pi = parent.get_usize();
        match self.nodes[pi].last_child {
            Some(last) => {
                self.nodes[last.get_usize()].next_sibling = Some(new);
                self.nodes[new.get_usize()].prev_sibling = Some(last);
            }
            None => {
                self.nodes[pi].first_child = Some(new);
            }
        }
        self.nodes[pi].last_child = Some(new);
        self.nodes[new.get_usize()].parent = Some(parent);
    }

    /// Inserts `new` right before `reference`.
    pub fn insert_before(&mut self, new: NodeId, reference: NodeId) {
        self.detach(new);

        let parent = match self.nodes[reference.get_usize()].parent {
            Some(p) => p,
            None => return,
        };

        let prev = self.nodes[reference.get_usize()].prev_sibling;
        match prev {
            Some(prev) => {
                self.nodes[prev.get_usize()].next_sibling = Some(new);
                self.nodes[new.get_usize()].prev_sibling = Some(prev);
            }
            None => {
                self.nodes[parent.get_usize()].first_child = Some(new);
            }
        }
        self.nodes[new.get_usize()].next_sibling = Some(reference);
        self.nodes[reference.get_usize()].prev_sibling = Some(new);
        self.nodes[new.get_usize()].parent = Some(parent);
    }

    /// Unlinks a node (and its subtree) from the document.
    ///
    /// The arena slot stays allocated; the id remains usable.
    pub fn remove_child(&mut self, id: NodeId) {
        self.detach(id);
    }

    /// Replaces `old` with `new` at the same position.
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) {
        self.insert_before(new, old);
        self.detach(old);
    }

    fn detach(&mut self, id: NodeId) {
        let i = id.get_usize();
        let parent = self.nodes[i].parent;
        let prev = self.nodes[i].prev_sibling;
        let next = self.nodes[i].next_sibling;

        if let Some(prev) = prev {
            self.nodes[prev.get_usize()].next_sibling = next;
        } else if let Some(parent) = parent {
            self.nodes[parent.get_usize()].first_child = next;
        }

        if let Some(next) = next {
            self.nodes[next.get_usize()].prev_sibling = prev;
        } else if let Some(parent) = parent {
            self.nodes[parent.get_usize()].last_child = prev;
        }

        self.nodes[i].parent = None;
        self.nodes[i].prev_sibling = None;
        self.nodes[i].next_sibling = None;
    }

    /// Serializes the document back into SVG text.
    pub fn to_string_pretty(&self, opt: &WriteOptions) -> String {
        writer::write(self, opt)
    }

    /// Returns the first element matching a CSS selector.
    ///
    /// Supports the selector subset validation and dispatch need:
    /// tag, `#id`, `.class` and attribute selectors.
    pub fn query_selector(&self, selector: &str) -> Option<Node> {
        select::query(self, selector)
            .into_iter()
            .next()
            .map(|id| self.get(id))
    }

    /// Returns every element matching a CSS selector.
    pub fn query_selector_all(&self, selector: &str) -> Vec<Node> {
        select::query(self, selector)
            .into_iter()
            .map(|id| self.get(id))
            .collect()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        fn print_children(
            parent: Node,
            depth: usize,
            f: &mut std::fmt::Formatter,
        ) -> Result<(), std::fmt::Error> {
            for child in parent.children() {
                for _ in 0..depth {
                    write!(f, "    ")?;
                }
                writeln!(f, "{:?}", child)?;
                print_children(child, depth + 1, f)?;
            }

            Ok(())
        }

        writeln!(f, "Document [")?;
        print_children(self.root(), 1, f)?;
        writeln!(f, "]")
    }
}

/// An SVG node handle.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    id: NodeId,
    doc: &'a Document,
    d: &'a NodeData,
}

impl Eq for Node<'_> {}

impl PartialEq for Node<'_> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.doc, other.doc)
    }
}

impl<'a> Node<'a> {
    /// Returns the node id.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Checks if the current node is an element.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.d.kind, NodeKind::Element { .. })
    }

    /// Checks if the current node is a text.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.d.kind, NodeKind::Text(_))
    }

    /// Returns node's document.
    #[inline]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Returns element's tag name, unless the current node is not an element.
    ///
    /// Tag names are case-sensitive, as SVG requires.
    #[inline]
    pub fn tag_name(&self) -> Option<&'a str> {
        match self.d.kind {
            NodeKind::Element { ref tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    /// Returns element's `id` attribute value.
    ///
    /// Returns an empty string otherwise.
    #[inline]
    pub fn element_id(&self) -> &'a str {
        self.attribute("id").unwrap_or("")
    }

    /// Returns an attribute value.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes()
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Checks if an attribute is present.
    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes().iter().any(|a| a.name == name)
    }

    /// Returns a list of all element's attributes.
    #[inline]
    pub fn attributes(&self) -> &'a [Attribute] {
        match self.d.kind {
            NodeKind::Element { ref attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Returns the names of all element's attributes.
    pub fn attribute_names(&self) -> Vec<&'a str> {
        self.attributes().iter().map(|a| a.name.as_str()).collect()
    }

    /// Returns node's text data.
    ///
    /// For text nodes returns its content. For elements returns the first
    /// child node text.
    #[inline]
    pub fn text(&self) -> &'a str {
        match self.d.kind {
            NodeKind::Element { .. } => match self.first_child() {
                Some(child) if child.is_text() => child.text(),
                _ => "",
            },
            NodeKind::Text(ref text) => text,
            NodeKind::Root => "",
        }
    }

    /// Returns a parent node.
    #[inline]
    pub fn parent(&self) -> Option<Self> {
        self.d.parent.map(|id| self.doc.get(id))
    }

    /// Returns the parent element.
    #[inline]
    pub fn parent_element(&self) -> Option<Self> {
        self.ancestors().skip(1).find(|n| n.is_element())
    }

    /// Returns the previous sibling.
    #[inline]
    pub fn prev_sibling(&self) -> Option<Self> {
        self.d.prev_sibling.map(|id| self.doc.get(id))
    }

    /// Returns the next sibling.
    #[inline]
    pub fn next_sibling(&self) -> Option<Self> {
        self.d.next_sibling.map(|id| self.doc.get(id))
    }

    /// Returns the first child.
    #[inline]
    pub fn first_child(&self) -> Option<Self> {
        self.d.first_child.map(|id| self.doc.get(id))
    }

    /// Returns the first child element.
    #[inline]
    pub fn first_element_child(&self) -> Option<Self> {
        self.children().find(|n| n.is_element())
    }

    /// Returns the last child.
    #[inline]
    pub fn last_child(&self) -> Option<Self> {
        self.d.last_child.map(|id| self.doc.get(id))
    }

    /// Checks if the node has child nodes.
    #[inline]
    pub fn has_children(&self) -> bool {
        self.d.first_child.is_some()
    }

    /// Returns an iterator over ancestor nodes starting at this node.
    #[inline]
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors(Some(*self))
    }

    /// Returns an iterator over children nodes.
    #[inline]
    pub fn children(&self) -> Children<'a> {
        Children(self.first_child())
    }

    /// Returns an iterator over this node and its descendants.
    #[inline]
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            root: *self,
            next: Some(*self),
        }
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self.d.kind {
            NodeKind::Root => write!(f, "Root"),
            NodeKind::Element { .. } => {
                write!(
                    f,
                    "Element {{ tag_name: {:?}, attributes: {:?} }}",
                    self.tag_name(),
                    self.attributes()
                )
            }
            NodeKind::Text(ref text) => write!(f, "Text({:?})", text),
        }
    }
}

/// An iterator over ancestor nodes.
#[derive(Clone, Debug)]
pub struct Ancestors<'a>(Option<Node<'a>>);

impl<'a> Iterator for Ancestors<'a> {
    type Item = Node<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.0.take();
        self.0 = node.as_ref().and_then(Node::parent);
        node
    }
}

/// An iterator over children nodes.
#[derive(Clone, Debug)]
pub struct Children<'a>(Option<Node<'a>>);

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.0.take();
        self.0 = node.as_ref().and_then(Node::next_sibling);
        node
    }
}

/// A descendants iterator in document order.
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    root: Node<'a>,
    next: Option<Node<'a>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        // Depth first: child, then sibling, then an ancestor's sibling.
        self.next = if let Some(child) = current.first_child() {
            Some(child)
        } else {
            let mut node = current;
            loop {
                if node == self.root {
                    break None;
                }
                if let Some(sibling) = node.next_sibling() {
                    break Some(sibling);
                }
                match node.parent() {
                    Some(parent) => node = parent,
                    None => break None,
                }
            }
        };

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_query() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'><g id='a'><rect width='10' height='10'/></g></svg>",
        )
        .unwrap();

        assert_eq!(doc.root_element().tag_name(), Some("svg"));
        let g = doc.element_by_id("a").unwrap();
        assert_eq!(g.tag_name(), Some("g"));
        let rect = g.first_element_child().unwrap();
        assert_eq!(rect.attribute("width"), Some("10"));
    }

    #[test]
    fn mutate_attributes() {
        let mut doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'><path d='M 0 0 L 10 10'/></svg>",
        )
        .unwrap();

        let path = doc.root_element().first_element_child().unwrap().id();
        doc.set_attribute(path, "d", "M0 0H10");
        assert_eq!(doc.get(path).attribute("d"), Some("M0 0H10"));

        doc.remove_attribute(path, "d");
        assert!(!doc.get(path).has_attribute("d"));
    }

    #[test]
    fn structural_edits() {
        let mut doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'><g/><circle r='1'/></svg>",
        )
        .unwrap();

        let svg = doc.root_element().id();
        let circle = doc.root_element().children().nth(1).unwrap().id();

        doc.remove_child(circle);
        assert_eq!(doc.root_element().children().count(), 1);

        doc.append_child(svg, circle);
        assert_eq!(doc.root_element().children().count(), 2);
        assert_eq!(
            doc.root_element().last_child().unwrap().tag_name(),
            Some("circle")
        );

        let g = doc.root_element().first_element_child().unwrap().id();
        doc.insert_before(circle, g);
        assert_eq!(
            doc.root_element().first_element_child().unwrap().tag_name(),
            Some("circle")
        );
    }

    #[test]
    fn descendants_order() {
        let doc = Document::parse_str(
            "<svg xmlns='http://www.w3.org/2000/svg'><g><rect/></g><circle/></svg>",
        )
        .unwrap();

        let names: Vec<_> = doc
            .descendants()
            .filter_map(|n| n.tag_name().map(|t| t.to_string()))
            .collect();
        assert_eq!(names, ["svg", "g", "rect", "circle"]);
    }
}
