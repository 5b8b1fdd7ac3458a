//! In-memory XML element tree.
//!
//! [`XmlDocument`] is an arena of elements addressed by [`NodeId`]. It keeps
//! only what record detection and flattening look at: names, attributes,
//! children, parent links and the direct text of each element. Documents come
//! from [`crate::parse_document`] or, for synthetic trees, from
//! [`XmlDocument::builder`].

use crate::names::strip_namespace;

/// Handle to an element inside one [`XmlDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    text: String,
}

impl Element {
    fn new(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            parent,
            text: String::new(),
        }
    }
}

/// Immutable parsed XML tree. Always has a root element.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    elements: Vec<Element>,
}

impl XmlDocument {
    pub fn builder(root_name: &str) -> DocumentBuilder {
        DocumentBuilder::new(root_name)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Qualified name as written in the source.
    pub fn name(&self, node: NodeId) -> &str {
        &self.element(node).name
    }

    /// Name with any namespace stripped.
    pub fn local_name(&self, node: NodeId) -> &str {
        strip_namespace(&self.element(node).name)
    }

    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        &self.element(node).attributes
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.element(node).children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).parent
    }

    /// Trimmed text of the element's own text nodes, excluding descendants.
    pub fn direct_text(&self, node: NodeId) -> &str {
        self.element(node).text.trim()
    }

    /// Attribute count plus direct-child count.
    pub fn field_count(&self, node: NodeId) -> usize {
        let element = self.element(node);
        element.attributes.len() + element.children.len()
    }

    /// All elements in document order, root first.
    pub fn nodes(&self) -> Descendants<'_> {
        self.descendants_or_self(self.root())
    }

    /// `node` followed by its descendants, in document order.
    pub fn descendants_or_self(&self, node: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![node],
        }
    }

    /// `node`, its parent, and so on up to the root.
    pub fn ancestors_or_self(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |current| self.parent(*current))
    }

    fn element(&self, node: NodeId) -> &Element {
        &self.elements[node.0]
    }
}

/// Pre-order traversal over a subtree.
pub struct Descendants<'a> {
    doc: &'a XmlDocument,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(node).iter().rev().copied());
        Some(node)
    }
}

/// Incremental constructor for [`XmlDocument`].
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    elements: Vec<Element>,
}

impl DocumentBuilder {
    pub fn new(root_name: &str) -> Self {
        Self {
            elements: vec![Element::new(root_name, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Qualified name of an element added so far.
    pub fn name(&self, node: NodeId) -> &str {
        &self.elements[node.0].name
    }

    /// Appends a new last child to `parent`.
    pub fn child(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = NodeId(self.elements.len());
        self.elements.push(Element::new(name, Some(parent)));
        self.elements[parent.0].children.push(id);
        id
    }

    /// Appends a child holding only text.
    pub fn leaf(&mut self, parent: NodeId, name: &str, text: &str) -> NodeId {
        let id = self.child(parent, name);
        self.text(id, text);
        id
    }

    pub fn attribute(&mut self, node: NodeId, name: &str, value: &str) -> &mut Self {
        self.elements[node.0]
            .attributes
            .push((name.to_string(), value.to_string()));
        self
    }

    /// Appends to the element's direct text.
    pub fn text(&mut self, node: NodeId, text: &str) -> &mut Self {
        self.elements[node.0].text.push_str(text);
        self
    }

    pub fn build(self) -> XmlDocument {
        XmlDocument {
            elements: self.elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (XmlDocument, NodeId, NodeId, NodeId) {
        let mut builder = XmlDocument::builder("Root");
        let root = builder.root();
        let a = builder.child(root, "A");
        let b = builder.child(root, "B");
        // Added after B but belongs under A.
        let a1 = builder.leaf(a, "A1", "  text  ");
        builder.attribute(a, "id", "1");
        (builder.build(), a, b, a1)
    }

    #[test]
    fn traversal_follows_document_order() {
        let (doc, a, b, a1) = sample();
        let order: Vec<NodeId> = doc.nodes().collect();
        assert_eq!(order, vec![doc.root(), a, a1, b]);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let (doc, a, _, a1) = sample();
        let chain: Vec<NodeId> = doc.ancestors_or_self(a1).collect();
        assert_eq!(chain, vec![a1, a, doc.root()]);
    }

    #[test]
    fn direct_text_is_trimmed_and_fields_counted() {
        let (doc, a, b, a1) = sample();
        assert_eq!(doc.direct_text(a1), "text");
        assert_eq!(doc.field_count(a), 2);
        assert_eq!(doc.field_count(b), 0);
        assert_eq!(doc.len(), 4);
    }
}
