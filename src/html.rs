//! Minimal HTML tree for form discovery.
//!
//! Pages are parsed with `scraper` (html5ever) and lowered into a flat arena
//! of [`HtmlNode`]s, a tagged tree of elements and text. Children are stored
//! as [`NodeId`] indices, so lowering, walking and dropping never recurse
//! regardless of how deeply the page nests. Comments, doctypes and processing
//! instructions are dropped during lowering.

use std::collections::HashMap;

use scraper::{Html, Node};

/// Index of a node inside its [`HtmlDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A node of a parsed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    /// An element with its attributes (in source order) and children.
    Element {
        /// Lowercased tag name.
        name: String,
        /// Attribute `(name, value)` pairs.
        attributes: Vec<(String, String)>,
        /// Child nodes in document order.
        children: Vec<NodeId>,
    },
    /// Character data between elements.
    Text(String),
}

impl HtmlNode {
    /// Returns the value of attribute `name` if this is an element that carries it.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Self::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            Self::Text(_) => None,
        }
    }

    /// Returns the tag name for elements.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::Element { name, .. } => Some(name),
            Self::Text(_) => None,
        }
    }

    fn children(&self) -> &[NodeId] {
        match self {
            Self::Element { children, .. } => children,
            Self::Text(_) => &[],
        }
    }
}

/// A parsed HTML page.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    nodes: Vec<HtmlNode>,
    root: NodeId,
}

impl HtmlDocument {
    /// Parses `body` as an HTML document. Parsing never fails; malformed
    /// markup is repaired the way browsers do.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        let html = Html::parse_document(body);
        let root_element = html.root_element();

        let mut nodes = Vec::new();
        let mut lowered = HashMap::new();

        // `descendants` walks ego_tree's parent links, not the call stack, and
        // yields parents before children, so every parent is lowered first.
        for node in root_element.descendants() {
            let lowered_node = match node.value() {
                Node::Element(element) => HtmlNode::Element {
                    name: element.name().to_string(),
                    attributes: element
                        .attrs()
                        .map(|(key, val)| (key.to_string(), val.to_string()))
                        .collect(),
                    children: Vec::new(),
                },
                Node::Text(text) => HtmlNode::Text(String::from(&**text)),
                _ => continue,
            };

            let id = NodeId(nodes.len());
            nodes.push(lowered_node);
            lowered.insert(node.id(), id);

            // The root's parent is the document node, which is never lowered.
            let parent = node
                .parent()
                .and_then(|parent| lowered.get(&parent.id()).copied());
            if let Some(NodeId(parent_index)) = parent
                && let HtmlNode::Element { children, .. } = &mut nodes[parent_index]
            {
                children.push(id);
            }
        }

        Self {
            nodes,
            root: NodeId(0),
        }
    }

    /// Builds a document from already lowered nodes.
    #[cfg(test)]
    pub(crate) fn from_nodes(nodes: Vec<HtmlNode>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    /// Returns the node stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &HtmlNode {
        &self.nodes[id.0]
    }

    /// Returns all descendants of `id` in document (pre-)order, text nodes included.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<&HtmlNode> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children().iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            let node = self.node(next);
            out.push(node);
            stack.extend(node.children().iter().rev().copied());
        }
        out
    }

    /// Returns every element whose `id` attribute equals `id`, in document order.
    #[must_use]
    pub fn elements_by_id(&self, id: &str) -> Vec<NodeId> {
        // Lowering appends in pre-order, so arena order is document order.
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|node_id| self.node(*node_id).attr("id") == Some(id))
            .collect()
    }

    /// Returns true if at least one element has the given `id`.
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.attr("id") == Some(id))
    }

    /// The `<html>` root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }
}
