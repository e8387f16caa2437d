// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use smol_str::SmolStr;

/// Identifier of a node in a [`Document`] arena.
///
/// Ids are monotonic and never reused, so holding one past the node's removal is
/// harmless: every accessor treats a removed id as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Editable control state: the raw text value plus the caret offset (in chars).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pub value: String,
    pub caret: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    tag: SmolStr,
    attrs: BTreeMap<SmolStr, String>,
    classes: BTreeSet<SmolStr>,
    input: Option<InputState>,
    children: Vec<NodeId>,
}

impl ElementData {
    fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            classes: BTreeSet::new(),
            input: None,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(SmolStr::as_str)
    }

    pub fn input(&self) -> Option<&InputState> {
        self.input.as_ref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(_) => None,
            NodeKind::Text(text) => Some(text),
        }
    }
}

/// Arena-backed host document tree.
///
/// Removal tombstones slots instead of freeing them; ids stay stable for the
/// lifetime of the document and every operation on a removed id is a no-op, which
/// is what late callbacks from a superseded UI state need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    root: NodeId,
}

impl Document {
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            kind: NodeKind::Element(ElementData::new("body")),
        };
        Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    pub fn create_element(&mut self, tag: impl Into<SmolStr>) -> NodeId {
        self.alloc(Node {
            parent: None,
            kind: NodeKind::Element(ElementData::new(tag)),
        })
    }

    /// Creates an editable control (`textarea`, `input`, …) with empty value.
    pub fn create_input(&mut self, tag: impl Into<SmolStr>) -> NodeId {
        let id = self.create_element(tag);
        if let Some(NodeKind::Element(element)) = self.get_mut(id).map(|node| &mut node.kind) {
            element.input = Some(InputState::default());
        }
        id
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node {
            parent: None,
            kind: NodeKind::Text(text.into()),
        })
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(child) {
            return;
        }
        let Some(NodeKind::Element(element)) = self.get_mut(parent).map(|node| &mut node.kind)
        else {
            return;
        };
        element.children.push(child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Inserts `new` into `parent`'s children just before `reference`
    /// (appends when `reference` is not a child of `parent`).
    pub fn insert_before(&mut self, parent: NodeId, new: NodeId, reference: NodeId) {
        if !self.contains(new) {
            return;
        }
        let Some(NodeKind::Element(element)) = self.get_mut(parent).map(|node| &mut node.kind)
        else {
            return;
        };
        let at = element
            .children
            .iter()
            .position(|&child| child == reference)
            .unwrap_or(element.children.len());
        element.children.insert(at, new);
        if let Some(node) = self.get_mut(new) {
            node.parent = Some(parent);
        }
    }

    /// Detaches the node from its parent and tombstones its whole subtree.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).and_then(Node::parent) else {
            if self.contains(id) && id != self.root {
                self.tombstone(id);
            }
            return;
        };

        if let Some(NodeKind::Element(element)) =
            self.get_mut(parent).map(|node| &mut node.kind)
        {
            element.children.retain(|&child| child != id);
        }
        self.tombstone(id);
    }

    fn tombstone(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.tombstone(child);
        }
        if let Some(slot) = self.nodes.get_mut(id.0) {
            *slot = None;
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .and_then(Node::as_element)
            .map(ElementData::children)
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::as_element).map(ElementData::tag)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::as_text)
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(NodeKind::Text(existing)) = self.get_mut(id).map(|node| &mut node.kind) {
            *existing = text.into();
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id).and_then(Node::as_element).and_then(|element| element.attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: impl Into<SmolStr>, value: impl Into<String>) {
        if let Some(NodeKind::Element(element)) = self.get_mut(id).map(|node| &mut node.kind) {
            element.attrs.insert(name.into(), value.into());
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|element| element.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: impl Into<SmolStr>) {
        if let Some(NodeKind::Element(element)) = self.get_mut(id).map(|node| &mut node.kind) {
            element.classes.insert(class.into());
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(NodeKind::Element(element)) = self.get_mut(id).map(|node| &mut node.kind) {
            element.classes.remove(class);
        }
    }

    pub fn input(&self, id: NodeId) -> Option<&InputState> {
        self.get(id).and_then(Node::as_element).and_then(ElementData::input)
    }

    pub fn set_input(&mut self, id: NodeId, value: impl Into<String>, caret: usize) {
        if let Some(NodeKind::Element(element)) = self.get_mut(id).map(|node| &mut node.kind) {
            if let Some(input) = element.input.as_mut() {
                input.value = value.into();
                input.caret = caret;
            }
        }
    }

    /// Pre-order walk of the subtree rooted at `id`, including `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    pub fn text_nodes_under(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&node| self.text(node).is_some())
            .collect()
    }

    /// Nearest node (self first, then ancestors) matching the predicate.
    pub fn closest(
        &self,
        id: NodeId,
        mut predicate: impl FnMut(&Document, NodeId) -> bool,
    ) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if predicate(self, node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
