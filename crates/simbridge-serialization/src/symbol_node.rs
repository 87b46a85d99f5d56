// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

/// One child of a [`SymbolNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Leaf(String),
    Node(SymbolNode),
}

impl Symbol {
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Symbol::Leaf(text) => Some(text),
            Symbol::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&SymbolNode> {
        match self {
            Symbol::Leaf(_) => None,
            Symbol::Node(node) => Some(node),
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Leaf(text) => f.write_str(text),
            Symbol::Node(node) => write!(f, "({})", node),
        }
    }
}

/// Ordered list of leaves and nested lists; the body of one parenthesized expression.
///
/// `Display` writes the body without the enclosing parentheses, children
/// separated by single spaces. Use [`SymbolNode::to_wire`] for the wrapped form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SymbolNode {
    children: Vec<Symbol>,
}

impl SymbolNode {
    pub fn new(children: Vec<Symbol>) -> Self {
        SymbolNode { children }
    }

    pub fn children(&self) -> &[Symbol] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Symbol> {
        self.children.get(index)
    }

    pub fn leaf(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Symbol::as_leaf)
    }

    pub fn node(&self, index: usize) -> Option<&SymbolNode> {
        self.get(index).and_then(Symbol::as_node)
    }

    /// First child when it is a leaf; the fragment tag for `(tag ...)` expressions.
    pub fn tag(&self) -> Option<&str> {
        self.leaf(0)
    }

    /// Nested lists only, in order.
    pub fn nodes(&self) -> impl Iterator<Item = &SymbolNode> {
        self.children.iter().filter_map(Symbol::as_node)
    }

    /// First nested list whose tag equals `tag`.
    pub fn find(&self, tag: &str) -> Option<&SymbolNode> {
        self.nodes().find(|node| node.tag() == Some(tag))
    }

    /// `(a (b c) d)` form of this node.
    pub fn to_wire(&self) -> String {
        format!("({})", self)
    }

    /// Concatenated form of a message root: every child wrapped, no separators.
    pub fn to_message(&self) -> String {
        self.children
            .iter()
            .map(|child| match child {
                Symbol::Leaf(text) => text.clone(),
                Symbol::Node(node) => node.to_wire(),
            })
            .collect()
    }
}

impl Display for SymbolNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", child)?;
        }
        Ok(())
    }
}

impl From<Vec<Symbol>> for SymbolNode {
    fn from(children: Vec<Symbol>) -> Self {
        SymbolNode::new(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(text: &str) -> Symbol {
        Symbol::Leaf(text.to_string())
    }

    #[test]
    fn test_accessors() {
        let node = SymbolNode::new(vec![
            leaf("HJ"),
            Symbol::Node(SymbolNode::new(vec![leaf("n"), leaf("hj1")])),
            Symbol::Node(SymbolNode::new(vec![leaf("ax"), leaf("-1.5")])),
        ]);

        assert_eq!(node.tag(), Some("HJ"));
        assert_eq!(node.len(), 3);
        assert_eq!(node.leaf(1), None);
        assert_eq!(node.find("ax").and_then(|ax| ax.leaf(1)), Some("-1.5"));
        assert!(node.find("missing").is_none());
        assert_eq!(node.nodes().count(), 2);
    }

    #[test]
    fn test_rendering() {
        let node = SymbolNode::new(vec![
            leaf("a"),
            Symbol::Node(SymbolNode::new(vec![leaf("b"), leaf("c")])),
            leaf("d"),
        ]);
        assert_eq!(node.to_string(), "a (b c) d");
        assert_eq!(node.to_wire(), "(a (b c) d)");

        let message = SymbolNode::new(vec![
            Symbol::Node(SymbolNode::new(vec![leaf("time")])),
            Symbol::Node(SymbolNode::new(vec![leaf("GS")])),
        ]);
        assert_eq!(message.to_message(), "(time)(GS)");
    }
}
