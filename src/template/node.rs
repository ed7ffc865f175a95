// ABOUTME: Render node abstraction for compiled templates
// ABOUTME: Defines the Node trait implemented by host and pattern library nodes, and NodeList

use std::fmt;

use super::context::Context;
use super::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Extends,
    Include,
    Other,
}

/// A compiled piece of a template.
pub trait Node: fmt::Debug {
    fn render(&self, context: &mut Context) -> Result<String>;

    fn kind(&self) -> NodeKind {
        NodeKind::Other
    }

    /// Node lists nested inside this node, searched by `NodeList::contains_kind`
    fn child_nodelists(&self) -> Vec<&NodeList> {
        Vec::new()
    }
}

#[derive(Debug, Default)]
pub struct NodeList {
    nodes: Vec<Box<dyn Node>>,
}

impl NodeList {
    pub fn new(nodes: Vec<Box<dyn Node>>) -> Self {
        Self { nodes }
    }

    pub fn push(&mut self, node: Box<dyn Node>) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Box<dyn Node>> {
        self.nodes.iter()
    }

    /// Whether any node, including nested ones, is of `kind`
    pub fn contains_kind(&self, kind: NodeKind) -> bool {
        self.iter().any(|node| {
            node.kind() == kind
                || node
                    .child_nodelists()
                    .into_iter()
                    .any(|nested| nested.contains_kind(kind))
        })
    }

    pub fn render(&self, context: &mut Context) -> Result<String> {
        let mut output = String::new();
        for node in &self.nodes {
            output.push_str(&node.render(context)?);
        }
        Ok(output)
    }
}

impl From<Vec<Box<dyn Node>>> for NodeList {
    fn from(nodes: Vec<Box<dyn Node>>) -> Self {
        Self::new(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Text(&'static str);

    impl Node for Text {
        fn render(&self, _context: &mut Context) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Debug)]
    struct Block(NodeList);

    impl Node for Block {
        fn render(&self, context: &mut Context) -> Result<String> {
            self.0.render(context)
        }

        fn child_nodelists(&self) -> Vec<&NodeList> {
            vec![&self.0]
        }
    }

    #[derive(Debug)]
    struct FakeExtends;

    impl Node for FakeExtends {
        fn render(&self, _context: &mut Context) -> Result<String> {
            Ok(String::new())
        }

        fn kind(&self) -> NodeKind {
            NodeKind::Extends
        }
    }

    #[test]
    fn test_render_concatenates_nodes() {
        let nodes = NodeList::new(vec![Box::new(Text("a")), Box::new(Text("b"))]);
        assert_eq!(nodes.render(&mut Context::default()).unwrap(), "ab");
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_contains_kind_searches_nested_lists() {
        let nested = NodeList::new(vec![Box::new(FakeExtends)]);
        let nodes = NodeList::new(vec![Box::new(Text("a")), Box::new(Block(nested))]);

        assert!(nodes.contains_kind(NodeKind::Extends));
        assert!(!nodes.contains_kind(NodeKind::Include));
    }
}
