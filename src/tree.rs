use serde::{Deserialize, Serialize};
use std::slice;

/// An entity that owns ordered children of its own kind, keyed by sequence numbers.
pub trait Node: Sized {
    fn sequence(&self) -> &str;
    fn detail_sequence(&self) -> &str;
    fn children(&self) -> &Tree<Self>;
}

/// Ordered children shared by statements and moves.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct Tree<T> {
    nodes: Vec<T>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Tree { nodes: Vec::new() }
    }
}

impl<T> Tree<T> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.nodes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.nodes.get(index)
    }

    pub fn last(&self) -> Option<&T> {
        self.nodes.last()
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut T> {
        self.nodes.last_mut()
    }

    pub(crate) fn push(&mut self, node: T) {
        self.nodes.push(node);
    }
}

impl<T: Node> Tree<T> {
    /// Finds a node by sequence pair at any depth.
    ///
    /// Only subtrees whose root carries `sequence` are searched, since details
    /// always share the sequence number of the move they belong to.
    pub fn find(&self, sequence: &str, detail_sequence: &str) -> Option<&T> {
        for node in &self.nodes {
            if node.sequence() != sequence {
                continue;
            }
            if node.detail_sequence() == detail_sequence {
                return Some(node);
            }
            if let Some(found) = node.children().find(sequence, detail_sequence) {
                return Some(found);
            }
        }
        None
    }

    /// Iterates every node in pre-order.
    pub fn flatten(&self) -> PreOrder<'_, T> {
        PreOrder {
            stack: vec![self.nodes.iter()],
        }
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

pub struct PreOrder<'a, T> {
    stack: Vec<slice::Iter<'a, T>>,
}

impl<'a, T: Node> Iterator for PreOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(node) => {
                    self.stack.push(node.children().iter());
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
