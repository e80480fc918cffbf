//! Textual prefix-notation form of a [`HuffmanTree`].
//!
//! An internal node is written as `0` followed by its left then right
//! subtree; a leaf is written as `'` followed by its symbol. Any `char` may
//! follow a leaf marker, markers included, because the parser always takes
//! exactly one char after `'`.

use log::trace;

use crate::error::TreeError;
use crate::tree::{HuffmanTree, Node, NodeId};

pub const INTERNAL_MARKER: char = '0';
pub const LEAF_MARKER: char = '\'';

pub fn serialize(tree: &HuffmanTree) -> String {
    let mut out = String::new();
    let mut stack = vec![tree.root()];

    while let Some(id) = stack.pop() {
        match tree.node(id) {
            Node::Leaf(symbol) => {
                out.push(LEAF_MARKER);
                out.push(symbol);
            }
            Node::Internal { left, right } => {
                out.push(INTERNAL_MARKER);
                stack.push(right);
                stack.push(left);
            }
        }
    }

    out
}

/// Internal node whose children are still being parsed.
struct Pending {
    left: Option<NodeId>,
}

/// Parses a complete tree. The whole string must be consumed, and the root
/// must be an internal node.
pub fn deserialize(s: &str) -> Result<HuffmanTree, TreeError> {
    let mut nodes = Vec::new();
    let mut pending: Vec<Pending> = Vec::new();
    let mut chars = s.chars().enumerate();
    let mut root = None;

    while root.is_none() {
        let Some((offset, marker)) = chars.next() else {
            return Err(TreeError::UnexpectedEnd {
                offset: s.chars().count(),
            });
        };

        let mut done = match marker {
            INTERNAL_MARKER => {
                pending.push(Pending { left: None });
                continue;
            }
            LEAF_MARKER => {
                let (_, symbol) = chars.next().ok_or(TreeError::UnexpectedEnd {
                    offset: offset + 1,
                })?;
                nodes.push(Node::Leaf(symbol));
                nodes.len() - 1
            }
            marker => return Err(TreeError::UnexpectedMarker { offset, marker }),
        };

        // attach the finished subtree, closing every parent it completes
        loop {
            let Some(parent) = pending.last_mut() else {
                root = Some(done);
                break;
            };
            match parent.left {
                None => {
                    parent.left = Some(done);
                    break;
                }
                Some(left) => {
                    pending.pop();
                    nodes.push(Node::Internal { left, right: done });
                    done = nodes.len() - 1;
                }
            }
        }
    }

    if let Some((offset, _)) = chars.next() {
        return Err(TreeError::TrailingInput { offset });
    }

    let root = root.ok_or(TreeError::UnexpectedEnd { offset: 0 })?;
    if matches!(nodes[root], Node::Leaf(_)) {
        return Err(TreeError::LeafRoot);
    }

    trace!("parsed tree of {} nodes", nodes.len());
    Ok(HuffmanTree::from_parts(nodes, root))
}
