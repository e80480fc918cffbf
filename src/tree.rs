//! Huffman tree construction and tree-guided decoding.
//!
//! Nodes live in an arena and refer to their children by index, so walking
//! a deep (heavily skewed) tree never recurses.

use bitvec::prelude::*;
use derivative::Derivative;
use log::trace;

use crate::error::PayloadError;
use crate::frequency::FrequencyTable;
use crate::heap::MinHeap;

/// Index of a node inside its tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf(char),
    Internal { left: NodeId, right: NodeId },
}

/// A subtree waiting in the priority queue, ordered by weight alone.
#[derive(Debug, Clone, Copy, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
pub struct HeapItem {
    pub weight: u64,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    pub node: NodeId,
}

/// A prefix tree with at least two leaves.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Greedy Huffman merge over the table's symbols.
    ///
    /// Returns `None` for fewer than two distinct symbols, which cannot form a
    /// prefix code. The first item popped in each round becomes the left
    /// child, the second the right child.
    pub fn from_frequencies(freq: &FrequencyTable) -> Option<Self> {
        if freq.len() < 2 {
            return None;
        }

        let mut nodes = Vec::with_capacity(2 * freq.len() - 1);
        let mut heap = MinHeap::with_capacity(freq.len());
        for (symbol, count) in freq.iter() {
            heap.push(HeapItem {
                weight: count,
                node: nodes.len(),
            });
            nodes.push(Node::Leaf(symbol));
        }

        while heap.len() >= 2 {
            let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
                break;
            };
            trace!(
                "merging node {} (weight {}) with node {} (weight {})",
                left.node,
                left.weight,
                right.node,
                right.weight
            );

            let id = nodes.len();
            nodes.push(Node::Internal {
                left: left.node,
                right: right.node,
            });
            heap.push(HeapItem {
                weight: left.weight + right.weight,
                node: id,
            });
        }

        let root = heap.pop()?.node;
        Some(Self { nodes, root })
    }

    pub fn from_text(text: &str) -> Option<Self> {
        Self::from_frequencies(&FrequencyTable::from_text(text))
    }

    /// Assembles a tree from an arena whose root has already been checked to
    /// be an internal node.
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node at `id`, or `None` if `id` is not part of this tree.
    pub fn get(&self, id: NodeId) -> Option<Node> {
        self.nodes.get(id).copied()
    }

    /// Ids handed out by the tree itself are always in range.
    pub(crate) fn node(&self, id: NodeId) -> Node {
        self.nodes[id]
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf(_)))
            .count()
    }

    /// Walks the tree bit by bit: `0` goes left, `1` goes right, and every
    /// leaf reached emits its symbol and restarts at the root.
    pub fn decode(&self, bits: &BitSlice<u8, Msb0>) -> Result<String, PayloadError> {
        let mut out = String::new();
        let mut node = self.root;
        let mut depth = 0;

        for bit in bits.iter().by_vals() {
            if let Node::Internal { left, right } = self.nodes[node] {
                node = if bit { right } else { left };
                depth += 1;
            }
            if let Node::Leaf(symbol) = self.nodes[node] {
                out.push(symbol);
                node = self.root;
                depth = 0;
            }
        }

        if depth != 0 {
            return Err(PayloadError::IncompleteCode { dangling: depth });
        }
        Ok(out)
    }
}

/// Structural equality; arena layout is irrelevant.
impl PartialEq for HuffmanTree {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self.root, other.root)];
        while let Some((a, b)) = stack.pop() {
            match (self.nodes[a], other.nodes[b]) {
                (Node::Leaf(x), Node::Leaf(y)) if x == y => {}
                (
                    Node::Internal { left: al, right: ar },
                    Node::Internal { left: bl, right: br },
                ) => {
                    stack.push((ar, br));
                    stack.push((al, bl));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for HuffmanTree {}
