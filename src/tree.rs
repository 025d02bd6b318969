//! Huffman tree construction.
//!
//! Greedy minimum-count merging over a binary heap: pop the two lightest
//! nodes, join them under a new internal node, push it back, until one
//! node is left.
//!
//! Ties between equal counts are broken by insertion order, with leaves
//! inserted in ascending symbol order, so the same table always yields the
//! same tree whatever backend or worker count produced it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;

/// Huffman tree node.
///
/// Every node has zero or two children; a lone child cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A symbol and its count.
    Leaf {
        /// The byte this leaf stands for.
        symbol: u8,
        /// Occurrences of `symbol` in the input.
        count: u64,
    },
    /// Two subtrees; `count` is the sum of theirs.
    Internal {
        /// Subtree reached with a 0 bit.
        left: Box<Node>,
        /// Subtree reached with a 1 bit.
        right: Box<Node>,
        /// Combined count of both subtrees.
        count: u64,
    },
}

impl Node {
    /// Count of this node (sum of its leaves for internal nodes).
    pub fn count(&self) -> u64 {
        match self {
            Node::Leaf { count, .. } => *count,
            Node::Internal { count, .. } => *count,
        }
    }

    fn merge(left: Node, right: Node) -> Node {
        let count = left.count() + right.count();
        Node::Internal {
            left: Box::new(left),
            right: Box::new(right),
            count,
        }
    }
}

/// Heap slot: orders by count, then by insertion sequence.
///
/// The sequence number only makes ties reproducible; any tie order gives
/// an optimal code.
struct Pending {
    seq: usize,
    node: Node,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-priority queue
        other
            .node
            .count()
            .cmp(&self.node.count())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A Huffman coding tree.
///
/// Dropping the tree frees every node, children before parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingTree {
    root: Node,
}

impl CodingTree {
    /// Build the tree for a frequency table.
    ///
    /// With a single distinct symbol the root is that symbol's leaf.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if the table has no symbols.
    pub fn build(freqs: &FrequencyTable) -> Result<Self> {
        let mut pq: BinaryHeap<Pending> = freqs
            .iter()
            .enumerate()
            .map(|(seq, (symbol, count))| Pending {
                seq,
                node: Node::Leaf { symbol, count },
            })
            .collect();
        let mut seq = pq.len();

        while pq.len() > 1 {
            let (Some(left), Some(right)) = (pq.pop(), pq.pop()) else {
                break;
            };
            pq.push(Pending {
                seq,
                node: Node::merge(left.node, right.node),
            });
            seq += 1;
        }

        let root = pq.pop().ok_or(Error::EmptyInput)?.node;
        log::debug!(
            "built tree: {} leaves, depth {}, weight {}",
            freqs.len(),
            depth(&root),
            root.count()
        );
        Ok(Self { root })
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Leaves as `(symbol, count)`, left to right.
    pub fn leaves(&self) -> Vec<(u8, u64)> {
        let mut out = Vec::new();
        collect_leaves(&self.root, &mut out);
        out
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        depth(&self.root)
    }
}

fn collect_leaves(node: &Node, out: &mut Vec<(u8, u64)>) {
    match node {
        Node::Leaf { symbol, count } => out.push((*symbol, *count)),
        Node::Internal { left, right, .. } => {
            collect_leaves(left, out);
            collect_leaves(right, out);
        }
    }
}

fn depth(node: &Node) -> usize {
    match node {
        Node::Leaf { .. } => 0,
        Node::Internal { left, right, .. } => 1 + depth(left).max(depth(right)),
    }
}
