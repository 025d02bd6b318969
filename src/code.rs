//! Code table derivation.
//!
//! A symbol's code is its leaf's path from the root, 0 for left and 1 for
//! right. Codes are stored one bit per byte (each element is 0 or 1), the
//! same representation the encoder emits.

use crate::frequency::ALPHABET_SIZE;
use crate::tree::{CodingTree, Node};

/// Symbol to code mapping.
///
/// Read-only once built; encoder workers share it by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Vec<u8>>, // symbol -> bit sequence, empty if absent
}

impl CodeTable {
    /// Derive the code of every leaf in `tree`.
    ///
    /// A tree whose root is a leaf (one distinct symbol) gives that symbol
    /// the 1-bit code `0`, never an empty code.
    pub fn from_tree(tree: &CodingTree) -> Self {
        let mut codes = vec![Vec::new(); ALPHABET_SIZE];
        match tree.root() {
            Node::Leaf { symbol, .. } => codes[*symbol as usize] = vec![0],
            root => assign_codes(root, &mut Vec::new(), &mut codes),
        }
        Self { codes }
    }

    /// Code for `symbol`, or `None` if the symbol was not in the tree.
    pub fn get(&self, symbol: u8) -> Option<&[u8]> {
        let code = &self.codes[symbol as usize];
        if code.is_empty() {
            None
        } else {
            Some(code)
        }
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| !c.is_empty()).count()
    }

    /// True if no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[u8])> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(|(s, c)| (s as u8, c.as_slice()))
    }

    /// True if no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&[u8]> = self.iter().map(|(_, c)| c).collect();
        // After sorting, a prefix sorts directly before some code it prefixes.
        codes.sort_unstable();
        codes.windows(2).all(|w| !w[1].starts_with(w[0]))
    }

    /// Length in bits of `data` once encoded, before padding.
    ///
    /// Symbols without a code contribute nothing.
    pub fn encoded_len(&self, data: &[u8]) -> usize {
        data.iter().map(|&b| self.codes[b as usize].len()).sum()
    }

    /// Render a code as a string of `0` and `1`.
    pub fn code_string(code: &[u8]) -> String {
        code.iter().map(|&b| if b == 0 { '0' } else { '1' }).collect()
    }
}

/// Depth-first walk sharing one path buffer; each leaf takes a copy.
fn assign_codes(node: &Node, path: &mut Vec<u8>, codes: &mut [Vec<u8>]) {
    match node {
        Node::Leaf { symbol, .. } => codes[*symbol as usize] = path.clone(),
        Node::Internal { left, right, .. } => {
            path.push(0);
            assign_codes(left, path, codes);
            path.pop();
            path.push(1);
            assign_codes(right, path, codes);
            path.pop();
        }
    }
}
