//! Binary decoding trees for the run-length code tables.
//!
//! The trees are built once from the code tables and flattened into an array
//! of `i32` slots:
//! - a negative slot is a leaf, holding the bitwise complement of its run
//!   length,
//! - a non-negative slot is a branch, holding the index of its `1` child. Its
//!   `0` child always follows in the next slot,
//! - `INVALID` marks a branch without a child, i.e. a bit sequence that is
//!   not part of any code.

use std::sync::LazyLock;

use crate::channel::ByteChannel;
use crate::ccitt::tables::{
    BLACK_MAKEUP, BLACK_TERMINATING, COMMON_MAKEUP, RunCode, WHITE_MAKEUP, WHITE_TERMINATING,
};
use crate::error::{DecodeError, HuffmanError, Result, bail, err};
use crate::log::lwarn;

const INVALID: i32 = i32::MIN;

/// Run lengths below this value are terminating codes, all others make-up codes.
const MAKEUP_THRESHOLD: u16 = 64;

/// The decoding tree for white runs.
pub static WHITE_TREE: LazyLock<HuffmanTree> = LazyLock::new(|| {
    build_static(&[&WHITE_TERMINATING, &WHITE_MAKEUP, &COMMON_MAKEUP])
});

/// The decoding tree for black runs.
pub static BLACK_TREE: LazyLock<HuffmanTree> = LazyLock::new(|| {
    build_static(&[&BLACK_TERMINATING, &BLACK_MAKEUP, &COMMON_MAKEUP])
});

fn build_static(tables: &[&[RunCode]]) -> HuffmanTree {
    match HuffmanTree::build(tables) {
        Ok(tree) => tree,
        Err(e) => panic!("malformed run-length code table: {e}"),
    }
}

/// A node of the tree while it is being built.
enum Node {
    Branch {
        zero: Option<Box<Node>>,
        one: Option<Box<Node>>,
    },
    Leaf(u16),
}

impl Node {
    fn empty_branch() -> Self {
        Self::Branch {
            zero: None,
            one: None,
        }
    }
}

/// A prefix-free code, mapping bit sequences to run lengths.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<i32>,
}

impl HuffmanTree {
    /// Build a tree from code tables.
    ///
    /// Fails if a code is the prefix of another code, or appears twice.
    pub(crate) fn build(tables: &[&[RunCode]]) -> Result<Self> {
        let mut root = Node::empty_branch();

        for code in tables.iter().flat_map(|t| t.iter()) {
            insert(&mut root, code)?;
        }

        let mut nodes = Vec::new();
        flatten(Some(&root), &mut nodes);

        Ok(Self { nodes })
    }

    /// Decode a single code word, which is either a terminating or a make-up code.
    #[inline]
    pub fn decode_code(&self, channel: &mut ByteChannel<'_>) -> Result<u16> {
        let mut index = 0;

        loop {
            let slot = self.nodes[index];

            if slot == INVALID {
                lwarn!(
                    "invalid run-length code before byte {}",
                    channel.absolute_pos()
                );

                bail!(HuffmanError::InvalidCode);
            } else if slot < 0 {
                return Ok(!slot as u16);
            }

            index = if channel.read_bit()? == 0 {
                index + 1
            } else {
                slot as usize
            };
        }
    }

    /// Decode a complete run: any number of make-up codes followed by one
    /// terminating code.
    #[inline]
    pub fn decode_run(&self, channel: &mut ByteChannel<'_>) -> Result<u32> {
        let mut total: u32 = 0;

        loop {
            let len = self.decode_code(channel)?;
            total = total
                .checked_add(len as u32)
                .ok_or(DecodeError::Overflow)?;

            if len < MAKEUP_THRESHOLD {
                return Ok(total);
            }
        }
    }

    /// The bit sequences that lead out of the tree without reaching a leaf.
    #[cfg(test)]
    pub(crate) fn unmapped_paths(&self) -> Vec<String> {
        fn walk(tree: &HuffmanTree, index: usize, path: &mut String, out: &mut Vec<String>) {
            let slot = tree.nodes[index];

            if slot == INVALID {
                out.push(path.clone());
            } else if slot >= 0 {
                for (bit, child) in [('0', index + 1), ('1', slot as usize)] {
                    path.push(bit);
                    walk(tree, child, path, out);
                    path.pop();
                }
            }
        }

        let mut out = Vec::new();
        walk(self, 0, &mut String::new(), &mut out);
        out
    }
}

fn insert(root: &mut Node, code: &RunCode) -> Result<()> {
    let mut node = root;

    for i in (0..code.len).rev() {
        let bit = (code.bits >> i) & 1;

        node = match node {
            Node::Branch { zero, one } => {
                let child = if bit == 0 { zero } else { one };
                &mut **child.get_or_insert_with(|| Box::new(Node::empty_branch()))
            }
            // A shorter code is a prefix of this one.
            Node::Leaf(_) => bail!(HuffmanError::Collision),
        };
    }

    // Only a freshly created node can become a leaf.
    if matches!(node, Node::Branch { zero: None, one: None }) {
        *node = Node::Leaf(code.run_length);
        Ok(())
    } else {
        err!(HuffmanError::Collision)
    }
}

fn flatten(node: Option<&Node>, nodes: &mut Vec<i32>) {
    match node {
        None => nodes.push(INVALID),
        Some(Node::Leaf(run_length)) => nodes.push(!(*run_length as i32)),
        Some(Node::Branch { zero, one }) => {
            let index = nodes.len();
            nodes.push(0);
            flatten(zero.as_deref(), nodes);
            nodes[index] = nodes.len() as i32;
            flatten(one.as_deref(), nodes);
        }
    }
}
