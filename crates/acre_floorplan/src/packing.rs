//! Sequence-pair representation and its decoding into block coordinates.
//!
//! Block `a` is left of block `b` when `a` precedes `b` in both sequences,
//! and below `b` when `a` follows `b` in the positive sequence but precedes it
//! in the negative one. Every pair of blocks is related one of these ways, so
//! decoding any sequence pair yields an overlap-free packing.

use crate::block::Block;
use acre_common::BlockId;

/// Two permutations of the block index set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePair {
    /// The positive sequence.
    pub pos: Vec<BlockId>,
    /// The negative sequence.
    pub neg: Vec<BlockId>,
}

/// Bounding box of a packed layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PackedSize {
    /// Layout width.
    pub width: f64,
    /// Layout height.
    pub height: f64,
}

impl PackedSize {
    /// Returns the bounding-box area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl SequencePair {
    /// Creates the identity pair for `n` blocks, which stacks every block in
    /// one row from left to right.
    pub fn identity(n: usize) -> Self {
        let ids: Vec<BlockId> = (0..n).map(BlockId::from_index).collect();
        Self {
            pos: ids.clone(),
            neg: ids,
        }
    }

    /// Returns the number of blocks.
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    /// Returns `true` if the pair holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Returns `true` if both sequences are permutations of `0..n`.
    pub fn is_valid(&self, n: usize) -> bool {
        fn is_permutation(seq: &[BlockId], n: usize) -> bool {
            if seq.len() != n {
                return false;
            }
            let mut seen = vec![false; n];
            for id in seq {
                match seen.get_mut(id.index()) {
                    Some(slot) if !*slot => *slot = true,
                    _ => return false,
                }
            }
            true
        }
        is_permutation(&self.pos, n) && is_permutation(&self.neg, n)
    }

    /// Returns the index of `id` in the negative sequence.
    pub(crate) fn neg_position(&self, id: BlockId) -> Option<usize> {
        self.neg.iter().position(|&b| b == id)
    }
}

/// Places every block according to the sequence pair and returns the size of
/// the packed layout.
///
/// Each coordinate is the length of the longest chain of blocks that must lie
/// before the block along that axis, computed with a monotone length array in
/// `O(n^2)`.
pub fn pack(blocks: &mut [Block], seq: &SequencePair) -> PackedSize {
    let n = blocks.len();
    if n == 0 {
        return PackedSize::default();
    }

    let mut neg_index = vec![0usize; n];
    for (i, id) in seq.neg.iter().enumerate() {
        neg_index[id.index()] = i;
    }
    let mut length = vec![0.0f64; n];

    // X: walk the positive sequence forwards.
    for &id in &seq.pos {
        let b = id.index();
        let p = neg_index[b];
        blocks[b].set_x(length[p]);
        let t = length[p] + blocks[b].width();
        for slot in &mut length[p..] {
            if t > *slot {
                *slot = t;
            } else {
                break;
            }
        }
    }
    let width = length[n - 1];

    // Y: walk the positive sequence backwards.
    length.fill(0.0);
    for &id in seq.pos.iter().rev() {
        let b = id.index();
        let p = neg_index[b];
        blocks[b].set_y(length[p]);
        let t = length[p] + blocks[b].height();
        for slot in &mut length[p..] {
            if t > *slot {
                *slot = t;
            } else {
                break;
            }
        }
    }
    let height = length[n - 1];

    PackedSize { width, height }
}
