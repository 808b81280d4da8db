//! Neighbor moves of the annealer and their undo records.

use crate::block::{Block, ShapeState, Stretch};
use crate::packing::SequencePair;
use crate::problem::Outline;
use acre_common::BlockId;
use acre_config::MoveConfig;
use rand::Rng;

/// A perturbation that was applied, with what is needed to revert it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Move {
    /// A block changed shape.
    Resize {
        /// The resized block.
        block: BlockId,
        /// Its shape before the move.
        previous: ShapeState,
    },
    /// Two positions of the positive sequence were exchanged.
    PosSwap(usize, usize),
    /// Two positions of the negative sequence were exchanged.
    NegSwap(usize, usize),
    /// The same two blocks were exchanged in both sequences.
    DoubleSwap {
        /// Exchanged positions in the positive sequence.
        pos: (usize, usize),
        /// Exchanged positions in the negative sequence.
        neg: (usize, usize),
    },
    /// Nothing changed.
    Noop,
}

/// Cumulative move-selection thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MoveThresholds {
    resize: f64,
    pos_swap: f64,
    neg_swap: f64,
}

impl MoveThresholds {
    pub(crate) fn new(moves: &MoveConfig) -> Self {
        let resize = moves.resize;
        let pos_swap = resize + moves.pos_swap;
        let neg_swap = pos_swap + moves.neg_swap;
        Self {
            resize,
            pos_swap,
            neg_swap,
        }
    }

    fn swap_kind(&self, op: f64) -> SwapKind {
        if op <= self.pos_swap {
            SwapKind::Pos
        } else if op <= self.neg_swap {
            SwapKind::Neg
        } else {
            SwapKind::Double
        }
    }

    /// Draws a swap kind when a resize was picked but no block can resize.
    ///
    /// The swap kinds keep their relative weights. If they have no weight at
    /// all, each of the three is equally likely.
    fn redraw_swap<R: Rng + ?Sized>(&self, rng: &mut R) -> SwapKind {
        let mass = 1.0 - self.resize;
        if mass <= 0.0 {
            return match rng.gen_range(0..3) {
                0 => SwapKind::Pos,
                1 => SwapKind::Neg,
                _ => SwapKind::Double,
            };
        }
        self.swap_kind(self.resize + mass * rng.gen::<f64>())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwapKind {
    Pos,
    Neg,
    Double,
}

/// Applies one random move to the blocks and sequences.
///
/// Positions must be current because edge-stretch resizes look at the
/// placed neighbors. The caller repacks afterwards.
pub(crate) fn perturb<R: Rng + ?Sized>(
    blocks: &mut [Block],
    seq: &mut SequencePair,
    outline: Outline,
    thresholds: &MoveThresholds,
    rng: &mut R,
) -> Move {
    let n = blocks.len();
    if n < 2 {
        return Move::Noop;
    }

    let resizable: Vec<usize> = (0..n).filter(|&i| blocks[i].is_resizable()).collect();
    let op: f64 = rng.gen();
    let kind = if op <= thresholds.resize {
        if !resizable.is_empty() {
            let index = resizable[rng.gen_range(0..resizable.len())];
            return resize(blocks, index, outline, rng);
        }
        thresholds.redraw_swap(rng)
    } else {
        thresholds.swap_kind(op)
    };

    let (i, j) = distinct_pair(n, rng);
    match kind {
        SwapKind::Pos => {
            seq.pos.swap(i, j);
            Move::PosSwap(i, j)
        }
        SwapKind::Neg => {
            seq.neg.swap(i, j);
            Move::NegSwap(i, j)
        }
        SwapKind::Double => double_swap(seq, i, j),
    }
}

fn double_swap(seq: &mut SequencePair, i: usize, j: usize) -> Move {
    seq.pos.swap(i, j);
    let (Some(k), Some(l)) = (seq.neg_position(seq.pos[i]), seq.neg_position(seq.pos[j])) else {
        // Sequences always hold the same ids; keep the pos swap alone.
        return Move::PosSwap(i, j);
    };
    seq.neg.swap(k, l);
    Move::DoubleSwap {
        pos: (i, j),
        neg: (k, l),
    }
}

fn resize<R: Rng + ?Sized>(blocks: &mut [Block], index: usize, outline: Outline, rng: &mut R) -> Move {
    let previous = blocks[index].shape_state();
    let block = BlockId::from_index(index);

    if blocks[index].is_macro() {
        blocks[index].switch_macro_option(rng);
        return Move::Resize { block, previous };
    }

    let option: f64 = rng.gen();
    let direction = if option <= 0.2 {
        blocks[index].choose_random_aspect_ratio(rng);
        return Move::Resize { block, previous };
    } else if option <= 0.4 {
        Stretch::Right
    } else if option <= 0.6 {
        Stretch::Left
    } else if option <= 0.8 {
        Stretch::Top
    } else {
        Stretch::Bottom
    };

    let Some(target) =
        Block::stretch_target(blocks, index, direction, outline.width, outline.height)
    else {
        return Move::Noop;
    };
    match direction {
        Stretch::Right | Stretch::Left => blocks[index].change_width(target),
        Stretch::Top | Stretch::Bottom => blocks[index].change_height(target),
    }
    Move::Resize { block, previous }
}

/// Draws two different indices below `n`.
fn distinct_pair<R: Rng + ?Sized>(n: usize, rng: &mut R) -> (usize, usize) {
    let i = rng.gen_range(0..n);
    let mut j = rng.gen_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    (i, j)
}

/// Reverts a move. The caller repacks afterwards.
pub(crate) fn undo(mv: Move, blocks: &mut [Block], seq: &mut SequencePair) {
    match mv {
        Move::Resize { block, previous } => blocks[block.index()].restore_shape(previous),
        Move::PosSwap(i, j) => seq.pos.swap(i, j),
        Move::NegSwap(i, j) => seq.neg.swap(i, j),
        Move::DoubleSwap { pos, neg } => {
            seq.neg.swap(neg.0, neg.1);
            seq.pos.swap(pos.0, pos.1);
        }
        Move::Noop => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::pack;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const OUTLINE: Outline = Outline {
        width: 200.0,
        height: 200.0,
    };

    fn mixed_blocks() -> Vec<Block> {
        vec![
            Block::soft("s0", 400.0, vec![(0.5, 2.0)]),
            Block::soft("s1", 900.0, vec![(0.25, 0.5), (1.0, 4.0)]),
            Block::hard("m0", 200.0, 1, vec![(20.0, 10.0), (10.0, 20.0)]),
            Block::hard("m1", 100.0, 1, vec![(10.0, 10.0)]),
            Block::soft("s2", 50.0, vec![(1.0, 1.0)]),
        ]
    }

    #[test]
    fn thresholds_are_cumulative() {
        let t = MoveThresholds::new(&MoveConfig::default());
        assert_eq!(t.resize, 0.4);
        assert!((t.pos_swap - 0.6).abs() < 1e-12);
        assert!((t.neg_swap - 0.8).abs() < 1e-12);
    }

    #[test]
    fn single_block_is_a_noop() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut blocks = vec![Block::soft("s", 10.0, vec![(1.0, 2.0)])];
        let mut seq = SequencePair::identity(1);
        let t = MoveThresholds::new(&MoveConfig::default());
        for _ in 0..20 {
            assert_eq!(perturb(&mut blocks, &mut seq, OUTLINE, &t, &mut rng), Move::Noop);
        }
    }

    #[test]
    fn moves_keep_permutations_and_shapes() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut blocks = mixed_blocks();
        let areas: Vec<f64> = blocks.iter().map(Block::area).collect();
        let mut seq = SequencePair::identity(blocks.len());
        let t = MoveThresholds::new(&MoveConfig::default());
        pack(&mut blocks, &seq);
        for _ in 0..2000 {
            perturb(&mut blocks, &mut seq, OUTLINE, &t, &mut rng);
            pack(&mut blocks, &seq);
            assert!(seq.is_valid(blocks.len()));
            for (block, area) in blocks.iter().zip(&areas) {
                if block.is_soft() {
                    let product = block.width() * block.height();
                    assert!((product - area).abs() <= 1e-9 * area);
                } else if let crate::block::BlockShape::Hard { options, .. } = block.shape() {
                    assert!(options.contains(&(block.width(), block.height())));
                }
            }
        }
    }

    #[test]
    fn undo_restores_exact_state() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut blocks = mixed_blocks();
        let mut seq = SequencePair::identity(blocks.len());
        let t = MoveThresholds::new(&MoveConfig::default());
        pack(&mut blocks, &seq);
        for _ in 0..500 {
            let before_seq = seq.clone();
            let before: Vec<ShapeState> = blocks.iter().map(Block::shape_state).collect();
            let positions: Vec<(f64, f64)> = blocks.iter().map(|b| (b.x(), b.y())).collect();

            let mv = perturb(&mut blocks, &mut seq, OUTLINE, &t, &mut rng);
            pack(&mut blocks, &seq);
            undo(mv, &mut blocks, &mut seq);
            pack(&mut blocks, &seq);

            assert_eq!(seq, before_seq);
            let after: Vec<ShapeState> = blocks.iter().map(Block::shape_state).collect();
            assert_eq!(after, before);
            let restored: Vec<(f64, f64)> = blocks.iter().map(|b| (b.x(), b.y())).collect();
            assert_eq!(restored, positions);

            // Walk forward so later iterations start from varied states.
            perturb(&mut blocks, &mut seq, OUTLINE, &t, &mut rng);
            pack(&mut blocks, &seq);
        }
    }

    fn macros_only() -> Vec<Block> {
        vec![
            Block::hard("a", 1.0, 1, vec![(1.0, 1.0)]),
            Block::hard("b", 4.0, 1, vec![(2.0, 2.0)]),
            Block::hard("c", 9.0, 1, vec![(3.0, 3.0)]),
        ]
    }

    #[test]
    fn unresizable_blocks_draw_swaps_uniformly() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut blocks = macros_only();
        let mut seq = SequencePair::identity(3);
        let t = MoveThresholds::new(&MoveConfig {
            resize: 1.0,
            pos_swap: 0.0,
            neg_swap: 0.0,
            double_swap: 0.0,
        });
        let mut counts = [0usize; 3];
        for _ in 0..300 {
            match perturb(&mut blocks, &mut seq, OUTLINE, &t, &mut rng) {
                Move::PosSwap(..) => counts[0] += 1,
                Move::NegSwap(..) => counts[1] += 1,
                Move::DoubleSwap { .. } => counts[2] += 1,
                other => panic!("unexpected move {other:?}"),
            }
            assert!(seq.is_valid(3));
        }
        assert!(counts.iter().all(|&c| c >= 60), "{counts:?}");
    }

    #[test]
    fn unresizable_blocks_keep_swap_weights() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut blocks = macros_only();
        let mut seq = SequencePair::identity(3);
        let t = MoveThresholds::new(&MoveConfig {
            resize: 0.5,
            pos_swap: 0.0,
            neg_swap: 0.5,
            double_swap: 0.0,
        });
        for _ in 0..100 {
            let mv = perturb(&mut blocks, &mut seq, OUTLINE, &t, &mut rng);
            assert!(matches!(mv, Move::NegSwap(..)), "{mv:?}");
        }
    }

    #[test]
    fn double_swap_moves_same_pair() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut blocks = mixed_blocks();
        let mut seq = SequencePair::identity(blocks.len());
        let t = MoveThresholds::new(&MoveConfig {
            resize: 0.0,
            pos_swap: 0.0,
            neg_swap: 0.0,
            double_swap: 1.0,
        });
        for _ in 0..50 {
            let before = seq.clone();
            match perturb(&mut blocks, &mut seq, OUTLINE, &t, &mut rng) {
                Move::DoubleSwap { pos, neg } => {
                    let pair = [before.pos[pos.0], before.pos[pos.1]];
                    assert!(pair.contains(&before.neg[neg.0]));
                    assert!(pair.contains(&before.neg[neg.1]));
                }
                other => panic!("expected double swap, got {other:?}"),
            }
        }
    }
}
