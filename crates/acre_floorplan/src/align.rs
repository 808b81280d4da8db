//! Post-annealing alignment of hard macros.
//!
//! Macros close to the outline are first snapped onto it. Four
//! breadth-first passes (left, right, bottom, top) then spread alignment
//! from the macros on each boundary to nearby macros, walking an adjacency
//! graph of macros whose perpendicular extents are within the threshold.
//! A move that would make two macros overlap is reverted.

use crate::block::Block;
use crate::problem::Outline;
use acre_common::Rect;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Bottom,
    Top,
}

impl Side {
    fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// Horizontal and vertical alignment thresholds.
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    h: f64,
    v: f64,
}

/// Upper bound on alignment rounds.
const MAX_ROUNDS: usize = 16;

/// Aligns the hard macros of a packed layout. Soft blocks are left alone.
///
/// Rounds of snapping and propagation repeat until a round moves nothing,
/// since each round rebuilds its adjacency from the positions left by the
/// previous one. Returns the number of rounds run; fewer than the cap means
/// the layout is a fixed point of alignment.
pub(crate) fn align_macros(blocks: &mut [Block], outline: Outline) -> usize {
    let macros: Vec<usize> = (0..blocks.len()).filter(|&i| blocks[i].is_macro()).collect();
    if macros.is_empty() {
        return 0;
    }

    let th = thresholds(blocks, &macros, outline);
    for round in 1..=MAX_ROUNDS {
        let before: Vec<(f64, f64)> = macros.iter().map(|&i| (blocks[i].x(), blocks[i].y())).collect();
        align_round(blocks, &macros, outline, th);
        let moved = macros
            .iter()
            .zip(&before)
            .any(|(&i, &(x, y))| blocks[i].x() != x || blocks[i].y() != y);
        if !moved {
            return round;
        }
    }
    MAX_ROUNDS
}

/// Outline tenth in each dimension, capped by the smallest macro.
fn thresholds(blocks: &[Block], macros: &[usize], outline: Outline) -> Thresholds {
    Thresholds {
        h: macros
            .iter()
            .map(|&i| blocks[i].width())
            .fold(outline.width / 10.0, f64::min),
        v: macros
            .iter()
            .map(|&i| blocks[i].height())
            .fold(outline.height / 10.0, f64::min),
    }
}

/// One snap followed by the left, right, bottom and top passes.
fn align_round(blocks: &mut [Block], macros: &[usize], outline: Outline, th: Thresholds) {
    snap_to_boundary(blocks, macros, outline, th);

    let rows = adjacency(blocks, macros, |a, b| near(a.ly, a.uy, b.ly, b.uy, th.v));
    propagate(blocks, macros, &rows, Side::Left, outline, th);
    propagate(blocks, macros, &rows, Side::Right, outline, th);

    let columns = adjacency(blocks, macros, |a, b| near(a.lx, a.ux, b.lx, b.ux, th.h));
    propagate(blocks, macros, &columns, Side::Bottom, outline, th);
    propagate(blocks, macros, &columns, Side::Top, outline, th);
}

fn snap_to_boundary(blocks: &mut [Block], macros: &[usize], outline: Outline, th: Thresholds) {
    for &i in macros {
        let r = blocks[i].rect();
        if r.lx < th.h {
            blocks[i].set_x(0.0);
        } else if r.ux < outline.width && outline.width - r.ux < th.h {
            blocks[i].set_x(outline.width - r.width());
        }
        if r.ly < th.v {
            blocks[i].set_y(0.0);
        } else if r.uy < outline.height && outline.height - r.uy < th.v {
            blocks[i].set_y(outline.height - r.height());
        }
    }
}

/// Whether either edge of one span lies within `threshold` of either edge
/// of the other.
fn near(low_a: f64, high_a: f64, low_b: f64, high_b: f64, threshold: f64) -> bool {
    (low_a - low_b).abs() <= threshold
        || (high_a - high_b).abs() <= threshold
        || (low_a - high_b).abs() <= threshold
        || (high_a - low_b).abs() <= threshold
}

/// Builds a graph whose node `k` is `macros[k]`.
fn adjacency(
    blocks: &[Block],
    macros: &[usize],
    related: impl Fn(&Rect, &Rect) -> bool,
) -> UnGraph<usize, ()> {
    let mut graph = UnGraph::new_undirected();
    let nodes: Vec<NodeIndex> = macros.iter().map(|&i| graph.add_node(i)).collect();
    for a in 0..macros.len() {
        let ra = blocks[macros[a]].rect();
        for b in a + 1..macros.len() {
            if related(&ra, &blocks[macros[b]].rect()) {
                graph.add_edge(nodes[a], nodes[b], ());
            }
        }
    }
    graph
}

fn propagate(
    blocks: &mut [Block],
    macros: &[usize],
    graph: &UnGraph<usize, ()>,
    side: Side,
    outline: Outline,
    th: Thresholds,
) {
    let mut visited = vec![false; macros.len()];
    let mut queue = VecDeque::new();

    for (k, &i) in macros.iter().enumerate() {
        let r = blocks[i].rect();
        let (seed, opposite) = match side {
            Side::Left => (r.lx == 0.0, r.ux >= outline.width),
            Side::Right => (r.ux >= outline.width, r.lx == 0.0),
            Side::Bottom => (r.ly == 0.0, r.uy >= outline.height),
            Side::Top => (r.uy >= outline.height, r.ly == 0.0),
        };
        if seed {
            visited[k] = true;
            queue.push_back(k);
        } else if opposite {
            visited[k] = true;
        }
    }

    while let Some(k) = queue.pop_front() {
        let source = blocks[macros[k]].rect();
        let mut next: Vec<usize> = graph
            .neighbors(NodeIndex::new(k))
            .map(|n| n.index())
            .collect();
        next.sort_unstable();

        for m in next {
            if visited[m] {
                continue;
            }
            let index = macros[m];
            let Some(target) = aligned_position(side, &source, &blocks[index].rect(), th) else {
                continue;
            };
            let previous = set_position(&mut blocks[index], side, target);
            if overlaps_other_macro(blocks, macros, index) {
                set_position(&mut blocks[index], side, previous);
            } else {
                queue.push_back(m);
            }
            visited[m] = true;
        }
    }
}

/// Returns the new lower coordinate of `target` when one of its edges is
/// within the threshold of `source`'s matching or opposite edge.
fn aligned_position(side: Side, source: &Rect, target: &Rect, th: Thresholds) -> Option<f64> {
    let within = |value: f64, low: f64, high: f64| value >= low && value <= high;
    match side {
        Side::Left => {
            if within(target.lx, source.lx, source.lx + th.h) {
                Some(source.lx)
            } else if within(target.lx, source.ux, source.ux + th.h) {
                Some(source.ux)
            } else {
                None
            }
        }
        Side::Right => {
            if within(target.ux, source.ux - th.h, source.ux) {
                Some(source.ux - target.width())
            } else if within(target.ux, source.lx - th.h, source.lx) {
                Some(source.lx - target.width())
            } else {
                None
            }
        }
        Side::Bottom => {
            if within(target.ly, source.ly, source.ly + th.v) {
                Some(source.ly)
            } else if within(target.ly, source.uy, source.uy + th.v) {
                Some(source.uy)
            } else {
                None
            }
        }
        Side::Top => {
            if within(target.uy, source.uy - th.v, source.uy) {
                Some(source.uy - target.height())
            } else if within(target.uy, source.ly - th.v, source.ly) {
                Some(source.ly - target.height())
            } else {
                None
            }
        }
    }
}

/// Moves a block along the pass axis, returning its previous coordinate.
fn set_position(block: &mut Block, side: Side, value: f64) -> f64 {
    if side.is_horizontal() {
        let previous = block.x();
        block.set_x(value);
        previous
    } else {
        let previous = block.y();
        block.set_y(value);
        previous
    }
}

fn overlaps_other_macro(blocks: &[Block], macros: &[usize], index: usize) -> bool {
    let rect = blocks[index].rect();
    macros
        .iter()
        .any(|&other| other != index && blocks[other].rect().overlaps(&rect))
}
