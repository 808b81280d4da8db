//! Notch (dead-space) detection between hard macros.
//!
//! The outline is cut into a non-uniform grid along every macro edge. A cell
//! no macro covers is a notch when enough of its neighbors are covered and
//! the cell is thin in at least one direction.

use crate::block::Block;
use crate::packing::PackedSize;
use crate::problem::Outline;

/// Returns the notch penalty of a layout.
///
/// When the layout exceeds the outline the grid is meaningless and the
/// penalty is `sqrt(covering area / outline area)` instead.
pub fn notch_penalty(
    outline: Outline,
    size: PackedSize,
    blocks: &[Block],
    thresholds: (f64, f64),
) -> f64 {
    if size.width > outline.width || size.height > outline.height {
        let covering = size.width.max(outline.width) * size.height.max(outline.height);
        return (covering / outline.area()).sqrt();
    }

    let macros: Vec<_> = blocks.iter().filter(|b| b.is_macro()).map(Block::rect).collect();
    let x_grid = grid_lines(macros.iter().flat_map(|r| [r.lx, r.ux]), outline.width);
    let y_grid = grid_lines(macros.iter().flat_map(|r| [r.ly, r.uy]), outline.height);
    let num_x = x_grid.len() - 1;
    let num_y = y_grid.len() - 1;
    if num_x == 0 || num_y == 0 {
        return 0.0;
    }

    let mut covered = vec![vec![false; num_y]; num_x];
    for rect in &macros {
        let (x_start, x_end) = cell_span(&x_grid, rect.lx, rect.ux);
        let (y_start, y_end) = cell_span(&y_grid, rect.ly, rect.uy);
        for column in &mut covered[x_start..=x_end] {
            for cell in &mut column[y_start..=y_end] {
                *cell = true;
            }
        }
    }

    let (threshold_h, threshold_v) = thresholds;
    let mut penalty = 0.0;
    for i in 0..num_x {
        for j in 0..num_y {
            if covered[i][j] {
                continue;
            }
            let mut neighbors = 0;
            let mut covered_neighbors = 0;
            let candidates = [
                (i.checked_sub(1), Some(j)),
                ((i + 1 < num_x).then_some(i + 1), Some(j)),
                (Some(i), j.checked_sub(1)),
                (Some(i), (j + 1 < num_y).then_some(j + 1)),
            ];
            for (ni, nj) in candidates {
                if let (Some(ni), Some(nj)) = (ni, nj) {
                    neighbors += 1;
                    if covered[ni][nj] {
                        covered_neighbors += 1;
                    }
                }
            }
            // Interior cells need two covered neighbors, edge cells one.
            let needed = if neighbors == 4 { 2 } else { 1 };
            if covered_neighbors < needed {
                continue;
            }
            let width = x_grid[i + 1] - x_grid[i];
            let height = y_grid[j + 1] - y_grid[j];
            if width <= threshold_h || height <= threshold_v {
                penalty += (width * height / outline.area()).sqrt();
            }
        }
    }
    penalty
}

/// Sorted, deduplicated cut lines including `0` and `extent`.
fn grid_lines(edges: impl Iterator<Item = f64>, extent: f64) -> Vec<f64> {
    let mut lines: Vec<f64> = edges.chain([0.0, extent]).collect();
    lines.sort_by(f64::total_cmp);
    lines.dedup();
    lines
}

/// Returns the first and last grid cell covered by the span `[low, high]`.
fn cell_span(grid: &[f64], low: f64, high: f64) -> (usize, usize) {
    let cells = grid.len() - 1;
    let start = (0..cells)
        .find(|&k| grid[k] <= low && low < grid[k + 1])
        .unwrap_or(0);
    let end = (0..cells)
        .rev()
        .find(|&k| grid[k] < high && high <= grid[k + 1])
        .unwrap_or(cells - 1);
    (start, end.max(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::{pack, SequencePair};

    const OUTLINE: Outline = Outline {
        width: 100.0,
        height: 100.0,
    };

    fn mac(name: &str, w: f64, h: f64) -> Block {
        Block::hard(name, w * h, 1, vec![(w, h)])
    }

    #[test]
    fn overflow_short_circuits() {
        let size = PackedSize {
            width: 200.0,
            height: 50.0,
        };
        let penalty = notch_penalty(OUTLINE, size, &[], (10.0, 10.0));
        assert!((penalty - 2.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn no_macros_no_notches() {
        let size = PackedSize {
            width: 50.0,
            height: 50.0,
        };
        let blocks = vec![Block::soft("s", 2500.0, vec![(1.0, 1.0)])];
        assert_eq!(notch_penalty(OUTLINE, size, &blocks, (10.0, 10.0)), 0.0);
    }

    #[test]
    fn thin_gap_between_macros_is_a_notch() {
        // Two 45-wide full-height macros leave a 10-wide slot at x = 45..55.
        let mut blocks = vec![mac("a", 45.0, 100.0), mac("b", 45.0, 100.0)];
        pack(&mut blocks, &SequencePair::identity(2));
        blocks[1].set_x(55.0);
        let size = PackedSize {
            width: 100.0,
            height: 100.0,
        };
        let penalty = notch_penalty(OUTLINE, size, &blocks, (10.0, 10.0));
        // The slot is a single column cell, 10 x 100, with both sides covered.
        assert!((penalty - (1000.0f64 / 10_000.0).sqrt()).abs() < 1e-12);

        // Neither side of the slot is below a 5-unit threshold.
        assert_eq!(notch_penalty(OUTLINE, size, &blocks, (5.0, 5.0)), 0.0);
    }

    #[test]
    fn open_space_is_not_a_notch() {
        // One macro in a corner; the remaining space is wide in both directions.
        let mut blocks = vec![mac("a", 30.0, 30.0)];
        pack(&mut blocks, &SequencePair::identity(1));
        let size = PackedSize {
            width: 30.0,
            height: 30.0,
        };
        assert_eq!(notch_penalty(OUTLINE, size, &blocks, (10.0, 10.0)), 0.0);
    }

    #[test]
    fn cell_span_covers_touching_edges() {
        let grid = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(cell_span(&grid, 10.0, 20.0), (1, 1));
        assert_eq!(cell_span(&grid, 0.0, 30.0), (0, 2));
    }
}
