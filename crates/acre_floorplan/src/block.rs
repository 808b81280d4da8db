//! The shape model of a single placeable block.
//!
//! A soft block has a fixed area and a continuously adjustable aspect ratio
//! (height / width) inside one or more allowed ranges. A hard macro can only
//! take one of a short list of `(width, height)` options. Every shape change
//! on a soft block preserves `width * height == area`.

use acre_common::Rect;
use rand::Rng;

/// Shape constraints of a block.
#[derive(Debug, Clone)]
pub enum BlockShape {
    /// A soft cluster with continuous aspect-ratio ranges.
    Soft {
        /// Allowed `(min, max)` aspect-ratio ranges, sorted by lower bound.
        ratios: Vec<(f64, f64)>,
        /// `(high, low)` width bounds per range, non-increasing.
        width_limits: Vec<(f64, f64)>,
        /// `(low, high)` height bounds per range, non-decreasing.
        height_limits: Vec<(f64, f64)>,
    },
    /// A hard macro with discrete `(width, height)` options.
    Hard {
        /// Allowed shapes in preference order.
        options: Vec<(f64, f64)>,
        /// Index of the active option.
        current: usize,
    },
}

/// The part of a block's state that a resize can change.
///
/// Captured before a resize so the move can be undone exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeState {
    /// Block width.
    pub width: f64,
    /// Block height.
    pub height: f64,
    /// Active hard-macro option; always zero for soft blocks.
    pub option: usize,
}

/// One placeable block with its current geometry.
#[derive(Debug, Clone)]
pub struct Block {
    name: String,
    area: f64,
    num_macro: u32,
    shape: BlockShape,
    width: f64,
    height: f64,
    x: f64,
    y: f64,
}

/// Which edge a soft block is stretched towards by a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stretch {
    Right,
    Left,
    Top,
    Bottom,
}

impl Block {
    /// Creates a soft block from its area and allowed aspect-ratio ranges.
    ///
    /// The ranges are sorted by lower bound. The initial shape uses the lower
    /// bound of the first range. Callers must supply at least one range with
    /// `0 < min <= max`.
    pub fn soft(name: impl Into<String>, area: f64, mut ratios: Vec<(f64, f64)>) -> Self {
        ratios.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        let (width_limits, height_limits) = soft_limits(area, &ratios);
        let initial_ratio = ratios.first().map_or(1.0, |r| r.0);
        let mut block = Self {
            name: name.into(),
            area,
            num_macro: 0,
            shape: BlockShape::Soft {
                ratios,
                width_limits,
                height_limits,
            },
            width: 0.0,
            height: 0.0,
            x: 0.0,
            y: 0.0,
        };
        block.set_aspect_ratio(initial_ratio);
        block
    }

    /// Creates a hard macro from its macro count and shape options.
    ///
    /// The block starts in its first option. Callers must supply at least one
    /// option and a positive `num_macro`.
    pub fn hard(
        name: impl Into<String>,
        area: f64,
        num_macro: u32,
        options: Vec<(f64, f64)>,
    ) -> Self {
        let (width, height) = options.first().copied().unwrap_or((0.0, 0.0));
        Self {
            name: name.into(),
            area,
            num_macro,
            shape: BlockShape::Hard {
                options,
                current: 0,
            },
            width,
            height,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Returns the block name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the block area.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Returns the number of hard macros; zero for a soft block.
    pub fn num_macro(&self) -> u32 {
        self.num_macro
    }

    /// Returns `true` for a soft block.
    pub fn is_soft(&self) -> bool {
        matches!(self.shape, BlockShape::Soft { .. })
    }

    /// Returns `true` for a hard macro.
    pub fn is_macro(&self) -> bool {
        !self.is_soft()
    }

    /// Returns the shape constraints.
    pub fn shape(&self) -> &BlockShape {
        &self.shape
    }

    /// Returns `true` if a resize move can change this block.
    pub fn is_resizable(&self) -> bool {
        match &self.shape {
            BlockShape::Soft { .. } => true,
            BlockShape::Hard { options, .. } => options.len() > 1,
        }
    }

    /// Current width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Current height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Lower-left x coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Lower-left y coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Returns the placed footprint.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.x, self.y, self.width, self.height)
    }

    /// Returns the center of the placed footprint.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub(crate) fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    pub(crate) fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    /// Captures the shape state touched by a resize.
    pub(crate) fn shape_state(&self) -> ShapeState {
        let option = match &self.shape {
            BlockShape::Hard { current, .. } => *current,
            BlockShape::Soft { .. } => 0,
        };
        ShapeState {
            width: self.width,
            height: self.height,
            option,
        }
    }

    /// Restores a previously captured shape state.
    pub(crate) fn restore_shape(&mut self, state: ShapeState) {
        self.width = state.width;
        self.height = state.height;
        if let BlockShape::Hard { current, .. } = &mut self.shape {
            *current = state.option;
        }
    }

    /// Sets a soft block to the given aspect ratio, keeping its area.
    fn set_aspect_ratio(&mut self, ratio: f64) {
        self.height = (self.area * ratio).sqrt();
        self.width = self.area / self.height;
    }

    /// Picks a random shape: a random ratio inside a random range for a soft
    /// block, any option for a hard macro.
    pub(crate) fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.is_soft() {
            self.choose_random_aspect_ratio(rng);
            return;
        }
        if let BlockShape::Hard { options, current } = &mut self.shape {
            if options.is_empty() {
                return;
            }
            let index = rng.gen_range(0..options.len());
            *current = index;
            (self.width, self.height) = options[index];
        }
    }

    /// Draws a ratio uniformly from a uniformly chosen range.
    pub(crate) fn choose_random_aspect_ratio<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let BlockShape::Soft { ratios, .. } = &self.shape else {
            return;
        };
        if ratios.is_empty() {
            return;
        }
        let (low, high) = ratios[rng.gen_range(0..ratios.len())];
        let ratio = if low == high {
            low
        } else {
            low + (high - low) * rng.gen::<f64>()
        };
        self.set_aspect_ratio(ratio);
    }

    /// Switches a hard macro to a different, randomly chosen option.
    ///
    /// Does nothing for soft blocks and single-option macros.
    pub(crate) fn switch_macro_option<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let BlockShape::Hard { options, current } = &mut self.shape else {
            return;
        };
        if options.len() < 2 {
            return;
        }
        // Draw from the other options by skipping over the current one.
        let mut index = rng.gen_range(0..options.len() - 1);
        if index >= *current {
            index += 1;
        }
        *current = index;
        (self.width, self.height) = options[index];
    }

    /// Sets the width of a soft block as close to `width` as its ranges
    /// allow, then derives the height from the area.
    ///
    /// Widths beyond the outermost bounds are clamped. A width falling in the
    /// gap between two ranges snaps to the nearer range boundary.
    pub(crate) fn change_width(&mut self, width: f64) {
        let BlockShape::Soft { width_limits, .. } = &self.shape else {
            return;
        };
        let (Some(first), Some(last)) = (width_limits.first(), width_limits.last()) else {
            return;
        };
        let widest = first.0;
        let narrowest = last.1;
        let new_width = if width >= widest {
            widest
        } else if width <= narrowest {
            narrowest
        } else {
            // Limits are (high, low) pairs sorted from wide to narrow.
            let index = width_limits
                .iter()
                .position(|&(_, low)| low <= width)
                .unwrap_or(width_limits.len() - 1);
            let (high, _) = width_limits[index];
            if width <= high || index == 0 {
                width.min(high)
            } else {
                let gap_low = high;
                let gap_high = width_limits[index - 1].1;
                if width - gap_low > gap_high - width {
                    gap_high
                } else {
                    gap_low
                }
            }
        };
        self.width = new_width;
        self.height = self.area / new_width;
    }

    /// Sets the height of a soft block as close to `height` as its ranges
    /// allow, then derives the width from the area.
    pub(crate) fn change_height(&mut self, height: f64) {
        let BlockShape::Soft { height_limits, .. } = &self.shape else {
            return;
        };
        let (Some(first), Some(last)) = (height_limits.first(), height_limits.last()) else {
            return;
        };
        let lowest = first.0;
        let highest = last.1;
        let new_height = if height <= lowest {
            lowest
        } else if height >= highest {
            highest
        } else {
            // Limits are (low, high) pairs sorted from short to tall.
            let index = height_limits
                .iter()
                .position(|&(_, high)| high >= height)
                .unwrap_or(height_limits.len() - 1);
            let (low, _) = height_limits[index];
            if height >= low || index == 0 {
                height.max(low)
            } else {
                let gap_high = low;
                let gap_low = height_limits[index - 1].1;
                if height - gap_low > gap_high - height {
                    gap_high
                } else {
                    gap_low
                }
            }
        };
        self.height = new_height;
        self.width = self.area / new_height;
    }

    /// Scales both dimensions of a soft block by `factor` and takes the
    /// shrunk footprint as the new area.
    pub(crate) fn shrink(&mut self, factor: f64) {
        let BlockShape::Soft {
            ratios,
            width_limits,
            height_limits,
        } = &mut self.shape
        else {
            return;
        };
        self.width *= factor;
        self.height *= factor;
        self.area = self.width * self.height;
        let (widths, heights) = soft_limits(self.area, ratios);
        *width_limits = widths;
        *height_limits = heights;
    }

    /// Returns the size that stretches block `index` to the nearest block or
    /// outline edge in `direction`.
    ///
    /// Returns `None` when there is nothing to stretch to.
    pub(crate) fn stretch_target(
        blocks: &[Block],
        index: usize,
        direction: Stretch,
        outline_width: f64,
        outline_height: f64,
    ) -> Option<f64> {
        let block = &blocks[index];
        match direction {
            Stretch::Right => {
                let b_x1 = block.x;
                let b_x2 = block.x + block.width;
                if b_x1 >= outline_width {
                    return None;
                }
                let edge = blocks
                    .iter()
                    .map(|b| b.x + b.width)
                    .filter(|&x2| x2 > b_x2 && x2 < outline_width)
                    .fold(outline_width, f64::min);
                Some(edge - b_x1)
            }
            Stretch::Left => {
                let b_x1 = block.x;
                let b_x2 = block.x + block.width;
                let edge = blocks
                    .iter()
                    .map(|b| b.x + b.width)
                    .filter(|&x2| x2 < b_x2 && x2 > b_x1)
                    .fold(b_x1, f64::max);
                (edge > b_x1).then(|| edge - b_x1)
            }
            Stretch::Top => {
                let b_y1 = block.y;
                let b_y2 = block.y + block.height;
                if b_y1 >= outline_height {
                    return None;
                }
                let edge = blocks
                    .iter()
                    .map(|b| b.y + b.height)
                    .filter(|&y2| y2 > b_y2 && y2 < outline_height)
                    .fold(outline_height, f64::min);
                Some(edge - b_y1)
            }
            Stretch::Bottom => {
                let b_y1 = block.y;
                let b_y2 = block.y + block.height;
                let edge = blocks
                    .iter()
                    .map(|b| b.y + b.height)
                    .filter(|&y2| y2 < b_y2 && y2 > b_y1)
                    .fold(b_y1, f64::max);
                (edge > b_y1).then(|| edge - b_y1)
            }
        }
    }
}

/// Derives per-range width and height bounds of a soft block.
fn soft_limits(area: f64, ratios: &[(f64, f64)]) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    ratios
        .iter()
        .map(|&(low, high)| {
            let height_low = (area * low).sqrt();
            let width_high = area / height_low;
            let height_high = (area * high).sqrt();
            let width_low = area / height_high;
            ((width_high, width_low), (height_low, height_high))
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn soft_block_starts_at_lowest_ratio() {
        let block = Block::soft("s", 100.0, vec![(1.0, 4.0)]);
        assert!(close(block.width(), 10.0));
        assert!(close(block.height(), 10.0));
        assert!(block.is_soft());
        assert!(block.is_resizable());
    }

    #[test]
    fn ratio_ranges_are_sorted() {
        let block = Block::soft("s", 100.0, vec![(2.0, 3.0), (0.5, 1.0)]);
        match block.shape() {
            BlockShape::Soft {
                ratios,
                width_limits,
                height_limits,
            } => {
                assert_eq!(ratios[0], (0.5, 1.0));
                assert!(width_limits[0].0 >= width_limits[1].0);
                assert!(height_limits[0].0 <= height_limits[1].0);
            }
            BlockShape::Hard { .. } => panic!("expected soft block"),
        }
    }

    #[test]
    fn change_width_clamps_to_range() {
        // Ratio 0.25..4 on area 100 allows widths 5..20.
        let mut block = Block::soft("s", 100.0, vec![(0.25, 4.0)]);
        block.change_width(50.0);
        assert!(close(block.width(), 20.0));
        assert!(close(block.height(), 5.0));
        block.change_width(1.0);
        assert!(close(block.width(), 5.0));
        block.change_width(8.0);
        assert!(close(block.width(), 8.0));
        assert!(close(block.width() * block.height(), 100.0));
    }

    #[test]
    fn change_width_snaps_out_of_gap() {
        // Ranges give widths [~7.07, 10] and [~3.54, 5]; 6 lies in the gap and
        // is nearer to 5.
        let mut block = Block::soft("s", 100.0, vec![(1.0, 2.0), (4.0, 8.0)]);
        block.change_width(6.0);
        assert!(close(block.width(), 5.0));
        block.change_width(6.9);
        assert!(close(block.width(), 100.0 / (100.0f64 * 2.0).sqrt()));
    }

    #[test]
    fn change_height_snaps_out_of_gap() {
        // Heights [10, ~14.14] and [20, ~28.28]; 19 is nearer to 20.
        let mut block = Block::soft("s", 100.0, vec![(1.0, 2.0), (4.0, 8.0)]);
        block.change_height(19.0);
        assert!(close(block.height(), 20.0));
        block.change_height(15.0);
        assert!(close(block.height(), (200.0f64).sqrt()));
        block.change_height(1.0);
        assert!(close(block.height(), 10.0));
    }

    #[test]
    fn hard_macro_ignores_soft_resizes() {
        let mut block = Block::hard("m", 200.0, 1, vec![(20.0, 10.0)]);
        block.change_width(5.0);
        block.change_height(50.0);
        block.shrink(0.5);
        assert_eq!((block.width(), block.height()), (20.0, 10.0));
        assert!(!block.is_resizable());
    }

    #[test]
    fn switch_option_picks_another_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut block = Block::hard("m", 200.0, 1, vec![(20.0, 10.0), (10.0, 20.0)]);
        for _ in 0..10 {
            let before = block.shape_state();
            block.switch_macro_option(&mut rng);
            assert_ne!(before.option, block.shape_state().option);
        }
    }

    #[test]
    fn random_shapes_keep_area() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut block = Block::soft("s", 37.5, vec![(0.3, 0.9), (1.5, 3.0)]);
        for _ in 0..200 {
            block.randomize(&mut rng);
            let ratio = block.height() / block.width();
            assert!(close(block.width() * block.height(), 37.5));
            assert!(
                (0.3 - 1e-9..=0.9 + 1e-9).contains(&ratio)
                    || (1.5 - 1e-9..=3.0 + 1e-9).contains(&ratio)
            );
        }
    }

    #[test]
    fn shrink_scales_area() {
        let mut block = Block::soft("s", 100.0, vec![(1.0, 1.0)]);
        block.shrink(0.5);
        assert!(close(block.area(), 25.0));
        assert!(close(block.width(), 5.0));
        block.change_width(100.0);
        assert!(close(block.width(), 5.0));
    }

    #[test]
    fn restore_shape_undoes_resize() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut block = Block::hard("m", 1.0, 2, vec![(1.0, 2.0), (2.0, 1.0), (4.0, 0.5)]);
        let saved = block.shape_state();
        block.switch_macro_option(&mut rng);
        block.restore_shape(saved);
        assert_eq!(block.shape_state(), saved);
    }

    #[test]
    fn stretch_right_reaches_outline_or_neighbor() {
        // Both start at ratio 1.0, so each is a 10 x 10 square.
        let mut a = Block::soft("a", 100.0, vec![(1.0, 4.0)]);
        let mut b = Block::soft("b", 100.0, vec![(1.0, 4.0)]);
        a.set_x(0.0);
        b.set_x(10.0);
        let blocks = vec![a, b];
        assert_eq!((blocks[0].width(), blocks[0].height()), (10.0, 10.0));
        // b ends at 20, which is the nearest right edge beyond a.
        assert_eq!(
            Block::stretch_target(&blocks, 0, Stretch::Right, 100.0, 100.0),
            Some(20.0)
        );
        assert_eq!(
            Block::stretch_target(&blocks, 1, Stretch::Right, 100.0, 100.0),
            Some(90.0)
        );
        assert_eq!(
            Block::stretch_target(&blocks, 0, Stretch::Left, 100.0, 100.0),
            None
        );
    }
}
