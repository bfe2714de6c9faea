//! The 28x28 intensity grid and the stamp brush.

use digitscope_core::protocol::{CELL_COUNT, GRID_SIZE, cell_index};
use tracing::debug;

/// Row-major grid of cell intensities in `[0, 1]`.
///
/// Intensities only ever increase through [`Brush::stamp`]; they reset
/// through [`Grid::clear`] or an inbound snapshot overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Vec<f32>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: vec![0.0; CELL_COUNT],
        }
    }

    /// Cell intensity, or `None` out of bounds.
    pub fn intensity(&self, row: usize, col: usize) -> Option<f32> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return None;
        }
        Some(self.cells[cell_index(row, col)])
    }

    /// Whether a cell is already at full intensity.
    pub fn is_saturated(&self, row: usize, col: usize) -> bool {
        self.intensity(row, col).is_some_and(|i| i >= 1.0)
    }

    /// The full row-major snapshot, as sent to the peer.
    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    /// Reset every cell to zero. Idempotent.
    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    /// Raise a cell to at least `intensity`. Out-of-bounds coordinates are
    /// skipped silently; intensity never decreases here.
    fn raise(&mut self, row: usize, col: usize, intensity: f32) {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return;
        }
        let cell = &mut self.cells[cell_index(row, col)];
        *cell = cell.max(intensity);
    }

    /// Direct per-cell assignment from an inbound snapshot, bypassing
    /// max-accumulation. Only nonzero incoming values are written; zero
    /// entries leave the current cell untouched. Callers wanting a full
    /// overwrite clear the grid first.
    pub fn overlay(&mut self, values: &[f32]) {
        if values.len() != CELL_COUNT {
            debug!(len = values.len(), "Ignoring snapshot of unexpected length");
            return;
        }
        for (cell, &value) in self.cells.iter_mut().zip(values) {
            if value != 0.0 {
                *cell = value;
            }
        }
    }
}

/// The stamp brush: full intensity on the target, half on the orthogonal
/// neighbors, and optionally a fifth on the diagonals.
#[derive(Debug, Clone, Copy, Default)]
pub struct Brush {
    pub diagonals: bool,
}

impl Brush {
    const CENTER: f32 = 1.0;
    const EDGE: f32 = 0.5;
    const CORNER: f32 = 0.2;

    const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (1, 1), (1, -1), (-1, 1)];

    /// Stamp a pointer-draw event onto the grid. Out-of-bounds targets are
    /// no-ops; out-of-bounds neighbors are skipped.
    pub fn stamp(&self, grid: &mut Grid, row: usize, col: usize) {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return;
        }

        grid.raise(row, col, Self::CENTER);

        for (dr, dc) in Self::ORTHOGONAL {
            let (r, c) = (row as isize + dr, col as isize + dc);
            if r >= 0 && c >= 0 {
                grid.raise(r as usize, c as usize, Self::EDGE);
            }
        }

        if self.diagonals {
            for (dr, dc) in Self::DIAGONAL {
                let (r, c) = (row as isize + dr, col as isize + dc);
                if r >= 0 && c >= 0 {
                    grid.raise(r as usize, c as usize, Self::CORNER);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_center_and_orthogonals() {
        let mut grid = Grid::new();
        Brush::default().stamp(&mut grid, 5, 5);

        assert_eq!(grid.intensity(5, 5), Some(1.0));
        assert_eq!(grid.intensity(4, 5), Some(0.5));
        assert_eq!(grid.intensity(6, 5), Some(0.5));
        assert_eq!(grid.intensity(5, 4), Some(0.5));
        assert_eq!(grid.intensity(5, 6), Some(0.5));
        // diagonals untouched with the default brush
        assert_eq!(grid.intensity(4, 4), Some(0.0));
    }

    #[test]
    fn test_stamp_diagonal_brush() {
        let mut grid = Grid::new();
        let brush = Brush { diagonals: true };
        brush.stamp(&mut grid, 5, 5);

        assert_eq!(grid.intensity(4, 4), Some(0.2));
        assert_eq!(grid.intensity(6, 6), Some(0.2));
        assert_eq!(grid.intensity(4, 6), Some(0.2));
        assert_eq!(grid.intensity(6, 4), Some(0.2));
    }

    #[test]
    fn test_stamp_never_decreases_intensity() {
        let mut grid = Grid::new();
        let brush = Brush::default();
        brush.stamp(&mut grid, 5, 5);
        // (5, 6) is now 0.5; stamping (5, 7) would offer it 0.5 again,
        // stamping (5, 6) raises it to 1.0 and offers (5, 5) only 0.5.
        brush.stamp(&mut grid, 5, 6);

        assert_eq!(grid.intensity(5, 5), Some(1.0));
        assert_eq!(grid.intensity(5, 6), Some(1.0));
    }

    #[test]
    fn test_stamp_corner_skips_outside_neighbors() {
        let mut grid = Grid::new();
        Brush { diagonals: true }.stamp(&mut grid, 0, 0);

        assert_eq!(grid.intensity(0, 0), Some(1.0));
        assert_eq!(grid.intensity(0, 1), Some(0.5));
        assert_eq!(grid.intensity(1, 0), Some(0.5));
        assert_eq!(grid.intensity(1, 1), Some(0.2));
        // nothing else painted
        let painted = grid.cells().iter().filter(|&&c| c > 0.0).count();
        assert_eq!(painted, 4);
    }

    #[test]
    fn test_stamp_out_of_bounds_is_noop() {
        let mut grid = Grid::new();
        Brush::default().stamp(&mut grid, 28, 3);
        Brush::default().stamp(&mut grid, 3, 99);
        assert!(grid.cells().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut grid = Grid::new();
        Brush::default().stamp(&mut grid, 10, 10);
        grid.clear();
        assert!(grid.cells().iter().all(|&c| c == 0.0));
        // idempotent
        grid.clear();
        assert!(grid.cells().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_overlay_sets_nonzero_cells_directly() {
        let mut grid = Grid::new();
        Brush::default().stamp(&mut grid, 5, 5);

        let mut snapshot = vec![0.0; digitscope_core::protocol::CELL_COUNT];
        snapshot[0] = 0.3; // below the stamped values — direct set, not max
        grid.overlay(&snapshot);

        assert_eq!(grid.intensity(0, 0), Some(0.3));
    }

    #[test]
    fn test_overlay_all_zero_retains_prior_state() {
        // Zero entries never overwrite: an all-zero snapshot leaves a
        // painted grid exactly as it was.
        let mut grid = Grid::new();
        Brush::default().stamp(&mut grid, 5, 5);
        let before = grid.clone();

        grid.overlay(&vec![0.0; digitscope_core::protocol::CELL_COUNT]);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_overlay_wrong_length_ignored() {
        let mut grid = Grid::new();
        grid.overlay(&[1.0, 1.0, 1.0]);
        assert!(grid.cells().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_saturation() {
        let mut grid = Grid::new();
        assert!(!grid.is_saturated(5, 5));
        Brush::default().stamp(&mut grid, 5, 5);
        assert!(grid.is_saturated(5, 5));
        assert!(!grid.is_saturated(5, 6));
        assert!(!grid.is_saturated(99, 99));
    }
}
