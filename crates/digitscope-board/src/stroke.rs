//! Pointer drag tracking for a stroke gesture.

use digitscope_core::config::SyncMode;

use crate::grid::{Brush, Grid};

/// What a pointer event did to the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrokeUpdate {
    /// A cell was stamped — the board needs a repaint.
    pub stamped: bool,
    /// The full board should be pushed to the peer now.
    pub push: bool,
}

/// Drag-gesture state: the drawing flag, the hover dedup memo, and the
/// pending-push flag for the batched sync variant.
///
/// Cells are only stamped while the pointer is held down, one stamp per
/// distinct hovered cell; a cell already at full intensity is not
/// re-stamped. Releasing the pointer or leaving the board ends the
/// gesture — the only cancellation semantic there is.
#[derive(Debug)]
pub struct PointerTracker {
    sync: SyncMode,
    drawing: bool,
    last_cell: Option<(usize, usize)>,
    pending: bool,
}

impl PointerTracker {
    pub fn new(sync: SyncMode) -> Self {
        Self {
            sync,
            drawing: false,
            last_cell: None,
            pending: false,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Pointer pressed over the board. Stamping starts with the first
    /// hover that follows.
    pub fn press(&mut self) {
        self.drawing = true;
    }

    /// Pointer moved over a cell. Stamps while drawing, deduplicating
    /// consecutive events on the same cell.
    pub fn hover(
        &mut self,
        grid: &mut Grid,
        brush: &Brush,
        row: usize,
        col: usize,
    ) -> StrokeUpdate {
        if !self.drawing {
            return StrokeUpdate::default();
        }
        if self.last_cell == Some((row, col)) {
            return StrokeUpdate::default();
        }
        self.last_cell = Some((row, col));

        if grid.intensity(row, col).is_none() || grid.is_saturated(row, col) {
            return StrokeUpdate::default();
        }

        brush.stamp(grid, row, col);
        match self.sync {
            SyncMode::PerStroke => StrokeUpdate {
                stamped: true,
                push: true,
            },
            SyncMode::OnRelease => {
                self.pending = true;
                StrokeUpdate {
                    stamped: true,
                    push: false,
                }
            }
        }
    }

    /// Pointer released: the gesture ends, and any batched stamps are
    /// flushed to the peer.
    pub fn release(&mut self) -> StrokeUpdate {
        self.drawing = false;
        self.flush()
    }

    /// Pointer left the board: same end-of-gesture semantics as a release.
    pub fn leave(&mut self) -> StrokeUpdate {
        self.drawing = false;
        self.flush()
    }

    fn flush(&mut self) -> StrokeUpdate {
        if self.pending {
            self.pending = false;
            StrokeUpdate {
                stamped: false,
                push: true,
            }
        } else {
            StrokeUpdate::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(tracker: &mut PointerTracker, grid: &mut Grid, path: &[(usize, usize)]) -> usize {
        let brush = Brush::default();
        tracker.press();
        let mut pushes = 0;
        for &(row, col) in path {
            if tracker.hover(grid, &brush, row, col).push {
                pushes += 1;
            }
        }
        if tracker.release().push {
            pushes += 1;
        }
        pushes
    }

    #[test]
    fn test_no_stamp_without_press() {
        let mut grid = Grid::new();
        let mut tracker = PointerTracker::new(SyncMode::PerStroke);
        let update = tracker.hover(&mut grid, &Brush::default(), 5, 5);
        assert_eq!(update, StrokeUpdate::default());
        assert_eq!(grid.intensity(5, 5), Some(0.0));
    }

    #[test]
    fn test_per_stroke_pushes_each_stamp() {
        let mut grid = Grid::new();
        let mut tracker = PointerTracker::new(SyncMode::PerStroke);
        let pushes = drag(&mut tracker, &mut grid, &[(5, 5), (5, 6)]);

        assert_eq!(pushes, 2);
        assert_eq!(grid.intensity(5, 5), Some(1.0));
        assert_eq!(grid.intensity(5, 6), Some(1.0));
    }

    #[test]
    fn test_on_release_batches_to_one_push() {
        let mut grid = Grid::new();
        let mut tracker = PointerTracker::new(SyncMode::OnRelease);
        let pushes = drag(&mut tracker, &mut grid, &[(5, 5), (5, 6), (5, 7)]);
        assert_eq!(pushes, 1);
    }

    #[test]
    fn test_release_without_stamps_pushes_nothing() {
        let mut grid = Grid::new();
        let mut tracker = PointerTracker::new(SyncMode::OnRelease);
        tracker.press();
        assert_eq!(tracker.release(), StrokeUpdate::default());
    }

    #[test]
    fn test_hover_dedups_same_cell() {
        let mut grid = Grid::new();
        let mut tracker = PointerTracker::new(SyncMode::PerStroke);
        let brush = Brush::default();
        tracker.press();

        assert!(tracker.hover(&mut grid, &brush, 5, 5).stamped);
        assert!(!tracker.hover(&mut grid, &brush, 5, 5).stamped);
        assert!(tracker.hover(&mut grid, &brush, 5, 6).stamped);
    }

    #[test]
    fn test_saturated_cell_not_restamped() {
        let mut grid = Grid::new();
        let mut tracker = PointerTracker::new(SyncMode::PerStroke);
        let brush = Brush::default();

        tracker.press();
        assert!(tracker.hover(&mut grid, &brush, 5, 5).stamped);
        // move away and back: dedup no longer applies, saturation does
        assert!(tracker.hover(&mut grid, &brush, 10, 10).stamped);
        assert!(!tracker.hover(&mut grid, &brush, 5, 5).stamped);
    }

    #[test]
    fn test_leave_ends_gesture_and_flushes() {
        let mut grid = Grid::new();
        let mut tracker = PointerTracker::new(SyncMode::OnRelease);
        let brush = Brush::default();

        tracker.press();
        tracker.hover(&mut grid, &brush, 5, 5);
        let update = tracker.leave();
        assert!(update.push);
        assert!(!tracker.is_drawing());

        // drawing stopped: further hovers are ignored
        assert_eq!(
            tracker.hover(&mut grid, &brush, 6, 6),
            StrokeUpdate::default()
        );
    }

    #[test]
    fn test_out_of_bounds_hover_ignored() {
        let mut grid = Grid::new();
        let mut tracker = PointerTracker::new(SyncMode::PerStroke);
        tracker.press();
        let update = tracker.hover(&mut grid, &Brush::default(), 99, 0);
        assert_eq!(update, StrokeUpdate::default());
    }
}
