//! Board session — one user's board, display vectors, and peer sink.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use digitscope_board::{Brush, Grid, PointerTracker};
use digitscope_core::config::SyncMode;
use digitscope_core::protocol::{CELL_COUNT, CLASS_COUNT, HIDDEN_SIZE, ServerFrame};

use crate::sink::OutboundSink;

/// Which parts of the display changed, so a frontend repaints only what moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiUpdate {
    pub board: bool,
    pub probabilities: bool,
    pub weights: bool,
}

impl UiUpdate {
    pub fn any(&self) -> bool {
        self.board || self.probabilities || self.weights
    }

    fn merge(self, other: UiUpdate) -> UiUpdate {
        UiUpdate {
            board: self.board || other.board,
            probabilities: self.probabilities || other.probabilities,
            weights: self.weights || other.weights,
        }
    }
}

/// A drawing session: grid, drag tracker, latest peer vectors, and the
/// outbound sink. All mutation runs to completion on the caller's thread;
/// frames must be handed over in delivery order.
pub struct BoardSession<S: OutboundSink> {
    grid: Grid,
    brush: Brush,
    tracker: PointerTracker,
    probabilities: Vec<f32>,
    weights: Vec<f32>,
    sink: S,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl<S: OutboundSink> BoardSession<S> {
    pub fn new(sink: S, sync: SyncMode, diagonal_brush: bool) -> Self {
        let now = Utc::now();
        Self {
            grid: Grid::new(),
            brush: Brush {
                diagonals: diagonal_brush,
            },
            tracker: PointerTracker::new(sync),
            probabilities: vec![0.0; CLASS_COUNT],
            weights: vec![0.0; HIDDEN_SIZE],
            sink,
            created_at: now,
            last_updated: now,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn probabilities(&self) -> &[f32] {
        &self.probabilities
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    // --- pointer events ---

    pub fn pointer_pressed(&mut self) {
        self.tracker.press();
    }

    pub async fn pointer_moved(&mut self, row: usize, col: usize) -> UiUpdate {
        let stroke = self.tracker.hover(&mut self.grid, &self.brush, row, col);
        if stroke.push {
            self.push_board().await;
        }
        if stroke.stamped {
            self.last_updated = Utc::now();
        }
        UiUpdate {
            board: stroke.stamped,
            ..Default::default()
        }
    }

    pub async fn pointer_released(&mut self) {
        if self.tracker.release().push {
            self.push_board().await;
        }
    }

    pub async fn pointer_left(&mut self) {
        if self.tracker.leave().push {
            self.push_board().await;
        }
    }

    /// Reset control: clear the board and zero both display vectors.
    /// Local only — the peer is not notified.
    pub fn reset(&mut self) -> UiUpdate {
        self.grid.clear();
        self.probabilities.fill(0.0);
        self.weights.fill(0.0);
        self.last_updated = Utc::now();
        UiUpdate {
            board: true,
            probabilities: true,
            weights: true,
        }
    }

    /// Class-label control: one-shot request for a random example of the
    /// class. Nothing changes locally until the peer's snapshot arrives.
    pub async fn label_pressed(&mut self, label: u8) {
        if label as usize >= CLASS_COUNT {
            warn!(label, "Label out of range, not sending");
            return;
        }
        if let Err(e) = self.sink.request_example(label).await {
            warn!(label, error = %e, "Failed to request example");
        }
    }

    // --- inbound frames ---

    /// Apply an inbound frame. Each snapshot field is applied independently
    /// and only when present with the expected length; anything malformed
    /// is skipped — best-effort rendering, not a strict protocol.
    pub fn handle_frame(&mut self, frame: ServerFrame) -> UiUpdate {
        match frame {
            ServerFrame::UpdateData {
                data,
                probabilities,
                weights,
            } => {
                let mut update = UiUpdate::default();
                update = update.merge(self.apply_board_snapshot(data));
                update = update.merge(self.apply_probabilities(probabilities));
                update = update.merge(self.apply_weights(weights));
                if update.any() {
                    self.last_updated = Utc::now();
                }
                update
            }
            ServerFrame::Error { error } => {
                warn!(error, "Peer rejected request");
                UiUpdate::default()
            }
        }
    }

    fn apply_board_snapshot(&mut self, data: Option<Vec<f32>>) -> UiUpdate {
        let Some(values) = data else {
            return UiUpdate::default();
        };
        if values.len() != CELL_COUNT {
            debug!(len = values.len(), "Skipping board snapshot of wrong length");
            return UiUpdate::default();
        }
        // Full overwrite: the zero-skipping overlay runs on a cleared grid.
        self.grid.clear();
        self.grid.overlay(&values);
        UiUpdate {
            board: true,
            ..Default::default()
        }
    }

    fn apply_probabilities(&mut self, probabilities: Option<Vec<f32>>) -> UiUpdate {
        let Some(values) = probabilities else {
            return UiUpdate::default();
        };
        if values.len() != CLASS_COUNT {
            debug!(len = values.len(), "Skipping distribution of wrong length");
            return UiUpdate::default();
        }
        self.probabilities = values;
        UiUpdate {
            probabilities: true,
            ..Default::default()
        }
    }

    fn apply_weights(&mut self, weights: Option<Vec<f32>>) -> UiUpdate {
        let Some(values) = weights else {
            return UiUpdate::default();
        };
        if values.len() != HIDDEN_SIZE {
            debug!(len = values.len(), "Skipping activations of wrong length");
            return UiUpdate::default();
        }
        self.weights = values;
        UiUpdate {
            weights: true,
            ..Default::default()
        }
    }

    async fn push_board(&self) {
        if let Err(e) = self.sink.push_interaction(self.grid.cells()).await {
            warn!(error = %e, "Failed to push board snapshot");
        }
    }
}
