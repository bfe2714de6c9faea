//! Digitscope wire protocol.
//!
//! All peer communication uses JSON-over-WebSocket with frames tagged by
//! an `event` name. Payload shapes follow the inference peer's contract
//! exactly; every inbound field is optional and validated by length only
//! at the point of use.

use serde::{Deserialize, Serialize};

/// Board edge length in cells.
pub const GRID_SIZE: usize = 28;

/// Total cell count (row-major 28x28).
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Number of digit classes in the output distribution.
pub const CLASS_COUNT: usize = 10;

/// Width of the peer's hidden-layer activation snapshot.
pub const HIDDEN_SIZE: usize = 128;

/// Row-major cell index for a board coordinate.
pub fn cell_index(row: usize, col: usize) -> usize {
    row * GRID_SIZE + col
}

/// Client -> peer frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Full board snapshot after a stroke update.
    UserInteraction { input: Vec<f32> },

    /// One-shot request for a random example image of a class.
    GetRandImage { label: u8 },
}

/// Peer -> client frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerFrame {
    /// State snapshot. All fields optional; each is applied independently.
    UpdateData {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Vec<f32>>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        probabilities: Option<Vec<f32>>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        weights: Option<Vec<f32>>,
    },

    /// Peer-side rejection (e.g. an out-of-range label). Informational only.
    Error { error: String },
}
