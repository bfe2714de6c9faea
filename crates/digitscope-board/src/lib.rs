//! Canvas model — the drawable intensity grid and its render projection.
//!
//! Everything here is plain owned state and pure functions: no transport,
//! no DOM. The bridge crate wires these into a live peer connection.

pub mod grid;
pub mod render;
pub mod stroke;

pub use grid::{Brush, Grid};
pub use stroke::{PointerTracker, StrokeUpdate};
