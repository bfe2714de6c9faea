//! Sync bridge — translates local stroke state into outbound pushes and
//! inbound peer frames into board/display state.
//!
//! The bridge owns no transport. Outbound traffic goes through the
//! [`OutboundSink`] trait; inbound frames arrive as already-parsed
//! [`digitscope_core::protocol::ServerFrame`] values, in delivery order,
//! on whatever single thread drives the session.

pub mod session;
pub mod sink;

pub use session::{BoardSession, UiUpdate};
pub use sink::OutboundSink;
