//! Outbound half of the peer connection.

use async_trait::async_trait;

/// Where outbound frames go. Implementations are fire-and-forget: the
/// session never awaits an acknowledgement and never retries — a failed
/// send is logged and dropped, transport recovery is the transport's
/// concern.
#[async_trait]
pub trait OutboundSink: Send + Sync + 'static {
    /// Send the full board snapshot (`user_interaction`).
    async fn push_interaction(&self, input: &[f32]) -> anyhow::Result<()>;

    /// Ask the peer for a random example image of a class (`get_rand_image`).
    async fn request_example(&self, label: u8) -> anyhow::Result<()>;
}
