//! WebSocket transport adapter — connects a board session to the peer.
//!
//! The adapter is deliberately thin: connect, pump frames both ways, log
//! failures, stop. Reconnection and delivery guarantees live with the
//! transport collaborator, not here.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use uuid::Uuid;

use digitscope_bridge::OutboundSink;
use digitscope_core::error::{DigitscopeError, Result};
use digitscope_core::protocol::{ClientFrame, ServerFrame};

/// A live connection to the inference peer.
pub struct PeerConnection {
    /// Connection id for log correlation.
    pub conn_id: String,
    /// Outbound half, ready to hand to a board session.
    pub sink: WsSink,
    /// Inbound frames in delivery order.
    pub frames: mpsc::UnboundedReceiver<ServerFrame>,
}

/// Outbound sink writing client frames into the socket's write half.
#[derive(Clone)]
pub struct WsSink {
    tx: mpsc::UnboundedSender<Message>,
}

impl WsSink {
    fn send(&self, frame: &ClientFrame) -> anyhow::Result<()> {
        let msg = serde_json::to_string(frame)?;
        self.tx
            .send(Message::Text(msg.into()))
            .map_err(|_| anyhow::anyhow!("peer connection closed"))
    }
}

#[async_trait]
impl OutboundSink for WsSink {
    async fn push_interaction(&self, input: &[f32]) -> anyhow::Result<()> {
        self.send(&ClientFrame::UserInteraction {
            input: input.to_vec(),
        })
    }

    async fn request_example(&self, label: u8) -> anyhow::Result<()> {
        self.send(&ClientFrame::GetRandImage { label })
    }
}

/// Connect to the peer and spawn the read/write pumps.
pub async fn connect(url: &str) -> Result<PeerConnection> {
    let (ws, _) = connect_async(url)
        .await
        .map_err(|e| DigitscopeError::Transport(e.to_string()))?;

    let conn_id = Uuid::new_v4().to_string();
    info!(conn_id = %conn_id, url, "Connected to inference peer");

    let (mut ws_tx, mut ws_rx) = ws.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
    let (in_tx, in_rx) = mpsc::unbounded_channel::<ServerFrame>();

    // Write pump: serialize happens in WsSink, this task only moves frames.
    tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if ws_tx.send(msg).await.is_err() {
                break;
            }
        }
    });

    // Read loop: parse text frames, forward in arrival order.
    let read_conn_id = conn_id.clone();
    tokio::spawn(async move {
        while let Some(msg) = ws_rx.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerFrame>(&text) {
                    Ok(frame) => {
                        if in_tx.send(frame).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!(conn_id = %read_conn_id, error = %e, "Ignoring unrecognized frame");
                    }
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {} // ping/pong/binary — nothing to apply
                Err(e) => {
                    warn!(conn_id = %read_conn_id, error = %e, "Peer connection error");
                    break;
                }
            }
        }
        debug!(conn_id = %read_conn_id, "Peer read loop ended");
    });

    Ok(PeerConnection {
        conn_id,
        sink: WsSink { tx: out_tx },
        frames: in_rx,
    })
}
