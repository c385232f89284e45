//! # WebSocket Client for the AI Agent
//!
//! Owns one WebSocket connection to the agent service. Outgoing frames go
//! through an unbounded channel to a writer task; incoming frames are
//! forwarded as [`SocketEvent`]s by a reader task. No reconnection is
//! attempted: once `Closed` is emitted the socket is done.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, trace, warn};

use crate::core::error::{AppError, Result};

/// What the reader task reports
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    /// A text frame
    Frame(String),
    /// The transport failed; always followed by `Closed`
    Error(String),
    /// The connection ended
    Closed {
        code: Option<u16>,
        reason: Option<String>,
    },
}

/// Build `<base>?token=<api_key>&userId=<user_id>`
pub fn agent_url(base: &str, api_key: &str, user_id: &str) -> Result<String> {
    let mut url = reqwest::Url::parse(base)
        .map_err(|e| AppError::Config(format!("Invalid agent WebSocket URL '{}': {}", base, e)))?;
    url.query_pairs_mut()
        .append_pair("token", api_key)
        .append_pair("userId", user_id);
    Ok(url.to_string())
}

/// Sending half of an open agent connection
#[derive(Debug)]
pub struct AgentSocket {
    outbound: mpsc::UnboundedSender<Message>,
}

impl AgentSocket {
    /// Dial `url` and start the reader/writer tasks.
    pub async fn connect(url: &str) -> Result<(AgentSocket, mpsc::UnboundedReceiver<SocketEvent>)> {
        let (ws_stream, response) = connect_async(url).await.map_err(|e| {
            error!(error = %e, "Failed to open agent WebSocket");
            AppError::Agent(e.to_string())
        })?;
        debug!(status = ?response.status(), "Agent WebSocket handshake complete");

        let (mut write, mut read) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<SocketEvent>();

        tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let closing = matches!(message, Message::Close(_));
                if let Err(e) = write.send(message).await {
                    warn!(error = %e, "Agent WebSocket write failed");
                    break;
                }
                if closing {
                    break;
                }
            }
            let _ = write.close().await;
            trace!("Agent WebSocket writer ended");
        });

        let pong_tx = outbound_tx.clone();
        tokio::spawn(async move {
            let mut frames = 0u64;
            let closed = loop {
                match read.next().await {
                    Some(Ok(Message::Text(text))) => {
                        frames += 1;
                        if event_tx.send(SocketEvent::Frame(text)).is_err() {
                            break SocketEvent::Closed {
                                code: None,
                                reason: None,
                            };
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        trace!(data_len = data.len(), "Received ping, sending pong");
                        let _ = pong_tx.send(Message::Pong(data));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let code = frame.as_ref().map(|f| u16::from(f.code));
                        let reason = frame.as_ref().map(|f| f.reason.to_string());
                        info!(code = ?code, reason = ?reason, frames, "Agent WebSocket closed by server");
                        break SocketEvent::Closed { code, reason };
                    }
                    Some(Ok(_)) => {
                        trace!("Ignoring non-text agent frame");
                    }
                    Some(Err(e)) => {
                        error!(error = %e, frames, "Agent WebSocket read error");
                        let _ = event_tx.send(SocketEvent::Error(e.to_string()));
                        break SocketEvent::Closed {
                            code: None,
                            reason: None,
                        };
                    }
                    None => {
                        break SocketEvent::Closed {
                            code: None,
                            reason: None,
                        };
                    }
                }
            };
            let _ = event_tx.send(closed);
        });

        Ok((
            AgentSocket {
                outbound: outbound_tx,
            },
            event_rx,
        ))
    }

    /// Queue a text frame. Returns false once the writer has gone away.
    pub fn send_text(&self, text: String) -> bool {
        self.outbound.send(Message::Text(text)).is_ok()
    }

    /// Ask the writer to send a Close frame.
    pub fn close(&self) {
        let _ = self.outbound.send(Message::Close(None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_url_appends_credentials() {
        let url = agent_url("ws://localhost:3001", "demo-key", "u1").unwrap();
        assert_eq!(url, "ws://localhost:3001/?token=demo-key&userId=u1");
    }

    #[test]
    fn test_agent_url_encodes_values() {
        let url = agent_url("wss://agent.example.com/ws", "k y", "a&b").unwrap();
        assert_eq!(url, "wss://agent.example.com/ws?token=k+y&userId=a%26b");
    }

    #[test]
    fn test_agent_url_rejects_garbage() {
        assert!(agent_url("not a url", "k", "u").is_err());
    }
}
