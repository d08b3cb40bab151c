//! Connections to the interpreter server.

use std::collections::VecDeque;
use std::future::Future;

use futures_util::{SinkExt, StreamExt};
use sono_protocol::ServerFrame;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::{Error, Result};

/// Something that happened on the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Open,
    Message(String),
    Closed {
        clean: bool,
        code: Option<u16>,
        reason: String,
    },
    Error(String),
}

/// A bidirectional, order-preserving text message channel.
pub trait Transport {
    fn send(&mut self, payload: String) -> impl Future<Output = Result<()>>;

    /// Next event, or `None` once the connection has nothing more to deliver.
    fn recv(&mut self) -> impl Future<Output = Option<TransportEvent>>;
}

/// WebSocket connection (`ws://` or `wss://`).
pub struct WsTransport {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    opened: bool,
    finished: bool,
}

impl WsTransport {
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws, _response) = connect_async(url).await?;
        Ok(Self {
            ws,
            opened: false,
            finished: false,
        })
    }
}

impl Transport for WsTransport {
    async fn send(&mut self, payload: String) -> Result<()> {
        self.ws.send(Message::Text(payload)).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Option<TransportEvent> {
        if !self.opened {
            self.opened = true;
            return Some(TransportEvent::Open);
        }
        if self.finished {
            return None;
        }
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => return Some(TransportEvent::Message(text)),
                Some(Ok(Message::Close(frame))) => {
                    self.finished = true;
                    let (code, reason) = match frame {
                        Some(frame) => (Some(u16::from(frame.code)), frame.reason.into_owned()),
                        None => (None, String::new()),
                    };
                    return Some(TransportEvent::Closed {
                        clean: true,
                        code,
                        reason,
                    });
                }
                // Pings are answered by tungstenite itself
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(TransportEvent::Error(e.to_string()));
                }
                None => {
                    self.finished = true;
                    return Some(TransportEvent::Closed {
                        clean: false,
                        code: None,
                        reason: String::new(),
                    });
                }
            }
        }
    }
}

/// In-process transport that replays queued events and records sends.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inbound: VecDeque<TransportEvent>,
    sent: Vec<String>,
    broken: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TransportEvent) -> &mut Self {
        self.inbound.push_back(event);
        self
    }

    pub fn push_frame(&mut self, frame: &ServerFrame) -> &mut Self {
        self.push(TransportEvent::Message(frame.encode()))
    }

    /// Payloads sent so far, oldest first.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    /// Make every later send fail.
    pub fn break_pipe(&mut self) {
        self.broken = true;
    }
}

impl Transport for MemoryTransport {
    async fn send(&mut self, payload: String) -> Result<()> {
        if self.broken {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "memory transport closed",
            )));
        }
        self.sent.push(payload);
        Ok(())
    }

    async fn recv(&mut self) -> Option<TransportEvent> {
        self.inbound.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_transport_replays_in_order() {
        let mut transport = MemoryTransport::new();
        transport
            .push(TransportEvent::Open)
            .push_frame(&ServerFrame::Out("a".into()))
            .push_frame(&ServerFrame::Status { running: true });

        assert_eq!(transport.recv().await, Some(TransportEvent::Open));
        assert_eq!(
            transport.recv().await,
            Some(TransportEvent::Message("OUT\na".into()))
        );
        assert_eq!(
            transport.recv().await,
            Some(TransportEvent::Message("STATUS\nTRUE".into()))
        );
        assert_eq!(transport.recv().await, None);
    }

    #[tokio::test]
    async fn test_memory_transport_records_and_breaks() {
        let mut transport = MemoryTransport::new();
        transport.send("CODE\n1".into()).await.unwrap();
        transport.break_pipe();
        assert!(transport.send("CODE\n2".into()).await.is_err());
        assert_eq!(transport.sent(), ["CODE\n1"]);
    }
}
