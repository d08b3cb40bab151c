use sono_protocol::{ClientFrame, ServerFrame};
use tracing::{debug, error, info, warn};

use crate::input::Key;
use crate::session::{Session, Update};
use crate::transport::{Transport, TransportEvent};

/// Drives one session over one transport.
///
/// Inbound events are applied strictly in arrival order. Once the connection
/// is gone every send is dropped silently; there is no reconnect.
pub struct Router<T> {
    transport: T,
    session: Session,
    closed: bool,
}

impl<T: Transport> Router<T> {
    pub fn new(transport: T, session: Session) -> Self {
        Self {
            transport,
            session,
            closed: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Next transport event. `None` once the transport is exhausted.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        let event = self.transport.recv().await;
        if event.is_none() && !self.closed {
            self.closed = true;
            info!("[close] Connection died");
        }
        event
    }

    /// Apply one transport event to the session.
    pub fn dispatch(&mut self, event: TransportEvent) -> Option<Update> {
        match event {
            TransportEvent::Open => {
                info!("[open] Connection established");
                None
            }
            TransportEvent::Message(payload) => {
                Some(self.session.apply(ServerFrame::decode(&payload)))
            }
            TransportEvent::Closed {
                clean,
                code,
                reason,
            } => {
                self.closed = true;
                if clean {
                    info!(?code, %reason, "[close] Connection closed cleanly");
                } else {
                    info!("[close] Connection died");
                }
                None
            }
            TransportEvent::Error(message) => {
                error!("[error] {message}");
                None
            }
        }
    }

    /// Receive and dispatch until the transport is exhausted.
    pub async fn drain(&mut self) -> Vec<Update> {
        let mut updates = Vec::new();
        while let Some(event) = self.recv().await {
            updates.extend(self.dispatch(event));
        }
        updates
    }

    /// Hand a frame to the transport. Returns whether it went out.
    pub async fn send(&mut self, frame: ClientFrame) -> bool {
        if self.closed {
            debug!(header = %frame.header(), "Dropping frame; connection closed");
            return false;
        }
        match self.transport.send(frame.encode()).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Send failed: {e}");
                self.closed = true;
                false
            }
        }
    }

    /// Run the editor buffer; a no-op while a previous run is outstanding.
    pub async fn run(&mut self) -> bool {
        match self.session.run() {
            Some(frame) => self.send(frame).await,
            None => false,
        }
    }

    pub async fn submit_line(&mut self, text: &str) -> bool {
        let frame = self.session.submit_line(text);
        self.send(frame).await
    }

    pub async fn key(&mut self, key: Key) -> bool {
        match self.session.key(key) {
            Some(frame) => self.send(frame).await,
            None => false,
        }
    }

    pub async fn load_example(&mut self, filename: &str) -> bool {
        let frame = self.session.load_example(filename);
        self.send(frame).await
    }
}
