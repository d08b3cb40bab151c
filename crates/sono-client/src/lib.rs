//! Client side of the Sono interpreter REPL.
//!
//! [`Session`] holds every piece of client state and performs no I/O.
//! [`Router`] feeds it events from a [`Transport`] and sends the frames it
//! produces.

pub mod config;
mod error;
pub mod history;
pub mod input;
pub mod output;
pub mod router;
pub mod session;
pub mod tabs;
pub mod transport;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use router::Router;
pub use session::{Session, Update};
pub use transport::{MemoryTransport, Transport, TransportEvent, WsTransport};
