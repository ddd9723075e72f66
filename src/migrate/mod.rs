//! Cross-rank particle movement: `migrate` plus the message-transport
//! abstraction it is built on.

pub mod migrator;
pub mod transport;

pub use transport::{local_world, LocalTransport, PeerMessage, Transport};
