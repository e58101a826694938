//! Sidewinder Protocol - peer state replication.
//!
//! Message types exchanged between peers, a JSON wire codec, and the
//! fixed-tick replication engine that keeps remote player entities in step
//! with their owning sessions. Transport is out of scope; a collaborator
//! moves encoded bytes and feeds the queues.

pub mod codec;
pub mod messages;
pub mod sync;

pub use codec::{decode, encode, CodecError};
pub use messages::{MessageType, NetworkMessage};
pub use sync::{apply_message, Replication, SNAPSHOT_INTERVAL};
