//! The semantic networking layer: gossip topics and codecs, message
//! identity, req/resp methods, and the router that applies inbound messages
//! to the fork-choice store.
//!
//! Transport concerns (the libp2p host, peer discovery, the pubsub mesh and
//! stream framing) live outside this crate; they deliver decoded payloads in
//! and carry `NetworkMessage`s out.

pub mod gossip;
pub mod message_id;
pub mod router;
pub mod rpc;
pub mod types;

pub use crate::message_id::compute_message_id;
pub use crate::router::{Router, RouterMessage};
pub use crate::types::{NetworkMessage, PubsubMessage};
