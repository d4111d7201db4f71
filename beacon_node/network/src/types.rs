//! Message types crossing the boundary between this crate and the transport
//! layer.

use crate::gossip::{self, GossipError};
use types::{SignedBlock, SignedVote, Slot};

/// A decoded gossip message.
#[derive(Debug, Clone, PartialEq)]
pub enum PubsubMessage {
    Block(Box<SignedBlock>),
    Vote(Box<SignedVote>),
}

impl PubsubMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            PubsubMessage::Block(_) => "block",
            PubsubMessage::Vote(_) => "vote",
        }
    }

    pub fn slot(&self) -> Slot {
        match self {
            PubsubMessage::Block(block) => block.message.slot,
            PubsubMessage::Vote(vote) => vote.data.slot,
        }
    }

    /// The topic this message publishes on.
    pub fn topic(&self, devnet_id: &str) -> String {
        match self {
            PubsubMessage::Block(_) => gossip::block_topic(devnet_id),
            PubsubMessage::Vote(_) => gossip::vote_topic(devnet_id),
        }
    }

    /// SSZ + Snappy bytes for the wire.
    pub fn encode(&self) -> Result<Vec<u8>, GossipError> {
        match self {
            PubsubMessage::Block(block) => gossip::encode_gossip_payload(block.as_ref()),
            PubsubMessage::Vote(vote) => gossip::encode_gossip_payload(vote.as_ref()),
        }
    }
}

/// Instructions for the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkMessage {
    /// Publish a message on its gossip topic.
    Publish { message: PubsubMessage },
}
