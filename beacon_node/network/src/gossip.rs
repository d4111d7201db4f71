//! Gossip topic naming, payload codecs and mesh parameters.
//!
//! Payloads are SSZ-encoded and Snappy block-compressed. The pubsub engine
//! itself is out of scope; these helpers give it topics, bytes and the
//! parameter set to run with.

use ssz::{Decode, Encode};
use std::time::Duration;
use types::{SignedBlock, SignedVote, JUSTIFICATION_LOOKBACK_SLOTS, SECONDS_PER_SLOT};

pub const TOPIC_PREFIX: &str = "leanconsensus";
pub const SSZ_SNAPPY_ENCODING_POSTFIX: &str = "ssz_snappy";
pub const BLOCK_TOPIC: &str = "block";
pub const VOTE_TOPIC: &str = "vote";

pub fn block_topic(devnet_id: &str) -> String {
    format!(
        "/{}/{}/{}/{}",
        TOPIC_PREFIX, devnet_id, BLOCK_TOPIC, SSZ_SNAPPY_ENCODING_POSTFIX
    )
}

pub fn vote_topic(devnet_id: &str) -> String {
    format!(
        "/{}/{}/{}/{}",
        TOPIC_PREFIX, devnet_id, VOTE_TOPIC, SSZ_SNAPPY_ENCODING_POSTFIX
    )
}

#[derive(Debug)]
pub enum GossipError {
    Snappy(snap::Error),
    SszDecode(ssz::DecodeError),
}

impl From<snap::Error> for GossipError {
    fn from(e: snap::Error) -> Self {
        GossipError::Snappy(e)
    }
}

impl From<ssz::DecodeError> for GossipError {
    fn from(e: ssz::DecodeError) -> Self {
        GossipError::SszDecode(e)
    }
}

/// SSZ-encode and Snappy-compress a message for publication.
pub fn encode_gossip_payload<T: Encode>(message: &T) -> Result<Vec<u8>, GossipError> {
    Ok(snap::raw::Encoder::new().compress_vec(&message.as_ssz_bytes())?)
}

pub fn decode_gossip_block(data: &[u8]) -> Result<SignedBlock, GossipError> {
    let bytes = snap::raw::Decoder::new().decompress_vec(data)?;
    Ok(SignedBlock::from_ssz_bytes(&bytes)?)
}

pub fn decode_gossip_vote(data: &[u8]) -> Result<SignedVote, GossipError> {
    let bytes = snap::raw::Decoder::new().decompress_vec(data)?;
    Ok(SignedVote::from_ssz_bytes(&bytes)?)
}

/// Mesh parameters handed to the pubsub engine for this devnet.
#[derive(Debug, Clone)]
pub struct GossipsubParams {
    pub mesh_n: usize,
    pub mesh_n_low: usize,
    pub mesh_n_high: usize,
    pub gossip_lazy: usize,
    pub heartbeat_interval: Duration,
    pub fanout_ttl: Duration,
    pub history_length: usize,
    pub history_gossip: usize,
    pub seen_ttl: Duration,
    /// Messages are unsigned on this devnet; anything signed is rejected.
    pub strict_no_sign: bool,
}

impl Default for GossipsubParams {
    fn default() -> Self {
        GossipsubParams {
            mesh_n: 8,
            mesh_n_low: 6,
            mesh_n_high: 12,
            gossip_lazy: 6,
            heartbeat_interval: Duration::from_millis(700),
            fanout_ttl: Duration::from_secs(60),
            history_length: 6,
            history_gossip: 3,
            seen_ttl: Duration::from_secs(
                SECONDS_PER_SLOT * JUSTIFICATION_LOOKBACK_SLOTS * 2,
            ),
            strict_no_sign: true,
        }
    }
}
