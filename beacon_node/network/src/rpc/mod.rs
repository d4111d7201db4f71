//! Request/response protocol methods and payload codecs.
//!
//! Stream negotiation and framing below the semantic payload are handled by
//! the transport layer; this module defines the protocol IDs, the method
//! containers, and the snappy-framed SSZ payload encoding.

pub mod codec;
pub mod methods;

pub use methods::{BlocksByRootRequest, StatusMessage};

pub const STATUS_PROTOCOL_V1: &str = "/leanconsensus/req/status/1/ssz_snappy";
pub const BLOCKS_BY_ROOT_PROTOCOL_V1: &str = "/leanconsensus/req/blocks_by_root/1/ssz_snappy";

/// Largest decompressed payload accepted on any req/resp stream.
pub const MAX_RPC_SIZE: usize = 1024 * 1024;

#[derive(Debug)]
pub enum RPCError {
    SszDecode(ssz::DecodeError),
    Io(std::io::Error),
    /// The payload length does not match the expected method encoding.
    InvalidData,
}

impl From<ssz::DecodeError> for RPCError {
    fn from(e: ssz::DecodeError) -> Self {
        RPCError::SszDecode(e)
    }
}

impl From<std::io::Error> for RPCError {
    fn from(e: std::io::Error) -> Self {
        RPCError::Io(e)
    }
}
