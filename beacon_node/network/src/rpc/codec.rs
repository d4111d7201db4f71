//! Snappy-framed SSZ payload codecs for the req/resp methods.

use crate::rpc::methods::{BlocksByRootRequest, StatusMessage};
use crate::rpc::{RPCError, MAX_RPC_SIZE};
use snap::read::FrameDecoder;
use snap::write::FrameEncoder;
use ssz::{Decode, Encode};
use ssz_types::VariableList;
use std::io::{Read, Write};
use types::SignedBlock;

/// Wrap SSZ bytes in a single Snappy frame.
fn encode_ssz_snappy(bytes: &[u8]) -> Result<Vec<u8>, RPCError> {
    let mut writer = FrameEncoder::new(Vec::new());
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(writer.get_ref().clone())
}

/// Unwrap a Snappy frame, bounded by `MAX_RPC_SIZE`.
fn decode_ssz_snappy(data: &[u8]) -> Result<Vec<u8>, RPCError> {
    let mut decoded = Vec::new();
    FrameDecoder::new(data)
        .take(MAX_RPC_SIZE as u64 + 1)
        .read_to_end(&mut decoded)?;
    if decoded.len() > MAX_RPC_SIZE {
        return Err(RPCError::InvalidData);
    }
    Ok(decoded)
}

pub fn encode_status(status: &StatusMessage) -> Result<Vec<u8>, RPCError> {
    encode_ssz_snappy(&status.as_ssz_bytes())
}

/// Decode a status payload. Anything other than the fixed 80 bytes is
/// rejected.
pub fn decode_status(data: &[u8]) -> Result<StatusMessage, RPCError> {
    let decoded = decode_ssz_snappy(data)?;
    if decoded.len() != <StatusMessage as Encode>::ssz_fixed_len() {
        return Err(RPCError::InvalidData);
    }
    Ok(StatusMessage::from_ssz_bytes(&decoded)?)
}

pub fn encode_blocks_by_root_request(request: &BlocksByRootRequest) -> Result<Vec<u8>, RPCError> {
    encode_ssz_snappy(&request.block_roots.as_ssz_bytes())
}

pub fn decode_blocks_by_root_request(data: &[u8]) -> Result<BlocksByRootRequest, RPCError> {
    let decoded = decode_ssz_snappy(data)?;
    if decoded.len() > types::MAX_REQUEST_BLOCKS as usize * 32 {
        return Err(RPCError::InvalidData);
    }
    Ok(BlocksByRootRequest {
        block_roots: VariableList::from_ssz_bytes(&decoded)?,
    })
}

pub fn encode_signed_block(block: &SignedBlock) -> Result<Vec<u8>, RPCError> {
    encode_ssz_snappy(&block.as_ssz_bytes())
}

pub fn decode_signed_block(data: &[u8]) -> Result<SignedBlock, RPCError> {
    let decoded = decode_ssz_snappy(data)?;
    Ok(SignedBlock::from_ssz_bytes(&decoded)?)
}
