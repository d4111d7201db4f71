use ssz_derive::{Decode, Encode};
use ssz_types::VariableList;
use types::{Checkpoint, Hash256, MaxRequestBlocks};

/// The handshake exchanged when peers connect: enough to detect a
/// conflicting chain and decide who is ahead. 80 bytes on the wire.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct StatusMessage {
    pub finalized: Checkpoint,
    pub head: Checkpoint,
}

/// Request blocks by hash-tree-root. The wire encoding is the bare SSZ list;
/// responses stream `SignedBlock`s, at most one per requested root.
#[derive(Debug, Clone, PartialEq)]
pub struct BlocksByRootRequest {
    pub block_roots: VariableList<Hash256, MaxRequestBlocks>,
}
