use crate::{Hash256, SignedVote, Slot, ValidatorRegistryLimit};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::VariableList;
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

/// The fixed-size summary of a block. `state_root` may be zero until the
/// per-slot processing of the following slot caches it.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct BlockHeader {
    pub slot: Slot,
    pub proposer_index: u64,
    pub parent_root: Hash256,
    pub state_root: Hash256,
    pub body_root: Hash256,
}

/// The variable-size payload of a block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct BlockBody {
    pub attestations: VariableList<SignedVote, ValidatorRegistryLimit>,
}

/// A block as proposed and gossiped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Block {
    pub slot: Slot,
    pub proposer_index: u64,
    pub parent_root: Hash256,
    pub state_root: Hash256,
    pub body: BlockBody,
}

impl Block {
    /// The header for this block, with a zero `state_root`. The state root is
    /// cached by per-slot processing once it is known.
    ///
    /// A header and its block have the same hash-tree-root, so either form
    /// identifies the block.
    pub fn temporary_block_header(&self) -> BlockHeader {
        BlockHeader {
            slot: self.slot,
            proposer_index: self.proposer_index,
            parent_root: self.parent_root,
            state_root: Hash256::zero(),
            body_root: self.body.tree_hash_root(),
        }
    }
}

/// A `Block` with its signature. Devnet signatures are placeholder zero bytes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct SignedBlock {
    pub message: Block,
    pub signature: Hash256,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssz::{Decode, Encode};

    #[test]
    fn empty_body_root_matches_reference() {
        let body = BlockBody::default();
        assert_eq!(
            hex::encode(body.tree_hash_root().as_bytes()),
            "dba9671bac9513c9482f1416a53aabd2c6ce90d5a5f865ce5a55c775325c9136"
        );
    }

    #[test]
    fn genesis_header_root_matches_reference() {
        let header = BlockHeader {
            body_root: BlockBody::default().tree_hash_root(),
            ..BlockHeader::default()
        };
        assert_eq!(
            hex::encode(header.tree_hash_root().as_bytes()),
            "ed01b1825c7b112c8b9c6e0f41c4d49e400fc120425582e533c332a6ac46082e"
        );
    }

    #[test]
    fn block_and_header_roots_agree() {
        let block = Block {
            slot: 3,
            proposer_index: 3,
            parent_root: Hash256::repeat_byte(0x55),
            state_root: Hash256::repeat_byte(0x66),
            body: BlockBody::default(),
        };
        let header = BlockHeader {
            state_root: block.state_root,
            ..block.temporary_block_header()
        };
        assert_eq!(block.tree_hash_root(), header.tree_hash_root());
    }

    fn reference_signed_block() -> SignedBlock {
        SignedBlock {
            message: Block {
                slot: 1,
                proposer_index: 0,
                parent_root: Hash256::repeat_byte(0xab),
                state_root: Hash256::repeat_byte(0xcd),
                body: BlockBody::default(),
            },
            signature: Hash256::repeat_byte(0xef),
        }
    }

    #[test]
    fn signed_block_ssz_matches_reference() {
        let sb = reference_signed_block();
        let expected = concat!(
            "24000000efefefefefefefefefefefefefefefefefefefefefefefefefefefefefefefef",
            "01000000000000000000000000000000abababababababababababababababababababab",
            "ababababababababababababcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcdcd",
            "cdcdcdcdcdcdcdcd5400000004000000",
        );
        assert_eq!(hex::encode(sb.as_ssz_bytes()), expected);

        let decoded = SignedBlock::from_ssz_bytes(&sb.as_ssz_bytes()).unwrap();
        assert_eq!(decoded, sb);
    }

    #[test]
    fn signed_block_roots_match_reference() {
        let sb = reference_signed_block();
        assert_eq!(
            hex::encode(sb.tree_hash_root().as_bytes()),
            "96006110de282b2b8258b6c4df79b324511d30f96c8f40698ed033246f262cf2"
        );
        assert_eq!(
            hex::encode(sb.message.tree_hash_root().as_bytes()),
            "1318f2c155a2ef5515839b449dff382128a5b51df0724add8e5a1f8b5743dcd7"
        );
    }
}
