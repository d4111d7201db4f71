use crate::{Checkpoint, Hash256, Slot, ValidatorIndex};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// A validator's view of the chain: the head it attests to, the checkpoint it
/// wants justified (target) and the justified checkpoint it builds on
/// (source).
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct Vote {
    pub validator_id: ValidatorIndex,
    pub slot: Slot,
    pub head: Checkpoint,
    pub target: Checkpoint,
    pub source: Checkpoint,
}

/// A `Vote` with its signature. Devnet signatures are placeholder zero bytes.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct SignedVote {
    pub data: Vote,
    pub signature: Hash256,
}
