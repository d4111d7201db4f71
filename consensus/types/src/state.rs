use crate::{
    BlockHeader, Checkpoint, Config, Hash256, HistoricalRootsLimit, JustificationBitsLimit, Slot,
    ValidatorIndex,
};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{BitList, VariableList};
use tree_hash_derive::TreeHash;

/// The consensus state. Produced only by the state transition; never mutated
/// once stored.
///
/// `historical_block_hashes` is indexed by slot (zero roots for empty slots)
/// and `justified_slots` carries one bit per slot. The justification roots
/// and validators fields are placeholders kept for hash-tree-root
/// compatibility with the other clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct State {
    pub config: Config,
    pub slot: Slot,
    pub latest_block_header: BlockHeader,
    pub latest_justified: Checkpoint,
    pub latest_finalized: Checkpoint,
    pub historical_block_hashes: VariableList<Hash256, HistoricalRootsLimit>,
    pub justified_slots: BitList<HistoricalRootsLimit>,
    pub justification_roots: VariableList<Hash256, HistoricalRootsLimit>,
    pub justification_validators: BitList<JustificationBitsLimit>,
}

impl State {
    /// Round-robin proposer check for the state's current slot.
    pub fn is_proposer(&self, validator_index: ValidatorIndex) -> bool {
        crate::is_proposer(self.slot, validator_index, self.config.num_validators)
    }
}
