use state_transition::{BlockProcessingError, SlotProcessingError};
use types::{Hash256, Slot, ValidatorIndex};

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// The anchor block does not commit to the anchor state.
    InvalidAnchor { block: Hash256, state: Hash256 },
    /// The block's parent is not known; the syncer may request it.
    UnknownParent(Hash256),
    /// A block is stored for the parent root but its post-state is missing.
    UnknownParentState(Hash256),
    /// The locally computed post-state root disagrees with the block.
    StateRootMismatch { block: Hash256, local: Hash256 },
    InvalidAttestation(InvalidAttestation),
    BlockProcessing(BlockProcessingError),
    SlotProcessing(SlotProcessingError),
    /// The validator is not assigned to propose at this slot.
    NotProposer {
        slot: Slot,
        validator: ValidatorIndex,
        expected: ValidatorIndex,
    },
    SszTypesError(ssz_types::Error),
}

/// Reasons an attestation fails validation. Invalid attestations are dropped
/// without mutating the store.
#[derive(Debug, PartialEq, Clone)]
pub enum InvalidAttestation {
    UnknownSourceBlock { root: Hash256 },
    UnknownTargetBlock { root: Hash256 },
    SourceAfterTarget { source: Slot, target: Slot },
    SourceSlotMismatch { checkpoint: Slot, block: Slot },
    TargetSlotMismatch { checkpoint: Slot, block: Slot },
    /// The vote's slot is ahead of what the clock admits. Gossip allows the
    /// current slot; votes from a block get one extra slot of grace.
    FutureVote { vote_slot: Slot, current_slot: Slot },
}

impl From<InvalidAttestation> for Error {
    fn from(e: InvalidAttestation) -> Self {
        Error::InvalidAttestation(e)
    }
}

impl From<BlockProcessingError> for Error {
    fn from(e: BlockProcessingError) -> Self {
        Error::BlockProcessing(e)
    }
}

impl From<SlotProcessingError> for Error {
    fn from(e: SlotProcessingError) -> Self {
        Error::SlotProcessing(e)
    }
}

impl From<ssz_types::Error> for Error {
    fn from(e: ssz_types::Error) -> Self {
        Error::SszTypesError(e)
    }
}
