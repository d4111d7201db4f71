use types::{Hash256, Slot};

/// Returned by `process_block` and its parts. A block that produces any of
/// these is invalid; the input state is never modified.
#[derive(Debug, PartialEq, Clone)]
pub enum BlockProcessingError {
    HeaderInvalid { reason: HeaderInvalid },
    SlotProcessing(SlotProcessingError),
    SszTypesError(ssz_types::Error),
}

#[derive(Debug, PartialEq, Clone)]
pub enum HeaderInvalid {
    StateSlotMismatch {
        block_slot: Slot,
        state_slot: Slot,
    },
    OlderThanLatestBlockHeader {
        block_slot: Slot,
        latest_block_header_slot: Slot,
    },
    ProposerIndexMismatch {
        block_proposer_index: u64,
        expected_proposer_index: u64,
    },
    ParentBlockRootMismatch {
        state: Hash256,
        block: Hash256,
    },
}

/// Returned by `process_slots` for a non-future target.
#[derive(Debug, PartialEq, Clone)]
pub enum SlotProcessingError {
    NotFutureSlot { state_slot: Slot, target_slot: Slot },
}

impl From<SlotProcessingError> for BlockProcessingError {
    fn from(e: SlotProcessingError) -> Self {
        BlockProcessingError::SlotProcessing(e)
    }
}

impl From<ssz_types::Error> for BlockProcessingError {
    fn from(e: ssz_types::Error) -> Self {
        BlockProcessingError::SszTypesError(e)
    }
}
