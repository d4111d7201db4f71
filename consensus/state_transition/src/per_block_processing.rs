use crate::errors::{BlockProcessingError, HeaderInvalid};
use crate::justification::is_justifiable_after;
use tree_hash::TreeHash;
use types::{bitlist, Block, Hash256, SignedVote, Slot, State};

macro_rules! verify {
    ($condition:expr, $result:expr) => {
        if !$condition {
            return Err(BlockProcessingError::HeaderInvalid { reason: $result });
        }
    };
}

/// Apply a full block: header processing followed by the attestations carried
/// in its body. Returns the post-state; the input state is untouched.
pub fn process_block(state: &State, block: &Block) -> Result<State, BlockProcessingError> {
    let state = process_block_header(state, block)?;
    process_attestations(&state, &block.body.attestations)
}

/// Validate a block header against the state and thread it into the chain
/// history.
pub fn process_block_header(state: &State, block: &Block) -> Result<State, BlockProcessingError> {
    verify!(
        block.slot == state.slot,
        HeaderInvalid::StateSlotMismatch {
            block_slot: block.slot,
            state_slot: state.slot,
        }
    );

    verify!(
        block.slot > state.latest_block_header.slot,
        HeaderInvalid::OlderThanLatestBlockHeader {
            block_slot: block.slot,
            latest_block_header_slot: state.latest_block_header.slot,
        }
    );

    let expected_proposer_index = block.slot % state.config.num_validators;
    verify!(
        block.proposer_index == expected_proposer_index,
        HeaderInvalid::ProposerIndexMismatch {
            block_proposer_index: block.proposer_index,
            expected_proposer_index,
        }
    );

    let expected_parent_root = state.latest_block_header.tree_hash_root();
    verify!(
        block.parent_root == expected_parent_root,
        HeaderInvalid::ParentBlockRootMismatch {
            state: expected_parent_root,
            block: block.parent_root,
        }
    );

    let mut new_state = state.clone();

    // The first block after genesis anchors justification and finalization on
    // the genesis root.
    if state.latest_block_header.slot == 0 {
        new_state.latest_justified.root = block.parent_root;
        new_state.latest_finalized.root = block.parent_root;
    }

    let parent_slot = state.latest_block_header.slot;
    let mut justified_slots = bitlist::to_bools(&new_state.justified_slots);

    new_state.historical_block_hashes.push(block.parent_root)?;
    // Only the genesis slot is justified by construction.
    set_bit_at(&mut justified_slots, parent_slot as usize, parent_slot == 0);

    // Slots skipped between the parent and this block get zero roots and stay
    // unjustified.
    for empty_slot in (parent_slot + 1)..block.slot {
        new_state.historical_block_hashes.push(Hash256::zero())?;
        set_bit_at(&mut justified_slots, empty_slot as usize, false);
    }
    new_state.justified_slots = bitlist::from_bools(&justified_slots)?;

    new_state.latest_block_header = block.temporary_block_header();

    Ok(new_state)
}

/// Apply attestations to the justification bits and checkpoints (3SF-mini).
///
/// Each valid attestation individually justifies its target; there is no
/// supermajority counting on this devnet. The source is finalized when no
/// strictly intermediate slot could itself have been justified.
pub fn process_attestations(
    state: &State,
    attestations: &[SignedVote],
) -> Result<State, BlockProcessingError> {
    let mut new_state = state.clone();
    let mut justified_slots = bitlist::to_bools(&new_state.justified_slots);

    let mut latest_justified = new_state.latest_justified.clone();
    let mut latest_finalized = new_state.latest_finalized.clone();
    // Gap checks run against the finalized slot as it stood on entry.
    let original_finalized_slot = new_state.latest_finalized.slot;

    for attestation in attestations {
        let source = &attestation.data.source;
        let target = &attestation.data.target;

        if source.slot >= target.slot {
            continue;
        }

        let source_slot = source.slot as usize;
        let target_slot = target.slot as usize;
        if source_slot >= justified_slots.len() || !justified_slots[source_slot] {
            continue;
        }

        let already_justified = target_slot < justified_slots.len() && justified_slots[target_slot];
        if !already_justified {
            set_bit_at(&mut justified_slots, target_slot, true);
            if target.slot > latest_justified.slot {
                latest_justified = target.clone();
            }
        }

        if has_no_justifiable_gap(source.slot, target.slot, original_finalized_slot)
            && source.slot >= latest_finalized.slot
        {
            latest_finalized = source.clone();
        }
    }

    new_state.justified_slots = bitlist::from_bools(&justified_slots)?;
    new_state.latest_justified = latest_justified;
    new_state.latest_finalized = latest_finalized;

    Ok(new_state)
}

/// True when no slot strictly between source and target could have been
/// justified after the finalized slot.
fn has_no_justifiable_gap(source_slot: Slot, target_slot: Slot, finalized_slot: Slot) -> bool {
    ((source_slot + 1)..target_slot).all(|slot| !is_justifiable_after(slot, finalized_slot))
}

fn set_bit_at(bits: &mut Vec<bool>, index: usize, value: bool) {
    if bits.len() <= index {
        bits.resize(index + 1, false);
    }
    bits[index] = value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate_genesis, process_slots};
    use types::{BlockBody, Checkpoint, Vote};

    /// An empty block for `slot` that is valid on top of `state`.
    fn build_block(state: &State, slot: Slot) -> (State, Block) {
        let pre_state = process_slots(state, slot).unwrap();
        let block = Block {
            slot,
            proposer_index: slot % state.config.num_validators,
            parent_root: pre_state.latest_block_header.tree_hash_root(),
            state_root: Hash256::zero(),
            body: BlockBody::default(),
        };
        (pre_state, block)
    }

    fn signed_vote(source: Checkpoint, target: Checkpoint) -> SignedVote {
        SignedVote {
            data: Vote {
                validator_id: 0,
                slot: target.slot,
                head: target.clone(),
                target,
                source,
            },
            signature: Hash256::zero(),
        }
    }

    /// A genesis-derived state whose `justified_slots` bits are exactly
    /// `justified`, with history long enough to cover them.
    fn state_with_justified_slots(justified: &[Slot]) -> State {
        let (genesis, _) = generate_genesis(1000, 5);
        let mut state = genesis;

        let max_slot = *justified.iter().max().unwrap();
        let mut bits = vec![false; max_slot as usize + 1];
        for slot in justified {
            bits[*slot as usize] = true;
        }
        state.justified_slots = bitlist::from_bools(&bits).unwrap();
        state
    }

    #[test]
    fn first_block_after_genesis_anchors_checkpoints() {
        let (genesis, _) = generate_genesis(1000, 5);
        let (pre_state, block) = build_block(&genesis, 1);

        let post = process_block(&pre_state, &block).unwrap();

        assert_eq!(post.latest_justified.root, block.parent_root);
        assert_eq!(post.latest_finalized.root, block.parent_root);
        assert_eq!(post.historical_block_hashes.len(), 1);
        assert_eq!(post.historical_block_hashes[0], block.parent_root);
        // Genesis (the parent) is justified by construction.
        assert_eq!(bitlist::to_bools(&post.justified_slots), vec![true]);
        assert_eq!(post.latest_block_header.slot, 1);
        assert!(post.latest_block_header.state_root.is_zero());
    }

    #[test]
    fn skipped_slots_fill_history_with_zero_roots() {
        let (genesis, _) = generate_genesis(1000, 5);
        let (pre_state, block) = build_block(&genesis, 3);

        let post = process_block(&pre_state, &block).unwrap();

        // Parent plus two empty slots.
        assert_eq!(post.historical_block_hashes.len(), 3);
        assert_eq!(post.historical_block_hashes[0], block.parent_root);
        assert!(post.historical_block_hashes[1].is_zero());
        assert!(post.historical_block_hashes[2].is_zero());
        assert_eq!(
            bitlist::to_bools(&post.justified_slots),
            vec![true, false, false]
        );
    }

    #[test]
    fn header_rejects_wrong_slot() {
        let (genesis, _) = generate_genesis(1000, 5);
        let (pre_state, mut block) = build_block(&genesis, 1);
        block.slot = 2;

        assert_eq!(
            process_block_header(&pre_state, &block),
            Err(BlockProcessingError::HeaderInvalid {
                reason: HeaderInvalid::StateSlotMismatch {
                    block_slot: 2,
                    state_slot: 1,
                }
            })
        );
    }

    #[test]
    fn header_rejects_wrong_proposer() {
        let (genesis, _) = generate_genesis(1000, 5);
        let (pre_state, mut block) = build_block(&genesis, 1);
        block.proposer_index = 2;

        assert_eq!(
            process_block_header(&pre_state, &block),
            Err(BlockProcessingError::HeaderInvalid {
                reason: HeaderInvalid::ProposerIndexMismatch {
                    block_proposer_index: 2,
                    expected_proposer_index: 1,
                }
            })
        );
    }

    #[test]
    fn header_rejects_wrong_parent_root() {
        let (genesis, _) = generate_genesis(1000, 5);
        let (pre_state, mut block) = build_block(&genesis, 1);
        let expected = block.parent_root;
        block.parent_root = Hash256::repeat_byte(0xff);

        assert_eq!(
            process_block_header(&pre_state, &block),
            Err(BlockProcessingError::HeaderInvalid {
                reason: HeaderInvalid::ParentBlockRootMismatch {
                    state: expected,
                    block: Hash256::repeat_byte(0xff),
                }
            })
        );
    }

    #[test]
    fn attestation_justifies_unjustified_target() {
        let state = state_with_justified_slots(&[0]);
        let attestation = signed_vote(
            Checkpoint {
                root: Hash256::repeat_byte(0x01),
                slot: 0,
            },
            Checkpoint {
                root: Hash256::repeat_byte(0x02),
                slot: 4,
            },
        );

        let post = process_attestations(&state, &[attestation]).unwrap();

        let bits = bitlist::to_bools(&post.justified_slots);
        assert!(bits[4]);
        assert_eq!(post.latest_justified.slot, 4);
        assert_eq!(post.latest_justified.root, Hash256::repeat_byte(0x02));
    }

    #[test]
    fn finalizes_across_unjustifiable_gap() {
        // Slots 0, 6 and 9 justified; 7 and 8 are not justifiable after
        // finalized slot 0, so a 6 -> 9 attestation finalizes slot 6.
        let state = state_with_justified_slots(&[0, 6, 9]);
        let attestation = signed_vote(
            Checkpoint {
                root: Hash256::repeat_byte(0x06),
                slot: 6,
            },
            Checkpoint {
                root: Hash256::repeat_byte(0x09),
                slot: 9,
            },
        );

        let post = process_attestations(&state, &[attestation]).unwrap();

        assert_eq!(post.latest_finalized.slot, 6);
        assert_eq!(post.latest_finalized.root, Hash256::repeat_byte(0x06));
    }

    #[test]
    fn no_finalization_across_justifiable_gap() {
        // Slots 1 through 3 are all justifiable after finalized slot 0, so a
        // 0 -> 4 attestation must not finalize.
        let state = state_with_justified_slots(&[0, 4]);
        let attestation = signed_vote(
            Checkpoint {
                root: Hash256::repeat_byte(0x00),
                slot: 0,
            },
            Checkpoint {
                root: Hash256::repeat_byte(0x04),
                slot: 4,
            },
        );

        let post = process_attestations(&state, &[attestation]).unwrap();

        assert_eq!(post.latest_finalized.slot, 0);
    }

    #[test]
    fn skips_attestation_with_source_at_or_after_target() {
        let state = state_with_justified_slots(&[0, 4]);
        let attestation = signed_vote(
            Checkpoint {
                root: Hash256::repeat_byte(0x04),
                slot: 4,
            },
            Checkpoint {
                root: Hash256::repeat_byte(0x00),
                slot: 0,
            },
        );

        let post = process_attestations(&state, &[attestation]).unwrap();
        assert_eq!(post, state);
    }

    #[test]
    fn skips_attestation_with_unjustified_source() {
        let state = state_with_justified_slots(&[0]);
        let attestation = signed_vote(
            Checkpoint {
                root: Hash256::repeat_byte(0x02),
                slot: 2,
            },
            Checkpoint {
                root: Hash256::repeat_byte(0x05),
                slot: 5,
            },
        );

        let post = process_attestations(&state, &[attestation]).unwrap();

        assert_eq!(bitlist::to_bools(&post.justified_slots), vec![true]);
        assert_eq!(post.latest_justified.slot, 0);
    }

    #[test]
    fn finalization_never_regresses() {
        // With slot 6 already finalized, a 4 -> 6 attestation has no
        // justifiable gap (slot 5 is before the finalized slot) but its
        // source precedes the finalized slot and must not win it back.
        let mut state = state_with_justified_slots(&[0, 4, 6, 9]);
        state.latest_finalized = Checkpoint {
            root: Hash256::repeat_byte(0x06),
            slot: 6,
        };

        let attestation = signed_vote(
            Checkpoint {
                root: Hash256::repeat_byte(0x04),
                slot: 4,
            },
            Checkpoint {
                root: Hash256::repeat_byte(0x06),
                slot: 6,
            },
        );

        let post = process_attestations(&state, &[attestation]).unwrap();
        assert_eq!(post.latest_finalized.slot, 6);
        assert_eq!(post.latest_finalized.root, Hash256::repeat_byte(0x06));
    }
}
