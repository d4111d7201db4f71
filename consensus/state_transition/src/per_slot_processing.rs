use crate::errors::SlotProcessingError;
use tree_hash::TreeHash;
use types::{Slot, State};

/// Advance `state` through empty slots until `target_slot`.
///
/// Before each advance, the state root left pending by the previous block is
/// cached into `latest_block_header`. The header root therefore commits to
/// the pre-block state without creating a circular dependency during block
/// construction.
pub fn process_slots(state: &State, target_slot: Slot) -> Result<State, SlotProcessingError> {
    if state.slot >= target_slot {
        return Err(SlotProcessingError::NotFutureSlot {
            state_slot: state.slot,
            target_slot,
        });
    }

    let mut state = state.clone();
    while state.slot < target_slot {
        if state.latest_block_header.state_root.is_zero() {
            state.latest_block_header.state_root = state.tree_hash_root();
        }
        state.slot += 1;
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_genesis;

    #[test]
    fn rejects_non_future_target() {
        let (state, _) = generate_genesis(1000, 5);

        assert_eq!(
            process_slots(&state, 0),
            Err(SlotProcessingError::NotFutureSlot {
                state_slot: 0,
                target_slot: 0,
            })
        );

        let advanced = process_slots(&state, 3).unwrap();
        assert_eq!(
            process_slots(&advanced, 2),
            Err(SlotProcessingError::NotFutureSlot {
                state_slot: 3,
                target_slot: 2,
            })
        );
    }

    #[test]
    fn caches_state_root_once() {
        let (state, _) = generate_genesis(1000, 5);
        let genesis_root = state.tree_hash_root();

        let advanced = process_slots(&state, 1).unwrap();
        assert_eq!(advanced.slot, 1);
        assert_eq!(advanced.latest_block_header.state_root, genesis_root);

        // Advancing further must not overwrite the cached root.
        let further = process_slots(&advanced, 4).unwrap();
        assert_eq!(further.slot, 4);
        assert_eq!(further.latest_block_header.state_root, genesis_root);
    }

    #[test]
    fn input_state_is_untouched() {
        let (state, _) = generate_genesis(1000, 5);
        let before = state.clone();

        process_slots(&state, 2).unwrap();
        assert_eq!(state, before);
    }
}
