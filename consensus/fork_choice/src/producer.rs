//! Deterministic block and vote construction from the store.

use crate::error::Error;
use crate::store::Store;
use ssz_types::VariableList;
use state_transition::{process_block, process_slots};
use tree_hash::TreeHash;
use types::{
    Block, BlockBody, Hash256, SignedBlock, SignedVote, Slot, ValidatorIndex,
    ValidatorRegistryLimit, Vote,
};

impl Store {
    /// Build a block for `slot` on top of the current head, embedding the
    /// known votes, then store it and recompute the head. The caller must be
    /// the round-robin proposer for the slot.
    pub fn produce_block(
        &mut self,
        slot: Slot,
        proposer: ValidatorIndex,
    ) -> Result<SignedBlock, Error> {
        let expected = slot % self.config.num_validators;
        if proposer != expected {
            return Err(Error::NotProposer {
                slot,
                validator: proposer,
                expected,
            });
        }

        let parent_root = self.head;
        let parent_state = self
            .storage
            .get_state(&parent_root)
            .ok_or(Error::UnknownParentState(parent_root))?
            .clone();

        let attestations = self.collect_attestations()?;

        let pre_state = process_slots(&parent_state, slot)?;
        let mut block = Block {
            slot,
            proposer_index: proposer,
            parent_root,
            state_root: Hash256::zero(),
            body: BlockBody { attestations },
        };

        let post_state = process_block(&pre_state, &block)?;
        block.state_root = post_state.tree_hash_root();

        let block_root = block.tree_hash_root();
        self.storage.put_block(block_root, block.clone());
        self.storage.put_state(block_root, post_state);
        self.update_head();

        Ok(SignedBlock {
            message: block,
            signature: Hash256::zero(),
        })
    }

    /// Turn the known votes into attestations for block inclusion. Votes
    /// whose checkpoint is unresolvable are left out; iteration is in
    /// validator order so every proposer builds the same body from the same
    /// snapshot.
    fn collect_attestations(
        &self,
    ) -> Result<VariableList<SignedVote, ValidatorRegistryLimit>, Error> {
        let mut validators: Vec<ValidatorIndex> =
            self.latest_known_votes.keys().copied().collect();
        validators.sort_unstable();

        let mut attestations = VariableList::empty();
        for validator in validators {
            let checkpoint = &self.latest_known_votes[&validator];
            if checkpoint.root.is_zero() || !self.storage.contains_block(&checkpoint.root) {
                continue;
            }

            attestations.push(SignedVote {
                data: Vote {
                    validator_id: validator,
                    slot: checkpoint.slot,
                    head: checkpoint.clone(),
                    target: checkpoint.clone(),
                    source: self.latest_justified.clone(),
                },
                signature: Hash256::zero(),
            })?;
        }

        Ok(attestations)
    }

    /// Build a vote for `slot`: head and target are the current head, the
    /// source is the latest justified checkpoint.
    pub fn produce_vote(&self, slot: Slot, validator: ValidatorIndex) -> Vote {
        let head = self.head_checkpoint();
        Vote {
            validator_id: validator,
            slot,
            head: head.clone(),
            target: head,
            source: self.latest_justified.clone(),
        }
    }
}
