use crate::error::{Error, InvalidAttestation};
use crate::lmd_ghost::{get_head, get_latest_finalized, get_latest_justified};
use parking_lot::RwLock;
use slot_clock::SlotClock;
use state_transition::{process_block, process_slots};
use std::collections::HashMap;
use store::MemoryStore;
use tree_hash::TreeHash;
use types::{Block, Checkpoint, Config, Hash256, SignedBlock, SignedVote, Slot, ValidatorIndex};

/// The fork-choice store. All fields are owned here; `ForkChoice` provides
/// the locked public surface.
#[derive(Debug)]
pub struct Store {
    pub storage: MemoryStore,
    pub head: Hash256,
    /// Root of the genesis anchor block. The zero root found in early
    /// checkpoints is an alias for it.
    pub anchor_root: Hash256,
    pub latest_justified: Checkpoint,
    pub latest_finalized: Checkpoint,
    pub safe_target: Checkpoint,
    /// Votes admitted into head selection, by validator.
    pub latest_known_votes: HashMap<ValidatorIndex, Checkpoint>,
    /// Gossip votes awaiting admission at the next acceptance interval.
    pub latest_new_votes: HashMap<ValidatorIndex, Checkpoint>,
    pub clock: SlotClock,
    pub config: Config,
    /// Vote count a checkpoint needs before it can become the safe target.
    pub safe_target_quorum: u64,
}

impl Store {
    /// Anchor a store on a genesis state and its block.
    pub fn new(anchor_state: types::State, anchor_block: Block) -> Result<Self, Error> {
        let state_root = anchor_state.tree_hash_root();
        if anchor_block.state_root != state_root {
            return Err(Error::InvalidAnchor {
                block: anchor_block.state_root,
                state: state_root,
            });
        }

        let anchor_root = anchor_block.tree_hash_root();
        let anchor_checkpoint = Checkpoint {
            root: anchor_root,
            slot: anchor_block.slot,
        };
        let config = anchor_state.config.clone();
        let clock = SlotClock::new(config.genesis_time, anchor_block.slot);

        let mut storage = MemoryStore::new();
        storage.put_state(anchor_root, anchor_state);
        storage.put_block(anchor_root, anchor_block);

        Ok(Self {
            storage,
            head: anchor_root,
            anchor_root,
            latest_justified: anchor_checkpoint.clone(),
            latest_finalized: anchor_checkpoint.clone(),
            safe_target: anchor_checkpoint,
            latest_known_votes: HashMap::new(),
            latest_new_votes: HashMap::new(),
            clock,
            safe_target_quorum: ceil_div(2 * config.num_validators, 3),
            config,
        })
    }

    /// Insert a block: run the state transition from the parent state, check
    /// the claimed state root, store the results, then feed the embedded
    /// attestations into fork choice and recompute the head.
    pub fn process_block(&mut self, block: &Block) -> Result<Hash256, Error> {
        if !self.storage.contains_block(&block.parent_root) {
            return Err(Error::UnknownParent(block.parent_root));
        }
        let parent_state = self
            .storage
            .get_state(&block.parent_root)
            .ok_or(Error::UnknownParentState(block.parent_root))?;

        let pre_state = process_slots(parent_state, block.slot)?;
        let post_state = process_block(&pre_state, block)?;

        let state_root = post_state.tree_hash_root();
        if state_root != block.state_root {
            return Err(Error::StateRootMismatch {
                block: block.state_root,
                local: state_root,
            });
        }

        let block_root = block.tree_hash_root();
        self.storage.put_block(block_root, block.clone());
        self.storage.put_state(block_root, post_state);

        // On-chain attestations are applied after the block itself; invalid
        // ones are dropped without failing the block.
        for attestation in block.body.attestations.iter() {
            let _ = self.process_attestation(attestation, true);
        }

        self.update_checkpoints();
        self.update_head();

        Ok(block_root)
    }

    /// Validate an attestation and record its target as the validator's
    /// latest vote. On-chain votes go straight into the known set; gossip
    /// votes wait in the new set until the next acceptance interval.
    pub fn process_attestation(
        &mut self,
        attestation: &SignedVote,
        is_from_block: bool,
    ) -> Result<(), Error> {
        self.validate_attestation(attestation, is_from_block)?;

        let vote = &attestation.data;
        if is_from_block {
            let known_slot = {
                let known = self
                    .latest_known_votes
                    .entry(vote.validator_id)
                    .or_insert_with(|| vote.target.clone());
                if known.slot < vote.target.slot {
                    *known = vote.target.clone();
                }
                known.slot
            };
            // A pending vote at or below the recorded target is superseded.
            if self
                .latest_new_votes
                .get(&vote.validator_id)
                .map_or(false, |pending| pending.slot <= known_slot)
            {
                self.latest_new_votes.remove(&vote.validator_id);
            }
        } else {
            let pending = self
                .latest_new_votes
                .entry(vote.validator_id)
                .or_insert_with(|| vote.target.clone());
            if pending.slot < vote.target.slot {
                *pending = vote.target.clone();
            }
        }

        Ok(())
    }

    /// The devnet attestation checks: both checkpoints resolve to stored
    /// blocks, slots are consistent, and the vote is not from the future.
    pub fn validate_attestation(
        &self,
        attestation: &SignedVote,
        is_from_block: bool,
    ) -> Result<(), InvalidAttestation> {
        let vote = &attestation.data;

        let source_block =
            self.checkpoint_block(&vote.source.root)
                .ok_or(InvalidAttestation::UnknownSourceBlock {
                    root: vote.source.root,
                })?;
        let target_block =
            self.checkpoint_block(&vote.target.root)
                .ok_or(InvalidAttestation::UnknownTargetBlock {
                    root: vote.target.root,
                })?;

        if source_block.slot > target_block.slot {
            return Err(InvalidAttestation::SourceAfterTarget {
                source: source_block.slot,
                target: target_block.slot,
            });
        }
        if vote.source.slot > vote.target.slot {
            return Err(InvalidAttestation::SourceAfterTarget {
                source: vote.source.slot,
                target: vote.target.slot,
            });
        }
        if source_block.slot != vote.source.slot {
            return Err(InvalidAttestation::SourceSlotMismatch {
                checkpoint: vote.source.slot,
                block: source_block.slot,
            });
        }
        if target_block.slot != vote.target.slot {
            return Err(InvalidAttestation::TargetSlotMismatch {
                checkpoint: vote.target.slot,
                block: target_block.slot,
            });
        }

        let current_slot = self.clock.current_slot();
        if vote.slot > current_slot + 1 {
            return Err(InvalidAttestation::FutureVote {
                vote_slot: vote.slot,
                current_slot,
            });
        }
        if !is_from_block && vote.slot > current_slot {
            return Err(InvalidAttestation::FutureVote {
                vote_slot: vote.slot,
                current_slot,
            });
        }

        Ok(())
    }

    /// Advance the clock by one interval and run the interval's callback.
    /// Intervals: 0 = accept votes when proposing, 1 = voting, 2 = safe
    /// target, 3 = accept votes.
    pub fn tick_interval(&mut self, has_proposal: bool) {
        let interval = self.clock.tick();
        self.on_interval(interval, has_proposal);
    }

    /// Tick the store forward until it reaches `unix_time`. A pre-genesis
    /// time is a no-op. `has_proposal` applies to the last interval reached.
    pub fn advance_time(&mut self, unix_time: u64, has_proposal: bool) {
        let target = self.clock.target_intervals(unix_time);
        while self.clock.intervals() < target {
            let is_last = self.clock.intervals() + 1 == target;
            let interval = self.clock.tick();
            self.on_interval(interval, has_proposal && is_last);
        }
    }

    fn on_interval(&mut self, interval: u64, has_proposal: bool) {
        match interval {
            0 => {
                if has_proposal {
                    self.accept_new_votes();
                }
            }
            1 => {}
            2 => self.update_safe_target(),
            _ => self.accept_new_votes(),
        }
    }

    /// Promote pending gossip votes into the known set; the newest target
    /// wins. Whatever does not win is already superseded, so the pending map
    /// drains either way.
    pub fn accept_new_votes(&mut self) {
        let pending: Vec<_> = self.latest_new_votes.drain().collect();
        for (validator, checkpoint) in pending {
            match self.latest_known_votes.get(&validator) {
                Some(known) if known.slot >= checkpoint.slot => {}
                _ => {
                    self.latest_known_votes.insert(validator, checkpoint);
                }
            }
        }
        self.update_head();
    }

    /// Recompute the safe target: the deepest descendant of the justified
    /// root backed by at least `safe_target_quorum` known votes.
    pub fn update_safe_target(&mut self) {
        let root = self.justified_root();
        let target = get_head(
            self.storage.blocks(),
            root,
            self.latest_known_votes.values(),
            self.safe_target_quorum,
        );
        if let Some(block) = self.storage.get_block(&target) {
            self.safe_target = Checkpoint {
                root: target,
                slot: block.slot,
            };
        }
    }

    /// Re-derive the justified and finalized checkpoints from the recorded
    /// states. Finalization only ever advances, and never past the justified
    /// slot: the two maxima can come from different forks, so a finalized
    /// candidate above the justified slot is held back until a state
    /// justifies that far.
    fn update_checkpoints(&mut self) {
        if let Some(justified) = get_latest_justified(self.storage.states()) {
            if !justified.root.is_zero() {
                self.latest_justified = justified;
            }
        }
        if let Some(finalized) = get_latest_finalized(self.storage.states()) {
            if !finalized.root.is_zero()
                && finalized.slot >= self.latest_finalized.slot
                && finalized.slot <= self.latest_justified.slot
            {
                self.latest_finalized = finalized;
            }
        }
    }

    /// Recompute the head from the justified root and the known votes.
    pub fn update_head(&mut self) {
        self.head = get_head(
            self.storage.blocks(),
            self.justified_root(),
            self.latest_known_votes.values(),
            0,
        );
    }

    /// The root head selection walks from.
    fn justified_root(&self) -> Hash256 {
        if self.latest_justified.root.is_zero() {
            self.anchor_root
        } else {
            self.latest_justified.root
        }
    }

    /// Resolve a checkpoint root to its block; the zero root is an alias for
    /// the genesis anchor.
    pub(crate) fn checkpoint_block(&self, root: &Hash256) -> Option<&Block> {
        if root.is_zero() {
            self.storage.get_block(&self.anchor_root)
        } else {
            self.storage.get_block(root)
        }
    }

    /// The head as a checkpoint.
    pub fn head_checkpoint(&self) -> Checkpoint {
        let slot = self.storage.get_block(&self.head).map_or(0, |b| b.slot);
        Checkpoint {
            root: self.head,
            slot,
        }
    }

    pub fn current_slot(&self) -> Slot {
        self.clock.current_slot()
    }

    pub fn current_interval(&self) -> u64 {
        self.clock.current_interval()
    }
}

fn ceil_div(numerator: u64, denominator: u64) -> u64 {
    (numerator + denominator - 1) / denominator
}

/// The locked public surface of the fork-choice store.
///
/// Writers (`process_block`, `process_attestation`, ticks, production) hold
/// the write lock for the whole operation; snapshot accessors hold the read
/// lock.
#[derive(Debug)]
pub struct ForkChoice {
    store: RwLock<Store>,
}

impl ForkChoice {
    pub fn new(anchor_state: types::State, anchor_block: Block) -> Result<Self, Error> {
        Ok(Self {
            store: RwLock::new(Store::new(anchor_state, anchor_block)?),
        })
    }

    pub fn process_block(&self, block: &Block) -> Result<Hash256, Error> {
        self.store.write().process_block(block)
    }

    /// Apply a gossip attestation.
    pub fn process_attestation(&self, attestation: &SignedVote) -> Result<(), Error> {
        self.store.write().process_attestation(attestation, false)
    }

    pub fn tick_interval(&self, has_proposal: bool) {
        self.store.write().tick_interval(has_proposal)
    }

    pub fn advance_time(&self, unix_time: u64, has_proposal: bool) {
        self.store.write().advance_time(unix_time, has_proposal)
    }

    /// Build, store and return a signed block for the slot. Holds the write
    /// lock throughout: production inserts the block and its state.
    pub fn produce_block(
        &self,
        slot: Slot,
        proposer: ValidatorIndex,
    ) -> Result<SignedBlock, Error> {
        self.store.write().produce_block(slot, proposer)
    }

    /// Build a vote for the slot from a read snapshot.
    pub fn produce_vote(&self, slot: Slot, validator: ValidatorIndex) -> types::Vote {
        self.store.read().produce_vote(slot, validator)
    }

    pub fn current_slot(&self) -> Slot {
        self.store.read().current_slot()
    }

    pub fn current_interval(&self) -> u64 {
        self.store.read().current_interval()
    }

    pub fn head_checkpoint(&self) -> Checkpoint {
        self.store.read().head_checkpoint()
    }

    pub fn latest_justified(&self) -> Checkpoint {
        self.store.read().latest_justified.clone()
    }

    pub fn latest_finalized(&self) -> Checkpoint {
        self.store.read().latest_finalized.clone()
    }

    pub fn safe_target(&self) -> Checkpoint {
        self.store.read().safe_target.clone()
    }

    pub fn genesis_time(&self) -> u64 {
        self.store.read().clock.genesis_time()
    }

    pub fn num_validators(&self) -> u64 {
        self.store.read().config.num_validators
    }

    pub fn is_proposer(&self, slot: Slot, validator: ValidatorIndex) -> bool {
        types::is_proposer(slot, validator, self.num_validators())
    }

    pub fn contains_block(&self, root: &Hash256) -> bool {
        self.store.read().storage.contains_block(root)
    }

    /// Fetch a block wrapped for the wire, with the placeholder signature.
    pub fn get_signed_block(&self, root: &Hash256) -> Option<SignedBlock> {
        self.store
            .read()
            .storage
            .get_block(root)
            .map(|block| SignedBlock {
                message: block.clone(),
                signature: Hash256::zero(),
            })
    }
}
