use ssz_types::{BitList, VariableList};
use tree_hash::TreeHash;
use types::{Block, BlockBody, BlockHeader, Checkpoint, Config, Hash256, State};

/// Build the genesis state and its matching genesis block.
///
/// The block's `state_root` commits to the genesis state, so the pair anchors
/// the fork-choice store and the checkpoints all nodes agree on.
pub fn generate_genesis(genesis_time: u64, num_validators: u64) -> (State, Block) {
    let body = BlockBody::default();
    let header = BlockHeader {
        slot: 0,
        proposer_index: 0,
        parent_root: Hash256::zero(),
        state_root: Hash256::zero(),
        body_root: body.tree_hash_root(),
    };

    let state = State {
        config: Config {
            num_validators,
            genesis_time,
        },
        slot: 0,
        latest_block_header: header,
        latest_justified: Checkpoint::default(),
        latest_finalized: Checkpoint::default(),
        historical_block_hashes: VariableList::empty(),
        justified_slots: empty_bits(),
        justification_roots: VariableList::empty(),
        justification_validators: empty_bits(),
    };

    let block = Block {
        slot: 0,
        proposer_index: 0,
        parent_root: Hash256::zero(),
        state_root: state.tree_hash_root(),
        body,
    };

    (state, block)
}

fn empty_bits<N: typenum::Unsigned + Clone>() -> BitList<N> {
    BitList::with_capacity(0).expect("a zero-length bitlist is below any limit")
}
