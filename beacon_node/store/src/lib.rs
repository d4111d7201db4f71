//! In-memory block and state storage.
//!
//! Blocks and post-states are keyed by the block's hash-tree-root and never
//! mutated once inserted. The store carries no lock of its own: the
//! fork-choice store holds it behind its single reader-writer lock.

use std::collections::HashMap;
use types::{Block, Hash256, State};

#[derive(Debug, Default)]
pub struct MemoryStore {
    blocks: HashMap<Hash256, Block>,
    states: HashMap<Hash256, State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_block(&self, root: &Hash256) -> Option<&Block> {
        self.blocks.get(root)
    }

    pub fn put_block(&mut self, root: Hash256, block: Block) {
        self.blocks.insert(root, block);
    }

    pub fn contains_block(&self, root: &Hash256) -> bool {
        self.blocks.contains_key(root)
    }

    pub fn get_state(&self, root: &Hash256) -> Option<&State> {
        self.states.get(root)
    }

    pub fn put_state(&mut self, root: Hash256, state: State) {
        self.states.insert(root, state);
    }

    pub fn blocks(&self) -> &HashMap<Hash256, Block> {
        &self.blocks
    }

    pub fn states(&self) -> &HashMap<Hash256, State> {
        &self.states
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}
