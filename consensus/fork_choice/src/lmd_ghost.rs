//! Head selection over the block tree.

use std::collections::HashMap;
use types::{Block, Checkpoint, Hash256, State};

/// Walk the block tree from `root` towards the leaves, at each node following
/// the child with the most latest-vote support. Only children whose score
/// reaches `min_score` are followed; ties break on higher slot, then on
/// lexicographically greater root, so every node picks the same head.
pub fn get_head<'a>(
    blocks: &HashMap<Hash256, Block>,
    root: Hash256,
    votes: impl IntoIterator<Item = &'a Checkpoint>,
    min_score: u64,
) -> Hash256 {
    // Each vote supports its checkpoint and every ancestor back to `root`.
    let mut scores: HashMap<Hash256, u64> = HashMap::new();
    for vote in votes {
        if vote.root.is_zero() {
            continue;
        }
        let mut current = vote.root;
        while let Some(block) = blocks.get(&current) {
            *scores.entry(current).or_insert(0) += 1;
            if current == root {
                break;
            }
            current = block.parent_root;
        }
    }

    let mut children: HashMap<Hash256, Vec<Hash256>> = HashMap::new();
    for (block_root, block) in blocks {
        children
            .entry(block.parent_root)
            .or_default()
            .push(*block_root);
    }

    let mut head = root;
    loop {
        let best_child = children
            .get(&head)
            .into_iter()
            .flatten()
            .map(|child| {
                let score = scores.get(child).copied().unwrap_or(0);
                (score, blocks.get(child).map_or(0, |b| b.slot), *child)
            })
            .filter(|(score, _, _)| *score >= min_score)
            .max();

        match best_child {
            Some((_, _, child)) => head = child,
            None => return head,
        }
    }
}

/// The justified checkpoint with the highest slot across all recorded
/// states; ties break on the lexicographically greater root.
pub fn get_latest_justified(states: &HashMap<Hash256, State>) -> Option<Checkpoint> {
    states
        .values()
        .map(|state| &state.latest_justified)
        .max_by_key(|checkpoint| (checkpoint.slot, checkpoint.root))
        .cloned()
}

/// As `get_latest_justified`, for the finalized checkpoint.
pub fn get_latest_finalized(states: &HashMap<Hash256, State>) -> Option<Checkpoint> {
    states
        .values()
        .map(|state| &state.latest_finalized)
        .max_by_key(|checkpoint| (checkpoint.slot, checkpoint.root))
        .cloned()
}
