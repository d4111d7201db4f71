use crate::{Hash256, Slot};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// A (root, slot) reference to a block, used for votes and for
/// justification/finalization tracking.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Hash, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct Checkpoint {
    pub root: Hash256,
    pub slot: Slot,
}
