use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// Immutable chain configuration. The validator set is fixed from genesis.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct Config {
    pub num_validators: u64,
    pub genesis_time: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_hash::TreeHash;

    #[test]
    fn config_root_matches_reference() {
        let config = Config {
            num_validators: 5,
            genesis_time: 1000,
        };
        assert_eq!(
            hex::encode(config.tree_hash_root().as_bytes()),
            "8ef40f45cfdd5684d5bfa333c650f233cb05edab4183f2191baeb91ed4fae9dd"
        );
    }
}
