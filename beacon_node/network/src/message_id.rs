//! Gossipsub message identity.

use sha2::{Digest, Sha256};

/// Domain mixed into IDs of messages whose data is not valid Snappy.
pub const MESSAGE_DOMAIN_INVALID_SNAPPY: [u8; 4] = [0, 0, 0, 0];
/// Domain mixed into IDs of messages whose data decompressed cleanly.
pub const MESSAGE_DOMAIN_VALID_SNAPPY: [u8; 4] = [1, 0, 0, 0];

pub const MESSAGE_ID_LEN: usize = 20;

/// Derive the gossipsub message ID for a raw message on `topic`:
/// `SHA256(domain ‖ LE64(len(topic)) ‖ topic ‖ payload)[..20]`, where the
/// payload is the Snappy-decompressed data when `data` is valid Snappy block
/// format and the raw data otherwise.
pub fn compute_message_id(topic: &str, data: &[u8]) -> [u8; MESSAGE_ID_LEN] {
    match snap::raw::Decoder::new().decompress_vec(data) {
        Ok(decompressed) => digest_with_domain(MESSAGE_DOMAIN_VALID_SNAPPY, topic, &decompressed),
        Err(_) => digest_with_domain(MESSAGE_DOMAIN_INVALID_SNAPPY, topic, data),
    }
}

fn digest_with_domain(domain: [u8; 4], topic: &str, payload: &[u8]) -> [u8; MESSAGE_ID_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update((topic.len() as u64).to_le_bytes());
    hasher.update(topic.as_bytes());
    hasher.update(payload);

    let digest = hasher.finalize();
    let mut id = [0; MESSAGE_ID_LEN];
    id.copy_from_slice(&digest[..MESSAGE_ID_LEN]);
    id
}
