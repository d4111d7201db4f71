//! The LMD-GHOST fork-choice store for the lean consensus protocol.
//!
//! A single `Store` value owns the block/state storage, the latest-vote maps
//! and the interval clock. `ForkChoice` wraps it in one reader-writer lock:
//! every mutation (block arrival, attestation gossip, interval ticks, block
//! production) takes the write lock for the whole operation, snapshots take
//! the read lock.

mod error;
mod lmd_ghost;
mod producer;
mod store;

pub use crate::error::{Error, InvalidAttestation};
pub use crate::lmd_ghost::{get_head, get_latest_justified};
pub use crate::store::{ForkChoice, Store};
