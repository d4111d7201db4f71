//! The lean consensus state transition function.
//!
//! All operations are pure: they take a state by reference and return a new
//! state, leaving the input untouched. The fork-choice store drives them and
//! owns all synchronization.

pub mod errors;
mod genesis;
mod justification;
mod per_block_processing;
mod per_slot_processing;

pub use errors::{BlockProcessingError, HeaderInvalid, SlotProcessingError};
pub use genesis::generate_genesis;
pub use justification::is_justifiable_after;
pub use per_block_processing::{process_attestations, process_block, process_block_header};
pub use per_slot_processing::process_slots;
