//! Routes inbound network messages into the fork-choice store.
//!
//! Gossip arrives on an unbounded channel and mutates the store under its
//! write lock; req/resp queries are answered synchronously from read
//! snapshots. Invalid messages are dropped with a log line and never touch
//! the store.

use crate::rpc::methods::{BlocksByRootRequest, StatusMessage};
use crate::types::PubsubMessage;
use fork_choice::{Error, ForkChoice};
use slog::{debug, o, warn, Logger};
use std::sync::Arc;
use tokio::sync::mpsc;
use types::SignedBlock;

/// Messages the router consumes from the transport layer.
#[derive(Debug)]
pub enum RouterMessage {
    Pubsub(PubsubMessage),
}

pub struct Router {
    chain: Arc<ForkChoice>,
    log: Logger,
}

impl Router {
    pub fn new(chain: Arc<ForkChoice>, log: Logger) -> Self {
        Router {
            chain,
            log: log.new(o!("service" => "router")),
        }
    }

    /// Move the router onto a task draining an unbounded channel; the
    /// returned sender is handed to the transport layer.
    pub fn spawn(self) -> mpsc::UnboundedSender<RouterMessage> {
        let (sender, mut receiver) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            debug!(self.log, "Network message router started");
            while let Some(message) = receiver.recv().await {
                self.handle_message(message);
            }
            debug!(self.log, "Network message router stopped");
        });

        sender
    }

    pub fn handle_message(&self, message: RouterMessage) {
        match message {
            RouterMessage::Pubsub(PubsubMessage::Block(block)) => self.on_gossip_block(*block),
            RouterMessage::Pubsub(PubsubMessage::Vote(vote)) => {
                self.on_gossip_vote(vote.as_ref())
            }
        }
    }

    pub fn on_gossip_block(&self, block: SignedBlock) {
        let slot = block.message.slot;
        match self.chain.process_block(&block.message) {
            Ok(root) => {
                debug!(self.log, "Imported gossip block";
                    "slot" => slot,
                    "root" => ?root
                );
            }
            Err(Error::UnknownParent(parent)) => {
                // The syncer requests missing parents over req/resp.
                debug!(self.log, "Gossip block has unknown parent";
                    "slot" => slot,
                    "parent" => ?parent
                );
            }
            Err(reason) => {
                warn!(self.log, "Rejected gossip block";
                    "slot" => slot,
                    "reason" => ?reason
                );
            }
        }
    }

    pub fn on_gossip_vote(&self, vote: &types::SignedVote) {
        if let Err(reason) = self.chain.process_attestation(vote) {
            debug!(self.log, "Dropped gossip vote";
                "validator" => vote.data.validator_id,
                "slot" => vote.data.slot,
                "reason" => ?reason
            );
        }
    }

    /// Answer a peer's status with our own.
    pub fn on_status_request(&self, peer_status: &StatusMessage) -> StatusMessage {
        if !self.peer_status_is_compatible(peer_status) {
            debug!(self.log, "Peer status conflicts with local chain";
                "peer_finalized_slot" => peer_status.finalized.slot
            );
        }
        status_message(&self.chain)
    }

    /// Serve stored blocks for the requested roots, in request order.
    pub fn on_blocks_by_root_request(&self, request: &BlocksByRootRequest) -> Vec<SignedBlock> {
        request
            .block_roots
            .iter()
            .take(types::MAX_REQUEST_BLOCKS as usize)
            .filter_map(|root| self.chain.get_signed_block(root))
            .collect()
    }

    /// A peer is incompatible when it finalizes a root we know under a
    /// different slot.
    pub fn peer_status_is_compatible(&self, peer_status: &StatusMessage) -> bool {
        if peer_status.finalized.slot == 0 {
            return true;
        }
        match self.chain.get_signed_block(&peer_status.finalized.root) {
            Some(block) => block.message.slot == peer_status.finalized.slot,
            None => true,
        }
    }
}

/// Our side of the status handshake, from a store snapshot.
pub fn status_message(chain: &ForkChoice) -> StatusMessage {
    StatusMessage {
        finalized: chain.latest_finalized(),
        head: chain.head_checkpoint(),
    }
}
