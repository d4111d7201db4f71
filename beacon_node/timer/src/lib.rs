//! A per-interval timer driving the fork-choice clock and validator duties.
//!
//! Every interval second the task advances store time, then dispatches the
//! duty for the interval: propose at interval 0, attest at interval 1.
//! Produced messages go out through the network channel; the transport layer
//! publishes them.

use fork_choice::ForkChoice;
use network::{NetworkMessage, PubsubMessage};
use slog::{debug, error, info, o, Logger};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, oneshot};
use types::{
    Hash256, SignedVote, Slot, ValidatorIndex, INTERVALS_PER_SLOT, SECONDS_PER_INTERVAL,
    SECONDS_PER_SLOT,
};

/// The validator indices this node runs duties for.
#[derive(Debug, Clone, Default)]
pub struct ValidatorDuties {
    pub indices: Vec<ValidatorIndex>,
}

impl ValidatorDuties {
    pub fn new(indices: Vec<ValidatorIndex>) -> Self {
        Self { indices }
    }

    /// Whether any local validator proposes at `slot`.
    pub fn has_proposal(&self, chain: &ForkChoice, slot: Slot) -> bool {
        self.indices
            .iter()
            .any(|&index| chain.is_proposer(slot, index))
    }
}

/// Spawn the timer task. Dropping or signalling the returned sender stops it.
pub fn spawn(
    chain: Arc<ForkChoice>,
    duties: ValidatorDuties,
    network_send: mpsc::UnboundedSender<NetworkMessage>,
    log: Logger,
) -> oneshot::Sender<()> {
    let log = log.new(o!("service" => "timer"));
    let (exit_signal, mut exit) = oneshot::channel();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SECONDS_PER_INTERVAL));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut exit => {
                    debug!(log, "Timer service shutting down");
                    return;
                }
                _ = interval.tick() => {
                    on_tick(&chain, &duties, &network_send, &log);
                }
            }
        }
    });

    exit_signal
}

fn on_tick(
    chain: &ForkChoice,
    duties: &ValidatorDuties,
    network_send: &mpsc::UnboundedSender<NetworkMessage>,
    log: &Logger,
) {
    let now = unix_time_now();
    let genesis_time = chain.genesis_time();
    if now < genesis_time {
        return;
    }

    let slot = (now - genesis_time) / SECONDS_PER_SLOT;
    let interval = ((now - genesis_time) / SECONDS_PER_INTERVAL) % INTERVALS_PER_SLOT;
    let has_proposal = interval == 0 && duties.has_proposal(chain, slot);

    chain.advance_time(now, has_proposal);

    match interval {
        0 => try_propose(chain, duties, network_send, slot, log),
        1 => try_attest(chain, duties, network_send, slot, log),
        _ => {}
    }
}

fn try_propose(
    chain: &ForkChoice,
    duties: &ValidatorDuties,
    network_send: &mpsc::UnboundedSender<NetworkMessage>,
    slot: Slot,
    log: &Logger,
) {
    for &index in &duties.indices {
        if !chain.is_proposer(slot, index) {
            continue;
        }

        match chain.produce_block(slot, index) {
            Ok(signed) => {
                info!(log, "Proposed block";
                    "slot" => slot,
                    "proposer" => index,
                    "attestations" => signed.message.body.attestations.len()
                );
                publish(
                    network_send,
                    PubsubMessage::Block(Box::new(signed)),
                    log,
                );
            }
            Err(reason) => {
                error!(log, "Block proposal failed";
                    "slot" => slot,
                    "proposer" => index,
                    "reason" => ?reason
                );
            }
        }
    }
}

fn try_attest(
    chain: &ForkChoice,
    duties: &ValidatorDuties,
    network_send: &mpsc::UnboundedSender<NetworkMessage>,
    slot: Slot,
    log: &Logger,
) {
    for &index in &duties.indices {
        let vote = chain.produce_vote(slot, index);
        debug!(log, "Publishing attestation";
            "slot" => slot,
            "validator" => index,
            "target_slot" => vote.target.slot
        );
        publish(
            network_send,
            PubsubMessage::Vote(Box::new(SignedVote {
                data: vote,
                signature: Hash256::zero(),
            })),
            log,
        );
    }
}

fn publish(
    network_send: &mpsc::UnboundedSender<NetworkMessage>,
    message: PubsubMessage,
    log: &Logger,
) {
    if network_send
        .send(NetworkMessage::Publish { message })
        .is_err()
    {
        error!(log, "Network channel closed; dropping outbound message");
    }
}

fn unix_time_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}
