//! Fan-in arbitration: one table entry per output signal group.
//!
//! The policies deliberately differ. Device-state changes resolve
//! first-registered-wins; transmit and handshake groups resolve
//! last-registered-wins. Handlers are expected never to collide, so neither
//! rule is a correctness guarantee, only a deterministic tie-break.

use crate::handler::HandlerOutputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalGroup {
    AddressChange,
    ConfigChange,
    Transmit,
    HandshakeOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArbitrationPolicy {
    /// Lowest registration index with its trigger raised wins.
    PriorityEncoder,
    /// Every asserting handler drives the group; the last one registered
    /// determines the result.
    LastAssertedWins,
    /// Trigger is the OR of several strobes; the whole payload of the last
    /// asserting handler is routed through.
    OrReduce,
}

pub(crate) struct GroupArbiter {
    pub group: SignalGroup,
    pub policy: ArbitrationPolicy,
    asserted: fn(&HandlerOutputs) -> bool,
    route: fn(&mut HandlerOutputs, &HandlerOutputs),
}

impl GroupArbiter {
    fn select(&self, outputs: &[HandlerOutputs]) -> Option<usize> {
        let mut candidates = outputs.iter();
        match self.policy {
            ArbitrationPolicy::PriorityEncoder => candidates.position(self.asserted),
            ArbitrationPolicy::LastAssertedWins | ArbitrationPolicy::OrReduce => {
                candidates.rposition(self.asserted)
            }
        }
    }
}

pub(crate) const GROUP_COUNT: usize = 4;

pub(crate) const ARBITRATION_TABLE: [GroupArbiter; GROUP_COUNT] = [
    GroupArbiter {
        group: SignalGroup::AddressChange,
        policy: ArbitrationPolicy::PriorityEncoder,
        asserted: address_changed,
        route: route_address,
    },
    GroupArbiter {
        group: SignalGroup::ConfigChange,
        policy: ArbitrationPolicy::PriorityEncoder,
        asserted: config_changed,
        route: route_config,
    },
    GroupArbiter {
        group: SignalGroup::Transmit,
        policy: ArbitrationPolicy::LastAssertedWins,
        asserted: tx_valid,
        route: route_tx,
    },
    GroupArbiter {
        group: SignalGroup::HandshakeOut,
        policy: ArbitrationPolicy::OrReduce,
        asserted: handshake_requested,
        route: route_handshake,
    },
];

fn address_changed(outputs: &HandlerOutputs) -> bool {
    outputs.address_changed
}

fn config_changed(outputs: &HandlerOutputs) -> bool {
    outputs.config_changed
}

fn tx_valid(outputs: &HandlerOutputs) -> bool {
    outputs.tx.valid.any()
}

fn handshake_requested(outputs: &HandlerOutputs) -> bool {
    outputs.handshakes_out.requested()
}

fn route_address(shared: &mut HandlerOutputs, winner: &HandlerOutputs) {
    shared.address_changed = winner.address_changed;
    shared.new_address = winner.new_address;
}

fn route_config(shared: &mut HandlerOutputs, winner: &HandlerOutputs) {
    shared.config_changed = winner.config_changed;
    shared.new_config = winner.new_config;
}

fn route_tx(shared: &mut HandlerOutputs, winner: &HandlerOutputs) {
    shared.tx = winner.tx;
    shared.tx_length = winner.tx_length;
    shared.tx_sequence_number = winner.tx_sequence_number;
}

fn route_handshake(shared: &mut HandlerOutputs, winner: &HandlerOutputs) {
    shared.handshakes_out = winner.handshakes_out;
}

/// The policy a signal group is resolved with.
pub fn policy_for(group: SignalGroup) -> ArbitrationPolicy {
    ARBITRATION_TABLE
        .iter()
        .find(|arbiter| arbiter.group == group)
        .map(|arbiter| arbiter.policy)
        .unwrap_or(ArbitrationPolicy::PriorityEncoder)
}

/// Result of folding one step's handler outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Arbitration {
    pub shared: HandlerOutputs,
    winners: [Option<usize>; GROUP_COUNT],
}

impl Arbitration {
    /// Registration index whose values reached the shared interface for
    /// `group`, if any handler raised that group's trigger.
    pub fn winner(&self, group: SignalGroup) -> Option<usize> {
        ARBITRATION_TABLE
            .iter()
            .position(|arbiter| arbiter.group == group)
            .and_then(|slot| self.winners[slot])
    }
}

/// Fold handler outputs (in registration order) onto one shared bundle.
///
/// Groups nobody asserts keep their all-zero default.
pub fn resolve(outputs: &[HandlerOutputs]) -> Arbitration {
    let mut arbitration = Arbitration::default();
    for (slot, arbiter) in ARBITRATION_TABLE.iter().enumerate() {
        if let Some(index) = arbiter.select(outputs) {
            (arbiter.route)(&mut arbitration.shared, &outputs[index]);
            arbitration.winners[slot] = Some(index);
        }
    }
    arbitration
}

/// Shorthand for `resolve(outputs).shared`.
pub fn arbitrate(outputs: &[HandlerOutputs]) -> HandlerOutputs {
    resolve(outputs).shared
}
