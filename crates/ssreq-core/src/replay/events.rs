use crate::handler::HandlerOutputs;
use crate::protocol::SetupPacket;
use crate::{BusEvent, BusEventKind, ReplaySummary, SetupRecord};

#[derive(Debug, Default)]
pub(crate) struct EventLog {
    pub summary: ReplaySummary,
    pub setup_packets: Vec<SetupRecord>,
    pub events: Vec<BusEvent>,
}

impl EventLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_step(&mut self) {
        self.summary.steps_total += 1;
    }

    /// Record a packet that becomes visible at `step`.
    pub(crate) fn add_setup(&mut self, step: u64, packet: &SetupPacket) {
        self.summary.setup_packets += 1;
        self.setup_packets.push(SetupRecord {
            step,
            request_type: packet.request_type,
            request: packet.request,
            value: packet.value,
            index: packet.index,
            length: packet.length,
        });
    }

    /// Record what the shared interface drove during `step`.
    pub(crate) fn add_shared(&mut self, step: u64, shared: &HandlerOutputs) {
        if shared.address_changed {
            self.summary.address_changes += 1;
            self.push(step, BusEventKind::AddressChanged, Some(shared.new_address.into()));
        }
        if shared.config_changed {
            self.summary.config_changes += 1;
            self.push(step, BusEventKind::ConfigChanged, Some(shared.new_config.into()));
        }
        if shared.tx.valid.any() {
            self.summary.tx_words += 1;
            self.push(step, BusEventKind::Transmit, Some(shared.tx.data));
        }
        if shared.handshakes_out.send_ack {
            self.summary.acks += 1;
            self.push(step, BusEventKind::Ack, None);
        }
        if shared.handshakes_out.send_stall {
            self.summary.stalls += 1;
            self.push(step, BusEventKind::Stall, None);
        }
    }

    fn push(&mut self, step: u64, kind: BusEventKind, value: Option<u32>) {
        self.events.push(BusEvent { step, kind, value });
    }
}

#[cfg(test)]
mod tests {
    use super::EventLog;
    use crate::BusEventKind;
    use crate::handler::HandlerOutputs;

    #[test]
    fn events_within_a_step_are_ordered_by_group() {
        let mut shared = HandlerOutputs::default();
        shared.stall();
        shared.ack();
        shared.change_config(1);
        shared.change_address(3);

        let mut log = EventLog::new();
        log.add_shared(4, &shared);
        let kinds: Vec<_> = log.events.iter().map(|event| event.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BusEventKind::AddressChanged,
                BusEventKind::ConfigChanged,
                BusEventKind::Ack,
                BusEventKind::Stall,
            ]
        );
        assert_eq!(log.summary.acks, 1);
        assert_eq!(log.summary.stalls, 1);
        assert_eq!(log.events[0].value, Some(3));
    }
}
