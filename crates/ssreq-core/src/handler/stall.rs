use tracing::debug;

use super::edge::FallingEdge;
use super::{HandlerInputs, HandlerOutputs, RequestHandler};
use crate::protocol::SetupPacket;

/// Handler that never serves data; it only stalls requests matching a
/// predicate.
///
/// The stall is raised only at a decision point: `data_requested`,
/// `status_requested`, or a falling edge on inbound stream validity (the
/// host finished sending data and nobody answered it).
///
/// # Examples
/// ```
/// use ssreq_core::handler::{HandlerInputs, RequestHandler, StallOnlyRequestHandler};
/// use ssreq_core::protocol::SetupPacket;
///
/// let handler = StallOnlyRequestHandler::new(|setup: &SetupPacket| setup.request == 0x42);
/// let inputs = HandlerInputs {
///     setup: SetupPacket { request: 0x42, ..SetupPacket::default() },
///     status_requested: true,
///     ..HandlerInputs::default()
/// };
/// assert!(handler.outputs(&inputs).handshakes_out.send_stall);
/// ```
pub struct StallOnlyRequestHandler<F> {
    condition: F,
    rx_done: FallingEdge,
}

impl<F> StallOnlyRequestHandler<F>
where
    F: Fn(&SetupPacket) -> bool,
{
    pub fn new(condition: F) -> Self {
        Self {
            condition,
            rx_done: FallingEdge::new(),
        }
    }

    fn may_respond(&self, inputs: &HandlerInputs) -> bool {
        inputs.data_requested || inputs.status_requested || self.rx_done.detected(inputs.rx.valid)
    }
}

impl<F> RequestHandler for StallOnlyRequestHandler<F>
where
    F: Fn(&SetupPacket) -> bool,
{
    fn outputs(&self, inputs: &HandlerInputs) -> HandlerOutputs {
        let mut outputs = HandlerOutputs::default();
        if self.may_respond(inputs) && (self.condition)(&inputs.setup) {
            debug!(request = inputs.setup.request, "stalling request");
            outputs.stall();
        }
        outputs
    }

    fn clock(&mut self, inputs: &HandlerInputs) {
        self.rx_done.clock(inputs.rx.valid);
    }

    fn name(&self) -> &'static str {
        "stall_only"
    }
}

#[cfg(test)]
mod tests {
    use super::StallOnlyRequestHandler;
    use crate::handler::{HandlerInputs, RequestHandler};
    use crate::protocol::{ByteLanes, SetupPacket, StreamWord};

    fn vendor_packet() -> SetupPacket {
        SetupPacket {
            request_type: 0xc0,
            request: 0x01,
            ..SetupPacket::default()
        }
    }

    fn rx(valid: ByteLanes) -> StreamWord {
        StreamWord {
            valid,
            ..StreamWord::IDLE
        }
    }

    #[test]
    fn matching_request_is_not_stalled_outside_decision_points() {
        let handler = StallOnlyRequestHandler::new(|_: &SetupPacket| true);
        let inputs = HandlerInputs {
            setup: vendor_packet(),
            ..HandlerInputs::default()
        };
        assert!(!handler.outputs(&inputs).handshakes_out.send_stall);
    }

    #[test]
    fn stalls_on_data_and_status_requests() {
        let handler = StallOnlyRequestHandler::new(|setup: &SetupPacket| setup.request_type == 0xc0);
        let data = HandlerInputs {
            setup: vendor_packet(),
            data_requested: true,
            ..HandlerInputs::default()
        };
        let status = HandlerInputs {
            data_requested: false,
            status_requested: true,
            ..data
        };
        assert!(handler.outputs(&data).handshakes_out.send_stall);
        assert!(handler.outputs(&status).handshakes_out.send_stall);
    }

    #[test]
    fn predicate_false_never_stalls() {
        let handler = StallOnlyRequestHandler::new(|_: &SetupPacket| false);
        let inputs = HandlerInputs {
            setup: vendor_packet(),
            data_requested: true,
            status_requested: true,
            ..HandlerInputs::default()
        };
        let outputs = handler.outputs(&inputs);
        assert!(!outputs.handshakes_out.send_stall);
        assert!(!outputs.handshakes_out.send_ack);
    }

    #[test]
    fn stalls_when_inbound_data_ends() {
        let mut handler = StallOnlyRequestHandler::new(|_: &SetupPacket| true);
        let receiving = HandlerInputs {
            setup: vendor_packet(),
            rx: rx(ByteLanes::ALL),
            ..HandlerInputs::default()
        };
        assert!(!handler.outputs(&receiving).handshakes_out.send_stall);
        handler.clock(&receiving);

        let done = HandlerInputs {
            rx: rx(ByteLanes::NONE),
            ..receiving
        };
        assert!(handler.outputs(&done).handshakes_out.send_stall);
        handler.clock(&done);

        assert!(!handler.outputs(&done).handshakes_out.send_stall);
    }
}
