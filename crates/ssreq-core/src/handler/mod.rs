//! Request handlers and the signal bundle they share with the multiplexer.
//!
//! Every handler sees the same [`HandlerInputs`] each step and answers with
//! one [`HandlerOutputs`]. Handlers must only raise outputs at the protocol's
//! decision points (`data_requested`, `status_requested`, or the end of an
//! inbound data packet); the multiplexer relies on that for its fan-in.

mod device_state;
mod edge;
mod stall;

pub use device_state::DeviceStateRequestHandler;
pub use edge::FallingEdge;
pub use stall::StallOnlyRequestHandler;

use crate::protocol::{HandshakeIn, HandshakeOut, SequenceNumber, SetupPacket, StreamWord};

/// Largest data packet a handler may queue on its transmit stream.
pub const MAX_PACKET_LENGTH: u16 = 1024;
/// Device addresses are 7 bits wide.
pub const ADDRESS_MASK: u8 = 0x7f;

/// Signals broadcast from the shared interface to every handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerInputs {
    pub setup: SetupPacket,
    pub active_config: u8,
    /// Strobe: the host wants the data stage of the current request.
    pub data_requested: bool,
    /// Strobe: the host wants the status stage of the current request.
    pub status_requested: bool,
    pub rx: StreamWord,
    pub handshakes_in: HandshakeIn,
}

/// Signals a handler drives back toward the shared interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerOutputs {
    pub address_changed: bool,
    pub new_address: u8,
    pub config_changed: bool,
    pub new_config: u8,
    pub tx: StreamWord,
    pub tx_length: u16,
    pub tx_sequence_number: SequenceNumber,
    pub handshakes_out: HandshakeOut,
}

impl HandlerOutputs {
    pub fn change_address(&mut self, address: u8) {
        self.address_changed = true;
        self.new_address = address & ADDRESS_MASK;
    }

    pub fn change_config(&mut self, config: u8) {
        self.config_changed = true;
        self.new_config = config;
    }

    /// Queue one transmit word; `length` is clamped to [`MAX_PACKET_LENGTH`].
    pub fn transmit(&mut self, word: StreamWord, length: u16, sequence: SequenceNumber) {
        self.tx = word;
        self.tx_length = length.min(MAX_PACKET_LENGTH);
        self.tx_sequence_number = sequence;
    }

    pub fn ack(&mut self) {
        self.handshakes_out.send_ack = true;
    }

    pub fn stall(&mut self) {
        self.handshakes_out.send_stall = true;
    }
}

/// One handler's view of the bus for a single step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestHandlerInterface {
    pub inputs: HandlerInputs,
    pub outputs: HandlerOutputs,
}

/// A block of request-handling logic driven one step at a time.
///
/// `outputs` is combinational: it may read registered state but must not
/// change it. `clock` runs once per step after every handler's outputs have
/// been sampled, and is where registered state advances.
pub trait RequestHandler {
    fn outputs(&self, inputs: &HandlerInputs) -> HandlerOutputs;

    fn clock(&mut self, _inputs: &HandlerInputs) {}

    fn name(&self) -> &'static str {
        "handler"
    }
}

impl<H: RequestHandler + ?Sized> RequestHandler for Box<H> {
    fn outputs(&self, inputs: &HandlerInputs) -> HandlerOutputs {
        (**self).outputs(inputs)
    }

    fn clock(&mut self, inputs: &HandlerInputs) {
        (**self).clock(inputs)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_masked_to_seven_bits() {
        let mut outputs = HandlerOutputs::default();
        outputs.change_address(0xff);
        assert!(outputs.address_changed);
        assert_eq!(outputs.new_address, 0x7f);
    }

    #[test]
    fn transmit_length_is_clamped() {
        let mut outputs = HandlerOutputs::default();
        outputs.transmit(StreamWord::IDLE, 4096, SequenceNumber::new(3));
        assert_eq!(outputs.tx_length, MAX_PACKET_LENGTH);
        assert_eq!(outputs.tx_sequence_number.value(), 3);
    }
}
