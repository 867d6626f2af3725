//! Setup packet decoding from the inbound SuperSpeed stream.
//!
//! A Setup packet arrives as two stream words, but whether it is good is only
//! known afterwards, when the link layer strobes `rx_good` or `rx_bad`. The
//! decoder therefore buffers both words and publishes them atomically on
//! `rx_good`.
//!
//! Invariants:
//! - The published packet changes only on a validated commit.
//! - `received` is high for exactly the step following the commit.
//! - Malformed or rejected packets are dropped without any output.
//!
//! There is no timeout in `WaitForValid`: the link layer always reports one
//! verdict or the other.

use tracing::{debug, trace};

use crate::protocol::{DataHeaderPacket, SetupPacket, StreamWord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DecoderState {
    /// Waiting for the first word of a setup transaction.
    #[default]
    WaitForFirst,
    /// First word captured; the next valid word must be the last.
    ParseSecond,
    /// Both words captured; waiting for the integrity verdict.
    WaitForValid,
}

/// Signals sampled by the decoder each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderInputs {
    pub sink: StreamWord,
    /// Strobe: the packet just received passed its integrity checks.
    pub rx_good: bool,
    /// Strobe: the packet failed its checks or ended early.
    pub rx_bad: bool,
    pub header: DataHeaderPacket,
}

#[derive(Debug, Clone, Copy)]
enum Discard {
    UnexpectedContinuation,
    Aborted,
    BadVerdict,
}

#[derive(Debug, Default)]
pub struct SetupDecoder {
    state: DecoderState,
    buffer: [u32; 2],
    packet: SetupPacket,
}

impl SetupDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// The last validated packet, including this step's `received` strobe.
    pub fn packet(&self) -> &SetupPacket {
        &self.packet
    }

    /// Consume one step of inputs; the returned packet is what downstream
    /// logic sees during the next step.
    pub fn step(&mut self, inputs: &DecoderInputs) -> &SetupPacket {
        self.packet.received = false;

        let next = match self.state {
            DecoderState::WaitForFirst => self.wait_for_first(inputs),
            DecoderState::ParseSecond => self.parse_second(inputs),
            DecoderState::WaitForValid => self.wait_for_valid(inputs),
        };

        if next != self.state {
            trace!(from = ?self.state, to = ?next, "setup decoder transition");
        }
        self.state = next;
        &self.packet
    }

    fn wait_for_first(&mut self, inputs: &DecoderInputs) -> DecoderState {
        let starting = inputs.sink.valid.all() && inputs.sink.first;
        if starting && inputs.header.setup {
            self.buffer[0] = inputs.sink.data;
            return DecoderState::ParseSecond;
        }
        DecoderState::WaitForFirst
    }

    fn parse_second(&mut self, inputs: &DecoderInputs) -> DecoderState {
        let mut next = DecoderState::ParseSecond;
        if inputs.sink.valid.all() {
            if inputs.sink.last {
                self.buffer[1] = inputs.sink.data;
                next = DecoderState::WaitForValid;
            } else {
                next = self.discard(Discard::UnexpectedContinuation);
            }
        }
        if inputs.rx_bad {
            next = self.discard(Discard::Aborted);
        }
        next
    }

    fn wait_for_valid(&mut self, inputs: &DecoderInputs) -> DecoderState {
        if inputs.rx_bad {
            return self.discard(Discard::BadVerdict);
        }
        if inputs.rx_good {
            self.packet = SetupPacket::from_words(self.buffer[0], self.buffer[1]);
            self.packet.received = true;
            debug!(
                request_type = self.packet.request_type,
                request = self.packet.request,
                value = self.packet.value,
                index = self.packet.index,
                length = self.packet.length,
                "setup packet received"
            );
            return DecoderState::WaitForFirst;
        }
        DecoderState::WaitForValid
    }

    fn discard(&mut self, reason: Discard) -> DecoderState {
        debug!(?reason, "setup packet discarded");
        self.buffer = [0; 2];
        DecoderState::WaitForFirst
    }
}
