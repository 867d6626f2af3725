/// A 5-bit SuperSpeed sequence number; wraps at 32.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SequenceNumber(u8);

impl SequenceNumber {
    pub const MODULUS: u8 = 32;

    pub const fn new(value: u8) -> Self {
        Self(value % Self::MODULUS)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn next(self) -> Self {
        Self::new(self.0 + 1)
    }
}

/// Handshake requests a handler raises toward the transaction layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HandshakeOut {
    pub send_ack: bool,
    pub send_stall: bool,
    pub retry_required: bool,
    pub next_sequence: SequenceNumber,
}

impl HandshakeOut {
    /// True when either handshake trigger is raised.
    pub fn requested(&self) -> bool {
        self.send_ack || self.send_stall
    }
}

/// Handshakes received from the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HandshakeIn {
    pub ack_received: bool,
    pub next_sequence: SequenceNumber,
}

#[cfg(test)]
mod tests {
    use super::{HandshakeOut, SequenceNumber};

    #[test]
    fn sequence_number_wraps() {
        assert_eq!(SequenceNumber::new(33).value(), 1);
        assert_eq!(SequenceNumber::new(31).next().value(), 0);
    }

    #[test]
    fn retry_alone_is_not_a_request() {
        let handshake = HandshakeOut {
            retry_required: true,
            ..HandshakeOut::default()
        };
        assert!(!handshake.requested());
    }
}
