use super::handshake::SequenceNumber;

/// Metadata for the stream unit currently being received.
///
/// Produced by the header classifier upstream; the decoder only looks at
/// `setup`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DataHeaderPacket {
    pub setup: bool,
    pub endpoint_number: u8,
    pub data_length: u16,
    pub sequence_number: SequenceNumber,
}
