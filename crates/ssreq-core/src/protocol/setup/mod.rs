//! USB control-request (Setup packet) decoding.
//!
//! A Setup packet is the standard 8-byte request header. On a SuperSpeed link
//! it arrives as two 32-bit stream words: word0 carries bytes 0..4
//! (`bmRequestType`, `bRequest`, `wValue`) and word1 carries bytes 4..8
//! (`wIndex`, `wLength`). All multi-byte fields are little-endian.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
mod request;

pub use error::SetupError;
pub use parser::{parse_setup, setup_words};
pub use request::{Direction, Recipient, RequestKind, StandardRequest};

/// A parsed control request plus its one-step `received` strobe.
///
/// # Examples
/// ```
/// use ssreq_core::protocol::{Direction, SetupPacket};
///
/// let packet = SetupPacket::from_words(0x0100_0680, 0x0012_0000);
/// assert_eq!(packet.request, 0x06);
/// assert_eq!(packet.length, 0x12);
/// assert_eq!(packet.direction(), Direction::DeviceToHost);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SetupPacket {
    /// `bmRequestType`: direction, kind and recipient bitfields.
    pub request_type: u8,
    /// `bRequest`: request code.
    pub request: u8,
    /// `wValue`.
    pub value: u16,
    /// `wIndex`.
    pub index: u16,
    /// `wLength`: number of bytes in the data stage.
    pub length: u16,
    /// High for exactly one step after the packet was validated.
    pub received: bool,
}

impl SetupPacket {
    /// Assemble a packet from its two stream words. `received` stays low.
    pub fn from_words(word0: u32, word1: u32) -> Self {
        let [request_type, request, value_lo, value_hi] = word0.to_le_bytes();
        let [index_lo, index_hi, length_lo, length_hi] = word1.to_le_bytes();
        Self {
            request_type,
            request,
            value: u16::from_le_bytes([value_lo, value_hi]),
            index: u16::from_le_bytes([index_lo, index_hi]),
            length: u16::from_le_bytes([length_lo, length_hi]),
            received: false,
        }
    }

    pub fn to_words(&self) -> (u32, u32) {
        let bytes = self.to_bytes();
        (
            u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        )
    }

    pub fn to_bytes(&self) -> [u8; layout::SETUP_PACKET_LEN] {
        let mut bytes = [0u8; layout::SETUP_PACKET_LEN];
        bytes[layout::REQUEST_TYPE_OFFSET] = self.request_type;
        bytes[layout::REQUEST_OFFSET] = self.request;
        bytes[layout::VALUE_RANGE].copy_from_slice(&self.value.to_le_bytes());
        bytes[layout::INDEX_RANGE].copy_from_slice(&self.index.to_le_bytes());
        bytes[layout::LENGTH_RANGE].copy_from_slice(&self.length.to_le_bytes());
        bytes
    }

    pub fn direction(&self) -> Direction {
        Direction::from_request_type(self.request_type)
    }

    pub fn kind(&self) -> RequestKind {
        RequestKind::from_request_type(self.request_type)
    }

    pub fn recipient(&self) -> Recipient {
        Recipient::from_request_type(self.request_type)
    }

    /// The standard request this packet carries, if its kind is `Standard`
    /// and the code is a known one.
    pub fn standard_request(&self) -> Option<StandardRequest> {
        if self.kind() != RequestKind::Standard {
            return None;
        }
        StandardRequest::try_from(self.request).ok()
    }
}
