//! SuperSpeed signal records shared by the decoder and request handlers.
//!
//! Layering follows the same split everywhere:
//! - `setup::layout`: byte offsets and bit masks (source of truth)
//! - `setup::reader`: safe byte access over a raw request
//! - `setup::parser`: domain-level decoding into [`SetupPacket`]
//! - `setup::error`: explicit, actionable errors
//!
//! The stream, header and handshake records are plain per-step signal
//! bundles. They carry no behavior beyond masking values to their wire width.

pub mod handshake;
pub mod header;
pub mod setup;
pub mod stream;

pub use handshake::{HandshakeIn, HandshakeOut, SequenceNumber};
pub use header::DataHeaderPacket;
pub use setup::{Direction, Recipient, RequestKind, SetupPacket, StandardRequest, parse_setup};
pub use stream::{ByteLanes, StreamWord};
