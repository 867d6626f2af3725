//! Step sources feeding the replay pipeline.
//!
//! A source yields one [`TraceStep`] per discrete step: the stream word, the
//! link-layer verdict strobes, the header classification and the request
//! events. File-backed traces live in `trace`.

mod trace;

pub use trace::TraceFileSource;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decoder::DecoderInputs;
use crate::protocol::{ByteLanes, DataHeaderPacket, HandshakeIn, SequenceNumber, StreamWord};

/// Sampled inputs for one step. Absent fields are low.
///
/// # Examples
/// ```
/// use ssreq_core::TraceStep;
///
/// let step: TraceStep = serde_json::from_str(r#"{"valid": 15, "first": true, "setup": true}"#)?;
/// assert!(step.stream_word().valid.all());
/// assert!(step.decoder_inputs().header.setup);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceStep {
    /// Byte-lane validity mask (bit per lane, 0..=15).
    pub valid: u8,
    pub first: bool,
    pub last: bool,
    pub data: u32,
    pub rx_good: bool,
    pub rx_bad: bool,
    /// Header classification: this word belongs to a setup transaction.
    pub setup: bool,
    pub data_requested: bool,
    pub status_requested: bool,
    pub ack_received: bool,
    pub ack_next_sequence: u8,
}

impl TraceStep {
    pub fn stream_word(&self) -> StreamWord {
        StreamWord {
            valid: ByteLanes::new(self.valid),
            first: self.first,
            last: self.last,
            data: self.data,
        }
    }

    pub fn decoder_inputs(&self) -> DecoderInputs {
        DecoderInputs {
            sink: self.stream_word(),
            rx_good: self.rx_good,
            rx_bad: self.rx_bad,
            header: DataHeaderPacket {
                setup: self.setup,
                ..DataHeaderPacket::default()
            },
        }
    }

    /// Inbound data as handlers see it. Setup transactions are consumed by
    /// the decoder and never reach handler `rx`.
    pub fn handler_rx(&self) -> StreamWord {
        if self.setup {
            StreamWord::IDLE
        } else {
            self.stream_word()
        }
    }

    pub fn handshake_in(&self) -> HandshakeIn {
        HandshakeIn {
            ack_received: self.ack_received,
            next_sequence: SequenceNumber::new(self.ack_next_sequence),
        }
    }
}

pub trait StepSource {
    fn next_step(&mut self) -> Result<Option<TraceStep>, SourceError>;
}

impl StepSource for std::vec::IntoIter<TraceStep> {
    fn next_step(&mut self) -> Result<Option<TraceStep>, SourceError> {
        Ok(self.next())
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("trace parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl From<trace::error::TraceSourceError> for SourceError {
    fn from(value: trace::error::TraceSourceError) -> Self {
        match value {
            trace::error::TraceSourceError::Io(err) => SourceError::Io(err),
            trace::error::TraceSourceError::Json { line, source } => SourceError::Parse {
                line,
                message: source.to_string(),
            },
        }
    }
}
