//! Control-request core of a USB3 (SuperSpeed) device stack.
//!
//! The crate models the gateware as a discrete-step system: every call to a
//! `step` method consumes one set of sampled inputs and produces the outputs
//! visible during the next step. There are no threads and no locks.
//!
//! - [`decoder`] turns the inbound stream into validated Setup packets.
//! - [`mux`] fans shared inputs out to any number of request handlers and
//!   folds their outputs back onto one interface.
//! - [`handler`] holds the handler contract and the stock handlers.
//! - `replay` drives all of the above from a recorded trace and produces a
//!   deterministic [`Report`].
//!
//! Invariants:
//! - A Setup packet is published only after the link layer's good verdict,
//!   and its `received` strobe lasts exactly one step.
//! - Handler outputs are resolved by a fixed per-group policy table; nothing
//!   detects two handlers asserting at once.
//! - Replaying the same trace with the same handlers yields a byte-identical
//!   report.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use ssreq_core::{ReplayConfig, replay_trace_file};
//!
//! let report = replay_trace_file(Path::new("trace.jsonl"), &ReplayConfig::default())?;
//! println!("setup packets: {}", report.summary.setup_packets);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod decoder;
pub mod handler;
pub mod mux;
pub mod protocol;
mod replay;
mod source;

pub use decoder::{DecoderInputs, DecoderState, SetupDecoder};
pub use handler::{
    DeviceStateRequestHandler, HandlerInputs, HandlerOutputs, RequestHandler,
    RequestHandlerInterface, StallOnlyRequestHandler,
};
pub use mux::{ArbitrationPolicy, MultiplexerBuilder, RequestHandlerMultiplexer, SignalGroup};
pub use protocol::SetupPacket;
pub use replay::{
    ConfigError, HandlerSpec, ReplayConfig, ReplayError, StallRule, replay_source,
    replay_trace_file,
};
pub use source::{SourceError, StepSource, TraceFileSource, TraceStep};

/// JSON schema version written into every report.
pub const REPORT_VERSION: u32 = 1;

/// Result of replaying one trace.
///
/// # Examples
/// ```
/// use ssreq_core::make_stub_report;
///
/// let report = make_stub_report("trace.jsonl", 123);
/// assert_eq!(report.report_version, ssreq_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Bumped when the JSON shape changes; unrelated to the crate version.
    pub report_version: u32,
    pub tool: ToolInfo,
    pub input: InputInfo,
    /// Counters over the whole trace.
    pub summary: ReplaySummary,
    /// Published setup packets in step order.
    pub setup_packets: Vec<SetupRecord>,
    /// Shared-interface activity in step order.
    pub events: Vec<BusEvent>,
    /// Device address and configuration after the last step.
    pub final_state: DeviceStateSummary,
}

/// Which build produced the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the replay.
    pub path: String,
    /// File size of the trace.
    pub bytes: u64,
}

/// Counters accumulated during a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub steps_total: u64,
    /// Packets that passed validation and were published.
    pub setup_packets: u64,
    pub address_changes: u64,
    pub config_changes: u64,
    pub acks: u64,
    pub stalls: u64,
    /// Steps in which the shared transmit stream carried a valid word.
    pub tx_words: u64,
}

/// A published setup packet.
///
/// # Examples
/// ```
/// use ssreq_core::SetupRecord;
///
/// let record = SetupRecord {
///     step: 3,
///     request_type: 0x80,
///     request: 0x06,
///     value: 0x0100,
///     index: 0,
///     length: 0x12,
/// };
/// assert_eq!(record.request, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupRecord {
    /// First step during which the packet (and its `received` strobe) is
    /// visible to handlers.
    pub step: u64,
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusEventKind {
    AddressChanged,
    ConfigChanged,
    Transmit,
    Ack,
    Stall,
}

/// One output the shared interface drove during a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusEvent {
    pub step: u64,
    pub kind: BusEventKind,
    /// New address, new configuration, or transmitted word.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStateSummary {
    pub address: u8,
    pub configuration: u8,
}

/// A report for `input_path` with every counter and list still empty.
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "ssreq".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        summary: ReplaySummary::default(),
        setup_packets: vec![],
        events: vec![],
        final_state: DeviceStateSummary::default(),
    }
}
