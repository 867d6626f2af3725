use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::decoder::SetupDecoder;
use crate::handler::HandlerInputs;
use crate::source::{SourceError, StepSource, TraceFileSource};
use crate::{Report, make_stub_report};

mod config;
mod device;
mod events;

pub use config::{ConfigError, HandlerSpec, ReplayConfig, StallRule};

use device::DeviceState;
use events::EventLog;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

pub fn replay_trace_file(path: &Path, config: &ReplayConfig) -> Result<Report, ReplayError> {
    let source = TraceFileSource::open(path)?;
    replay_source(path, source, config)
}

/// Drive the decoder and handler multiplexer with every step of `source`.
///
/// Per step, handlers see the decoder's registered packet (published by an
/// earlier step) and the device configuration as of the previous step. The
/// decoder and the device state then advance on this step's inputs.
pub fn replay_source<S: StepSource>(
    path: &Path,
    mut source: S,
    config: &ReplayConfig,
) -> Result<Report, ReplayError> {
    let mut decoder = SetupDecoder::new();
    let mut mux = config.build_multiplexer();
    let mut device = DeviceState::default();
    let mut log = EventLog::new();
    let mut step = 0u64;

    info!(path = %path.display(), handlers = mux.len(), "replaying trace");
    while let Some(sample) = source.next_step()? {
        log.add_step();
        let inputs = HandlerInputs {
            setup: *decoder.packet(),
            active_config: device.configuration,
            data_requested: sample.data_requested,
            status_requested: sample.status_requested,
            rx: sample.handler_rx(),
            handshakes_in: sample.handshake_in(),
        };
        let shared = mux.step(inputs);
        log.add_shared(step, &shared);
        device.apply(&shared);

        let packet = *decoder.step(&sample.decoder_inputs());
        if packet.received {
            log.add_setup(step + 1, &packet);
        }
        step += 1;
    }
    debug!(steps = step, "trace exhausted");

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.summary = log.summary;
    report.setup_packets = log.setup_packets;
    report.events = log.events;
    report.final_state = device.summary();
    info!(
        setup_packets = report.summary.setup_packets,
        stalls = report.summary.stalls,
        "replay finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BusEventKind;
    use crate::protocol::SetupPacket;
    use crate::source::TraceStep;

    fn setup_steps(packet: SetupPacket) -> Vec<TraceStep> {
        let (word0, word1) = packet.to_words();
        vec![
            TraceStep {
                valid: 0xf,
                first: true,
                setup: true,
                data: word0,
                ..TraceStep::default()
            },
            TraceStep {
                valid: 0xf,
                last: true,
                setup: true,
                data: word1,
                ..TraceStep::default()
            },
            TraceStep {
                rx_good: true,
                ..TraceStep::default()
            },
        ]
    }

    fn status() -> TraceStep {
        TraceStep {
            status_requested: true,
            ..TraceStep::default()
        }
    }

    fn replay(steps: Vec<TraceStep>) -> Report {
        // Cargo.toml gives the report a real file size to read.
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        replay_source(&path, steps.into_iter(), &ReplayConfig::default()).unwrap()
    }

    #[test]
    fn set_configuration_updates_device_state() {
        let mut steps = setup_steps(SetupPacket::from_words(0x0002_0900, 0));
        steps.push(status());
        let report = replay(steps);

        assert_eq!(report.summary.steps_total, 4);
        assert_eq!(report.summary.setup_packets, 1);
        assert_eq!(report.setup_packets[0].step, 3);
        assert_eq!(report.final_state.configuration, 2);
        let kinds: Vec<_> = report.events.iter().map(|event| event.kind).collect();
        assert_eq!(kinds, vec![BusEventKind::ConfigChanged, BusEventKind::Ack]);
    }

    #[test]
    fn status_in_verdict_step_still_sees_previous_packet() {
        let mut steps = setup_steps(SetupPacket::from_words(0x0002_0900, 0));
        steps[2].status_requested = true;
        let report = replay(steps);

        assert_eq!(report.final_state.configuration, 0);
        assert_eq!(report.summary.stalls, 1);
    }

    #[test]
    fn empty_trace_produces_empty_report() {
        let report = replay(Vec::new());
        assert_eq!(report.summary.steps_total, 0);
        assert!(report.events.is_empty());
        assert!(report.setup_packets.is_empty());
    }
}
