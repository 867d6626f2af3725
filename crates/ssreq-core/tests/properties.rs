use proptest::prelude::*;

use ssreq_core::handler::{HandlerInputs, HandlerOutputs, RequestHandler, StallOnlyRequestHandler};
use ssreq_core::mux::{SignalGroup, arbitrate, resolve};
use ssreq_core::protocol::{ByteLanes, DataHeaderPacket, SequenceNumber, SetupPacket, StreamWord};
use ssreq_core::{DecoderInputs, DecoderState, SetupDecoder};

fn setup_word(data: u32, first: bool, last: bool) -> DecoderInputs {
    DecoderInputs {
        sink: StreamWord {
            valid: ByteLanes::ALL,
            first,
            last,
            data,
        },
        header: DataHeaderPacket {
            setup: true,
            ..DataHeaderPacket::default()
        },
        ..DecoderInputs::default()
    }
}

fn verdict(good: bool) -> DecoderInputs {
    DecoderInputs {
        rx_good: good,
        rx_bad: !good,
        ..DecoderInputs::default()
    }
}

/// Feed a complete two-word packet plus idle gaps; returns the packet seen
/// right after the verdict.
fn decode(decoder: &mut SetupDecoder, word0: u32, word1: u32, gap: usize, good: bool) -> SetupPacket {
    decoder.step(&setup_word(word0, true, false));
    for _ in 0..gap {
        assert!(!decoder.step(&DecoderInputs::default()).received);
    }
    decoder.step(&setup_word(word1, false, true));
    for _ in 0..gap {
        assert!(!decoder.step(&DecoderInputs::default()).received);
    }
    *decoder.step(&verdict(good))
}

fn handshake(ack: bool, sequence: u8) -> HandlerOutputs {
    let mut outputs = HandlerOutputs::default();
    if ack {
        outputs.ack();
    } else {
        outputs.stall();
    }
    outputs.handshakes_out.next_sequence = SequenceNumber::new(sequence);
    outputs
}

proptest! {
    #[test]
    fn good_verdict_publishes_both_words_for_one_step(
        word0 in any::<u32>(),
        word1 in any::<u32>(),
        gap in 0usize..4,
    ) {
        let mut decoder = SetupDecoder::new();
        let published = decode(&mut decoder, word0, word1, gap, true);

        let mut expected = SetupPacket::from_words(word0, word1);
        expected.received = true;
        prop_assert_eq!(published, expected);
        prop_assert_eq!(decoder.state(), DecoderState::WaitForFirst);

        let next = *decoder.step(&DecoderInputs::default());
        prop_assert!(!next.received);
        prop_assert_eq!(next.to_words(), (word0, word1));
    }

    #[test]
    fn bad_verdict_never_publishes(
        word0 in any::<u32>(),
        word1 in any::<u32>(),
        abort_after_first in any::<bool>(),
    ) {
        let mut decoder = SetupDecoder::new();
        decoder.step(&verdict(false));
        prop_assert_eq!(decoder.state(), DecoderState::WaitForFirst);

        decoder.step(&setup_word(word0, true, false));
        if !abort_after_first {
            decoder.step(&setup_word(word1, false, true));
        }
        let packet = *decoder.step(&verdict(false));
        prop_assert!(!packet.received);
        prop_assert_eq!(packet, SetupPacket::default());
        prop_assert_eq!(decoder.state(), DecoderState::WaitForFirst);
    }

    #[test]
    fn consecutive_decodes_are_independent(
        packets in prop::collection::vec((any::<u32>(), any::<u32>(), any::<bool>()), 1..8),
    ) {
        let mut decoder = SetupDecoder::new();
        let mut last_good = SetupPacket::default();
        for (word0, word1, good) in packets {
            let packet = decode(&mut decoder, word0, word1, 0, good);
            prop_assert_eq!(packet.received, good);
            if good {
                last_good = SetupPacket::from_words(word0, word1);
            }
            prop_assert_eq!(packet.to_words(), last_good.to_words());
        }
    }

    #[test]
    fn address_change_goes_to_lowest_index(
        count in 2usize..8,
        picks in (any::<prop::sample::Index>(), any::<prop::sample::Index>()),
        values in (0u8..0x80, 0u8..0x80),
    ) {
        let a = picks.0.index(count);
        let b = picks.1.index(count);
        prop_assume!(a != b);
        let (i, j) = if a < b { (a, b) } else { (b, a) };

        let mut outputs = vec![HandlerOutputs::default(); count];
        outputs[i].change_address(values.0);
        outputs[j].change_address(values.1);

        let arbitration = resolve(&outputs);
        prop_assert_eq!(arbitration.shared.new_address, values.0);
        prop_assert_eq!(arbitration.winner(SignalGroup::AddressChange), Some(i));
    }

    #[test]
    fn config_change_goes_to_lowest_index(
        count in 2usize..8,
        picks in (any::<prop::sample::Index>(), any::<prop::sample::Index>()),
        values in (any::<u8>(), any::<u8>()),
    ) {
        let a = picks.0.index(count);
        let b = picks.1.index(count);
        prop_assume!(a != b);
        let (i, j) = if a < b { (a, b) } else { (b, a) };

        let mut outputs = vec![HandlerOutputs::default(); count];
        outputs[i].change_config(values.0);
        outputs[j].change_config(values.1);

        let arbitration = resolve(&outputs);
        prop_assert_eq!(arbitration.shared.new_config, values.0);
        prop_assert_eq!(arbitration.winner(SignalGroup::ConfigChange), Some(i));
    }

    #[test]
    fn handshake_payload_goes_to_highest_index(
        count in 2usize..8,
        picks in (any::<prop::sample::Index>(), any::<prop::sample::Index>()),
        first in (any::<bool>(), 0u8..32),
        second in (any::<bool>(), 0u8..32),
    ) {
        let a = picks.0.index(count);
        let b = picks.1.index(count);
        prop_assume!(a != b);
        let (i, j) = if a < b { (a, b) } else { (b, a) };

        let mut outputs = vec![HandlerOutputs::default(); count];
        outputs[i] = handshake(first.0, first.1);
        outputs[j] = handshake(second.0, second.1);

        let shared = arbitrate(&outputs);
        prop_assert_eq!(shared.handshakes_out, outputs[j].handshakes_out);
    }

    #[test]
    fn stall_iff_predicate_and_decision_point(
        steps in prop::collection::vec(
            (any::<bool>(), any::<bool>(), any::<bool>(), 0u8..16),
            1..32,
        ),
    ) {
        // The predicate keys off bRequest so each step can flip it.
        let mut handler = StallOnlyRequestHandler::new(|setup: &SetupPacket| setup.request == 1);
        let mut previous = ByteLanes::NONE;
        for (predicate, data_requested, status_requested, lanes) in steps {
            let valid = ByteLanes::new(lanes);
            let inputs = HandlerInputs {
                setup: SetupPacket {
                    request: u8::from(predicate),
                    ..SetupPacket::default()
                },
                data_requested,
                status_requested,
                rx: StreamWord { valid, ..StreamWord::IDLE },
                ..HandlerInputs::default()
            };
            let fell = valid.fell_from(previous).any();
            let expected = predicate && (data_requested || status_requested || fell);

            let outputs = handler.outputs(&inputs);
            prop_assert_eq!(outputs.handshakes_out.send_stall, expected);
            prop_assert!(!outputs.handshakes_out.send_ack);
            handler.clock(&inputs);
            previous = valid;
        }
    }
}
