// =============================================================================
// Dispatcher
// =============================================================================

//! The UMP streaming dispatcher **([M2-104-UM])**.
//!
//! A [`Dispatcher`] accumulates 32-bit words fed one at a time through
//! [`Dispatcher::push`], classifies each completed message by the message
//! type nibble of its first word, decodes it into one of the strongly typed
//! shapes in [`message`](crate::message), and routes it to the matching
//! method of a [`Handlers`] implementation. No word is ever allocated,
//! copied beyond the four-word scratch accumulator, or held past the
//! `push` call that completed the message.
//!
//! Any word sequence is legal input: a reserved message type or an
//! unrecognized sub-status routes to [`Handlers::unknown`] rather than
//! failing, matching the "no invalid message" failure model of the wire
//! format this dispatcher implements.

use bitvec::view::BitView;

use crate::message::{
    self,
    data128,
    data64,
    flex_data,
    m1cvm,
    m2cvm,
    stream,
    system,
    utility,
};

// -----------------------------------------------------------------------------

// Handlers

/// The complete set of callbacks a [`Dispatcher`] may invoke, one per
/// concrete UMP message shape across all eight families, plus the
/// `unknown` sink used for reserved message types and unrecognized
/// sub-statuses.
///
/// Every method has a no-op default, mirroring the source's `*_null`
/// backends: implementers override only the handlers they care about.
#[allow(unused_variables)]
pub trait Handlers {
    // Utility

    fn noop(&mut self) {}
    fn jr_clock(&mut self, message: utility::JrClock<'_>) {}
    fn jr_timestamp(&mut self, message: utility::JrTimestamp<'_>) {}
    fn delta_clockstamp_tpqn(&mut self, message: utility::DeltaClockstampTpqn<'_>) {}
    fn delta_clockstamp(&mut self, message: utility::DeltaClockstamp<'_>) {}

    /// Called for a reserved message type, or a sub-status this catalog
    /// does not recognize, with the complete words of the message.
    fn unknown(&mut self, words: &[u32]) {}

    // System

    fn midi_time_code(&mut self, message: system::common::MIDITimeCode<'_>) {}
    fn song_position_pointer(&mut self, message: system::common::SongPositionPointer<'_>) {}
    fn song_select(&mut self, message: system::common::SongSelect<'_>) {}
    fn tune_request(&mut self, message: system::common::TuneRequest<'_>) {}
    fn timing_clock(&mut self, message: system::real_time::TimingClock<'_>) {}
    fn seq_start(&mut self, message: system::real_time::Start<'_>) {}
    fn seq_continue(&mut self, message: system::real_time::Continue<'_>) {}
    fn seq_stop(&mut self, message: system::real_time::Stop<'_>) {}
    fn active_sensing(&mut self, message: system::real_time::ActiveSensing<'_>) {}
    fn reset(&mut self, message: system::real_time::Reset<'_>) {}

    // MIDI 1.0 Channel Voice

    fn m1_note_off(&mut self, message: m1cvm::NoteOff<'_>) {}
    fn m1_note_on(&mut self, message: m1cvm::NoteOn<'_>) {}
    fn m1_poly_pressure(&mut self, message: m1cvm::PolyPressure<'_>) {}
    fn m1_control_change(&mut self, message: m1cvm::ControlChange<'_>) {}
    fn m1_program_change(&mut self, message: m1cvm::ProgramChange<'_>) {}
    fn m1_channel_pressure(&mut self, message: m1cvm::ChannelPressure<'_>) {}
    fn m1_pitch_bend(&mut self, message: m1cvm::PitchBend<'_>) {}

    // Data64 (Sysex7)

    fn sysex7_in_1(&mut self, message: data64::Sysex7In1<'_>) {}
    fn sysex7_start(&mut self, message: data64::Sysex7Start<'_>) {}
    fn sysex7_continue(&mut self, message: data64::Sysex7Continue<'_>) {}
    fn sysex7_end(&mut self, message: data64::Sysex7End<'_>) {}

    // MIDI 2.x Channel Voice

    fn m2_note_off(&mut self, message: m2cvm::NoteOff<'_>) {}
    fn m2_note_on(&mut self, message: m2cvm::NoteOn<'_>) {}
    fn m2_poly_pressure(&mut self, message: m2cvm::PolyPressure<'_>) {}
    fn m2_registered_per_note_controller(&mut self, message: m2cvm::RegisteredPerNoteController<'_>) {}
    fn m2_assignable_per_note_controller(&mut self, message: m2cvm::AssignablePerNoteController<'_>) {}
    fn m2_registered_controller(&mut self, message: m2cvm::RegisteredController<'_>) {}
    fn m2_assignable_controller(&mut self, message: m2cvm::AssignableController<'_>) {}
    fn m2_relative_registered_controller(&mut self, message: m2cvm::RelativeRegisteredController<'_>) {}
    fn m2_relative_assignable_controller(&mut self, message: m2cvm::RelativeAssignableController<'_>) {}
    fn m2_program_change(&mut self, message: m2cvm::ProgramChange<'_>) {}
    fn m2_channel_pressure(&mut self, message: m2cvm::ChannelPressure<'_>) {}
    fn m2_per_note_management(&mut self, message: m2cvm::PerNoteManagement<'_>) {}
    fn m2_control_change(&mut self, message: m2cvm::ControlChange<'_>) {}
    fn m2_pitch_bend(&mut self, message: m2cvm::PitchBend<'_>) {}
    fn m2_per_note_pitch_bend(&mut self, message: m2cvm::PerNotePitchBend<'_>) {}

    // Data128 (Sysex8 / Mixed Data Set)

    fn sysex8_in_1(&mut self, message: data128::Sysex8In1<'_>) {}
    fn sysex8_start(&mut self, message: data128::Sysex8Start<'_>) {}
    fn sysex8_continue(&mut self, message: data128::Sysex8Continue<'_>) {}
    fn sysex8_end(&mut self, message: data128::Sysex8End<'_>) {}
    fn mds_header(&mut self, message: data128::MdsHeader<'_>) {}
    fn mds_payload(&mut self, message: data128::MdsPayload<'_>) {}

    // Flex Data

    fn set_tempo(&mut self, message: flex_data::SetTempo<'_>) {}
    fn set_time_signature(&mut self, message: flex_data::SetTimeSignature<'_>) {}
    fn set_metronome(&mut self, message: flex_data::SetMetronome<'_>) {}
    fn set_key_signature(&mut self, message: flex_data::SetKeySignature<'_>) {}
    fn set_chord_name(&mut self, message: flex_data::SetChordName<'_>) {}
    fn metadata_text(&mut self, message: flex_data::MetadataText<'_>) {}
    fn performance_text(&mut self, message: flex_data::PerformanceText<'_>) {}

    // Stream

    fn endpoint_discovery(&mut self, message: stream::EndpointDiscovery<'_>) {}
    fn endpoint_info_notification(&mut self, message: stream::EndpointInfoNotification<'_>) {}
    fn device_identity_notification(&mut self, message: stream::DeviceIdentityNotification<'_>) {}
    fn endpoint_name_notification(&mut self, message: stream::EndpointNameNotification<'_>) {}
    fn product_instance_id_notification(&mut self, message: stream::ProductInstanceIdNotification<'_>) {}
    fn jr_configuration_request(&mut self, message: stream::JrConfigurationRequest<'_>) {}
    fn jr_configuration_notification(&mut self, message: stream::JrConfigurationNotification<'_>) {}
    fn function_block_discovery(&mut self, message: stream::FunctionBlockDiscovery<'_>) {}
    fn function_block_info_notification(&mut self, message: stream::FunctionBlockInfoNotification<'_>) {}
    fn function_block_name_notification(&mut self, message: stream::FunctionBlockNameNotification<'_>) {}
    fn start_of_clip(&mut self, message: stream::StartOfClip<'_>) {}
    fn end_of_clip(&mut self, message: stream::EndOfClip<'_>) {}
}

// -----------------------------------------------------------------------------

// Dispatcher

/// Streaming word-at-a-time UMP dispatcher.
///
/// Holds a four-word accumulator sized for the largest UMP message (one
/// Flex Data or Stream word group). `push` never fails: a malformed or
/// reserved word is surfaced to [`Handlers::unknown`] and does not
/// desynchronize subsequent messages, since the accumulator only resets
/// once a full message's words have been consumed.
pub struct Dispatcher<H> {
    buf: [u32; 4],
    pos: usize,
    handlers: H,
}

impl<H> Dispatcher<H>
where
    H: Handlers,
{
    /// Creates a dispatcher that will route decoded messages to `handlers`.
    #[must_use]
    pub const fn new(handlers: H) -> Self {
        Self {
            buf: [0; 4],
            pos: 0,
            handlers,
        }
    }

    /// Returns a reference to the handler set.
    pub const fn handlers(&self) -> &H {
        &self.handlers
    }

    /// Returns a mutable reference to the handler set.
    pub fn handlers_mut(&mut self) -> &mut H {
        &mut self.handlers
    }

    /// Consumes the dispatcher, returning the handler set.
    pub fn into_handlers(self) -> H {
        self.handlers
    }

    /// Feeds one 32-bit word. Dispatches to a handler method exactly when
    /// this word completes a message.
    pub fn push(&mut self, word: u32) {
        self.buf[self.pos] = word;
        self.pos += 1;

        let message_type = (self.buf[0] >> 28) as u8;
        let words = message::words_for_message_type(message_type).unwrap_or(1) as usize;

        if self.pos < words {
            return;
        }

        self.dispatch(message_type, words);
        self.pos = 0;
    }

    /// Feeds every word of a pre-built record, in order.
    pub fn push_words(&mut self, words: &[u32]) {
        for &word in words {
            self.push(word);
        }
    }

    #[allow(clippy::too_many_lines)]
    fn dispatch(&mut self, message_type: u8, words: usize) {
        let slice = &mut self.buf[..words];

        match message_type {
            0x0 => {
                let bits = slice.view_bits_mut();
                match utility::Utility::try_new(bits) {
                    Ok(utility::Utility::Noop(_)) => self.handlers.noop(),
                    Ok(utility::Utility::JrClock(m)) => self.handlers.jr_clock(m),
                    Ok(utility::Utility::JrTimestamp(m)) => self.handlers.jr_timestamp(m),
                    Ok(utility::Utility::DeltaClockstampTpqn(m)) => self.handlers.delta_clockstamp_tpqn(m),
                    Ok(utility::Utility::DeltaClockstamp(m)) => self.handlers.delta_clockstamp(m),
                    Err(_) => self.handlers.unknown(slice),
                }
            }
            0x1 => {
                let bits = slice.view_bits_mut();
                match system::System::try_new(bits) {
                    Ok(system::System::Common(common)) => match common {
                        system::common::Common::MIDITimeCode(m) => self.handlers.midi_time_code(m),
                        system::common::Common::SongPositionPointer(m) => self.handlers.song_position_pointer(m),
                        system::common::Common::SongSelect(m) => self.handlers.song_select(m),
                        system::common::Common::TuneRequest(m) => self.handlers.tune_request(m),
                    },
                    Ok(system::System::RealTime(real_time)) => match real_time {
                        system::real_time::RealTime::TimingClock(m) => self.handlers.timing_clock(m),
                        system::real_time::RealTime::Start(m) => self.handlers.seq_start(m),
                        system::real_time::RealTime::Continue(m) => self.handlers.seq_continue(m),
                        system::real_time::RealTime::Stop(m) => self.handlers.seq_stop(m),
                        system::real_time::RealTime::ActiveSensing(m) => self.handlers.active_sensing(m),
                        system::real_time::RealTime::Reset(m) => self.handlers.reset(m),
                    },
                    Err(_) => self.handlers.unknown(slice),
                }
            }
            0x2 => {
                let bits = slice.view_bits_mut();
                match m1cvm::Voice::try_new(bits) {
                    Ok(m1cvm::Voice::NoteOff(m)) => self.handlers.m1_note_off(m),
                    Ok(m1cvm::Voice::NoteOn(m)) => self.handlers.m1_note_on(m),
                    Ok(m1cvm::Voice::PolyPressure(m)) => self.handlers.m1_poly_pressure(m),
                    Ok(m1cvm::Voice::ControlChange(m)) => self.handlers.m1_control_change(m),
                    Ok(m1cvm::Voice::ProgramChange(m)) => self.handlers.m1_program_change(m),
                    Ok(m1cvm::Voice::ChannelPressure(m)) => self.handlers.m1_channel_pressure(m),
                    Ok(m1cvm::Voice::PitchBend(m)) => self.handlers.m1_pitch_bend(m),
                    Err(_) => self.handlers.unknown(slice),
                }
            }
            0x3 => {
                let bits = slice.view_bits_mut();
                match data64::Data64::try_new(bits) {
                    Ok(data64::Data64::Sysex7In1(m)) => self.handlers.sysex7_in_1(m),
                    Ok(data64::Data64::Sysex7Start(m)) => self.handlers.sysex7_start(m),
                    Ok(data64::Data64::Sysex7Continue(m)) => self.handlers.sysex7_continue(m),
                    Ok(data64::Data64::Sysex7End(m)) => self.handlers.sysex7_end(m),
                    Err(_) => self.handlers.unknown(slice),
                }
            }
            0x4 => {
                let bits = slice.view_bits_mut();
                match m2cvm::Voice::try_new(bits) {
                    Ok(m2cvm::Voice::RegisteredPerNoteController(m)) => {
                        self.handlers.m2_registered_per_note_controller(m);
                    }
                    Ok(m2cvm::Voice::AssignablePerNoteController(m)) => {
                        self.handlers.m2_assignable_per_note_controller(m);
                    }
                    Ok(m2cvm::Voice::RegisteredController(m)) => self.handlers.m2_registered_controller(m),
                    Ok(m2cvm::Voice::AssignableController(m)) => self.handlers.m2_assignable_controller(m),
                    Ok(m2cvm::Voice::RelativeRegisteredController(m)) => {
                        self.handlers.m2_relative_registered_controller(m);
                    }
                    Ok(m2cvm::Voice::RelativeAssignableController(m)) => {
                        self.handlers.m2_relative_assignable_controller(m);
                    }
                    Ok(m2cvm::Voice::PerNotePitchBend(m)) => self.handlers.m2_per_note_pitch_bend(m),
                    Ok(m2cvm::Voice::NoteOff(m)) => self.handlers.m2_note_off(m),
                    Ok(m2cvm::Voice::NoteOn(m)) => self.handlers.m2_note_on(m),
                    Ok(m2cvm::Voice::PolyPressure(m)) => self.handlers.m2_poly_pressure(m),
                    Ok(m2cvm::Voice::ControlChange(m)) => self.handlers.m2_control_change(m),
                    Ok(m2cvm::Voice::ProgramChange(m)) => self.handlers.m2_program_change(m),
                    Ok(m2cvm::Voice::ChannelPressure(m)) => self.handlers.m2_channel_pressure(m),
                    Ok(m2cvm::Voice::PitchBend(m)) => self.handlers.m2_pitch_bend(m),
                    Ok(m2cvm::Voice::PerNoteManagement(m)) => self.handlers.m2_per_note_management(m),
                    Err(_) => self.handlers.unknown(slice),
                }
            }
            0x5 => {
                let bits = slice.view_bits_mut();
                match data128::Data128::try_new(bits) {
                    Ok(data128::Data128::Sysex8In1(m)) => self.handlers.sysex8_in_1(m),
                    Ok(data128::Data128::Sysex8Start(m)) => self.handlers.sysex8_start(m),
                    Ok(data128::Data128::Sysex8Continue(m)) => self.handlers.sysex8_continue(m),
                    Ok(data128::Data128::Sysex8End(m)) => self.handlers.sysex8_end(m),
                    Ok(data128::Data128::MdsHeader(m)) => self.handlers.mds_header(m),
                    Ok(data128::Data128::MdsPayload(m)) => self.handlers.mds_payload(m),
                    Err(_) => self.handlers.unknown(slice),
                }
            }
            0xd => {
                let bits = slice.view_bits_mut();
                match flex_data::FlexData::try_new(bits) {
                    Ok(flex_data::FlexData::SetTempo(m)) => self.handlers.set_tempo(m),
                    Ok(flex_data::FlexData::SetTimeSignature(m)) => self.handlers.set_time_signature(m),
                    Ok(flex_data::FlexData::SetMetronome(m)) => self.handlers.set_metronome(m),
                    Ok(flex_data::FlexData::SetKeySignature(m)) => self.handlers.set_key_signature(m),
                    Ok(flex_data::FlexData::SetChordName(m)) => self.handlers.set_chord_name(m),
                    Ok(flex_data::FlexData::MetadataText(m)) => self.handlers.metadata_text(m),
                    Ok(flex_data::FlexData::PerformanceText(m)) => self.handlers.performance_text(m),
                    Err(_) => self.handlers.unknown(slice),
                }
            }
            0xf => {
                let bits = slice.view_bits_mut();
                match stream::Stream::try_new(bits) {
                    Ok(stream::Stream::EndpointDiscovery(m)) => self.handlers.endpoint_discovery(m),
                    Ok(stream::Stream::EndpointInfoNotification(m)) => self.handlers.endpoint_info_notification(m),
                    Ok(stream::Stream::DeviceIdentityNotification(m)) => {
                        self.handlers.device_identity_notification(m);
                    }
                    Ok(stream::Stream::EndpointNameNotification(m)) => self.handlers.endpoint_name_notification(m),
                    Ok(stream::Stream::ProductInstanceIdNotification(m)) => {
                        self.handlers.product_instance_id_notification(m);
                    }
                    Ok(stream::Stream::JrConfigurationRequest(m)) => self.handlers.jr_configuration_request(m),
                    Ok(stream::Stream::JrConfigurationNotification(m)) => {
                        self.handlers.jr_configuration_notification(m);
                    }
                    Ok(stream::Stream::FunctionBlockDiscovery(m)) => self.handlers.function_block_discovery(m),
                    Ok(stream::Stream::FunctionBlockInfoNotification(m)) => {
                        self.handlers.function_block_info_notification(m);
                    }
                    Ok(stream::Stream::FunctionBlockNameNotification(m)) => {
                        self.handlers.function_block_name_notification(m);
                    }
                    Ok(stream::Stream::StartOfClip(m)) => self.handlers.start_of_clip(m),
                    Ok(stream::Stream::EndOfClip(m)) => self.handlers.end_of_clip(m),
                    Err(_) => self.handlers.unknown(slice),
                }
            }
            // Reserved message types (0x6, 0x7, 0x8, 0x9, 0xa, 0xb, 0xc, 0xe): no catalog entry.
            _ => self.handlers.unknown(slice),
        }
    }
}

// -----------------------------------------------------------------------------

// Tests

#[cfg(test)]
mod tests {
    use super::{
        Dispatcher,
        Handlers,
    };
    use crate::message::{
        m1cvm,
        system,
        utility,
    };

    #[derive(Default)]
    struct Recorder {
        noop_count: usize,
        unknown_words: Vec<Vec<u32>>,
        timing_clocks: usize,
        note_ons: Vec<(u8, u8, u8)>,
        m2_note_ons: usize,
    }

    impl Handlers for Recorder {
        fn noop(&mut self) {
            self.noop_count += 1;
        }

        fn unknown(&mut self, words: &[u32]) {
            self.unknown_words.push(words.to_vec());
        }

        fn timing_clock(&mut self, _message: system::real_time::TimingClock<'_>) {
            self.timing_clocks += 1;
        }

        fn m1_note_on(&mut self, message: m1cvm::NoteOn<'_>) {
            self.note_ons.push((
                u8::from(message.channel().unwrap()),
                u8::from(message.note().unwrap()),
                u8::from(message.velocity().unwrap()),
            ));
        }

        fn m2_note_on(&mut self, _message: crate::message::m2cvm::NoteOn<'_>) {
            self.m2_note_ons += 1;
        }
    }

    #[test]
    fn dispatches_a_single_word_utility_message() {
        let mut dispatcher = Dispatcher::new(Recorder::default());

        dispatcher.push(0x0000_0000);

        assert_eq!(dispatcher.handlers().noop_count, 1);
    }

    #[test]
    fn dispatches_a_single_word_system_message() {
        let mut dispatcher = Dispatcher::new(Recorder::default());

        dispatcher.push(0x10f8_0000);

        assert_eq!(dispatcher.handlers().timing_clocks, 1);
    }

    #[test]
    fn routes_a_reserved_message_type_to_unknown() {
        let mut dispatcher = Dispatcher::new(Recorder::default());

        dispatcher.push(0x6000_0000);

        assert_eq!(dispatcher.handlers().unknown_words.len(), 1);
        assert_eq!(dispatcher.handlers().unknown_words[0], vec![0x6000_0000]);
    }

    #[test]
    fn does_not_desynchronize_after_a_reserved_message() {
        let mut dispatcher = Dispatcher::new(Recorder::default());

        // A reserved 96-bit message type (0xb) consumes 3 words before
        // the accumulator resets; a following Utility noop must still
        // decode cleanly as its own, separate message.
        dispatcher.push(0xb000_0000);
        dispatcher.push(0x0000_0000);
        dispatcher.push(0x0000_0000);
        dispatcher.push(0x0000_0000);

        assert_eq!(dispatcher.handlers().unknown_words.len(), 1);
        assert_eq!(dispatcher.handlers().noop_count, 1);
    }

    #[test]
    fn decodes_a_two_word_m2cvm_message_only_after_both_words_arrive() {
        let mut dispatcher = Dispatcher::new(Recorder::default());

        dispatcher.push(0x4090_3c00);
        assert_eq!(dispatcher.handlers().m2_note_ons, 0);

        dispatcher.push(0x7f00_0000);
        assert_eq!(dispatcher.handlers().m2_note_ons, 1);
    }

    #[test]
    fn delivers_m1_note_on_with_decoded_fields() {
        let mut dispatcher = Dispatcher::new(Recorder::default());

        dispatcher.push(0x2091_3c50);

        assert_eq!(dispatcher.handlers().note_ons, vec![(1, 0x3c, 0x50)]);
    }
}
