// =============================================================================
// Back Translation
// =============================================================================

//! Universal MIDI Packet to MIDI 1.0 bytestream back-translation.
//!
//! This is supplementary to the forward [`crate::transcoder`]: nothing in
//! the wire format requires it, but any bridge between a UMP-native
//! application and legacy MIDI 1.0 hardware needs the inverse direction too.
//! [`UmpToBytestream`] wraps a [`Dispatcher`] whose handlers re-render each
//! decoded UMP as the MIDI 1.0 bytes it came from (MIDI 1.0 Channel Voice,
//! System, and Sysex7) or, for MIDI 2.x Channel Voice, the bytes it *would*
//! have been, scaling each value down to its MIDI 1.0 width.
//!
//! Only the message set the original bytestream-to-UMP direction covers is
//! handled here. MIDI 2.x's per-note pitch bend, per-note management, and
//! relative (N)RPN messages have no MIDI 1.0 equivalent and are dropped
//! rather than approximated; Flex Data, Sysex8/Mixed Data Set, Stream, and
//! Utility messages carry no legacy bytestream representation at all and are
//! left to the [`Handlers`] trait's no-op defaults.

use midi_2_protocol::{
    dispatcher::{
        Dispatcher,
        Handlers,
    },
    message::{
        data64,
        m1cvm,
        m2cvm,
        system,
    },
};

use crate::{
    fifo::Fifo,
    scale::mcm_scale,
};

const SYSEX_START: u8 = 0xf0;
const SYSEX_END: u8 = 0xf7;

// Control Change controller numbers used to rebuild (N)RPN and bank-select
// sequences that MIDI 2.x carries as dedicated fields.
const CC_BANK_SELECT: u8 = 0x00;
const CC_BANK_SELECT_LSB: u8 = 0x20;
const CC_DATA_ENTRY_MSB: u8 = 0x06;
const CC_DATA_ENTRY_LSB: u8 = 0x26;
const CC_NRPN_LSB: u8 = 0x62;
const CC_NRPN_MSB: u8 = 0x63;
const CC_RPN_LSB: u8 = 0x64;
const CC_RPN_MSB: u8 = 0x65;

macro_rules! field_or_return {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(_) => return,
        }
    };
}

macro_rules! read_sysex7_bytes {
    ($message:expr) => {{
        let count = u8::from(field_or_return!($message.number_of_bytes()));
        let bytes = [
            u8::from(field_or_return!($message.data0())),
            u8::from(field_or_return!($message.data1())),
            u8::from(field_or_return!($message.data2())),
            u8::from(field_or_return!($message.data3())),
            u8::from(field_or_return!($message.data4())),
            u8::from(field_or_return!($message.data5())),
        ];
        (count, bytes)
    }};
}

/// Handler set driving the actual byte reconstruction; see
/// [`UmpToBytestream`] for the public streaming entry point.
struct Context<const N: usize> {
    output: Fifo<u8, N>,
    group_mask: u16,
    running_status: Option<u8>,
    sysex_open: bool,
}

impl<const N: usize> Context<N> {
    fn new() -> Self {
        Self {
            output: Fifo::new(),
            group_mask: 0xffff,
            running_status: None,
            sysex_open: false,
        }
    }

    const fn group_enabled(&self, group: u8) -> bool {
        (self.group_mask >> group) & 1 == 1
    }

    fn push_raw(&mut self, byte: u8) {
        self.output.push_back(byte);
    }

    /// Pushes `status`, collapsing it against the previous status byte
    /// emitted this way (running status), then pushes `data` unconditionally.
    fn push_status_and_data(&mut self, status: u8, data: &[u8]) {
        if self.running_status != Some(status) {
            self.push_raw(status);
            self.running_status = Some(status);
        }
        for &byte in data {
            self.push_raw(byte);
        }
    }

    fn push_sysex_bytes(&mut self, bytes: [u8; 6], count: u8) {
        for &byte in &bytes[..count as usize] {
            self.push_raw(byte);
        }
    }
}

macro_rules! passthrough_channel_voice {
    ($fn:ident, $message:ty, $opcode:expr, [ $($field:ident),* ]) => {
        fn $fn(&mut self, message: $message) {
            let group = u8::from(field_or_return!(message.group()));
            if !self.group_enabled(group) {
                return;
            }
            let channel = u8::from(field_or_return!(message.channel()));
            let data = [ $(u8::from(field_or_return!(message.$field())),)* ];
            self.push_status_and_data($opcode | channel, &data);
        }
    };
}

impl<const N: usize> Handlers for Context<N> {
    // MIDI 1.0 Channel Voice: carried through unchanged.

    passthrough_channel_voice!(m1_note_off, m1cvm::NoteOff<'_>, 0x80, [note, velocity]);
    passthrough_channel_voice!(m1_note_on, m1cvm::NoteOn<'_>, 0x90, [note, velocity]);
    passthrough_channel_voice!(m1_poly_pressure, m1cvm::PolyPressure<'_>, 0xa0, [note, data]);
    passthrough_channel_voice!(m1_control_change, m1cvm::ControlChange<'_>, 0xb0, [index, data]);
    passthrough_channel_voice!(m1_program_change, m1cvm::ProgramChange<'_>, 0xc0, [program]);
    passthrough_channel_voice!(m1_channel_pressure, m1cvm::ChannelPressure<'_>, 0xd0, [pressure]);
    passthrough_channel_voice!(m1_pitch_bend, m1cvm::PitchBend<'_>, 0xe0, [lsb, msb]);

    // System Common: carried through unchanged.

    fn midi_time_code(&mut self, message: system::common::MIDITimeCode<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let system::common::QuarterFrame(data, ty) = field_or_return!(message.quarter_frame());
        let nibble = (u8::from(ty) << 4) | (u8::from(data) & 0x0f);
        self.push_status_and_data(0xf1, &[nibble]);
    }

    fn song_position_pointer(&mut self, message: system::common::SongPositionPointer<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let position = field_or_return!(message.position());
        self.push_status_and_data(0xf2, &[u8::from(position.0), u8::from(position.1)]);
    }

    fn song_select(&mut self, message: system::common::SongSelect<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let song = u8::from(field_or_return!(message.song()));
        self.push_status_and_data(0xf3, &[song]);
    }

    fn tune_request(&mut self, message: system::common::TuneRequest<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        self.push_status_and_data(0xf6, &[]);
    }

    // System Real Time: never run through running status, interleaves freely.

    fn timing_clock(&mut self, message: system::real_time::TimingClock<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if self.group_enabled(group) {
            self.push_raw(0xf8);
        }
    }

    fn seq_start(&mut self, message: system::real_time::Start<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if self.group_enabled(group) {
            self.push_raw(0xfa);
        }
    }

    fn seq_continue(&mut self, message: system::real_time::Continue<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if self.group_enabled(group) {
            self.push_raw(0xfb);
        }
    }

    fn seq_stop(&mut self, message: system::real_time::Stop<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if self.group_enabled(group) {
            self.push_raw(0xfc);
        }
    }

    fn active_sensing(&mut self, message: system::real_time::ActiveSensing<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if self.group_enabled(group) {
            self.push_raw(0xfe);
        }
    }

    fn reset(&mut self, message: system::real_time::Reset<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if self.group_enabled(group) {
            self.push_raw(0xff);
        }
    }

    // Data64 (Sysex7): reassembled into a single 0xf0 ... 0xf7 run.

    fn sysex7_in_1(&mut self, message: data64::Sysex7In1<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let (count, bytes) = read_sysex7_bytes!(message);
        self.push_raw(SYSEX_START);
        self.push_sysex_bytes(bytes, count);
        self.push_raw(SYSEX_END);
        self.running_status = None;
    }

    fn sysex7_start(&mut self, message: data64::Sysex7Start<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let (count, bytes) = read_sysex7_bytes!(message);
        self.push_raw(SYSEX_START);
        self.push_sysex_bytes(bytes, count);
        self.sysex_open = true;
        self.running_status = None;
    }

    fn sysex7_continue(&mut self, message: data64::Sysex7Continue<'_>) {
        if !self.sysex_open {
            // A Continue frame with no prior Start: nothing to continue.
            return;
        }
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let (count, bytes) = read_sysex7_bytes!(message);
        self.push_sysex_bytes(bytes, count);
    }

    fn sysex7_end(&mut self, message: data64::Sysex7End<'_>) {
        if !self.sysex_open {
            // An End frame with no prior Start: nothing to close.
            return;
        }
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let (count, bytes) = read_sysex7_bytes!(message);
        self.push_sysex_bytes(bytes, count);
        self.push_raw(SYSEX_END);
        self.sysex_open = false;
    }

    // MIDI 2.x Channel Voice: scaled down to MIDI 1.0 width.

    fn m2_note_off(&mut self, message: m2cvm::NoteOff<'_>) {
        self.m2_note(message.group(), message.channel(), message.note(), message.velocity(), 0x80);
    }

    fn m2_note_on(&mut self, message: m2cvm::NoteOn<'_>) {
        self.m2_note(message.group(), message.channel(), message.note(), message.velocity(), 0x90);
    }

    fn m2_poly_pressure(&mut self, message: m2cvm::PolyPressure<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let channel = u8::from(field_or_return!(message.channel()));
        let note = u8::from(field_or_return!(message.note()));
        let data = mcm_scale::<32, 7>(u32::from(field_or_return!(message.data()))) as u8;
        self.push_status_and_data(0xa0 | channel, &[note, data]);
    }

    fn m2_control_change(&mut self, message: m2cvm::ControlChange<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let channel = u8::from(field_or_return!(message.channel()));
        let index = u8::from(field_or_return!(message.index()));
        let data = mcm_scale::<32, 7>(u32::from(field_or_return!(message.data()))) as u8;
        self.push_status_and_data(0xb0 | channel, &[index, data]);
    }

    fn m2_channel_pressure(&mut self, message: m2cvm::ChannelPressure<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let channel = u8::from(field_or_return!(message.channel()));
        let data = mcm_scale::<32, 7>(u32::from(field_or_return!(message.data()))) as u8;
        self.push_status_and_data(0xd0 | channel, &[data]);
    }

    fn m2_program_change(&mut self, message: m2cvm::ProgramChange<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let channel = u8::from(field_or_return!(message.channel()));
        let bank_valid = u8::from(field_or_return!(message.bank_valid()));
        if bank_valid != 0 {
            let bank_msb = u8::from(field_or_return!(message.bank_msb()));
            let bank_lsb = u8::from(field_or_return!(message.bank_lsb()));
            self.push_status_and_data(0xb0 | channel, &[CC_BANK_SELECT, bank_msb]);
            self.push_status_and_data(0xb0 | channel, &[CC_BANK_SELECT_LSB, bank_lsb]);
        }
        let program = u8::from(field_or_return!(message.program()));
        self.push_status_and_data(0xc0 | channel, &[program]);
    }

    fn m2_registered_controller(&mut self, message: m2cvm::RegisteredController<'_>) {
        self.m2_controller(message, CC_RPN_MSB, CC_RPN_LSB);
    }

    fn m2_assignable_controller(&mut self, message: m2cvm::AssignableController<'_>) {
        self.m2_controller(message, CC_NRPN_MSB, CC_NRPN_LSB);
    }

    fn m2_pitch_bend(&mut self, message: m2cvm::PitchBend<'_>) {
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let channel = u8::from(field_or_return!(message.channel()));
        let value = mcm_scale::<32, 14>(u32::from(field_or_return!(message.data())));
        let lsb = (value & 0x7f) as u8;
        let msb = ((value >> 7) & 0x7f) as u8;
        self.push_status_and_data(0xe0 | channel, &[lsb, msb]);
    }

    // Per-note pitch bend, per-note management, and relative (N)RPN have no
    // MIDI 1.0 equivalent; left unimplemented (dropped), not remapped.
}

impl<const N: usize> Context<N> {
    fn m2_note(
        &mut self,
        group: Result<midi_2_protocol::message::Group, midi_2_protocol::Error>,
        channel: Result<m2cvm::Channel, midi_2_protocol::Error>,
        note: Result<m2cvm::Note, midi_2_protocol::Error>,
        velocity: Result<m2cvm::Velocity, midi_2_protocol::Error>,
        opcode: u8,
    ) {
        let group = u8::from(field_or_return!(group));
        if !self.group_enabled(group) {
            return;
        }
        let channel = u8::from(field_or_return!(channel));
        let note = u8::from(field_or_return!(note));
        let velocity = mcm_scale::<16, 7>(u32::from(u16::from(field_or_return!(velocity)))) as u8;
        self.push_status_and_data(opcode | channel, &[note, velocity]);
    }

    fn m2_controller<'a, M>(&mut self, message: M, controller_msb: u8, controller_lsb: u8)
    where
        M: ControllerFields<'a>,
    {
        let group = u8::from(field_or_return!(message.group()));
        if !self.group_enabled(group) {
            return;
        }
        let channel = u8::from(field_or_return!(message.channel()));
        let bank = u8::from(field_or_return!(message.bank()));
        let controller = u8::from(field_or_return!(message.controller()));
        let value = mcm_scale::<32, 14>(u32::from(field_or_return!(message.data())));
        let data_lsb = (value & 0x7f) as u8;
        let data_msb = ((value >> 7) & 0x7f) as u8;

        self.push_status_and_data(0xb0 | channel, &[controller_msb, bank]);
        self.push_status_and_data(0xb0 | channel, &[controller_lsb, controller]);
        self.push_status_and_data(0xb0 | channel, &[CC_DATA_ENTRY_MSB, data_msb]);
        self.push_status_and_data(0xb0 | channel, &[CC_DATA_ENTRY_LSB, data_lsb]);
    }
}

/// Shared field accessors of [`m2cvm::RegisteredController`] and
/// [`m2cvm::AssignableController`], letting [`Context::m2_controller`]
/// handle both (N)RPN families with one body.
trait ControllerFields<'a> {
    fn group(&self) -> Result<midi_2_protocol::message::Group, midi_2_protocol::Error>;
    fn channel(&self) -> Result<m2cvm::Channel, midi_2_protocol::Error>;
    fn bank(&self) -> Result<m2cvm::Bank, midi_2_protocol::Error>;
    fn controller(&self) -> Result<m2cvm::Controller, midi_2_protocol::Error>;
    fn data(&self) -> Result<m2cvm::Data, midi_2_protocol::Error>;
}

macro_rules! impl_controller_fields {
    ($message:ident) => {
        impl<'a> ControllerFields<'a> for m2cvm::$message<'a> {
            fn group(&self) -> Result<midi_2_protocol::message::Group, midi_2_protocol::Error> {
                m2cvm::$message::group(self)
            }

            fn channel(&self) -> Result<m2cvm::Channel, midi_2_protocol::Error> {
                m2cvm::$message::channel(self)
            }

            fn bank(&self) -> Result<m2cvm::Bank, midi_2_protocol::Error> {
                m2cvm::$message::bank(self)
            }

            fn controller(&self) -> Result<m2cvm::Controller, midi_2_protocol::Error> {
                m2cvm::$message::controller(self)
            }

            fn data(&self) -> Result<m2cvm::Data, midi_2_protocol::Error> {
                m2cvm::$message::data(self)
            }
        }
    };
}

impl_controller_fields!(RegisteredController);
impl_controller_fields!(AssignableController);

/// Streaming UMP to MIDI 1.0 bytestream back-translator.
///
/// `N` sizes the output byte queue; the default of 32 comfortably holds a
/// reassembled multi-frame Sysex7 run plus a little headroom.
pub struct UmpToBytestream<const N: usize = 32> {
    dispatcher: Dispatcher<Context<N>>,
}

impl<const N: usize> UmpToBytestream<N> {
    /// Creates a back-translator with every group enabled for output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dispatcher: Dispatcher::new(Context::new()),
        }
    }

    /// Restricts output to the groups set in `mask` (bit `n` enables group
    /// `n`). A mask of `0` is treated as `0xffff` (every group).
    pub fn set_group_mask(&mut self, mask: u16) {
        self.dispatcher.handlers_mut().group_mask = if mask == 0 { 0xffff } else { mask };
    }

    /// Feeds one 32-bit UMP word.
    pub fn push(&mut self, word: u32) {
        self.dispatcher.push(word);
    }

    /// Feeds every word of a pre-built UMP record, in order.
    pub fn push_words(&mut self, words: &[u32]) {
        self.dispatcher.push_words(words);
    }

    /// Whether at least one reconstructed MIDI 1.0 byte is ready to be popped.
    #[must_use]
    pub fn has_output(&self) -> bool {
        !self.dispatcher.handlers().output.is_empty()
    }

    /// Removes and returns the oldest ready MIDI 1.0 byte.
    ///
    /// # Panics
    /// Panics if [`UmpToBytestream::has_output`] is `false`.
    pub fn pop_byte(&mut self) -> u8 {
        self.dispatcher.handlers_mut().output.pop_front()
    }
}

impl<const N: usize> Default for UmpToBytestream<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::UmpToBytestream;

    fn drain<const N: usize>(back: &mut UmpToBytestream<N>) -> Vec<u8> {
        let mut bytes = Vec::new();
        while back.has_output() {
            bytes.push(back.pop_byte());
        }
        bytes
    }

    #[test]
    fn m1_note_on_round_trips_unchanged() {
        let mut back: UmpToBytestream = UmpToBytestream::new();
        back.push(0x2091_3c50);

        assert_eq!(drain(&mut back), vec![0x91, 0x3c, 0x50]);
    }

    #[test]
    fn running_status_collapses_repeated_channel_voice_status() {
        let mut back: UmpToBytestream = UmpToBytestream::new();
        back.push(0x2091_3c50);
        back.push(0x2091_3e60);

        assert_eq!(drain(&mut back), vec![0x91, 0x3c, 0x50, 0x3e, 0x60]);
    }

    #[test]
    fn m2_note_on_scales_16_bit_velocity_down_to_7_bits() {
        let mut back: UmpToBytestream = UmpToBytestream::new();
        // Note On, channel 0, note 0x3c, velocity 0xffff (maximum).
        back.push_words(&[0x4090_3c00, 0xffff_0000]);

        assert_eq!(drain(&mut back), vec![0x90, 0x3c, 0x7f]);
    }

    #[test]
    fn m2_pitch_bend_scales_32_bit_data_down_to_14_bits() {
        let mut back: UmpToBytestream = UmpToBytestream::new();
        back.push_words(&[0x40e0_0000, 0xffff_ffff]);

        assert_eq!(drain(&mut back), vec![0xe0, 0x7f, 0x7f]);
    }

    #[test]
    fn m2_program_change_with_bank_emits_two_cc_pairs_then_program_change() {
        let mut back: UmpToBytestream = UmpToBytestream::new();
        let mut packet = midi_2_protocol::message::m2cvm::ProgramChange::packet();
        let message = midi_2_protocol::message::m2cvm::ProgramChange::try_init_with_bank(
            &mut packet,
            midi_2_protocol::message::m2cvm::Program::new(0x0a),
            midi_2_protocol::message::m2cvm::BankMsb::new(0x01),
            midi_2_protocol::message::m2cvm::BankLsb::new(0x02),
        )
        .unwrap();
        drop(message);

        back.push_words(&packet);

        assert_eq!(
            drain(&mut back),
            vec![0xb0, 0x00, 0x01, 0x20, 0x02, 0xc0, 0x0a]
        );
    }

    #[test]
    fn sysex7_reassembles_across_start_continue_end_frames() {
        let mut back: UmpToBytestream = UmpToBytestream::new();
        back.push_words(&[0x3016_7e7f, 0x0d70_024b]);
        back.push_words(&[0x3032_607a, 0x0000_0000]);

        assert_eq!(
            drain(&mut back),
            vec![0xf0, 0x7e, 0x7f, 0x0d, 0x70, 0x02, 0x4b, 0x60, 0x7a, 0xf7]
        );
    }

    #[test]
    fn sysex7_continue_without_start_is_dropped() {
        let mut back: UmpToBytestream = UmpToBytestream::new();
        // Status nibble 0x2 (Continue) with no preceding Start frame.
        back.push_words(&[0x3022_607a, 0x0000_0000]);

        assert!(drain(&mut back).is_empty());
    }

    #[test]
    fn group_mask_filters_output_by_group() {
        let mut back: UmpToBytestream = UmpToBytestream::new();
        back.set_group_mask(0b0001);
        back.push(0x2391_3c50);

        assert!(drain(&mut back).is_empty());
    }

    #[test]
    fn real_time_message_passes_through_without_running_status() {
        let mut back: UmpToBytestream = UmpToBytestream::new();
        back.push(0x10f8_0000);

        assert_eq!(drain(&mut back), vec![0xf8]);
    }
}
