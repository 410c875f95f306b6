//! End-to-end Universal MIDI Packet decode scenarios driven purely through
//! [`Dispatcher::push`], covering a representative message from each family
//! and the reserved-message-type boundary behavior.

use midi_2_protocol::{
    dispatcher::{
        Dispatcher,
        Handlers,
    },
    message::{
        data64,
        flex_data,
        m1cvm,
        m2cvm,
        stream,
        system,
        utility,
    },
};

#[derive(Default)]
struct Recorder {
    unknown_words: Vec<Vec<u32>>,
    noop_count: usize,
    timing_clocks: usize,
    m1_note_ons: Vec<(u8, u8, u8)>,
    m2_note_ons: usize,
    sysex7_in_1s: usize,
    set_tempos: usize,
    endpoint_discoveries: usize,
    song_position_pointers: Vec<u16>,
}

impl Handlers for Recorder {
    fn unknown(&mut self, words: &[u32]) {
        self.unknown_words.push(words.to_vec());
    }

    fn noop(&mut self) {
        self.noop_count += 1;
    }

    fn timing_clock(&mut self, _message: system::real_time::TimingClock<'_>) {
        self.timing_clocks += 1;
    }

    fn m1_note_on(&mut self, message: m1cvm::NoteOn<'_>) {
        self.m1_note_ons.push((
            u8::from(message.channel().unwrap()),
            u8::from(message.note().unwrap()),
            u8::from(message.velocity().unwrap()),
        ));
    }

    fn m2_note_on(&mut self, _message: m2cvm::NoteOn<'_>) {
        self.m2_note_ons += 1;
    }

    fn sysex7_in_1(&mut self, _message: data64::Sysex7In1<'_>) {
        self.sysex7_in_1s += 1;
    }

    fn set_tempo(&mut self, _message: flex_data::SetTempo<'_>) {
        self.set_tempos += 1;
    }

    fn endpoint_discovery(&mut self, _message: stream::EndpointDiscovery<'_>) {
        self.endpoint_discoveries += 1;
    }

    fn song_position_pointer(&mut self, message: system::common::SongPositionPointer<'_>) {
        self.song_position_pointers
            .push(message.position().unwrap().value());
    }
}

#[test]
fn decodes_one_representative_message_from_every_word_count_family() {
    let mut dispatcher = Dispatcher::new(Recorder::default());

    dispatcher.push(0x0000_0000); // Utility Noop, 1 word.
    dispatcher.push(0x10f8_0000); // System Real Time, 1 word.
    dispatcher.push(0x2091_3c50); // MIDI 1.0 Channel Voice, 1 word.
    dispatcher.push_words(&[0x3002_7e7f, 0x0000_0000]); // Sysex7 In 1, 2 words.
    dispatcher.push_words(&[0x4090_3c00, 0xffff_0000]); // MIDI 2.x Channel Voice, 2 words.
    dispatcher.push_words(&[0xd000_0001, 0x000f_4240, 0, 0]); // Flex Data Set Tempo, 4 words.
    dispatcher.push_words(&[0xf000_0101, 0, 0, 0]); // Stream Endpoint Discovery, 4 words.

    let handlers = dispatcher.handlers();
    assert_eq!(handlers.noop_count, 1);
    assert_eq!(handlers.timing_clocks, 1);
    assert_eq!(handlers.m1_note_ons, vec![(1, 0x3c, 0x50)]);
    assert_eq!(handlers.sysex7_in_1s, 1);
    assert_eq!(handlers.m2_note_ons, 1);
    assert_eq!(handlers.set_tempos, 1);
    assert_eq!(handlers.endpoint_discoveries, 1);
    assert!(handlers.unknown_words.is_empty());
}

#[test]
fn every_reserved_message_type_routes_to_unknown_with_its_implied_word_count() {
    // 0x6 and 0x7 are reserved 1-word types; 0x8, 0x9, and 0xa reserved
    // 2-word; 0xb and 0xc reserved 3-word; 0xe reserved 4-word.
    let cases: &[(u8, usize)] = &[(0x6, 1), (0x7, 1), (0x8, 2), (0x9, 2), (0xa, 2), (0xb, 3), (0xc, 3), (0xe, 4)];

    for &(message_type, words) in cases {
        let mut dispatcher = Dispatcher::new(Recorder::default());
        let first_word = u32::from(message_type) << 28;

        dispatcher.push(first_word);
        for _ in 1..words {
            dispatcher.push(0);
        }

        let handlers = dispatcher.handlers();
        assert_eq!(handlers.unknown_words.len(), 1, "message type {message_type:#x} should report exactly once");
        assert_eq!(handlers.unknown_words[0].len(), words, "message type {message_type:#x} word count");
    }
}

#[test]
fn a_nonzero_song_position_pointer_decodes_its_two_reserved_bit_separated_7_bit_halves() {
    let mut dispatcher = Dispatcher::new(Recorder::default());

    // group 0, status 0xf2, position_lsb 0x41 (reserved0 set), position_msb 0x40 (reserved1 set).
    dispatcher.push(0x10f2_c1c0);

    let handlers = dispatcher.handlers();
    assert_eq!(handlers.song_position_pointers, vec![0x2041]);
}

#[test]
fn a_reserved_message_does_not_desynchronize_the_word_that_follows_it() {
    let mut dispatcher = Dispatcher::new(Recorder::default());

    dispatcher.push_words(&[0xe000_0000, 0, 0, 0]);
    dispatcher.push(0x10f8_0000);

    let handlers = dispatcher.handlers();
    assert_eq!(handlers.unknown_words.len(), 1);
    assert_eq!(handlers.timing_clocks, 1);
}
