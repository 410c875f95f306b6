//! End-to-end bytestream/UMP scenarios spanning the transcoder, the
//! back-translator, and the bit-resolution scaler together, rather than any
//! one of them in isolation.

use midi_2::{
    back_translate::UmpToBytestream,
    scale::mcm_scale,
    transcoder::Transcoder,
};

fn drain_words<const N: usize>(transcoder: &mut Transcoder<N>) -> Vec<u32> {
    let mut words = Vec::new();
    while transcoder.has_output() {
        words.push(transcoder.pop_word());
    }
    words
}

fn drain_bytes<const N: usize>(back: &mut UmpToBytestream<N>) -> Vec<u8> {
    let mut bytes = Vec::new();
    while back.has_output() {
        bytes.push(back.pop_byte());
    }
    bytes
}

#[test]
fn running_status_note_on_followed_by_bare_data_bytes() {
    let mut transcoder: Transcoder = Transcoder::new(1);

    // A single explicit Note On status byte, then three more note pairs with
    // the status byte omitted: running status must supply it each time.
    transcoder.push_bytes(&[0x91, 0x60, 0x7f]);
    transcoder.push_bytes(&[0x60, 0x7f, 0x60, 0x00]);

    let words = drain_words(&mut transcoder);
    assert_eq!(words.len(), 2);
    for word in &words {
        assert_eq!(word >> 28, 0x2, "message type must be MIDI 1.0 Channel Voice");
        assert_eq!((word >> 24) & 0xf, 1, "group must be carried through");
        assert_eq!((word >> 20) & 0xf, 0x9, "status nibble must be Note On");
        assert_eq!((word >> 16) & 0xf, 1, "channel must be carried through");
    }
}

#[test]
fn bank_select_and_program_change_transcode_to_three_independent_words() {
    let mut transcoder: Transcoder = Transcoder::new(0);

    transcoder.push_bytes(&[0xb0, 0x00, 0x01]); // Bank Select MSB
    transcoder.push_bytes(&[0xb0, 0x20, 0x02]); // Bank Select LSB
    transcoder.push_bytes(&[0xc0, 0x0a]); // Program Change

    assert_eq!(
        drain_words(&mut transcoder),
        vec![0x20b0_0001, 0x20b0_2002, 0x20c0_0a00]
    );
}

#[test]
fn sysex_longer_than_six_bytes_rechunks_through_start_continue_end() {
    let mut transcoder: Transcoder = Transcoder::new(2);

    transcoder.push(0xf0);
    transcoder.push_bytes(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    transcoder.push_bytes(&[0x07]);
    transcoder.push(0xf7);

    let words = drain_words(&mut transcoder);
    assert_eq!(words.len(), 4);
    // Start frame: status nibble 0x1, byte count 6.
    assert_eq!(words[0] >> 20 & 0xf, 0x1);
    assert_eq!(words[0] >> 16 & 0xf, 6);
    // End frame: status nibble 0x3, byte count 1.
    assert_eq!(words[2] >> 20 & 0xf, 0x3);
    assert_eq!(words[2] >> 16 & 0xf, 1);
}

#[test]
fn real_time_byte_surfaces_inside_an_in_progress_note_on() {
    let mut transcoder: Transcoder = Transcoder::new(0);

    transcoder.push_bytes(&[0x91, 0x40]);
    transcoder.push(0xf8); // Timing Clock arrives before the velocity byte.
    transcoder.push(0x7f);

    assert_eq!(drain_words(&mut transcoder), vec![0x10f8_0000, 0x2091_407f]);
}

#[test]
fn mcm_scale_corner_values_hold_across_every_width_pair_used_on_the_wire() {
    assert_eq!(mcm_scale::<7, 16>(0), 0);
    assert_eq!(mcm_scale::<7, 16>(0x7f), 0xffff);
    assert_eq!(mcm_scale::<7, 16>(0x40), 0x8000);

    assert_eq!(mcm_scale::<14, 32>(0), 0);
    assert_eq!(mcm_scale::<14, 32>(0x3fff), 0xffff_ffff);
    assert_eq!(mcm_scale::<14, 32>(0x2000), 0x8000_0000);

    assert_eq!(mcm_scale::<32, 7>(0), 0);
    assert_eq!(mcm_scale::<32, 7>(0xffff_ffff), 0x7f);
}

#[test]
fn bytestream_to_ump_and_back_preserves_channel_voice_messages() {
    let mut transcoder: Transcoder = Transcoder::new(0);
    transcoder.push_bytes(&[0x91, 0x3c, 0x50, 0x3e, 0x60]);
    let words = drain_words(&mut transcoder);

    let mut back: UmpToBytestream = UmpToBytestream::new();
    back.push_words(&words);

    assert_eq!(drain_bytes(&mut back), vec![0x91, 0x3c, 0x50, 0x3e, 0x60]);
}

#[test]
fn bytestream_to_ump_and_back_preserves_a_rechunked_sysex_message() {
    let mut transcoder: Transcoder = Transcoder::new(0);
    let mut original = vec![0xf0u8];
    original.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
    original.push(0xf7);
    transcoder.push_bytes(&original);
    let words = drain_words(&mut transcoder);

    let mut back: UmpToBytestream = UmpToBytestream::new();
    back.push_words(&words);

    assert_eq!(drain_bytes(&mut back), original);
}
