// =============================================================================
// Flex Data
// =============================================================================

//! Flex Data messages **([M2-104-UM 7.9])**: setup/performance events and
//! free-form metadata or performance text, four words each.
//!
//! Word 0 carries the addressing (channel or group) and a status bank/status
//! pair instead of a single status nibble; words 1-3 carry the 96 bits of
//! payload, whose shape depends on the status.

use bitvec::{
    order::Msb0,
    slice::BitSlice,
    view::BitView,
};
use num_enum::{
    IntoPrimitive,
    TryFromPrimitive,
};

use crate::{
    field,
    message::{
        self,
        flex_data,
        Group,
        MessageType,
    },
    packet::TryReadField,
    Error,
};

// -----------------------------------------------------------------------------

// Fields

/// Whether a Flex Data message is addressed to a channel or to a group as a
/// whole.
#[derive(Debug, Eq, IntoPrimitive, PartialEq, TryFromPrimitive)]
#[num_enum(error_type(name = Error, constructor = Error::conversion))]
#[repr(u8)]
pub enum Address {
    Channel = 0x0,
    Group = 0x1,
}

field::impl_field_trait_field!(Address, u8, 10..=11);

field::impl_field!(
    /// 2-bit message form: complete, start, continue, or end of a group of
    /// Flex Data messages sharing one logical event.
    pub Form { u8, 8..=9, 2 }
);

field::impl_field!(
    /// 4-bit channel, meaningful only when [`Address::Channel`] is set.
    pub Channel { u8, 12..=15, 4 }
);

/// The status bank, selecting between Setup/Performance events and the two
/// free-form text banks.
#[derive(Debug, Eq, IntoPrimitive, PartialEq, TryFromPrimitive)]
#[num_enum(error_type(name = Error, constructor = Error::conversion))]
#[repr(u8)]
pub enum StatusBank {
    SetupAndPerformance = 0x00,
    MetadataText = 0x01,
    PerformanceText = 0x02,
}

field::impl_field_trait_field!(StatusBank, u8, 16..=23);

field::impl_field!(pub Status { u8, 24..=31 });

// Setup / Performance payloads

field::impl_field!(
    /// Tempo, in units of 10 nanoseconds per quarter note.
    pub Tempo { u32, 32..=63 }
);

field::impl_field!(pub Numerator { u8, 32..=39 });
field::impl_field!(
    /// Denominator, expressed as a power-of-two exponent (2 => quarter note).
    pub Denominator { u8, 40..=47 }
);
field::impl_field!(pub NumberOf32ndNotesPerQuarter { u8, 48..=55 });

field::impl_field!(pub NumClocksPerPrimaryClick { u8, 32..=39 });
field::impl_field!(pub BarAccentPart1 { u8, 40..=47 });
field::impl_field!(pub BarAccentPart2 { u8, 48..=55 });
field::impl_field!(pub BarAccentPart3 { u8, 56..=63 });
field::impl_field!(pub NumSubdivisionClicks1 { u8, 64..=71 });
field::impl_field!(pub NumSubdivisionClicks2 { u8, 72..=79 });

field::impl_field!(
    /// 4-bit tonic note of the key signature.
    pub Tonic { u8, 36..=39, 4 }
);
field::impl_field!(
    /// 4-bit sharps/flats count, two's complement (-7..=7).
    pub SharpsFlats { u8, 32..=35, 4 }
);

field::impl_field!(
    /// 4-bit sharps/flats count for the chord tonic.
    pub ChordTonicSharpsFlats { u8, 32..=35, 4 }
);
field::impl_field!(
    /// 4-bit chord tonic note.
    pub ChordTonic { u8, 36..=39, 4 }
);
field::impl_field!(pub ChordType { u8, 40..=47 });
field::impl_field!(pub Alt1Type { u8, 48..=51, 4 });
field::impl_field!(pub Alt1Degree { u8, 52..=55, 4 });
field::impl_field!(pub Alt2Type { u8, 56..=59, 4 });
field::impl_field!(pub Alt2Degree { u8, 60..=63, 4 });
field::impl_field!(pub Alt3Type { u8, 64..=67, 4 });
field::impl_field!(pub Alt3Degree { u8, 68..=71, 4 });
field::impl_field!(pub Alt4Type { u8, 72..=75, 4 });
field::impl_field!(pub Alt4Degree { u8, 76..=79, 4 });
field::impl_field!(
    /// 4-bit sharps/flats count for the bass note.
    pub BassSharpsFlats { u8, 80..=83, 4 }
);
field::impl_field!(
    /// 4-bit bass note, or the chord tonic itself when absent.
    pub BassNote { u8, 84..=87, 4 }
);
field::impl_field!(pub BassChordType { u8, 88..=95 });
field::impl_field!(pub BassAlt1Type { u8, 96..=99, 4 });
field::impl_field!(pub BassAlt1Degree { u8, 100..=103, 4 });
field::impl_field!(pub BassAlt2Type { u8, 104..=107, 4 });
field::impl_field!(pub BassAlt2Degree { u8, 108..=111, 4 });

// Text payloads

field::impl_field!(pub TextByte0 { u8, 32..=39 });
field::impl_field!(pub TextByte1 { u8, 40..=47 });
field::impl_field!(pub TextByte2 { u8, 48..=55 });
field::impl_field!(pub TextByte3 { u8, 56..=63 });
field::impl_field!(pub TextByte4 { u8, 64..=71 });
field::impl_field!(pub TextByte5 { u8, 72..=79 });
field::impl_field!(pub TextByte6 { u8, 80..=87 });
field::impl_field!(pub TextByte7 { u8, 88..=95 });
field::impl_field!(pub TextByte8 { u8, 96..=103 });
field::impl_field!(pub TextByte9 { u8, 104..=111 });
field::impl_field!(pub TextByte10 { u8, 112..=119 });
field::impl_field!(pub TextByte11 { u8, 120..=127 });

// -----------------------------------------------------------------------------

// Messages

flex_data::impl_message!(
    /// Set Tempo.
    pub SetTempo { StatusBank::SetupAndPerformance, 0x01, [
        { tempo, Tempo },
    ] }
);

impl<'a> SetTempo<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], tempo: Tempo) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_tempo(tempo))
    }
}

flex_data::impl_message!(
    /// Set Time Signature.
    pub SetTimeSignature { StatusBank::SetupAndPerformance, 0x02, [
        { numerator, Numerator },
        { denominator, Denominator },
        { number_of_32nd_notes_per_quarter, NumberOf32ndNotesPerQuarter },
    ] }
);

impl<'a> SetTimeSignature<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(
        packet: &'a mut [u32],
        numerator: Numerator,
        denominator: Denominator,
        number_of_32nd_notes_per_quarter: NumberOf32ndNotesPerQuarter,
    ) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_numerator(numerator)
            .set_denominator(denominator)
            .set_number_of_32nd_notes_per_quarter(number_of_32nd_notes_per_quarter))
    }
}

flex_data::impl_message!(
    /// Set Metronome.
    pub SetMetronome { StatusBank::SetupAndPerformance, 0x03, [
        { num_clocks_per_primary_click, NumClocksPerPrimaryClick },
        { bar_accent_part_1, BarAccentPart1 },
        { bar_accent_part_2, BarAccentPart2 },
        { bar_accent_part_3, BarAccentPart3 },
        { num_subdivision_clicks_1, NumSubdivisionClicks1 },
        { num_subdivision_clicks_2, NumSubdivisionClicks2 },
    ] }
);

impl<'a> SetMetronome<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    #[allow(clippy::too_many_arguments)]
    pub fn try_init(
        packet: &'a mut [u32],
        num_clocks_per_primary_click: NumClocksPerPrimaryClick,
        bar_accent_part_1: BarAccentPart1,
        bar_accent_part_2: BarAccentPart2,
        bar_accent_part_3: BarAccentPart3,
        num_subdivision_clicks_1: NumSubdivisionClicks1,
        num_subdivision_clicks_2: NumSubdivisionClicks2,
    ) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_num_clocks_per_primary_click(num_clocks_per_primary_click)
            .set_bar_accent_part_1(bar_accent_part_1)
            .set_bar_accent_part_2(bar_accent_part_2)
            .set_bar_accent_part_3(bar_accent_part_3)
            .set_num_subdivision_clicks_1(num_subdivision_clicks_1)
            .set_num_subdivision_clicks_2(num_subdivision_clicks_2))
    }
}

flex_data::impl_message!(
    /// Set Key Signature.
    pub SetKeySignature { StatusBank::SetupAndPerformance, 0x05, [
        { sharps_flats, SharpsFlats },
        { tonic, Tonic },
    ] }
);

impl<'a> SetKeySignature<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], sharps_flats: SharpsFlats, tonic: Tonic) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_sharps_flats(sharps_flats)
            .set_tonic(tonic))
    }
}

flex_data::impl_message!(
    /// Set Chord Name.
    pub SetChordName { StatusBank::SetupAndPerformance, 0x06, [
        { chord_tonic_sharps_flats, ChordTonicSharpsFlats },
        { chord_tonic, ChordTonic },
        { chord_type, ChordType },
        { alt_1_type, Alt1Type },
        { alt_1_degree, Alt1Degree },
        { alt_2_type, Alt2Type },
        { alt_2_degree, Alt2Degree },
        { alt_3_type, Alt3Type },
        { alt_3_degree, Alt3Degree },
        { alt_4_type, Alt4Type },
        { alt_4_degree, Alt4Degree },
        { bass_sharps_flats, BassSharpsFlats },
        { bass_note, BassNote },
        { bass_chord_type, BassChordType },
        { bass_alt_1_type, BassAlt1Type },
        { bass_alt_1_degree, BassAlt1Degree },
        { bass_alt_2_type, BassAlt2Type },
        { bass_alt_2_degree, BassAlt2Degree },
    ] }
);

impl<'a> SetChordName<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    #[allow(clippy::too_many_arguments)]
    pub fn try_init(
        packet: &'a mut [u32],
        chord_tonic_sharps_flats: ChordTonicSharpsFlats,
        chord_tonic: ChordTonic,
        chord_type: ChordType,
        alt_1: (Alt1Type, Alt1Degree),
        alt_2: (Alt2Type, Alt2Degree),
        alt_3: (Alt3Type, Alt3Degree),
        alt_4: (Alt4Type, Alt4Degree),
        bass_sharps_flats: BassSharpsFlats,
        bass_note: BassNote,
        bass_chord_type: BassChordType,
        bass_alt_1: (BassAlt1Type, BassAlt1Degree),
        bass_alt_2: (BassAlt2Type, BassAlt2Degree),
    ) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_chord_tonic_sharps_flats(chord_tonic_sharps_flats)
            .set_chord_tonic(chord_tonic)
            .set_chord_type(chord_type)
            .set_alt_1_type(alt_1.0)
            .set_alt_1_degree(alt_1.1)
            .set_alt_2_type(alt_2.0)
            .set_alt_2_degree(alt_2.1)
            .set_alt_3_type(alt_3.0)
            .set_alt_3_degree(alt_3.1)
            .set_alt_4_type(alt_4.0)
            .set_alt_4_degree(alt_4.1)
            .set_bass_sharps_flats(bass_sharps_flats)
            .set_bass_note(bass_note)
            .set_bass_chord_type(bass_chord_type)
            .set_bass_alt_1_type(bass_alt_1.0)
            .set_bass_alt_1_degree(bass_alt_1.1)
            .set_bass_alt_2_type(bass_alt_2.0)
            .set_bass_alt_2_degree(bass_alt_2.1))
    }
}

macro_rules! text_message {
    ($(#[$meta:meta])* $vis:vis $message:ident, $bank:expr) => {
        flex_data::impl_message!(
            $(#[$meta])*
            $vis $message { $bank, u8::MAX, [
                { text_byte_0, TextByte0 },
                { text_byte_1, TextByte1 },
                { text_byte_2, TextByte2 },
                { text_byte_3, TextByte3 },
                { text_byte_4, TextByte4 },
                { text_byte_5, TextByte5 },
                { text_byte_6, TextByte6 },
                { text_byte_7, TextByte7 },
                { text_byte_8, TextByte8 },
                { text_byte_9, TextByte9 },
                { text_byte_10, TextByte10 },
                { text_byte_11, TextByte11 },
            ] }
        );

        impl<'a> $message<'a> {
            /// # Errors
            /// Returns an error if `packet` is not sized for this message.
            pub fn try_init(packet: &'a mut [u32], status: Status) -> Result<Self, Error> {
                Ok(Self::try_init_internal(packet)?.set_status(status))
            }
        }
    };
}

text_message!(
    /// Free-form text in the Metadata Text bank: project name, composition
    /// name, copyright notice, and similar.
    pub MetadataText, StatusBank::MetadataText
);
text_message!(
    /// Free-form text in the Performance Text bank: lyrics and markers.
    pub PerformanceText, StatusBank::PerformanceText
);

// -----------------------------------------------------------------------------

// Enumeration

/// Any one of the Flex Data message shapes.
///
/// Unlike the other UMP families, status is a (bank, status) pair rather
/// than a single nibble; only the Setup/Performance bank has individually
/// typed shapes; the two text banks always decode to their `Text` variant.
#[derive(Debug)]
pub enum FlexData<'a> {
    SetTempo(SetTempo<'a>),
    SetTimeSignature(SetTimeSignature<'a>),
    SetMetronome(SetMetronome<'a>),
    SetKeySignature(SetKeySignature<'a>),
    SetChordName(SetChordName<'a>),
    MetadataText(MetadataText<'a>),
    PerformanceText(PerformanceText<'a>),
}

impl<'a> FlexData<'a> {
    pub(crate) fn try_new(bits: &'a mut BitSlice<u32, Msb0>) -> Result<Self, Error> {
        let bank = bits.try_read_field::<StatusBank>()?;
        match bank {
            StatusBank::SetupAndPerformance => match u8::from(bits.try_read_field::<Status>()?) {
                0x01 => Ok(Self::SetTempo(SetTempo::try_new(bits)?)),
                0x02 => Ok(Self::SetTimeSignature(SetTimeSignature::try_new(bits)?)),
                0x03 => Ok(Self::SetMetronome(SetMetronome::try_new(bits)?)),
                0x05 => Ok(Self::SetKeySignature(SetKeySignature::try_new(bits)?)),
                0x06 => Ok(Self::SetChordName(SetChordName::try_new(bits)?)),
                status => Err(Error::conversion(status)),
            },
            StatusBank::MetadataText => Ok(Self::MetadataText(MetadataText::try_new(bits)?)),
            StatusBank::PerformanceText => Ok(Self::PerformanceText(PerformanceText::try_new(bits)?)),
        }
    }
}

// -----------------------------------------------------------------------------

// Macros

// Message

macro_rules! impl_message {
    (
        $(#[$meta:meta])*
        $vis:vis $message:ident { $bank:expr, $status:expr, [
            $({ $name:ident, $type:ty },)*
        ] }
    ) => {
            message::impl_message!(
                $(#[$meta])*
                $vis $message { 4, [
                    { message_type, MessageType },
                    { group, Group },
                    { form, Form },
                    { address, Address },
                    { channel, Channel },
                    { status_bank, StatusBank },
                    { status, Status },
                  $({ $name, $type },)*
                ] }
            );

            impl<'a> $message<'a> {
                pub(crate) const STATUS_BANK: StatusBank = $bank;
                pub(crate) const STATUS: Status = Status::new($status);

                fn try_init_internal(packet: &'a mut [u32]) -> Result<Self, Error> {
                    let bits = packet.view_bits_mut();

                    Ok(Self::try_new(bits)?
                        .reset()
                        .set_message_type(MessageType::FlexData)
                        .set_group(Group::default())
                        .set_form(Form::default())
                        .set_address(Address::Channel)
                        .set_channel(Channel::default())
                        .set_status_bank(Self::STATUS_BANK)
                        .set_status(Self::STATUS))
                }
            }
    };
}

// -----------------------------------------------------------------------------

// Macro Exports

pub(crate) use impl_message;
