// =============================================================================
// MIDI 1.0 Channel Voice
// =============================================================================

//! MIDI 1.0 Channel Voice messages carried in a UMP **([M2-104-UM 7.3])**.
//!
//! Each shape is a single 32-bit word: a 4-bit opcode and channel in word 0,
//! alongside up to two 7-bit data bytes.

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
        m1cvm,
        Group,
        MessageType,
    },
    packet::TryReadField,
    Error,
};

// -----------------------------------------------------------------------------

// Fields

// Opcode

/// The 4-bit opcode selecting one of the seven MIDI 1.0 Channel Voice
/// message shapes, numerically identical to the legacy status nibble.
#[derive(Debug, Eq, IntoPrimitive, PartialEq, TryFromPrimitive)]
#[num_enum(error_type(name = Error, constructor = Error::conversion))]
#[repr(u8)]
pub enum Opcode {
    NoteOff = 0x8,
    NoteOn = 0x9,
    PolyPressure = 0xa,
    ControlChange = 0xb,
    ProgramChange = 0xc,
    ChannelPressure = 0xd,
    PitchBend = 0xe,
}

field::impl_field_trait_field!(Opcode, u8, 8..=11);

field::impl_field!(
    /// 4-bit MIDI channel.
    pub Channel { u8, 12..=15, 4 }
);

field::impl_field!(
    /// Note number (0-127).
    pub Note { u8, 17..=23, 7 }
);

field::impl_field!(
    /// Note velocity (0-127).
    pub Velocity { u8, 25..=31, 7 }
);

field::impl_field!(
    /// Controller index (0-127).
    pub Index { u8, 17..=23, 7 }
);

field::impl_field!(
    /// 7-bit data value.
    pub Data { u8, 25..=31, 7 }
);

field::impl_field!(
    /// Program number (0-127).
    pub Program { u8, 17..=23, 7 }
);

field::impl_field!(
    /// Channel pressure amount (0-127).
    pub Pressure { u8, 17..=23, 7 }
);

field::impl_field!(
    /// Pitch bend least-significant 7 bits.
    pub Lsb { u8, 17..=23, 7 }
);

field::impl_field!(
    /// Pitch bend most-significant 7 bits.
    pub Msb { u8, 25..=31, 7 }
);

// -----------------------------------------------------------------------------

// Messages

// Note Off

m1cvm::impl_message!(
    /// Note Off.
    pub NoteOff { Opcode::NoteOff, [
        { note, Note },
        { velocity, Velocity },
    ] }
);

impl<'a> NoteOff<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], note: Note, velocity: Velocity) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_note(note)
            .set_velocity(velocity))
    }
}

// Note On

m1cvm::impl_message!(
    /// Note On.
    pub NoteOn { Opcode::NoteOn, [
        { note, Note },
        { velocity, Velocity },
    ] }
);

impl<'a> NoteOn<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], note: Note, velocity: Velocity) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_note(note)
            .set_velocity(velocity))
    }
}

// Poly Pressure

m1cvm::impl_message!(
    /// Polyphonic Key Pressure.
    pub PolyPressure { Opcode::PolyPressure, [
        { note, Note },
        { data, Data },
    ] }
);

impl<'a> PolyPressure<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], note: Note, data: Data) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_note(note).set_data(data))
    }
}

// Control Change

m1cvm::impl_message!(
    /// Control Change.
    pub ControlChange { Opcode::ControlChange, [
        { index, Index },
        { data, Data },
    ] }
);

impl<'a> ControlChange<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], index: Index, data: Data) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_index(index).set_data(data))
    }
}

// Program Change

m1cvm::impl_message!(
    /// Program Change.
    pub ProgramChange { Opcode::ProgramChange, [
        { program, Program },
    ] }
);

impl<'a> ProgramChange<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], program: Program) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_program(program))
    }
}

// Channel Pressure

m1cvm::impl_message!(
    /// Channel Pressure.
    pub ChannelPressure { Opcode::ChannelPressure, [
        { pressure, Pressure },
    ] }
);

impl<'a> ChannelPressure<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], pressure: Pressure) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_pressure(pressure))
    }
}

// Pitch Bend

m1cvm::impl_message!(
    /// Pitch Bend.
    pub PitchBend { Opcode::PitchBend, [
        { lsb, Lsb },
        { msb, Msb },
    ] }
);

impl<'a> PitchBend<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], lsb: Lsb, msb: Msb) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_lsb(lsb).set_msb(msb))
    }
}

// -----------------------------------------------------------------------------

// Enumeration

m1cvm::impl_enumeration!(
    /// Any one of the seven MIDI 1.0 Channel Voice message shapes.
    pub Voice, [
        NoteOff,
        NoteOn,
        PolyPressure,
        ControlChange,
        ProgramChange,
        ChannelPressure,
        PitchBend,
    ]
);

// -----------------------------------------------------------------------------

// Macros

// Enumeration

macro_rules! impl_enumeration {
    (
        $(#[$meta:meta])*
        $vis:vis $enum:ident, [
            $($message:ident,)*
        ]
    ) => {
        message::impl_enumeration!(
            $(#[$meta])*
            $vis $enum, [
                $($message,)*
            ]
        );

        impl<'a> $enum<'a> {
            pub(crate) fn try_new(bits: &'a mut BitSlice<u32, Msb0>) -> Result<Self, Error> {
                match bits.try_read_field::<Opcode>()? {
                    $(Opcode::$message => Ok(Self::$message($message::try_new(bits)?)),)*
                }
            }
        }
    };
}

// Message

macro_rules! impl_message {
    (
        $(#[$meta:meta])*
        $vis:vis $message:ident { $opcode:expr, [
            $({ $name:ident, $type:ty },)*
        ] }
    ) => {
            message::impl_message!(
                $(#[$meta])*
                $vis $message { 1, [
                    { message_type, MessageType },
                    { group, Group },
                    { opcode, Opcode },
                    { channel, Channel },
                  $({ $name, $type },)*
                ] }
            );

            impl<'a> $message<'a> {
                pub(crate) const OPCODE: Opcode = $opcode;

                fn try_init_internal(packet: &'a mut [u32]) -> Result<Self, Error> {
                    let bits = packet.view_bits_mut();

                    Ok(Self::try_new(bits)?
                        .reset()
                        .set_message_type(MessageType::Midi1ChannelVoice)
                        .set_group(Group::default())
                        .set_opcode(Self::OPCODE)
                        .set_channel(Channel::default()))
                }
            }
    };
}

// -----------------------------------------------------------------------------

// Macro Exports

pub(crate) use impl_enumeration;
pub(crate) use impl_message;
