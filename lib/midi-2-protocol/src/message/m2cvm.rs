// =============================================================================
// MIDI 2.x Channel Voice
// =============================================================================

//! MIDI 2.x Channel Voice messages **([M2-104-UM 7.4])**.
//!
//! Every shape here is a 2-word (64-bit) UMP: a 4-bit opcode and 4-bit channel
//! in word 0 alongside message-specific 16-bit data, and a message-specific
//! 32-bit payload in word 1.

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
        m2cvm,
        Group,
        MessageType,
    },
    packet::TryReadField,
    Error,
};

// -----------------------------------------------------------------------------

// Fields

// Opcode

/// The 4-bit opcode selecting one of the fifteen MIDI 2.x Channel Voice
/// message shapes **([M2-104-UM 7.4])**.
#[derive(Debug, Eq, IntoPrimitive, PartialEq, TryFromPrimitive)]
#[num_enum(error_type(name = Error, constructor = Error::conversion))]
#[repr(u8)]
pub enum Opcode {
    RegisteredPerNoteController = 0x0,
    AssignablePerNoteController = 0x1,
    RegisteredController = 0x2,
    AssignableController = 0x3,
    RelativeRegisteredController = 0x4,
    RelativeAssignableController = 0x5,
    PerNotePitchBend = 0x6,
    NoteOff = 0x8,
    NoteOn = 0x9,
    PolyPressure = 0xa,
    ControlChange = 0xb,
    ProgramChange = 0xc,
    ChannelPressure = 0xd,
    PitchBend = 0xe,
    PerNoteManagement = 0xf,
}

field::impl_field_trait_field!(Opcode, u8, 8..=11);

// Channel

field::impl_field!(
    /// 4-bit MIDI channel.
    pub Channel { u8, 12..=15, 4 }
);

// Per-note / bank addressing

field::impl_field!(
    /// Note number (0-127) addressed by a per-note message.
    pub Note { u8, 17..=23, 7 }
);

field::impl_field!(
    /// Attribute type carried alongside a note-on/off's velocity.
    pub AttributeType { u8, 24..=31 }
);

field::impl_field!(
    /// Controller bank, for registered/assignable (N)RPN-style controllers.
    pub Bank { u8, 17..=23, 7 }
);

field::impl_field!(
    /// Controller index within a bank.
    pub Controller { u8, 25..=31, 7 }
);

field::impl_field!(
    /// Per-note controller index.
    pub PerNoteController { u8, 24..=31 }
);

// Word 1 payloads

field::impl_field!(
    /// 16-bit note velocity.
    pub Velocity { u16, 32..=47 }
);

field::impl_field!(
    /// 16-bit attribute data, paired with [`AttributeType`].
    pub AttributeData { u16, 48..=63 }
);

field::impl_field!(
    /// Generic 32-bit data payload (controller/pressure/pitch-bend value).
    pub Data { u32, 32..=63 }
);

field::impl_field!(
    /// MIDI program number. A full 8 bits wide on the wire; no reserved bit
    /// shares its byte.
    pub Program { u8, 32..=39 }
);

field::impl_field!(
    /// Set when a bank select accompanies a program change.
    pub BankValid { u8, 31..=31, 1 }
);

field::impl_field!(
    /// Bank select MSB, valid only when [`BankValid`] is set.
    pub BankMsb { u8, 49..=55, 7 }
);

field::impl_field!(
    /// Bank select LSB, valid only when [`BankValid`] is set.
    pub BankLsb { u8, 57..=63, 7 }
);

field::impl_field!(
    /// Per-note management flags: bit 0 is Detach, bit 1 is Reset.
    pub Flags { u8, 24..=31 }
);

field::impl_field!(
    /// Controller index (0-127).
    pub Index { u8, 17..=23, 7 }
);

// -----------------------------------------------------------------------------

// Messages

// Registered Per-Note Controller

m2cvm::impl_message!(
    /// Registered Per-Note Controller.
    pub RegisteredPerNoteController { Opcode::RegisteredPerNoteController, [
        { note, Note },
        { per_note_controller, PerNoteController },
        { data, Data },
    ] }
);

impl<'a> RegisteredPerNoteController<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(
        packet: &'a mut [u32],
        note: Note,
        per_note_controller: PerNoteController,
    ) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_note(note)
            .set_per_note_controller(per_note_controller))
    }
}

// Assignable Per-Note Controller

m2cvm::impl_message!(
    /// Assignable Per-Note Controller.
    pub AssignablePerNoteController { Opcode::AssignablePerNoteController, [
        { note, Note },
        { per_note_controller, PerNoteController },
        { data, Data },
    ] }
);

impl<'a> AssignablePerNoteController<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(
        packet: &'a mut [u32],
        note: Note,
        per_note_controller: PerNoteController,
    ) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_note(note)
            .set_per_note_controller(per_note_controller))
    }
}

// Registered Controller (RPN)

m2cvm::impl_message!(
    /// Registered Controller (RPN).
    pub RegisteredController { Opcode::RegisteredController, [
        { bank, Bank },
        { controller, Controller },
        { data, Data },
    ] }
);

impl<'a> RegisteredController<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], bank: Bank, controller: Controller) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_bank(bank)
            .set_controller(controller))
    }
}

// Assignable Controller (NRPN)

m2cvm::impl_message!(
    /// Assignable Controller (NRPN).
    pub AssignableController { Opcode::AssignableController, [
        { bank, Bank },
        { controller, Controller },
        { data, Data },
    ] }
);

impl<'a> AssignableController<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], bank: Bank, controller: Controller) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_bank(bank)
            .set_controller(controller))
    }
}

// Relative Registered Controller

m2cvm::impl_message!(
    /// Relative Registered Controller.
    pub RelativeRegisteredController { Opcode::RelativeRegisteredController, [
        { bank, Bank },
        { controller, Controller },
        { data, Data },
    ] }
);

impl<'a> RelativeRegisteredController<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], bank: Bank, controller: Controller) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_bank(bank)
            .set_controller(controller))
    }
}

// Relative Assignable Controller

m2cvm::impl_message!(
    /// Relative Assignable Controller.
    pub RelativeAssignableController { Opcode::RelativeAssignableController, [
        { bank, Bank },
        { controller, Controller },
        { data, Data },
    ] }
);

impl<'a> RelativeAssignableController<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], bank: Bank, controller: Controller) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_bank(bank)
            .set_controller(controller))
    }
}

// Per-Note Pitch Bend

m2cvm::impl_message!(
    /// Per-Note Pitch Bend.
    pub PerNotePitchBend { Opcode::PerNotePitchBend, [
        { note, Note },
        { data, Data },
    ] }
);

impl<'a> PerNotePitchBend<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], note: Note) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_note(note))
    }
}

// Note Off

m2cvm::impl_message!(
    /// Note Off.
    pub NoteOff { Opcode::NoteOff, [
        { note, Note },
        { attribute_type, AttributeType },
        { velocity, Velocity },
        { attribute_data, AttributeData },
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

m2cvm::impl_message!(
    /// Note On.
    pub NoteOn { Opcode::NoteOn, [
        { note, Note },
        { attribute_type, AttributeType },
        { velocity, Velocity },
        { attribute_data, AttributeData },
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

m2cvm::impl_message!(
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

m2cvm::impl_message!(
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

m2cvm::impl_message!(
    /// Program Change, optionally carrying a bank select.
    pub ProgramChange { Opcode::ProgramChange, [
        { bank_valid, BankValid },
        { program, Program },
        { bank_msb, BankMsb },
        { bank_lsb, BankLsb },
    ] }
);

impl<'a> ProgramChange<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], program: Program) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_program(program))
    }

    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init_with_bank(
        packet: &'a mut [u32],
        program: Program,
        bank_msb: BankMsb,
        bank_lsb: BankLsb,
    ) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_bank_valid(BankValid::new(1))
            .set_program(program)
            .set_bank_msb(bank_msb)
            .set_bank_lsb(bank_lsb))
    }
}

// Channel Pressure

m2cvm::impl_message!(
    /// Channel Pressure.
    pub ChannelPressure { Opcode::ChannelPressure, [
        { data, Data },
    ] }
);

impl<'a> ChannelPressure<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], data: Data) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_data(data))
    }
}

// Pitch Bend

m2cvm::impl_message!(
    /// Pitch Bend.
    pub PitchBend { Opcode::PitchBend, [
        { data, Data },
    ] }
);

impl<'a> PitchBend<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], data: Data) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_data(data))
    }
}

// Per-Note Management

m2cvm::impl_message!(
    /// Per-Note Management (Detach/Reset flags).
    pub PerNoteManagement { Opcode::PerNoteManagement, [
        { note, Note },
        { flags, Flags },
    ] }
);

impl<'a> PerNoteManagement<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], note: Note, flags: Flags) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_note(note).set_flags(flags))
    }
}

// -----------------------------------------------------------------------------

// Enumeration

m2cvm::impl_enumeration!(
    /// Any one of the fifteen MIDI 2.x Channel Voice message shapes.
    pub Voice, [
        RegisteredPerNoteController,
        AssignablePerNoteController,
        RegisteredController,
        AssignableController,
        RelativeRegisteredController,
        RelativeAssignableController,
        PerNotePitchBend,
        NoteOff,
        NoteOn,
        PolyPressure,
        ControlChange,
        ProgramChange,
        ChannelPressure,
        PitchBend,
        PerNoteManagement,
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
                    _ => unreachable!(),
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
                $vis $message { 2, [
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
                        .set_message_type(MessageType::Midi2ChannelVoice)
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
